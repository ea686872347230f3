//! 案件カタログのスキーマ定義
//!
//! 公開検索面が読むテーブル群。書き込みは管理画面側の責務で、この
//! リポジトリからは読み取りのみ。

pub const ROLES_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS roles (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name TEXT NOT NULL,
    slug TEXT NOT NULL UNIQUE,
    category TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
"#;

pub const SKILLS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS skills (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name TEXT NOT NULL UNIQUE,
    category TEXT NOT NULL
);
"#;

pub const LOCATIONS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS locations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name TEXT NOT NULL,
    region TEXT
);
"#;

pub const JOBS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS jobs (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    job_code VARCHAR(50) UNIQUE,
    title TEXT NOT NULL,
    role_id UUID NOT NULL REFERENCES roles(id),
    work_style VARCHAR(10) NOT NULL,
    price_min BIGINT,
    price_max BIGINT,
    location_id UUID REFERENCES locations(id),
    duration_months INTEGER,
    start_date DATE,
    interview_steps INTEGER,
    description_md TEXT NOT NULL,
    requirements_md TEXT,
    nice_to_have_md TEXT,
    is_active BOOLEAN NOT NULL DEFAULT true,
    status VARCHAR(20) NOT NULL DEFAULT 'draft',
    published_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_work_style CHECK (work_style IN ('remote', 'hybrid', 'onsite')),
    CONSTRAINT chk_status CHECK (status IN ('draft', 'published')),
    CONSTRAINT chk_price_range CHECK (
        price_min IS NULL OR price_max IS NULL OR price_min <= price_max
    )
);
"#;

pub const JOB_SKILLS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS job_skills (
    job_id UUID NOT NULL REFERENCES jobs(id) ON DELETE CASCADE,
    skill_id UUID NOT NULL REFERENCES skills(id) ON DELETE CASCADE,
    PRIMARY KEY (job_id, skill_id)
);
"#;
