//! 検索条件 → SQL述語のコンパイルと案件クエリ
//!
//! 件数クエリとデータクエリは必ず同じ `CompiledFilter` を共有する。
//! 表示中の「N件」とリストの中身がずれないことはここで保証する。

use deadpool_postgres::PoolError;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Error as PgError, Row};
use tracing::instrument;
use uuid::Uuid;

use crate::db::PgPool;
use crate::db::util::TimedClientExt;
use crate::filter::{JobFilter, SortOrder};
use crate::listing::JobSource;
use crate::search_query::parse_search_query;
use crate::{Job, JobMetadata, JobRole, WorkStyle};

#[derive(Debug, thiserror::Error)]
pub enum JobQueryError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("postgres error: {0}")]
    Postgres(#[from] PgError),
    #[error("failed to map job row: {0}")]
    Mapping(String),
}

type SqlValue = Box<dyn ToSql + Sync + Send>;

/// 検索条件一式から一度だけ組み立てる WHERE 句とバインド値
pub struct CompiledFilter {
    where_sql: String,
    values: Vec<SqlValue>,
    sort: SortOrder,
}

/// `JobFilter` を述語にコンパイルする
///
/// - キーワード: バリアントグループごとに (title / description_md /
///   requirements_md の ILIKE 部分一致を OR で束ねた) 句を作り、グループ間は AND
/// - 職種・働き方: スラッグ／値の集合に対する `= ANY`
/// - スキル: 選択スキルのどれかを持てばよい（存在結合の ANY マッチ）
/// - 金額: price_min の下限と price_max の上限をそれぞれ独立に適用
/// - 公開条件 `status = 'published'` は常に付与する
pub fn compile_filter(filter: &JobFilter) -> CompiledFilter {
    let mut where_sql = String::from("j.status = 'published'");
    let mut values: Vec<SqlValue> = Vec::new();

    for group in parse_search_query(&filter.keyword) {
        let mut clauses: Vec<String> = Vec::new();
        for variant in group {
            let placeholder = format!("${}", values.len() + 1);
            clauses.push(format!(
                "j.title ILIKE {placeholder} OR j.description_md ILIKE {placeholder} \
                 OR j.requirements_md ILIKE {placeholder}"
            ));
            values.push(Box::new(format!("%{variant}%")));
        }
        where_sql.push_str(&format!(" AND ({})", clauses.join(" OR ")));
    }

    if !filter.roles.is_empty() {
        where_sql.push_str(&format!(" AND r.slug = ANY(${})", values.len() + 1));
        values.push(Box::new(filter.roles.clone()));
    }

    if !filter.work_styles.is_empty() {
        let styles: Vec<String> = filter
            .work_styles
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();
        where_sql.push_str(&format!(" AND j.work_style = ANY(${})", values.len() + 1));
        values.push(Box::new(styles));
    }

    if !filter.skills.is_empty() {
        where_sql.push_str(&format!(
            " AND EXISTS (SELECT 1 FROM job_skills js_f \
             JOIN skills s_f ON s_f.id = js_f.skill_id \
             WHERE js_f.job_id = j.id AND s_f.name = ANY(${}))",
            values.len() + 1
        ));
        values.push(Box::new(filter.skills.clone()));
    }

    if let Some(min) = filter.min_price {
        where_sql.push_str(&format!(" AND j.price_min >= ${}", values.len() + 1));
        values.push(Box::new(min));
    }

    if let Some(max) = filter.max_price {
        where_sql.push_str(&format!(" AND j.price_max <= ${}", values.len() + 1));
        values.push(Box::new(max));
    }

    CompiledFilter {
        where_sql,
        values,
        sort: filter.sort,
    }
}

impl CompiledFilter {
    pub fn where_sql(&self) -> &str {
        &self.where_sql
    }

    pub fn param_count(&self) -> usize {
        self.values.len()
    }

    fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values
            .iter()
            .map(|v| v.as_ref() as &(dyn ToSql + Sync))
            .collect()
    }

    fn order_by_sql(&self) -> &'static str {
        match self.sort {
            SortOrder::Newest => "j.created_at DESC, j.id DESC",
            SortOrder::PriceDesc => "j.price_max DESC NULLS LAST, j.created_at DESC, j.id DESC",
        }
    }
}

const JOB_SELECT: &str = "SELECT j.id, j.job_code, j.title, j.work_style, \
    j.price_min, j.price_max, j.duration_months, j.description_md, \
    j.requirements_md, j.nice_to_have_md, j.created_at, \
    r.name AS role_name, r.slug AS role_slug, l.name AS location_name, \
    COALESCE(array_agg(s.name ORDER BY s.name) FILTER (WHERE s.name IS NOT NULL), '{}') AS skills \
    FROM jobs j \
    JOIN roles r ON r.id = j.role_id \
    LEFT JOIN locations l ON l.id = j.location_id \
    LEFT JOIN job_skills js ON js.job_id = j.id \
    LEFT JOIN skills s ON s.id = js.skill_id";

const JOB_GROUP_BY: &str = "GROUP BY j.id, r.name, r.slug, l.name";

fn row_to_job(row: &Row) -> Result<Job, JobQueryError> {
    let work_style = row
        .try_get::<_, String>("work_style")?
        .parse::<WorkStyle>()
        .map_err(|e| JobQueryError::Mapping(e.to_string()))?;

    Ok(Job {
        id: row.try_get("id")?,
        job_code: row.try_get("job_code")?,
        title: row.try_get("title")?,
        role: JobRole {
            name: row.try_get("role_name")?,
            slug: row.try_get("role_slug")?,
        },
        work_style,
        price_min: row.try_get("price_min")?,
        price_max: row.try_get("price_max")?,
        location: row.try_get("location_name")?,
        duration_months: row.try_get("duration_months")?,
        skills: row.try_get("skills")?,
        description_md: row.try_get("description_md")?,
        requirements_md: row.try_get("requirements_md")?,
        nice_to_have_md: row.try_get("nice_to_have_md")?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_metadata(row: &Row) -> Result<JobMetadata, JobQueryError> {
    let work_style = row
        .try_get::<_, String>("work_style")?
        .parse::<WorkStyle>()
        .map_err(|e| JobQueryError::Mapping(e.to_string()))?;

    Ok(JobMetadata {
        id: row.try_get("id")?,
        work_style,
        role: JobRole {
            name: row.try_get("role_name")?,
            slug: row.try_get("role_slug")?,
        },
        price_min: row.try_get("price_min")?,
        price_max: row.try_get("price_max")?,
        skills: row.try_get("skills")?,
    })
}

/// 検索条件に合致する公開案件の正確な総件数
#[instrument(skip(pool, filter))]
pub async fn count_published_jobs(
    pool: &PgPool,
    filter: &JobFilter,
) -> Result<i64, JobQueryError> {
    let client = pool.get().await?;
    let compiled = compile_filter(filter);

    // スキル条件は EXISTS で表現しているため結合による行の重複はない
    let query = format!(
        "SELECT COUNT(*) FROM jobs j JOIN roles r ON r.id = j.role_id WHERE {}",
        compiled.where_sql()
    );

    let row = client
        .timed_query_one(&query, &compiled.params(), "jobs.count")
        .await?;
    Ok(row.get(0))
}

/// 検索条件に合致する公開案件を1ページ分取得する
///
/// 述語は `count_published_jobs` と同一のコンパイル結果を使う。
#[instrument(skip(pool, filter))]
pub async fn query_jobs(
    pool: &PgPool,
    filter: &JobFilter,
    offset: i64,
    limit: i64,
) -> Result<Vec<Job>, JobQueryError> {
    let client = pool.get().await?;
    let compiled = compile_filter(filter);

    let query = format!(
        "{JOB_SELECT} WHERE {} {JOB_GROUP_BY} ORDER BY {} LIMIT ${} OFFSET ${}",
        compiled.where_sql(),
        compiled.order_by_sql(),
        compiled.param_count() + 1,
        compiled.param_count() + 2,
    );

    let mut params = compiled.params();
    params.push(&limit);
    params.push(&offset);

    let rows = client.timed_query(&query, &params, "jobs.page").await?;
    rows.iter().map(row_to_job).collect()
}

/// ファセット集計用のメタデータスナップショット
///
/// 公開中かつ有効 (`is_active`) な全案件の縮約形を返す。ページロードごとに
/// 一度だけ取得され、以後の件数再計算はクライアント側で行う。
#[instrument(skip(pool))]
pub async fn query_job_metadata(pool: &PgPool) -> Result<Vec<JobMetadata>, JobQueryError> {
    let client = pool.get().await?;

    let query = "SELECT j.id, j.work_style, j.price_min, j.price_max, \
        r.name AS role_name, r.slug AS role_slug, \
        COALESCE(array_agg(s.name ORDER BY s.name) FILTER (WHERE s.name IS NOT NULL), '{}') AS skills \
        FROM jobs j \
        JOIN roles r ON r.id = j.role_id \
        LEFT JOIN job_skills js ON js.job_id = j.id \
        LEFT JOIN skills s ON s.id = js.skill_id \
        WHERE j.status = 'published' AND j.is_active \
        GROUP BY j.id, r.name, r.slug";

    let rows = client.timed_query(query, &[], "jobs.metadata").await?;
    rows.iter().map(row_to_metadata).collect()
}

/// 公開中の案件1件を取得する（非公開・未知IDは None）
#[instrument(skip(pool))]
pub async fn get_job_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Job>, JobQueryError> {
    let client = pool.get().await?;

    let query = format!(
        "{JOB_SELECT} WHERE j.status = 'published' AND j.id = $1 {JOB_GROUP_BY}"
    );

    let row = client
        .timed_query_opt(&query, &[&id], "jobs.detail")
        .await?;
    row.as_ref().map(row_to_job).transpose()
}

/// 関連案件の取得
///
/// スキルが1つでも重なる案件を新着順で優先し、足りなければ同一職種の
/// 案件で埋める。対象案件自身は常に除外する。
#[instrument(skip(pool))]
pub async fn related_jobs(
    pool: &PgPool,
    job_id: Uuid,
    limit: i64,
) -> Result<Vec<Job>, JobQueryError> {
    let client = pool.get().await?;

    let by_skill = format!(
        "{JOB_SELECT} WHERE j.status = 'published' AND j.id <> $1 \
         AND EXISTS (SELECT 1 FROM job_skills js_r WHERE js_r.job_id = j.id \
             AND js_r.skill_id IN (SELECT skill_id FROM job_skills WHERE job_id = $1)) \
         {JOB_GROUP_BY} ORDER BY j.created_at DESC, j.id DESC LIMIT $2"
    );

    let rows = client
        .timed_query(&by_skill, &[&job_id, &limit], "jobs.related_by_skill")
        .await?;
    let mut related: Vec<Job> = rows.iter().map(row_to_job).collect::<Result<_, _>>()?;

    if (related.len() as i64) < limit {
        let remaining = limit - related.len() as i64;
        let mut exclude: Vec<Uuid> = related.iter().map(|job| job.id).collect();
        exclude.push(job_id);

        let by_role = format!(
            "{JOB_SELECT} WHERE j.status = 'published' AND j.id <> ALL($1) \
             AND j.role_id = (SELECT role_id FROM jobs WHERE id = $2) \
             {JOB_GROUP_BY} ORDER BY j.created_at DESC, j.id DESC LIMIT $3"
        );

        let rows = client
            .timed_query(
                &by_role,
                &[&exclude, &job_id, &remaining],
                "jobs.related_by_role",
            )
            .await?;
        for row in &rows {
            related.push(row_to_job(row)?);
        }
    }

    Ok(related)
}

/// `listing::JobSource` の Postgres 実装
#[derive(Clone)]
pub struct PgJobSource {
    pool: PgPool,
}

impl PgJobSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl JobSource for PgJobSource {
    type Error = JobQueryError;

    async fn query_jobs(
        &self,
        filter: &JobFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Job>, JobQueryError> {
        query_jobs(&self.pool, filter, offset, limit).await
    }
}
