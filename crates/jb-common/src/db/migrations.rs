use deadpool_postgres::PoolError;
use thiserror::Error;
use tokio_postgres::Error as PgError;
use tracing::{info, instrument};

use crate::db::{DbPoolError, PgPool};
use crate::schema;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("failed to run migration: {0}")]
    Postgres(#[from] PgError),
    #[error("failed to build pool: {0}")]
    PoolBuild(#[from] DbPoolError),
}

struct Migration {
    id: i32,
    description: &'static str,
    sql: &'static str,
}

const SEARCH_INDEXES_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_jobs_published_created
    ON jobs(created_at DESC, id DESC)
    WHERE status = 'published';
CREATE INDEX IF NOT EXISTS idx_jobs_role ON jobs(role_id);
CREATE INDEX IF NOT EXISTS idx_jobs_work_style ON jobs(work_style) WHERE status = 'published';
CREATE INDEX IF NOT EXISTS idx_job_skills_skill ON job_skills(skill_id);
"#;

static MIGRATIONS: &[Migration] = &[
    Migration {
        id: 1,
        description: "roles",
        sql: schema::ROLES_DDL,
    },
    Migration {
        id: 2,
        description: "skills",
        sql: schema::SKILLS_DDL,
    },
    Migration {
        id: 3,
        description: "locations",
        sql: schema::LOCATIONS_DDL,
    },
    Migration {
        id: 4,
        description: "jobs table with work_style/status checks",
        sql: schema::JOBS_DDL,
    },
    Migration {
        id: 5,
        description: "job_skills join table",
        sql: schema::JOB_SKILLS_DDL,
    },
    Migration {
        id: 6,
        description: "indexes for the public search surface",
        sql: SEARCH_INDEXES_SQL,
    },
];

#[instrument(skip(pool))]
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrationError> {
    let mut client = pool.get().await?;
    client
        .batch_execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                id INTEGER PRIMARY KEY,
                description TEXT NOT NULL,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
             );",
        )
        .await?;

    for migration in MIGRATIONS {
        let already_applied: bool = client
            .query_one(
                "SELECT EXISTS (SELECT 1 FROM schema_migrations WHERE id = $1)",
                &[&migration.id],
            )
            .await?
            .get(0);

        if already_applied {
            continue;
        }

        let tx = client.transaction().await?;
        tx.batch_execute(migration.sql).await?;
        tx.execute(
            "INSERT INTO schema_migrations (id, description) VALUES ($1, $2)",
            &[&migration.id, &migration.description],
        )
        .await?;
        tx.commit().await?;

        info!(
            id = migration.id,
            description = migration.description,
            "applied migration"
        );
    }

    Ok(())
}
