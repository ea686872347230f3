pub mod jobs;
pub mod migrations;
pub mod pool;
pub mod util;

// Keep re-exports unique so downstream crates see a single symbol per helper.
pub use jobs::{
    JobQueryError, PgJobSource, compile_filter, count_published_jobs, get_job_by_id,
    query_job_metadata, query_jobs, related_jobs,
};
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPoolError, PgPool, create_pool_from_url, create_pool_from_url_checked};
