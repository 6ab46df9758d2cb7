//! Seeds the reference catalogs in `PostgreSQL`.
//!
//! Usage:
//!
//! ```text
//! task-mirror-seed [config-path]
//! ```
//!
//! Without a path the built-in defaults are used. The schema must already be
//! migrated (see `migrations/`). Seeding is idempotent: the three lifecycle
//! statuses are created or renamed from their legacy spellings, and the
//! default task types are added when missing.

use std::process::ExitCode;
use std::sync::Arc;

use task_mirror::config::{ConfigError, LogConfig, ServiceConfig};
use task_mirror::directory::adapters::postgres::PostgresDirectory;
use task_mirror::directory::services::{DirectoryService, DirectoryServiceError};
use task_mirror::persistence::build_pool;
use task_mirror::task::domain::TaskStatus;
use task_mirror::telemetry;
use thiserror::Error;
use tracing::{error, info};

const DEFAULT_TASK_TYPES: [&str; 3] = ["Development", "Bugfix", "Documentation"];

#[derive(Debug, Error)]
enum SeedError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to connect to PostgreSQL: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error(transparent)]
    Directory(#[from] DirectoryServiceError),
}

fn load_config() -> Result<ServiceConfig, ConfigError> {
    std::env::args()
        .nth(1)
        .map_or_else(|| Ok(ServiceConfig::default()), ServiceConfig::load)
}

async fn seed(config: &ServiceConfig) -> Result<(), SeedError> {
    let pool = build_pool(&config.database)?;
    let directory = DirectoryService::new(Arc::new(PostgresDirectory::new(pool)));

    let statuses = directory
        .ensure_status_catalog(TaskStatus::catalog_seeds())
        .await?;
    let task_types = directory.ensure_task_types(&DEFAULT_TASK_TYPES).await?;

    info!(
        statuses = statuses.len(),
        task_types = task_types.len(),
        "catalogs seeded"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            telemetry::init(&LogConfig::default().filter);
            error!(error = %err, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    telemetry::init(&config.log.filter);

    match seed(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "seeding failed");
            ExitCode::FAILURE
        }
    }
}
