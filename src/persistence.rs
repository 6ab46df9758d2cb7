//! Shared `PostgreSQL` plumbing for the diesel adapters.

use crate::config::DatabaseConfig;
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use std::time::Duration;

/// `PostgreSQL` connection pool type shared by all adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Builds a connection pool from database settings.
///
/// # Errors
///
/// Returns [`PoolError`] when the pool cannot establish its initial
/// connections within the configured timeout.
pub fn build_pool(config: &DatabaseConfig) -> Result<PgPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(config.url.as_str());
    Pool::builder()
        .max_size(config.max_connections)
        .connection_timeout(Duration::from_millis(config.connect_timeout_ms))
        .build(manager)
}

/// Escapes `LIKE` wildcards so the value matches literally under `ILIKE`.
#[must_use]
pub fn escape_like_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
