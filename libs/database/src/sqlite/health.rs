use tracing::debug;

use super::Store;
use crate::common::DatabaseError;

/// Check database health by running `SELECT 1` through the statement cache.
pub async fn check_health(store: &Store) -> Result<(), DatabaseError> {
    debug!("Running SQLite health check");

    let statement = store
        .prepared("SELECT 1")
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(e.to_string()))?;
    sqlx::Statement::query(statement.as_ref())
        .fetch_one(store.pool())
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(e.to_string()))?;

    Ok(())
}
