use sea_orm::DatabaseConnection;
use std::time::Instant;
use tracing::debug;

use crate::common::DatabaseError;

/// Round-trip a ping through the pool. Backs the `/ready` endpoint.
pub async fn check_health(db: &DatabaseConnection) -> Result<(), DatabaseError> {
    let started = Instant::now();

    if let Err(source) = db.ping().await {
        return Err(DatabaseError::Ping {
            elapsed: started.elapsed(),
            source,
        });
    }

    debug!(elapsed_ms = started.elapsed().as_millis() as u64, "database ping ok");
    Ok(())
}
