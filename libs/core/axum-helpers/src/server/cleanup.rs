//! Connection cleanup run during graceful shutdown.

use tracing::{error, info};

/// Closes the SeaORM pool explicitly so the shutdown is visible in the logs.
///
/// ```ignore
/// create_production_app(app, &config.server, timeout, async move {
///     close_postgres(db, "inventory").await;
/// })
/// .await?;
/// ```
pub async fn close_postgres(db: sea_orm::DatabaseConnection, name: &str) {
    match db.close().await {
        Ok(_) => info!(connection = name, "PostgreSQL connection closed"),
        Err(e) => error!(connection = name, error = %e, "Error closing PostgreSQL connection"),
    }
}
