use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use super::PostgresConfig;
use crate::common::{DatabaseError, RetryConfig, retry_with_backoff};

/// Open the pool, retrying while the server is still coming up.
///
/// `retry` falls back to [`RetryConfig::default`] when `None`.
pub async fn connect_from_config_with_retry(
    config: PostgresConfig,
    retry: Option<RetryConfig>,
) -> Result<DatabaseConnection, DatabaseError> {
    info!(url = %config.redacted_url(), "opening PostgreSQL pool");
    let options: ConnectOptions = config.into_connect_options();
    let mut attempts = 0u32;

    let outcome = retry_with_backoff(
        || {
            attempts += 1;
            Database::connect(options.clone())
        },
        retry.unwrap_or_default(),
    )
    .await;

    match outcome {
        Ok(db) => {
            info!(attempts, "PostgreSQL pool ready");
            Ok(db)
        }
        Err(source) => Err(DatabaseError::Unreachable {
            attempts,
            source,
        }),
    }
}

/// Bring the schema up to date with every migration in `M`.
pub async fn run_migrations<M: MigratorTrait>(
    db: &DatabaseConnection,
    app_name: &str,
) -> Result<(), DatabaseError> {
    info!(app = app_name, "applying pending migrations");
    M::up(db, None)
        .await
        .map_err(|source| DatabaseError::Migration {
            app: app_name.to_string(),
            source,
        })?;
    info!(app = app_name, "schema up to date");
    Ok(())
}
