//! PostgreSQL connection management, migrations, health checks and query helpers

mod config;
mod connector;
mod health;
mod search;

pub use config::{PoolSettings, PostgresConfig};
pub use connector::{connect_from_config_with_retry, run_migrations};
pub use health::check_health;
pub use search::contains_ignore_case;

pub use sea_orm::{ConnectOptions, DatabaseConnection, DbErr};
pub use sea_orm_migration::MigratorTrait;
