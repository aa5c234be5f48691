//! PostgreSQL plumbing shared by the domain crates and the API binary.
//!
//! - [`postgres`]: pool configuration, connection (with startup retry), migrations, health
//! - [`pagination`]: page/limit normalisation and the paged result envelope
//! - [`common`]: error type and the exponential backoff helper
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::postgres::{self, PostgresConfig};
//! use migration::Migrator;
//!
//! let config = PostgresConfig::from_env()?;
//! let db = postgres::connect_from_config_with_retry(config, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "inventory_api").await?;
//! ```

pub mod common;
pub mod pagination;
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult, RetryConfig};
pub use pagination::{Page, PageRequest};
