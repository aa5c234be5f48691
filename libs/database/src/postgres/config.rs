use core_config::{ConfigError, FromEnv, env_parse_or, env_required};
use sea_orm::ConnectOptions;
use std::time::Duration;
use tracing::log::LevelFilter;

/// Connection pool sizing and timeouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 20,
            min_connections: 2,
            connect_timeout: Duration::from_secs(8),
            acquire_timeout: Duration::from_secs(8),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

/// Where and how to open the PostgreSQL pool.
///
/// Read from the environment at startup:
///
/// | variable | default |
/// |---|---|
/// | `DATABASE_URL` | required |
/// | `DB_MAX_CONNECTIONS` / `DB_MIN_CONNECTIONS` | 20 / 2 |
/// | `DB_CONNECT_TIMEOUT` / `DB_ACQUIRE_TIMEOUT` | 8s / 8s |
/// | `DB_IDLE_TIMEOUT` / `DB_MAX_LIFETIME` | 600s / 1800s |
/// | `DB_SQLX_LOGGING` | false |
#[derive(Clone, Debug)]
pub struct PostgresConfig {
    pub url: String,
    pub pool: PoolSettings,
    /// Echo each statement at debug level
    pub log_statements: bool,
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            pool: PoolSettings::default(),
            log_statements: false,
        }
    }

    pub fn into_connect_options(self) -> ConnectOptions {
        let PoolSettings {
            max_connections,
            min_connections,
            connect_timeout,
            acquire_timeout,
            idle_timeout,
            max_lifetime,
        } = self.pool;

        let mut options = ConnectOptions::new(self.url);
        options
            .max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(connect_timeout)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .max_lifetime(max_lifetime)
            .sqlx_logging(self.log_statements)
            .sqlx_logging_level(LevelFilter::Debug);
        options
    }

    /// The URL with any password masked.
    pub fn redacted_url(&self) -> String {
        let Some((scheme, rest)) = self.url.split_once("://") else {
            return self.url.clone();
        };
        let Some((credentials, host)) = rest.rsplit_once('@') else {
            return self.url.clone();
        };
        match credentials.split_once(':') {
            Some((user, _password)) => format!("{scheme}://{user}:***@{host}"),
            None => self.url.clone(),
        }
    }
}

fn env_secs(key: &str, default: Duration) -> Result<Duration, ConfigError> {
    env_parse_or(key, default.as_secs()).map(Duration::from_secs)
}

impl FromEnv for PostgresConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let d = PoolSettings::default();
        let pool = PoolSettings {
            max_connections: env_parse_or("DB_MAX_CONNECTIONS", d.max_connections)?,
            min_connections: env_parse_or("DB_MIN_CONNECTIONS", d.min_connections)?,
            connect_timeout: env_secs("DB_CONNECT_TIMEOUT", d.connect_timeout)?,
            acquire_timeout: env_secs("DB_ACQUIRE_TIMEOUT", d.acquire_timeout)?,
            idle_timeout: env_secs("DB_IDLE_TIMEOUT", d.idle_timeout)?,
            max_lifetime: env_secs("DB_MAX_LIFETIME", d.max_lifetime)?,
        };

        Ok(Self {
            url: env_required("DATABASE_URL")?,
            pool,
            log_statements: env_parse_or("DB_SQLX_LOGGING", false)?,
        })
    }
}
