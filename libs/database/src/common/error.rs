use std::time::Duration;

/// Failures around the pool itself: connecting, migrating, pinging.
///
/// Statement errors stay [`sea_orm::DbErr`]; each domain crate maps those
/// into its own error enum.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("could not reach PostgreSQL after {attempts} attempt(s): {source}")]
    Unreachable {
        attempts: u32,
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("migrations for {app} failed: {source}")]
    Migration {
        app: String,
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("PostgreSQL did not answer a ping within {elapsed:?}: {source}")]
    Ping {
        elapsed: Duration,
        #[source]
        source: sea_orm::DbErr,
    },
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
