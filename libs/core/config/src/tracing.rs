use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, prelude::*};

/// Install color-eyre so startup failures in `main` print a readable report.
///
/// Call before anything fallible. A second call is a no-op.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Shape of log lines on stdout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// One flattened JSON object per event, for log shippers
    Json,
    /// Multi-line human-readable output
    Pretty,
}

impl LogFormat {
    pub fn for_environment(environment: &Environment) -> Self {
        if environment.is_production() {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Filter used when `RUST_LOG` is unset. SQL statement logging stays at warn
/// in both environments; `DB_SQLX_LOGGING` is the switch for that.
pub fn default_directives(environment: &Environment) -> &'static str {
    match LogFormat::for_environment(environment) {
        LogFormat::Json => "info,tower_http=info,sea_orm=warn,sqlx=warn",
        LogFormat::Pretty => "debug,tower_http=debug,sea_orm=info,sqlx=warn,hyper=info",
    }
}

/// Install the global subscriber: env filter, one formatting layer chosen by
/// [`LogFormat::for_environment`], and a [`tracing_error::ErrorLayer`] so
/// `eyre` reports carry span traces.
///
/// Later calls leave the first subscriber in place, so tests may call this freely.
pub fn init_tracing(environment: &Environment) {
    let format = LogFormat::for_environment(environment);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(environment)));

    let json = (format == LogFormat::Json).then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .flatten_event(true)
    });
    let pretty = (format == LogFormat::Pretty).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .pretty()
    });

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .with(tracing_error::ErrorLayer::default())
        .try_init();

    match installed {
        Ok(()) => info!(?environment, ?format, "Tracing initialized"),
        Err(_) => debug!("Global subscriber already set, keeping it"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_follows_environment() {
        assert_eq!(
            LogFormat::for_environment(&Environment::Production),
            LogFormat::Json
        );
        assert_eq!(
            LogFormat::for_environment(&Environment::Development),
            LogFormat::Pretty
        );
    }

    #[test]
    fn test_default_directives_parse() {
        for env in [Environment::Development, Environment::Production] {
            assert!(EnvFilter::try_new(default_directives(&env)).is_ok());
        }
    }

    #[test]
    fn test_sqlx_stays_quiet_everywhere() {
        for env in [Environment::Development, Environment::Production] {
            assert!(default_directives(&env).contains("sqlx=warn"));
        }
    }

    #[test]
    fn test_repeated_init_is_harmless() {
        init_tracing(&Environment::Development);
        temp_env::with_var("RUST_LOG", Some("warn"), || {
            init_tracing(&Environment::Production);
        });
    }
}
