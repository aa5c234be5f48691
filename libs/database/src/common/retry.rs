use core_config::{ConfigError, FromEnv, env_parse_or};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Startup connection backoff. Doubling delays, capped, optionally jittered.
///
/// Only the initial pool connection retries; request-path queries fail fast.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries on top of the first attempt
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn with_max_retries(self, max_retries: u32) -> Self {
        Self { max_retries, ..self }
    }

    pub fn with_delays(self, initial: Duration, max: Duration) -> Self {
        Self {
            initial_delay: initial,
            max_delay: max,
            ..self
        }
    }

    pub fn without_jitter(self) -> Self {
        Self {
            jitter: false,
            ..self
        }
    }

    /// Waits between consecutive attempts, before jitter. Yields `max_retries` items.
    pub fn schedule(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.max_retries).map(|n| {
            let factor = 2u32.saturating_pow(n);
            self.initial_delay
                .saturating_mul(factor)
                .min(self.max_delay)
        })
    }
}

impl FromEnv for RetryConfig {
    /// `DB_CONNECT_RETRIES`, `DB_RETRY_INITIAL_DELAY_MS`, `DB_RETRY_MAX_DELAY_MS`
    fn from_env() -> Result<Self, ConfigError> {
        let base = Self::default();
        let initial_ms = env_parse_or(
            "DB_RETRY_INITIAL_DELAY_MS",
            base.initial_delay.as_millis() as u64,
        )?;
        let max_ms = env_parse_or("DB_RETRY_MAX_DELAY_MS", base.max_delay.as_millis() as u64)?;

        Ok(base
            .clone()
            .with_max_retries(env_parse_or("DB_CONNECT_RETRIES", base.max_retries)?)
            .with_delays(Duration::from_millis(initial_ms), Duration::from_millis(max_ms)))
    }
}

/// Run `operation` until it succeeds or the schedule in `config` runs out,
/// returning the last error in that case.
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, config: RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut waits = config.schedule();
    let mut attempt = 1u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        let Some(wait) = waits.next() else {
            warn!(attempt, error = %err, "giving up");
            return Err(err);
        };
        let wait = if config.jitter { jittered(wait) } else { wait };

        warn!(attempt, retry_in_ms = wait.as_millis() as u64, error = %err, "attempt failed");
        tokio::time::sleep(wait).await;
        attempt += 1;
    }
}

/// Somewhere in [50%, 100%) of `wait`.
fn jittered(wait: Duration) -> Duration {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let roll = RandomState::new().hash_one(std::time::Instant::now()) % 50;
    wait.mul_f64(0.5 + roll as f64 / 100.0)
}
