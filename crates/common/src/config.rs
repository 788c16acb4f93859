use std::time::Duration;

use serde::Deserialize;

use crate::error::AppError;

/// Default interval between notification cycles, in hours.
pub const DEFAULT_NOTIFY_INTERVAL_HOURS: u64 = 9;

/// Longest accepted interval between notification cycles, in hours (one year).
pub const MAX_NOTIFY_INTERVAL_HOURS: u64 = 24 * 365;

/// Default timeout for the roster download, in seconds. Roster exports can be large.
pub const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 180;

/// Default timeout for a single notification POST, in seconds.
pub const DEFAULT_SINK_TIMEOUT_SECS: u64 = 30;

/// Global application configuration loaded from environment variables.
#[derive(Clone, Deserialize)]
pub struct AppConfig {
    /// Roster export endpoint (`CAVOS_URL`)
    pub source_url: String,

    /// Bearer token for the roster endpoint (`CAVOS_BEARER`)
    pub source_bearer: String,

    /// Notification delivery endpoint (`WORLD_URL`)
    pub sink_url: String,

    /// Bearer token for the notification endpoint (`WORLD_BEARER`)
    pub sink_bearer: String,

    /// Mini-app identifier sent with every notification (`APP_ID`)
    pub app_id: String,

    /// Hours between scheduled cycles (default: 9)
    pub notify_interval_hours: u64,

    /// Roster request timeout in seconds (default: 180)
    pub source_timeout_secs: u64,

    /// Notification request timeout in seconds (default: 30)
    pub sink_timeout_secs: u64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Every missing required key is reported in a single error so operators
    /// can fix the environment in one pass.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            source_url: lookup("CAVOS_URL").unwrap_or_default(),
            source_bearer: lookup("CAVOS_BEARER").unwrap_or_default(),
            sink_url: lookup("WORLD_URL").unwrap_or_default(),
            sink_bearer: lookup("WORLD_BEARER").unwrap_or_default(),
            app_id: lookup("APP_ID").unwrap_or_default(),
            notify_interval_hours: parse_positive(
                &lookup,
                "NOTIFY_INTERVAL_HOURS",
                DEFAULT_NOTIFY_INTERVAL_HOURS,
            )?,
            source_timeout_secs: parse_positive(
                &lookup,
                "SOURCE_TIMEOUT_SECS",
                DEFAULT_SOURCE_TIMEOUT_SECS,
            )?,
            sink_timeout_secs: parse_positive(
                &lookup,
                "SINK_TIMEOUT_SECS",
                DEFAULT_SINK_TIMEOUT_SECS,
            )?,
        };

        if config.notify_interval_hours > MAX_NOTIFY_INTERVAL_HOURS {
            return Err(AppError::Config(format!(
                "NOTIFY_INTERVAL_HOURS must be at most {MAX_NOTIFY_INTERVAL_HOURS}, got {}",
                config.notify_interval_hours
            )));
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that every required value is present and non-empty.
    pub fn validate(&self) -> Result<(), AppError> {
        let required = [
            ("CAVOS_URL", &self.source_url),
            ("CAVOS_BEARER", &self.source_bearer),
            ("WORLD_URL", &self.sink_url),
            ("WORLD_BEARER", &self.sink_bearer),
            ("APP_ID", &self.app_id),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::Config(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )))
        }
    }

    pub fn notify_interval(&self) -> Duration {
        Duration::from_secs(self.notify_interval_hours.saturating_mul(60 * 60))
    }

    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_secs)
    }

    pub fn sink_timeout(&self) -> Duration {
        Duration::from_secs(self.sink_timeout_secs)
    }
}

// Bearer tokens stay out of logs.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("source_url", &self.source_url)
            .field("source_bearer", &"<redacted>")
            .field("sink_url", &self.sink_url)
            .field("sink_bearer", &"<redacted>")
            .field("app_id", &self.app_id)
            .field("notify_interval_hours", &self.notify_interval_hours)
            .field("source_timeout_secs", &self.source_timeout_secs)
            .field("sink_timeout_secs", &self.sink_timeout_secs)
            .finish()
    }
}

fn parse_positive<F>(lookup: &F, key: &str, default: u64) -> Result<u64, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(0) | Err(_) => Err(AppError::Config(format!(
                "{key} must be a positive integer, got {raw:?}"
            ))),
            Ok(value) => Ok(value),
        },
    }
}
