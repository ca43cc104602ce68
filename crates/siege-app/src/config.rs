//! Runner configuration from environment variables.

use std::env;

/// Runner configuration loaded from environment variables.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Simulation seed.
    pub seed: u64,
    /// Log filter used when `RUST_LOG` is unset (trace, debug, info, warn, error).
    pub log_level: String,
    /// Pace ticks at wall-clock speed instead of running flat out.
    pub realtime: bool,
    /// Stop after this many ticks. `None` runs until the input closes.
    pub max_ticks: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            log_level: "info".to_string(),
            realtime: true,
            max_ticks: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// unset variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let seed = match lookup("ARENA_SEED") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid("ARENA_SEED", v))?,
            None => defaults.seed,
        };
        let realtime = match lookup("ARENA_REALTIME") {
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid("ARENA_REALTIME", v))?,
            None => defaults.realtime,
        };
        let max_ticks = match lookup("ARENA_MAX_TICKS") {
            Some(v) => Some(v.trim().parse().map_err(|_| ConfigError::Invalid("ARENA_MAX_TICKS", v))?),
            None => defaults.max_ticks,
        };

        Ok(Self {
            seed,
            log_level: lookup("ARENA_LOG").unwrap_or(defaults.log_level),
            realtime,
            max_ticks,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {0}: {1:?}")]
    Invalid(&'static str, String),
}
