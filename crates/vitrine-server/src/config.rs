//! Server settings.
//!
//! Defaults can be overridden with `VITRINE_BIND` and
//! `VITRINE_CHANNEL_CAPACITY`.

use std::net::{AddrParseError, SocketAddr};
use thiserror::Error;

pub const DEFAULT_BIND: &str = "0.0.0.0:3001";
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

pub const BIND_ENV: &str = "VITRINE_BIND";
pub const CHANNEL_CAPACITY_ENV: &str = "VITRINE_CHANNEL_CAPACITY";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid VITRINE_BIND value {value:?}: {source}")]
    InvalidBind { value: String, source: AddrParseError },
    #[error("Invalid VITRINE_CHANNEL_CAPACITY value {0:?}: expected a positive integer")]
    InvalidChannelCapacity(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Address the HTTP and WebSocket listener binds to.
    pub bind: SocketAddr,
    /// Events buffered per subscriber before it is considered lagging.
    pub channel_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3001)),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl Settings {
    /// Defaults overridden by the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut settings = Settings::default();

        if let Some(value) = lookup(BIND_ENV) {
            settings.bind = value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidBind { value, source })?;
        }

        if let Some(value) = lookup(CHANNEL_CAPACITY_ENV) {
            settings.channel_capacity = match value.trim().parse::<usize>() {
                Ok(capacity) if capacity > 0 => capacity,
                _ => return Err(ConfigError::InvalidChannelCapacity(value)),
            };
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.bind.to_string(), DEFAULT_BIND);
        assert_eq!(settings.channel_capacity, 256);
    }

    #[test]
    fn environment_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            (BIND_ENV, "127.0.0.1:8080"),
            (CHANNEL_CAPACITY_ENV, " 16 "),
        ]))
        .unwrap();
        assert_eq!(settings.bind, SocketAddr::from(([127, 0, 0, 1], 8080)));
        assert_eq!(settings.channel_capacity, 16);
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = Settings::from_lookup(lookup(&[(BIND_ENV, "localhost")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBind { ref value, .. } if value == "localhost"));

        for bad in ["0", "-1", "lots"] {
            let err = Settings::from_lookup(lookup(&[(CHANNEL_CAPACITY_ENV, bad)])).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidChannelCapacity(_)));
        }
    }
}
