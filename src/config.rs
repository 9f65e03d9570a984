use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: usize = 4;
pub const DEFAULT_SEND_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime settings, read from `NIUNIU_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub max_connections: usize,
    pub send_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            send_interval: Duration::from_millis(DEFAULT_SEND_INTERVAL_MS),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr: SocketAddr = parse_var(&lookup, "NIUNIU_BIND_ADDR", DEFAULT_BIND_ADDR)?;
        let max_connections: usize = parse_var(
            &lookup,
            "NIUNIU_MAX_CONNECTIONS",
            &DEFAULT_MAX_CONNECTIONS.to_string(),
        )?;
        if max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                name: "NIUNIU_MAX_CONNECTIONS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        let send_interval_ms: u64 = parse_var(
            &lookup,
            "NIUNIU_SEND_INTERVAL_MS",
            &DEFAULT_SEND_INTERVAL_MS.to_string(),
        )?;

        Ok(Self {
            bind_addr,
            max_connections,
            send_interval: Duration::from_millis(send_interval_ms),
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let value = lookup(name).unwrap_or_else(|| default.to_string());
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            name,
            value: value.clone(),
            reason: e.to_string(),
        })
}
