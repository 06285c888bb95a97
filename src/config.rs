use std::time::Duration;

use crate::error::ServerError;

/// Server settings, read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address the HTTP server binds to. Default: 127.0.0.1:8080.
    pub bind_address: String,
    /// How often closed connections are swept from the registry. Default: 30s.
    pub sweep_interval: Duration,
    /// `env_logger` filter used when `RUST_LOG` is unset. Default: info.
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            sweep_interval: Duration::from_secs(30),
            log_filter: "info".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ServerError> {
        let mut config = Self::default();

        if let Some(addr) = lookup("CHESS_BIND_ADDR") {
            if addr.trim().is_empty() {
                return Err(ServerError::InvalidConfig {
                    reason: "CHESS_BIND_ADDR is empty".to_string(),
                });
            }
            config.bind_address = addr.trim().to_string();
        }

        if let Some(secs) = lookup("CHESS_SWEEP_INTERVAL_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| ServerError::InvalidConfig {
                reason: format!("CHESS_SWEEP_INTERVAL_SECS must be a whole number, got {:?}", secs),
            })?;
            if secs == 0 {
                return Err(ServerError::InvalidConfig {
                    reason: "CHESS_SWEEP_INTERVAL_SECS must be positive".to_string(),
                });
            }
            config.sweep_interval = Duration::from_secs(secs);
        }

        if let Some(filter) = lookup("CHESS_LOG") {
            config.log_filter = filter;
        }

        Ok(config)
    }
}
