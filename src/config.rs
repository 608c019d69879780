//! Server configuration.

use std::time::Duration;

/// Runtime configuration for the service instance.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub listen_addr: String,
    /// Session-creation requests admitted per address per minute.
    pub rate_limit_per_minute: u32,
    /// Budget for any single storage call before it fails the request.
    pub storage_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            rate_limit_per_minute: 10,
            storage_timeout: Duration::from_millis(2000),
        }
    }
}

impl ServerConfig {
    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            listen_addr: std::env::var("GRIDPOP_LISTEN_ADDR")
                .unwrap_or(defaults.listen_addr),
            rate_limit_per_minute: std::env::var("GRIDPOP_RATE_LIMIT_PER_MINUTE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.rate_limit_per_minute),
            storage_timeout: std::env::var("GRIDPOP_STORAGE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.storage_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.rate_limit_per_minute, 10);
        assert_eq!(config.storage_timeout, Duration::from_millis(2000));
    }
}
