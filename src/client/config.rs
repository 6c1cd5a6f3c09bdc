//! Source client configuration

use std::time::Duration;

/// Configuration for one upstream NTRIP connection
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Upstream caster host
    pub host: String,

    /// Upstream caster port
    pub port: u16,

    /// Mountpoint to request
    pub mountpoint: String,

    /// Optional Basic credentials
    pub username: Option<String>,
    pub password: Option<String>,

    /// Read timeout; no bytes for this long counts as a dead link
    pub read_timeout: Duration,

    /// Delay between reconnect attempts
    pub reconnect_interval: Duration,

    /// Consecutive failed attempts before giving up
    pub max_reconnect_attempts: u32,
}

impl SourceConfig {
    /// Create a config for the given endpoint with default timing
    pub fn new(host: impl Into<String>, port: u16, mountpoint: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            mountpoint: mountpoint.into(),
            username: None,
            password: None,
            read_timeout: Duration::from_secs(30),
            reconnect_interval: Duration::from_secs(5),
            max_reconnect_attempts: 10,
        }
    }

    /// Set Basic credentials
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the read timeout
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the reconnect interval
    pub fn reconnect_interval(mut self, interval: Duration) -> Self {
        self.reconnect_interval = interval;
        self
    }

    /// Set the reconnect attempt budget
    pub fn max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SourceConfig::new("caster.example.com", 2101, "RTCM32");

        assert_eq!(config.read_timeout, Duration::from_secs(30));
        assert_eq!(config.reconnect_interval, Duration::from_secs(5));
        assert_eq!(config.max_reconnect_attempts, 10);
        assert!(config.username.is_none());
    }

    #[test]
    fn test_builder() {
        let config = SourceConfig::new("h", 2101, "M")
            .credentials("user", "pass")
            .read_timeout(Duration::from_secs(5))
            .reconnect_interval(Duration::from_millis(100))
            .max_reconnect_attempts(3);

        assert_eq!(config.username.as_deref(), Some("user"));
        assert_eq!(config.password.as_deref(), Some("pass"));
        assert_eq!(config.max_reconnect_attempts, 3);
    }
}
