//! Relay configuration
//!
//! Environment-driven settings for the caster listener plus the caster
//! identity advertised in the sourcetable CAS/NET lines.

use std::net::{IpAddr, SocketAddr};

use crate::error::{Error, Result};

/// Environment variable for the caster bind host
pub const ENV_CASTER_HOST: &str = "NTRIP_CASTER_HOST";
/// Environment variable for the caster bind port
pub const ENV_CASTER_PORT: &str = "NTRIP_CASTER_PORT";
/// Environment variable for the caster operator name
pub const ENV_CASTER_OPERATOR: &str = "NTRIP_CASTER_OPERATOR";

/// Default caster port
pub const DEFAULT_CASTER_PORT: u16 = 9001;
/// Default operator name advertised in the sourcetable
pub const DEFAULT_OPERATOR: &str = "NTRIP Relay Service";

/// Software identifier sent in User-Agent / Server headers and the
/// sourcetable generator field
pub const SERVER_IDENT: &str = "NTRIP-Relay/1.0";

/// Top-level relay configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Address the caster listener binds to
    pub bind_addr: SocketAddr,

    /// Operator name for the sourcetable CAS line
    pub operator: String,

    /// Country code for the CAS line
    pub country: String,

    /// Network identifier for the NET line
    pub network: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new("0.0.0.0".parse().unwrap(), DEFAULT_CASTER_PORT),
            operator: DEFAULT_OPERATOR.to_string(),
            country: "VNM".to_string(),
            network: "CORS".to_string(),
        }
    }
}

impl RelayConfig {
    /// Build configuration from the environment, falling back to
    /// defaults for unset variables.
    ///
    /// `NTRIP_CASTER_HOST` (default `0.0.0.0`), `NTRIP_CASTER_PORT`
    /// (default `9001`), `NTRIP_CASTER_OPERATOR` (default
    /// "NTRIP Relay Service").
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var(ENV_CASTER_HOST) {
            let ip: IpAddr = host
                .parse()
                .map_err(|_| Error::Configuration(format!("invalid {ENV_CASTER_HOST}: {host}")))?;
            config.bind_addr.set_ip(ip);
        }

        if let Ok(port) = std::env::var(ENV_CASTER_PORT) {
            let port: u16 = port
                .parse()
                .map_err(|_| Error::Configuration(format!("invalid {ENV_CASTER_PORT}: {port}")))?;
            if port == 0 {
                return Err(Error::Configuration(format!(
                    "invalid {ENV_CASTER_PORT}: 0"
                )));
            }
            config.bind_addr.set_port(port);
        }

        if let Ok(operator) = std::env::var(ENV_CASTER_OPERATOR) {
            config.operator = operator;
        }

        Ok(config)
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the operator name
    pub fn operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = operator.into();
        self
    }

    /// Set the country code
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Set the network identifier
    pub fn network(mut self, network: impl Into<String>) -> Self {
        self.network = network.into();
        self
    }
}
