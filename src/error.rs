//! Error types for the relay
//!
//! One error enum covers both protocol engines. Network loops handle
//! most of these locally (state-machine transition plus a log line);
//! only authentication outcomes and admin-operation failures cross the
//! crate boundary.

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for relay operations
#[derive(Debug, Error)]
pub enum Error {
    /// Credentials rejected: upstream caster answered 401, or a rover
    /// presented bad or inactive credentials
    #[error("authentication rejected")]
    AuthRejected,

    /// Malformed HTTP/NTRIP traffic: bad request line, unexpected
    /// status, truncated or oversized header section
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Socket-level failure: dial, read, write
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// An overall deadline elapsed (sourcetable probe)
    #[error("operation timed out")]
    Timeout,

    /// Mountpoint or station not known at request time
    #[error("not found: {0}")]
    NotFound(String),

    /// A relay cannot be started from the configured station record
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A repository read failed
    #[error("repository error: {0}")]
    Repository(String),
}

impl Error {
    /// Protocol error from anything displayable
    pub fn protocol(msg: impl Into<String>) -> Self {
        Error::Protocol(msg.into())
    }

    /// Repository error from an underlying store failure
    pub fn repository(msg: impl Into<String>) -> Self {
        Error::Repository(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Error::AuthRejected.to_string(), "authentication rejected");
        assert_eq!(
            Error::protocol("bad request line").to_string(),
            "protocol error: bad request line"
        );
        assert_eq!(
            Error::NotFound("VRS01".into()).to_string(),
            "not found: VRS01"
        );
    }

    #[test]
    fn test_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err: Error = io.into();
        assert!(matches!(err, Error::Transport(_)));
    }
}
