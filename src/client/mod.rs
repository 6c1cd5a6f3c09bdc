//! NTRIP client implementation
//!
//! Client side of the relay: pulls RTCM correction streams from
//! upstream casters and reports rover positions back to them.

pub mod config;
pub mod source;

pub use config::SourceConfig;
pub use source::{SourceClient, SourceError, SourceEvent, SourceHandle, SourceStats};
