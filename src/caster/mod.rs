//! NTRIP caster implementation
//!
//! Server side of the relay: accepts rover connections, serves the
//! sourcetable, authenticates subscribers and fans RTCM frames out per
//! mountpoint.

pub mod http;
pub mod registry;
pub mod server;
pub mod session;

pub use registry::MountpointRegistry;
pub use server::NtripCaster;
pub use session::{Position, RoverSession, RoverSessionInfo};
