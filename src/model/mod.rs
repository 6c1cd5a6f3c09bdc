//! Domain records
//!
//! Stations describe upstream correction sources; rovers are the
//! authenticated consumers. Both are owned by the repository and
//! treated as immutable snapshots once read.

pub mod rover;
pub mod station;

pub use rover::{GnssQuality, Rover, RoverStatus};
pub use station::{Station, StationStatus, SourcetableMeta};
