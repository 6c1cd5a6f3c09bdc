//! Relay supervision
//!
//! The supervisor owns all source sessions and reconciles them against
//! the repository; the probe discovers what remote casters offer.

pub mod probe;
pub mod relay;

pub use probe::{probe_source, probe_with_deadline, PROBE_TIMEOUT};
pub use relay::{
    RelayStatusReport, RelaySummary, RelaySupervisor, StartOutcome, StationStatusReport,
    StopOutcome, DATA_LIVENESS_WINDOW,
};
