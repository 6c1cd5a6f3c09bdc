//! # ntrip-relay
//!
//! An NTRIP relay: the crate is simultaneously a *client* of upstream
//! NTRIP casters, pulling RTCM correction streams per configured
//! station, and a *caster* re-serving those streams by mountpoint to
//! authenticated GNSS rovers.
//!
//! ## Architecture
//!
//! ```text
//! upstream caster ──► SourceClient ──► RelaySupervisor ──► MountpointRegistry
//!                                                               │
//!                                              NtripCaster ◄────┤ fan-out
//!                                               (accept,        ▼
//!                                                auth)     rover sockets
//! ```
//!
//! - [`client::SourceClient`] dials one upstream mountpoint, handles
//!   the `ICY 200 OK` handshake, relays RTCM opaquely and reconnects
//!   with an attempt budget.
//! - [`caster::NtripCaster`] accepts rover connections, serves the
//!   sourcetable, authenticates against the [`repository::Repository`]
//!   and fans frames out per mountpoint with evict-on-backpressure.
//! - [`supervisor::RelaySupervisor`] owns the running set, keeps it
//!   converged with the stations marked active, and exposes the
//!   admin-facing surface (start, stop, sync, status, probe).
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ntrip_relay::caster::NtripCaster;
//! use ntrip_relay::config::RelayConfig;
//! use ntrip_relay::repository::{MemoryRepository, Repository};
//! use ntrip_relay::supervisor::RelaySupervisor;
//!
//! # async fn example() -> ntrip_relay::Result<()> {
//! let repository: Arc<dyn Repository> = Arc::new(MemoryRepository::new());
//! let caster = Arc::new(NtripCaster::new(RelayConfig::from_env()?, repository.clone()));
//! caster.start().await?;
//!
//! let supervisor = RelaySupervisor::new(repository, Arc::clone(&caster));
//! supervisor.sync_with_repository().await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod caster;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod nmea;
pub mod repository;
pub mod sourcetable;
pub mod supervisor;

pub use caster::{NtripCaster, RoverSessionInfo};
pub use client::{SourceClient, SourceConfig, SourceHandle};
pub use config::RelayConfig;
pub use error::{Error, Result};
pub use model::{Rover, Station, StationStatus};
pub use repository::Repository;
pub use sourcetable::MountpointInfo;
pub use supervisor::RelaySupervisor;
