//! Repository contract
//!
//! The relay core reads station and rover records through this narrow
//! interface and never assumes transactions. Records returned from the
//! repository are treated as immutable snapshots.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::model::{Rover, Station, StationStatus};

pub use memory::MemoryRepository;

/// Persistence contract consumed by the relay core.
///
/// All calls may fail; read failures surface to the caller as
/// [`crate::Error::Repository`]. Status-update failures are logged and
/// swallowed by the supervisor, which stays the source of truth for
/// the running set.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Look up a station by its stable id
    async fn station_find_by_id(&self, id: i64) -> Result<Option<Station>>;

    /// Look up a station by its mountpoint name
    async fn station_find_by_name(&self, mountpoint: &str) -> Result<Option<Station>>;

    /// All stations with status active
    async fn station_find_active(&self) -> Result<Vec<Station>>;

    /// Persist a station's administrative status
    async fn station_update_status(&self, id: i64, status: StationStatus) -> Result<()>;

    /// Look up a rover account by login name
    async fn rover_find_by_username(&self, username: &str) -> Result<Option<Rover>>;

    /// Record a successful rover authentication
    async fn rover_touch_last_connection(&self, id: i64, at: DateTime<Utc>) -> Result<()>;
}
