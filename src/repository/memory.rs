//! In-memory repository
//!
//! Backs the tests and the demo binary. The maps are guarded by a
//! single `RwLock` each; the surface matches whatever relational store
//! the deployment wires in.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::Result;
use crate::model::{Rover, Station, StationStatus};

use super::Repository;

/// Repository keeping all records in process memory
#[derive(Default)]
pub struct MemoryRepository {
    stations: RwLock<HashMap<i64, Station>>,
    rovers: RwLock<HashMap<i64, Rover>>,
}

impl MemoryRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a station
    pub async fn seed_station(&self, station: Station) {
        self.stations.write().await.insert(station.id, station);
    }

    /// Insert or replace a rover
    pub async fn seed_rover(&self, rover: Rover) {
        self.rovers.write().await.insert(rover.id, rover);
    }

    /// Remove a station
    pub async fn remove_station(&self, id: i64) {
        self.stations.write().await.remove(&id);
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn station_find_by_id(&self, id: i64) -> Result<Option<Station>> {
        Ok(self.stations.read().await.get(&id).cloned())
    }

    async fn station_find_by_name(&self, mountpoint: &str) -> Result<Option<Station>> {
        Ok(self
            .stations
            .read()
            .await
            .values()
            .find(|s| s.mountpoint == mountpoint)
            .cloned())
    }

    async fn station_find_active(&self) -> Result<Vec<Station>> {
        Ok(self
            .stations
            .read()
            .await
            .values()
            .filter(|s| s.is_active())
            .cloned()
            .collect())
    }

    async fn station_update_status(&self, id: i64, status: StationStatus) -> Result<()> {
        if let Some(station) = self.stations.write().await.get_mut(&id) {
            station.status = status;
        }
        Ok(())
    }

    async fn rover_find_by_username(&self, username: &str) -> Result<Option<Rover>> {
        Ok(self
            .rovers
            .read()
            .await
            .values()
            .find(|r| r.username == username)
            .cloned())
    }

    async fn rover_touch_last_connection(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
        if let Some(rover) = self.rovers.write().await.get_mut(&id) {
            rover.last_connection = Some(at);
        }
        Ok(())
    }
}
