//! Mountpoint registry for RTCM fan-out
//!
//! The registry maps mountpoint names to live stations and routes
//! correction frames from source clients to subscribed rovers.
//!
//! # Architecture
//!
//! ```text
//!                    Arc<MountpointRegistry>
//!                ┌────────────────────────────┐
//!                │ mounts: HashMap<name,      │
//!                │   MountEntry {             │
//!                │     station snapshot,      │
//!                │     subscribers: {id→tx},  │
//!                │   }                        │
//!                │ >                          │
//!                └────────────┬───────────────┘
//!                             │
//!        ┌────────────────────┼────────────────────┐
//!        ▼                    ▼                    ▼
//!   [SourceClient]       [Rover task]         [Rover task]
//!   broadcast()          rx.recv()            rx.recv()
//!        │                    │                    │
//!        └──► try_send ──────►└── write ──► TCP ──►┘
//! ```
//!
//! # Backpressure
//!
//! RTCM streams are a few KB/s; there is no per-subscriber queue worth
//! speaking of. Each subscriber gets a small bounded channel and a
//! `try_send`: a rover that cannot take an immediate write is evicted,
//! never buffered behind.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::Station;

use super::session::{RoverSession, RoverSessionInfo};

/// Frames a subscriber may fall behind before eviction
const SUBSCRIBER_QUEUE: usize = 32;

struct Subscriber {
    session: Arc<RoverSession>,
    tx: mpsc::Sender<Bytes>,
}

/// A live station: cached metadata plus its subscriber set
struct MountEntry {
    station: Station,
    subscribers: HashMap<Uuid, Subscriber>,
}

/// Registry of live stations keyed by mountpoint name
///
/// Thread-safe via `RwLock`. Broadcasting and subscriber-count checks
/// are the hot path and take the outer lock for reading only.
pub struct MountpointRegistry {
    mounts: RwLock<HashMap<String, Arc<RwLock<MountEntry>>>>,
}

impl MountpointRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            mounts: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace a mountpoint's station snapshot.
    ///
    /// An existing entry keeps its subscribers; only the metadata is
    /// refreshed.
    pub async fn register(&self, station: Station) {
        let mut mounts = self.mounts.write().await;
        let name = station.mountpoint.clone();

        if let Some(entry_arc) = mounts.get(&name) {
            let mut entry = entry_arc.write().await;
            entry.station = station;
            tracing::debug!(mountpoint = %name, "Mountpoint metadata refreshed");
        } else {
            mounts.insert(
                name.clone(),
                Arc::new(RwLock::new(MountEntry {
                    station,
                    subscribers: HashMap::new(),
                })),
            );
            tracing::info!(mountpoint = %name, "Mountpoint registered");
        }
    }

    /// Remove a mountpoint, dropping every subscriber.
    ///
    /// Dropping the senders closes each subscriber's channel; their
    /// connection tasks observe the close and destroy the sockets.
    pub async fn unregister(&self, name: &str) -> bool {
        let removed = self.mounts.write().await.remove(name);
        match removed {
            Some(entry_arc) => {
                let mut entry = entry_arc.write().await;
                let dropped = entry.subscribers.len();
                entry.subscribers.clear();
                tracing::info!(
                    mountpoint = %name,
                    dropped_subscribers = dropped,
                    "Mountpoint unregistered"
                );
                true
            }
            None => false,
        }
    }

    /// Whether a mountpoint is registered
    pub async fn contains(&self, name: &str) -> bool {
        self.mounts.read().await.contains_key(name)
    }

    /// Registered mountpoint names
    pub async fn mount_names(&self) -> Vec<String> {
        self.mounts.read().await.keys().cloned().collect()
    }

    /// Station snapshots for the sourcetable
    pub async fn stations(&self) -> Vec<Station> {
        let mounts = self.mounts.read().await;
        let mut stations = Vec::with_capacity(mounts.len());
        for entry_arc in mounts.values() {
            stations.push(entry_arc.read().await.station.clone());
        }
        stations.sort_by(|a, b| a.mountpoint.cmp(&b.mountpoint));
        stations
    }

    /// Add a rover session to a mountpoint's subscriber set.
    ///
    /// Returns the receiving end of the session's frame channel. The
    /// session sees only frames broadcast after this call returns.
    pub async fn subscribe(&self, session: Arc<RoverSession>) -> Result<mpsc::Receiver<Bytes>> {
        let mounts = self.mounts.read().await;
        let entry_arc = mounts
            .get(&session.mountpoint)
            .ok_or_else(|| Error::NotFound(session.mountpoint.clone()))?;

        let (tx, rx) = mpsc::channel(SUBSCRIBER_QUEUE);
        let mut entry = entry_arc.write().await;
        tracing::info!(
            mountpoint = %session.mountpoint,
            session = %session.id,
            username = %session.username,
            subscribers = entry.subscribers.len() + 1,
            "Subscriber added"
        );
        entry.subscribers.insert(session.id, Subscriber { session, tx });

        Ok(rx)
    }

    /// Remove one session from a mountpoint, if still present
    pub async fn remove_session(&self, mountpoint: &str, id: Uuid) {
        let mounts = self.mounts.read().await;
        if let Some(entry_arc) = mounts.get(mountpoint) {
            let mut entry = entry_arc.write().await;
            if entry.subscribers.remove(&id).is_some() {
                tracing::debug!(
                    mountpoint = %mountpoint,
                    session = %id,
                    subscribers = entry.subscribers.len(),
                    "Subscriber removed"
                );
            }
        }
    }

    /// Write a frame to every writable subscriber of a mountpoint.
    ///
    /// Subscribers whose channel is full or closed are evicted on the
    /// spot. Returns the number of successful deliveries; an
    /// unregistered mountpoint counts as zero.
    pub async fn broadcast(&self, mountpoint: &str, frame: Bytes) -> usize {
        let mounts = self.mounts.read().await;
        let entry_arc = match mounts.get(mountpoint) {
            Some(entry) => entry,
            None => return 0,
        };

        let mut entry = entry_arc.write().await;
        let mut evicted = Vec::new();
        let mut delivered = 0;

        for (id, subscriber) in entry.subscribers.iter() {
            match subscriber.tx.try_send(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(_) => evicted.push(*id),
            }
        }

        for id in evicted {
            if let Some(subscriber) = entry.subscribers.remove(&id) {
                tracing::warn!(
                    mountpoint = %mountpoint,
                    session = %id,
                    username = %subscriber.session.username,
                    "Subscriber evicted: not writable"
                );
            }
        }

        delivered
    }

    /// Subscriber count for one mountpoint
    pub async fn subscriber_count(&self, mountpoint: &str) -> usize {
        let mounts = self.mounts.read().await;
        match mounts.get(mountpoint) {
            Some(entry_arc) => entry_arc.read().await.subscribers.len(),
            None => 0,
        }
    }

    /// Snapshots of every rover session across all mountpoints
    pub async fn sessions(&self) -> Vec<RoverSessionInfo> {
        let mounts = self.mounts.read().await;
        let mut sessions = Vec::new();
        for entry_arc in mounts.values() {
            let entry = entry_arc.read().await;
            sessions.extend(entry.subscribers.values().map(|s| s.session.info()));
        }
        sessions.sort_by(|a, b| a.connected_at.cmp(&b.connected_at));
        sessions
    }

    /// Drop every mountpoint and subscriber (caster shutdown)
    pub async fn clear(&self) {
        let mut mounts = self.mounts.write().await;
        let count = mounts.len();
        mounts.clear();
        if count > 0 {
            tracing::info!(mountpoints = count, "Registry cleared");
        }
    }
}

impl Default for MountpointRegistry {
    fn default() -> Self {
        Self::new()
    }
}
