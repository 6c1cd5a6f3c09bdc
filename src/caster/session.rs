//! Rover sessions
//!
//! One session per authenticated, streaming rover connection. Identity
//! is fixed at accept time; the GNSS state is updated by the
//! connection's read loop as GGA sentences arrive and snapshotted for
//! the admin surface.

use std::net::SocketAddr;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::GnssQuality;
use crate::nmea::GgaFix;

/// A reported rover position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
}

#[derive(Debug)]
struct GnssState {
    last_position: Option<Position>,
    quality: GnssQuality,
    last_update: Option<DateTime<Utc>>,
}

/// A live rover connection
#[derive(Debug)]
pub struct RoverSession {
    /// Session identity
    pub id: Uuid,
    /// Rover record id looked up at connect time
    pub rover_id: i64,
    /// Rover login name
    pub username: String,
    /// Mountpoint the session is subscribed to
    pub mountpoint: String,
    /// Remote peer address
    pub peer_addr: SocketAddr,
    /// Accept time
    pub connected_at: DateTime<Utc>,

    gnss: RwLock<GnssState>,
}

impl RoverSession {
    /// Mint a session for an authenticated connection
    pub fn new(rover_id: i64, username: String, mountpoint: String, peer_addr: SocketAddr) -> Self {
        Self {
            id: Uuid::new_v4(),
            rover_id,
            username,
            mountpoint,
            peer_addr,
            connected_at: Utc::now(),
            gnss: RwLock::new(GnssState {
                last_position: None,
                quality: GnssQuality::NotAvailable,
                last_update: None,
            }),
        }
    }

    /// Record a position fix parsed from the rover's GGA
    pub fn record_fix(&self, fix: GgaFix) {
        let mut gnss = self.gnss.write().unwrap();
        gnss.last_position = Some(Position {
            lat: fix.lat,
            lon: fix.lon,
            alt: fix.alt,
        });
        gnss.quality = fix.quality;
        gnss.last_update = Some(Utc::now());
    }

    /// Snapshot for the admin surface
    pub fn info(&self) -> RoverSessionInfo {
        let gnss = self.gnss.read().unwrap();
        RoverSessionInfo {
            session_id: self.id,
            rover_id: self.rover_id,
            username: self.username.clone(),
            mountpoint: self.mountpoint.clone(),
            ip: self.peer_addr.ip().to_string(),
            connected_at: self.connected_at,
            gnss_status: gnss.quality.label().to_string(),
            last_position: gnss.last_position,
            last_position_update: gnss.last_update,
        }
    }
}

/// Point-in-time view of a rover session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoverSessionInfo {
    pub session_id: Uuid,
    pub rover_id: i64,
    pub username: String,
    pub mountpoint: String,
    pub ip: String,
    pub connected_at: DateTime<Utc>,
    pub gnss_status: String,
    pub last_position: Option<Position>,
    pub last_position_update: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> RoverSession {
        RoverSession::new(
            7,
            "rover1".into(),
            "VRS01".into(),
            "203.0.113.5:40120".parse().unwrap(),
        )
    }

    #[test]
    fn test_new_session_has_no_fix() {
        let info = session().info();

        assert_eq!(info.username, "rover1");
        assert_eq!(info.mountpoint, "VRS01");
        assert_eq!(info.ip, "203.0.113.5");
        assert_eq!(info.gnss_status, "N/A");
        assert!(info.last_position.is_none());
        assert!(info.last_position_update.is_none());
    }

    #[test]
    fn test_record_fix_updates_snapshot() {
        let session = session();
        session.record_fix(GgaFix {
            lat: 21.0285,
            lon: 105.8542,
            alt: 12.0,
            quality: GnssQuality::RtkFixed,
        });

        let info = session.info();
        assert_eq!(info.gnss_status, "RTK Fixed");
        let position = info.last_position.unwrap();
        assert_eq!(position.lat, 21.0285);
        assert_eq!(position.lon, 105.8542);
        assert!(info.last_position_update.is_some());
    }

    #[test]
    fn test_session_ids_unique() {
        assert_ne!(session().id, session().id);
    }
}
