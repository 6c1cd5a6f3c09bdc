//! Station records
//!
//! A station binds a local mountpoint name to one upstream caster
//! endpoint, plus the metadata advertised for it in the sourcetable.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Administrative state of a station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationStatus {
    /// Relay should be running
    Active,
    /// Relay should be stopped
    Inactive,
}

/// Sourcetable metadata carried per station
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcetableMeta {
    /// Carrier phase information field (STR field 6)
    pub carrier: String,
    /// Navigation systems field (STR field 7)
    pub nav_system: String,
    /// Network identifier (STR field 8)
    pub network: String,
    /// Three-letter country code (STR field 9)
    pub country: String,
}

impl Default for SourcetableMeta {
    fn default() -> Self {
        Self {
            carrier: "2".to_string(),
            nav_system: "GPS+GLO+GAL+BDS".to_string(),
            network: "CORS".to_string(),
            country: "VNM".to_string(),
        }
    }
}

/// A relay station: one local mountpoint fed by one upstream source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    /// Stable identifier
    pub id: i64,

    /// Unique mountpoint name served by the caster
    pub mountpoint: String,

    /// Human-readable description
    pub description: String,

    /// Reference latitude in decimal degrees
    pub latitude: f64,

    /// Reference longitude in decimal degrees
    pub longitude: f64,

    /// Upstream caster host
    pub source_host: String,

    /// Upstream caster port
    pub source_port: u16,

    /// Mountpoint to request on the upstream caster
    pub source_mountpoint: String,

    /// Optional upstream credentials
    pub source_username: Option<String>,
    pub source_password: Option<String>,

    /// Administrative state
    pub status: StationStatus,

    /// Sourcetable metadata
    pub meta: SourcetableMeta,
}

impl Station {
    /// Validate the record before a relay is started from it.
    ///
    /// Checks the §3 field invariants: mountpoint present, coordinates
    /// in range, port non-zero, upstream endpoint present.
    pub fn validate(&self) -> Result<()> {
        if self.mountpoint.trim().is_empty() {
            return Err(Error::Configuration("station has no mountpoint name".into()));
        }
        if self.source_host.trim().is_empty() {
            return Err(Error::Configuration(format!(
                "station {} has no source host",
                self.mountpoint
            )));
        }
        if self.source_mountpoint.trim().is_empty() {
            return Err(Error::Configuration(format!(
                "station {} has no source mountpoint",
                self.mountpoint
            )));
        }
        if self.source_port == 0 {
            return Err(Error::Configuration(format!(
                "station {} has port 0",
                self.mountpoint
            )));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::Configuration(format!(
                "station {} latitude out of range: {}",
                self.mountpoint, self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::Configuration(format!(
                "station {} longitude out of range: {}",
                self.mountpoint, self.longitude
            )));
        }
        Ok(())
    }

    /// Whether the station is administratively active
    pub fn is_active(&self) -> bool {
        self.status == StationStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station() -> Station {
        Station {
            id: 1,
            mountpoint: "VRS01".into(),
            description: "Test station".into(),
            latitude: 21.0285,
            longitude: 105.8542,
            source_host: "caster.example.com".into(),
            source_port: 2101,
            source_mountpoint: "RTCM32".into(),
            source_username: None,
            source_password: None,
            status: StationStatus::Active,
            meta: SourcetableMeta::default(),
        }
    }

    #[test]
    fn test_valid_station() {
        assert!(station().validate().is_ok());
    }

    #[test]
    fn test_latitude_out_of_range() {
        let mut s = station();
        s.latitude = 91.0;
        assert!(matches!(s.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_longitude_out_of_range() {
        let mut s = station();
        s.longitude = -180.5;
        assert!(matches!(s.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_empty_mountpoint() {
        let mut s = station();
        s.mountpoint = "  ".into();
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_zero_port() {
        let mut s = station();
        s.source_port = 0;
        assert!(s.validate().is_err());
    }
}
