//! Rover records
//!
//! A rover is a GNSS receiver account that may subscribe to correction
//! streams. Activity is a derived property of the status flag and the
//! optional validity window, never stored.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Administrative state of a rover account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoverStatus {
    Active,
    Inactive,
}

/// GNSS fix quality reported by a rover in its GGA sentences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GnssQuality {
    /// Quality digit 1
    Single,
    /// Quality digit 2
    Dgps,
    /// Quality digit 4
    RtkFixed,
    /// Quality digit 5
    RtkFloat,
    /// Anything else
    NotAvailable,
}

impl GnssQuality {
    /// Map the GGA fix-quality digit to a label
    pub fn from_digit(digit: u8) -> Self {
        match digit {
            1 => GnssQuality::Single,
            2 => GnssQuality::Dgps,
            4 => GnssQuality::RtkFixed,
            5 => GnssQuality::RtkFloat,
            _ => GnssQuality::NotAvailable,
        }
    }

    /// Human-readable label used in session reports
    pub fn label(&self) -> &'static str {
        match self {
            GnssQuality::Single => "Single",
            GnssQuality::Dgps => "DGPS",
            GnssQuality::RtkFixed => "RTK Fixed",
            GnssQuality::RtkFloat => "RTK Float",
            GnssQuality::NotAvailable => "N/A",
        }
    }
}

/// A rover account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rover {
    /// Stable identifier
    pub id: i64,

    /// Unique login name
    pub username: String,

    /// Salted one-way password hash (PHC string)
    pub password_hash: String,

    /// Owning user account
    pub user_id: i64,

    /// Station this rover is assigned to, if any
    pub station_id: Option<i64>,

    /// Administrative state
    pub status: RoverStatus,

    /// First day the account is valid, inclusive
    pub start_date: Option<NaiveDate>,

    /// Last day the account is valid, inclusive
    pub end_date: Option<NaiveDate>,

    /// Last successful authentication
    pub last_connection: Option<DateTime<Utc>>,
}

impl Rover {
    /// Whether the account can authenticate today.
    ///
    /// True iff status is active and `today` falls inside the optional
    /// validity window (absent bounds do not constrain).
    pub fn is_currently_active(&self, today: NaiveDate) -> bool {
        if self.status != RoverStatus::Active {
            return false;
        }
        if let Some(start) = self.start_date {
            if today < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if today > end {
                return false;
            }
        }
        true
    }
}
