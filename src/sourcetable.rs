//! NTRIP sourcetable rendering and parsing
//!
//! The caster answers `GET /` with a sourcetable enumerating its
//! mountpoints; the probe parses the same document off a remote
//! caster. Both directions use the semicolon-joined STR record layout.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::config::{RelayConfig, SERVER_IDENT};
use crate::model::Station;

/// STR format field advertised for every relayed stream
const STREAM_FORMAT: &str = "RTCM 3.2";
/// STR format-details field
const FORMAT_DETAILS: &str = "1004(1),1005/1006(5),1019(5),1020(5)";
/// STR bitrate field
const BITRATE: &str = "2400";

/// One mountpoint record from a sourcetable STR line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MountpointInfo {
    /// Mountpoint name (STR field 1)
    pub name: String,
    /// Source identifier (STR field 2)
    pub identifier: String,
    /// Data format, e.g. "RTCM 3.2"
    pub format: String,
    /// Navigation systems
    pub nav_system: String,
    /// Network name
    pub network: String,
    /// Country code
    pub country: String,
    /// Latitude in decimal degrees, if the field parsed
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees, if the field parsed
    pub longitude: Option<f64>,
    /// Whether the caster wants a GGA sentence from clients
    pub nmea_required: bool,
}

/// Render the full `GET /` response: status line, headers and body.
pub fn render_sourcetable(stations: &[Station], config: &RelayConfig) -> Bytes {
    let body = render_body(stations, config);
    let response = format!(
        "SOURCETABLE 200 OK\r\nServer: {SERVER_IDENT}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    Bytes::from(response)
}

/// Render the sourcetable body: STR lines, one CAS and one NET line,
/// then the `ENDSOURCETABLE` terminator.
pub fn render_body(stations: &[Station], config: &RelayConfig) -> String {
    let mut body = String::new();

    for station in stations {
        if !station.latitude.is_finite() || !station.longitude.is_finite() {
            continue;
        }
        body.push_str(&format!(
            "STR;{name};{name};{STREAM_FORMAT};{FORMAT_DETAILS};{carrier};{nav};{net};{country};{lat:.4};{lon:.4};1;1;{SERVER_IDENT};none;B;N;{BITRATE}\r\n",
            name = station.mountpoint,
            carrier = station.meta.carrier,
            nav = station.meta.nav_system,
            net = station.meta.network,
            country = station.meta.country,
            lat = station.latitude,
            lon = station.longitude,
        ));
    }

    let (centroid_lat, centroid_lon) = centroid(stations);
    body.push_str(&format!(
        "CAS;{host};{port};{SERVER_IDENT};{operator};{country};{centroid_lat:.2};{centroid_lon:.2}\r\n",
        host = config.bind_addr.ip(),
        port = config.bind_addr.port(),
        operator = config.operator,
        country = config.country,
    ));
    body.push_str(&format!(
        "NET;{net};{operator};B;N;;;;\r\n",
        net = config.network,
        operator = config.operator,
    ));
    body.push_str("ENDSOURCETABLE\r\n");

    body
}

/// Mean station position, (0, 0) when no station carries one
fn centroid(stations: &[Station]) -> (f64, f64) {
    let positions: Vec<(f64, f64)> = stations
        .iter()
        .filter(|s| s.latitude.is_finite() && s.longitude.is_finite())
        .map(|s| (s.latitude, s.longitude))
        .collect();
    if positions.is_empty() {
        return (0.0, 0.0);
    }
    let n = positions.len() as f64;
    (
        positions.iter().map(|p| p.0).sum::<f64>() / n,
        positions.iter().map(|p| p.1).sum::<f64>() / n,
    )
}

/// Parse the STR lines out of a sourcetable body.
///
/// Lines other than `STR;` records are skipped; records with fewer
/// fields than the standard layout or extra trailing fields are
/// tolerated, taking whatever positional fields are present.
pub fn parse_body(body: &str) -> Vec<MountpointInfo> {
    body.lines()
        .filter_map(|line| parse_str_line(line.trim_end_matches('\r')))
        .collect()
}

fn parse_str_line(line: &str) -> Option<MountpointInfo> {
    let mut fields = line.split(';');
    if fields.next()? != "STR" {
        return None;
    }

    let fields: Vec<&str> = fields.collect();
    let name = fields.first()?.to_string();
    if name.is_empty() {
        return None;
    }

    let get = |idx: usize| fields.get(idx).map(|s| s.to_string()).unwrap_or_default();

    Some(MountpointInfo {
        name,
        identifier: get(1),
        format: get(2),
        nav_system: get(5),
        network: get(6),
        country: get(7),
        latitude: fields.get(8).and_then(|f| f.parse().ok()),
        longitude: fields.get(9).and_then(|f| f.parse().ok()),
        nmea_required: fields.get(10).map(|f| *f == "1").unwrap_or(false),
    })
}
