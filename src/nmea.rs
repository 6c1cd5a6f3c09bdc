//! NMEA GGA sentences
//!
//! The relay speaks GGA in both directions: outbound to upstream
//! casters as a VRS position report and keep-alive, inbound from
//! rovers to track their live position. Only GGA is understood; every
//! other sentence type is ignored by callers.

use chrono::{DateTime, Timelike, Utc};

use crate::model::GnssQuality;

/// A position fix extracted from a GGA sentence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GgaFix {
    /// Latitude in decimal degrees, south negative
    pub lat: f64,
    /// Longitude in decimal degrees, west negative
    pub lon: f64,
    /// Altitude above mean sea level in metres
    pub alt: f64,
    /// Fix quality
    pub quality: GnssQuality,
}

/// XOR checksum over the sentence body (between `$` and `*`, exclusive)
fn checksum(body: &str) -> u8 {
    body.bytes().fold(0, |acc, b| acc ^ b)
}

/// Degrees to the NMEA ddmm.mmmmm form.
///
/// Returns whole degrees and decimal minutes rounded to five places,
/// carrying into degrees when the minutes round up to sixty.
fn to_degrees_minutes(value: f64) -> (u32, f64) {
    let abs = value.abs();
    let mut degrees = abs.trunc() as u32;
    let mut minutes = ((abs - abs.trunc()) * 60.0 * 1e5).round() / 1e5;
    if minutes >= 60.0 {
        degrees += 1;
        minutes = 0.0;
    }
    (degrees, minutes)
}

/// Render a GGA sentence for the given position.
///
/// Fix quality, satellite count and HDOP are fixed (1, 08, 1.0): the
/// upstream caster only needs the approximate position, not a real
/// solution. The sign of zero is honoured so a parsed southern or
/// western zero coordinate re-encodes with its hemisphere.
pub fn format_gga(lat: f64, lon: f64, alt: f64, at: DateTime<Utc>) -> String {
    let time = format!(
        "{:02}{:02}{:02}.{:02}",
        at.hour(),
        at.minute(),
        at.second(),
        at.nanosecond() / 10_000_000
    );

    let (lat_deg, lat_min) = to_degrees_minutes(lat);
    let lat_hem = if lat.is_sign_negative() { 'S' } else { 'N' };
    let (lon_deg, lon_min) = to_degrees_minutes(lon);
    let lon_hem = if lon.is_sign_negative() { 'W' } else { 'E' };

    let body = format!(
        "GPGGA,{time},{lat_deg:02}{lat_min:08.5},{lat_hem},{lon_deg:03}{lon_min:08.5},{lon_hem},1,08,1.0,{alt:.1},M,0.0,M,,"
    );

    format!("${body}*{:02X}\r\n", checksum(&body))
}

/// Parse a `ddmm.mmmmm`-style field into decimal degrees, applying the
/// hemisphere sign. Sign is applied by multiplication so a zero
/// coordinate keeps its hemisphere through a round-trip.
fn parse_coordinate(field: &str, hemisphere: &str, negative_hem: &str) -> Option<f64> {
    let raw: f64 = field.parse().ok()?;
    let degrees = (raw / 100.0).trunc();
    let minutes = raw - degrees * 100.0;
    if minutes >= 60.0 {
        return None;
    }
    let value = degrees + minutes / 60.0;
    if hemisphere == negative_hem {
        Some(-value)
    } else {
        Some(value)
    }
}

/// Parse a GGA sentence.
///
/// Accepts `$GPGGA` and `$GNGGA` talkers. A trailing `*hh` checksum is
/// tolerated but not enforced; receivers in the field disagree on it.
/// Malformed sentences yield `None` and are dropped silently by
/// callers.
pub fn parse_gga(line: &str) -> Option<GgaFix> {
    let line = line.trim();
    if !line.starts_with("$GPGGA") && !line.starts_with("$GNGGA") {
        return None;
    }

    let body = line.split('*').next()?;
    let fields: Vec<&str> = body.split(',').collect();
    if fields.len() < 10 {
        return None;
    }

    let lat = parse_coordinate(fields[2], fields[3], "S")?;
    let lon = parse_coordinate(fields[4], fields[5], "W")?;
    if lat.abs() > 90.0 || lon.abs() > 180.0 {
        return None;
    }

    let quality_digit: u8 = fields[6].parse().ok()?;
    let alt: f64 = fields.get(9).and_then(|f| f.parse().ok()).unwrap_or(0.0);

    Some(GgaFix {
        lat,
        lon,
        alt,
        quality: GnssQuality::from_digit(quality_digit),
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 34, 56).unwrap()
    }

    #[test]
    fn test_format_known_position() {
        let sentence = format_gga(21.0285, 105.8542, 100.0, at());

        assert!(sentence.starts_with("$GPGGA,123456.00,2101.71000,N,10551.25200,E,1,08,1.0,100.0,M,0.0,M,,*"));
        assert!(sentence.ends_with("\r\n"));
    }

    #[test]
    fn test_format_checksum() {
        let sentence = format_gga(21.0285, 105.8542, 100.0, at());
        let body = &sentence[1..sentence.find('*').unwrap()];
        let expected = body.bytes().fold(0u8, |a, b| a ^ b);
        let given = u8::from_str_radix(
            &sentence[sentence.find('*').unwrap() + 1..].trim_end(),
            16,
        )
        .unwrap();
        assert_eq!(given, expected);
    }

    #[test]
    fn test_format_southern_western() {
        let sentence = format_gga(-33.8688, -151.2093, 58.0, at());
        assert!(sentence.contains(",3352.12800,S,"));
        assert!(sentence.contains(",15112.55800,W,"));
    }

    #[test]
    fn test_format_zero_latitude_south() {
        // Negative zero keeps the southern hemisphere
        let sentence = format_gga(-0.0, 105.8542, 100.0, at());
        assert!(sentence.contains(",0000.00000,S,"));
    }

    #[test]
    fn test_minute_rounding_carry() {
        // 9.9999999 deg: minutes round to 60, must carry into degrees
        let (deg, min) = to_degrees_minutes(9.999_999_99);
        assert_eq!(deg, 10);
        assert_eq!(min, 0.0);
    }

    #[test]
    fn test_parse_known_sentence() {
        let fix =
            parse_gga("$GPGGA,123456.00,2101.71000,N,10551.25200,E,1,08,1.0,100.0,M,0.0,M,,*7A")
                .unwrap();
        assert!((fix.lat - 21.0285).abs() < 1e-9);
        assert!((fix.lon - 105.8542).abs() < 1e-9);
        assert_eq!(fix.alt, 100.0);
        assert_eq!(fix.quality, GnssQuality::Single);
    }

    #[test]
    fn test_parse_gngga_talker() {
        let fix =
            parse_gga("$GNGGA,081836,3751.65000,S,14507.36000,E,4,12,0.8,78.0,M,0.0,M,,").unwrap();
        assert!(fix.lat < 0.0);
        assert_eq!(fix.quality, GnssQuality::RtkFixed);
    }

    #[test]
    fn test_parse_zero_south_round_trip() {
        let fix = parse_gga("$GPGGA,000000.00,0000.00000,S,10551.25200,E,1,08,1.0,0.0,M,0.0,M,,")
            .unwrap();
        assert_eq!(fix.lat, 0.0);
        assert!(fix.lat.is_sign_negative());

        let rendered = format_gga(fix.lat, fix.lon, fix.alt, at());
        assert!(rendered.contains(",0000.00000,S,"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_gga("").is_none());
        assert!(parse_gga("$GPRMC,123456,A,...").is_none());
        assert!(parse_gga("$GPGGA,123456").is_none());
        assert!(parse_gga("$GPGGA,t,notanumber,N,10551.25200,E,1,08,1.0,0.0,M,0.0,M,,").is_none());
        // Minutes field out of range
        assert!(parse_gga("$GPGGA,t,2959.00000,N,10551.25200,E,1,08,1.0,0.0,M,0.0,M,,").is_some());
        assert!(parse_gga("$GPGGA,t,2961.00000,N,10551.25200,E,1,08,1.0,0.0,M,0.0,M,,").is_none());
    }

    #[test]
    fn test_round_trip_precision() {
        let cases = [
            (21.0285, 105.8542),
            (-33.8688, 151.2093),
            (0.00005, -0.00005),
            (89.99999, 179.99999),
            (-89.99999, -179.99999),
        ];
        for (lat, lon) in cases {
            let sentence = format_gga(lat, lon, 42.0, at());
            let fix = parse_gga(&sentence).unwrap();
            assert!(
                (fix.lat - lat).abs() <= 1e-5,
                "lat {lat} -> {} drifted",
                fix.lat
            );
            assert!(
                (fix.lon - lon).abs() <= 1e-5,
                "lon {lon} -> {} drifted",
                fix.lon
            );
        }
    }
}
