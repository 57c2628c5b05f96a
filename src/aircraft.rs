//! Aircraft feed records
//!
//! The tar1090/readsb `aircraft.json` format is loose: every field except `hex`
//! can be absent, and numeric fields occasionally arrive as strings
//! (`alt_baro` is the literal string `"ground"` for aircraft on the surface).
//! `RawAircraft` absorbs all of that with lenient per-field deserialization,
//! and `AircraftFrame` is the fully-typed record the rest of the pipeline
//! works with. Malformed fields degrade to `None`; they never fail the feed.

use serde::{Deserialize, Deserializer};

/// One entry of the feed's `aircraft` array, as received
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAircraft {
    #[serde(default)]
    pub hex: Option<String>,
    #[serde(default)]
    pub flight: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lon: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub alt_baro: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub gs: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub baro_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub track: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub true_heading: Option<f64>,
}

/// Top-level feed response body
#[derive(Debug, Default, Deserialize)]
pub struct FeedResponse {
    #[serde(default)]
    pub aircraft: Vec<RawAircraft>,
}

/// Accept a JSON number, a numeric string, or anything else as absent
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Fully-typed aircraft record, built once per feed entry per cycle
#[derive(Debug, Clone, PartialEq)]
pub struct AircraftFrame {
    /// ICAO 24-bit address as lowercase hex; empty when the feed omits it
    pub hex: String,
    /// Callsign with padding stripped; None when blank or absent
    pub callsign: Option<String>,
    /// Aircraft type description (e.g. "BOEING 737-800")
    pub description: Option<String>,
    /// (latitude, longitude); present only when both coordinates are
    pub position: Option<(f64, f64)>,
    /// Barometric altitude in feet
    pub altitude_ft: Option<i32>,
    /// Ground speed in knots
    pub ground_speed_kt: Option<f64>,
    /// Barometric rate of climb in feet per minute (negative = descending)
    pub vertical_rate_fpm: Option<f64>,
    /// True heading when reported, otherwise ground track
    pub heading_deg: Option<f64>,
}

impl AircraftFrame {
    /// Callsign for display, "???" for unidentified traffic
    pub fn display_callsign(&self) -> &str {
        self.callsign.as_deref().unwrap_or("???")
    }

    /// Type description for display
    pub fn display_description(&self) -> &str {
        self.description.as_deref().unwrap_or("?")
    }
}

impl From<RawAircraft> for AircraftFrame {
    fn from(raw: RawAircraft) -> Self {
        let callsign = raw
            .flight
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        let position = match (raw.lat, raw.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        };

        Self {
            hex: raw.hex.unwrap_or_default(),
            callsign,
            description: raw.desc,
            position,
            altitude_ft: raw.alt_baro.map(|a| a.round() as i32),
            ground_speed_kt: raw.gs,
            vertical_rate_fpm: raw.baro_rate,
            heading_deg: raw.true_heading.or(raw.track),
        }
    }
}
