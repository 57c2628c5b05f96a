//! Append-only observation log
//!
//! One JSON object per line per qualifying aircraft per cycle, written whether
//! or not a notification went out. The writer only ever appends; existing
//! lines are never rewritten.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use crate::aircraft::AircraftFrame;
use crate::classifier::Tag;
use crate::geofence::GeoMeasurement;

/// One qualifying observation, as persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub timestamp: String,
    pub flight: String,
    pub hex: Option<String>,
    #[serde(rename = "type")]
    pub aircraft_type: String,
    pub altitude_ft: Option<i32>,
    pub ground_speed: Option<f64>,
    pub baro_rate: Option<f64>,
    pub tags: Vec<Tag>,
    pub distance_km: f64,
    pub bearing_deg: f64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl ObservationRecord {
    /// Build a record from one cycle's evaluation of one aircraft
    pub fn new(
        frame: &AircraftFrame,
        measurement: &GeoMeasurement,
        tags: &[Tag],
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            flight: frame.callsign.clone().unwrap_or_default(),
            hex: (!frame.hex.is_empty()).then(|| frame.hex.clone()),
            aircraft_type: frame.display_description().to_string(),
            altitude_ft: frame.altitude_ft,
            ground_speed: frame.ground_speed_kt,
            baro_rate: frame.vertical_rate_fpm,
            tags: tags.to_vec(),
            distance_km: (measurement.distance_km * 100.0).round() / 100.0,
            bearing_deg: (measurement.bearing_deg * 10.0).round() / 10.0,
            lat: frame.position.map(|p| p.0),
            lon: frame.position.map(|p| p.1),
        }
    }
}

/// Durable sink for observation records
#[async_trait]
pub trait ObservationSink: Send + Sync {
    async fn append(&self, record: &ObservationRecord) -> Result<()>;
}

/// JSON-lines file sink
pub struct ObservationLog {
    path: PathBuf,
}

impl ObservationLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl ObservationSink for ObservationLog {
    async fn append(&self, record: &ObservationRecord) -> Result<()> {
        let line = serde_json::to_string(record).context("serialize observation")?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open {:?}", self.path))?;
        writeln!(file, "{line}").with_context(|| format!("append {:?}", self.path))?;
        Ok(())
    }
}
