//! Watcher configuration
//!
//! Tunables come from a TOML file; Pushover credentials come from the
//! environment (`PUSHOVER_TOKEN` / `PUSHOVER_USER`, loaded through dotenvy in
//! main) so they stay out of config files. Validation runs once at startup
//! and is the only place a configuration problem is allowed to be fatal.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

fn default_radius_km() -> f64 {
    20.0
}

fn default_altitude_max_ft() -> i32 {
    30000
}

fn default_poll_interval_secs() -> u64 {
    10
}

fn default_cooldown_minutes() -> i64 {
    5
}

fn default_log_file() -> PathBuf {
    PathBuf::from("observations.jsonl")
}

fn default_priority() -> i8 {
    1
}

fn default_sound() -> String {
    "siren".to_string()
}

fn default_true() -> bool {
    true
}

/// Watcher configuration file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Reference point latitude in degrees
    pub latitude: f64,
    /// Reference point longitude in degrees
    pub longitude: f64,
    /// Human-readable place name used in notification titles
    pub site_name: String,
    /// URL of the tar1090/readsb aircraft.json endpoint
    pub feed_url: String,
    /// Geofence radius in kilometers
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,
    /// Geofence altitude ceiling in feet MSL
    #[serde(default = "default_altitude_max_ft")]
    pub altitude_max_ft: i32,
    /// Approach-heading tolerance in degrees; omit for a pure
    /// proximity + altitude geofence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading_tolerance_deg: Option<f64>,
    /// Seconds between polls
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Minimum minutes between notifications sharing an alert key
    #[serde(default = "default_cooldown_minutes")]
    pub cooldown_minutes: i64,
    /// Path of the append-only observation log
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    /// Base URL of a tar1090 map UI to link in notifications, e.g.
    /// "http://192.168.8.31:8080/?icao="
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tar1090_url: Option<String>,
    /// Whether to send push notifications at all
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
    /// Pushover priority hint
    #[serde(default = "default_priority")]
    pub notification_priority: i8,
    /// Pushover sound hint
    #[serde(default = "default_sound")]
    pub notification_sound: String,
    /// Address for the Prometheus scrape endpoint; omit to disable metrics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_listen_addr: Option<SocketAddr>,
}

/// Pushover credentials, kept out of the config file
#[derive(Debug, Clone)]
pub struct PushoverCredentials {
    pub token: String,
    pub user: String,
}

impl Config {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("read config file {:?}", path))?;
        let config: Config =
            toml::from_str(&contents).with_context(|| format!("parse config file {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the watcher cannot run with
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            bail!("latitude must be between -90 and 90");
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            bail!("longitude must be between -180 and 180");
        }
        if !self.radius_km.is_finite() || self.radius_km <= 0.0 {
            bail!("radius_km must be positive");
        }
        if let Some(tolerance) = self.heading_tolerance_deg
            && !(0.0..=180.0).contains(&tolerance)
        {
            bail!("heading_tolerance_deg must be between 0 and 180");
        }
        if self.poll_interval_secs == 0 {
            bail!("poll_interval_secs must be at least 1");
        }
        if self.cooldown_minutes < 0 {
            bail!("cooldown_minutes must not be negative");
        }
        if self.feed_url.is_empty() {
            bail!("feed_url must be set");
        }
        Ok(())
    }

    /// Read Pushover credentials from the environment
    ///
    /// Required only when notifications are enabled.
    pub fn pushover_credentials(&self) -> Result<Option<PushoverCredentials>> {
        if !self.notifications_enabled {
            return Ok(None);
        }
        let token = env::var("PUSHOVER_TOKEN")
            .context("PUSHOVER_TOKEN must be set when notifications are enabled")?;
        let user = env::var("PUSHOVER_USER")
            .context("PUSHOVER_USER must be set when notifications are enabled")?;
        Ok(Some(PushoverCredentials { token, user }))
    }
}
