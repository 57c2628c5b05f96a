//! overhead - aircraft proximity watcher
//!
//! Polls a tar1090/readsb `aircraft.json` feed, geofences each aircraft
//! against a fixed reference point, appends qualifying observations to a
//! JSON-lines log, and pushes cooldown-deduplicated Pushover alerts for
//! aircraft matching behavioral tags.

pub mod aircraft;
pub mod classifier;
pub mod commands;
pub mod config;
pub mod cooldown;
pub mod feed;
pub mod geodesy;
pub mod geofence;
pub mod metrics;
pub mod notifier;
pub mod observation;
pub mod watcher;

pub use aircraft::{AircraftFrame, RawAircraft};
pub use config::Config;
pub use cooldown::{AlertKey, CooldownGate};
pub use geofence::{GeoMeasurement, Geofence};
pub use watcher::{CycleSummary, Watcher};
