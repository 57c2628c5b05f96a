//! `scan` subcommand: one-shot fetch-and-print
//!
//! Fetches the feed once and prints every aircraft's distance and bearing
//! from the reference point, without geofencing, logging, or alerting.
//! Useful for checking feed connectivity and the reference coordinates.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::feed::{AdsbFeed, AircraftSource};
use crate::geofence::Geofence;

pub async fn handle_scan(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    let feed = AdsbFeed::new(config.feed_url.clone())?;

    let geofence = Geofence {
        center: (config.latitude, config.longitude),
        radius_km: config.radius_km,
        altitude_max_ft: config.altitude_max_ft,
        heading_tolerance_deg: None,
    };

    let aircraft = feed.fetch().await?;
    if aircraft.is_empty() {
        println!("no aircraft in feed");
        return Ok(());
    }

    for frame in &aircraft {
        let Some(measurement) = geofence.measure(frame) else {
            println!(
                "{:<8} {:<24} no position",
                frame.display_callsign(),
                frame.display_description()
            );
            continue;
        };
        println!(
            "{:<8} {:<24} {:>8.2} km  bearing {:>5.1}°  {} ft",
            frame.display_callsign(),
            frame.display_description(),
            measurement.distance_km,
            measurement.bearing_deg,
            frame
                .altitude_ft
                .map_or_else(|| "?".to_string(), |a| a.to_string()),
        );
    }

    Ok(())
}
