//! Poll-evaluate-notify orchestration
//!
//! One cycle at a time: fetch the feed, run every aircraft through the
//! geofence, log qualifying observations, and push deduplicated alerts for
//! tagged matches. `tick` takes the current time explicitly so tests can
//! drive many cycles without real delays; `run` wraps it in the fixed-interval
//! loop and watches for the shutdown signal between ticks.

use anyhow::Result;
use chrono::{DateTime, Utc};
use metrics::{counter, gauge};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::aircraft::AircraftFrame;
use crate::classifier::{self, Tag};
use crate::cooldown::{AlertKey, CooldownGate};
use crate::feed::AircraftSource;
use crate::geofence::{GeoMeasurement, Geofence};
use crate::notifier::Notifier;
use crate::observation::{ObservationRecord, ObservationSink};

/// What one cycle did, for logging and tests
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleSummary {
    pub aircraft_seen: usize,
    pub qualified: usize,
    pub alerts_sent: usize,
}

/// The polling orchestrator
pub struct Watcher {
    geofence: Geofence,
    gate: CooldownGate,
    site_name: String,
    tar1090_url: Option<String>,
    source: Arc<dyn AircraftSource>,
    sink: Arc<dyn ObservationSink>,
    notifier: Arc<dyn Notifier>,
}

impl Watcher {
    pub fn new(
        geofence: Geofence,
        gate: CooldownGate,
        site_name: String,
        tar1090_url: Option<String>,
        source: Arc<dyn AircraftSource>,
        sink: Arc<dyn ObservationSink>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            geofence,
            gate,
            site_name,
            tar1090_url,
            source,
            sink,
            notifier,
        }
    }

    /// Run one poll-evaluate-notify cycle at `now`
    ///
    /// Every failure inside a cycle is local: a failed fetch means an empty
    /// aircraft list, a failed log write or send is logged and counted, and
    /// the cycle always completes.
    pub async fn tick(&mut self, now: DateTime<Utc>) -> CycleSummary {
        counter!("watch.cycles").increment(1);

        let aircraft = match self.source.fetch().await {
            Ok(aircraft) => aircraft,
            Err(e) => {
                counter!("watch.fetch_failures").increment(1);
                warn!("failed to fetch aircraft feed: {e:#}");
                Vec::new()
            }
        };

        let mut summary = CycleSummary {
            aircraft_seen: aircraft.len(),
            ..Default::default()
        };

        for frame in &aircraft {
            let Some(measurement) = self.geofence.evaluate(frame) else {
                continue;
            };
            summary.qualified += 1;
            counter!("watch.aircraft_qualified").increment(1);

            let tags = classifier::classify(frame);
            info!(
                "{} {} at {} ft | {:.2} km away, bearing {:.0}°{}",
                frame.display_callsign(),
                frame.display_description(),
                frame.altitude_ft.unwrap_or_default(),
                measurement.distance_km,
                measurement.bearing_deg,
                if tags.is_empty() {
                    String::new()
                } else {
                    format!(" | tags: {}", classifier::format_tags(&tags))
                }
            );

            let record = ObservationRecord::new(frame, &measurement, &tags, now);
            if let Err(e) = self.sink.append(&record).await {
                counter!("watch.log_failures").increment(1);
                error!("failed to append observation: {e:#}");
            }

            if !tags.is_empty() && self.alert(frame, &measurement, &tags, now).await {
                summary.alerts_sent += 1;
            }
        }

        gauge!("watch.cooldown_keys").set(self.gate.tracked_keys() as f64);
        debug!(
            "cycle complete: {} aircraft, {} qualified, {} alerts",
            summary.aircraft_seen, summary.qualified, summary.alerts_sent
        );
        summary
    }

    /// Dispatch a notification for a tagged match, subject to the cooldown
    /// gate. Returns whether a notification actually went out.
    async fn alert(
        &mut self,
        frame: &AircraftFrame,
        measurement: &GeoMeasurement,
        tags: &[Tag],
        now: DateTime<Utc>,
    ) -> bool {
        let key = AlertKey::new(&frame.hex, tags);
        if !self.gate.should_notify(key, now) {
            counter!("watch.alerts_suppressed").increment(1);
            debug!("alert for {} suppressed by cooldown", frame.hex);
            return false;
        }

        let title = format!("Plane over {}", self.site_name);
        let mut message = format!(
            "{} {} is {} at {} ft, {:.1} km away",
            frame.display_callsign(),
            frame.display_description(),
            classifier::format_tags(tags),
            frame.altitude_ft.unwrap_or_default(),
            measurement.distance_km
        );
        if let Some(base) = &self.tar1090_url
            && !frame.hex.is_empty()
        {
            message.push('\n');
            message.push_str(base);
            message.push_str(&frame.hex);
        }

        match self.notifier.send(&title, &message).await {
            Ok(()) => {
                counter!("watch.alerts_sent").increment(1);
                info!("notification sent: {message}");
                true
            }
            Err(e) => {
                counter!("watch.alert_failures").increment(1);
                error!("failed to send notification: {e:#}");
                // The gate already recorded this attempt; a delivery failure
                // burns the window rather than retrying every cycle
                true
            }
        }
    }

    /// Poll at a fixed interval until a shutdown signal arrives
    ///
    /// Overruns simply delay the next tick; there is no catch-up scheduling.
    /// The shutdown signal is only observed between ticks, never mid-cycle.
    pub async fn run(&mut self, interval: std::time::Duration) -> Result<()> {
        info!(
            "watching for aircraft over {} ({:.4}, {:.4}), radius {} km, ceiling {} ft",
            self.site_name,
            self.geofence.center.0,
            self.geofence.center.1,
            self.geofence.radius_km,
            self.geofence.altitude_max_ft
        );

        loop {
            self.tick(Utc::now()).await;

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("shutdown signal received, stopping watcher");
                    return Ok(());
                }
            }
        }
    }
}
