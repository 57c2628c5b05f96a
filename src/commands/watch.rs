//! `watch` subcommand: the long-running polling loop

use anyhow::Result;
use chrono::Duration;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::cooldown::CooldownGate;
use crate::feed::AdsbFeed;
use crate::geofence::Geofence;
use crate::metrics::init_metrics;
use crate::notifier::{Notifier, NullNotifier, PushoverNotifier};
use crate::observation::ObservationLog;
use crate::watcher::Watcher;

pub async fn handle_watch(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;

    if let Some(addr) = config.metrics_listen_addr {
        init_metrics(addr)?;
    }

    let notifier: Arc<dyn Notifier> = match config.pushover_credentials()? {
        Some(credentials) => Arc::new(PushoverNotifier::new(
            credentials.token,
            credentials.user,
            config.notification_priority,
            config.notification_sound.clone(),
        )?),
        None => {
            info!("notifications disabled, alerts will only be logged");
            Arc::new(NullNotifier)
        }
    };

    let geofence = Geofence {
        center: (config.latitude, config.longitude),
        radius_km: config.radius_km,
        altitude_max_ft: config.altitude_max_ft,
        heading_tolerance_deg: config.heading_tolerance_deg,
    };

    let mut watcher = Watcher::new(
        geofence,
        CooldownGate::new(Duration::minutes(config.cooldown_minutes)),
        config.site_name.clone(),
        config.tar1090_url.clone(),
        Arc::new(AdsbFeed::new(config.feed_url.clone())?),
        Arc::new(ObservationLog::new(config.log_file.clone())),
        notifier,
    );

    watcher
        .run(std::time::Duration::from_secs(config.poll_interval_secs))
        .await
}
