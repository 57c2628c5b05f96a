//! Prometheus metrics bootstrap

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::info;

/// Install the Prometheus recorder and its scrape listener
///
/// Counters and gauges recorded through the `metrics` macros become visible
/// at `http://{addr}/metrics`. Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("install Prometheus recorder")?;
    info!("metrics exporter listening on {addr}");
    Ok(())
}
