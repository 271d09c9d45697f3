//! Metric Sentinel - online anomaly detection agent
//!
//! This binary runs unattended in the background, polling a single
//! Prometheus metric, fitting an outlier model over recent history, and
//! posting a webhook notification when the current sample classifies as
//! anomalous.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sentinel_lib::{DetectionLoop, PromClient, SentinelConfig, WebhookAlerter};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SENTINEL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default config file path, overridable via argv or `SENTINEL_CONFIG`
const DEFAULT_CONFIG_PATH: &str = "sentinel.toml";

fn config_path() -> PathBuf {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SENTINEL_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
        .into()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!(version = SENTINEL_VERSION, "starting metric-sentinel");

    // Configuration problems are fatal; the loop never starts on one.
    let path = config_path();
    let config = SentinelConfig::load(&path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    info!(
        prometheus_url = %config.monitoring.prometheus_url,
        query = %config.monitoring.query,
        interval_secs = config.detection.poll_interval_secs,
        "sentinel configured"
    );

    let source = Arc::new(PromClient::new(
        &config.monitoring.prometheus_url,
        &config.monitoring.query,
    )?);
    let alerter = Arc::new(WebhookAlerter::new(&config.webhook_url)?);

    let detection = DetectionLoop::new(source, alerter, &config);

    let (shutdown_tx, shutdown_rx) = tokio::sync::broadcast::channel(1);
    let loop_handle = tokio::spawn(detection.run(shutdown_rx));

    // Wait for shutdown signal, then drain the loop cooperatively
    tokio::signal::ctrl_c().await?;
    info!("SIGINT received, shutting down");
    let _ = shutdown_tx.send(());
    loop_handle.await?;

    Ok(())
}
