//! `msctl export` - dump a historical time range to a flat file

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use sentinel_lib::{export::export_range, MonitoringConfig, PromClient};

pub async fn run(config_path: &Path, hours: u64, step_secs: u64, out: &Path) -> Result<()> {
    if hours == 0 {
        bail!("--hours must be at least 1");
    }
    if step_secs == 0 {
        bail!("--step-secs must be at least 1");
    }

    let monitoring = MonitoringConfig::load(config_path)
        .with_context(|| format!("failed to load configuration from {}", config_path.display()))?;

    let client = PromClient::new(&monitoring.prometheus_url, &monitoring.query)?;

    let span = hours
        .checked_mul(3600)
        .and_then(|secs| i64::try_from(secs).ok())
        .context("--hours is too large")?;

    let end = Utc::now().timestamp();
    let start = end - span;

    let rows = export_range(&client, start, end, Duration::from_secs(step_secs), out).await?;
    println!("Saved {} metric points to {}", rows, out.display());

    Ok(())
}
