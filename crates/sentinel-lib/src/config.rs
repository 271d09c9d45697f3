//! Sentinel configuration
//!
//! Loaded once at startup from a section-keyed config file plus the
//! process environment, validated, and passed by reference into every
//! collaborator's constructor. Never mutated after load.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Environment variable holding the alert webhook URL
pub const WEBHOOK_ENV_VAR: &str = "SLACK_WEBHOOK_URL";

/// Docker-internal DNS name that must never leak into a host-side config
const PLACEHOLDER_HOST: &str = "prometheus:9090";

/// Monitoring backend settings, `[monitoring]` section. Both keys are
/// required; there are no sensible defaults for them.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    /// Base URL of the Prometheus-compatible backend
    pub prometheus_url: String,
    /// PromQL expression producing the watched scalar
    pub query: String,
}

impl MonitoringConfig {
    /// Load just the `[monitoring]` section.
    ///
    /// The export path needs the backend settings but not the webhook,
    /// so it skips the environment resolution entirely. The placeholder
    /// guardrail still applies.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        #[derive(Deserialize)]
        struct MonitoringOnly {
            monitoring: MonitoringConfig,
        }

        if !path.exists() {
            return Err(ConfigError::Read(format!(
                "config file not found at {}",
                path.display()
            )));
        }

        let raw = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?;

        let only: MonitoringOnly = raw.try_deserialize()?;
        if only.monitoring.prometheus_url.contains(PLACEHOLDER_HOST) {
            return Err(ConfigError::PlaceholderHost(
                only.monitoring.prometheus_url,
            ));
        }

        Ok(only.monitoring)
    }
}

/// Detection loop tuning, `[detection]` section. Every field is optional
/// in the file.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionConfig {
    /// Seconds between detection cycles
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Minimum history length before the first model fit
    #[serde(default = "default_min_train_size")]
    pub min_train_size: usize,

    /// Expected fraction of anomalous points in training data
    #[serde(default = "default_contamination")]
    pub contamination: f64,

    /// Ring-buffer capacity for the sample history
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Refit cadence in cycles (1 = refit every cycle)
    #[serde(default = "default_refit_every")]
    pub refit_every: u64,
}

fn default_poll_interval() -> u64 {
    15
}

fn default_min_train_size() -> usize {
    10
}

fn default_contamination() -> f64 {
    0.2
}

fn default_history_capacity() -> usize {
    1440
}

fn default_refit_every() -> u64 {
    1
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            min_train_size: default_min_train_size(),
            contamination: default_contamination(),
            history_capacity: default_history_capacity(),
            refit_every: default_refit_every(),
        }
    }
}

/// Fully resolved sentinel configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SentinelConfig {
    pub monitoring: MonitoringConfig,

    #[serde(default)]
    pub detection: DetectionConfig,

    /// Alert webhook endpoint, resolved from the environment, never from
    /// the config file
    #[serde(skip)]
    pub webhook_url: String,
}

impl SentinelConfig {
    /// Load and validate configuration from `path` and the environment.
    ///
    /// A missing file, missing `[monitoring]` key, or missing webhook
    /// environment variable is fatal.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::Read(format!(
                "config file not found at {}",
                path.display()
            )));
        }

        let raw = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?;

        let mut resolved: SentinelConfig = raw.try_deserialize()?;

        resolved.webhook_url = std::env::var(WEBHOOK_ENV_VAR)
            .map_err(|_| ConfigError::MissingEnv(WEBHOOK_ENV_VAR))?;

        resolved.validate()?;
        Ok(resolved)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.monitoring.prometheus_url.contains(PLACEHOLDER_HOST) {
            return Err(ConfigError::PlaceholderHost(
                self.monitoring.prometheus_url.clone(),
            ));
        }

        let d = &self.detection;
        if d.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "detection.poll_interval_secs must be nonzero".into(),
            ));
        }
        if d.min_train_size < 2 {
            return Err(ConfigError::Invalid(
                "detection.min_train_size must be at least 2".into(),
            ));
        }
        if !(d.contamination > 0.0 && d.contamination < 0.5) {
            return Err(ConfigError::Invalid(format!(
                "detection.contamination must be in (0, 0.5), got {}",
                d.contamination
            )));
        }
        if d.history_capacity < d.min_train_size {
            return Err(ConfigError::Invalid(format!(
                "detection.history_capacity ({}) must be >= min_train_size ({})",
                d.history_capacity, d.min_train_size
            )));
        }
        if d.refit_every == 0 {
            return Err(ConfigError::Invalid(
                "detection.refit_every must be nonzero".into(),
            ));
        }
        Ok(())
    }
}
