//! Sentinel library for online metric anomaly detection
//!
//! This crate provides the core functionality for:
//! - Fetching scalar metrics from a Prometheus-compatible backend
//! - Maintaining a bounded history of recent observations
//! - Fitting an unsupervised outlier model and classifying new samples
//! - Webhook alerting on anomalies
//! - One-shot historical export

pub mod anomaly;
pub mod config;
pub mod detector;
pub mod error;
pub mod export;
pub mod history;
pub mod models;
pub mod source;

pub use anomaly::{AlertSink, FittedModel, OutlierDetector, WebhookAlerter};
pub use config::{MonitoringConfig, SentinelConfig};
pub use detector::{CycleOutcome, CycleStats, DetectionLoop};
pub use error::{ConfigError, DeliverError, FetchError, FitError};
pub use history::HistoryBuffer;
pub use models::{Classification, Sample};
pub use source::{MetricSource, PromClient};
