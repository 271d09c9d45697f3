//! Anomaly detection and alert emission
//!
//! This module provides:
//! - An unsupervised outlier model calibrated from a contamination rate
//! - Webhook alert delivery for positive classifications

mod alerter;
mod model;

pub use alerter::{AlertSink, WebhookAlerter, WebhookPayload};
pub use model::{FittedModel, OutlierDetector};
