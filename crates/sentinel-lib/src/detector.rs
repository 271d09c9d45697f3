//! Detection loop
//!
//! The orchestrator: on a fixed cadence, pulls the current metric value,
//! appends it to the history, refits the outlier model when due,
//! classifies the latest value, and alerts on a positive classification.
//! Every cycle-scoped failure costs at most that one cycle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::anomaly::{AlertSink, FittedModel, OutlierDetector};
use crate::config::SentinelConfig;
use crate::history::HistoryBuffer;
use crate::models::Classification;
use crate::source::MetricSource;

/// How a single detection cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Metric fetch failed; history untouched, no alert
    FetchFailed,
    /// Sample appended but history is still below the training threshold
    Warmup,
    /// A due refit failed on degenerate data; no classification this cycle
    FitSkipped,
    /// Latest value classified as normal
    Normal,
    /// Latest value classified as anomalous; `delivered` reflects the
    /// webhook outcome
    Anomaly { delivered: bool },
}

/// Running counters for the loop, surfaced in periodic debug logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct CycleStats {
    pub cycles: u64,
    pub fetch_errors: u64,
    pub fit_errors: u64,
    pub alerts_sent: u64,
    pub alerts_failed: u64,
}

/// Stateful detection loop over a single metric.
pub struct DetectionLoop {
    source: Arc<dyn MetricSource>,
    alerter: Arc<dyn AlertSink>,
    history: HistoryBuffer,
    detector: OutlierDetector,
    model: Option<FittedModel>,
    poll_interval: Duration,
    refit_every: u64,
    query: String,
    model_version: u64,
    cycles_since_fit: u64,
    stats: CycleStats,
}

impl DetectionLoop {
    /// Wire up a loop from resolved configuration. The config is read
    /// here once; the loop never sees it again.
    pub fn new(
        source: Arc<dyn MetricSource>,
        alerter: Arc<dyn AlertSink>,
        config: &SentinelConfig,
    ) -> Self {
        let d = &config.detection;

        Self {
            source,
            alerter,
            history: HistoryBuffer::new(d.history_capacity),
            detector: OutlierDetector::new(d.contamination, d.min_train_size),
            model: None,
            poll_interval: Duration::from_secs(d.poll_interval_secs),
            refit_every: d.refit_every,
            query: config.monitoring.query.clone(),
            model_version: 0,
            cycles_since_fit: 0,
            stats: CycleStats::default(),
        }
    }

    /// Drive detection cycles until a shutdown signal arrives.
    ///
    /// The first tick fires immediately, so the cadence is
    /// fetch-then-sleep. Shutdown is checked at the same suspension
    /// point as the tick, so the loop drains between cycles rather than
    /// being torn down mid-cycle.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        info!(
            interval_secs = self.poll_interval.as_secs(),
            query = %self.query,
            "starting detection loop"
        );

        let mut ticker = interval(self.poll_interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.run_cycle().await;

                    if self.stats.cycles % 20 == 0 {
                        debug!(
                            cycles = self.stats.cycles,
                            fetch_errors = self.stats.fetch_errors,
                            fit_errors = self.stats.fit_errors,
                            alerts_sent = self.stats.alerts_sent,
                            alerts_failed = self.stats.alerts_failed,
                            "detection loop stats"
                        );
                    }
                }
                _ = shutdown.recv() => {
                    info!(cycles = self.stats.cycles, "shutting down detection loop");
                    break;
                }
            }
        }
    }

    /// Execute exactly one detection cycle: fetch, append, maybe refit,
    /// maybe classify, maybe alert.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        self.stats.cycles += 1;

        let sample = match self.source.fetch_current().await {
            Ok(sample) => sample,
            Err(e) => {
                self.stats.fetch_errors += 1;
                warn!(error = %e, "metric fetch failed, skipping cycle");
                return CycleOutcome::FetchFailed;
            }
        };

        debug!(
            value = sample.value,
            timestamp = sample.timestamp,
            "observed sample"
        );
        self.history.push(sample);
        self.cycles_since_fit += 1;

        if self.refit_due() {
            match self
                .detector
                .fit(&self.history.values(), self.model_version + 1)
            {
                Ok(model) => {
                    info!(
                        version = model.version,
                        trained_on = model.trained_on,
                        threshold = model.threshold,
                        "model refitted"
                    );
                    self.model_version = model.version;
                    self.model = Some(model);
                    self.cycles_since_fit = 0;
                }
                Err(e) => {
                    self.stats.fit_errors += 1;
                    warn!(error = %e, "model fit failed, no classification this cycle");
                    return CycleOutcome::FitSkipped;
                }
            }
        }

        let Some(model) = self.model.as_ref() else {
            debug!(
                history_len = self.history.len(),
                need = self.detector.min_train_size,
                "warming up, model absent"
            );
            return CycleOutcome::Warmup;
        };

        match model.classify(sample.value) {
            Classification::Normal => CycleOutcome::Normal,
            Classification::Anomaly => {
                warn!(
                    value = sample.value,
                    score = model.score(sample.value),
                    threshold = model.threshold,
                    model_version = model.version,
                    "anomaly detected"
                );

                let message = format!(
                    "Anomaly detected: {} = {:.2} (score {:.2}, threshold {:.2})",
                    self.query,
                    sample.value,
                    model.score(sample.value),
                    model.threshold
                );

                let delivered = match self.alerter.notify(&message).await {
                    Ok(()) => {
                        self.stats.alerts_sent += 1;
                        true
                    }
                    Err(e) => {
                        self.stats.alerts_failed += 1;
                        warn!(error = %e, "alert delivery failed");
                        false
                    }
                };

                CycleOutcome::Anomaly { delivered }
            }
        }
    }

    fn refit_due(&self) -> bool {
        self.history.len() >= self.detector.min_train_size
            && (self.model.is_none() || self.cycles_since_fit >= self.refit_every)
    }

    pub fn stats(&self) -> CycleStats {
        self.stats
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn model(&self) -> Option<&FittedModel> {
        self.model.as_ref()
    }
}
