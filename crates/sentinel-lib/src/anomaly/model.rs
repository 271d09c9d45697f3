//! Unsupervised outlier model
//!
//! Scores a value by its absolute z-score against the training mean and
//! standard deviation, with the decision threshold calibrated so that
//! roughly `contamination` of the training points would score as
//! anomalous. Each fit produces a fresh immutable model; nothing is
//! updated incrementally.

use crate::error::FitError;
use crate::models::Classification;

/// Fit policy: contamination rate plus the minimum history length
/// required before fitting is attempted.
#[derive(Debug, Clone)]
pub struct OutlierDetector {
    /// Expected fraction of anomalous points in training data
    pub contamination: f64,
    /// Minimum samples required for a fit
    pub min_train_size: usize,
}

impl OutlierDetector {
    pub fn new(contamination: f64, min_train_size: usize) -> Self {
        Self {
            contamination,
            min_train_size,
        }
    }

    /// Fit a new model on a history snapshot.
    ///
    /// Degenerate input (too few samples, near-zero spread such as
    /// all-identical values) is a reported error, never a panic; the
    /// caller skips classification for the cycle.
    pub fn fit(&self, values: &[f64], version: u64) -> Result<FittedModel, FitError> {
        let need = self.min_train_size.max(2);
        if values.len() < need {
            return Err(FitError::TooFewSamples {
                got: values.len(),
                need,
            });
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;

        // Sample variance (Bessel's correction)
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        let std_dev = variance.sqrt();

        if std_dev < f64::EPSILON {
            return Err(FitError::DegenerateData);
        }

        // Threshold at the (1 - contamination) quantile of training scores
        let mut scores: Vec<f64> = values.iter().map(|v| (v - mean).abs() / std_dev).collect();
        scores.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let cutoff = ((1.0 - self.contamination) * scores.len() as f64).ceil() as usize;
        let threshold = scores[cutoff.clamp(1, scores.len()) - 1];

        Ok(FittedModel {
            version,
            mean,
            std_dev,
            threshold,
            trained_on: values.len(),
        })
    }
}

impl Default for OutlierDetector {
    fn default() -> Self {
        Self {
            contamination: 0.2,
            min_train_size: 10,
        }
    }
}

/// An immutable fitted model instance.
///
/// Produced whole by [`OutlierDetector::fit`] and swapped atomically by
/// the detection loop; successive fits get increasing versions.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    /// Monotonically increasing fit counter
    pub version: u64,
    /// Training mean
    pub mean: f64,
    /// Training standard deviation
    pub std_dev: f64,
    /// Score threshold above which a value is anomalous
    pub threshold: f64,
    /// Number of samples this model was fitted on
    pub trained_on: usize,
}

impl FittedModel {
    /// Absolute z-score of a value under this model (higher = more anomalous).
    pub fn score(&self, value: f64) -> f64 {
        (value - self.mean).abs() / self.std_dev
    }

    /// Binary classification decision for a single value.
    pub fn classify(&self, value: f64) -> Classification {
        if self.score(value) > self.threshold {
            Classification::Anomaly
        } else {
            Classification::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Twenty values tightly clustered around 50.0 (stddev ~ 1)
    fn tight_history() -> Vec<f64> {
        let deltas = [-1.8, -1.4, -1.0, -0.6, -0.2, 0.2, 0.6, 1.0, 1.4, 1.8];
        deltas
            .iter()
            .chain(deltas.iter())
            .map(|d| 50.0 + d)
            .collect()
    }

    #[test]
    fn test_far_outlier_classified_as_anomaly() {
        let detector = OutlierDetector::new(0.2, 10);
        let model = detector.fit(&tight_history(), 1).unwrap();

        assert_eq!(model.classify(500.0), Classification::Anomaly);
    }

    #[test]
    fn test_value_in_dense_cluster_is_normal() {
        let detector = OutlierDetector::new(0.2, 10);
        let model = detector.fit(&tight_history(), 1).unwrap();

        assert_eq!(model.classify(50.5), Classification::Normal);
    }

    #[test]
    fn test_too_few_samples() {
        let detector = OutlierDetector::new(0.2, 10);
        let result = detector.fit(&[50.0; 5], 1);

        assert!(matches!(
            result,
            Err(FitError::TooFewSamples { got: 5, need: 10 })
        ));
    }

    #[test]
    fn test_all_identical_values_is_degenerate() {
        let detector = OutlierDetector::new(0.2, 10);
        let result = detector.fit(&[50.0; 20], 1);

        assert!(matches!(result, Err(FitError::DegenerateData)));
    }

    #[test]
    fn test_two_distinct_values_repeated_can_fit() {
        let detector = OutlierDetector::new(0.2, 10);
        let values: Vec<f64> = (0..20).map(|i| if i % 2 == 0 { 49.0 } else { 51.0 }).collect();

        let model = detector.fit(&values, 1).unwrap();
        assert!(model.std_dev > 0.0);
        assert_eq!(model.classify(50.0), Classification::Normal);
    }

    #[test]
    fn test_model_carries_version_and_stats() {
        let detector = OutlierDetector::new(0.2, 10);
        let model = detector.fit(&tight_history(), 7).unwrap();

        assert_eq!(model.version, 7);
        assert_eq!(model.trained_on, 20);
        assert!((model.mean - 50.0).abs() < 1e-9);
        assert!(model.std_dev > 1.0 && model.std_dev < 1.5);
    }

    #[test]
    fn test_threshold_scales_with_contamination() {
        let history = tight_history();
        let loose = OutlierDetector::new(0.4, 10).fit(&history, 1).unwrap();
        let strict = OutlierDetector::new(0.05, 10).fit(&history, 1).unwrap();

        assert!(loose.threshold < strict.threshold);
    }
}
