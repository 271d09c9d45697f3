//! Bounded sample history
//!
//! Ring buffer of recent observations used as training data for the
//! outlier model. Oldest samples are evicted on overflow so both memory
//! and refit cost stay bounded over arbitrarily long runs.

use std::collections::VecDeque;

use crate::models::Sample;

/// Ordered, bounded collection of observed samples.
///
/// Insertion order is meaningful and duplicates are kept. Local to one
/// detection loop; never shared across tasks.
#[derive(Debug)]
pub struct HistoryBuffer {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl HistoryBuffer {
    /// Create an empty buffer holding at most `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest one if the buffer is full.
    pub fn push(&mut self, sample: Sample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot of the buffered values in insertion order, for fitting.
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    /// Most recently appended sample, if any.
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_order() {
        let mut history = HistoryBuffer::new(10);
        for i in 0..5 {
            history.push(Sample::new(i, i as f64));
        }

        assert_eq!(history.len(), 5);
        assert_eq!(history.values(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(history.latest().unwrap().timestamp, 4);
    }

    #[test]
    fn test_overflow_evicts_oldest() {
        let mut history = HistoryBuffer::new(3);
        for i in 0..5 {
            history.push(Sample::new(i, i as f64));
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.values(), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut history = HistoryBuffer::new(10);
        history.push(Sample::new(0, 50.0));
        history.push(Sample::new(1, 50.0));

        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_empty_buffer() {
        let history = HistoryBuffer::new(4);
        assert!(history.is_empty());
        assert!(history.latest().is_none());
        assert!(history.values().is_empty());
    }
}
