//! Fixed-capacity rolling sample stores for time-series display.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Rolling buffer that evicts its oldest sample once full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryBuffer<T> {
    /// Samples, oldest first.
    data: VecDeque<T>,
    /// Maximum number of samples retained.
    capacity: usize,
}

impl<T> HistoryBuffer<T> {
    /// Create an empty buffer. A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest one if the buffer is full.
    pub fn push(&mut self, value: T) {
        if self.data.len() >= self.capacity {
            self.data.pop_front();
        }
        self.data.push_back(value);
    }

    /// Drop every sample.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Maximum number of samples retained.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of samples held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Most recent sample.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.data.back()
    }

    /// Oldest retained sample.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.data.front()
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl<T: Clone> HistoryBuffer<T> {
    /// Copy the samples out, oldest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.data.iter().cloned().collect()
    }
}

/// Two channels sampled together, so their lengths never diverge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedHistory {
    first: HistoryBuffer<f64>,
    second: HistoryBuffer<f64>,
}

impl PairedHistory {
    /// Create an empty pair with a shared capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            first: HistoryBuffer::new(capacity),
            second: HistoryBuffer::new(capacity),
        }
    }

    /// Append one sample to each channel.
    pub fn push(&mut self, first: f64, second: f64) {
        self.first.push(first);
        self.second.push(second);
    }

    /// Truncate to a single sample pair.
    pub fn restart(&mut self, first: f64, second: f64) {
        self.first.clear();
        self.second.clear();
        self.push(first, second);
    }

    /// First channel.
    #[must_use]
    pub const fn first(&self) -> &HistoryBuffer<f64> {
        &self.first
    }

    /// Second channel.
    #[must_use]
    pub const fn second(&self) -> &HistoryBuffer<f64> {
        &self.second
    }

    /// Number of sample pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.first.len(), self.second.len());
        self.first.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }

    /// Shared capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.first.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_until_full_then_evict_oldest() {
        let mut buf = HistoryBuffer::new(3);
        for v in 1..=5 {
            buf.push(v);
        }
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.to_vec(), vec![3, 4, 5]);
        assert_eq!(buf.first(), Some(&3));
        assert_eq!(buf.last(), Some(&5));
    }

    #[test]
    fn test_zero_capacity_raised_to_one() {
        let mut buf = HistoryBuffer::new(0);
        buf.push(1.0);
        buf.push(2.0);
        assert_eq!(buf.capacity(), 1);
        assert_eq!(buf.to_vec(), vec![2.0]);
    }

    #[test]
    fn test_clear() {
        let mut buf = HistoryBuffer::new(4);
        buf.push(1);
        buf.clear();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_paired_restart() {
        let mut pair = PairedHistory::new(51);
        for i in 0..10 {
            pair.push(f64::from(i), f64::from(i) * 2.0);
        }
        pair.restart(10.0, 4.0);
        assert_eq!(pair.len(), 1);
        assert_eq!(pair.first().to_vec(), vec![10.0]);
        assert_eq!(pair.second().to_vec(), vec![4.0]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Falsification: length never exceeds capacity and channels stay equal.
        #[test]
        fn prop_paired_bounded(capacity in 1usize..100, pushes in 0usize..500) {
            let mut pair = PairedHistory::new(capacity);
            for i in 0..pushes {
                pair.push(i as f64, -(i as f64));
                prop_assert!(pair.len() <= capacity);
                prop_assert_eq!(pair.first().len(), pair.second().len());
            }
            prop_assert_eq!(pair.len(), pushes.min(capacity));
        }

        /// Falsification: the newest sample is always retained.
        #[test]
        fn prop_newest_retained(values in prop::collection::vec(-100.0f64..100.0, 1..200)) {
            let mut buf = HistoryBuffer::new(51);
            for v in &values {
                buf.push(*v);
            }
            prop_assert_eq!(buf.last().copied(), values.last().copied());
        }
    }
}
