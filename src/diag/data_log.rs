// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Fixed-size ring of `f32` samples. The oldest sample is dropped once full.

use heapless::HistoryBuffer;

/// Number of samples kept.
pub const CAPACITY: usize = 16;

pub struct DataLog {
    samples: HistoryBuffer<f32, CAPACITY>,
}

impl DataLog {
    pub const fn new() -> Self {
        Self {
            samples: HistoryBuffer::new(),
        }
    }

    #[inline]
    pub fn push(&mut self, sample: f32) {
        self.samples.write(sample);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample `index`, counting from the oldest one still held.
    pub fn get(&self, index: usize) -> Option<f32> {
        self.samples.oldest_ordered().nth(index).copied()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for DataLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_most_recent_samples() {
        let mut log = DataLog::new();
        assert!(log.is_empty());
        assert_eq!(log.get(0), None);

        for i in 0..20 {
            log.push(i as f32);
        }
        assert_eq!(log.len(), CAPACITY);
        assert_eq!(log.get(0), Some(4.0));
        assert_eq!(log.get(CAPACITY - 1), Some(19.0));
        assert_eq!(log.get(CAPACITY), None);
    }

    #[test]
    fn partial_fill_reads_in_order() {
        let mut log = DataLog::new();
        log.push(1.5);
        log.push(2.5);
        assert_eq!(log.get(0), Some(1.5));
        assert_eq!(log.get(1), Some(2.5));
        assert_eq!(log.get(2), None);

        log.clear();
        assert!(log.is_empty());
    }
}
