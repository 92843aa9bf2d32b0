/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::sync::Mutex;

use hdrhistogram::CreationError;

use super::Snapshot;

/// A value distribution that keeps every recorded sample for the process
/// lifetime. Values above the trackable range are clamped to it.
pub struct Histogram {
    inner: Mutex<hdrhistogram::Histogram<u64>>,
}

impl Histogram {
    pub fn new() -> Self {
        Histogram::with_sigfig(3).unwrap()
    }

    pub fn with_sigfig(sigfig: u8) -> Result<Self, CreationError> {
        let inner = hdrhistogram::Histogram::new(sigfig)?;
        Ok(Histogram {
            inner: Mutex::new(inner),
        })
    }

    /// A fixed size histogram tracking values in `[1, high]`.
    pub fn with_max(high: u64, sigfig: u8) -> Result<Self, CreationError> {
        let inner = hdrhistogram::Histogram::new_with_max(high, sigfig)?;
        Ok(Histogram {
            inner: Mutex::new(inner),
        })
    }

    pub fn update(&self, value: u64) {
        let mut inner = self.inner.lock().unwrap();
        inner.saturating_record(value);
    }

    pub fn count(&self) -> u64 {
        self.inner.lock().unwrap().len()
    }

    pub fn snapshot(&self) -> Snapshot {
        let inner = self.inner.lock().unwrap();
        Snapshot::from_histogram(&inner)
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Histogram::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        let h = Histogram::new();
        assert_eq!(h.count(), 0);
        assert_eq!(h.snapshot(), Snapshot::default());
    }

    #[test]
    fn stats() {
        let h = Histogram::new();
        for v in 1..=100 {
            h.update(v);
        }
        assert_eq!(h.count(), 100);

        let s = h.snapshot();
        assert_eq!(s.count(), 100);
        assert_eq!(s.min(), 1);
        assert_eq!(s.max(), 100);
        assert!((s.mean() - 50.5).abs() < 0.01);
        assert!((50..=51).contains(&s.median()));
        assert!((75..=76).contains(&s.p75()));
        assert!((95..=96).contains(&s.p95()));
        assert!((99..=100).contains(&s.p99()));
        assert_eq!(s.p999(), 100);
        assert!(s.std_dev() > 28.0 && s.std_dev() < 29.5);
    }

    #[test]
    fn large_value() {
        let h = Histogram::new();
        h.update(0);
        h.update(u64::MAX >> 4);
        let s = h.snapshot();
        assert_eq!(s.count(), 2);
        assert_eq!(s.min(), 0);
        assert!(s.max() >= u64::MAX >> 5);
    }

    #[test]
    fn out_of_range() {
        let h = Histogram::with_max(1000, 3).unwrap();
        h.update(10);
        h.update(1_000_000);
        assert_eq!(h.count(), 2);
        let s = h.snapshot();
        assert!(s.max() >= 1000 && s.max() < 1_000_000);
    }
}
