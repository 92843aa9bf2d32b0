/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use hdrhistogram::Histogram;

/// Distribution statistics taken from a histogram at one point in time.
///
/// All values are in the unit that was recorded, so a timer snapshot is in
/// nanoseconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    count: u64,
    min: u64,
    max: u64,
    mean: f64,
    std_dev: f64,
    median: u64,
    p75: u64,
    p95: u64,
    p98: u64,
    p99: u64,
    p999: u64,
}

impl Snapshot {
    pub(crate) fn from_histogram(h: &Histogram<u64>) -> Self {
        if h.is_empty() {
            return Snapshot::default();
        }

        Snapshot {
            count: h.len(),
            min: h.min(),
            max: h.max(),
            mean: h.mean(),
            std_dev: h.stdev(),
            median: h.value_at_quantile(0.5),
            p75: h.value_at_quantile(0.75),
            p95: h.value_at_quantile(0.95),
            p98: h.value_at_quantile(0.98),
            p99: h.value_at_quantile(0.99),
            p999: h.value_at_quantile(0.999),
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn min(&self) -> u64 {
        self.min
    }

    pub fn max(&self) -> u64 {
        self.max
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    pub fn median(&self) -> u64 {
        self.median
    }

    pub fn p75(&self) -> u64 {
        self.p75
    }

    pub fn p95(&self) -> u64 {
        self.p95
    }

    pub fn p98(&self) -> u64 {
        self.p98
    }

    pub fn p99(&self) -> u64 {
        self.p99
    }

    pub fn p999(&self) -> u64 {
        self.p999
    }
}
