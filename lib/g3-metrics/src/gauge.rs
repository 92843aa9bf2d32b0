/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::sync::atomic::{AtomicI64, Ordering};

use portable_atomic::AtomicF64;

use super::MetricValue;

/// A point-in-time reading, sampled every time a reporter runs.
pub trait Gauge: Send + Sync {
    fn value(&self) -> MetricValue;
}

pub struct FnGauge<F> {
    f: F,
}

impl<F> FnGauge<F>
where
    F: Fn() -> MetricValue + Send + Sync,
{
    pub fn new(f: F) -> Self {
        FnGauge { f }
    }
}

impl<F> Gauge for FnGauge<F>
where
    F: Fn() -> MetricValue + Send + Sync,
{
    fn value(&self) -> MetricValue {
        (self.f)()
    }
}

#[derive(Debug, Default)]
pub struct AtomicGauge {
    value: AtomicI64,
}

impl AtomicGauge {
    pub fn new(value: i64) -> Self {
        AtomicGauge {
            value: AtomicI64::new(value),
        }
    }

    pub fn set(&self, value: i64) {
        self.value.store(value, Ordering::Relaxed);
    }

    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }
}

impl Gauge for AtomicGauge {
    fn value(&self) -> MetricValue {
        MetricValue::Signed(self.get())
    }
}

#[derive(Debug)]
pub struct FloatGauge {
    value: AtomicF64,
}

impl FloatGauge {
    pub fn new(value: f64) -> Self {
        FloatGauge {
            value: AtomicF64::new(value),
        }
    }

    pub fn set(&self, value: f64) {
        self.value.store(value, Ordering::Relaxed);
    }

    pub fn get(&self) -> f64 {
        self.value.load(Ordering::Relaxed)
    }
}

impl Default for FloatGauge {
    fn default() -> Self {
        FloatGauge::new(0.0)
    }
}

impl Gauge for FloatGauge {
    fn value(&self) -> MetricValue {
        MetricValue::Double(self.get())
    }
}
