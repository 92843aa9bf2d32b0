/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::fmt;

use serde_json::Number;

/// A single numeric reading, as returned by gauges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Double(f64),
    Signed(i64),
    Unsigned(u64),
}

impl MetricValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            MetricValue::Double(f) => *f,
            MetricValue::Signed(i) => *i as f64,
            MetricValue::Unsigned(u) => *u as f64,
        }
    }

    /// Returns `None` for NaN and infinite values, which have no JSON form.
    pub fn as_json_number(&self) -> Option<Number> {
        match self {
            MetricValue::Double(f) => Number::from_f64(*f),
            MetricValue::Signed(i) => Some(Number::from(*i)),
            MetricValue::Unsigned(u) => Some(Number::from(*u)),
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Double(value)
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        MetricValue::Signed(value)
    }
}

impl From<u64> for MetricValue {
    fn from(value: u64) -> Self {
        MetricValue::Unsigned(value)
    }
}

impl From<i32> for MetricValue {
    fn from(value: i32) -> Self {
        MetricValue::Signed(value as i64)
    }
}

impl From<u32> for MetricValue {
    fn from(value: u32) -> Self {
        MetricValue::Unsigned(value as u64)
    }
}

impl From<usize> for MetricValue {
    fn from(value: usize) -> Self {
        MetricValue::Unsigned(value as u64)
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Unsigned(u) => itoa::Buffer::new().format(*u).fmt(f),
            MetricValue::Signed(i) => itoa::Buffer::new().format(*i).fmt(f),
            MetricValue::Double(v) => ryu::Buffer::new().format(*v).fmt(f),
        }
    }
}
