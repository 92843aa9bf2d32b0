/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use g3_metrics::MetricValue;

pub type PointTags = Arc<BTreeMap<String, String>>;

/// One document in the bulk request, holding all fields of a metric.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    measurement: String,
    time: DateTime<Utc>,
    tags: PointTags,
    fields: BTreeMap<String, MetricValue>,
}

impl Point {
    pub fn new(measurement: impl Into<String>, time: DateTime<Utc>, tags: PointTags) -> Self {
        Point {
            measurement: measurement.into(),
            time,
            tags,
            fields: BTreeMap::new(),
        }
    }

    pub fn add_field(&mut self, name: impl Into<String>, value: impl Into<MetricValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub(crate) fn with_field(mut self, name: &str, value: impl Into<MetricValue>) -> Self {
        self.add_field(name, value);
        self
    }

    #[inline]
    pub fn measurement(&self) -> &str {
        &self.measurement
    }

    #[inline]
    pub fn time(&self) -> &DateTime<Utc> {
        &self.time
    }

    #[inline]
    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    #[inline]
    pub fn fields(&self) -> &BTreeMap<String, MetricValue> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&MetricValue> {
        self.fields.get(name)
    }
}
