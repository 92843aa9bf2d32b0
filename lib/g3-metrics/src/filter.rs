/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use super::Metric;

pub trait MetricFilter: Send + Sync {
    fn matches(&self, name: &str, metric: &Metric) -> bool;
}

pub struct AllMetrics;

impl MetricFilter for AllMetrics {
    fn matches(&self, _name: &str, _metric: &Metric) -> bool {
        true
    }
}

pub struct FnFilter<F>(pub F);

impl<F> MetricFilter for FnFilter<F>
where
    F: Fn(&str, &Metric) -> bool + Send + Sync,
{
    fn matches(&self, name: &str, metric: &Metric) -> bool {
        (self.0)(name, metric)
    }
}
