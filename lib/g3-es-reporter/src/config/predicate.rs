/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::str::FromStr;
use std::sync::Arc;

use anyhow::anyhow;
use regex::Regex;

use g3_metrics::{AllMetrics, Metric, MetricFilter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PredicateColor {
    /// Only report the matched metrics.
    #[default]
    White,
    /// Report all metrics except the matched ones.
    Black,
}

impl FromStr for PredicateColor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "white" | "whitelist" | "allow" => Ok(PredicateColor::White),
            "black" | "blacklist" | "deny" => Ok(PredicateColor::Black),
            _ => Err(anyhow!("unknown predicate color {s}")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MetricPredicateConfig {
    color: PredicateColor,
    use_qualified_name: bool,
    patterns: Vec<Regex>,
}

impl PartialEq for MetricPredicateConfig {
    fn eq(&self, other: &Self) -> bool {
        self.color == other.color
            && self.use_qualified_name == other.use_qualified_name
            && self.patterns.len() == other.patterns.len()
            && self
                .patterns
                .iter()
                .zip(other.patterns.iter())
                .all(|(a, b)| a.as_str() == b.as_str())
    }
}

impl MetricPredicateConfig {
    pub fn new(color: PredicateColor) -> Self {
        MetricPredicateConfig {
            color,
            use_qualified_name: false,
            patterns: Vec::new(),
        }
    }

    #[inline]
    pub fn color(&self) -> PredicateColor {
        self.color
    }

    pub fn set_color(&mut self, color: PredicateColor) {
        self.color = color;
    }

    /// Accepted for config compatibility, metric names are always matched
    /// as registered.
    pub fn set_use_qualified_name(&mut self, enable: bool) {
        self.use_qualified_name = enable;
    }

    #[inline]
    pub fn use_qualified_name(&self) -> bool {
        self.use_qualified_name
    }

    /// The pattern must match the whole metric name.
    pub fn add_pattern(&mut self, pattern: &str) -> Result<(), regex::Error> {
        let regex = Regex::new(&format!("^(?:{pattern})$"))?;
        self.patterns.push(regex);
        Ok(())
    }

    pub fn allow(&self, name: &str) -> bool {
        let matched = self.patterns.iter().any(|r| r.is_match(name));
        match self.color {
            PredicateColor::White => matched,
            PredicateColor::Black => !matched,
        }
    }
}

struct PredicateFilter {
    predicate: MetricPredicateConfig,
}

impl MetricFilter for PredicateFilter {
    fn matches(&self, name: &str, _metric: &Metric) -> bool {
        self.predicate.allow(name)
    }
}

pub(crate) fn build_metric_filter(
    predicate: Option<&MetricPredicateConfig>,
) -> Arc<dyn MetricFilter> {
    match predicate {
        Some(p) => Arc::new(PredicateFilter {
            predicate: p.clone(),
        }),
        None => Arc::new(AllMetrics),
    }
}
