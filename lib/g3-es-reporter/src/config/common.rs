/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;

use g3_metrics::MetricFilter;

use super::{MetricPredicateConfig, TimeUnit, predicate, resolve};

const DEFAULT_PERIOD: u64 = 60;

/// Settings shared by every kind of reporter.
#[derive(Debug, Clone, PartialEq)]
pub struct ReporterCommonConfig {
    period: u64,
    time_unit: TimeUnit,
    fixed_period: Option<Duration>,
    rate_unit: TimeUnit,
    duration_unit: TimeUnit,
    prefix: String,
    tags: BTreeMap<String, String>,
    predicate: Option<MetricPredicateConfig>,
    group_gauges: bool,
}

impl Default for ReporterCommonConfig {
    fn default() -> Self {
        ReporterCommonConfig {
            period: DEFAULT_PERIOD,
            time_unit: TimeUnit::Seconds,
            fixed_period: None,
            rate_unit: TimeUnit::Seconds,
            duration_unit: TimeUnit::Milliseconds,
            prefix: String::new(),
            tags: BTreeMap::new(),
            predicate: None,
            group_gauges: false,
        }
    }
}

impl ReporterCommonConfig {
    pub fn set_period(&mut self, period: u64, time_unit: TimeUnit) {
        self.period = period;
        self.time_unit = time_unit;
        self.fixed_period = None;
    }

    pub(crate) fn set_period_value(&mut self, period: u64) {
        self.period = period;
        self.fixed_period = None;
    }

    /// Set an exact period, which the time unit no longer applies to.
    pub fn set_period_duration(&mut self, period: Duration) {
        self.fixed_period = Some(period);
    }

    pub(crate) fn set_time_unit(&mut self, time_unit: TimeUnit) {
        self.time_unit = time_unit;
    }

    #[inline]
    pub fn period(&self) -> u64 {
        self.period
    }

    #[inline]
    pub fn time_unit(&self) -> TimeUnit {
        self.time_unit
    }

    pub fn period_duration(&self) -> anyhow::Result<Duration> {
        if let Some(period) = self.fixed_period {
            if period.is_zero() {
                return Err(anyhow!("reporting period should not be zero"));
            }
            return Ok(period);
        }
        if self.period == 0 {
            return Err(anyhow!("reporting period should not be zero"));
        }
        self.time_unit
            .duration_of(self.period)
            .ok_or_else(|| anyhow!("reporting period {} {} is too large", self.period, self.time_unit))
    }

    pub fn set_rate_unit(&mut self, unit: TimeUnit) {
        self.rate_unit = unit;
    }

    #[inline]
    pub fn rate_unit(&self) -> TimeUnit {
        self.rate_unit
    }

    pub fn set_duration_unit(&mut self, unit: TimeUnit) {
        self.duration_unit = unit;
    }

    #[inline]
    pub fn duration_unit(&self) -> TimeUnit {
        self.duration_unit
    }

    pub fn set_prefix(&mut self, prefix: String) {
        self.prefix = prefix;
    }

    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn resolved_prefix(&self) -> String {
        resolve::resolve_host_placeholders(&self.prefix)
    }

    pub fn add_tag(&mut self, name: String, value: String) {
        self.tags.insert(name, value);
    }

    #[inline]
    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    pub fn resolved_tags(&self) -> BTreeMap<String, String> {
        self.tags
            .iter()
            .map(|(k, v)| (k.clone(), resolve::resolve_host_placeholders(v)))
            .collect()
    }

    pub fn set_predicate(&mut self, predicate: MetricPredicateConfig) {
        self.predicate = Some(predicate);
    }

    pub fn predicate(&self) -> Option<&MetricPredicateConfig> {
        self.predicate.as_ref()
    }

    pub(crate) fn build_filter(&self) -> Arc<dyn MetricFilter> {
        predicate::build_metric_filter(self.predicate.as_ref())
    }

    pub fn set_group_gauges(&mut self, enable: bool) {
        self.group_gauges = enable;
    }

    #[inline]
    pub fn group_gauges(&self) -> bool {
        self.group_gauges
    }

    pub(crate) fn check(&self) -> anyhow::Result<()> {
        self.period_duration()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period() {
        let mut config = ReporterCommonConfig::default();
        assert_eq!(config.period_duration().unwrap(), Duration::from_secs(60));

        config.set_period(500, TimeUnit::Milliseconds);
        assert_eq!(
            config.period_duration().unwrap(),
            Duration::from_millis(500)
        );

        config.set_period(0, TimeUnit::Seconds);
        assert!(config.period_duration().is_err());
        assert!(config.check().is_err());

        config.set_period(u64::MAX, TimeUnit::Days);
        assert!(config.period_duration().is_err());
    }

    #[test]
    fn fixed_period() {
        let mut config = ReporterCommonConfig::default();
        config.set_period_duration(Duration::from_secs(30));
        config.set_time_unit(TimeUnit::Minutes);
        assert_eq!(config.period_duration().unwrap(), Duration::from_secs(30));

        config.set_period_duration(Duration::ZERO);
        assert!(config.check().is_err());

        config.set_period(2, TimeUnit::Minutes);
        assert_eq!(config.period_duration().unwrap(), Duration::from_secs(120));
    }

    #[test]
    fn plain_tags() {
        let mut config = ReporterCommonConfig::default();
        config.add_tag("env".to_string(), "prod".to_string());
        config.set_prefix("app".to_string());
        assert_eq!(config.resolved_prefix(), "app");
        assert_eq!(config.resolved_tags().get("env").unwrap(), "prod");
    }
}
