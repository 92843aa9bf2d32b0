/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use anyhow::Context;
use log::{error, info, warn};
use thiserror::Error;

use g3_metrics::MetricRegistry;

use crate::config::{ElasticsearchReporterConfig, HostPortParseError, ReporterConfig};
use crate::reporter::ElasticsearchReporter;
use crate::sender::{ElasticsearchSender, ElasticsearchSenderConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterState {
    Unstarted,
    Enabled,
    Disabled,
}

#[derive(Debug, Error)]
pub enum EnableError {
    #[error("http transport is not available, cannot enable ElasticsearchReporter")]
    TransportUnavailable,
    #[error("invalid host list, cannot enable ElasticsearchReporter: {0}")]
    InvalidHostList(#[from] HostPortParseError),
    #[error("No hosts specified, cannot enable ElasticsearchReporter")]
    NoHosts,
    #[error("Only 1 host can be specified, cannot enable ElasticsearchReporter ({0} found)")]
    MultipleHosts(usize),
    #[error("Failed to enable ElasticsearchReporter for {host}:{port}: {error:#}")]
    Build {
        host: String,
        port: u16,
        error: anyhow::Error,
    },
}

/// Enables an [`ElasticsearchReporter`] for exactly one Elasticsearch node.
///
/// Failures are logged and leave the adapter disabled, in which case
/// [`ReporterAdapter::report`] does nothing.
pub struct ReporterAdapter {
    config: ElasticsearchReporterConfig,
    state: AdapterState,
    reporter: Option<ElasticsearchReporter>,
}

impl ReporterAdapter {
    pub fn new(config: ElasticsearchReporterConfig) -> Self {
        ReporterAdapter {
            config,
            state: AdapterState::Unstarted,
            reporter: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &ElasticsearchReporterConfig {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> AdapterState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state == AdapterState::Enabled
    }

    pub fn enable(&mut self, registry: &Arc<MetricRegistry>) -> bool {
        match self.try_enable(registry) {
            Ok(_) => true,
            Err(e) => {
                error!("{e}");
                false
            }
        }
    }

    pub fn try_enable(&mut self, registry: &Arc<MetricRegistry>) -> Result<(), EnableError> {
        if self.state == AdapterState::Enabled {
            return Ok(());
        }

        match self.build_and_start(registry) {
            Ok(reporter) => {
                self.reporter = Some(reporter);
                self.state = AdapterState::Enabled;
                Ok(())
            }
            Err(e) => {
                self.state = AdapterState::Disabled;
                Err(e)
            }
        }
    }

    fn build_and_start(
        &self,
        registry: &Arc<MetricRegistry>,
    ) -> Result<ElasticsearchReporter, EnableError> {
        if !cfg!(feature = "http") {
            return Err(EnableError::TransportUnavailable);
        }

        let mut hosts = self.config.full_host_list()?;
        let target = match hosts.len() {
            0 => return Err(EnableError::NoHosts),
            1 => hosts.remove(0),
            n => return Err(EnableError::MultipleHosts(n)),
        };

        info!(
            "Enabling ElasticsearchReporter to {}:{}",
            target.host(),
            target.port()
        );
        self.start_reporter(registry, &self.config.sender_config(&target))
            .map_err(|error| EnableError::Build {
                host: target.host().to_string(),
                port: target.port(),
                error,
            })
    }

    fn start_reporter(
        &self,
        registry: &Arc<MetricRegistry>,
        sender_config: &ElasticsearchSenderConfig,
    ) -> anyhow::Result<ElasticsearchReporter> {
        self.config.check()?;
        let common = self.config.common();
        let period = common.period_duration()?;
        let sender =
            ElasticsearchSender::new(sender_config).context("failed to create sender")?;

        let reporter = ElasticsearchReporter::for_registry(registry.clone())
            .convert_rates_to(common.rate_unit())
            .convert_durations_to(common.duration_unit())
            .with_tags(common.resolved_tags())
            .group_gauges(common.group_gauges())
            .filter(common.build_filter())
            .build(sender);
        reporter
            .start(period)
            .context("failed to start periodic reporting")?;
        Ok(reporter)
    }

    pub fn report(&self) {
        if let Some(reporter) = &self.reporter {
            reporter.report();
        }
    }
}

/// One adapter per configured Elasticsearch reporter.
pub struct ReporterSet {
    adapters: Vec<ReporterAdapter>,
}

impl ReporterSet {
    pub fn from_config(config: ReporterConfig) -> Self {
        let adapters = config
            .into_elasticsearch()
            .into_iter()
            .map(ReporterAdapter::new)
            .collect();
        ReporterSet { adapters }
    }

    pub fn adapters(&self) -> &[ReporterAdapter] {
        &self.adapters
    }

    /// Returns true if at least one reporter is enabled.
    pub fn enable_all(&mut self, registry: &Arc<MetricRegistry>) -> bool {
        let mut enabled = false;
        for adapter in &mut self.adapters {
            if adapter.enable(registry) {
                enabled = true;
            }
        }
        if !enabled && !self.adapters.is_empty() {
            warn!("no metrics reporter enabled");
        }
        enabled
    }

    pub fn report(&self) {
        for adapter in &self.adapters {
            adapter.report();
        }
    }
}
