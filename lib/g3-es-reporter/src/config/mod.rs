/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::time::Duration;

use anyhow::anyhow;

use crate::sender::ElasticsearchSenderConfig;

mod auth;
pub use auth::Credentials;

mod common;
pub use common::ReporterCommonConfig;

mod host;
pub use host::{DEFAULT_ELASTICSEARCH_PORT, HostListConfig, HostPort, HostPortParseError};

mod predicate;
pub use predicate::{MetricPredicateConfig, PredicateColor};

mod resolve;

mod unit;
pub use unit::{TimeUnit, TimeUnitParseError};

#[cfg(feature = "yaml")]
mod yaml;

const DEFAULT_PROTOCOL: &str = "http";
const DEFAULT_DB_NAME: &str = "metrics";
const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(1);
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq)]
pub struct ElasticsearchReporterConfig {
    common: ReporterCommonConfig,
    hosts: HostListConfig,
    protocol: String,
    db_name: String,
    auth: Option<Credentials>,
    connection_timeout: Duration,
    read_timeout: Duration,
    pipeline: Option<String>,
}

impl Default for ElasticsearchReporterConfig {
    fn default() -> Self {
        ElasticsearchReporterConfig {
            common: ReporterCommonConfig::default(),
            hosts: HostListConfig::new(DEFAULT_ELASTICSEARCH_PORT),
            protocol: DEFAULT_PROTOCOL.to_string(),
            db_name: DEFAULT_DB_NAME.to_string(),
            auth: None,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            pipeline: None,
        }
    }
}

impl ElasticsearchReporterConfig {
    #[inline]
    pub fn common(&self) -> &ReporterCommonConfig {
        &self.common
    }

    #[inline]
    pub fn common_mut(&mut self) -> &mut ReporterCommonConfig {
        &mut self.common
    }

    #[inline]
    pub fn hosts(&self) -> &HostListConfig {
        &self.hosts
    }

    #[inline]
    pub fn hosts_mut(&mut self) -> &mut HostListConfig {
        &mut self.hosts
    }

    pub fn full_host_list(&self) -> Result<Vec<HostPort>, HostPortParseError> {
        self.hosts.full_host_list()
    }

    pub fn set_protocol(&mut self, protocol: String) {
        self.protocol = protocol;
    }

    #[inline]
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn set_db_name(&mut self, db_name: String) {
        self.db_name = db_name;
    }

    #[inline]
    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    pub fn set_auth(&mut self, auth: Credentials) {
        self.auth = Some(auth);
    }

    pub fn auth(&self) -> Option<&Credentials> {
        self.auth.as_ref()
    }

    pub fn set_connection_timeout(&mut self, timeout: Duration) {
        self.connection_timeout = timeout;
    }

    #[inline]
    pub fn connection_timeout(&self) -> Duration {
        self.connection_timeout
    }

    pub fn set_read_timeout(&mut self, timeout: Duration) {
        self.read_timeout = timeout;
    }

    #[inline]
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    pub fn set_pipeline(&mut self, pipeline: String) {
        if pipeline.is_empty() {
            self.pipeline = None;
        } else {
            self.pipeline = Some(pipeline);
        }
    }

    pub fn pipeline(&self) -> Option<&str> {
        self.pipeline.as_deref()
    }

    pub(crate) fn sender_config(&self, target: &HostPort) -> ElasticsearchSenderConfig {
        let mut config = ElasticsearchSenderConfig::new(
            &self.protocol,
            target.host(),
            target.port(),
            &self.db_name,
        );
        if let Some(auth) = &self.auth {
            config.set_auth(auth.clone());
        }
        config.set_timeouts(self.connection_timeout, self.read_timeout);
        config.set_prefix(self.common.resolved_prefix());
        if let Some(pipeline) = &self.pipeline {
            config.set_pipeline(pipeline.clone());
        }
        config
    }

    pub fn check(&self) -> anyhow::Result<()> {
        self.common.check()?;
        match self.protocol.to_lowercase().as_str() {
            "http" | "https" => {}
            _ => return Err(anyhow!("unsupported protocol {}", self.protocol)),
        }
        if self.db_name.is_empty() {
            return Err(anyhow!("empty db name"));
        }
        if let Some(auth) = &self.auth {
            if auth.username().is_empty() {
                return Err(anyhow!("password is set but no username"));
            }
        }
        Ok(())
    }
}

/// All reporters configured in one config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReporterConfig {
    elasticsearch: Vec<ElasticsearchReporterConfig>,
}

impl ReporterConfig {
    pub fn add_elasticsearch(&mut self, config: ElasticsearchReporterConfig) {
        self.elasticsearch.push(config);
    }

    #[inline]
    pub fn elasticsearch(&self) -> &[ElasticsearchReporterConfig] {
        &self.elasticsearch
    }

    pub(crate) fn into_elasticsearch(self) -> Vec<ElasticsearchReporterConfig> {
        self.elasticsearch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default() {
        let config = ElasticsearchReporterConfig::default();
        assert_eq!(config.protocol(), "http");
        assert_eq!(config.db_name(), "metrics");
        assert_eq!(config.connection_timeout(), Duration::from_secs(1));
        assert_eq!(config.read_timeout(), Duration::from_secs(1));
        assert_eq!(config.hosts().default_port(), 9200);
        assert!(config.auth().is_none());
        assert!(config.pipeline().is_none());
        assert!(config.full_host_list().unwrap().is_empty());
        assert!(config.check().is_ok());
    }

    #[test]
    fn check() {
        let mut config = ElasticsearchReporterConfig::default();
        config.set_protocol("HTTPS".to_string());
        assert!(config.check().is_ok());
        config.set_protocol("gopher".to_string());
        assert!(config.check().is_err());

        let mut config = ElasticsearchReporterConfig::default();
        config.set_db_name(String::new());
        assert!(config.check().is_err());
    }

    #[test]
    fn pipeline() {
        let mut config = ElasticsearchReporterConfig::default();
        config.set_pipeline("p1".to_string());
        assert_eq!(config.pipeline(), Some("p1"));
        config.set_pipeline(String::new());
        assert!(config.pipeline().is_none());
    }

    #[test]
    fn sender_config() {
        let mut config = ElasticsearchReporterConfig::default();
        config.set_db_name("app".to_string());
        config.set_pipeline("p1".to_string());
        config.common_mut().set_prefix("svc".to_string());
        config.set_read_timeout(Duration::from_secs(3));

        let sc = config.sender_config(&HostPort::new("es1", 9201));
        assert_eq!(sc.host(), "es1");
        assert_eq!(sc.port(), 9201);
        assert_eq!(sc.db_name(), "app");
        assert_eq!(sc.prefix(), "svc");
        assert_eq!(sc.pipeline(), Some("p1"));
        assert_eq!(sc.request_timeout(), Duration::from_secs(4));
    }
}
