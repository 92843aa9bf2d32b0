/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::str::FromStr;

use log::warn;
use thiserror::Error;

pub const DEFAULT_ELASTICSEARCH_PORT: u16 = 9200;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostPortParseError {
    #[error("empty host")]
    EmptyHost,
    #[error("no port found in {0}")]
    MissingPort(String),
    #[error("invalid port in {0}")]
    InvalidPort(String),
    #[error("unclosed bracket in {0}")]
    UnclosedBracket(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostPort {
    host: String,
    port: u16,
}

impl HostPort {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        HostPort {
            host: host.into(),
            port,
        }
    }

    #[inline]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[inline]
    pub fn port(&self) -> u16 {
        self.port
    }

    fn parse(s: &str, default_port: Option<u16>) -> Result<Self, HostPortParseError> {
        let entry = HostEntry::parse(s)?;
        match entry.port.or(default_port) {
            Some(port) => Ok(HostPort::new(entry.host, port)),
            None => Err(HostPortParseError::MissingPort(s.trim().to_string())),
        }
    }

    pub fn parse_with_default_port(s: &str, default_port: u16) -> Result<Self, HostPortParseError> {
        HostPort::parse(s, Some(default_port))
    }
}

impl FromStr for HostPort {
    type Err = HostPortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HostPort::parse(s, None)
    }
}

impl fmt::Display for HostPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// A configured host whose port may be left to the default port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HostEntry {
    host: String,
    port: Option<u16>,
}

impl HostEntry {
    pub(crate) fn new(host: impl Into<String>, port: Option<u16>) -> Self {
        HostEntry {
            host: host.into(),
            port,
        }
    }

    pub(crate) fn parse(s: &str) -> Result<Self, HostPortParseError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(HostPortParseError::EmptyHost);
        }

        let (host, port) = if let Some(left) = s.strip_prefix('[') {
            let Some((host, right)) = left.split_once(']') else {
                return Err(HostPortParseError::UnclosedBracket(s.to_string()));
            };
            if right.is_empty() {
                (host, None)
            } else if let Some(port) = right.strip_prefix(':') {
                (host, Some(port))
            } else {
                return Err(HostPortParseError::InvalidPort(s.to_string()));
            }
        } else {
            match s.rsplit_once(':') {
                // bare ipv6 address
                Some((host, _)) if host.contains(':') => (s, None),
                Some((host, port)) => (host, Some(port)),
                None => (s, None),
            }
        };

        if host.is_empty() {
            return Err(HostPortParseError::EmptyHost);
        }
        let port = port
            .map(|p| u16::from_str(p).map_err(|_| HostPortParseError::InvalidPort(s.to_string())))
            .transpose()?;
        Ok(HostEntry::new(host, port))
    }

    fn resolve(&self, default_port: u16) -> HostPort {
        HostPort::new(self.host.clone(), self.port.unwrap_or(default_port))
    }
}

impl From<HostPort> for HostEntry {
    fn from(hp: HostPort) -> Self {
        HostEntry::new(hp.host, Some(hp.port))
    }
}

/// Target hosts, given either as a list or as a comma separated string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostListConfig {
    hosts: Vec<HostEntry>,
    hosts_string: Option<String>,
    default_port: u16,
}

impl Default for HostListConfig {
    fn default() -> Self {
        HostListConfig::new(DEFAULT_ELASTICSEARCH_PORT)
    }
}

impl HostListConfig {
    pub fn new(default_port: u16) -> Self {
        HostListConfig {
            hosts: Vec::new(),
            hosts_string: None,
            default_port,
        }
    }

    pub fn add_host(&mut self, host: HostPort) {
        self.hosts.push(host.into());
    }

    /// Add a host that will use the default port.
    pub fn add_host_name(&mut self, host: impl Into<String>) {
        self.hosts.push(HostEntry::new(host, None));
    }

    pub fn set_hosts(&mut self, hosts: Vec<HostPort>) {
        self.hosts = hosts.into_iter().map(HostEntry::from).collect();
    }

    #[cfg(feature = "yaml")]
    pub(crate) fn set_host_entries(&mut self, hosts: Vec<HostEntry>) {
        self.hosts = hosts;
    }

    pub fn set_hosts_string(&mut self, hosts: String) {
        self.hosts_string = Some(hosts);
    }

    pub fn set_default_port(&mut self, port: u16) {
        self.default_port = port;
    }

    #[inline]
    pub fn default_port(&self) -> u16 {
        self.default_port
    }

    /// The explicit host list takes precedence over the host string. The
    /// default port applies to both.
    pub fn full_host_list(&self) -> Result<Vec<HostPort>, HostPortParseError> {
        if !self.hosts.is_empty() {
            if self.hosts_string.is_some() {
                warn!("both hosts and hosts_string are set, the hosts_string will be ignored");
            }
            return Ok(self
                .hosts
                .iter()
                .map(|h| h.resolve(self.default_port))
                .collect());
        }

        let Some(s) = &self.hosts_string else {
            return Ok(Vec::new());
        };
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| HostPort::parse_with_default_port(s, self.default_port))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_host_port() {
        let hp = HostPort::from_str("es1:9201").unwrap();
        assert_eq!(hp.host(), "es1");
        assert_eq!(hp.port(), 9201);
        assert_eq!(hp.to_string(), "es1:9201");

        let hp = HostPort::parse_with_default_port("es1", 9200).unwrap();
        assert_eq!(hp, HostPort::new("es1", 9200));

        let hp = HostPort::from_str("[::1]:9300").unwrap();
        assert_eq!(hp.host(), "::1");
        assert_eq!(hp.to_string(), "[::1]:9300");

        let hp = HostPort::parse_with_default_port("fe80::1", 9200).unwrap();
        assert_eq!(hp.host(), "fe80::1");
        assert_eq!(hp.port(), 9200);
    }

    #[test]
    fn parse_host_port_err() {
        assert_eq!(HostPort::from_str(""), Err(HostPortParseError::EmptyHost));
        assert_eq!(HostPort::from_str(":9200"), Err(HostPortParseError::EmptyHost));
        assert!(matches!(
            HostPort::from_str("es1"),
            Err(HostPortParseError::MissingPort(_))
        ));
        assert!(matches!(
            HostPort::from_str("es1:http"),
            Err(HostPortParseError::InvalidPort(_))
        ));
        assert!(matches!(
            HostPort::from_str("es1:70000"),
            Err(HostPortParseError::InvalidPort(_))
        ));
        assert!(matches!(
            HostPort::from_str("[::1:9200"),
            Err(HostPortParseError::UnclosedBracket(_))
        ));
        assert!(matches!(
            HostPort::from_str("[::1]9200"),
            Err(HostPortParseError::InvalidPort(_))
        ));
    }

    #[test]
    fn host_list() {
        let mut config = HostListConfig::default();
        assert!(config.full_host_list().unwrap().is_empty());

        config.set_hosts_string(" es1:9201, es2 ,".to_string());
        assert_eq!(
            config.full_host_list().unwrap(),
            vec![HostPort::new("es1", 9201), HostPort::new("es2", 9200)]
        );

        config.set_default_port(19200);
        assert_eq!(
            config.full_host_list().unwrap()[1],
            HostPort::new("es2", 19200)
        );

        config.add_host(HostPort::new("es3", 9200));
        assert_eq!(
            config.full_host_list().unwrap(),
            vec![HostPort::new("es3", 9200)]
        );
    }

    #[test]
    fn host_list_default_port() {
        let mut config = HostListConfig::default();
        config.add_host_name("es1");
        config.add_host(HostPort::new("es2", 9201));
        config.set_default_port(19200);
        assert_eq!(
            config.full_host_list().unwrap(),
            vec![HostPort::new("es1", 19200), HostPort::new("es2", 9201)]
        );
    }

    #[test]
    fn host_list_err() {
        let mut config = HostListConfig::default();
        config.set_hosts_string("es1:x".to_string());
        assert!(config.full_host_list().is_err());
    }
}
