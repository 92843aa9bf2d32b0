/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::time::Duration;

use crate::config::Credentials;
use crate::point::Point;

mod format;
use format::BulkFormatter;

#[cfg(feature = "http")]
mod client;

#[cfg(test)]
mod buf;
#[cfg(test)]
pub(crate) use buf::BufBulkSink;

pub(crate) trait BulkSink: Send + Sync {
    fn send_bulk(&self, body: Vec<u8>) -> anyhow::Result<()>;
}

/// Everything needed to reach one Elasticsearch node.
#[derive(Debug, Clone)]
pub struct ElasticsearchSenderConfig {
    protocol: String,
    host: String,
    port: u16,
    db_name: String,
    auth: Option<Credentials>,
    connection_timeout: Duration,
    read_timeout: Duration,
    prefix: String,
    pipeline: Option<String>,
}

impl ElasticsearchSenderConfig {
    pub fn new(protocol: &str, host: &str, port: u16, db_name: &str) -> Self {
        ElasticsearchSenderConfig {
            protocol: protocol.to_string(),
            host: host.to_string(),
            port,
            db_name: db_name.to_string(),
            auth: None,
            connection_timeout: Duration::from_secs(1),
            read_timeout: Duration::from_secs(1),
            prefix: String::new(),
            pipeline: None,
        }
    }

    pub fn set_auth(&mut self, auth: Credentials) {
        self.auth = Some(auth);
    }

    pub fn set_timeouts(&mut self, connection_timeout: Duration, read_timeout: Duration) {
        self.connection_timeout = connection_timeout;
        self.read_timeout = read_timeout;
    }

    /// Prepended to every measurement name, joined by a dot.
    pub fn set_prefix(&mut self, prefix: String) {
        self.prefix = prefix;
    }

    pub fn set_pipeline(&mut self, pipeline: String) {
        self.pipeline = Some(pipeline);
    }

    #[inline]
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    #[inline]
    pub fn auth(&self) -> Option<&Credentials> {
        self.auth.as_ref()
    }

    #[inline]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[inline]
    pub fn port(&self) -> u16 {
        self.port
    }

    #[inline]
    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn pipeline(&self) -> Option<&str> {
        self.pipeline.as_deref()
    }

    /// The whole request, including connect, must finish within this time.
    pub fn request_timeout(&self) -> Duration {
        self.connection_timeout.saturating_add(self.read_timeout)
    }
}

/// Writes points to the bulk API of a single Elasticsearch node.
pub struct ElasticsearchSender {
    formatter: BulkFormatter,
    sink: Box<dyn BulkSink>,
}

impl ElasticsearchSender {
    pub fn new(config: &ElasticsearchSenderConfig) -> anyhow::Result<Self> {
        let sink = build_sink(config)?;
        Ok(ElasticsearchSender {
            formatter: BulkFormatter::new(&config.db_name, &config.prefix),
            sink,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_sink(config: &ElasticsearchSenderConfig, sink: Box<dyn BulkSink>) -> Self {
        ElasticsearchSender {
            formatter: BulkFormatter::new(&config.db_name, &config.prefix),
            sink,
        }
    }

    /// All points go into one bulk request. Nothing is sent if there are no
    /// points.
    pub fn write_points(&self, points: &[Point]) -> anyhow::Result<()> {
        if points.is_empty() {
            return Ok(());
        }

        let mut body = Vec::with_capacity(points.len() * 256);
        self.formatter.fill_body(points, &mut body);
        self.sink.send_bulk(body)
    }
}

#[cfg(feature = "http")]
fn build_sink(config: &ElasticsearchSenderConfig) -> anyhow::Result<Box<dyn BulkSink>> {
    let sink = client::HttpBulkSink::new(config)?;
    Ok(Box::new(sink))
}

#[cfg(not(feature = "http"))]
fn build_sink(_config: &ElasticsearchSenderConfig) -> anyhow::Result<Box<dyn BulkSink>> {
    Err(anyhow::anyhow!("http transport support is not compiled in"))
}
