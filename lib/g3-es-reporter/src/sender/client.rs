/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use anyhow::{Context, anyhow};
use http::{HeaderMap, HeaderValue, header};
use reqwest::Url;
use reqwest::blocking::Client;

use super::{BulkSink, ElasticsearchSenderConfig, format};

pub(super) struct HttpBulkSink {
    url: Url,
    client: Client,
}

fn build_bulk_url(config: &ElasticsearchSenderConfig) -> anyhow::Result<Url> {
    let scheme = config.protocol.to_lowercase();
    match scheme.as_str() {
        "http" | "https" => {}
        _ => return Err(anyhow!("unsupported protocol {}", config.protocol)),
    }

    let url = if config.host.contains(':') {
        format!("{scheme}://[{}]:{}/_bulk", config.host, config.port)
    } else {
        format!("{scheme}://{}:{}/_bulk", config.host, config.port)
    };
    let mut url = Url::parse(&url).map_err(|e| anyhow!("invalid bulk url {url}: {e}"))?;
    if let Some(pipeline) = &config.pipeline {
        url.query_pairs_mut().append_pair("pipeline", pipeline);
    }
    Ok(url)
}

impl HttpBulkSink {
    pub(super) fn new(config: &ElasticsearchSenderConfig) -> anyhow::Result<Self> {
        let url = build_bulk_url(config)?;

        let mut static_headers = HeaderMap::new();
        static_headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-ndjson"),
        );
        static_headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(auth) = &config.auth {
            let mut value = HeaderValue::from_str(&auth.basic_auth_value())
                .map_err(|e| anyhow!("invalid basic auth header value: {e}"))?;
            value.set_sensitive(true);
            static_headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(static_headers)
            .connect_timeout(config.connection_timeout)
            .timeout(config.request_timeout())
            .build()
            .context("failed to build http client")?;
        Ok(HttpBulkSink { url, client })
    }
}

impl BulkSink for HttpBulkSink {
    fn send_bulk(&self, body: Vec<u8>) -> anyhow::Result<()> {
        let rsp = self
            .client
            .post(self.url.clone())
            .body(body)
            .send()
            .map_err(|e| anyhow!("failed to send bulk request to {}: {e}", self.url))?;
        let status = rsp.status().as_u16();
        let body = rsp
            .bytes()
            .map_err(|e| anyhow!("failed to read bulk response from {}: {e}", self.url))?;
        format::check_bulk_response(status, &body)
    }
}
