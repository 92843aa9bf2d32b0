/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

#![cfg(feature = "http")]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use g3_es_reporter::config::{Credentials, HostPort, TimeUnit};
use g3_es_reporter::{ElasticsearchReporterConfig, ReporterAdapter};
use g3_metrics::{AtomicGauge, MetricRegistry};
use serde_json::Value;

struct BulkRequest {
    head: Vec<String>,
    body: String,
}

impl BulkRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.head.iter().skip(1).find_map(|line| {
            let (k, v) = line.split_once(':')?;
            k.trim().eq_ignore_ascii_case(name).then(|| v.trim())
        })
    }

    fn documents(&self) -> Vec<(Value, Value)> {
        let lines: Vec<&str> = self.body.lines().collect();
        lines
            .chunks(2)
            .map(|c| {
                (
                    serde_json::from_str(c[0]).unwrap(),
                    serde_json::from_str(c[1]).unwrap(),
                )
            })
            .collect()
    }
}

fn read_request(stream: &mut TcpStream) -> Option<BulkRequest> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);
    let mut head = Vec::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).ok()? == 0 {
            return None;
        }
        let line = line.trim_end().to_string();
        if line.is_empty() {
            break;
        }
        head.push(line);
    }

    let len = head
        .iter()
        .find_map(|l| {
            let (k, v) = l.split_once(':')?;
            k.eq_ignore_ascii_case("content-length")
                .then(|| v.trim().parse::<usize>().ok())?
        })
        .unwrap_or(0);
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).ok()?;

    let rsp = r#"{"took":1,"errors":false,"items":[]}"#;
    let rsp = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{rsp}",
        rsp.len()
    );
    stream.write_all(rsp.as_bytes()).ok()?;
    Some(BulkRequest {
        head,
        body: String::from_utf8(body).ok()?,
    })
}

fn spawn_server() -> (u16, mpsc::Receiver<BulkRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let (sender, receiver) = mpsc::channel();
    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else {
                continue;
            };
            if let Some(req) = read_request(&mut stream) {
                if sender.send(req).is_err() {
                    break;
                }
            }
        }
    });
    (port, receiver)
}

#[test]
fn report_to_bulk_api() {
    let (port, receiver) = spawn_server();

    let registry = Arc::new(MetricRegistry::new());
    registry.counter("requests").unwrap().inc_by(3);
    registry
        .register_gauge("pool.active", AtomicGauge::new(4))
        .unwrap();
    registry
        .register_gauge("pool.idle", AtomicGauge::new(1))
        .unwrap();

    let mut config = ElasticsearchReporterConfig::default();
    config.hosts_mut().add_host(HostPort::new("127.0.0.1", port));
    config.set_db_name("app-metrics".to_string());
    config.set_pipeline("metrics-pipeline".to_string());
    config.set_auth(Credentials::new("elastic", "changeme"));
    let common = config.common_mut();
    common.set_prefix("svc".to_string());
    common.add_tag("env".to_string(), "test".to_string());
    common.set_group_gauges(true);
    common.set_period(1, TimeUnit::Hours);

    let mut adapter = ReporterAdapter::new(config);
    assert!(adapter.enable(&registry));
    adapter.report();

    let req = receiver.recv_timeout(Duration::from_secs(10)).unwrap();
    assert!(
        req.head[0].starts_with("POST /_bulk?pipeline=metrics-pipeline "),
        "unexpected request line {}",
        req.head[0]
    );
    assert_eq!(
        req.header("authorization"),
        Some("Basic ZWxhc3RpYzpjaGFuZ2VtZQ==")
    );
    assert_eq!(req.header("content-type"), Some("application/x-ndjson"));

    let docs = req.documents();
    assert_eq!(docs.len(), 2);
    for (action, _) in &docs {
        assert_eq!(action["index"]["_index"], "app-metrics");
    }

    let (_, pool) = docs.iter().find(|(_, d)| d["name"] == "svc.pool").unwrap();
    assert_eq!(pool["fields"]["active"], 4);
    assert_eq!(pool["fields"]["idle"], 1);
    assert_eq!(pool["tags"]["env"], "test");
    assert!(pool["@timestamp"].as_str().unwrap().ends_with('Z'));

    let (_, requests) = docs
        .iter()
        .find(|(_, d)| d["name"] == "svc.requests")
        .unwrap();
    assert_eq!(requests["fields"]["count"], 3);
}

#[test]
fn periodic_emission() {
    let (port, receiver) = spawn_server();

    let registry = Arc::new(MetricRegistry::new());
    registry.meter("events").unwrap().mark(1);

    let mut config = ElasticsearchReporterConfig::default();
    config.hosts_mut().add_host(HostPort::new("127.0.0.1", port));
    config
        .common_mut()
        .set_period(200, TimeUnit::Milliseconds);

    let mut adapter = ReporterAdapter::new(config);
    assert!(adapter.enable(&registry));

    let req = receiver.recv_timeout(Duration::from_secs(5)).unwrap();
    let docs = req.documents();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].1["name"], "events");
    assert_eq!(docs[0].1["fields"]["count"], 1);
}
