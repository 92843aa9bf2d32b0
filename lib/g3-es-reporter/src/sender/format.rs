/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use anyhow::anyhow;
use chrono::SecondsFormat;
use serde_json::{Map, Value};

use crate::point::Point;

pub(super) struct BulkFormatter {
    action_line: Vec<u8>,
    prefix: String,
}

impl BulkFormatter {
    pub(super) fn new(index: &str, prefix: &str) -> Self {
        let mut action = Map::with_capacity(1);
        let mut index_map = Map::with_capacity(1);
        index_map.insert("_index".to_string(), Value::String(index.to_string()));
        action.insert("index".to_string(), Value::Object(index_map));
        let mut action_line = Value::Object(action).to_string().into_bytes();
        action_line.push(b'\n');

        BulkFormatter {
            action_line,
            prefix: prefix.to_string(),
        }
    }

    fn metric_name(&self, measurement: &str) -> String {
        if self.prefix.is_empty() {
            measurement.to_string()
        } else {
            format!("{}.{measurement}", self.prefix)
        }
    }

    fn build_document(&self, point: &Point) -> Value {
        let mut map = Map::with_capacity(4);
        map.insert(
            "@timestamp".to_string(),
            Value::String(point.time().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        map.insert(
            "name".to_string(),
            Value::String(self.metric_name(point.measurement())),
        );
        let mut tag_map = Map::with_capacity(point.tags().len());
        for (name, value) in point.tags() {
            tag_map.insert(name.to_string(), Value::String(value.to_string()));
        }
        map.insert("tags".to_string(), Value::Object(tag_map));
        let mut field_map = Map::with_capacity(point.fields().len());
        for (name, value) in point.fields() {
            // skip NaN and infinite values
            if let Some(n) = value.as_json_number() {
                field_map.insert(name.to_string(), Value::Number(n));
            }
        }
        map.insert("fields".to_string(), Value::Object(field_map));
        Value::Object(map)
    }

    pub(super) fn fill_body(&self, points: &[Point], body_buf: &mut Vec<u8>) {
        for point in points {
            let doc = self.build_document(point);
            body_buf.extend_from_slice(&self.action_line);
            body_buf.extend_from_slice(doc.to_string().as_bytes());
            body_buf.push(b'\n');
        }
    }
}

fn first_item_error(rsp: &Value) -> Option<String> {
    let items = rsp.get("items")?.as_array()?;
    for item in items {
        let Some(op) = item.as_object().and_then(|m| m.values().next()) else {
            continue;
        };
        if let Some(e) = op.get("error") {
            let reason = e
                .get("reason")
                .and_then(Value::as_str)
                .map(|s| s.to_string())
                .unwrap_or_else(|| e.to_string());
            return Some(reason);
        }
    }
    None
}

#[cfg_attr(not(feature = "http"), allow(dead_code))]
pub(super) fn check_bulk_response(status: u16, body: &[u8]) -> anyhow::Result<()> {
    if !(200..300).contains(&status) {
        return if let Ok(detail) = std::str::from_utf8(body) {
            Err(anyhow!("error response: {status} {detail}"))
        } else {
            Err(anyhow!("error response: {status}"))
        };
    }

    let Ok(rsp) = serde_json::from_slice::<Value>(body) else {
        return Ok(());
    };
    if rsp.get("errors").and_then(Value::as_bool) != Some(true) {
        return Ok(());
    }
    match first_item_error(&rsp) {
        Some(reason) => Err(anyhow!("bulk request has failed items: {reason}")),
        None => Err(anyhow!("bulk request has failed items")),
    }
}
