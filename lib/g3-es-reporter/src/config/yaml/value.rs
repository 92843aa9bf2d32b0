/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, anyhow};
use humanize_rs::ParseError;
use yaml_rust::{Yaml, yaml};

use crate::config::host::HostEntry;
use crate::config::{Credentials, TimeUnit};

pub(super) fn normalize_key(raw: &str) -> String {
    raw.to_lowercase().replace('-', "_")
}

pub(super) fn foreach_kv<F>(table: &yaml::Hash, mut f: F) -> anyhow::Result<()>
where
    F: FnMut(&str, &Yaml) -> anyhow::Result<()>,
{
    for (k, v) in table.iter() {
        if let Yaml::String(key) = k {
            f(key, v).context(format!("failed to parse value of key {key}"))?;
        } else {
            return Err(anyhow!("key in hash should be string"));
        }
    }
    Ok(())
}

pub(super) fn as_string(v: &Yaml) -> anyhow::Result<String> {
    match v {
        Yaml::String(s) => Ok(s.to_string()),
        Yaml::Integer(i) => Ok(i.to_string()),
        Yaml::Real(s) => Ok(s.to_string()),
        Yaml::Boolean(b) => Ok(b.to_string()),
        _ => Err(anyhow!(
            "yaml value type for string should be 'string' / 'integer' / 'real' / 'boolean'"
        )),
    }
}

pub(super) fn as_bool(v: &Yaml) -> anyhow::Result<bool> {
    match v {
        Yaml::Boolean(b) => Ok(*b),
        Yaml::String(s) => match s.to_lowercase().as_str() {
            "on" | "true" | "yes" | "1" => Ok(true),
            "off" | "false" | "no" | "0" => Ok(false),
            _ => Err(anyhow!("invalid yaml string value for 'bool': {s}")),
        },
        Yaml::Integer(i) => Ok(*i != 0),
        _ => Err(anyhow!(
            "yaml value type for 'bool' should be 'boolean' / 'string' / 'integer'"
        )),
    }
}

pub(super) fn as_u16(v: &Yaml) -> anyhow::Result<u16> {
    match v {
        Yaml::String(s) => Ok(u16::from_str(s)?),
        Yaml::Integer(i) => Ok(u16::try_from(*i)?),
        _ => Err(anyhow!(
            "yaml value type for 'u16' should be 'string' or 'integer'"
        )),
    }
}

pub(super) fn as_u64(v: &Yaml) -> anyhow::Result<u64> {
    match v {
        Yaml::String(s) => Ok(u64::from_str(s)?),
        Yaml::Integer(i) => Ok(u64::try_from(*i)?),
        _ => Err(anyhow!(
            "yaml value type for 'u64' should be 'string' or 'integer'"
        )),
    }
}

/// A single value is taken as a list of one element.
pub(super) fn as_list<T, F>(v: &Yaml, convert: F) -> anyhow::Result<Vec<T>>
where
    F: Fn(&Yaml) -> anyhow::Result<T>,
{
    match v {
        Yaml::Array(seq) => seq
            .iter()
            .enumerate()
            .map(|(i, v)| convert(v).context(format!("invalid value for list element #{i}")))
            .collect(),
        _ => {
            let node = convert(v).context("invalid single value for the list")?;
            Ok(vec![node])
        }
    }
}

pub(super) fn as_string_map(v: &Yaml) -> anyhow::Result<BTreeMap<String, String>> {
    if let Yaml::Hash(map) = v {
        let mut table = BTreeMap::new();
        foreach_kv(map, |k, v| {
            let value = as_string(v)?;
            table.insert(k.to_string(), value);
            Ok(())
        })?;
        Ok(table)
    } else {
        Err(anyhow!("the yaml value should be a 'map'"))
    }
}

pub(super) fn as_time_unit(v: &Yaml) -> anyhow::Result<TimeUnit> {
    if let Yaml::String(s) = v {
        TimeUnit::from_str(s).map_err(anyhow::Error::new)
    } else {
        Err(anyhow!("yaml value type for 'time unit' should be 'string'"))
    }
}

/// Parse a humanized duration, with `plain_unit` applied to unit-less numbers.
pub(super) fn as_duration(v: &Yaml, plain_unit: TimeUnit) -> anyhow::Result<Duration> {
    let plain = |u: u64| {
        plain_unit
            .duration_of(u)
            .ok_or_else(|| anyhow!("duration value {u} is out of range"))
    };
    match v {
        Yaml::String(value) => match humanize_rs::duration::parse(value) {
            Ok(v) => Ok(v),
            Err(ParseError::MissingUnit) => {
                let u = u64::from_str(value).map_err(|_| anyhow!("invalid duration string"))?;
                plain(u)
            }
            Err(e) => Err(anyhow!("invalid humanize duration string: {e}")),
        },
        Yaml::Integer(value) => {
            let u = u64::try_from(*value).map_err(|_| anyhow!("negative duration value"))?;
            plain(u)
        }
        _ => Err(anyhow!(
            "yaml value type for humanize duration should be 'string' or 'integer'"
        )),
    }
}

pub(super) fn as_host_entry(v: &Yaml) -> anyhow::Result<HostEntry> {
    match v {
        Yaml::String(s) => HostEntry::parse(s).map_err(anyhow::Error::new),
        Yaml::Hash(map) => {
            let mut host: Option<String> = None;
            let mut port: Option<u16> = None;
            foreach_kv(map, |k, v| match normalize_key(k).as_str() {
                "host" | "hostname" | "address" => {
                    host = Some(as_string(v).context(format!("invalid string value for key {k}"))?);
                    Ok(())
                }
                "port" => {
                    port = Some(as_u16(v).context(format!("invalid port value for key {k}"))?);
                    Ok(())
                }
                _ => Err(anyhow!("invalid key {k}")),
            })?;
            match host {
                Some(host) if !host.is_empty() => Ok(HostEntry::new(host, port)),
                _ => Err(anyhow!("no host has been set")),
            }
        }
        _ => Err(anyhow!(
            "yaml value type for 'host port' should be 'string' or 'map'"
        )),
    }
}

pub(super) fn as_credentials(v: &Yaml) -> anyhow::Result<Credentials> {
    match v {
        Yaml::String(s) => Credentials::from_str(s),
        Yaml::Hash(map) => {
            let mut username = String::new();
            let mut password = String::new();
            foreach_kv(map, |k, v| match normalize_key(k).as_str() {
                "username" | "user" => {
                    username = as_string(v).context(format!("invalid string value for key {k}"))?;
                    Ok(())
                }
                "password" => {
                    password = as_string(v).context(format!("invalid string value for key {k}"))?;
                    Ok(())
                }
                _ => Err(anyhow!("invalid key {k}")),
            })?;
            if username.is_empty() {
                return Err(anyhow!("no username has been set"));
            }
            Ok(Credentials::new(username, password))
        }
        _ => Err(anyhow!(
            "yaml value type for 'credentials' should be 'string' or 'map'"
        )),
    }
}
