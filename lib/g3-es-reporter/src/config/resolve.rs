/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::net::ToSocketAddrs;
use std::sync::OnceLock;

use log::warn;

const HOST_NAME: &str = "${host.name}";
const HOST_NAME_SHORT: &str = "${host.name.short}";
const HOST_FQDN: &str = "${host.fqdn}";
const HOST_ADDRESS: &str = "${host.address}";

static LOCAL_HOST_NAME: OnceLock<Option<String>> = OnceLock::new();
static LOCAL_HOST_ADDRESS: OnceLock<Option<String>> = OnceLock::new();

#[cfg(unix)]
fn load_host_name() -> Option<String> {
    let uname = rustix::system::uname();
    let name = uname.nodename().to_str().ok()?;
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(not(unix))]
fn load_host_name() -> Option<String> {
    std::env::var("COMPUTERNAME").ok().filter(|s| !s.is_empty())
}

fn local_host_name() -> Option<&'static str> {
    LOCAL_HOST_NAME.get_or_init(load_host_name).as_deref()
}

fn local_host_address() -> Option<&'static str> {
    LOCAL_HOST_ADDRESS
        .get_or_init(|| {
            let name = local_host_name()?;
            let addr = (name, 0).to_socket_addrs().ok()?.next()?;
            Some(addr.ip().to_string())
        })
        .as_deref()
}

fn placeholder_value(placeholder: &str) -> Option<&'static str> {
    match placeholder {
        HOST_NAME | HOST_FQDN => local_host_name(),
        HOST_NAME_SHORT => local_host_name().map(|s| s.split('.').next().unwrap_or(s)),
        HOST_ADDRESS => local_host_address(),
        _ => None,
    }
}

/// Substitute the local host placeholders in `s`.
///
/// Placeholders that can not be resolved are kept as is.
pub(crate) fn resolve_host_placeholders(s: &str) -> String {
    if !s.contains("${") {
        return s.to_string();
    }

    let mut resolved = s.to_string();
    for placeholder in [HOST_NAME_SHORT, HOST_NAME, HOST_FQDN, HOST_ADDRESS] {
        if !resolved.contains(placeholder) {
            continue;
        }
        match placeholder_value(placeholder) {
            Some(value) => resolved = resolved.replace(placeholder, value),
            None => warn!("unable to resolve {placeholder} in {s}"),
        }
    }
    resolved
}
