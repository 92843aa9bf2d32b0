/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

mod adapter;
pub use adapter::{AdapterState, EnableError, ReporterAdapter, ReporterSet};

pub mod config;
pub use config::{ElasticsearchReporterConfig, ReporterConfig};

mod point;
pub use point::{Point, PointTags};

mod reporter;
pub use reporter::{ElasticsearchReporter, ElasticsearchReporterBuilder};

mod sender;
pub use sender::{ElasticsearchSender, ElasticsearchSenderConfig};
