/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

mod value;
pub use value::MetricValue;

mod counter;
pub use counter::Counter;

mod gauge;
pub use gauge::{AtomicGauge, FloatGauge, FnGauge, Gauge};

mod histogram;
pub use histogram::Histogram;

mod snapshot;
pub use snapshot::Snapshot;

mod ewma;

mod meter;
pub use meter::{Meter, MeterRates};

mod timer;
pub use timer::{Timer, TimerContext};

mod filter;
pub use filter::{AllMetrics, FnFilter, MetricFilter};

mod registry;
pub use registry::{Metric, MetricKind, MetricRegistry, MetricSet, RegistryError};
