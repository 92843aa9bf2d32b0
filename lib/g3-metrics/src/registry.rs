/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use super::{Counter, Gauge, Histogram, Meter, MetricFilter, Timer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
    Meter,
    Timer,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
            MetricKind::Meter => "meter",
            MetricKind::Timer => "timer",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub enum Metric {
    Counter(Arc<Counter>),
    Gauge(Arc<dyn Gauge>),
    Histogram(Arc<Histogram>),
    Meter(Arc<Meter>),
    Timer(Arc<Timer>),
}

impl Metric {
    pub fn kind(&self) -> MetricKind {
        match self {
            Metric::Counter(_) => MetricKind::Counter,
            Metric::Gauge(_) => MetricKind::Gauge,
            Metric::Histogram(_) => MetricKind::Histogram,
            Metric::Meter(_) => MetricKind::Meter,
            Metric::Timer(_) => MetricKind::Timer,
        }
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("empty metric name")]
    EmptyName,
    #[error("metric {name} is already registered as a {existing}, not a {requested}")]
    KindMismatch {
        name: String,
        existing: MetricKind,
        requested: MetricKind,
    },
    #[error("gauge {0} is already registered")]
    DuplicateGauge(String),
}

/// Metrics selected by one [`MetricRegistry::snapshot`] call, sorted by name
/// within each kind.
#[derive(Default)]
pub struct MetricSet {
    pub gauges: Vec<(String, Arc<dyn Gauge>)>,
    pub counters: Vec<(String, Arc<Counter>)>,
    pub histograms: Vec<(String, Arc<Histogram>)>,
    pub meters: Vec<(String, Arc<Meter>)>,
    pub timers: Vec<(String, Arc<Timer>)>,
}

impl MetricSet {
    pub fn is_empty(&self) -> bool {
        self.gauges.is_empty()
            && self.counters.is_empty()
            && self.histograms.is_empty()
            && self.meters.is_empty()
            && self.timers.is_empty()
    }
}

/// Named metrics shared between the instrumented code and the reporters.
#[derive(Default)]
pub struct MetricRegistry {
    metrics: RwLock<BTreeMap<String, Metric>>,
}

fn kind_mismatch(name: &str, existing: &Metric, requested: MetricKind) -> RegistryError {
    RegistryError::KindMismatch {
        name: name.to_string(),
        existing: existing.kind(),
        requested,
    }
}

impl MetricRegistry {
    pub fn new() -> Self {
        MetricRegistry::default()
    }

    fn get_or_insert_with<F>(&self, name: &str, create: F) -> Result<Metric, RegistryError>
    where
        F: FnOnce() -> Metric,
    {
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }

        if let Some(m) = self.metrics.read().unwrap().get(name) {
            return Ok(m.clone());
        }

        let mut ht = self.metrics.write().unwrap();
        let m = ht.entry(name.to_string()).or_insert_with(create);
        Ok(m.clone())
    }

    pub fn counter(&self, name: &str) -> Result<Arc<Counter>, RegistryError> {
        match self.get_or_insert_with(name, || Metric::Counter(Arc::new(Counter::new())))? {
            Metric::Counter(c) => Ok(c),
            m => Err(kind_mismatch(name, &m, MetricKind::Counter)),
        }
    }

    pub fn histogram(&self, name: &str) -> Result<Arc<Histogram>, RegistryError> {
        match self.get_or_insert_with(name, || Metric::Histogram(Arc::new(Histogram::new())))? {
            Metric::Histogram(h) => Ok(h),
            m => Err(kind_mismatch(name, &m, MetricKind::Histogram)),
        }
    }

    pub fn meter(&self, name: &str) -> Result<Arc<Meter>, RegistryError> {
        match self.get_or_insert_with(name, || Metric::Meter(Arc::new(Meter::new())))? {
            Metric::Meter(m) => Ok(m),
            m => Err(kind_mismatch(name, &m, MetricKind::Meter)),
        }
    }

    pub fn timer(&self, name: &str) -> Result<Arc<Timer>, RegistryError> {
        match self.get_or_insert_with(name, || Metric::Timer(Arc::new(Timer::new())))? {
            Metric::Timer(t) => Ok(t),
            m => Err(kind_mismatch(name, &m, MetricKind::Timer)),
        }
    }

    /// Gauges are supplied by the caller, so a second registration under the
    /// same name is refused instead of returning the existing one.
    pub fn register_gauge<G>(&self, name: &str, gauge: G) -> Result<Arc<dyn Gauge>, RegistryError>
    where
        G: Gauge + 'static,
    {
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }

        let mut ht = self.metrics.write().unwrap();
        if let Some(m) = ht.get(name) {
            return match m {
                Metric::Gauge(_) => Err(RegistryError::DuplicateGauge(name.to_string())),
                m => Err(kind_mismatch(name, m, MetricKind::Gauge)),
            };
        }
        let gauge: Arc<dyn Gauge> = Arc::new(gauge);
        ht.insert(name.to_string(), Metric::Gauge(gauge.clone()));
        Ok(gauge)
    }

    pub fn remove(&self, name: &str) -> bool {
        self.metrics.write().unwrap().remove(name).is_some()
    }

    pub fn names(&self) -> Vec<String> {
        self.metrics.read().unwrap().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.metrics.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.read().unwrap().is_empty()
    }

    pub fn snapshot(&self, filter: &dyn MetricFilter) -> MetricSet {
        let mut set = MetricSet::default();
        let ht = self.metrics.read().unwrap();
        for (name, metric) in ht.iter() {
            if !filter.matches(name, metric) {
                continue;
            }
            let name = name.clone();
            match metric {
                Metric::Counter(c) => set.counters.push((name, c.clone())),
                Metric::Gauge(g) => set.gauges.push((name, g.clone())),
                Metric::Histogram(h) => set.histograms.push((name, h.clone())),
                Metric::Meter(m) => set.meters.push((name, m.clone())),
                Metric::Timer(t) => set.timers.push((name, t.clone())),
            }
        }
        set
    }
}
