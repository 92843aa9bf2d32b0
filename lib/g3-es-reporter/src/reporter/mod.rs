/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use log::{debug, warn};

use g3_metrics::{AllMetrics, MetricFilter, MetricRegistry};

use crate::config::TimeUnit;
use crate::point::{Point, PointTags};
use crate::sender::ElasticsearchSender;

mod convert;
use convert::PointBuilder;

const ERROR_REPORT_SLICE_SECS: u64 = 64;

pub struct ElasticsearchReporterBuilder {
    registry: Arc<MetricRegistry>,
    rate_unit: TimeUnit,
    duration_unit: TimeUnit,
    tags: BTreeMap<String, String>,
    group_gauges: bool,
    filter: Arc<dyn MetricFilter>,
}

impl ElasticsearchReporterBuilder {
    pub fn convert_rates_to(mut self, unit: TimeUnit) -> Self {
        self.rate_unit = unit;
        self
    }

    pub fn convert_durations_to(mut self, unit: TimeUnit) -> Self {
        self.duration_unit = unit;
        self
    }

    pub fn with_tags(mut self, tags: BTreeMap<String, String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn group_gauges(mut self, enable: bool) -> Self {
        self.group_gauges = enable;
        self
    }

    pub fn filter(mut self, filter: Arc<dyn MetricFilter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn build(self, sender: ElasticsearchSender) -> ElasticsearchReporter {
        let core = ReporterCore {
            registry: self.registry,
            sender,
            rate_unit: self.rate_unit,
            duration_unit: self.duration_unit,
            tags: Arc::new(self.tags),
            group_gauges: self.group_gauges,
            filter: self.filter,
            create_instant: Instant::now(),
            last_error_report: AtomicU64::new(u64::MAX),
        };
        ElasticsearchReporter {
            core: Arc::new(core),
            worker: Mutex::new(None),
        }
    }
}

struct ReporterCore {
    registry: Arc<MetricRegistry>,
    sender: ElasticsearchSender,
    rate_unit: TimeUnit,
    duration_unit: TimeUnit,
    tags: PointTags,
    group_gauges: bool,
    filter: Arc<dyn MetricFilter>,
    create_instant: Instant,
    last_error_report: AtomicU64,
}

impl ReporterCore {
    fn collect_points(&self, time: DateTime<Utc>) -> Vec<Point> {
        let set = self.registry.snapshot(self.filter.as_ref());
        let builder = PointBuilder::new(time, &self.tags, self.rate_unit, self.duration_unit);

        let mut points = builder.gauges(&set.gauges, self.group_gauges);
        for (name, c) in &set.counters {
            points.push(builder.counter(name, c));
        }
        for (name, h) in &set.histograms {
            points.push(builder.histogram(name, &h.snapshot()));
        }
        for (name, m) in &set.meters {
            points.push(builder.meter(name, &m.rates()));
        }
        for (name, t) in &set.timers {
            points.push(builder.timer(name, &t.snapshot(), &t.rates()));
        }
        points
    }

    fn report(&self) {
        let points = self.collect_points(Utc::now());
        debug!("reporting {} metric points", points.len());
        if let Err(e) = self.sender.write_points(&points) {
            self.handle_report_error(e);
        }
    }

    fn handle_report_error(&self, e: anyhow::Error) {
        let time_slice = self.create_instant.elapsed().as_secs() / ERROR_REPORT_SLICE_SECS;
        if self.last_error_report.swap(time_slice, Ordering::Relaxed) != time_slice {
            warn!("sending metrics to elasticsearch error: {e:?}");
        }
    }
}

struct ReporterWorker {
    quit_sender: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

/// Reports all metrics of a registry to Elasticsearch, on demand or
/// periodically from a background thread.
pub struct ElasticsearchReporter {
    core: Arc<ReporterCore>,
    worker: Mutex<Option<ReporterWorker>>,
}

impl ElasticsearchReporter {
    pub fn for_registry(registry: Arc<MetricRegistry>) -> ElasticsearchReporterBuilder {
        ElasticsearchReporterBuilder {
            registry,
            rate_unit: TimeUnit::Seconds,
            duration_unit: TimeUnit::Milliseconds,
            tags: BTreeMap::new(),
            group_gauges: false,
            filter: Arc::new(AllMetrics),
        }
    }

    /// Run one reporting pass on the calling thread. Errors are logged.
    pub fn report(&self) {
        self.core.report();
    }

    /// The first pass runs one period after the start.
    pub fn start(&self, period: Duration) -> anyhow::Result<()> {
        if period.is_zero() {
            return Err(anyhow!("reporting period should not be zero"));
        }

        let mut worker = self.worker.lock().unwrap_or_else(|e| e.into_inner());
        if worker.is_some() {
            return Err(anyhow!("the reporter has already been started"));
        }

        let core = self.core.clone();
        let (quit_sender, quit_receiver) = mpsc::channel::<()>();
        let handle = std::thread::Builder::new()
            .name("es-reporter".to_string())
            .spawn(move || {
                let mut instant_next = Instant::now() + period;
                loop {
                    let wait = instant_next.saturating_duration_since(Instant::now());
                    match quit_receiver.recv_timeout(wait) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(_) | Err(RecvTimeoutError::Disconnected) => break,
                    }

                    core.report();

                    instant_next += period;
                    let instant_now = Instant::now();
                    if instant_next < instant_now {
                        // skip the missed passes
                        instant_next = instant_now + period;
                    }
                }
            })
            .map_err(|e| anyhow!("failed to spawn thread: {e:?}"))?;

        *worker = Some(ReporterWorker {
            quit_sender,
            handle,
        });
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.worker
            .lock()
            .map(|w| w.is_some())
            .unwrap_or_else(|e| e.into_inner().is_some())
    }

    /// Stop the periodic reporting and wait for the thread to exit.
    pub fn stop(&self) {
        let worker = self.worker.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(worker) = worker {
            let _ = worker.quit_sender.send(());
            if worker.handle.join().is_err() {
                warn!("elasticsearch reporter thread panicked");
            }
        }
    }
}

impl Drop for ElasticsearchReporter {
    fn drop(&mut self) {
        self.stop();
    }
}
