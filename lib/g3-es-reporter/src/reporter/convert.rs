/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use g3_metrics::{Counter, Gauge, MeterRates, MetricValue, Snapshot};

use crate::config::TimeUnit;
use crate::point::{Point, PointTags};

const FIELD_COUNT: &str = "count";
const FIELD_VALUE: &str = "value";
const FIELD_MIN: &str = "min";
const FIELD_MAX: &str = "max";
const FIELD_MEAN: &str = "mean";
const FIELD_STD_DEV: &str = "std-dev";
const FIELD_P50: &str = "50-percentile";
const FIELD_P75: &str = "75-percentile";
const FIELD_P95: &str = "95-percentile";
const FIELD_P98: &str = "98-percentile";
const FIELD_P99: &str = "99-percentile";
const FIELD_P999: &str = "999-percentile";
const FIELD_ONE_MINUTE: &str = "one-minute";
const FIELD_FIVE_MINUTE: &str = "five-minute";
const FIELD_FIFTEEN_MINUTE: &str = "fifteen-minute";
const FIELD_MEAN_RATE: &str = "mean-minute";

/// Converts metric readings taken in one reporting pass to points.
pub(super) struct PointBuilder<'a> {
    time: DateTime<Utc>,
    tags: &'a PointTags,
    rate_unit: TimeUnit,
    duration_unit: TimeUnit,
}

impl<'a> PointBuilder<'a> {
    pub(super) fn new(
        time: DateTime<Utc>,
        tags: &'a PointTags,
        rate_unit: TimeUnit,
        duration_unit: TimeUnit,
    ) -> Self {
        PointBuilder {
            time,
            tags,
            rate_unit,
            duration_unit,
        }
    }

    fn new_point(&self, measurement: &str) -> Point {
        Point::new(measurement, self.time, Arc::clone(self.tags))
    }

    pub(super) fn counter(&self, name: &str, counter: &Counter) -> Point {
        self.new_point(name).with_field(FIELD_COUNT, counter.count())
    }

    /// With grouping, gauge `a.b.c` becomes field `c` of point `a.b`.
    pub(super) fn gauges(&self, gauges: &[(String, Arc<dyn Gauge>)], group: bool) -> Vec<Point> {
        if !group {
            return gauges
                .iter()
                .map(|(name, g)| self.new_point(name).with_field(FIELD_VALUE, g.value()))
                .collect();
        }

        let mut grouped: BTreeMap<&str, Point> = BTreeMap::new();
        for (name, g) in gauges {
            let (measurement, field) = match name.rsplit_once('.') {
                Some((m, f)) if !m.is_empty() && !f.is_empty() => (m, f),
                _ => (name.as_str(), FIELD_VALUE),
            };
            grouped
                .entry(measurement)
                .or_insert_with(|| self.new_point(measurement))
                .add_field(field, g.value());
        }
        grouped.into_values().collect()
    }

    fn add_snapshot_fields(&self, point: &mut Point, s: &Snapshot, convert: bool) {
        let value = |v: f64| -> MetricValue {
            if convert {
                MetricValue::Double(self.duration_unit.convert_duration(v))
            } else {
                MetricValue::Double(v)
            }
        };
        let raw = |v: u64| -> MetricValue {
            if convert {
                value(v as f64)
            } else {
                MetricValue::Unsigned(v)
            }
        };

        point.add_field(FIELD_COUNT, s.count());
        point.add_field(FIELD_MIN, raw(s.min()));
        point.add_field(FIELD_MAX, raw(s.max()));
        point.add_field(FIELD_MEAN, value(s.mean()));
        point.add_field(FIELD_STD_DEV, value(s.std_dev()));
        point.add_field(FIELD_P50, raw(s.median()));
        point.add_field(FIELD_P75, raw(s.p75()));
        point.add_field(FIELD_P95, raw(s.p95()));
        point.add_field(FIELD_P98, raw(s.p98()));
        point.add_field(FIELD_P99, raw(s.p99()));
        point.add_field(FIELD_P999, raw(s.p999()));
    }

    fn add_rate_fields(&self, point: &mut Point, r: &MeterRates) {
        point.add_field(FIELD_COUNT, r.count);
        point.add_field(FIELD_ONE_MINUTE, self.rate_unit.convert_rate(r.one_minute));
        point.add_field(FIELD_FIVE_MINUTE, self.rate_unit.convert_rate(r.five_minute));
        point.add_field(
            FIELD_FIFTEEN_MINUTE,
            self.rate_unit.convert_rate(r.fifteen_minute),
        );
        point.add_field(FIELD_MEAN_RATE, self.rate_unit.convert_rate(r.mean));
    }

    pub(super) fn histogram(&self, name: &str, snapshot: &Snapshot) -> Point {
        let mut point = self.new_point(name);
        self.add_snapshot_fields(&mut point, snapshot, false);
        point
    }

    pub(super) fn meter(&self, name: &str, rates: &MeterRates) -> Point {
        let mut point = self.new_point(name);
        self.add_rate_fields(&mut point, rates);
        point
    }

    /// The timer count comes from its meter.
    pub(super) fn timer(&self, name: &str, snapshot: &Snapshot, rates: &MeterRates) -> Point {
        let mut point = self.new_point(name);
        self.add_snapshot_fields(&mut point, snapshot, true);
        self.add_rate_fields(&mut point, rates);
        point
    }
}
