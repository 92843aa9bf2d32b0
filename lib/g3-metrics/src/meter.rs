/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::sync::Mutex;
use std::time::Instant;

use super::ewma::{Ewma, TICK_INTERVAL};

/// Rates are in events per second.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeterRates {
    pub count: u64,
    pub one_minute: f64,
    pub five_minute: f64,
    pub fifteen_minute: f64,
    pub mean: f64,
}

struct MeterInner {
    count: u64,
    m1: Ewma,
    m5: Ewma,
    m15: Ewma,
    last_tick: Instant,
}

impl MeterInner {
    fn tick_if_necessary(&mut self, now: Instant) {
        let age = now.saturating_duration_since(self.last_tick);
        if age <= TICK_INTERVAL {
            return;
        }

        let required = age.as_nanos() / TICK_INTERVAL.as_nanos();
        self.last_tick += TICK_INTERVAL * (required as u32);
        for _ in 0..required {
            self.m1.tick();
            self.m5.tick();
            self.m15.tick();
        }
    }
}

/// Event throughput, with moving averages over 1, 5 and 15 minutes.
pub struct Meter {
    start: Instant,
    inner: Mutex<MeterInner>,
}

impl Meter {
    pub fn new() -> Self {
        Meter::new_at(Instant::now())
    }

    fn new_at(start: Instant) -> Self {
        Meter {
            start,
            inner: Mutex::new(MeterInner {
                count: 0,
                m1: Ewma::one_minute(),
                m5: Ewma::five_minute(),
                m15: Ewma::fifteen_minute(),
                last_tick: start,
            }),
        }
    }

    #[inline]
    pub fn mark(&self, n: u64) {
        self.mark_at(n, Instant::now());
    }

    fn mark_at(&self, n: u64, now: Instant) {
        let mut inner = self.inner.lock().unwrap();
        inner.tick_if_necessary(now);
        inner.count = inner.count.saturating_add(n);
        inner.m1.update(n);
        inner.m5.update(n);
        inner.m15.update(n);
    }

    pub fn count(&self) -> u64 {
        self.inner.lock().unwrap().count
    }

    pub fn rates(&self) -> MeterRates {
        self.rates_at(Instant::now())
    }

    fn rates_at(&self, now: Instant) -> MeterRates {
        let mut inner = self.inner.lock().unwrap();
        inner.tick_if_necessary(now);

        let elapsed = now.saturating_duration_since(self.start).as_secs_f64();
        let mean = if inner.count == 0 || elapsed <= 0.0 {
            0.0
        } else {
            inner.count as f64 / elapsed
        };
        MeterRates {
            count: inner.count,
            one_minute: inner.m1.rate(),
            five_minute: inner.m5.rate(),
            fifteen_minute: inner.m15.rate(),
            mean,
        }
    }
}

impl Default for Meter {
    fn default() -> Self {
        Meter::new()
    }
}
