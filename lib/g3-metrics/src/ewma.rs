/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::time::Duration;

pub(crate) const TICK_INTERVAL: Duration = Duration::from_secs(5);

/// Exponentially weighted moving average of an event rate, in events per
/// second, ticked at a fixed interval.
#[derive(Debug)]
pub(crate) struct Ewma {
    alpha: f64,
    rate: f64,
    uncounted: u64,
    initialized: bool,
}

impl Ewma {
    fn with_minutes(minutes: f64) -> Self {
        let alpha = 1.0 - (-TICK_INTERVAL.as_secs_f64() / 60.0 / minutes).exp();
        Ewma {
            alpha,
            rate: 0.0,
            uncounted: 0,
            initialized: false,
        }
    }

    pub(crate) fn one_minute() -> Self {
        Ewma::with_minutes(1.0)
    }

    pub(crate) fn five_minute() -> Self {
        Ewma::with_minutes(5.0)
    }

    pub(crate) fn fifteen_minute() -> Self {
        Ewma::with_minutes(15.0)
    }

    pub(crate) fn update(&mut self, n: u64) {
        self.uncounted = self.uncounted.saturating_add(n);
    }

    pub(crate) fn tick(&mut self) {
        let count = std::mem::take(&mut self.uncounted);
        let instant_rate = count as f64 / TICK_INTERVAL.as_secs_f64();
        if self.initialized {
            self.rate += self.alpha * (instant_rate - self.rate);
        } else {
            self.rate = instant_rate;
            self.initialized = true;
        }
    }

    pub(crate) fn rate(&self) -> f64 {
        self.rate
    }
}
