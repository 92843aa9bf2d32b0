/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::time::{Duration, Instant};

use super::{Histogram, Meter, MeterRates, Snapshot};

/// Call rate plus a latency distribution, recorded in nanoseconds.
#[derive(Default)]
pub struct Timer {
    meter: Meter,
    histogram: Histogram,
}

impl Timer {
    pub fn new() -> Self {
        Timer::default()
    }

    pub fn update(&self, duration: Duration) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.histogram.update(nanos);
        self.meter.mark(1);
    }

    /// Start timing; the elapsed time is recorded when the returned
    /// context is stopped or dropped.
    pub fn time(&self) -> TimerContext<'_> {
        TimerContext {
            timer: self,
            start: Instant::now(),
            stopped: false,
        }
    }

    pub fn count(&self) -> u64 {
        self.histogram.count()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.histogram.snapshot()
    }

    pub fn rates(&self) -> MeterRates {
        self.meter.rates()
    }
}

pub struct TimerContext<'a> {
    timer: &'a Timer,
    start: Instant,
    stopped: bool,
}

impl TimerContext<'_> {
    pub fn stop(mut self) -> Duration {
        self.stopped = true;
        let elapsed = self.start.elapsed();
        self.timer.update(elapsed);
        elapsed
    }
}

impl Drop for TimerContext<'_> {
    fn drop(&mut self) {
        if !self.stopped {
            self.timer.update(self.start.elapsed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update() {
        let t = Timer::new();
        t.update(Duration::from_millis(2));
        t.update(Duration::from_millis(4));
        assert_eq!(t.count(), 2);
        assert_eq!(t.rates().count, 2);

        let s = t.snapshot();
        assert!(s.min() >= 1_990_000 && s.min() <= 2_010_000);
        assert!(s.max() >= 3_990_000 && s.max() <= 4_010_000);
    }

    #[test]
    fn context() {
        let t = Timer::new();
        {
            let _ctx = t.time();
        }
        let elapsed = t.time().stop();
        assert_eq!(t.count(), 2);
        assert!(t.snapshot().max() as u128 + 1_000_000 >= elapsed.as_nanos());
    }
}
