/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
#[error("unknown time unit {0}")]
pub struct TimeUnitParseError(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    pub const fn as_nanos(&self) -> u64 {
        match self {
            TimeUnit::Nanoseconds => 1,
            TimeUnit::Microseconds => 1_000,
            TimeUnit::Milliseconds => 1_000_000,
            TimeUnit::Seconds => 1_000_000_000,
            TimeUnit::Minutes => 60_000_000_000,
            TimeUnit::Hours => 3_600_000_000_000,
            TimeUnit::Days => 86_400_000_000_000,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "nanoseconds",
            TimeUnit::Microseconds => "microseconds",
            TimeUnit::Milliseconds => "milliseconds",
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
            TimeUnit::Days => "days",
        }
    }

    /// Returns `None` on overflow.
    pub fn duration_of(&self, amount: u64) -> Option<Duration> {
        amount.checked_mul(self.as_nanos()).map(Duration::from_nanos)
    }

    /// Convert an events per second rate to events per this unit.
    pub fn convert_rate(&self, per_second: f64) -> f64 {
        per_second * (self.as_nanos() as f64 / 1_000_000_000.0)
    }

    /// Convert a nanosecond value to this unit.
    pub fn convert_duration(&self, nanos: f64) -> f64 {
        nanos / self.as_nanos() as f64
    }
}

impl FromStr for TimeUnit {
    type Err = TimeUnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nanoseconds" | "nanosecond" | "nanos" | "ns" => Ok(TimeUnit::Nanoseconds),
            "microseconds" | "microsecond" | "micros" | "us" => Ok(TimeUnit::Microseconds),
            "milliseconds" | "millisecond" | "millis" | "ms" => Ok(TimeUnit::Milliseconds),
            "seconds" | "second" | "secs" | "sec" | "s" => Ok(TimeUnit::Seconds),
            "minutes" | "minute" | "mins" | "min" | "m" => Ok(TimeUnit::Minutes),
            "hours" | "hour" | "h" => Ok(TimeUnit::Hours),
            "days" | "day" | "d" => Ok(TimeUnit::Days),
            _ => Err(TimeUnitParseError(s.to_string())),
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!(TimeUnit::from_str("SECONDS").unwrap(), TimeUnit::Seconds);
        assert_eq!(
            TimeUnit::from_str("MILLISECONDS").unwrap(),
            TimeUnit::Milliseconds
        );
        assert_eq!(TimeUnit::from_str("ms").unwrap(), TimeUnit::Milliseconds);
        assert_eq!(TimeUnit::from_str("us").unwrap(), TimeUnit::Microseconds);
        assert_eq!(TimeUnit::from_str("Minutes").unwrap(), TimeUnit::Minutes);
        assert_eq!(TimeUnit::from_str("d").unwrap(), TimeUnit::Days);
        assert!(TimeUnit::from_str("fortnights").is_err());
    }

    #[test]
    fn duration() {
        assert_eq!(
            TimeUnit::Seconds.duration_of(10),
            Some(Duration::from_secs(10))
        );
        assert_eq!(
            TimeUnit::Milliseconds.duration_of(250),
            Some(Duration::from_millis(250))
        );
        assert_eq!(TimeUnit::Days.duration_of(u64::MAX), None);
    }

    #[test]
    fn convert() {
        assert!((TimeUnit::Minutes.convert_rate(2.0) - 120.0).abs() < 1e-9);
        assert!((TimeUnit::Milliseconds.convert_rate(1000.0) - 1.0).abs() < 1e-9);
        assert!((TimeUnit::Milliseconds.convert_duration(2_500_000.0) - 2.5).abs() < 1e-9);
        assert!((TimeUnit::Microseconds.convert_duration(2_500_000.0) - 2500.0).abs() < 1e-9);
    }
}
