//! Non-negative time quantities for seek offsets and durations.

use chrono::TimeDelta;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::runner::ToolError;
use crate::time::{format_seconds, parse_decimal_micros};

/// A non-negative time quantity with microsecond resolution.
///
/// Renders as fixed-point seconds (`3.0`, `3.14`) for `-ss` and `-t`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSpec {
    micros: i64,
}

impl TimeSpec {
    pub const ZERO: Self = Self { micros: 0 };

    pub fn from_secs(secs: u64) -> Self {
        Self::saturating(u128::from(secs) * 1_000_000)
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::saturating(u128::from(millis) * 1_000)
    }

    /// `None` for negative values.
    pub fn from_micros(micros: i64) -> Option<Self> {
        (micros >= 0).then_some(Self { micros })
    }

    pub fn is_zero(&self) -> bool {
        self.micros == 0
    }

    pub fn as_micros(&self) -> i64 {
        self.micros
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_micros(self.micros.unsigned_abs())
    }

    fn saturating(micros: u128) -> Self {
        Self {
            micros: i64::try_from(micros).unwrap_or(i64::MAX),
        }
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_seconds(self.micros))
    }
}

impl From<Duration> for TimeSpec {
    fn from(value: Duration) -> Self {
        Self::saturating(value.as_micros())
    }
}

impl From<u32> for TimeSpec {
    fn from(secs: u32) -> Self {
        Self::from_secs(u64::from(secs))
    }
}

impl From<u64> for TimeSpec {
    fn from(secs: u64) -> Self {
        Self::from_secs(secs)
    }
}

impl TryFrom<i64> for TimeSpec {
    type Error = ToolError;

    fn try_from(secs: i64) -> Result<Self, Self::Error> {
        u64::try_from(secs)
            .map(Self::from_secs)
            .map_err(|_| ToolError::parse(format!("negative time value: {}", secs)))
    }
}

impl TryFrom<f64> for TimeSpec {
    type Error = ToolError;

    fn try_from(secs: f64) -> Result<Self, Self::Error> {
        if !secs.is_finite() || secs < 0.0 {
            return Err(ToolError::parse(format!("invalid time value: {}", secs)));
        }
        Duration::try_from_secs_f64(secs)
            .map(Self::from)
            .map_err(|e| ToolError::parse(format!("invalid time value {}: {}", secs, e)))
    }
}

impl TryFrom<TimeDelta> for TimeSpec {
    type Error = ToolError;

    fn try_from(delta: TimeDelta) -> Result<Self, Self::Error> {
        delta
            .num_microseconds()
            .and_then(Self::from_micros)
            .ok_or_else(|| ToolError::parse(format!("invalid time value: {}", delta)))
    }
}

impl FromStr for TimeSpec {
    type Err = ToolError;

    /// Parses decimal seconds such as `"5.25"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_decimal_micros(s)
            .and_then(Self::from_micros)
            .ok_or_else(|| ToolError::parse(format!("invalid time value: {:?}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_seconds_render_fixed_point() {
        assert_eq!(TimeSpec::from(3u32).to_string(), "3.0");
        assert_eq!(TimeSpec::from(3600u64).to_string(), "3600.0");
        assert_eq!(TimeSpec::try_from(60i64).unwrap().to_string(), "60.0");
    }

    #[test]
    fn test_fractional_sources() {
        assert_eq!(TimeSpec::try_from(60.5).unwrap().to_string(), "60.5");
        assert_eq!(
            TimeSpec::try_from(TimeDelta::milliseconds(3140)).unwrap().to_string(),
            "3.14"
        );
        assert_eq!(TimeSpec::from_str("5.25").unwrap().to_string(), "5.25");
        assert_eq!(TimeSpec::from(Duration::from_millis(1500)).to_string(), "1.5");
    }

    #[test]
    fn test_rejects_negative_and_non_finite() {
        assert!(TimeSpec::try_from(-1.0).is_err());
        assert!(TimeSpec::try_from(f64::NAN).is_err());
        assert!(TimeSpec::try_from(-5i64).is_err());
        assert!(TimeSpec::try_from(TimeDelta::seconds(-2)).is_err());
        assert!("-0.5".parse::<TimeSpec>().is_err());
        assert!("soon".parse::<TimeSpec>().is_err());
    }

    #[test]
    fn test_zero_and_conversions() {
        assert_eq!(TimeSpec::ZERO.to_string(), "0.0");
        assert_eq!(TimeSpec::from_millis(250).as_micros(), 250_000);
        assert_eq!(
            TimeSpec::from_secs(2).as_duration(),
            Duration::from_secs(2)
        );
        assert_eq!(TimeSpec::from_micros(-1), None);
    }
}
