//! Exact stream time.
//!
//! Timestamps are `Rational64` seconds. A unit's timestamp is always derived
//! as `unit_duration * offset_from_start`, so unit 100 000 of a 30000/1001
//! stream lands on the same value as summing 100 000 durations.

use crate::error::{CoreError, Result};
use num_rational::Rational64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul};
use std::str::FromStr;

/// Nanoseconds per second, for clock conversions.
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// A point in (or span of) stream time, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RationalTime {
    seconds: Rational64,
}

impl RationalTime {
    pub const ZERO: Self = Self {
        seconds: Rational64::new_raw(0, 1),
    };

    /// `numerator / denominator` seconds.
    ///
    /// Panics if `denominator` is zero.
    #[inline]
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            seconds: Rational64::new(numerator, denominator),
        }
    }

    /// Start time of unit `frames` at `rate` (which must be valid).
    #[inline]
    pub fn from_frames(frames: i64, rate: FrameRate) -> Self {
        Self::new(frames * i64::from(rate.denominator), i64::from(rate.numerator))
    }

    /// Lossy seconds, for display.
    pub fn to_seconds_f64(self) -> f64 {
        *self.seconds.numer() as f64 / *self.seconds.denom() as f64
    }

    /// Whole nanoseconds, truncated toward zero.
    pub fn to_nanos(self) -> i64 {
        let wide = i128::from(*self.seconds.numer()) * i128::from(NANOS_PER_SECOND);
        (wide / i128::from(*self.seconds.denom())) as i64
    }
}

impl Default for RationalTime {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for RationalTime {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            seconds: self.seconds + other.seconds,
        }
    }
}

/// Scale a unit duration by a unit count.
impl Mul<i64> for RationalTime {
    type Output = Self;

    fn mul(self, count: i64) -> Self {
        Self {
            seconds: self.seconds * count,
        }
    }
}

impl fmt::Display for RationalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.to_seconds_f64())
    }
}

/// Nominal units per second, `numerator / denominator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    pub numerator: u32,
    pub denominator: u32,
}

impl FrameRate {
    pub const FPS_1: Self = Self::new(1, 1);
    pub const FPS_23_976: Self = Self::new(24000, 1001);
    pub const FPS_24: Self = Self::new(24, 1);
    pub const FPS_25: Self = Self::new(25, 1);
    pub const FPS_29_97: Self = Self::new(30000, 1001);

    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Both terms non-zero. Only valid rates can produce timestamps.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.numerator > 0 && self.denominator > 0
    }

    /// How long one unit is shown: `denominator / numerator` seconds.
    #[inline]
    pub fn frame_duration(self) -> RationalTime {
        RationalTime::new(i64::from(self.denominator), i64::from(self.numerator))
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_1
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl FromStr for FrameRate {
    type Err = CoreError;

    /// Accepts `N/D`, or `N` alone for `N/1`.
    fn from_str(text: &str) -> Result<Self> {
        let text = text.trim();
        let (num, den) = text.split_once('/').unwrap_or((text, "1"));

        let parsed = num
            .trim()
            .parse()
            .ok()
            .zip(den.trim().parse().ok())
            .map(|(n, d)| Self::new(n, d))
            .filter(|rate| rate.is_valid());
        parsed.ok_or_else(|| CoreError::InvalidFrameRate(text.to_string()))
    }
}

/// Half-open span of stream time, `[start, start + duration)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: RationalTime,
    pub duration: RationalTime,
}

impl TimeRange {
    #[inline]
    pub fn new(start: RationalTime, duration: RationalTime) -> Self {
        Self { start, duration }
    }

    #[inline]
    pub fn end(self) -> RationalTime {
        self.start + self.duration
    }

    pub fn contains(self, time: RationalTime) -> bool {
        self.start <= time && time < self.end()
    }
}
