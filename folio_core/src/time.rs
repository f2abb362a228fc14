// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic host time and timebase conversion.
//!
//! [`HostTime`] is a point in time expressed as platform-native monotonic
//! ticks (nanoseconds on native hosts, microseconds from `performance.now()`
//! on the web). [`Timebase`] carries the rational ticks-to-nanoseconds factor
//! and [`Duration`] is a span in the same tick units.
//!
//! Flip durations are configured in ticks, so a host that changes its clock
//! resolution must also pick the matching
//! [`FlipConfig`](crate::config::FlipConfig) preset.

use core::fmt;
use core::ops::{Add, Sub};

/// A point in time expressed as platform-native monotonic ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HostTime(pub u64);

impl HostTime {
    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Returns the duration between `self` and an earlier time, or zero if
    /// `earlier` is after `self`.
    #[inline]
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for HostTime {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Duration) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for HostTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: Self) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({})", self.0)
    }
}

/// Rational conversion factor from ticks to nanoseconds.
///
/// `nanoseconds = ticks * numer / denom`
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timebase {
    /// Numerator of the ticks-to-nanoseconds ratio.
    pub numer: u32,
    /// Denominator of the ticks-to-nanoseconds ratio.
    pub denom: u32,
}

impl Timebase {
    /// A timebase where ticks are already nanoseconds (1:1).
    pub const NANOS: Self = Self { numer: 1, denom: 1 };

    /// A timebase where one tick is one microsecond.
    pub const MICROS: Self = Self {
        numer: 1000,
        denom: 1,
    };

    /// Creates a new timebase with the given numerator and denominator.
    ///
    /// # Panics
    ///
    /// Panics if `denom` is zero.
    #[inline]
    #[must_use]
    pub const fn new(numer: u32, denom: u32) -> Self {
        assert!(denom != 0, "timebase denominator must not be zero");
        Self { numer, denom }
    }

    /// Converts a tick count to nanoseconds.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "u128 intermediate avoids overflow; truncation back to u64 is intentional"
    )]
    pub const fn ticks_to_nanos(self, ticks: u64) -> u64 {
        let wide = ticks as u128 * self.numer as u128 / self.denom as u128;
        wide as u64
    }

    /// Converts nanoseconds to a tick count.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "u128 intermediate avoids overflow; truncation back to u64 is intentional"
    )]
    pub const fn nanos_to_ticks(self, nanos: u64) -> u64 {
        let wide = nanos as u128 * self.denom as u128 / self.numer as u128;
        wide as u64
    }
}

impl fmt::Debug for Timebase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timebase({}/{})", self.numer, self.denom)
    }
}

/// A duration in platform-native ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(pub u64);

impl Duration {
    /// A zero-length duration.
    pub const ZERO: Self = Self(0);

    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Creates a duration from milliseconds in the given timebase.
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: u64, timebase: Timebase) -> Self {
        Self(timebase.nanos_to_ticks(millis.saturating_mul(1_000_000)))
    }

    /// Scales the duration by a non-negative factor.
    ///
    /// Negative and NaN factors yield [`Duration::ZERO`].
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "scaled tick counts are rounded down to whole ticks"
    )]
    pub fn scaled(self, factor: f64) -> Self {
        if factor.is_nan() || factor <= 0.0 {
            return Self::ZERO;
        }
        Self((self.0 as f64 * factor) as u64)
    }

    /// Returns `elapsed / self` clamped to `[0, 1]`.
    ///
    /// A zero-length duration is always complete.
    #[inline]
    #[must_use]
    pub fn fraction_elapsed(self, elapsed: Self) -> f64 {
        if self.0 == 0 || elapsed.0 >= self.0 {
            return 1.0;
        }
        elapsed.0 as f64 / self.0 as f64
    }
}

impl Add for Duration {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_in_both_timebases() {
        assert_eq!(
            Duration::from_millis(400, Timebase::NANOS),
            Duration(400_000_000)
        );
        assert_eq!(Duration::from_millis(400, Timebase::MICROS), Duration(400_000));
    }

    #[test]
    fn scaled_rounds_down_and_rejects_negatives() {
        let base = Duration(400_000_000);
        assert_eq!(base.scaled(0.4), Duration(160_000_000));
        assert_eq!(base.scaled(1.0), base);
        assert_eq!(base.scaled(-0.5), Duration::ZERO);
        assert_eq!(base.scaled(f64::NAN), Duration::ZERO);
    }

    #[test]
    fn fraction_elapsed_is_clamped() {
        let d = Duration(200);
        assert_eq!(d.fraction_elapsed(Duration(50)), 0.25);
        assert_eq!(d.fraction_elapsed(Duration(400)), 1.0);
        assert_eq!(Duration::ZERO.fraction_elapsed(Duration::ZERO), 1.0);
    }

    #[test]
    fn host_time_duration_ops() {
        let t = HostTime(1000);
        assert_eq!((t + Duration(200)).ticks(), 1200);
        assert_eq!(HostTime(1500) - t, Duration(500));
        assert_eq!(t.saturating_duration_since(HostTime(1500)), Duration::ZERO);
        assert_eq!(t.saturating_duration_since(HostTime(400)), Duration(600));
    }

    #[test]
    fn timebase_conversions() {
        let tb = Timebase::new(125, 3);
        assert_eq!(tb.ticks_to_nanos(24_000_000), 1_000_000_000, "24 MHz -> 1s");
        assert_eq!(tb.nanos_to_ticks(1_000_000_000), 24_000_000);
    }
}
