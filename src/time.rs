// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Monotonic time base.
//!
//! All timestamps are microseconds since boot. Spans use [`core::time::Duration`].

use core::ops::{Add, Sub};
use core::time::Duration;

/// Point in time, microseconds since boot.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Instant {
    micros: u64,
}

impl Instant {
    pub const ZERO: Self = Self { micros: 0 };

    #[inline]
    pub const fn from_micros(micros: u64) -> Self {
        Self { micros }
    }

    #[inline]
    pub const fn from_millis(millis: u64) -> Self {
        Self {
            micros: millis * 1_000,
        }
    }

    #[inline]
    pub const fn as_micros(&self) -> u64 {
        self.micros
    }

    /// Time elapsed since `earlier`, zero if `earlier` is in the future.
    #[inline]
    pub fn saturating_duration_since(&self, earlier: Instant) -> Duration {
        Duration::from_micros(self.micros.saturating_sub(earlier.micros))
    }
}

impl Add<Duration> for Instant {
    type Output = Instant;

    fn add(self, rhs: Duration) -> Instant {
        Instant {
            micros: self.micros.saturating_add(rhs.as_micros() as u64),
        }
    }
}

impl Sub for Instant {
    type Output = Duration;

    fn sub(self, rhs: Instant) -> Duration {
        self.saturating_duration_since(rhs)
    }
}

/// Source of the current time.
pub trait Monotonic {
    fn now(&self) -> Instant;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use core::cell::Cell;

    /// Clock advanced by hand.
    #[derive(Default)]
    pub struct ManualClock {
        now: Cell<u64>,
    }

    impl ManualClock {
        pub fn advance(&self, by: Duration) {
            self.now.set(self.now.get() + by.as_micros() as u64);
        }
    }

    impl Monotonic for ManualClock {
        fn now(&self) -> Instant {
            Instant::from_micros(self.now.get())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ManualClock;
    use super::*;

    #[test]
    fn elapsed_saturates_at_zero() {
        let early = Instant::from_millis(5);
        let late = Instant::from_millis(7);
        assert_eq!(late - early, Duration::from_millis(2));
        assert_eq!(early - late, Duration::ZERO);
    }

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::default();
        clock.advance(Duration::from_micros(5_000));
        clock.advance(Duration::from_micros(5_000));
        assert_eq!(clock.now(), Instant::from_millis(10));
        assert_eq!(clock.now() + Duration::from_millis(1), Instant::from_micros(11_000));
    }
}
