//! Timekeeping primitives.
//!
//! The control code is single-threaded: every wait is a literal pause of the
//! whole routine through [`Clock::delay`], never a context switch.

use core::{
    convert::TryInto,
    fmt::{self, Debug, Display, Formatter},
    ops::{Add, AddAssign, Sub},
    time::Duration,
};

mod r#loop;

pub use r#loop::Loop;

/// Represents a time on a monotonically increasing clock (i.e., time since
/// program start).
///
/// This type has a precision of 1 microsecond.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Instant(u64);

impl Instant {
    #[inline]
    /// Creates a new `Instant` from the specified number of *whole*
    /// microseconds since program start.
    pub fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    #[inline]
    /// Creates a new `Instant` from the specified number of whole milliseconds
    /// since program start.
    pub fn from_millis(millis: u64) -> Self {
        Self(millis.saturating_mul(1000))
    }

    #[inline]
    /// Returns the number of whole microseconds since program start contained
    /// by this `Instant`.
    pub fn as_micros(&self) -> u64 {
        self.0
    }

    #[inline]
    /// Returns the number of *whole* milliseconds since program start
    /// contained by this `Instant`.
    pub fn as_millis(&self) -> u64 {
        self.0 / 1000
    }

    #[inline]
    /// Checked addition of a [`Duration`] to an `Instant`. Computes `self +
    /// rhs`, returning [`None`] if overflow occurred.
    pub fn checked_add(self, rhs: Duration) -> Option<Self> {
        Some(Self(self.0.checked_add(rhs.as_micros().try_into().ok()?)?))
    }

    #[inline]
    /// Checked subtraction of two `Instant`s. Computes `self - rhs`, returning
    /// [`None`] if the result would be negative.
    pub fn checked_sub_instant(self, rhs: Self) -> Option<Duration> {
        Some(Duration::from_micros(self.0.checked_sub(rhs.0)?))
    }
}

impl Add<Duration> for Instant {
    type Output = Instant;

    fn add(self, rhs: Duration) -> Self::Output {
        self.checked_add(rhs).unwrap_or(Self(u64::MAX))
    }
}

impl AddAssign<Duration> for Instant {
    fn add_assign(&mut self, rhs: Duration) {
        *self = *self + rhs;
    }
}

impl Sub for Instant {
    type Output = Duration;

    /// Saturates at zero when `rhs` is later than `self`.
    fn sub(self, rhs: Self) -> Self::Output {
        self.checked_sub_instant(rhs).unwrap_or_default()
    }
}

impl Debug for Instant {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Instant {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}s", self.0 / 1000000, self.0 % 1000000)
    }
}

/// The time source and sleep primitive provided by the platform.
pub trait Clock {
    /// Gets the current timestamp (i.e., the time which has passed since
    /// program start).
    fn time_since_start(&self) -> Instant;

    /// Blocks the calling routine for the specified duration.
    fn delay(&self, dur: Duration);

    /// Blocks until the given timestamp. Returns immediately if it has already
    /// passed.
    fn delay_until(&self, timestamp: Instant) {
        if let Some(d) = timestamp.checked_sub_instant(self.time_since_start()) {
            self.delay(d);
        }
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn time_since_start(&self) -> Instant {
        (**self).time_since_start()
    }

    fn delay(&self, dur: Duration) {
        (**self).delay(dur)
    }
}
