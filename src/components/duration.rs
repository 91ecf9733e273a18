//! This module implements `Duration`, an exact span of the instant
//! time-line.

use num_traits::Euclid;

use crate::{components::instant::Instant, utils, TemporaError, TemporaResult};

/// An exact, signed amount of elapsed time in seconds and nanoseconds.
///
/// Unlike a [`Period`](crate::Period), a `Duration` always reduces to a
/// fixed count of nanoseconds. The sign is carried by the second count; the
/// nanosecond fraction is always in `0..1_000_000_000`, so `-0.5s` is
/// represented as `(-1, 500_000_000)`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration {
    seconds: i64,
    nanos: u32,
}

impl Duration {
    /// The zero-length duration.
    pub const ZERO: Self = Self { seconds: 0, nanos: 0 };

    #[inline]
    #[must_use]
    const fn new_unchecked(seconds: i64, nanos: u32) -> Self {
        Self { seconds, nanos }
    }

    /// Creates a `Duration` of whole seconds.
    #[inline]
    #[must_use]
    pub const fn of_seconds(seconds: i64) -> Self {
        Self::new_unchecked(seconds, 0)
    }

    /// Creates a `Duration` from seconds and a nanosecond adjustment of
    /// either sign, folding the adjustment with floor semantics.
    pub fn of_seconds_with_adjustment(
        seconds: i64,
        nano_adjustment: i64,
    ) -> TemporaResult<Self> {
        let (carry, nanos) = nano_adjustment.div_rem_euclid(&utils::NANOS_PER_SECOND);
        Ok(Self::new_unchecked(
            utils::checked_add(seconds, carry)?,
            nanos as u32,
        ))
    }

    /// Creates a `Duration` of milliseconds.
    #[must_use]
    pub fn of_millis(millis: i64) -> Self {
        let (seconds, millis) = millis.div_rem_euclid(&utils::MILLIS_PER_SECOND);
        Self::new_unchecked(seconds, millis as u32 * 1_000_000)
    }

    /// Creates a `Duration` of nanoseconds.
    #[must_use]
    pub fn of_nanos(nanos: i64) -> Self {
        let (seconds, nanos) = nanos.div_rem_euclid(&utils::NANOS_PER_SECOND);
        Self::new_unchecked(seconds, nanos as u32)
    }

    /// Returns the elapsed time from `start` to `end`; negative when `end`
    /// is earlier.
    pub fn between(start: &Instant, end: &Instant) -> TemporaResult<Self> {
        let seconds = utils::checked_sub(end.epoch_second(), start.epoch_second())?;
        let nanos = i64::from(end.nanosecond()) - i64::from(start.nanosecond());
        Self::of_seconds_with_adjustment(seconds, nanos)
    }

    /// Returns the whole-second part; the sign carrier.
    #[inline]
    #[must_use]
    pub const fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Returns the nanosecond fraction, `0..1_000_000_000`.
    #[inline]
    #[must_use]
    pub const fn subsec_nanos(&self) -> u32 {
        self.nanos
    }

    /// Returns whether this duration is zero-length.
    #[inline]
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.seconds == 0 && self.nanos == 0
    }

    /// Returns whether this duration is strictly negative.
    #[inline]
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.seconds < 0
    }

    /// Returns the total length in nanoseconds.
    #[inline]
    #[must_use]
    pub fn to_total_nanos(&self) -> i128 {
        i128::from(self.seconds) * i128::from(utils::NANOS_PER_SECOND) + i128::from(self.nanos)
    }

    /// Creates a `Duration` from a total nanosecond count.
    pub fn from_total_nanos(nanos: i128) -> TemporaResult<Self> {
        let (seconds, subsec) = nanos.div_rem_euclid(&i128::from(utils::NANOS_PER_SECOND));
        let seconds = i64::try_from(seconds).map_err(|_| {
            TemporaError::overflow().with_message("duration exceeds the representable range")
        })?;
        Ok(Self::new_unchecked(seconds, subsec as u32))
    }

    /// Returns the total length in milliseconds, truncating the fraction.
    pub fn to_millis(&self) -> TemporaResult<i64> {
        let millis = utils::checked_mul(self.seconds, utils::MILLIS_PER_SECOND)?;
        utils::checked_add(millis, i64::from(self.nanos) / 1_000_000)
    }

    /// Adds another duration.
    pub fn plus(&self, other: &Self) -> TemporaResult<Self> {
        let seconds = utils::checked_add(self.seconds, other.seconds)?;
        Self::of_seconds_with_adjustment(
            seconds,
            i64::from(self.nanos) + i64::from(other.nanos),
        )
    }

    /// Subtracts another duration.
    pub fn minus(&self, other: &Self) -> TemporaResult<Self> {
        let seconds = utils::checked_sub(self.seconds, other.seconds)?;
        Self::of_seconds_with_adjustment(
            seconds,
            i64::from(self.nanos) - i64::from(other.nanos),
        )
    }

    /// Returns this duration with its sign flipped.
    pub fn negated(&self) -> TemporaResult<Self> {
        Self::from_total_nanos(-self.to_total_nanos())
    }

    /// Multiplies by a scalar.
    pub fn multiplied_by(&self, scalar: i64) -> TemporaResult<Self> {
        let total = self
            .to_total_nanos()
            .checked_mul(i128::from(scalar))
            .ok_or_else(|| {
                TemporaError::overflow().with_message("duration multiplication overflowed")
            })?;
        Self::from_total_nanos(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjustment_is_floored() {
        let a = Duration::of_seconds_with_adjustment(3, -999_999_999).unwrap();
        let b = Duration::of_seconds_with_adjustment(2, 1).unwrap();
        assert_eq!(a, b);

        let negative_half = Duration::of_millis(-500);
        assert_eq!(negative_half.seconds(), -1);
        assert_eq!(negative_half.subsec_nanos(), 500_000_000);
        assert!(negative_half.is_negative());
    }

    #[test]
    fn between_instants() {
        let start = Instant::of_epoch_second_with_adjustment(10, 500_000_000).unwrap();
        let end = Instant::of_epoch_second(12).unwrap();
        let forward = Duration::between(&start, &end).unwrap();
        assert_eq!(forward, Duration::of_millis(1_500));
        let backward = Duration::between(&end, &start).unwrap();
        assert_eq!(backward, forward.negated().unwrap());
    }

    #[test]
    fn arithmetic_round_trips() {
        let d = Duration::of_seconds_with_adjustment(5, 600_000_000).unwrap();
        let sum = d.plus(&d).unwrap();
        assert_eq!(sum, Duration::of_millis(11_200));
        assert_eq!(sum.minus(&d).unwrap(), d);
        assert_eq!(d.multiplied_by(-2).unwrap(), Duration::of_millis(-11_200));
        assert_eq!(Duration::of_nanos(-1).to_total_nanos(), -1);
    }
}
