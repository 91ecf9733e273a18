//! This module implements `Instant`, the anchor of the instant time-line.

use core::str::FromStr;

use num_traits::Euclid;

use crate::{
    components::{duration::Duration, now::Clock, time::truncation_unit_nanos},
    fields::{unsupported_field, Field, FieldAccess, FieldRange},
    options::{unsupported_unit, TemporalAmount, Unit, UnitArithmetic},
    parsers::{self, FormattableDate, FormattableTime, Precision},
    utils, TemporaError, TemporaResult,
};

/// A point on the instant time-line: a signed count of seconds since
/// 1970-01-01T00:00:00Z plus a nanosecond-of-second fraction.
///
/// An `Instant` has no calendar concept at all. The day underlying its
/// second count is the idealized 86,400-second day; leap seconds are not
/// modelled.
///
/// The supported range spans roughly ±1,000,000,000 years, one year beyond
/// the [`CivilDate`](crate::CivilDate) year range in each direction, so that
/// every supported local date-time converts to an in-range `Instant` at any
/// valid offset. Converting back from the outermost instants can therefore
/// fail with a range error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant {
    seconds: i64,
    nanos: u32,
}

// The outermost whole seconds, -1000000000-01-01T00:00Z and
// +1000000000-12-31T23:59:59Z.
const MIN_SECOND: i64 = -31_557_014_167_219_200;
const MAX_SECOND: i64 = 31_556_889_864_403_199;

// ==== Private API ====

impl Instant {
    #[inline]
    #[must_use]
    const fn new_unchecked(seconds: i64, nanos: u32) -> Self {
        Self { seconds, nanos }
    }

    /// Shared addition path: folds the nanosecond carry into seconds with
    /// floor semantics. `nanos_to_add` is unconstrained.
    fn plus_internal(&self, seconds_to_add: i64, nanos_to_add: i64) -> TemporaResult<Self> {
        if (seconds_to_add | nanos_to_add) == 0 {
            return Ok(*self);
        }
        let mut epoch_second = utils::checked_add(self.seconds, seconds_to_add)?;
        epoch_second =
            utils::checked_add(epoch_second, nanos_to_add / utils::NANOS_PER_SECOND)?;
        let nano_adjustment =
            i64::from(self.nanos) + nanos_to_add % utils::NANOS_PER_SECOND;
        Self::of_epoch_second_with_adjustment(epoch_second, nano_adjustment)
    }

    fn seconds_until(&self, end: &Self) -> TemporaResult<i64> {
        let mut seconds_diff = utils::checked_sub(end.seconds, self.seconds)?;
        let nanos_diff = i64::from(end.nanos) - i64::from(self.nanos);
        // Adjust by one when the fractional remainder's sign disagrees with
        // the whole-second difference, so a fractional boundary never counts.
        if seconds_diff > 0 && nanos_diff < 0 {
            seconds_diff -= 1;
        } else if seconds_diff < 0 && nanos_diff > 0 {
            seconds_diff += 1;
        }
        Ok(seconds_diff)
    }

    fn nanos_until(&self, end: &Self) -> i128 {
        i128::from(end.seconds - self.seconds) * i128::from(utils::NANOS_PER_SECOND)
            + i128::from(end.nanos) - i128::from(self.nanos)
    }
}

// ==== Public API ====

impl Instant {
    /// The shared epoch instant, 1970-01-01T00:00:00Z.
    pub const EPOCH: Self = Self::new_unchecked(0, 0);

    /// The smallest representable instant.
    pub const MIN: Self = Self::new_unchecked(MIN_SECOND, 0);

    /// The largest representable instant.
    pub const MAX: Self = Self::new_unchecked(MAX_SECOND, 999_999_999);

    /// Creates a new validated `Instant`.
    pub fn try_new(seconds: i64, nanosecond: u32) -> TemporaResult<Self> {
        FieldRange::new(MIN_SECOND, MAX_SECOND).check(seconds, Field::InstantSeconds)?;
        FieldRange::new(0, 999_999_999).check(nanosecond.into(), Field::NanoOfSecond)?;
        Ok(Self::new_unchecked(seconds, nanosecond))
    }

    /// Creates an `Instant` from an epoch second count.
    pub fn of_epoch_second(epoch_second: i64) -> TemporaResult<Self> {
        Self::try_new(epoch_second, 0)
    }

    /// Creates an `Instant` from an epoch second count and a nanosecond
    /// adjustment of either sign.
    ///
    /// The adjustment is folded into the second count with floor semantics,
    /// so `(3, -999_999_999)` and `(2, 1)` normalize identically.
    pub fn of_epoch_second_with_adjustment(
        epoch_second: i64,
        nano_adjustment: i64,
    ) -> TemporaResult<Self> {
        let (carry_seconds, nanos) = nano_adjustment.div_rem_euclid(&utils::NANOS_PER_SECOND);
        let seconds = utils::checked_add(epoch_second, carry_seconds)?;
        Self::try_new(seconds, nanos as u32)
    }

    /// Creates an `Instant` from an epoch millisecond count.
    pub fn of_epoch_milli(epoch_milli: i64) -> TemporaResult<Self> {
        let (seconds, millis) = epoch_milli.div_rem_euclid(&utils::MILLIS_PER_SECOND);
        Self::try_new(seconds, millis as u32 * 1_000_000)
    }

    /// Reads the current instant from the given clock. The clock is queried
    /// exactly once.
    pub fn now(clock: &impl Clock) -> TemporaResult<Self> {
        Ok(clock.now()?.0)
    }

    /// Returns the epoch second count.
    #[inline]
    #[must_use]
    pub const fn epoch_second(&self) -> i64 {
        self.seconds
    }

    /// Returns the nanosecond of the second.
    #[inline]
    #[must_use]
    pub const fn nanosecond(&self) -> u32 {
        self.nanos
    }

    /// Converts to an epoch millisecond count, flooring so that half a
    /// second before the epoch maps to `-500`.
    pub fn to_epoch_milli(&self) -> TemporaResult<i64> {
        if self.seconds < 0 && self.nanos > 0 {
            let millis = utils::checked_mul(self.seconds + 1, utils::MILLIS_PER_SECOND)?;
            let adjustment = i64::from(self.nanos) / 1_000_000 - utils::MILLIS_PER_SECOND;
            utils::checked_add(millis, adjustment)
        } else {
            let millis = utils::checked_mul(self.seconds, utils::MILLIS_PER_SECOND)?;
            utils::checked_add(millis, i64::from(self.nanos) / 1_000_000)
        }
    }

    /// Adds seconds.
    pub fn plus_seconds(&self, seconds: i64) -> TemporaResult<Self> {
        self.plus_internal(seconds, 0)
    }

    /// Adds milliseconds.
    pub fn plus_millis(&self, millis: i64) -> TemporaResult<Self> {
        self.plus_internal(
            millis / utils::MILLIS_PER_SECOND,
            (millis % utils::MILLIS_PER_SECOND) * 1_000_000,
        )
    }

    /// Adds nanoseconds.
    pub fn plus_nanos(&self, nanos: i64) -> TemporaResult<Self> {
        self.plus_internal(0, nanos)
    }

    /// Subtracts seconds.
    pub fn minus_seconds(&self, seconds: i64) -> TemporaResult<Self> {
        if seconds == i64::MIN {
            return self.plus_seconds(i64::MAX)?.plus_seconds(1);
        }
        self.plus_seconds(-seconds)
    }

    /// Subtracts milliseconds.
    pub fn minus_millis(&self, millis: i64) -> TemporaResult<Self> {
        if millis == i64::MIN {
            return self.plus_millis(i64::MAX)?.plus_millis(1);
        }
        self.plus_millis(-millis)
    }

    /// Subtracts nanoseconds.
    pub fn minus_nanos(&self, nanos: i64) -> TemporaResult<Self> {
        if nanos == i64::MIN {
            return self.plus_nanos(i64::MAX)?.plus_nanos(1);
        }
        self.plus_nanos(-nanos)
    }

    /// Adds an exact [`Duration`].
    pub fn plus_duration(&self, duration: &Duration) -> TemporaResult<Self> {
        self.plus_internal(duration.seconds(), duration.subsec_nanos().into())
    }

    /// Subtracts an exact [`Duration`].
    pub fn minus_duration(&self, duration: &Duration) -> TemporaResult<Self> {
        self.minus_seconds(duration.seconds())?
            .minus_nanos(duration.subsec_nanos().into())
    }

    /// Applies a polymorphic [`TemporalAmount`]. A calendar period has no
    /// meaning on the instant time-line and is rejected.
    pub fn plus_amount(&self, amount: &TemporalAmount) -> TemporaResult<Self> {
        match amount {
            TemporalAmount::Duration(duration) => self.plus_duration(duration),
            TemporalAmount::Period(_) => Err(TemporaError::unsupported_unit()
                .with_message("a calendar period cannot be applied to an instant")),
        }
    }

    /// Truncates to the given unit.
    ///
    /// The unit's duration must divide one day without remainder; coarser or
    /// irregular units fail with `UnsupportedUnit`.
    pub fn truncated_to(&self, unit: Unit) -> TemporaResult<Self> {
        if unit == Unit::Nanosecond {
            return Ok(*self);
        }
        let unit_nanos = truncation_unit_nanos(unit)?;
        let nano_of_day = self.seconds.rem_euclid(utils::SECONDS_PER_DAY)
            * utils::NANOS_PER_SECOND
            + i64::from(self.nanos);
        let floored = (nano_of_day / unit_nanos) * unit_nanos;
        self.plus_internal(0, floored - nano_of_day)
    }

    /// Returns whether this instant is after `other`.
    #[inline]
    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        self > other
    }

    /// Returns whether this instant is before `other`.
    #[inline]
    #[must_use]
    pub fn is_before(&self, other: &Self) -> bool {
        self < other
    }
}

// ==== Trait impls ====

impl FieldAccess for Instant {
    fn is_supported_field(&self, field: Field) -> bool {
        matches!(
            field,
            Field::InstantSeconds
                | Field::NanoOfSecond
                | Field::MicroOfSecond
                | Field::MilliOfSecond
        )
    }

    fn get(&self, field: Field) -> TemporaResult<i64> {
        match field {
            Field::InstantSeconds => Ok(self.seconds),
            Field::NanoOfSecond => Ok(self.nanos.into()),
            Field::MicroOfSecond => Ok(i64::from(self.nanos) / 1_000),
            Field::MilliOfSecond => Ok(i64::from(self.nanos) / 1_000_000),
            _ => Err(unsupported_field(field)),
        }
    }

    fn field_range(&self, field: Field) -> TemporaResult<FieldRange> {
        match field {
            Field::InstantSeconds => Ok(FieldRange::new(MIN_SECOND, MAX_SECOND)),
            Field::NanoOfSecond => Ok(FieldRange::new(0, 999_999_999)),
            Field::MicroOfSecond => Ok(FieldRange::new(0, 999_999)),
            Field::MilliOfSecond => Ok(FieldRange::new(0, 999)),
            _ => Err(unsupported_field(field)),
        }
    }
}

impl UnitArithmetic for Instant {
    fn is_supported_unit(&self, unit: Unit) -> bool {
        unit.is_time_unit() || unit == Unit::Day
    }

    fn plus(&self, amount: i64, unit: Unit) -> TemporaResult<Self> {
        match unit {
            Unit::Nanosecond => self.plus_nanos(amount),
            Unit::Microsecond => self.plus_internal(
                amount / 1_000_000,
                (amount % 1_000_000) * 1_000,
            ),
            Unit::Millisecond => self.plus_millis(amount),
            Unit::Second => self.plus_seconds(amount),
            Unit::Minute => {
                self.plus_seconds(utils::checked_mul(amount, utils::SECONDS_PER_MINUTE)?)
            }
            Unit::Hour => self.plus_seconds(utils::checked_mul(amount, utils::SECONDS_PER_HOUR)?),
            Unit::Day => self.plus_seconds(utils::checked_mul(amount, utils::SECONDS_PER_DAY)?),
            _ => Err(unsupported_unit(unit)),
        }
    }

    fn until_in(&self, end: &Self, unit: Unit) -> TemporaResult<i64> {
        match unit {
            Unit::Nanosecond => i64::try_from(self.nanos_until(end)).map_err(|_| {
                TemporaError::overflow().with_message("difference exceeds the representable range")
            }),
            Unit::Microsecond => i64::try_from(self.nanos_until(end) / 1_000).map_err(|_| {
                TemporaError::overflow().with_message("difference exceeds the representable range")
            }),
            Unit::Millisecond => {
                utils::checked_sub(end.to_epoch_milli()?, self.to_epoch_milli()?)
            }
            Unit::Second => self.seconds_until(end),
            Unit::Minute => Ok(self.seconds_until(end)? / utils::SECONDS_PER_MINUTE),
            Unit::Hour => Ok(self.seconds_until(end)? / utils::SECONDS_PER_HOUR),
            Unit::Day => Ok(self.seconds_until(end)? / utils::SECONDS_PER_DAY),
            _ => Err(unsupported_unit(unit)),
        }
    }
}

impl core::fmt::Display for Instant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // The outermost instants sit one year past the CivilDate range, so
        // the conversion here works on raw epoch days.
        let (epoch_day, second_of_day) = self.seconds.div_rem_euclid(&utils::SECONDS_PER_DAY);
        let (year, month, day) = utils::civil_from_epoch_days(epoch_day);
        FormattableDate(year, month, day).fmt(f)?;
        f.write_str("T")?;
        let time = crate::TimeOfDay::from_nano_of_day_unchecked(
            second_of_day * utils::NANOS_PER_SECOND + i64::from(self.nanos),
        );
        FormattableTime {
            hour: time.hour(),
            minute: time.minute(),
            second: time.second(),
            nanosecond: time.nanosecond(),
            precision: Precision::Auto,
            include_sep: true,
        }
        .fmt(f)?;
        f.write_str("Z")
    }
}

impl FromStr for Instant {
    type Err = TemporaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parsers::parse_instant_text(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn factory_normalization_is_floored() {
        let a = Instant::of_epoch_second_with_adjustment(3, -999_999_999).unwrap();
        let b = Instant::of_epoch_second_with_adjustment(2, 1).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.epoch_second(), 2);
        assert_eq!(a.nanosecond(), 1);

        let c = Instant::of_epoch_second_with_adjustment(0, -1).unwrap();
        assert_eq!(c.epoch_second(), -1);
        assert_eq!(c.nanosecond(), 999_999_999);
    }

    #[test]
    fn epoch_milli_floors_for_negative_seconds() {
        let half_before = Instant::of_epoch_second_with_adjustment(-1, 500_000_000).unwrap();
        assert_eq!(half_before.to_epoch_milli().unwrap(), -500);
        assert_eq!(Instant::of_epoch_milli(-500).unwrap(), half_before);
        assert_eq!(Instant::EPOCH.to_epoch_milli().unwrap(), 0);
    }

    #[test]
    fn range_checked_factories() {
        assert!(Instant::of_epoch_second(MAX_SECOND).is_ok());
        assert!(Instant::of_epoch_second(MAX_SECOND + 1).is_err());
        assert!(Instant::of_epoch_second_with_adjustment(MAX_SECOND, 1_000_000_000).is_err());
        assert!(Instant::try_new(0, 1_000_000_000).is_err());
        assert!(Instant::MAX.plus_nanos(1).is_err());
    }

    #[test]
    fn until_adjusts_fractional_boundaries() {
        let start = Instant::of_epoch_second_with_adjustment(0, 500_000_000).unwrap();
        let end = Instant::of_epoch_second(2).unwrap();
        assert_eq!(start.until_in(&end, Unit::Second).unwrap(), 1);
        assert_eq!(end.until_in(&start, Unit::Second).unwrap(), -1);
        assert_eq!(start.until_in(&end, Unit::Millisecond).unwrap(), 1_500);
        assert_eq!(start.until_in(&end, Unit::Nanosecond).unwrap(), 1_500_000_000);
    }

    #[test]
    fn truncation_floors_within_the_day() {
        let instant = Instant::of_epoch_second_with_adjustment(86_400 + 3_725, 123_456_789)
            .unwrap();
        assert_eq!(
            instant.truncated_to(Unit::Hour).unwrap(),
            Instant::of_epoch_second(86_400 + 3_600).unwrap()
        );
        assert_eq!(
            instant.truncated_to(Unit::Second).unwrap(),
            Instant::of_epoch_second(86_400 + 3_725).unwrap()
        );
        assert!(instant.truncated_to(Unit::Month).is_err());

        // Truncation floors toward the start of the day for pre-epoch values.
        let before_epoch = Instant::of_epoch_second_with_adjustment(-1, 250_000_000).unwrap();
        assert_eq!(
            before_epoch.truncated_to(Unit::Second).unwrap(),
            Instant::of_epoch_second(-1).unwrap()
        );
        assert_eq!(
            before_epoch.truncated_to(Unit::Day).unwrap(),
            Instant::of_epoch_second(-86_400).unwrap()
        );
    }

    #[test]
    fn unit_arithmetic() {
        let base = Instant::EPOCH;
        assert_eq!(
            base.plus(25, Unit::Hour).unwrap().epoch_second(),
            25 * 3_600
        );
        assert_eq!(base.plus(1, Unit::Day).unwrap().epoch_second(), 86_400);
        assert!(base.plus(1, Unit::Month).is_err());
        assert_eq!(base.minus(1, Unit::Second).unwrap().epoch_second(), -1);
    }

    #[test]
    fn polymorphic_amounts_are_a_closed_set() {
        let base = Instant::EPOCH;
        let duration = crate::Duration::of_seconds(5);
        assert_eq!(
            base.plus_amount(&TemporalAmount::Duration(duration))
                .unwrap()
                .epoch_second(),
            5
        );
        let period = crate::Period::of_days(1);
        assert!(base.plus_amount(&TemporalAmount::Period(period)).is_err());
    }

    #[test]
    fn display_is_utc_iso() {
        assert_eq!(Instant::EPOCH.to_string(), "1970-01-01T00:00:00Z");
        let sub_second = Instant::of_epoch_second_with_adjustment(0, 120_000_000).unwrap();
        assert_eq!(sub_second.to_string(), "1970-01-01T00:00:00.12Z");
        let negative = Instant::of_epoch_second(-86_400).unwrap();
        assert_eq!(negative.to_string(), "1969-12-31T00:00:00Z");
    }
}
