//! This module implements `TimeOfDay` and its time-line-free arithmetic.

use core::str::FromStr;

use num_traits::Euclid;

use crate::{
    fields::{unsupported_field, Field, FieldAccess, FieldRange},
    options::{unsupported_unit, Unit, UnitArithmetic},
    parsers::{self, FormattableTime, Precision},
    utils, TemporaError, TemporaResult,
};

/// A time of day on the 24-hour clock, with nanosecond precision and no
/// date, offset, or zone attached.
///
/// Additive arithmetic wraps around midnight and never fails; the day
/// carry, where one is needed, is the caller's concern.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
    second: u8,
    nanosecond: u32,
}

// ==== Public API ====

impl TimeOfDay {
    /// The start of the day, `00:00`.
    pub const MIDNIGHT: Self = Self::new_unchecked(0, 0, 0, 0);

    /// The middle of the day, `12:00`.
    pub const NOON: Self = Self::new_unchecked(12, 0, 0, 0);

    /// The smallest representable time of day.
    pub const MIN: Self = Self::MIDNIGHT;

    /// The largest representable time of day, `23:59:59.999999999`.
    pub const MAX: Self = Self::new_unchecked(23, 59, 59, 999_999_999);

    #[inline]
    #[must_use]
    pub(crate) const fn new_unchecked(hour: u8, minute: u8, second: u8, nanosecond: u32) -> Self {
        Self {
            hour,
            minute,
            second,
            nanosecond,
        }
    }

    /// Creates a new validated `TimeOfDay`.
    pub fn try_new(hour: u8, minute: u8, second: u8, nanosecond: u32) -> TemporaResult<Self> {
        FieldRange::new(0, 23).check(hour.into(), Field::HourOfDay)?;
        FieldRange::new(0, 59).check(minute.into(), Field::MinuteOfHour)?;
        FieldRange::new(0, 59).check(second.into(), Field::SecondOfMinute)?;
        FieldRange::new(0, 999_999_999).check(nanosecond.into(), Field::NanoOfSecond)?;
        Ok(Self::new_unchecked(hour, minute, second, nanosecond))
    }

    /// Creates a `TimeOfDay` from a second-of-day count.
    pub fn of_second_of_day(second_of_day: i64) -> TemporaResult<Self> {
        FieldRange::new(0, utils::SECONDS_PER_DAY - 1)
            .check(second_of_day, Field::SecondOfDay)?;
        let hour = second_of_day / utils::SECONDS_PER_HOUR;
        let minute = (second_of_day / utils::SECONDS_PER_MINUTE) % 60;
        let second = second_of_day % 60;
        Ok(Self::new_unchecked(hour as u8, minute as u8, second as u8, 0))
    }

    /// Creates a `TimeOfDay` from a nanosecond-of-day count.
    pub fn of_nano_of_day(nano_of_day: i64) -> TemporaResult<Self> {
        FieldRange::new(0, utils::NANOS_PER_DAY - 1).check(nano_of_day, Field::NanoOfDay)?;
        Ok(Self::from_nano_of_day_unchecked(nano_of_day))
    }

    pub(crate) fn from_nano_of_day_unchecked(nano_of_day: i64) -> Self {
        let (second_of_day, nanosecond) = nano_of_day.div_rem_euclid(&utils::NANOS_PER_SECOND);
        let hour = second_of_day / utils::SECONDS_PER_HOUR;
        let minute = (second_of_day / utils::SECONDS_PER_MINUTE) % 60;
        let second = second_of_day % 60;
        Self::new_unchecked(hour as u8, minute as u8, second as u8, nanosecond as u32)
    }

    /// Returns the hour of the day.
    #[inline]
    #[must_use]
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// Returns the minute of the hour.
    #[inline]
    #[must_use]
    pub const fn minute(&self) -> u8 {
        self.minute
    }

    /// Returns the second of the minute.
    #[inline]
    #[must_use]
    pub const fn second(&self) -> u8 {
        self.second
    }

    /// Returns the nanosecond of the second.
    #[inline]
    #[must_use]
    pub const fn nanosecond(&self) -> u32 {
        self.nanosecond
    }

    /// Returns the second-of-day count.
    #[inline]
    #[must_use]
    pub const fn second_of_day(&self) -> i64 {
        self.hour as i64 * utils::SECONDS_PER_HOUR
            + self.minute as i64 * utils::SECONDS_PER_MINUTE
            + self.second as i64
    }

    /// Returns the nanosecond-of-day count.
    #[inline]
    #[must_use]
    pub const fn nano_of_day(&self) -> i64 {
        self.second_of_day() * utils::NANOS_PER_SECOND + self.nanosecond as i64
    }

    /// Returns a copy with the hour replaced.
    pub fn with_hour(&self, hour: u8) -> TemporaResult<Self> {
        Self::try_new(hour, self.minute, self.second, self.nanosecond)
    }

    /// Returns a copy with the minute replaced.
    pub fn with_minute(&self, minute: u8) -> TemporaResult<Self> {
        Self::try_new(self.hour, minute, self.second, self.nanosecond)
    }

    /// Returns a copy with the second replaced.
    pub fn with_second(&self, second: u8) -> TemporaResult<Self> {
        Self::try_new(self.hour, self.minute, second, self.nanosecond)
    }

    /// Returns a copy with the nanosecond replaced.
    pub fn with_nanosecond(&self, nanosecond: u32) -> TemporaResult<Self> {
        Self::try_new(self.hour, self.minute, self.second, nanosecond)
    }

    /// Adds hours, wrapping around midnight.
    #[must_use]
    pub fn plus_hours(&self, hours: i64) -> Self {
        if hours == 0 {
            return *self;
        }
        let new_hour = (hours % utils::HOURS_PER_DAY + self.hour as i64)
            .rem_euclid(utils::HOURS_PER_DAY);
        Self::new_unchecked(new_hour as u8, self.minute, self.second, self.nanosecond)
    }

    /// Adds minutes, wrapping around midnight.
    #[must_use]
    pub fn plus_minutes(&self, minutes: i64) -> Self {
        self.plus_nanos_wrapping((minutes % utils::MINUTES_PER_DAY) * utils::NANOS_PER_MINUTE)
    }

    /// Adds seconds, wrapping around midnight.
    #[must_use]
    pub fn plus_seconds(&self, seconds: i64) -> Self {
        self.plus_nanos_wrapping((seconds % utils::SECONDS_PER_DAY) * utils::NANOS_PER_SECOND)
    }

    /// Adds nanoseconds, wrapping around midnight.
    #[must_use]
    pub fn plus_nanos(&self, nanos: i64) -> Self {
        self.plus_nanos_wrapping(nanos % utils::NANOS_PER_DAY)
    }

    /// Subtracts hours, wrapping around midnight.
    #[must_use]
    pub fn minus_hours(&self, hours: i64) -> Self {
        self.plus_hours(-(hours % utils::HOURS_PER_DAY))
    }

    /// Subtracts minutes, wrapping around midnight.
    #[must_use]
    pub fn minus_minutes(&self, minutes: i64) -> Self {
        self.plus_minutes(-(minutes % utils::MINUTES_PER_DAY))
    }

    /// Subtracts seconds, wrapping around midnight.
    #[must_use]
    pub fn minus_seconds(&self, seconds: i64) -> Self {
        self.plus_seconds(-(seconds % utils::SECONDS_PER_DAY))
    }

    /// Subtracts nanoseconds, wrapping around midnight.
    #[must_use]
    pub fn minus_nanos(&self, nanos: i64) -> Self {
        self.plus_nanos(-(nanos % utils::NANOS_PER_DAY))
    }

    // `addend` must already be reduced into (-NANOS_PER_DAY, NANOS_PER_DAY).
    fn plus_nanos_wrapping(&self, addend: i64) -> Self {
        if addend == 0 {
            return *self;
        }
        let new_nod = (self.nano_of_day() + addend).rem_euclid(utils::NANOS_PER_DAY);
        Self::from_nano_of_day_unchecked(new_nod)
    }

    /// Truncates to the given unit.
    ///
    /// The unit's duration must divide one day without remainder; all other
    /// units fail with `UnsupportedUnit`.
    pub fn truncated_to(&self, unit: Unit) -> TemporaResult<Self> {
        if unit == Unit::Nanosecond {
            return Ok(*self);
        }
        let unit_nanos = truncation_unit_nanos(unit)?;
        let nod = self.nano_of_day();
        Ok(Self::from_nano_of_day_unchecked((nod / unit_nanos) * unit_nanos))
    }
}

/// Resolves the nanosecond length of a truncation unit, rejecting units
/// whose duration does not evenly divide one day.
pub(crate) fn truncation_unit_nanos(unit: Unit) -> TemporaResult<i64> {
    let Some(unit_nanos) = unit.as_nanoseconds() else {
        return Err(unsupported_unit(unit));
    };
    let unit_nanos = unit_nanos as i64;
    if utils::NANOS_PER_DAY % unit_nanos != 0 {
        return Err(TemporaError::unsupported_unit()
            .with_message("truncation unit must divide into a standard day without remainder"));
    }
    Ok(unit_nanos)
}

// ==== Trait impls ====

impl FieldAccess for TimeOfDay {
    fn is_supported_field(&self, field: Field) -> bool {
        field.is_time_field()
    }

    fn get(&self, field: Field) -> TemporaResult<i64> {
        match field {
            Field::NanoOfSecond => Ok(self.nanosecond.into()),
            Field::NanoOfDay => Ok(self.nano_of_day()),
            Field::MicroOfSecond => Ok(i64::from(self.nanosecond) / 1_000),
            Field::MilliOfSecond => Ok(i64::from(self.nanosecond) / 1_000_000),
            Field::SecondOfMinute => Ok(self.second.into()),
            Field::SecondOfDay => Ok(self.second_of_day()),
            Field::MinuteOfHour => Ok(self.minute.into()),
            Field::MinuteOfDay => Ok(i64::from(self.hour) * 60 + i64::from(self.minute)),
            Field::HourOfDay => Ok(self.hour.into()),
            _ => Err(unsupported_field(field)),
        }
    }

    fn field_range(&self, field: Field) -> TemporaResult<FieldRange> {
        match field {
            Field::NanoOfSecond => Ok(FieldRange::new(0, 999_999_999)),
            Field::NanoOfDay => Ok(FieldRange::new(0, utils::NANOS_PER_DAY - 1)),
            Field::MicroOfSecond => Ok(FieldRange::new(0, 999_999)),
            Field::MilliOfSecond => Ok(FieldRange::new(0, 999)),
            Field::SecondOfMinute | Field::MinuteOfHour => Ok(FieldRange::new(0, 59)),
            Field::SecondOfDay => Ok(FieldRange::new(0, utils::SECONDS_PER_DAY - 1)),
            Field::MinuteOfDay => Ok(FieldRange::new(0, utils::MINUTES_PER_DAY - 1)),
            Field::HourOfDay => Ok(FieldRange::new(0, 23)),
            _ => Err(unsupported_field(field)),
        }
    }
}

impl UnitArithmetic for TimeOfDay {
    fn is_supported_unit(&self, unit: Unit) -> bool {
        unit.is_time_unit()
    }

    fn plus(&self, amount: i64, unit: Unit) -> TemporaResult<Self> {
        match unit {
            Unit::Hour => Ok(self.plus_hours(amount)),
            Unit::Minute => Ok(self.plus_minutes(amount)),
            Unit::Second => Ok(self.plus_seconds(amount)),
            Unit::Millisecond => Ok(self.plus_nanos_wrapping(
                (amount % (utils::NANOS_PER_DAY / 1_000_000)) * 1_000_000,
            )),
            Unit::Microsecond => {
                Ok(self.plus_nanos_wrapping((amount % (utils::NANOS_PER_DAY / 1_000)) * 1_000))
            }
            Unit::Nanosecond => Ok(self.plus_nanos(amount)),
            _ => Err(unsupported_unit(unit)),
        }
    }

    fn until_in(&self, end: &Self, unit: Unit) -> TemporaResult<i64> {
        let Some(unit_nanos) = unit.as_nanoseconds() else {
            return Err(unsupported_unit(unit));
        };
        if unit.is_date_unit() {
            return Err(unsupported_unit(unit));
        }
        let diff = end.nano_of_day() - self.nano_of_day();
        Ok(diff / unit_nanos as i64)
    }
}

impl core::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        FormattableTime {
            hour: self.hour,
            minute: self.minute,
            second: self.second,
            nanosecond: self.nanosecond,
            precision: Precision::Auto,
            include_sep: true,
        }
        .fmt(f)
    }
}

impl FromStr for TimeOfDay {
    type Err = TemporaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parsers::parse_time_of_day(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_bounds() {
        assert!(TimeOfDay::try_new(23, 59, 59, 999_999_999).is_ok());
        assert!(TimeOfDay::try_new(24, 0, 0, 0).is_err());
        assert!(TimeOfDay::try_new(0, 60, 0, 0).is_err());
        assert!(TimeOfDay::try_new(0, 0, 0, 1_000_000_000).is_err());
    }

    #[test]
    fn nano_of_day_round_trip() {
        let time = TimeOfDay::try_new(13, 47, 5, 123_456_789).unwrap();
        assert_eq!(TimeOfDay::of_nano_of_day(time.nano_of_day()).unwrap(), time);
        assert_eq!(TimeOfDay::MAX.nano_of_day(), utils::NANOS_PER_DAY - 1);
    }

    #[test]
    fn arithmetic_wraps_around_midnight() {
        let time = TimeOfDay::try_new(23, 30, 0, 0).unwrap();
        assert_eq!(time.plus_hours(2), TimeOfDay::try_new(1, 30, 0, 0).unwrap());
        assert_eq!(
            TimeOfDay::MIDNIGHT.minus_nanos(1),
            TimeOfDay::MAX
        );
        assert_eq!(time.plus_hours(-48), time);
    }

    #[test]
    fn truncation() {
        let time = TimeOfDay::try_new(14, 39, 42, 987_654_321).unwrap();
        assert_eq!(
            time.truncated_to(Unit::Hour).unwrap(),
            TimeOfDay::try_new(14, 0, 0, 0).unwrap()
        );
        assert_eq!(
            time.truncated_to(Unit::Second).unwrap(),
            TimeOfDay::try_new(14, 39, 42, 0).unwrap()
        );
        assert!(time.truncated_to(Unit::Week).is_err());
    }

    #[test]
    fn until_truncates_toward_zero() {
        let start = TimeOfDay::try_new(1, 0, 30, 0).unwrap();
        let end = TimeOfDay::try_new(2, 30, 0, 0).unwrap();
        assert_eq!(start.until_in(&end, Unit::Hour).unwrap(), 1);
        assert_eq!(end.until_in(&start, Unit::Hour).unwrap(), -1);
        assert_eq!(start.until_in(&end, Unit::Minute).unwrap(), 89);
    }
}
