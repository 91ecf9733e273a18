//! This module implements `CivilDateTime`, the composition of a date and a
//! time of day.

use core::str::FromStr;

use num_traits::Euclid;

use crate::{
    components::{date::CivilDate, period::Period, time::TimeOfDay},
    fields::{Field, FieldAccess, FieldRange},
    options::{unsupported_unit, Unit, UnitArithmetic},
    parsers::{self, FormattableDate, FormattableTime, Precision},
    utils, TemporaError, TemporaResult, UtcOffset,
};

/// A date and time of day on the local time-line, with no offset or zone
/// attached.
///
/// Time-unit arithmetic carries day overflow into the date; date-unit
/// arithmetic leaves the time of day untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilDateTime {
    date: CivilDate,
    time: TimeOfDay,
}

// ==== Public API ====

impl CivilDateTime {
    /// The smallest representable date-time.
    pub const MIN: Self = Self::new(CivilDate::MIN, TimeOfDay::MIN);

    /// The largest representable date-time.
    pub const MAX: Self = Self::new(CivilDate::MAX, TimeOfDay::MAX);

    /// Composes a date-time from its parts. Both parts are already valid, so
    /// this cannot fail.
    #[inline]
    #[must_use]
    pub const fn new(date: CivilDate, time: TimeOfDay) -> Self {
        Self { date, time }
    }

    /// Creates a date-time from an epoch second, a nanosecond of second, and
    /// the fixed offset to apply.
    ///
    /// Fails with a range error when the shifted local value leaves the
    /// supported date range.
    pub fn of_epoch_second(
        epoch_second: i64,
        nanosecond: u32,
        offset: UtcOffset,
    ) -> TemporaResult<Self> {
        FieldRange::new(0, 999_999_999).check(nanosecond.into(), Field::NanoOfSecond)?;
        let local_second = utils::checked_add(epoch_second, offset.seconds().into())?;
        let (local_epoch_day, second_of_day) = local_second.div_rem_euclid(&utils::SECONDS_PER_DAY);
        let date = CivilDate::from_epoch_day(local_epoch_day)?;
        let time = TimeOfDay::from_nano_of_day_unchecked(
            second_of_day * utils::NANOS_PER_SECOND + i64::from(nanosecond),
        );
        Ok(Self::new(date, time))
    }

    /// Returns the epoch second of this date-time at the given fixed offset.
    #[inline]
    #[must_use]
    pub fn to_epoch_second(&self, offset: UtcOffset) -> i64 {
        self.date.to_epoch_day() * utils::SECONDS_PER_DAY + self.time.second_of_day()
            - i64::from(offset.seconds())
    }

    /// Returns the date part.
    #[inline]
    #[must_use]
    pub const fn date(&self) -> CivilDate {
        self.date
    }

    /// Returns the time-of-day part.
    #[inline]
    #[must_use]
    pub const fn time(&self) -> TimeOfDay {
        self.time
    }

    /// Returns a copy with the date part replaced.
    #[inline]
    #[must_use]
    pub const fn with_date(&self, date: CivilDate) -> Self {
        Self::new(date, self.time)
    }

    /// Returns a copy with the time part replaced.
    #[inline]
    #[must_use]
    pub const fn with_time(&self, time: TimeOfDay) -> Self {
        Self::new(self.date, time)
    }

    /// Adds years; the time of day is untouched.
    pub fn plus_years(&self, years: i64) -> TemporaResult<Self> {
        Ok(self.with_date(self.date.plus_years(years)?))
    }

    /// Adds months; the time of day is untouched.
    pub fn plus_months(&self, months: i64) -> TemporaResult<Self> {
        Ok(self.with_date(self.date.plus_months(months)?))
    }

    /// Adds weeks; the time of day is untouched.
    pub fn plus_weeks(&self, weeks: i64) -> TemporaResult<Self> {
        Ok(self.with_date(self.date.plus_weeks(weeks)?))
    }

    /// Adds days; the time of day is untouched.
    pub fn plus_days(&self, days: i64) -> TemporaResult<Self> {
        Ok(self.with_date(self.date.plus_days(days)?))
    }

    /// Adds hours, carrying day overflow into the date.
    pub fn plus_hours(&self, hours: i64) -> TemporaResult<Self> {
        self.plus_time_units(hours, 0, 0, 0, 1)
    }

    /// Adds minutes, carrying day overflow into the date.
    pub fn plus_minutes(&self, minutes: i64) -> TemporaResult<Self> {
        self.plus_time_units(0, minutes, 0, 0, 1)
    }

    /// Adds seconds, carrying day overflow into the date.
    pub fn plus_seconds(&self, seconds: i64) -> TemporaResult<Self> {
        self.plus_time_units(0, 0, seconds, 0, 1)
    }

    /// Adds nanoseconds, carrying day overflow into the date.
    pub fn plus_nanos(&self, nanos: i64) -> TemporaResult<Self> {
        self.plus_time_units(0, 0, 0, nanos, 1)
    }

    /// Subtracts hours, carrying day overflow into the date.
    pub fn minus_hours(&self, hours: i64) -> TemporaResult<Self> {
        self.plus_time_units(hours, 0, 0, 0, -1)
    }

    /// Subtracts minutes, carrying day overflow into the date.
    pub fn minus_minutes(&self, minutes: i64) -> TemporaResult<Self> {
        self.plus_time_units(0, minutes, 0, 0, -1)
    }

    /// Subtracts seconds, carrying day overflow into the date.
    pub fn minus_seconds(&self, seconds: i64) -> TemporaResult<Self> {
        self.plus_time_units(0, 0, seconds, 0, -1)
    }

    /// Subtracts nanoseconds, carrying day overflow into the date.
    pub fn minus_nanos(&self, nanos: i64) -> TemporaResult<Self> {
        self.plus_time_units(0, 0, 0, nanos, -1)
    }

    // Splits each operand into whole days and a sub-day remainder before
    // combining, so no intermediate product can overflow even for extreme
    // operands.
    fn plus_time_units(
        &self,
        hours: i64,
        minutes: i64,
        seconds: i64,
        nanos: i64,
        sign: i64,
    ) -> TemporaResult<Self> {
        let mut total_days = nanos / utils::NANOS_PER_DAY
            + seconds / utils::SECONDS_PER_DAY
            + minutes / utils::MINUTES_PER_DAY
            + hours / utils::HOURS_PER_DAY;
        total_days *= sign;
        let mut total_nanos = nanos % utils::NANOS_PER_DAY
            + (seconds % utils::SECONDS_PER_DAY) * utils::NANOS_PER_SECOND
            + (minutes % utils::MINUTES_PER_DAY) * utils::NANOS_PER_MINUTE
            + (hours % utils::HOURS_PER_DAY) * utils::NANOS_PER_HOUR;
        let current_nod = self.time.nano_of_day();
        total_nanos = total_nanos * sign + current_nod;
        total_days = utils::checked_add(total_days, total_nanos.div_euclid(utils::NANOS_PER_DAY))?;
        let new_nod = total_nanos.rem_euclid(utils::NANOS_PER_DAY);
        let new_time = if new_nod == current_nod {
            self.time
        } else {
            TimeOfDay::from_nano_of_day_unchecked(new_nod)
        };
        Ok(Self::new(self.date.plus_days(total_days)?, new_time))
    }

    /// Applies a [`Period`], affecting only the date part.
    pub fn plus_period(&self, period: &Period) -> TemporaResult<Self> {
        Ok(self.with_date(period.add_to(&self.date)?))
    }

    /// Subtracts a [`Period`], affecting only the date part.
    pub fn minus_period(&self, period: &Period) -> TemporaResult<Self> {
        Ok(self.with_date(period.subtract_from(&self.date)?))
    }

    /// Truncates the time of day to the given unit. Truncating to days
    /// resets the time to midnight.
    pub fn truncated_to(&self, unit: Unit) -> TemporaResult<Self> {
        if unit == Unit::Day {
            return Ok(self.with_time(TimeOfDay::MIDNIGHT));
        }
        Ok(self.with_time(self.time.truncated_to(unit)?))
    }
}

// ==== Trait impls ====

impl FieldAccess for CivilDateTime {
    fn is_supported_field(&self, field: Field) -> bool {
        field.is_date_field() || field.is_time_field()
    }

    fn get(&self, field: Field) -> TemporaResult<i64> {
        if field.is_time_field() {
            self.time.get(field)
        } else {
            self.date.get(field)
        }
    }

    fn field_range(&self, field: Field) -> TemporaResult<FieldRange> {
        if field.is_time_field() {
            self.time.field_range(field)
        } else {
            self.date.field_range(field)
        }
    }
}

impl UnitArithmetic for CivilDateTime {
    fn is_supported_unit(&self, unit: Unit) -> bool {
        unit.is_date_unit() || unit.is_time_unit()
    }

    fn plus(&self, amount: i64, unit: Unit) -> TemporaResult<Self> {
        match unit {
            Unit::Year | Unit::Month | Unit::Week | Unit::Day => {
                Ok(self.with_date(self.date.plus(amount, unit)?))
            }
            Unit::Hour => self.plus_hours(amount),
            Unit::Minute => self.plus_minutes(amount),
            Unit::Second => self.plus_seconds(amount),
            Unit::Millisecond => self.plus_time_units(
                0,
                0,
                amount / utils::MILLIS_PER_SECOND,
                (amount % utils::MILLIS_PER_SECOND) * 1_000_000,
                1,
            ),
            Unit::Microsecond => self.plus_time_units(
                0,
                0,
                amount / 1_000_000,
                (amount % 1_000_000) * 1_000,
                1,
            ),
            Unit::Nanosecond => self.plus_nanos(amount),
        }
    }

    fn until_in(&self, end: &Self, unit: Unit) -> TemporaResult<i64> {
        if unit.is_date_unit() {
            // The final partial day only counts once the end time of day has
            // reached the start time of day.
            let mut end_date = end.date;
            if end_date > self.date && end.time < self.time {
                end_date = end_date.plus_days(-1)?;
            } else if end_date < self.date && end.time > self.time {
                end_date = end_date.plus_days(1)?;
            }
            return self.date.until_in(&end_date, unit);
        }
        let Some(unit_nanos) = unit.as_nanoseconds() else {
            return Err(unsupported_unit(unit));
        };
        let total = i128::from(self.date.days_until(&end.date))
            * i128::from(utils::NANOS_PER_DAY)
            + i128::from(end.time.nano_of_day() - self.time.nano_of_day());
        i64::try_from(total / i128::from(unit_nanos)).map_err(|_| {
            TemporaError::overflow().with_message("difference exceeds the representable range")
        })
    }
}

impl core::fmt::Display for CivilDateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        FormattableDate(self.date.year(), self.date.month(), self.date.day()).fmt(f)?;
        f.write_str("T")?;
        FormattableTime {
            hour: self.time.hour(),
            minute: self.time.minute(),
            second: self.time.second(),
            nanosecond: self.time.nanosecond(),
            precision: Precision::Auto,
            include_sep: true,
        }
        .fmt(f)
    }
}

impl FromStr for CivilDateTime {
    type Err = TemporaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parsers::parse_civil_date_time(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(year: i32, month: u8, day: u8, hour: u8, minute: u8) -> CivilDateTime {
        CivilDateTime::new(
            CivilDate::try_new(year, month, day).unwrap(),
            TimeOfDay::try_new(hour, minute, 0, 0).unwrap(),
        )
    }

    #[test]
    fn time_arithmetic_carries_days() {
        let base = dt(2021, 12, 31, 23, 30);
        assert_eq!(base.plus_hours(1).unwrap(), dt(2022, 1, 1, 0, 30));
        assert_eq!(base.plus_minutes(30).unwrap(), dt(2022, 1, 1, 0, 0));
        assert_eq!(
            dt(2021, 1, 1, 0, 0).minus_nanos(1).unwrap().time(),
            TimeOfDay::MAX
        );
        assert_eq!(base.plus_hours(-24).unwrap(), dt(2021, 12, 30, 23, 30));
    }

    #[test]
    fn date_arithmetic_keeps_the_time() {
        let base = dt(2020, 2, 29, 6, 15);
        assert_eq!(base.plus_years(1).unwrap(), dt(2021, 2, 28, 6, 15));
        assert_eq!(base.plus_months(12).unwrap(), dt(2021, 2, 28, 6, 15));
    }

    #[test]
    fn epoch_second_round_trip() {
        let offset = UtcOffset::from_seconds(-18_000).unwrap();
        let base = dt(2023, 11, 29, 20, 49);
        let epoch_second = base.to_epoch_second(offset);
        assert_eq!(
            CivilDateTime::of_epoch_second(epoch_second, 0, offset).unwrap(),
            base
        );
        // The same instant read at UTC is five hours later.
        assert_eq!(
            CivilDateTime::of_epoch_second(epoch_second, 0, UtcOffset::UTC).unwrap(),
            dt(2023, 11, 30, 1, 49)
        );
    }

    #[test]
    fn until_date_units_respect_time_of_day() {
        let start = dt(2021, 1, 10, 12, 0);
        let end_before_noon = dt(2021, 1, 12, 6, 0);
        let end_after_noon = dt(2021, 1, 12, 18, 0);
        assert_eq!(start.until_in(&end_before_noon, Unit::Day).unwrap(), 1);
        assert_eq!(start.until_in(&end_after_noon, Unit::Day).unwrap(), 2);
    }

    #[test]
    fn until_time_units_use_total_nanos() {
        let start = dt(2021, 1, 10, 23, 0);
        let end = dt(2021, 1, 11, 1, 30);
        assert_eq!(start.until_in(&end, Unit::Hour).unwrap(), 2);
        assert_eq!(start.until_in(&end, Unit::Minute).unwrap(), 150);
        assert_eq!(end.until_in(&start, Unit::Hour).unwrap(), -2);
    }

    #[test]
    fn truncation_to_days_is_midnight() {
        let base = dt(2021, 6, 15, 14, 39);
        assert_eq!(
            base.truncated_to(Unit::Day).unwrap(),
            dt(2021, 6, 15, 0, 0)
        );
        assert_eq!(
            base.truncated_to(Unit::Hour).unwrap(),
            dt(2021, 6, 15, 14, 0)
        );
    }
}
