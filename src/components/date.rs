//! This module implements `CivilDate` and the calendar arithmetic that the
//! rest of the crate builds on.

use core::str::FromStr;

use num_traits::Euclid;

use crate::{
    components::period::Period,
    fields::{unsupported_field, Field, FieldAccess, FieldRange},
    options::{unsupported_unit, TemporalAmount, Unit, UnitArithmetic},
    parsers::{self, FormattableDate},
    utils, TemporaError, TemporaResult,
};

/// A day of the week, numbered 1 (Monday) through 7 (Sunday).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DayOfWeek {
    Monday = 1,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// Creates a `DayOfWeek` from its 1-based number.
    pub fn of(number: u8) -> TemporaResult<Self> {
        FieldRange::new(1, 7).check(number.into(), Field::DayOfWeek)?;
        Ok(Self::ALL[(number - 1) as usize])
    }

    /// Returns the 1-based number of this day, Monday = 1.
    #[inline]
    #[must_use]
    pub const fn number(&self) -> u8 {
        *self as u8
    }

    /// Returns the day of the week `days` later, wrapping around the week.
    #[must_use]
    pub fn plus(&self, days: i64) -> Self {
        let index = (i64::from(self.number()) - 1 + days).rem_euclid(7);
        Self::ALL[index as usize]
    }
}

impl core::fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        })
    }
}

/// A month of the year, numbered 1 (January) through 12 (December).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    January = 1,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    const ALL: [Self; 12] = [
        Self::January,
        Self::February,
        Self::March,
        Self::April,
        Self::May,
        Self::June,
        Self::July,
        Self::August,
        Self::September,
        Self::October,
        Self::November,
        Self::December,
    ];

    /// Creates a `Month` from its 1-based number.
    pub fn of(number: u8) -> TemporaResult<Self> {
        FieldRange::new(1, 12).check(number.into(), Field::MonthOfYear)?;
        Ok(Self::ALL[(number - 1) as usize])
    }

    /// Returns the 1-based number of this month.
    #[inline]
    #[must_use]
    pub const fn number(&self) -> u8 {
        *self as u8
    }

    /// Returns the length of this month in days.
    #[inline]
    #[must_use]
    pub const fn length(&self, leap_year: bool) -> u8 {
        utils::days_in_month(if leap_year { 4 } else { 1 }, *self as u8)
    }

    /// Returns the day-of-year of the first day of this month.
    #[inline]
    #[must_use]
    pub const fn first_day_of_year(&self, leap_year: bool) -> u16 {
        utils::first_day_of_year(*self as u8, leap_year)
    }
}

impl core::fmt::Display for Month {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
            Self::April => "April",
            Self::May => "May",
            Self::June => "June",
            Self::July => "July",
            Self::August => "August",
            Self::September => "September",
            Self::October => "October",
            Self::November => "November",
            Self::December => "December",
        })
    }
}

/// A proleptic-Gregorian calendar date, independent of time-of-day and zone.
///
/// Every value is a valid calendar date: the day is validated against the
/// specific (year, month) pair at construction. The type is bijective with
/// its signed epoch-day count via [`CivilDate::to_epoch_day`] and
/// [`CivilDate::from_epoch_day`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilDate {
    year: i32,
    month: u8,
    day: u8,
}

// ==== Private API ====

impl CivilDate {
    #[inline]
    #[must_use]
    pub(crate) const fn new_unchecked(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    fn check_year(year: i64) -> TemporaResult<i32> {
        FieldRange::new(Self::MIN_YEAR.into(), Self::MAX_YEAR.into())
            .check(year, Field::Year)?;
        Ok(year as i32)
    }

    /// Clamps the day down to the last valid day of the target month.
    fn resolve_previous_valid(year: i32, month: u8, day: u8) -> Self {
        let day = day.min(utils::days_in_month(year, month));
        Self::new_unchecked(year, month, day)
    }

    /// The sequential month count from year zero.
    #[inline]
    pub(crate) const fn proleptic_month(&self) -> i64 {
        self.year as i64 * 12 + self.month as i64 - 1
    }

    /// Month arithmetic without the year-range check; the caller must know
    /// the result is in range.
    fn plus_months_unchecked(&self, months: i64) -> Self {
        if months == 0 {
            return *self;
        }
        let calc = self.proleptic_month() + months;
        let (year, month0) = calc.div_rem_euclid(&12);
        Self::resolve_previous_valid(year as i32, month0 as u8 + 1, self.day)
    }

    fn months_until(&self, end: &Self) -> i64 {
        // The final month counts as complete only when the end day-of-month
        // has reached the start day-of-month; packing day into the low bits
        // folds that comparison into one division.
        let packed1 = self.proleptic_month() * 32 + i64::from(self.day);
        let packed2 = end.proleptic_month() * 32 + i64::from(end.day);
        (packed2 - packed1) / 32
    }

    pub(crate) fn days_until(&self, end: &Self) -> i64 {
        end.to_epoch_day() - self.to_epoch_day()
    }
}

// ==== Public API ====

impl CivilDate {
    /// The smallest supported year.
    pub const MIN_YEAR: i32 = -999_999_999;

    /// The largest supported year.
    pub const MAX_YEAR: i32 = 999_999_999;

    /// The smallest representable date.
    pub const MIN: Self = Self::new_unchecked(Self::MIN_YEAR, 1, 1);

    /// The largest representable date.
    pub const MAX: Self = Self::new_unchecked(Self::MAX_YEAR, 12, 31);

    pub(crate) const MIN_EPOCH_DAY: i64 = utils::epoch_days_from_civil(Self::MIN_YEAR, 1, 1);
    pub(crate) const MAX_EPOCH_DAY: i64 = utils::epoch_days_from_civil(Self::MAX_YEAR, 12, 31);

    /// Creates a new validated `CivilDate`.
    ///
    /// Fails with `InvalidDate` when the (year, month, day) combination does
    /// not exist on the calendar, and with a range error when the year is
    /// outside the supported span.
    pub fn try_new(year: i32, month: u8, day: u8) -> TemporaResult<Self> {
        Self::check_year(year.into())?;
        if !(1..=12).contains(&month) {
            return Err(TemporaError::invalid_date()
                .with_message(alloc::format!("month {month} does not exist on the calendar")));
        }
        if day < 1 || day > utils::days_in_month(year, month) {
            if month == 2 && day == 29 {
                return Err(TemporaError::invalid_date().with_message(alloc::format!(
                    "February 29 does not exist in {year}, which is not a leap year"
                )));
            }
            return Err(TemporaError::invalid_date().with_message(alloc::format!(
                "day {day} does not exist in {year}-{month:02}"
            )));
        }
        Ok(Self::new_unchecked(year, month, day))
    }

    /// Creates a `CivilDate` from a year and a 1-based day-of-year.
    pub fn of_year_day(year: i32, day_of_year: u16) -> TemporaResult<Self> {
        Self::check_year(year.into())?;
        FieldRange::new(1, 366).check(day_of_year.into(), Field::DayOfYear)?;
        let leap = utils::is_leap_year(year);
        if day_of_year == 366 && !leap {
            return Err(TemporaError::invalid_date().with_message(alloc::format!(
                "day 366 does not exist in {year}, which is not a leap year"
            )));
        }
        let mut month = ((day_of_year - 1) / 31 + 1) as u8;
        let month_end =
            utils::first_day_of_year(month, leap) + u16::from(utils::days_in_month(year, month)) - 1;
        if day_of_year > month_end {
            month += 1;
        }
        let day = day_of_year - utils::first_day_of_year(month, leap) + 1;
        Ok(Self::new_unchecked(year, month, day as u8))
    }

    /// Creates a `CivilDate` from a signed day count from 1970-01-01.
    pub fn from_epoch_day(epoch_day: i64) -> TemporaResult<Self> {
        FieldRange::new(Self::MIN_EPOCH_DAY, Self::MAX_EPOCH_DAY)
            .check(epoch_day, Field::EpochDay)?;
        let (year, month, day) = utils::civil_from_epoch_days(epoch_day);
        Ok(Self::new_unchecked(year, month, day))
    }

    /// Returns the signed day count from 1970-01-01.
    #[inline]
    #[must_use]
    pub const fn to_epoch_day(&self) -> i64 {
        utils::epoch_days_from_civil(self.year, self.month, self.day)
    }

    /// Returns the proleptic year.
    #[inline]
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month of the year, 1–12.
    #[inline]
    #[must_use]
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Returns the month of the year as a [`Month`].
    #[inline]
    #[must_use]
    pub fn month_of_year(&self) -> Month {
        Month::ALL[(self.month - 1) as usize]
    }

    /// Returns the day of the month, 1–31.
    #[inline]
    #[must_use]
    pub const fn day(&self) -> u8 {
        self.day
    }

    /// Returns the day of the week. Epoch day zero is a Thursday.
    #[must_use]
    pub fn day_of_week(&self) -> DayOfWeek {
        let dow0 = (self.to_epoch_day() + 3).rem_euclid(7);
        DayOfWeek::ALL[dow0 as usize]
    }

    /// Returns the 1-based day of the year.
    #[inline]
    #[must_use]
    pub fn day_of_year(&self) -> u16 {
        utils::first_day_of_year(self.month, self.is_leap_year()) + u16::from(self.day) - 1
    }

    /// Returns whether this date's year is a leap year.
    #[inline]
    #[must_use]
    pub const fn is_leap_year(&self) -> bool {
        utils::is_leap_year(self.year)
    }

    /// Returns the length of this date's month in days.
    #[inline]
    #[must_use]
    pub const fn length_of_month(&self) -> u8 {
        utils::days_in_month(self.year, self.month)
    }

    /// Returns the length of this date's year in days.
    #[inline]
    #[must_use]
    pub const fn length_of_year(&self) -> u16 {
        utils::days_in_year(self.year)
    }

    /// Adds years, clamping the day down to the last valid day of the
    /// resulting month.
    pub fn plus_years(&self, years: i64) -> TemporaResult<Self> {
        if years == 0 {
            return Ok(*self);
        }
        let year = Self::check_year(utils::checked_add(self.year.into(), years)?)?;
        Ok(Self::resolve_previous_valid(year, self.month, self.day))
    }

    /// Subtracts years, clamping the day like [`plus_years`](Self::plus_years).
    pub fn minus_years(&self, years: i64) -> TemporaResult<Self> {
        self.plus_years(-years)
    }

    /// Adds months, clamping the day down to the last valid day of the
    /// resulting month.
    pub fn plus_months(&self, months: i64) -> TemporaResult<Self> {
        if months == 0 {
            return Ok(*self);
        }
        let calc = utils::checked_add(self.proleptic_month(), months)?;
        let (year, month0) = calc.div_rem_euclid(&12);
        let year = Self::check_year(year)?;
        Ok(Self::resolve_previous_valid(year, month0 as u8 + 1, self.day))
    }

    /// Subtracts months, clamping the day like [`plus_months`](Self::plus_months).
    pub fn minus_months(&self, months: i64) -> TemporaResult<Self> {
        self.plus_months(-months)
    }

    /// Adds weeks.
    pub fn plus_weeks(&self, weeks: i64) -> TemporaResult<Self> {
        self.plus_days(utils::checked_mul(weeks, 7)?)
    }

    /// Subtracts weeks.
    pub fn minus_weeks(&self, weeks: i64) -> TemporaResult<Self> {
        self.plus_weeks(-weeks)
    }

    /// Adds days.
    pub fn plus_days(&self, days: i64) -> TemporaResult<Self> {
        if days == 0 {
            return Ok(*self);
        }
        // Additions landing inside the current or next month skip the
        // epoch-day round trip.
        let dom = i64::from(self.day) + days;
        if dom > 0 {
            if dom <= 28 {
                return Ok(Self::new_unchecked(self.year, self.month, dom as u8));
            }
            if dom <= 59 {
                let month_len = i64::from(self.length_of_month());
                if dom <= month_len {
                    return Ok(Self::new_unchecked(self.year, self.month, dom as u8));
                }
                if self.month < 12 {
                    return Ok(Self::new_unchecked(
                        self.year,
                        self.month + 1,
                        (dom - month_len) as u8,
                    ));
                }
                let year = Self::check_year(i64::from(self.year) + 1)?;
                return Ok(Self::new_unchecked(year, 1, (dom - month_len) as u8));
            }
        }
        let epoch_day = utils::checked_add(self.to_epoch_day(), days)?;
        Self::from_epoch_day(epoch_day)
    }

    /// Subtracts days.
    pub fn minus_days(&self, days: i64) -> TemporaResult<Self> {
        if days == i64::MIN {
            return Err(TemporaError::overflow().with_message("day negation overflowed"));
        }
        self.plus_days(-days)
    }

    /// Returns a copy with the year replaced, clamping the day down when the
    /// target year shortens February.
    pub fn with_year(&self, year: i32) -> TemporaResult<Self> {
        let year = Self::check_year(year.into())?;
        Ok(Self::resolve_previous_valid(year, self.month, self.day))
    }

    /// Returns a copy with the month replaced, clamping the day down to the
    /// target month's length.
    pub fn with_month(&self, month: u8) -> TemporaResult<Self> {
        FieldRange::new(1, 12).check(month.into(), Field::MonthOfYear)?;
        Ok(Self::resolve_previous_valid(self.year, month, self.day))
    }

    /// Returns a copy with the day of the month replaced; the day must be
    /// valid for this date's (year, month).
    pub fn with_day_of_month(&self, day: u8) -> TemporaResult<Self> {
        Self::try_new(self.year, self.month, day)
    }

    /// Returns a copy with the day of the year replaced.
    pub fn with_day_of_year(&self, day_of_year: u16) -> TemporaResult<Self> {
        Self::of_year_day(self.year, day_of_year)
    }

    /// Returns the period from this date until `end`, exclusive.
    ///
    /// The result's year, month, and day components always share one sign
    /// (or are zero), and `start.plus_period(result) == end`.
    #[must_use]
    pub fn until(&self, end: &Self) -> Period {
        let mut total_months = end.proleptic_month() - self.proleptic_month();
        let mut days = i64::from(end.day) - i64::from(self.day);
        if total_months > 0 && days < 0 {
            total_months -= 1;
            let calc = self.plus_months_unchecked(total_months);
            days = end.to_epoch_day() - calc.to_epoch_day();
        } else if total_months < 0 && days > 0 {
            total_months += 1;
            days -= i64::from(end.length_of_month());
        }
        let years = total_months / 12;
        let months = total_months % 12;
        Period::new(years as i32, months as i32, days as i32)
    }

    /// Applies a polymorphic [`TemporalAmount`]. An exact duration has no
    /// calendar meaning and is rejected.
    pub fn plus_amount(&self, amount: &TemporalAmount) -> TemporaResult<Self> {
        match amount {
            TemporalAmount::Period(period) => period.add_to(self),
            TemporalAmount::Duration(_) => Err(TemporaError::unsupported_unit()
                .with_message("an exact duration cannot be applied to a date-only value")),
        }
    }

    /// Applies a [`DateAdjuster`] to this date.
    pub fn with_adjuster(&self, adjuster: DateAdjuster) -> TemporaResult<Self> {
        match adjuster {
            DateAdjuster::FirstDayOfMonth => Ok(Self::new_unchecked(self.year, self.month, 1)),
            DateAdjuster::LastDayOfMonth => Ok(Self::new_unchecked(
                self.year,
                self.month,
                self.length_of_month(),
            )),
            DateAdjuster::FirstDayOfNextMonth => {
                Self::new_unchecked(self.year, self.month, 1).plus_months(1)
            }
            DateAdjuster::FirstDayOfYear => Ok(Self::new_unchecked(self.year, 1, 1)),
            DateAdjuster::LastDayOfYear => Ok(Self::new_unchecked(self.year, 12, 31)),
            DateAdjuster::FirstDayOfNextYear => {
                let year = Self::check_year(i64::from(self.year) + 1)?;
                Ok(Self::new_unchecked(year, 1, 1))
            }
            DateAdjuster::Next(dow) => {
                let mut diff = (i64::from(dow.number()) - i64::from(self.day_of_week().number()))
                    .rem_euclid(7);
                if diff == 0 {
                    diff = 7;
                }
                self.plus_days(diff)
            }
            DateAdjuster::NextOrSame(dow) => {
                let diff = (i64::from(dow.number()) - i64::from(self.day_of_week().number()))
                    .rem_euclid(7);
                self.plus_days(diff)
            }
            DateAdjuster::Previous(dow) => {
                let mut diff = (i64::from(self.day_of_week().number()) - i64::from(dow.number()))
                    .rem_euclid(7);
                if diff == 0 {
                    diff = 7;
                }
                self.minus_days(diff)
            }
            DateAdjuster::PreviousOrSame(dow) => {
                let diff = (i64::from(self.day_of_week().number()) - i64::from(dow.number()))
                    .rem_euclid(7);
                self.minus_days(diff)
            }
            DateAdjuster::Custom(f) => f(*self),
        }
    }

    /// Returns an iterator over the dates from this date (inclusive) until
    /// `end` (exclusive), stepping one day at a time.
    pub fn dates_until(&self, end: &Self) -> TemporaResult<DatesUntil> {
        if end < self {
            return Err(TemporaError::range()
                .with_message("end date must not be before the start date"));
        }
        Ok(DatesUntil {
            next: self.to_epoch_day(),
            end: end.to_epoch_day(),
        })
    }

    /// Returns whether this date is after `other`.
    #[inline]
    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        self > other
    }

    /// Returns whether this date is before `other`.
    #[inline]
    #[must_use]
    pub fn is_before(&self, other: &Self) -> bool {
        self < other
    }
}

/// A closed set of reusable date adjustments.
#[derive(Debug, Clone, Copy)]
pub enum DateAdjuster {
    /// The first day of the date's month.
    FirstDayOfMonth,
    /// The last day of the date's month.
    LastDayOfMonth,
    /// The first day of the following month.
    FirstDayOfNextMonth,
    /// The first day of the date's year.
    FirstDayOfYear,
    /// The last day of the date's year.
    LastDayOfYear,
    /// The first day of the following year.
    FirstDayOfNextYear,
    /// The next occurrence of the given day of the week, never the date
    /// itself.
    Next(DayOfWeek),
    /// The next occurrence of the given day of the week, or the date itself.
    NextOrSame(DayOfWeek),
    /// The previous occurrence of the given day of the week, never the date
    /// itself.
    Previous(DayOfWeek),
    /// The previous occurrence of the given day of the week, or the date
    /// itself.
    PreviousOrSame(DayOfWeek),
    /// A caller-supplied adjustment function.
    Custom(fn(CivilDate) -> TemporaResult<CivilDate>),
}

/// Iterator over a bounded, ascending range of dates.
#[derive(Debug, Clone)]
pub struct DatesUntil {
    next: i64,
    end: i64,
}

impl Iterator for DatesUntil {
    type Item = CivilDate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let (year, month, day) = utils::civil_from_epoch_days(self.next);
        self.next += 1;
        Some(CivilDate::new_unchecked(year, month, day))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.end - self.next).ok();
        (remaining.unwrap_or(usize::MAX), remaining)
    }
}

// ==== Trait impls ====

impl FieldAccess for CivilDate {
    fn is_supported_field(&self, field: Field) -> bool {
        field.is_date_field()
    }

    fn get(&self, field: Field) -> TemporaResult<i64> {
        match field {
            Field::DayOfWeek => Ok(self.day_of_week().number().into()),
            Field::DayOfMonth => Ok(self.day.into()),
            Field::DayOfYear => Ok(self.day_of_year().into()),
            Field::EpochDay => Ok(self.to_epoch_day()),
            Field::MonthOfYear => Ok(self.month.into()),
            Field::ProlepticMonth => Ok(self.proleptic_month()),
            Field::Year => Ok(self.year.into()),
            _ => Err(unsupported_field(field)),
        }
    }

    fn field_range(&self, field: Field) -> TemporaResult<FieldRange> {
        match field {
            Field::DayOfWeek => Ok(FieldRange::new(1, 7)),
            Field::DayOfMonth => Ok(FieldRange::new(1, self.length_of_month().into())),
            Field::DayOfYear => Ok(FieldRange::new(1, self.length_of_year().into())),
            Field::EpochDay => Ok(FieldRange::new(Self::MIN_EPOCH_DAY, Self::MAX_EPOCH_DAY)),
            Field::MonthOfYear => Ok(FieldRange::new(1, 12)),
            Field::ProlepticMonth => Ok(FieldRange::new(
                Self::MIN_YEAR as i64 * 12,
                Self::MAX_YEAR as i64 * 12 + 11,
            )),
            Field::Year => Ok(FieldRange::new(Self::MIN_YEAR.into(), Self::MAX_YEAR.into())),
            _ => Err(unsupported_field(field)),
        }
    }
}

impl UnitArithmetic for CivilDate {
    fn is_supported_unit(&self, unit: Unit) -> bool {
        unit.is_date_unit()
    }

    fn plus(&self, amount: i64, unit: Unit) -> TemporaResult<Self> {
        match unit {
            Unit::Day => self.plus_days(amount),
            Unit::Week => self.plus_weeks(amount),
            Unit::Month => self.plus_months(amount),
            Unit::Year => self.plus_years(amount),
            _ => Err(unsupported_unit(unit)),
        }
    }

    fn until_in(&self, end: &Self, unit: Unit) -> TemporaResult<i64> {
        match unit {
            Unit::Day => Ok(self.days_until(end)),
            Unit::Week => Ok(self.days_until(end) / 7),
            Unit::Month => Ok(self.months_until(end)),
            Unit::Year => Ok(self.months_until(end) / 12),
            _ => Err(unsupported_unit(unit)),
        }
    }
}

impl core::fmt::Display for CivilDate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        FormattableDate(self.year, self.month, self.day).fmt(f)
    }
}

impl FromStr for CivilDate {
    type Err = TemporaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parsers::parse_civil_date(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn construction_validates_day_against_month() {
        assert!(CivilDate::try_new(2020, 2, 29).is_ok());
        let err = CivilDate::try_new(2021, 2, 29).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDate);
        assert!(err.message().contains("February 29"));
        assert!(CivilDate::try_new(2021, 4, 31).is_err());
        assert!(CivilDate::try_new(2021, 13, 1).is_err());
        assert!(CivilDate::try_new(1_000_000_000, 1, 1).is_err());
    }

    #[test]
    fn epoch_day_bijection() {
        for (year, month, day) in [
            (1970, 1, 1),
            (1969, 12, 31),
            (2000, 2, 29),
            (-44, 3, 15),
            (999_999_999, 12, 31),
            (-999_999_999, 1, 1),
        ] {
            let date = CivilDate::try_new(year, month, day).unwrap();
            assert_eq!(CivilDate::from_epoch_day(date.to_epoch_day()).unwrap(), date);
        }
        assert!(CivilDate::from_epoch_day(CivilDate::MAX_EPOCH_DAY + 1).is_err());
        assert!(CivilDate::from_epoch_day(CivilDate::MIN_EPOCH_DAY - 1).is_err());
    }

    #[test]
    fn end_of_month_clamping() {
        let leap_day = CivilDate::try_new(2008, 2, 29).unwrap();
        assert_eq!(
            leap_day.plus_years(1).unwrap(),
            CivilDate::try_new(2009, 2, 28).unwrap()
        );
        let march_end = CivilDate::try_new(2007, 3, 31).unwrap();
        assert_eq!(
            march_end.plus_months(1).unwrap(),
            CivilDate::try_new(2007, 4, 30).unwrap()
        );
        assert_eq!(
            march_end.plus_months(-1).unwrap(),
            CivilDate::try_new(2007, 2, 28).unwrap()
        );
    }

    #[test]
    fn plus_days_fast_path_matches_epoch_fallback() {
        let dates = [
            CivilDate::try_new(2021, 1, 15).unwrap(),
            CivilDate::try_new(2021, 12, 31).unwrap(),
            CivilDate::try_new(2020, 2, 28).unwrap(),
        ];
        for date in dates {
            for days in [-400, -31, -1, 0, 1, 27, 28, 30, 58, 59, 400] {
                let fast = date.plus_days(days).unwrap();
                let slow = CivilDate::from_epoch_day(date.to_epoch_day() + days).unwrap();
                assert_eq!(fast, slow, "{date} + {days} days");
            }
        }
        // December fast path rolls into the next year.
        let dec = CivilDate::try_new(2021, 12, 30).unwrap();
        assert_eq!(
            dec.plus_days(3).unwrap(),
            CivilDate::try_new(2022, 1, 2).unwrap()
        );
    }

    #[test]
    fn of_year_day() {
        assert_eq!(
            CivilDate::of_year_day(2020, 366).unwrap(),
            CivilDate::try_new(2020, 12, 31).unwrap()
        );
        assert_eq!(
            CivilDate::of_year_day(2020, 60).unwrap(),
            CivilDate::try_new(2020, 2, 29).unwrap()
        );
        assert_eq!(
            CivilDate::of_year_day(2021, 60).unwrap(),
            CivilDate::try_new(2021, 3, 1).unwrap()
        );
        assert!(CivilDate::of_year_day(2021, 366).is_err());
        assert!(CivilDate::of_year_day(2021, 0).is_err());
    }

    #[test]
    fn day_of_week_anchors_to_epoch_thursday() {
        assert_eq!(
            CivilDate::try_new(1970, 1, 1).unwrap().day_of_week(),
            DayOfWeek::Thursday
        );
        assert_eq!(
            CivilDate::try_new(1969, 12, 31).unwrap().day_of_week(),
            DayOfWeek::Wednesday
        );
        assert_eq!(
            CivilDate::try_new(2024, 7, 4).unwrap().day_of_week(),
            DayOfWeek::Thursday
        );
    }

    #[test]
    fn until_components_share_a_sign() {
        let start = CivilDate::try_new(2007, 3, 31).unwrap();
        let end = CivilDate::try_new(2008, 5, 2).unwrap();
        assert_eq!(start.until(&end), Period::new(1, 1, 2));
        assert_eq!(end.until(&start), Period::new(-1, -1, -2));

        // An incomplete final month does not count.
        let jan_end = CivilDate::try_new(2020, 1, 31).unwrap();
        let feb_end = CivilDate::try_new(2020, 2, 28).unwrap();
        assert_eq!(jan_end.until(&feb_end), Period::new(0, 0, 28));
    }

    #[test]
    fn until_round_trips_through_plus_period() {
        let pairs = [
            ((2007, 3, 31), (2008, 5, 2)),
            ((2020, 1, 31), (2020, 2, 28)),
            ((1999, 12, 31), (2000, 3, 1)),
            ((2021, 5, 15), (2020, 3, 10)),
        ];
        for ((y1, m1, d1), (y2, m2, d2)) in pairs {
            let start = CivilDate::try_new(y1, m1, d1).unwrap();
            let end = CivilDate::try_new(y2, m2, d2).unwrap();
            let period = start.until(&end);
            assert_eq!(period.add_to(&start).unwrap(), end, "{start} -> {end}");
        }
    }

    #[test]
    fn packed_month_counting() {
        let jan_31 = CivilDate::try_new(2020, 1, 31).unwrap();
        let feb_28 = CivilDate::try_new(2020, 2, 28).unwrap();
        let feb_29 = CivilDate::try_new(2020, 2, 29).unwrap();
        assert_eq!(jan_31.until_in(&feb_28, Unit::Month).unwrap(), 0);
        assert_eq!(jan_31.until_in(&feb_29, Unit::Month).unwrap(), 0);
        let jan_28 = CivilDate::try_new(2020, 1, 28).unwrap();
        assert_eq!(jan_28.until_in(&feb_28, Unit::Month).unwrap(), 1);
        assert_eq!(jan_31.until_in(&feb_28, Unit::Day).unwrap(), 28);
        assert!(jan_31.until_in(&feb_28, Unit::Hour).is_err());
    }

    #[test]
    fn with_year_and_month_clamp() {
        let leap_day = CivilDate::try_new(2020, 2, 29).unwrap();
        assert_eq!(
            leap_day.with_year(2021).unwrap(),
            CivilDate::try_new(2021, 2, 28).unwrap()
        );
        let jan_31 = CivilDate::try_new(2021, 1, 31).unwrap();
        assert_eq!(
            jan_31.with_month(4).unwrap(),
            CivilDate::try_new(2021, 4, 30).unwrap()
        );
        assert!(jan_31.with_day_of_month(32).is_err());
    }

    #[test]
    fn adjusters() {
        let date = CivilDate::try_new(2024, 7, 4).unwrap();
        assert_eq!(
            date.with_adjuster(DateAdjuster::LastDayOfMonth).unwrap(),
            CivilDate::try_new(2024, 7, 31).unwrap()
        );
        assert_eq!(
            date.with_adjuster(DateAdjuster::FirstDayOfNextMonth).unwrap(),
            CivilDate::try_new(2024, 8, 1).unwrap()
        );
        // 2024-07-04 is a Thursday.
        assert_eq!(
            date.with_adjuster(DateAdjuster::Next(DayOfWeek::Thursday)).unwrap(),
            CivilDate::try_new(2024, 7, 11).unwrap()
        );
        assert_eq!(
            date.with_adjuster(DateAdjuster::NextOrSame(DayOfWeek::Thursday)).unwrap(),
            date
        );
        assert_eq!(
            date.with_adjuster(DateAdjuster::PreviousOrSame(DayOfWeek::Monday)).unwrap(),
            CivilDate::try_new(2024, 7, 1).unwrap()
        );
        let double = |d: CivilDate| d.plus_days(2);
        assert_eq!(
            date.with_adjuster(DateAdjuster::Custom(double)).unwrap(),
            CivilDate::try_new(2024, 7, 6).unwrap()
        );
    }

    #[test]
    fn polymorphic_amounts_are_a_closed_set() {
        let date = CivilDate::try_new(2021, 1, 31).unwrap();
        assert_eq!(
            date.plus_amount(&TemporalAmount::Period(Period::of_months(1))).unwrap(),
            CivilDate::try_new(2021, 2, 28).unwrap()
        );
        let duration = crate::Duration::of_seconds(60);
        assert!(date.plus_amount(&TemporalAmount::Duration(duration)).is_err());
    }

    #[test]
    fn dates_until_streams_the_half_open_range() {
        let start = CivilDate::try_new(2021, 2, 26).unwrap();
        let end = CivilDate::try_new(2021, 3, 2).unwrap();
        let dates: alloc::vec::Vec<_> = start.dates_until(&end).unwrap().collect();
        assert_eq!(dates.len(), 4);
        assert_eq!(dates[0], start);
        assert_eq!(dates[3], CivilDate::try_new(2021, 3, 1).unwrap());
        assert!(end.dates_until(&start).is_err());
        assert_eq!(start.dates_until(&start).unwrap().count(), 0);
    }
}
