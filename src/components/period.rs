//! This module implements `Period`, the human-facing calendar amount.

use core::str::FromStr;

use ixdtf::parsers::IsoDurationParser;

use crate::{
    components::date::CivilDate,
    parsers::FormattablePeriod,
    TemporaError, TemporaResult,
};

/// A signed calendar amount of years, months, and days.
///
/// A `Period` is not reducible to a fixed count of seconds: "one month" is
/// however long the month it lands on is. Components are independently
/// signed and never normalized on construction — `15 months` and `1 year 3
/// months` are distinct, non-equal values. Only
/// [`normalized`](Period::normalized) reduces months into years.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    years: i32,
    months: i32,
    days: i32,
}

impl Period {
    /// The zero-length period.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Creates a period from its components, without normalization.
    #[inline]
    #[must_use]
    pub const fn new(years: i32, months: i32, days: i32) -> Self {
        Self {
            years,
            months,
            days,
        }
    }

    /// Creates a period of whole years.
    #[inline]
    #[must_use]
    pub const fn of_years(years: i32) -> Self {
        Self::new(years, 0, 0)
    }

    /// Creates a period of whole months.
    #[inline]
    #[must_use]
    pub const fn of_months(months: i32) -> Self {
        Self::new(0, months, 0)
    }

    /// Creates a period of whole weeks, stored as `7 * weeks` days.
    pub fn of_weeks(weeks: i32) -> TemporaResult<Self> {
        let days = weeks
            .checked_mul(7)
            .ok_or_else(|| TemporaError::overflow().with_message("weeks overflowed"))?;
        Ok(Self::new(0, 0, days))
    }

    /// Creates a period of whole days.
    #[inline]
    #[must_use]
    pub const fn of_days(days: i32) -> Self {
        Self::new(0, 0, days)
    }

    /// Returns the period from `start` until `end`, exclusive.
    #[inline]
    #[must_use]
    pub fn between(start: &CivilDate, end: &CivilDate) -> Self {
        start.until(end)
    }

    /// Returns the years component.
    #[inline]
    #[must_use]
    pub const fn years(&self) -> i32 {
        self.years
    }

    /// Returns the months component.
    #[inline]
    #[must_use]
    pub const fn months(&self) -> i32 {
        self.months
    }

    /// Returns the days component.
    #[inline]
    #[must_use]
    pub const fn days(&self) -> i32 {
        self.days
    }

    /// Returns whether every component is zero.
    #[inline]
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.years == 0 && self.months == 0 && self.days == 0
    }

    /// Returns whether any component is negative.
    #[inline]
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.years < 0 || self.months < 0 || self.days < 0
    }

    /// Returns a copy with the years component replaced.
    #[inline]
    #[must_use]
    pub const fn with_years(&self, years: i32) -> Self {
        Self::new(years, self.months, self.days)
    }

    /// Returns a copy with the months component replaced.
    #[inline]
    #[must_use]
    pub const fn with_months(&self, months: i32) -> Self {
        Self::new(self.years, months, self.days)
    }

    /// Returns a copy with the days component replaced.
    #[inline]
    #[must_use]
    pub const fn with_days(&self, days: i32) -> Self {
        Self::new(self.years, self.months, days)
    }

    /// Adds another period component-wise.
    pub fn plus(&self, other: &Self) -> TemporaResult<Self> {
        Ok(Self::new(
            checked_component(i64::from(self.years) + i64::from(other.years))?,
            checked_component(i64::from(self.months) + i64::from(other.months))?,
            checked_component(i64::from(self.days) + i64::from(other.days))?,
        ))
    }

    /// Subtracts another period component-wise.
    pub fn minus(&self, other: &Self) -> TemporaResult<Self> {
        self.plus(&other.negated()?)
    }

    /// Returns this period with every component's sign flipped.
    pub fn negated(&self) -> TemporaResult<Self> {
        Ok(Self::new(
            checked_component(-i64::from(self.years))?,
            checked_component(-i64::from(self.months))?,
            checked_component(-i64::from(self.days))?,
        ))
    }

    /// Multiplies every component by a scalar.
    pub fn multiplied_by(&self, scalar: i32) -> TemporaResult<Self> {
        Ok(Self::new(
            checked_component(i64::from(self.years) * i64::from(scalar))?,
            checked_component(i64::from(self.months) * i64::from(scalar))?,
            checked_component(i64::from(self.days) * i64::from(scalar))?,
        ))
    }

    /// Returns the years and months components as a total month count.
    #[inline]
    #[must_use]
    pub const fn to_total_months(&self) -> i64 {
        self.years as i64 * 12 + self.months as i64
    }

    /// Splits the total months into years and months whose signs stay
    /// consistent with the total, leaving days untouched.
    ///
    /// The split truncates toward zero, so `1 year -25 months` normalizes to
    /// `-1 year -1 month`, not `-2 years 11 months`.
    pub fn normalized(&self) -> TemporaResult<Self> {
        let total_months = self.to_total_months();
        let years = checked_component(total_months / 12)?;
        let months = (total_months % 12) as i32;
        if i64::from(years) * 12 + i64::from(months) != total_months {
            return Err(TemporaError::overflow().with_message("period normalization overflowed"));
        }
        Ok(Self::new(years, months, self.days))
    }

    /// Adds this period to a date.
    ///
    /// When months are present the years fold into a single month addition,
    /// so end-of-month clamping happens exactly once; days are applied as a
    /// separate final step.
    pub fn add_to(&self, date: &CivilDate) -> TemporaResult<CivilDate> {
        let mut date = *date;
        if self.months == 0 {
            if self.years != 0 {
                date = date.plus_years(self.years.into())?;
            }
        } else {
            date = date.plus_months(self.to_total_months())?;
        }
        if self.days != 0 {
            date = date.plus_days(self.days.into())?;
        }
        Ok(date)
    }

    /// Subtracts this period from a date.
    pub fn subtract_from(&self, date: &CivilDate) -> TemporaResult<CivilDate> {
        self.negated()?.add_to(date)
    }
}

fn checked_component(value: i64) -> TemporaResult<i32> {
    i32::try_from(value)
        .map_err(|_| TemporaError::overflow().with_message("period component overflowed"))
}

// ==== Trait impls ====

impl core::fmt::Display for Period {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        FormattablePeriod {
            years: self.years,
            months: self.months,
            days: self.days,
        }
        .fmt(f)
    }
}

impl FromStr for Period {
    type Err = TemporaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let record = IsoDurationParser::from_str(s)
            .parse()
            .map_err(|err| {
                TemporaError::parse().with_message(alloc::format!("invalid period text: {err}"))
            })?;

        if record.time.is_some() {
            return Err(TemporaError::parse()
                .with_message("a period accepts only year, month, week, and day designators"));
        }

        let (years, months, weeks, days) = match record.date {
            Some(date) => (date.years, date.months, date.weeks, date.days),
            None => (0, 0, 0, 0),
        };

        // Weeks multiply into days at parse time; the sign prefix negates
        // every component.
        let sign = i64::from(record.sign as i8);
        let years = checked_component(i64::from(years) * sign)?;
        let months = checked_component(i64::from(months) * sign)?;
        let days = i64::try_from(days)
            .ok()
            .and_then(|days| days.checked_add(i64::from(weeks) * 7))
            .ok_or_else(|| TemporaError::overflow().with_message("period days overflowed"))?;
        let days = checked_component(days * sign)?;

        Ok(Self::new(years, months, days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn construction_does_not_normalize() {
        let fifteen_months = Period::of_months(15);
        let year_and_quarter = Period::new(1, 3, 0);
        assert_ne!(fifteen_months, year_and_quarter);
        assert_eq!(fifteen_months.normalized().unwrap(), year_and_quarter);
    }

    #[test]
    fn normalization_truncates_toward_zero() {
        let mixed = Period::new(1, -25, 0);
        assert_eq!(mixed.normalized().unwrap(), Period::new(-1, -1, 0));
        assert_eq!(Period::new(-1, 14, 3).normalized().unwrap(), Period::new(0, 2, 3));
    }

    #[test]
    fn add_to_folds_years_into_months() {
        // Years and months apply as one month addition, so the clamp to the
        // end of February happens once.
        let period = Period::new(1, 1, 0);
        let start = CivilDate::try_new(2019, 1, 31).unwrap();
        assert_eq!(
            period.add_to(&start).unwrap(),
            CivilDate::try_new(2020, 2, 29).unwrap()
        );

        let with_days = Period::new(0, 1, 2);
        assert_eq!(
            with_days.add_to(&start).unwrap(),
            CivilDate::try_new(2019, 3, 2).unwrap()
        );
    }

    #[test]
    fn subtract_from_negates_every_component() {
        let period = Period::new(1, 2, 3);
        let date = CivilDate::try_new(2020, 6, 15).unwrap();
        assert_eq!(
            period.subtract_from(&date).unwrap(),
            CivilDate::try_new(2019, 4, 12).unwrap()
        );
    }

    #[test]
    fn component_arithmetic_is_checked() {
        let period = Period::new(i32::MAX, 0, 0);
        assert!(period.plus(&Period::of_years(1)).is_err());
        assert!(Period::new(i32::MIN, 0, 0).negated().is_err());
        assert_eq!(
            Period::new(1, 2, 3).multiplied_by(-2).unwrap(),
            Period::new(-2, -4, -6)
        );
    }

    #[test]
    fn text_round_trip() {
        assert_eq!(Period::ZERO.to_string(), "P0D");
        assert_eq!(Period::new(1, 2, 3).to_string(), "P1Y2M3D");
        assert_eq!(Period::new(0, -15, 4).to_string(), "P-15M4D");

        assert_eq!("P1Y2M3D".parse::<Period>().unwrap(), Period::new(1, 2, 3));
        assert_eq!("P2W".parse::<Period>().unwrap(), Period::of_days(14));
        assert_eq!("P1W2D".parse::<Period>().unwrap(), Period::of_days(9));
        assert_eq!("-P1Y2M3D".parse::<Period>().unwrap(), Period::new(-1, -2, -3));
        assert_eq!("P0D".parse::<Period>().unwrap(), Period::ZERO);
        assert!("PT1H".parse::<Period>().is_err());
        assert!("P".parse::<Period>().is_err());
        assert!("1Y".parse::<Period>().is_err());
    }

    #[test]
    fn between_matches_until() {
        let start = CivilDate::try_new(2007, 3, 31).unwrap();
        let end = CivilDate::try_new(2008, 5, 2).unwrap();
        assert_eq!(Period::between(&start, &end), start.until(&end));
    }
}
