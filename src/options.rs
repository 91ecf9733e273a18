//! Units, unit arithmetic, and polymorphic amounts.

use core::fmt;
use core::str::FromStr;

use crate::{Duration, Period, TemporaError, TemporaResult, NS_PER_DAY};

/// The unit of a single arithmetic or difference operation.
///
/// Variants are ordered from smallest to largest, so `max` picks the coarser
/// of two units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Unit {
    /// The `Nanosecond` unit
    Nanosecond,
    /// The `Microsecond` unit
    Microsecond,
    /// The `Millisecond` unit
    Millisecond,
    /// The `Second` unit
    Second,
    /// The `Minute` unit
    Minute,
    /// The `Hour` unit
    Hour,
    /// The `Day` unit
    Day,
    /// The `Week` unit
    Week,
    /// The `Month` unit
    Month,
    /// The `Year` unit
    Year,
}

impl Unit {
    /// Returns the fixed nanosecond length of this unit, if it has one.
    ///
    /// Weeks, months, and years have no fixed length on the instant
    /// time-line and return `None`. A day is the idealized 86,400-second
    /// day.
    #[must_use]
    pub fn as_nanoseconds(&self) -> Option<u64> {
        match self {
            Self::Year | Self::Month | Self::Week => None,
            Self::Day => Some(NS_PER_DAY),
            Self::Hour => Some(3_600_000_000_000),
            Self::Minute => Some(60_000_000_000),
            Self::Second => Some(1_000_000_000),
            Self::Millisecond => Some(1_000_000),
            Self::Microsecond => Some(1_000),
            Self::Nanosecond => Some(1),
        }
    }

    /// Returns whether this unit moves along the local time-line.
    ///
    /// Date-based units always advance the civil calendar by whole fields; a
    /// civil day is "one day" regardless of its elapsed duration.
    #[inline]
    #[must_use]
    pub fn is_date_unit(&self) -> bool {
        matches!(self, Self::Day | Self::Week | Self::Month | Self::Year)
    }

    /// Returns whether this unit moves along the instant time-line.
    #[inline]
    #[must_use]
    pub fn is_time_unit(&self) -> bool {
        matches!(
            self,
            Self::Hour
                | Self::Minute
                | Self::Second
                | Self::Millisecond
                | Self::Microsecond
                | Self::Nanosecond
        )
    }
}

/// A parsing error for `Unit`.
#[derive(Debug, Clone, Copy)]
pub struct ParseUnitError;

impl fmt::Display for ParseUnitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("provided string was not a valid Unit")
    }
}

impl FromStr for Unit {
    type Err = ParseUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "year" | "years" => Ok(Self::Year),
            "month" | "months" => Ok(Self::Month),
            "week" | "weeks" => Ok(Self::Week),
            "day" | "days" => Ok(Self::Day),
            "hour" | "hours" => Ok(Self::Hour),
            "minute" | "minutes" => Ok(Self::Minute),
            "second" | "seconds" => Ok(Self::Second),
            "millisecond" | "milliseconds" => Ok(Self::Millisecond),
            "microsecond" | "microseconds" => Ok(Self::Microsecond),
            "nanosecond" | "nanoseconds" => Ok(Self::Nanosecond),
            _ => Err(ParseUnitError),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Week => "week",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
            Self::Millisecond => "millisecond",
            Self::Microsecond => "microsecond",
            Self::Nanosecond => "nanosecond",
        }
        .fmt(f)
    }
}

pub(crate) fn unsupported_unit(unit: Unit) -> TemporaError {
    TemporaError::unsupported_unit()
        .with_message(alloc::format!("unit {unit} is not supported by this type"))
}

/// Unit-based arithmetic over the enumerated [`Unit`] set.
pub trait UnitArithmetic: Sized {
    /// Returns whether the unit is usable with this type.
    fn is_supported_unit(&self, unit: Unit) -> bool;

    /// Adds `amount` of `unit`, failing with `UnsupportedUnit` for units the
    /// type does not carry and `Overflow` when the computation leaves the
    /// representable range.
    fn plus(&self, amount: i64, unit: Unit) -> TemporaResult<Self>;

    /// Subtracts `amount` of `unit`.
    fn minus(&self, amount: i64, unit: Unit) -> TemporaResult<Self> {
        let negated = amount
            .checked_neg()
            .ok_or_else(|| TemporaError::overflow().with_message("amount negation overflowed"))?;
        self.plus(negated, unit)
    }

    /// Counts whole `unit`s from `self` until `end`; start inclusive, end
    /// exclusive.
    fn until_in(&self, end: &Self, unit: Unit) -> TemporaResult<i64>;
}

/// A polymorphic amount of time, dispatched by pattern match.
///
/// The closed variant set keeps cross-type interactions explicit: each
/// consuming type enumerates which variants it accepts and rejects the rest
/// with an `UnsupportedUnit` error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalAmount {
    /// A calendar amount of years, months, and days.
    Period(Period),
    /// An exact amount of elapsed seconds and nanoseconds.
    Duration(Duration),
}

impl From<Period> for TemporalAmount {
    fn from(value: Period) -> Self {
        Self::Period(value)
    }
}

impl From<Duration> for TemporalAmount {
    fn from(value: Duration) -> Self {
        Self::Duration(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_ordering() {
        assert!(Unit::Year > Unit::Month);
        assert!(Unit::Day > Unit::Hour);
        assert_eq!(Unit::Minute.max(Unit::Hour), Unit::Hour);
    }

    #[test]
    fn unit_classification() {
        assert!(Unit::Day.is_date_unit());
        assert!(!Unit::Day.is_time_unit());
        assert!(Unit::Hour.is_time_unit());
        assert_eq!(Unit::Day.as_nanoseconds(), Some(NS_PER_DAY));
        assert_eq!(Unit::Month.as_nanoseconds(), None);
    }

    #[test]
    fn unit_from_str() {
        assert_eq!("hours".parse::<Unit>().ok(), Some(Unit::Hour));
        assert!("fortnight".parse::<Unit>().is_err());
    }
}
