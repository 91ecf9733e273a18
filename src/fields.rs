//! Field identifiers and generic field access.
//!
//! Any value exposing a given [`Field`] can be queried generically through
//! [`FieldAccess`]; each concrete type enumerates the fields it supports and
//! rejects the rest with an `UnsupportedField` error.

use core::fmt;

use crate::{TemporaError, TemporaResult};

/// An enumerated date, time, offset, or instant field.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    /// The nanosecond within the second, 0–999,999,999.
    NanoOfSecond,
    /// The nanosecond within the day, 0–86,399,999,999,999.
    NanoOfDay,
    /// The microsecond within the second, 0–999,999.
    MicroOfSecond,
    /// The millisecond within the second, 0–999.
    MilliOfSecond,
    /// The second within the minute, 0–59.
    SecondOfMinute,
    /// The second within the day, 0–86,399.
    SecondOfDay,
    /// The minute within the hour, 0–59.
    MinuteOfHour,
    /// The minute within the day, 0–1,439.
    MinuteOfDay,
    /// The hour within the day, 0–23.
    HourOfDay,
    /// The day of the week, 1 (Monday) – 7 (Sunday).
    DayOfWeek,
    /// The day within the month, 1–31.
    DayOfMonth,
    /// The day within the year, 1–366.
    DayOfYear,
    /// The signed day count from 1970-01-01.
    EpochDay,
    /// The month within the year, 1–12.
    MonthOfYear,
    /// The sequential month count from year zero, `year * 12 + month - 1`.
    ProlepticMonth,
    /// The proleptic year.
    Year,
    /// The total offset from UTC in seconds.
    OffsetSeconds,
    /// The signed second count from 1970-01-01T00:00:00Z.
    InstantSeconds,
}

impl Field {
    /// Returns whether this field derives from the calendar date.
    #[inline]
    #[must_use]
    pub fn is_date_field(&self) -> bool {
        matches!(
            self,
            Self::DayOfWeek
                | Self::DayOfMonth
                | Self::DayOfYear
                | Self::EpochDay
                | Self::MonthOfYear
                | Self::ProlepticMonth
                | Self::Year
        )
    }

    /// Returns whether this field derives from the time of day.
    #[inline]
    #[must_use]
    pub fn is_time_field(&self) -> bool {
        matches!(
            self,
            Self::NanoOfSecond
                | Self::NanoOfDay
                | Self::MicroOfSecond
                | Self::MilliOfSecond
                | Self::SecondOfMinute
                | Self::SecondOfDay
                | Self::MinuteOfHour
                | Self::MinuteOfDay
                | Self::HourOfDay
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NanoOfSecond => "nanoOfSecond",
            Self::NanoOfDay => "nanoOfDay",
            Self::MicroOfSecond => "microOfSecond",
            Self::MilliOfSecond => "milliOfSecond",
            Self::SecondOfMinute => "secondOfMinute",
            Self::SecondOfDay => "secondOfDay",
            Self::MinuteOfHour => "minuteOfHour",
            Self::MinuteOfDay => "minuteOfDay",
            Self::HourOfDay => "hourOfDay",
            Self::DayOfWeek => "dayOfWeek",
            Self::DayOfMonth => "dayOfMonth",
            Self::DayOfYear => "dayOfYear",
            Self::EpochDay => "epochDay",
            Self::MonthOfYear => "monthOfYear",
            Self::ProlepticMonth => "prolepticMonth",
            Self::Year => "year",
            Self::OffsetSeconds => "offsetSeconds",
            Self::InstantSeconds => "instantSeconds",
        })
    }
}

/// The inclusive value range of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRange {
    min: i64,
    max: i64,
}

impl FieldRange {
    /// Creates a new range. `min` must not exceed `max`.
    #[inline]
    #[must_use]
    pub(crate) const fn new(min: i64, max: i64) -> Self {
        debug_assert!(min <= max);
        Self { min, max }
    }

    /// The smallest permitted value.
    #[inline]
    #[must_use]
    pub const fn min(&self) -> i64 {
        self.min
    }

    /// The largest permitted value.
    #[inline]
    #[must_use]
    pub const fn max(&self) -> i64 {
        self.max
    }

    /// Returns whether `value` lies within this range.
    #[inline]
    #[must_use]
    pub const fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Validates `value` against this range for the named field.
    pub(crate) fn check(&self, value: i64, field: Field) -> TemporaResult<i64> {
        if !self.contains(value) {
            return Err(TemporaError::range().with_message(alloc::format!(
                "{field} value {value} is outside the range {}..={}",
                self.min,
                self.max
            )));
        }
        Ok(value)
    }
}

/// Generic field access over the enumerated [`Field`] set.
pub trait FieldAccess {
    /// Returns whether the field can be read from this value.
    fn is_supported_field(&self, field: Field) -> bool;

    /// Reads the field, failing with `UnsupportedField` when
    /// [`is_supported_field`](Self::is_supported_field) is false.
    fn get(&self, field: Field) -> TemporaResult<i64>;

    /// Returns the valid range of the field for this value.
    fn field_range(&self, field: Field) -> TemporaResult<FieldRange>;
}

pub(crate) fn unsupported_field(field: Field) -> TemporaError {
    TemporaError::unsupported_field()
        .with_message(alloc::format!("field {field} is not supported by this type"))
}
