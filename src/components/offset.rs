//! This module implements `UtcOffset`, a fixed offset from UTC.

use core::str::FromStr;

use crate::{
    fields::{Field, FieldRange},
    parsers::{FormattableOffset, FormattableTime, Precision},
    Sign, TemporaError, TemporaResult,
};

/// A fixed offset from UTC in seconds, within ±18:00:00.
///
/// An offset asserts nothing about time-zone rules; it is a plain number the
/// caller vouches for.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcOffset(i32);

/// Largest permitted offset magnitude, 18 hours in seconds.
const MAX_OFFSET_SECONDS: i32 = 18 * 3600;

impl UtcOffset {
    /// The zero offset.
    pub const UTC: Self = Self(0);

    /// The smallest permitted offset, -18:00.
    pub const MIN: Self = Self(-MAX_OFFSET_SECONDS);

    /// The largest permitted offset, +18:00.
    pub const MAX: Self = Self(MAX_OFFSET_SECONDS);

    /// Creates an offset from a total second count.
    pub fn from_seconds(seconds: i32) -> TemporaResult<Self> {
        FieldRange::new((-MAX_OFFSET_SECONDS).into(), MAX_OFFSET_SECONDS.into())
            .check(seconds.into(), Field::OffsetSeconds)?;
        Ok(Self(seconds))
    }

    /// Creates an offset from hour, minute, and second components.
    ///
    /// Nonzero components must all share one sign, and the minute and second
    /// components must be within ±59.
    pub fn from_hms(hours: i8, minutes: i8, seconds: i8) -> TemporaResult<Self> {
        let same_sign = |a: i8, b: i8| a == 0 || b == 0 || (a < 0) == (b < 0);
        if !(same_sign(hours, minutes) && same_sign(hours, seconds) && same_sign(minutes, seconds))
        {
            return Err(TemporaError::range()
                .with_message("offset components must not mix signs"));
        }
        if !(-59..=59).contains(&minutes) || !(-59..=59).contains(&seconds) {
            return Err(TemporaError::range()
                .with_message("offset minute and second components must be within ±59"));
        }
        Self::from_seconds(
            i32::from(hours) * 3600 + i32::from(minutes) * 60 + i32::from(seconds),
        )
    }

    /// Returns the total offset in seconds.
    #[inline]
    #[must_use]
    pub const fn seconds(&self) -> i32 {
        self.0
    }

    pub(crate) fn to_formattable(self) -> FormattableOffset {
        let abs = self.0.unsigned_abs();
        let second = (abs % 60) as u8;
        FormattableOffset {
            sign: if self.0 < 0 { Sign::Negative } else { Sign::Positive },
            time: FormattableTime {
                hour: (abs / 3600) as u8,
                minute: ((abs / 60) % 60) as u8,
                second,
                nanosecond: 0,
                precision: if second == 0 { Precision::Minute } else { Precision::Digit(0) },
                include_sep: true,
            },
        }
    }
}

impl core::fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.0 == 0 {
            return f.write_str("Z");
        }
        self.to_formattable().fmt(f)
    }
}

impl FromStr for UtcOffset {
    type Err = TemporaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parsers::parse_utc_offset(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn construction_bounds() {
        assert!(UtcOffset::from_seconds(MAX_OFFSET_SECONDS).is_ok());
        assert!(UtcOffset::from_seconds(MAX_OFFSET_SECONDS + 1).is_err());
        assert!(UtcOffset::from_seconds(-MAX_OFFSET_SECONDS - 1).is_err());
        assert_eq!(UtcOffset::from_hms(-5, -30, 0).unwrap().seconds(), -19_800);
        assert!(UtcOffset::from_hms(1, -30, 0).is_err());
        assert!(UtcOffset::from_hms(0, 61, 0).is_err());
    }

    #[test]
    fn display_formats() {
        assert_eq!(UtcOffset::UTC.to_string(), "Z");
        assert_eq!(UtcOffset::from_seconds(3_600).unwrap().to_string(), "+01:00");
        assert_eq!(UtcOffset::from_seconds(-19_800).unwrap().to_string(), "-05:30");
        assert_eq!(UtcOffset::from_seconds(3_661).unwrap().to_string(), "+01:01:01");
    }

    #[test]
    fn parse_formats() {
        assert_eq!("Z".parse::<UtcOffset>().unwrap(), UtcOffset::UTC);
        assert_eq!("+01:00".parse::<UtcOffset>().unwrap().seconds(), 3_600);
        assert_eq!("-0530".parse::<UtcOffset>().unwrap().seconds(), -19_800);
        assert_eq!("+05".parse::<UtcOffset>().unwrap().seconds(), 18_000);
        assert_eq!("+01:01:01".parse::<UtcOffset>().unwrap().seconds(), 3_661);
        assert!("+19:00".parse::<UtcOffset>().is_err());
        assert!("nonsense".parse::<UtcOffset>().is_err());
    }
}
