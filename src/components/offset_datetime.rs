//! This module implements `OffsetDateTime`, a date-time with a fixed
//! offset.

use core::cmp::Ordering;
use core::str::FromStr;

use crate::{
    components::{
        datetime::CivilDateTime, instant::Instant, offset::UtcOffset, period::Period,
    },
    fields::{unsupported_field, Field, FieldAccess, FieldRange},
    options::{Unit, UnitArithmetic, TemporalAmount},
    parsers, TemporaError, TemporaResult,
};

/// A local date-time paired with a fixed UTC offset.
///
/// The offset is caller-asserted and untouched by date and time arithmetic;
/// no zone-transition awareness exists at this layer. Two values with
/// different offsets can represent the same instant with different local
/// readings: [`eq`](PartialEq) requires local value *and* offset equality,
/// while [`is_eq_instant`](OffsetDateTime::is_eq_instant) compares the
/// instant alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OffsetDateTime {
    datetime: CivilDateTime,
    offset: UtcOffset,
}

impl OffsetDateTime {
    /// Composes an `OffsetDateTime` from its parts.
    #[inline]
    #[must_use]
    pub const fn new(datetime: CivilDateTime, offset: UtcOffset) -> Self {
        Self { datetime, offset }
    }

    /// Converts an instant to the date-time it reads as at the given
    /// offset.
    pub fn of_instant(instant: &Instant, offset: UtcOffset) -> TemporaResult<Self> {
        let datetime = CivilDateTime::of_epoch_second(
            instant.epoch_second(),
            instant.nanosecond(),
            offset,
        )?;
        Ok(Self::new(datetime, offset))
    }

    /// Returns the local date-time part.
    #[inline]
    #[must_use]
    pub const fn datetime(&self) -> CivilDateTime {
        self.datetime
    }

    /// Returns the offset.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> UtcOffset {
        self.offset
    }

    /// Returns the epoch second this value represents.
    #[inline]
    #[must_use]
    pub fn to_epoch_second(&self) -> i64 {
        self.datetime.to_epoch_second(self.offset)
    }

    /// Converts to the represented [`Instant`].
    pub fn to_instant(&self) -> TemporaResult<Instant> {
        Instant::try_new(self.to_epoch_second(), self.datetime.time().nanosecond())
    }

    /// Returns a copy with the given offset and the local fields unchanged;
    /// the represented instant moves.
    #[inline]
    #[must_use]
    pub const fn with_offset_same_local(&self, offset: UtcOffset) -> Self {
        Self::new(self.datetime, offset)
    }

    /// Returns a copy with the given offset and the local fields shifted by
    /// the offset delta, so the represented instant is unchanged.
    pub fn with_offset_same_instant(&self, offset: UtcOffset) -> TemporaResult<Self> {
        if offset == self.offset {
            return Ok(*self);
        }
        let difference = i64::from(offset.seconds()) - i64::from(self.offset.seconds());
        Ok(Self::new(self.datetime.plus_seconds(difference)?, offset))
    }

    /// Returns a copy with the local date-time replaced; the offset is
    /// untouched.
    #[inline]
    #[must_use]
    pub const fn with_datetime(&self, datetime: CivilDateTime) -> Self {
        Self::new(datetime, self.offset)
    }

    /// Adds years; offset untouched, day clamped like
    /// [`CivilDate::plus_years`](crate::CivilDate::plus_years).
    pub fn plus_years(&self, years: i64) -> TemporaResult<Self> {
        Ok(self.with_datetime(self.datetime.plus_years(years)?))
    }

    /// Adds months; offset untouched.
    pub fn plus_months(&self, months: i64) -> TemporaResult<Self> {
        Ok(self.with_datetime(self.datetime.plus_months(months)?))
    }

    /// Adds weeks; offset untouched.
    pub fn plus_weeks(&self, weeks: i64) -> TemporaResult<Self> {
        Ok(self.with_datetime(self.datetime.plus_weeks(weeks)?))
    }

    /// Adds days; offset untouched.
    pub fn plus_days(&self, days: i64) -> TemporaResult<Self> {
        Ok(self.with_datetime(self.datetime.plus_days(days)?))
    }

    /// Adds hours; offset untouched.
    pub fn plus_hours(&self, hours: i64) -> TemporaResult<Self> {
        Ok(self.with_datetime(self.datetime.plus_hours(hours)?))
    }

    /// Adds minutes; offset untouched.
    pub fn plus_minutes(&self, minutes: i64) -> TemporaResult<Self> {
        Ok(self.with_datetime(self.datetime.plus_minutes(minutes)?))
    }

    /// Adds seconds; offset untouched.
    pub fn plus_seconds(&self, seconds: i64) -> TemporaResult<Self> {
        Ok(self.with_datetime(self.datetime.plus_seconds(seconds)?))
    }

    /// Adds nanoseconds; offset untouched.
    pub fn plus_nanos(&self, nanos: i64) -> TemporaResult<Self> {
        Ok(self.with_datetime(self.datetime.plus_nanos(nanos)?))
    }

    /// Applies a [`Period`], affecting only the date part.
    pub fn plus_period(&self, period: &Period) -> TemporaResult<Self> {
        Ok(self.with_datetime(self.datetime.plus_period(period)?))
    }

    /// Subtracts a [`Period`], affecting only the date part.
    pub fn minus_period(&self, period: &Period) -> TemporaResult<Self> {
        Ok(self.with_datetime(self.datetime.minus_period(period)?))
    }

    /// Applies a polymorphic [`TemporalAmount`].
    pub fn plus_amount(&self, amount: &TemporalAmount) -> TemporaResult<Self> {
        match amount {
            TemporalAmount::Period(period) => self.plus_period(period),
            TemporalAmount::Duration(duration) => Ok(self.with_datetime(
                self.datetime
                    .plus_seconds(duration.seconds())?
                    .plus_nanos(duration.subsec_nanos().into())?,
            )),
        }
    }

    /// Returns whether both values represent the same instant, ignoring
    /// their local readings and offsets.
    #[inline]
    #[must_use]
    pub fn is_eq_instant(&self, other: &Self) -> bool {
        self.to_epoch_second() == other.to_epoch_second()
            && self.datetime.time().nanosecond() == other.datetime.time().nanosecond()
    }

    /// Returns whether this value's instant is after `other`'s.
    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        let cmp = self.to_epoch_second().cmp(&other.to_epoch_second());
        cmp == Ordering::Greater
            || (cmp == Ordering::Equal
                && self.datetime.time().nanosecond() > other.datetime.time().nanosecond())
    }

    /// Returns whether this value's instant is before `other`'s.
    #[must_use]
    pub fn is_before(&self, other: &Self) -> bool {
        let cmp = self.to_epoch_second().cmp(&other.to_epoch_second());
        cmp == Ordering::Less
            || (cmp == Ordering::Equal
                && self.datetime.time().nanosecond() < other.datetime.time().nanosecond())
    }
}

// ==== Trait impls ====

impl Ord for OffsetDateTime {
    fn cmp(&self, other: &Self) -> Ordering {
        // Instant first; the local value breaks ties so values that differ
        // only in offset still sort deterministically and consistently with
        // `eq`.
        self.to_epoch_second()
            .cmp(&other.to_epoch_second())
            .then_with(|| {
                self.datetime
                    .time()
                    .nanosecond()
                    .cmp(&other.datetime.time().nanosecond())
            })
            .then_with(|| self.datetime.cmp(&other.datetime))
    }
}

impl PartialOrd for OffsetDateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FieldAccess for OffsetDateTime {
    fn is_supported_field(&self, field: Field) -> bool {
        field.is_date_field()
            || field.is_time_field()
            || matches!(field, Field::OffsetSeconds | Field::InstantSeconds)
    }

    fn get(&self, field: Field) -> TemporaResult<i64> {
        match field {
            Field::OffsetSeconds => Ok(self.offset.seconds().into()),
            Field::InstantSeconds => Ok(self.to_epoch_second()),
            f if f.is_date_field() || f.is_time_field() => self.datetime.get(f),
            _ => Err(unsupported_field(field)),
        }
    }

    fn field_range(&self, field: Field) -> TemporaResult<FieldRange> {
        match field {
            Field::OffsetSeconds => Ok(FieldRange::new(
                UtcOffset::MIN.seconds().into(),
                UtcOffset::MAX.seconds().into(),
            )),
            Field::InstantSeconds => Ok(FieldRange::new(
                CivilDateTime::MIN.to_epoch_second(UtcOffset::MAX),
                CivilDateTime::MAX.to_epoch_second(UtcOffset::MIN),
            )),
            f if f.is_date_field() || f.is_time_field() => self.datetime.field_range(f),
            _ => Err(unsupported_field(field)),
        }
    }
}

impl UnitArithmetic for OffsetDateTime {
    fn is_supported_unit(&self, unit: Unit) -> bool {
        unit.is_date_unit() || unit.is_time_unit()
    }

    fn plus(&self, amount: i64, unit: Unit) -> TemporaResult<Self> {
        Ok(self.with_datetime(self.datetime.plus(amount, unit)?))
    }

    fn until_in(&self, end: &Self, unit: Unit) -> TemporaResult<i64> {
        // Normalize the end onto this value's offset so the local-field
        // difference measures the instant-line gap.
        let end = end.with_offset_same_instant(self.offset)?;
        self.datetime.until_in(&end.datetime, unit)
    }
}

impl core::fmt::Display for OffsetDateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}{}", self.datetime, self.offset)
    }
}

impl FromStr for OffsetDateTime {
    type Err = TemporaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parsers::parse_offset_date_time(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CivilDate, TimeOfDay};
    use alloc::string::ToString;

    fn odt(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        offset_hours: i8,
    ) -> OffsetDateTime {
        OffsetDateTime::new(
            CivilDateTime::new(
                CivilDate::try_new(year, month, day).unwrap(),
                TimeOfDay::try_new(hour, minute, 0, 0).unwrap(),
            ),
            UtcOffset::from_hms(offset_hours, 0, 0).unwrap(),
        )
    }

    #[test]
    fn equality_vs_instant_equality() {
        let a = odt(2008, 12, 3, 11, 30, 1);
        let b = odt(2008, 12, 3, 12, 30, 2);
        assert!(a.is_eq_instant(&b));
        assert_ne!(a, b);
        assert!(!a.is_before(&b));
        assert!(!a.is_after(&b));
    }

    #[test]
    fn compare_breaks_instant_ties_by_local_value() {
        let a = odt(2008, 12, 3, 11, 30, 1);
        let b = odt(2008, 12, 3, 12, 30, 2);
        // Same instant, different local readings: ordering is deterministic
        // and agrees with neither being `eq` to the other.
        assert_eq!(a.cmp(&b), Ordering::Less);
        assert_eq!(b.cmp(&a), Ordering::Greater);
        let earlier_instant = odt(2008, 12, 3, 11, 0, 1);
        assert!(earlier_instant < a);
    }

    #[test]
    fn offset_swaps() {
        let base = odt(2008, 12, 3, 11, 30, 1);
        let plus_two = UtcOffset::from_hms(2, 0, 0).unwrap();

        let same_local = base.with_offset_same_local(plus_two);
        assert_eq!(same_local.datetime(), base.datetime());
        assert_ne!(same_local.to_epoch_second(), base.to_epoch_second());

        let same_instant = base.with_offset_same_instant(plus_two).unwrap();
        assert_eq!(same_instant.to_epoch_second(), base.to_epoch_second());
        assert_eq!(same_instant.datetime().time().hour(), 12);
    }

    #[test]
    fn arithmetic_leaves_offset_alone() {
        let base = odt(2008, 12, 31, 23, 30, -5);
        let bumped = base.plus_hours(1).unwrap();
        assert_eq!(bumped.offset(), base.offset());
        assert_eq!(bumped.datetime().date(), CivilDate::try_new(2009, 1, 1).unwrap());
        let shifted = base.plus_period(&Period::new(0, 1, 1)).unwrap();
        assert_eq!(shifted.datetime().time(), base.datetime().time());
    }

    #[test]
    fn until_measures_the_instant_line() {
        let start = odt(2021, 6, 1, 12, 0, 0);
        let end = odt(2021, 6, 1, 15, 0, 2);
        // 15:00+02:00 is 13:00Z, two hours after 12:00Z.
        assert_eq!(start.until_in(&end, Unit::Hour).unwrap(), 2);
        assert_eq!(end.until_in(&start, Unit::Hour).unwrap(), -2);
    }

    #[test]
    fn instant_round_trip() {
        let base = odt(1969, 7, 20, 20, 17, 0);
        let instant = base.to_instant().unwrap();
        assert_eq!(
            OffsetDateTime::of_instant(&instant, base.offset()).unwrap(),
            base
        );
    }

    #[test]
    fn display_round_trip() {
        let base = odt(2008, 12, 3, 11, 30, 1);
        assert_eq!(base.to_string(), "2008-12-03T11:30:00+01:00");
        assert_eq!(
            "2008-12-03T11:30:00+01:00".parse::<OffsetDateTime>().unwrap(),
            base
        );
    }
}
