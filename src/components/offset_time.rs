//! This module implements `OffsetTime`, a time of day with a fixed offset.

use core::cmp::Ordering;
use core::str::FromStr;

use crate::{
    components::{instant::Instant, offset::UtcOffset, time::TimeOfDay},
    fields::{unsupported_field, Field, FieldAccess, FieldRange},
    options::{Unit, UnitArithmetic},
    parsers, utils, TemporaError, TemporaResult,
};

/// A time of day paired with a fixed UTC offset.
///
/// The offset is caller-asserted: nothing ties it to a real zone. Two
/// values with different offsets can denote the same instant-like point in
/// the day; [`eq`](PartialEq) distinguishes them while
/// [`is_eq_instant`](OffsetTime::is_eq_instant) does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OffsetTime {
    time: TimeOfDay,
    offset: UtcOffset,
}

impl OffsetTime {
    /// Composes an `OffsetTime` from its parts.
    #[inline]
    #[must_use]
    pub const fn new(time: TimeOfDay, offset: UtcOffset) -> Self {
        Self { time, offset }
    }

    /// Extracts the time of day at the given offset from an instant.
    #[must_use]
    pub fn of_instant(instant: &Instant, offset: UtcOffset) -> Self {
        let local_second = (instant.epoch_second() + i64::from(offset.seconds()))
            .rem_euclid(utils::SECONDS_PER_DAY);
        let time = TimeOfDay::from_nano_of_day_unchecked(
            local_second * utils::NANOS_PER_SECOND + i64::from(instant.nanosecond()),
        );
        Self::new(time, offset)
    }

    /// Returns the time-of-day part.
    #[inline]
    #[must_use]
    pub const fn time(&self) -> TimeOfDay {
        self.time
    }

    /// Returns the offset.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> UtcOffset {
        self.offset
    }

    /// Returns a copy with the given offset and the local time unchanged;
    /// the denoted point in the day moves.
    #[inline]
    #[must_use]
    pub const fn with_offset_same_local(&self, offset: UtcOffset) -> Self {
        Self::new(self.time, offset)
    }

    /// Returns a copy with the given offset and the local time shifted so
    /// the denoted point in the day is unchanged.
    #[must_use]
    pub fn with_offset_same_instant(&self, offset: UtcOffset) -> Self {
        if offset == self.offset {
            return *self;
        }
        let difference = i64::from(offset.seconds()) - i64::from(self.offset.seconds());
        Self::new(self.time.plus_seconds(difference), offset)
    }

    /// Returns a copy with the time of day replaced.
    #[inline]
    #[must_use]
    pub const fn with_time(&self, time: TimeOfDay) -> Self {
        Self::new(time, self.offset)
    }

    /// Adds hours; the offset is untouched.
    #[must_use]
    pub fn plus_hours(&self, hours: i64) -> Self {
        self.with_time(self.time.plus_hours(hours))
    }

    /// Adds minutes; the offset is untouched.
    #[must_use]
    pub fn plus_minutes(&self, minutes: i64) -> Self {
        self.with_time(self.time.plus_minutes(minutes))
    }

    /// Adds seconds; the offset is untouched.
    #[must_use]
    pub fn plus_seconds(&self, seconds: i64) -> Self {
        self.with_time(self.time.plus_seconds(seconds))
    }

    /// Adds nanoseconds; the offset is untouched.
    #[must_use]
    pub fn plus_nanos(&self, nanos: i64) -> Self {
        self.with_time(self.time.plus_nanos(nanos))
    }

    /// The offset-adjusted nanosecond position, comparable across offsets.
    fn instant_nano(&self) -> i64 {
        self.time.nano_of_day() - i64::from(self.offset.seconds()) * utils::NANOS_PER_SECOND
    }

    /// Returns whether both values denote the same offset-adjusted point in
    /// the day, ignoring their local readings.
    #[inline]
    #[must_use]
    pub fn is_eq_instant(&self, other: &Self) -> bool {
        self.instant_nano() == other.instant_nano()
    }

    /// Returns whether this value's offset-adjusted point is after
    /// `other`'s.
    #[inline]
    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        self.instant_nano() > other.instant_nano()
    }

    /// Returns whether this value's offset-adjusted point is before
    /// `other`'s.
    #[inline]
    #[must_use]
    pub fn is_before(&self, other: &Self) -> bool {
        self.instant_nano() < other.instant_nano()
    }
}

// ==== Trait impls ====

impl Ord for OffsetTime {
    fn cmp(&self, other: &Self) -> Ordering {
        // Offset-adjusted position first; the local reading breaks ties so
        // the ordering stays consistent with `eq`.
        self.instant_nano()
            .cmp(&other.instant_nano())
            .then_with(|| self.time.cmp(&other.time))
    }
}

impl PartialOrd for OffsetTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FieldAccess for OffsetTime {
    fn is_supported_field(&self, field: Field) -> bool {
        field.is_time_field() || field == Field::OffsetSeconds
    }

    fn get(&self, field: Field) -> TemporaResult<i64> {
        match field {
            Field::OffsetSeconds => Ok(self.offset.seconds().into()),
            f if f.is_time_field() => self.time.get(f),
            _ => Err(unsupported_field(field)),
        }
    }

    fn field_range(&self, field: Field) -> TemporaResult<FieldRange> {
        match field {
            Field::OffsetSeconds => Ok(FieldRange::new(
                UtcOffset::MIN.seconds().into(),
                UtcOffset::MAX.seconds().into(),
            )),
            f if f.is_time_field() => self.time.field_range(f),
            _ => Err(unsupported_field(field)),
        }
    }
}

impl UnitArithmetic for OffsetTime {
    fn is_supported_unit(&self, unit: Unit) -> bool {
        unit.is_time_unit()
    }

    fn plus(&self, amount: i64, unit: Unit) -> TemporaResult<Self> {
        Ok(self.with_time(self.time.plus(amount, unit)?))
    }

    fn until_in(&self, end: &Self, unit: Unit) -> TemporaResult<i64> {
        let Some(unit_nanos) = unit.as_nanoseconds() else {
            return Err(crate::options::unsupported_unit(unit));
        };
        if unit.is_date_unit() {
            return Err(crate::options::unsupported_unit(unit));
        }
        let diff = end.instant_nano() - self.instant_nano();
        Ok(diff / unit_nanos as i64)
    }
}

impl core::fmt::Display for OffsetTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}{}", self.time, self.offset)
    }
}

impl FromStr for OffsetTime {
    type Err = TemporaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parsers::parse_offset_time(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn time(hour: u8, minute: u8) -> TimeOfDay {
        TimeOfDay::try_new(hour, minute, 0, 0).unwrap()
    }

    fn offset(hours: i8) -> UtcOffset {
        UtcOffset::from_hms(hours, 0, 0).unwrap()
    }

    #[test]
    fn same_local_vs_same_instant() {
        let base = OffsetTime::new(time(10, 0), offset(1));
        let same_local = base.with_offset_same_local(offset(2));
        assert_eq!(same_local.time(), time(10, 0));
        assert!(!same_local.is_eq_instant(&base));

        let same_instant = base.with_offset_same_instant(offset(2));
        assert_eq!(same_instant.time(), time(11, 0));
        assert!(same_instant.is_eq_instant(&base));
        assert_ne!(same_instant, base);
    }

    #[test]
    fn ordering_is_instant_first() {
        let earlier = OffsetTime::new(time(11, 0), offset(2));
        let later = OffsetTime::new(time(10, 30), offset(1));
        assert!(earlier < later);
        assert!(later.is_after(&earlier));

        // Equal instants order by local reading.
        let a = OffsetTime::new(time(10, 0), offset(1));
        let b = OffsetTime::new(time(11, 0), offset(2));
        assert!(a.is_eq_instant(&b));
        assert!(a < b);
    }

    #[test]
    fn of_instant_wraps_into_the_day() {
        let instant = Instant::of_epoch_second(1_800).unwrap();
        let ot = OffsetTime::of_instant(&instant, offset(-1));
        assert_eq!(ot.time(), time(23, 30));
    }

    #[test]
    fn display_round_trip() {
        let ot = OffsetTime::new(
            TimeOfDay::try_new(10, 15, 30, 0).unwrap(),
            UtcOffset::from_seconds(3_600).unwrap(),
        );
        assert_eq!(ot.to_string(), "10:15:30+01:00");
        assert_eq!("10:15:30+01:00".parse::<OffsetTime>().unwrap(), ot);
    }
}
