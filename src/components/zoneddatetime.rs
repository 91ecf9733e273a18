//! This module implements `ZonedDateTime` and the local-offset resolution
//! it performs against the zone rules.

use core::cmp::Ordering;

use crate::{
    components::{
        date::CivilDate, datetime::CivilDateTime, duration::Duration, instant::Instant,
        offset::UtcOffset, offset_datetime::OffsetDateTime, period::Period, time::TimeOfDay,
        timezone::ZoneId,
    },
    fields::{unsupported_field, Field, FieldAccess, FieldRange},
    options::{unsupported_unit, TemporalAmount, Unit, UnitArithmetic},
    parsers,
    provider::{LocalOffsetInfo, ZoneRulesProvider},
    tempora_assert, TemporaError, TemporaResult,
};

/// A local date-time bound to a time zone, with the offset resolved against
/// the zone's rules.
///
/// Every construction and every local-field mutation re-resolves the
/// offset, handling the three cases a zone lookup can report:
///
/// * **unique** — one valid offset; it is used directly.
/// * **gap** — the local time never occurred (forward transition); the
///   local fields are pushed forward by the length of the gap and the
///   post-transition offset applies.
/// * **overlap** — the local time occurred twice (backward transition); a
///   preferred offset wins when it is one of the two, otherwise the earlier
///   offset is chosen.
///
/// Arithmetic is deliberately two-faced. Date-based units move along the
/// local time-line (a civil day is one day, whatever it lasted), keeping
/// the same side of any transition where possible. Time-based units move
/// along the instant time-line (an hour is 3600 elapsed seconds), letting
/// the local reading absorb the transition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZonedDateTime {
    datetime: CivilDateTime,
    offset: UtcOffset,
    zone: ZoneId,
}

// ==== Private API ====

impl ZonedDateTime {
    #[inline]
    #[must_use]
    fn new_unchecked(datetime: CivilDateTime, offset: UtcOffset, zone: ZoneId) -> Self {
        Self {
            datetime,
            offset,
            zone,
        }
    }

    /// Re-resolves after a local-field edit, preferring the current offset
    /// so date edits stay on the same side of a transition.
    fn resolve_local(
        &self,
        datetime: CivilDateTime,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        Self::of_local(datetime, self.zone.clone(), Some(self.offset), provider)
    }

    /// Re-resolves after instant-line arithmetic: the current offset is
    /// authoritative for computing the instant, then the zone's offset for
    /// that instant is re-derived.
    fn resolve_instant(
        &self,
        datetime: CivilDateTime,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        let instant = Instant::try_new(
            datetime.to_epoch_second(self.offset),
            datetime.time().nanosecond(),
        )?;
        Self::of_instant(&instant, self.zone.clone(), provider)
    }

    /// Honors a directly requested offset only when the zone's rules accept
    /// it for the current local date-time, i.e. only during an overlap.
    fn resolve_offset(
        &self,
        offset: UtcOffset,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        if offset != self.offset {
            if let LocalOffsetInfo::Overlap(transition) =
                self.zone.local_info(&self.datetime, provider)?
            {
                if offset == transition.offset_before() || offset == transition.offset_after() {
                    return Ok(Self::new_unchecked(
                        self.datetime,
                        offset,
                        self.zone.clone(),
                    ));
                }
            }
        }
        Ok(self.clone())
    }
}

// ==== Public API ====

impl ZonedDateTime {
    /// Resolves a local date-time in a zone, applying the gap and overlap
    /// rules described on the type.
    pub fn of_local(
        datetime: CivilDateTime,
        zone: ZoneId,
        preferred_offset: Option<UtcOffset>,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        match zone.local_info(&datetime, provider)? {
            LocalOffsetInfo::Unique(offset) => Ok(Self::new_unchecked(datetime, offset, zone)),
            LocalOffsetInfo::Gap(transition) => {
                tempora_assert!(transition.is_gap());
                // The requested local time never occurred; remap it forward
                // by the length of the gap.
                let shifted = datetime.plus_seconds(transition.duration().seconds())?;
                Ok(Self::new_unchecked(
                    shifted,
                    transition.offset_after(),
                    zone,
                ))
            }
            LocalOffsetInfo::Overlap(transition) => {
                let offset = match preferred_offset {
                    Some(preferred)
                        if preferred == transition.offset_before()
                            || preferred == transition.offset_after() =>
                    {
                        preferred
                    }
                    _ => transition.offset_before(),
                };
                Ok(Self::new_unchecked(datetime, offset, zone))
            }
        }
    }

    /// Builds a `ZonedDateTime` only when the supplied offset is valid for
    /// the local date-time under the zone's rules.
    ///
    /// The error distinguishes a local time that falls in a gap from an
    /// offset that is simply wrong.
    pub fn of_strict(
        datetime: CivilDateTime,
        offset: UtcOffset,
        zone: ZoneId,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        match zone.local_info(&datetime, provider)? {
            LocalOffsetInfo::Unique(valid) if valid == offset => {
                Ok(Self::new_unchecked(datetime, offset, zone))
            }
            LocalOffsetInfo::Overlap(transition)
                if offset == transition.offset_before()
                    || offset == transition.offset_after() =>
            {
                Ok(Self::new_unchecked(datetime, offset, zone))
            }
            LocalOffsetInfo::Gap(_) => Err(TemporaError::range().with_message(alloc::format!(
                "local date-time {datetime} falls in a gap in zone {zone}; it never occurred"
            ))),
            _ => Err(TemporaError::range().with_message(alloc::format!(
                "offset {offset} is not valid for {datetime} in zone {zone}"
            ))),
        }
    }

    /// Builds a `ZonedDateTime` with no validation at all.
    ///
    /// This exists solely for deserialization. The offset may be
    /// inconsistent with the zone's rules; such a value is legal and
    /// long-lived, its stored offset stays authoritative for instant
    /// conversion, and the inconsistency disappears at the first resolving
    /// operation (any `with_*` or arithmetic call).
    #[inline]
    #[must_use]
    pub fn of_lenient(datetime: CivilDateTime, offset: UtcOffset, zone: ZoneId) -> Self {
        Self::new_unchecked(datetime, offset, zone)
    }

    /// Converts an instant to the date-time it reads as in the zone.
    pub fn of_instant(
        instant: &Instant,
        zone: ZoneId,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        let offset = zone.offset_at(instant, provider)?;
        let datetime =
            CivilDateTime::of_epoch_second(instant.epoch_second(), instant.nanosecond(), offset)?;
        Ok(Self::new_unchecked(datetime, offset, zone))
    }

    /// Returns the local date-time.
    #[inline]
    #[must_use]
    pub const fn datetime(&self) -> CivilDateTime {
        self.datetime
    }

    /// Returns the local date.
    #[inline]
    #[must_use]
    pub const fn date(&self) -> CivilDate {
        self.datetime.date()
    }

    /// Returns the local time of day.
    #[inline]
    #[must_use]
    pub const fn time(&self) -> TimeOfDay {
        self.datetime.time()
    }

    /// Returns the resolved offset.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> UtcOffset {
        self.offset
    }

    /// Returns the zone identifier.
    #[inline]
    #[must_use]
    pub const fn zone(&self) -> &ZoneId {
        &self.zone
    }

    /// Returns the epoch second this value represents; the stored offset is
    /// authoritative.
    #[inline]
    #[must_use]
    pub fn to_epoch_second(&self) -> i64 {
        self.datetime.to_epoch_second(self.offset)
    }

    /// Converts to the represented [`Instant`].
    pub fn to_instant(&self) -> TemporaResult<Instant> {
        Instant::try_new(self.to_epoch_second(), self.datetime.time().nanosecond())
    }

    /// Drops the zone, keeping the local fields and resolved offset.
    #[inline]
    #[must_use]
    pub const fn to_offset_datetime(&self) -> OffsetDateTime {
        OffsetDateTime::new(self.datetime, self.offset)
    }

    /// Switches to the earlier of the two overlap offsets; a no-op when the
    /// local date-time is not in an overlap.
    pub fn with_earlier_offset_at_overlap(
        &self,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        if let LocalOffsetInfo::Overlap(transition) =
            self.zone.local_info(&self.datetime, provider)?
        {
            return Ok(Self::new_unchecked(
                self.datetime,
                transition.offset_before(),
                self.zone.clone(),
            ));
        }
        Ok(self.clone())
    }

    /// Switches to the later of the two overlap offsets; a no-op when the
    /// local date-time is not in an overlap.
    pub fn with_later_offset_at_overlap(
        &self,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        if let LocalOffsetInfo::Overlap(transition) =
            self.zone.local_info(&self.datetime, provider)?
        {
            return Ok(Self::new_unchecked(
                self.datetime,
                transition.offset_after(),
                self.zone.clone(),
            ));
        }
        Ok(self.clone())
    }

    /// Requests a specific offset for the current local date-time.
    ///
    /// The zone, not the offset, is authoritative: the request is honored
    /// only when the offset is one of the valid offsets for the local
    /// date-time, which can only happen during an overlap. In every other
    /// case the value is returned unchanged — deliberately not an error.
    pub fn with_offset(
        &self,
        offset: UtcOffset,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        self.resolve_offset(offset, provider)
    }

    /// Rebinds to another zone, keeping the represented instant.
    pub fn with_zone_same_instant(
        &self,
        zone: ZoneId,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        Self::of_instant(&self.to_instant()?, zone, provider)
    }

    /// Rebinds to another zone, keeping the local fields and re-resolving
    /// the offset.
    pub fn with_zone_same_local(
        &self,
        zone: ZoneId,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        Self::of_local(self.datetime, zone, Some(self.offset), provider)
    }

    /// Replaces the local date, re-resolving the offset.
    pub fn with_date(
        &self,
        date: CivilDate,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        self.resolve_local(self.datetime.with_date(date), provider)
    }

    /// Replaces the local time of day, re-resolving the offset.
    pub fn with_time(
        &self,
        time: TimeOfDay,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        self.resolve_local(self.datetime.with_time(time), provider)
    }

    /// Replaces the year, re-resolving the offset.
    pub fn with_year(&self, year: i32, provider: &impl ZoneRulesProvider) -> TemporaResult<Self> {
        self.resolve_local(
            self.datetime.with_date(self.date().with_year(year)?),
            provider,
        )
    }

    /// Replaces the month, re-resolving the offset.
    pub fn with_month(&self, month: u8, provider: &impl ZoneRulesProvider) -> TemporaResult<Self> {
        self.resolve_local(
            self.datetime.with_date(self.date().with_month(month)?),
            provider,
        )
    }

    /// Replaces the day of the month, re-resolving the offset.
    pub fn with_day_of_month(
        &self,
        day: u8,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        self.resolve_local(
            self.datetime.with_date(self.date().with_day_of_month(day)?),
            provider,
        )
    }

    /// Replaces the day of the year, re-resolving the offset.
    pub fn with_day_of_year(
        &self,
        day_of_year: u16,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        self.resolve_local(
            self.datetime
                .with_date(self.date().with_day_of_year(day_of_year)?),
            provider,
        )
    }

    /// Replaces the hour, re-resolving the offset.
    pub fn with_hour(&self, hour: u8, provider: &impl ZoneRulesProvider) -> TemporaResult<Self> {
        self.resolve_local(
            self.datetime.with_time(self.time().with_hour(hour)?),
            provider,
        )
    }

    /// Replaces the minute, re-resolving the offset.
    pub fn with_minute(
        &self,
        minute: u8,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        self.resolve_local(
            self.datetime.with_time(self.time().with_minute(minute)?),
            provider,
        )
    }

    /// Replaces the second, re-resolving the offset.
    pub fn with_second(
        &self,
        second: u8,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        self.resolve_local(
            self.datetime.with_time(self.time().with_second(second)?),
            provider,
        )
    }

    /// Replaces the nanosecond, re-resolving the offset.
    pub fn with_nanosecond(
        &self,
        nanosecond: u32,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        self.resolve_local(
            self.datetime
                .with_time(self.time().with_nanosecond(nanosecond)?),
            provider,
        )
    }

    /// Adds years on the local time-line.
    pub fn plus_years(&self, years: i64, provider: &impl ZoneRulesProvider) -> TemporaResult<Self> {
        self.resolve_local(self.datetime.plus_years(years)?, provider)
    }

    /// Adds months on the local time-line.
    pub fn plus_months(
        &self,
        months: i64,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        self.resolve_local(self.datetime.plus_months(months)?, provider)
    }

    /// Adds weeks on the local time-line.
    pub fn plus_weeks(&self, weeks: i64, provider: &impl ZoneRulesProvider) -> TemporaResult<Self> {
        self.resolve_local(self.datetime.plus_weeks(weeks)?, provider)
    }

    /// Adds days on the local time-line: the calendar date moves by exactly
    /// that many days and the clock reading keeps its intent, whatever the
    /// days' elapsed lengths were.
    pub fn plus_days(&self, days: i64, provider: &impl ZoneRulesProvider) -> TemporaResult<Self> {
        self.resolve_local(self.datetime.plus_days(days)?, provider)
    }

    /// Adds hours on the instant time-line: 3600 elapsed seconds each, so
    /// crossing a transition changes the local hour by something other than
    /// the amount added.
    pub fn plus_hours(&self, hours: i64, provider: &impl ZoneRulesProvider) -> TemporaResult<Self> {
        self.resolve_instant(self.datetime.plus_hours(hours)?, provider)
    }

    /// Adds minutes on the instant time-line.
    pub fn plus_minutes(
        &self,
        minutes: i64,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        self.resolve_instant(self.datetime.plus_minutes(minutes)?, provider)
    }

    /// Adds seconds on the instant time-line.
    pub fn plus_seconds(
        &self,
        seconds: i64,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        self.resolve_instant(self.datetime.plus_seconds(seconds)?, provider)
    }

    /// Adds nanoseconds on the instant time-line.
    pub fn plus_nanos(&self, nanos: i64, provider: &impl ZoneRulesProvider) -> TemporaResult<Self> {
        self.resolve_instant(self.datetime.plus_nanos(nanos)?, provider)
    }

    /// Applies a [`Period`] on the local time-line, affecting only the date
    /// part.
    pub fn plus_period(
        &self,
        period: &Period,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        self.resolve_local(self.datetime.plus_period(period)?, provider)
    }

    /// Subtracts a [`Period`] on the local time-line, affecting only the
    /// date part.
    pub fn minus_period(
        &self,
        period: &Period,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        self.resolve_local(self.datetime.minus_period(period)?, provider)
    }

    /// Applies an exact [`Duration`] on the instant time-line.
    pub fn plus_duration(
        &self,
        duration: &Duration,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        self.resolve_instant(
            self.datetime
                .plus_seconds(duration.seconds())?
                .plus_nanos(duration.subsec_nanos().into())?,
            provider,
        )
    }

    /// Subtracts an exact [`Duration`] on the instant time-line.
    pub fn minus_duration(
        &self,
        duration: &Duration,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        self.plus_duration(&duration.negated()?, provider)
    }

    /// Applies a polymorphic [`TemporalAmount`], dispatching to the
    /// time-line the variant lives on.
    pub fn plus_amount(
        &self,
        amount: &TemporalAmount,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        match amount {
            TemporalAmount::Period(period) => self.plus_period(period, provider),
            TemporalAmount::Duration(duration) => self.plus_duration(duration, provider),
        }
    }

    /// Adds an amount of a unit, dispatching date-based units to the local
    /// time-line and time-based units to the instant time-line.
    pub fn plus(
        &self,
        amount: i64,
        unit: Unit,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        if unit.is_date_unit() {
            self.resolve_local(self.datetime.plus(amount, unit)?, provider)
        } else if unit.is_time_unit() {
            self.resolve_instant(self.datetime.plus(amount, unit)?, provider)
        } else {
            Err(unsupported_unit(unit))
        }
    }

    /// Subtracts an amount of a unit; see [`plus`](Self::plus).
    pub fn minus(
        &self,
        amount: i64,
        unit: Unit,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        let negated = amount
            .checked_neg()
            .ok_or_else(|| TemporaError::overflow().with_message("amount negation overflowed"))?;
        self.plus(negated, unit, provider)
    }

    /// Counts whole units from `self` until `end`, with the same
    /// date-unit/time-unit split as [`plus`](Self::plus).
    pub fn until_in(
        &self,
        end: &Self,
        unit: Unit,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<i64> {
        if unit.is_date_unit() {
            let end_here = end.with_zone_same_instant(self.zone.clone(), provider)?;
            self.datetime.until_in(&end_here.datetime, unit)
        } else if unit.is_time_unit() {
            self.to_offset_datetime()
                .until_in(&end.to_offset_datetime(), unit)
        } else {
            Err(unsupported_unit(unit))
        }
    }

    /// Returns whether both values represent the same instant, regardless
    /// of zone or local reading.
    #[inline]
    #[must_use]
    pub fn is_eq_instant(&self, other: &Self) -> bool {
        self.to_epoch_second() == other.to_epoch_second()
            && self.time().nanosecond() == other.time().nanosecond()
    }

    /// Returns whether this value's instant is after `other`'s.
    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        (self.to_epoch_second(), self.time().nanosecond())
            > (other.to_epoch_second(), other.time().nanosecond())
    }

    /// Returns whether this value's instant is before `other`'s.
    #[must_use]
    pub fn is_before(&self, other: &Self) -> bool {
        (self.to_epoch_second(), self.time().nanosecond())
            < (other.to_epoch_second(), other.time().nanosecond())
    }

    /// Parses a zoned date-time, validating the zone against the provider.
    ///
    /// A trailing `Z` designator pins the exact instant; an explicit offset
    /// is used as the preferred offset during overlap resolution.
    pub fn from_str_with_provider(
        source: &str,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        let parsed = parsers::parse_zoned_date_time(source.as_bytes())?;
        let zone = ZoneId::try_from_str_with_provider(&parsed.zone, provider)?;
        match parsed.offset {
            parsers::ParsedZoneOffset::Utc => {
                let instant = Instant::try_new(
                    parsed.datetime.to_epoch_second(UtcOffset::UTC),
                    parsed.datetime.time().nanosecond(),
                )?;
                Self::of_instant(&instant, zone, provider)
            }
            parsers::ParsedZoneOffset::Offset(offset) => {
                Self::of_local(parsed.datetime, zone, Some(offset), provider)
            }
            parsers::ParsedZoneOffset::None => {
                Self::of_local(parsed.datetime, zone, None, provider)
            }
        }
    }
}

// ==== Trait impls ====

impl Ord for ZonedDateTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_epoch_second()
            .cmp(&other.to_epoch_second())
            .then_with(|| self.time().nanosecond().cmp(&other.time().nanosecond()))
            .then_with(|| self.datetime.cmp(&other.datetime))
            .then_with(|| self.zone.cmp(&other.zone))
    }
}

impl PartialOrd for ZonedDateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FieldAccess for ZonedDateTime {
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

impl core::fmt::Display for ZonedDateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}{}", self.datetime, self.offset)?;
        if let ZoneId::Iana(identifier) = &self.zone {
            write!(f, "[{identifier}]")?;
        }
        Ok(())
    }
}
