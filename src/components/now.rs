//! This module implements the wall-clock entry points.

use crate::{
    components::{
        date::CivilDate, datetime::CivilDateTime, instant::Instant,
        offset_datetime::OffsetDateTime, time::TimeOfDay, timezone::ZoneId,
        zoneddatetime::ZonedDateTime,
    },
    provider::ZoneRulesProvider,
    TemporaResult,
};

/// The wall-clock collaborator: one reading yields the current instant and
/// the associated zone.
///
/// Implementations must return a self-consistent pair; the core queries the
/// clock exactly once per public `now` operation and derives everything
/// else arithmetically, so no moving value is ever observed twice.
pub trait Clock {
    /// Returns the current instant and the clock's zone.
    fn now(&self) -> TemporaResult<(Instant, ZoneId)>;
}

/// A clock pinned to one reading, for tests and replay.
#[derive(Debug, Clone)]
pub struct FixedClock {
    instant: Instant,
    zone: ZoneId,
}

impl FixedClock {
    /// Creates a clock that always reads `instant` in `zone`.
    #[inline]
    #[must_use]
    pub const fn new(instant: Instant, zone: ZoneId) -> Self {
        Self { instant, zone }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> TemporaResult<(Instant, ZoneId)> {
        Ok((self.instant, self.zone.clone()))
    }
}

/// Namespaced "current value" constructors over a [`Clock`].
#[derive(Debug, Default)]
pub struct Now;

impl Now {
    /// Returns the current instant.
    pub fn instant(clock: &impl Clock) -> TemporaResult<Instant> {
        Ok(clock.now()?.0)
    }

    /// Returns the current date-time in the clock's zone.
    pub fn civil_date_time(
        clock: &impl Clock,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<CivilDateTime> {
        let (instant, zone) = clock.now()?;
        zone.datetime_at(&instant, provider)
    }

    /// Returns the current date in the clock's zone.
    pub fn civil_date(
        clock: &impl Clock,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<CivilDate> {
        Ok(Self::civil_date_time(clock, provider)?.date())
    }

    /// Returns the current time of day in the clock's zone.
    pub fn time_of_day(
        clock: &impl Clock,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<TimeOfDay> {
        Ok(Self::civil_date_time(clock, provider)?.time())
    }

    /// Returns the current zoned date-time in the clock's zone.
    pub fn zoned_date_time(
        clock: &impl Clock,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<ZonedDateTime> {
        let (instant, zone) = clock.now()?;
        ZonedDateTime::of_instant(&instant, zone, provider)
    }

    /// Returns the current offset date-time in the clock's zone.
    pub fn offset_date_time(
        clock: &impl Clock,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<OffsetDateTime> {
        Ok(Self::zoned_date_time(clock, provider)?.to_offset_datetime())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::PROVIDER;
    use crate::TimeOfDay;

    #[test]
    fn fixed_clock_reads_consistently() {
        // 2017-06-01T16:00:00Z, which is noon in the scripted summer zone.
        let instant = Instant::of_epoch_second(1_496_332_800).unwrap();
        let clock = FixedClock::new(instant, ZoneId::Iana("Test/Shifty".into()));

        assert_eq!(Now::instant(&clock).unwrap(), instant);
        let zdt = Now::zoned_date_time(&clock, &PROVIDER).unwrap();
        assert_eq!(zdt.time(), TimeOfDay::try_new(12, 0, 0, 0).unwrap());
        assert_eq!(zdt.offset().seconds(), -14_400);
        assert_eq!(
            Now::civil_date(&clock, &PROVIDER).unwrap(),
            crate::CivilDate::try_new(2017, 6, 1).unwrap()
        );
        assert_eq!(
            Now::offset_date_time(&clock, &PROVIDER)
                .unwrap()
                .to_epoch_second(),
            1_496_332_800
        );
    }
}
