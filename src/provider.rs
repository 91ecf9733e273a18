//! The `ZoneRulesProvider` trait.
//!
//! The time-zone rule database is an external collaborator. The core only
//! ever asks it two questions: which single offset applies at an instant,
//! and which offsets are valid for a local date-time. The second answer is
//! one of three shapes — unique, gap, or overlap — captured by
//! [`LocalOffsetInfo`].

use crate::{
    components::{datetime::CivilDateTime, duration::Duration, instant::Instant, offset::UtcOffset},
    TemporaResult,
};

/// A zone-offset transition: the offsets in force immediately before and
/// after a rule change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneTransition {
    offset_before: UtcOffset,
    offset_after: UtcOffset,
}

impl ZoneTransition {
    /// Creates a transition descriptor.
    #[inline]
    #[must_use]
    pub const fn new(offset_before: UtcOffset, offset_after: UtcOffset) -> Self {
        Self {
            offset_before,
            offset_after,
        }
    }

    /// Returns the offset in force before the transition.
    #[inline]
    #[must_use]
    pub const fn offset_before(&self) -> UtcOffset {
        self.offset_before
    }

    /// Returns the offset in force after the transition.
    #[inline]
    #[must_use]
    pub const fn offset_after(&self) -> UtcOffset {
        self.offset_after
    }

    /// Returns the signed length of the local-time discontinuity: positive
    /// for a gap, negative for an overlap.
    #[inline]
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::of_seconds(
            i64::from(self.offset_after.seconds()) - i64::from(self.offset_before.seconds()),
        )
    }

    /// Returns whether this transition is a forward jump of the local
    /// clock.
    #[inline]
    #[must_use]
    pub fn is_gap(&self) -> bool {
        self.offset_after > self.offset_before
    }
}

/// The set of offsets a zone's rules consider valid for one local
/// date-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalOffsetInfo {
    /// Exactly one valid offset; the common case.
    Unique(UtcOffset),
    /// Zero valid offsets: the local time fell into a forward transition
    /// and never occurred.
    Gap(ZoneTransition),
    /// Two valid offsets: the local time occurred twice around a backward
    /// transition. `offset_before` is the chronologically earlier reading.
    Overlap(ZoneTransition),
}

/// Sources time-zone rules for the core.
///
/// Implementations must be safe to query from arbitrary threads
/// concurrently; `ZonedDateTime` performs no serialization of its own.
pub trait ZoneRulesProvider {
    /// Returns whether `identifier` names a zone this provider knows.
    fn check_identifier(&self, identifier: &str) -> bool;

    /// Returns the single UTC offset in force at `instant`.
    fn offset_at(&self, identifier: &str, instant: &Instant) -> TemporaResult<UtcOffset>;

    /// Returns the valid offsets for `datetime` on the local time-line.
    fn local_offset_info(
        &self,
        identifier: &str,
        datetime: &CivilDateTime,
    ) -> TemporaResult<LocalOffsetInfo>;
}

/// A provider for callers that only ever use fixed-offset zones; every
/// lookup is unreachable.
pub struct NeverProvider;

impl ZoneRulesProvider for NeverProvider {
    fn check_identifier(&self, _: &str) -> bool {
        unimplemented!()
    }

    fn offset_at(&self, _: &str, _: &Instant) -> TemporaResult<UtcOffset> {
        unimplemented!()
    }

    fn local_offset_info(&self, _: &str, _: &CivilDateTime) -> TemporaResult<LocalOffsetInfo> {
        unimplemented!()
    }
}
