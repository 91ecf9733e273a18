//! This module implements `ZoneId`, the time-zone identifier slot.

use alloc::borrow::ToOwned;
use alloc::string::{String, ToString};

use crate::{
    components::{datetime::CivilDateTime, instant::Instant, offset::UtcOffset},
    provider::{LocalOffsetInfo, ZoneRulesProvider},
    TemporaError, TemporaResult,
};

/// A time-zone identifier: either a named zone resolved through a
/// [`ZoneRulesProvider`], or a fixed offset that resolves by itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ZoneId {
    /// A named zone, e.g. `Europe/Paris`. The rules live in the provider.
    Iana(String),
    /// A fixed offset acting as a degenerate zone with no transitions.
    Offset(UtcOffset),
}

impl Default for ZoneId {
    fn default() -> Self {
        Self::Iana("UTC".into())
    }
}

impl ZoneId {
    /// Parses a zone identifier, validating named zones against the
    /// provider.
    pub fn try_from_str_with_provider(
        source: &str,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<Self> {
        if source == "Z" {
            return Ok(Self::Offset(UtcOffset::UTC));
        }
        if source.starts_with(['+', '-']) {
            return Ok(Self::Offset(source.parse()?));
        }
        if provider.check_identifier(source) {
            return Ok(Self::Iana(source.to_owned()));
        }
        Err(TemporaError::parse().with_message("unknown time zone identifier"))
    }

    /// Returns this zone's identifier text.
    #[must_use]
    pub fn identifier(&self) -> String {
        match self {
            Self::Iana(identifier) => identifier.clone(),
            Self::Offset(offset) => offset.to_string(),
        }
    }

    /// Returns the single offset in force at `instant`. Fixed-offset zones
    /// answer without consulting the provider.
    pub fn offset_at(
        &self,
        instant: &Instant,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<UtcOffset> {
        match self {
            Self::Offset(offset) => Ok(*offset),
            Self::Iana(identifier) => provider.offset_at(identifier, instant),
        }
    }

    /// Returns the valid offsets for `datetime` on the local time-line.
    pub fn local_info(
        &self,
        datetime: &CivilDateTime,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<LocalOffsetInfo> {
        match self {
            Self::Offset(offset) => Ok(LocalOffsetInfo::Unique(*offset)),
            Self::Iana(identifier) => provider.local_offset_info(identifier, datetime),
        }
    }

    /// Converts an instant to the local date-time it reads as in this zone.
    pub fn datetime_at(
        &self,
        instant: &Instant,
        provider: &impl ZoneRulesProvider,
    ) -> TemporaResult<CivilDateTime> {
        let offset = self.offset_at(instant, provider)?;
        CivilDateTime::of_epoch_second(instant.epoch_second(), instant.nanosecond(), offset)
    }
}

impl core::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Iana(identifier) => f.write_str(identifier),
            Self::Offset(offset) => offset.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::PROVIDER;

    #[test]
    fn parse_with_provider() {
        let named = ZoneId::try_from_str_with_provider("Test/Shifty", &PROVIDER).unwrap();
        assert_eq!(named, ZoneId::Iana("Test/Shifty".into()));
        assert!(ZoneId::try_from_str_with_provider("Test/Nowhere", &PROVIDER).is_err());

        let fixed = ZoneId::try_from_str_with_provider("+05:30", &PROVIDER).unwrap();
        assert_eq!(
            fixed,
            ZoneId::Offset(UtcOffset::from_seconds(19_800).unwrap())
        );
        assert_eq!(
            ZoneId::try_from_str_with_provider("Z", &PROVIDER).unwrap(),
            ZoneId::Offset(UtcOffset::UTC)
        );
    }

    #[test]
    fn fixed_offsets_resolve_without_the_provider() {
        let zone = ZoneId::Offset(UtcOffset::from_seconds(3_600).unwrap());
        let info = zone
            .local_info(
                &CivilDateTime::new(
                    crate::CivilDate::try_new(2021, 6, 1).unwrap(),
                    crate::TimeOfDay::MIDNIGHT,
                ),
                &crate::provider::NeverProvider,
            )
            .unwrap();
        assert_eq!(
            info,
            LocalOffsetInfo::Unique(UtcOffset::from_seconds(3_600).unwrap())
        );
    }

    #[test]
    fn default_is_utc() {
        assert_eq!(ZoneId::default().identifier(), "UTC");
    }
}
