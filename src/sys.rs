//! The system wall clock, behind the `sys` feature.

use web_time::{SystemTime, UNIX_EPOCH};

use crate::{
    components::{instant::Instant, now::Clock, timezone::ZoneId},
    TemporaError, TemporaResult,
};

/// A [`Clock`] backed by the operating system's real-time clock and the
/// host's configured time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    fn system_instant() -> TemporaResult<Instant> {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => {
                let seconds = i64::try_from(elapsed.as_secs()).map_err(|_| {
                    TemporaError::range().with_message("system time is out of range")
                })?;
                Instant::try_new(seconds, elapsed.subsec_nanos())
            }
            // A reading before the epoch comes back as the error case.
            Err(err) => {
                let behind = err.duration();
                let seconds = i64::try_from(behind.as_secs()).map_err(|_| {
                    TemporaError::range().with_message("system time is out of range")
                })?;
                Instant::of_epoch_second_with_adjustment(
                    -seconds,
                    -i64::from(behind.subsec_nanos()),
                )
            }
        }
    }

    fn system_zone() -> ZoneId {
        match iana_time_zone::get_timezone() {
            Ok(identifier) => ZoneId::Iana(identifier),
            Err(_err) => {
                #[cfg(feature = "log")]
                log::warn!("failed to read the host time zone, falling back to UTC: {_err}");
                ZoneId::default()
            }
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> TemporaResult<(Instant, ZoneId)> {
        Ok((Self::system_instant()?, Self::system_zone()))
    }
}
