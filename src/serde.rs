//! Serialization of the documented minimal field layouts, behind the
//! `serde` feature.
//!
//! Each type round-trips exactly its minimal field layout as a fixed-arity
//! tuple; nothing else deserializes. Wrong arity, unknown shapes, and
//! out-of-range fields all fail unconditionally, so a crafted byte stream
//! cannot smuggle in an invalid value. The one sanctioned exception is
//! `ZonedDateTime`, which reconstructs through its lenient path: the named
//! zone identifier is taken as-is and the offset/zone pair may be
//! inconsistent until the next resolving operation.

use alloc::string::String;
use core::fmt;

use serde::de::{self, Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeTuple, Serializer};

use crate::{
    CivilDate, CivilDateTime, Duration, Instant, OffsetDateTime, OffsetTime, Period, TimeOfDay,
    UtcOffset, ZoneId, ZonedDateTime,
};

// Every rejected reconstruction is reported as the crate's deserialization
// kind, with the underlying validation failure as the message.
fn de_invalid<E: de::Error>(err: crate::TemporaError) -> E {
    E::custom(
        crate::TemporaError::deserialization().with_message(alloc::format!("{err}")),
    )
}

macro_rules! tuple_visitor {
    ($visitor:ident, $value:ty, $expecting:literal, $len:literal, |$seq:ident| $build:block) => {
        struct $visitor;

        impl<'de> Visitor<'de> for $visitor {
            type Value = $value;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str($expecting)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut $seq: A) -> Result<Self::Value, A::Error> {
                let value = $build;
                if $seq.next_element::<de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length($len + 1, &self));
                }
                Ok(value)
            }
        }
    };
}

macro_rules! next {
    ($seq:ident, $index:literal, $visitor:expr) => {
        $seq.next_element()?
            .ok_or_else(|| de::Error::invalid_length($index, &$visitor))?
    };
}

// ==== Instant: (seconds, nanos) ====

impl Serialize for Instant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.epoch_second())?;
        tuple.serialize_element(&self.nanosecond())?;
        tuple.end()
    }
}

tuple_visitor!(InstantVisitor, Instant, "an (epoch-seconds, nanos) tuple", 2, |seq| {
    let seconds: i64 = next!(seq, 0, InstantVisitor);
    let nanos: u32 = next!(seq, 1, InstantVisitor);
    Instant::try_new(seconds, nanos).map_err(de_invalid)?
});

impl<'de> Deserialize<'de> for Instant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_tuple(2, InstantVisitor)
    }
}

// ==== CivilDate: (year, month, day) ====

impl Serialize for CivilDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.year())?;
        tuple.serialize_element(&self.month())?;
        tuple.serialize_element(&self.day())?;
        tuple.end()
    }
}

tuple_visitor!(CivilDateVisitor, CivilDate, "a (year, month, day) tuple", 3, |seq| {
    let year: i32 = next!(seq, 0, CivilDateVisitor);
    let month: u8 = next!(seq, 1, CivilDateVisitor);
    let day: u8 = next!(seq, 2, CivilDateVisitor);
    CivilDate::try_new(year, month, day).map_err(de_invalid)?
});

impl<'de> Deserialize<'de> for CivilDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_tuple(3, CivilDateVisitor)
    }
}

// ==== TimeOfDay: (hour, minute, second, nano) ====

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(4)?;
        tuple.serialize_element(&self.hour())?;
        tuple.serialize_element(&self.minute())?;
        tuple.serialize_element(&self.second())?;
        tuple.serialize_element(&self.nanosecond())?;
        tuple.end()
    }
}

tuple_visitor!(
    TimeOfDayVisitor,
    TimeOfDay,
    "an (hour, minute, second, nano) tuple",
    4,
    |seq| {
        let hour: u8 = next!(seq, 0, TimeOfDayVisitor);
        let minute: u8 = next!(seq, 1, TimeOfDayVisitor);
        let second: u8 = next!(seq, 2, TimeOfDayVisitor);
        let nanosecond: u32 = next!(seq, 3, TimeOfDayVisitor);
        TimeOfDay::try_new(hour, minute, second, nanosecond).map_err(de_invalid)?
    }
);

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_tuple(4, TimeOfDayVisitor)
    }
}

// ==== CivilDateTime: (date, time) ====

impl Serialize for CivilDateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.date())?;
        tuple.serialize_element(&self.time())?;
        tuple.end()
    }
}

tuple_visitor!(
    CivilDateTimeVisitor,
    CivilDateTime,
    "a (date, time) tuple",
    2,
    |seq| {
        let date: CivilDate = next!(seq, 0, CivilDateTimeVisitor);
        let time: TimeOfDay = next!(seq, 1, CivilDateTimeVisitor);
        CivilDateTime::new(date, time)
    }
);

impl<'de> Deserialize<'de> for CivilDateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_tuple(2, CivilDateTimeVisitor)
    }
}

// ==== Duration: (seconds, nanos) ====

impl Serialize for Duration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.seconds())?;
        tuple.serialize_element(&self.subsec_nanos())?;
        tuple.end()
    }
}

tuple_visitor!(DurationVisitor, Duration, "a (seconds, nanos) tuple", 2, |seq| {
    let seconds: i64 = next!(seq, 0, DurationVisitor);
    let nanos: u32 = next!(seq, 1, DurationVisitor);
    if nanos >= 1_000_000_000 {
        return Err(de_invalid(
            crate::TemporaError::range()
                .with_message("nanosecond field outside the documented layout"),
        ));
    }
    Duration::of_seconds_with_adjustment(seconds, nanos.into()).map_err(de_invalid)?
});

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_tuple(2, DurationVisitor)
    }
}

// ==== Period: (years, months, days) ====

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.years())?;
        tuple.serialize_element(&self.months())?;
        tuple.serialize_element(&self.days())?;
        tuple.end()
    }
}

tuple_visitor!(PeriodVisitor, Period, "a (years, months, days) tuple", 3, |seq| {
    let years: i32 = next!(seq, 0, PeriodVisitor);
    let months: i32 = next!(seq, 1, PeriodVisitor);
    let days: i32 = next!(seq, 2, PeriodVisitor);
    Period::new(years, months, days)
});

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_tuple(3, PeriodVisitor)
    }
}

// ==== UtcOffset: offset-seconds ====

impl Serialize for UtcOffset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.seconds())
    }
}

impl<'de> Deserialize<'de> for UtcOffset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let seconds = i32::deserialize(deserializer)?;
        UtcOffset::from_seconds(seconds).map_err(de_invalid)
    }
}

// ==== OffsetTime: (time, offset-seconds) ====

impl Serialize for OffsetTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.time())?;
        tuple.serialize_element(&self.offset())?;
        tuple.end()
    }
}

tuple_visitor!(
    OffsetTimeVisitor,
    OffsetTime,
    "a (time, offset-seconds) tuple",
    2,
    |seq| {
        let time: TimeOfDay = next!(seq, 0, OffsetTimeVisitor);
        let offset: UtcOffset = next!(seq, 1, OffsetTimeVisitor);
        OffsetTime::new(time, offset)
    }
);

impl<'de> Deserialize<'de> for OffsetTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_tuple(2, OffsetTimeVisitor)
    }
}

// ==== OffsetDateTime: (datetime, offset-seconds) ====

impl Serialize for OffsetDateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.datetime())?;
        tuple.serialize_element(&self.offset())?;
        tuple.end()
    }
}

tuple_visitor!(
    OffsetDateTimeVisitor,
    OffsetDateTime,
    "a (datetime, offset-seconds) tuple",
    2,
    |seq| {
        let datetime: CivilDateTime = next!(seq, 0, OffsetDateTimeVisitor);
        let offset: UtcOffset = next!(seq, 1, OffsetDateTimeVisitor);
        OffsetDateTime::new(datetime, offset)
    }
);

impl<'de> Deserialize<'de> for OffsetDateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_tuple(2, OffsetDateTimeVisitor)
    }
}

// ==== ZonedDateTime: (datetime, offset-seconds, zone-id) ====

impl Serialize for ZonedDateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.datetime())?;
        tuple.serialize_element(&self.offset())?;
        tuple.serialize_element(&self.zone().identifier())?;
        tuple.end()
    }
}

tuple_visitor!(
    ZonedDateTimeVisitor,
    ZonedDateTime,
    "a (datetime, offset-seconds, zone-id) tuple",
    3,
    |seq| {
        let datetime: CivilDateTime = next!(seq, 0, ZonedDateTimeVisitor);
        let offset: UtcOffset = next!(seq, 1, ZonedDateTimeVisitor);
        let zone: String = next!(seq, 2, ZonedDateTimeVisitor);
        // No provider is available here; a named zone is taken as-is and a
        // fixed-offset identifier is validated as an offset. This is the
        // lenient path.
        let zone = if zone == "Z" || zone.starts_with(['+', '-']) {
            ZoneId::Offset(zone.parse().map_err(de_invalid)?)
        } else {
            ZoneId::Iana(zone)
        };
        ZonedDateTime::of_lenient(datetime, offset, zone)
    }
);

impl<'de> Deserialize<'de> for ZonedDateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_tuple(3, ZonedDateTimeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn instant_round_trip() {
        let instant = Instant::of_epoch_second_with_adjustment(-1, 500_000_000).unwrap();
        let json = serde_json::to_string(&instant).unwrap();
        assert_eq!(json, "[-1,500000000]");
        assert_eq!(serde_json::from_str::<Instant>(&json).unwrap(), instant);
    }

    #[test]
    fn civil_date_round_trip_and_guard() {
        let date = CivilDate::try_new(-44, 3, 15).unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "[-44,3,15]");
        assert_eq!(serde_json::from_str::<CivilDate>(&json).unwrap(), date);

        // Invalid combinations and foreign shapes fail unconditionally.
        assert!(serde_json::from_str::<CivilDate>("[2021,2,29]").is_err());
        assert!(serde_json::from_str::<CivilDate>("[2021,2]").is_err());
        assert!(serde_json::from_str::<CivilDate>("[2021,2,28,7]").is_err());
        assert!(serde_json::from_str::<CivilDate>("{\"year\":2021}").is_err());
    }

    #[test]
    fn offset_datetime_round_trip() {
        let odt = OffsetDateTime::new(
            CivilDateTime::new(
                CivilDate::try_new(2008, 12, 3).unwrap(),
                TimeOfDay::try_new(11, 30, 0, 120).unwrap(),
            ),
            UtcOffset::from_seconds(3_600).unwrap(),
        );
        let json = serde_json::to_string(&odt).unwrap();
        assert_eq!(
            serde_json::from_str::<OffsetDateTime>(&json).unwrap(),
            odt
        );
        assert!(serde_json::from_str::<OffsetDateTime>("[[2008,12,3],99999]").is_err());
    }

    #[test]
    fn zoned_datetime_deserializes_leniently() {
        let json = "[[[2017,6,1],[12,0,0,0]],10800,\"Test/Shifty\"]";
        let zdt = serde_json::from_str::<ZonedDateTime>(json).unwrap();
        // The stored offset is inconsistent with the zone's rules; the
        // lenient path accepts it anyway.
        assert_eq!(zdt.offset().seconds(), 10_800);
        assert_eq!(zdt.zone().identifier(), "Test/Shifty");

        let round_trip = serde_json::to_string(&zdt).unwrap();
        assert_eq!(
            serde_json::from_str::<ZonedDateTime>(&round_trip).unwrap(),
            zdt
        );
    }

    #[test]
    fn period_and_duration_round_trip() {
        let period = Period::new(0, 15, -3);
        let json = serde_json::to_string(&period).unwrap();
        assert_eq!(serde_json::from_str::<Period>(&json).unwrap(), period);

        let duration = Duration::of_millis(-1_500);
        let json = serde_json::to_string(&duration).unwrap();
        assert_eq!(json, "[-2,500000000]");
        assert_eq!(serde_json::from_str::<Duration>(&json).unwrap(), duration);
    }

    #[test]
    fn zone_id_text_forms() {
        let fixed = "[[[2020,1,1],[0,0,0,0]],3600,\"+01:00\"]";
        let zdt = serde_json::from_str::<ZonedDateTime>(fixed).unwrap();
        assert_eq!(zdt.zone().to_string(), "+01:00");
        assert!(serde_json::from_str::<ZonedDateTime>(
            "[[[2020,1,1],[0,0,0,0]],3600,\"+99:00\"]"
        )
        .is_err());
    }
}
