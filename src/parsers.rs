//! This module implements ISO-8601 text parsing and formatting.
//!
//! Parsing is layered over `ixdtf`: the grammar lives there, and this
//! module validates the parse records against the crate's own ranges
//! before building values. Formatting goes through small `Formattable*`
//! writers so every `Display` impl shares one set of digit routines.

use alloc::string::{String, ToString};

use ixdtf::{
    encoding::Utf8,
    parsers::IxdtfParser,
    records::{
        DateRecord, IxdtfParseRecord, TimeRecord, TimeZoneRecord, UtcOffsetRecord,
        UtcOffsetRecordOrZ,
    },
};
use writeable::{impl_display_with_writeable, LengthHint, Writeable};

use crate::{
    components::{
        date::CivilDate, datetime::CivilDateTime, instant::Instant, offset::UtcOffset,
        offset_datetime::OffsetDateTime, offset_time::OffsetTime, time::TimeOfDay,
    },
    Sign, TemporaError, TemporaResult,
};

// ==== The narrow formatter boundary ====

/// The narrow contract a textual formatter collaborator satisfies: turn a
/// value into text, or text into a value, failing with a parse error that
/// carries the offending input position.
pub trait ValueFormatter<T> {
    /// Formats `value` as text.
    fn format(&self, value: &T) -> TemporaResult<String>;

    /// Parses `source` into a value.
    fn parse(&self, source: &str) -> TemporaResult<T>;
}

/// The default ISO-8601 formatter, backed by each type's `Display` and
/// `FromStr` conventions.
#[derive(Debug, Default, Clone, Copy)]
pub struct IsoFormatter;

impl<T> ValueFormatter<T> for IsoFormatter
where
    T: core::fmt::Display + core::str::FromStr<Err = TemporaError>,
{
    fn format(&self, value: &T) -> TemporaResult<String> {
        Ok(value.to_string())
    }

    fn parse(&self, source: &str) -> TemporaResult<T> {
        source.parse()
    }
}

// ==== ixdtf record validation ====

fn map_parse_error(err: ixdtf::ParseError) -> TemporaError {
    TemporaError::parse().with_message(alloc::format!("{err}"))
}

#[derive(PartialEq)]
enum ParseVariant {
    DateTime,
    Time,
}

fn parse_ixdtf(source: &[u8], variant: ParseVariant) -> TemporaResult<IxdtfParseRecord<'_, Utf8>> {
    let mut parser = IxdtfParser::from_utf8(source);
    let record = match variant {
        ParseVariant::DateTime => parser.parse(),
        ParseVariant::Time => parser.parse_time(),
    }
    .map_err(map_parse_error)?;

    // The crate is ISO-only; any other calendar annotation is an error.
    if let Some(calendar) = record.calendar {
        if calendar != b"iso8601" {
            return Err(TemporaError::parse()
                .with_message("only the iso8601 calendar annotation is supported"));
        }
    }
    Ok(record)
}

fn validate_date_record(record: DateRecord) -> TemporaResult<CivilDate> {
    CivilDate::try_new(record.year, record.month, record.day)
}

fn validate_time_record(record: TimeRecord) -> TemporaResult<TimeOfDay> {
    let nanosecond = match record.fraction {
        Some(fraction) => fraction.to_nanoseconds().ok_or_else(|| {
            TemporaError::parse()
                .with_message("fractional seconds exceed nanosecond precision")
        })?,
        None => 0,
    };
    // An ISO leap second reads as the last representable second.
    TimeOfDay::try_new(
        record.hour,
        record.minute,
        record.second.min(59),
        nanosecond,
    )
}

fn offset_from_record(record: UtcOffsetRecordOrZ) -> TemporaResult<UtcOffset> {
    match record {
        UtcOffsetRecordOrZ::Z => Ok(UtcOffset::UTC),
        UtcOffsetRecordOrZ::Offset(offset) => {
            if offset.fraction().is_some() {
                return Err(TemporaError::parse()
                    .with_message("sub-second offsets are not supported"));
            }
            let seconds = (i32::from(offset.hour()) * 3600
                + i32::from(offset.minute()) * 60
                + i32::from(offset.second().unwrap_or(0)))
                * i32::from(offset.sign() as i8);
            UtcOffset::from_seconds(seconds)
        }
    }
}

fn reject_utc_designator(record: &IxdtfParseRecord<'_, Utf8>) -> TemporaResult<()> {
    if record.offset == Some(UtcOffsetRecordOrZ::Z) {
        return Err(TemporaError::parse()
            .with_message("the UTC designator is not valid for a local value"));
    }
    Ok(())
}

// ==== Parse entry points ====

pub(crate) fn parse_civil_date(source: &[u8]) -> TemporaResult<CivilDate> {
    let record = parse_ixdtf(source, ParseVariant::DateTime)?;
    reject_utc_designator(&record)?;
    let Some(date) = record.date else {
        return Err(TemporaError::parse().with_message("a date component is required"));
    };
    validate_date_record(date)
}

pub(crate) fn parse_time_of_day(source: &[u8]) -> TemporaResult<TimeOfDay> {
    // Accept a bare time first, then fall back to the time component of a
    // full date-time string.
    let record = match parse_ixdtf(source, ParseVariant::Time) {
        Ok(record) => record,
        Err(time_err) => match parse_ixdtf(source, ParseVariant::DateTime) {
            Ok(record) => record,
            Err(_) => return Err(time_err),
        },
    };
    reject_utc_designator(&record)?;
    let Some(time) = record.time else {
        return Err(TemporaError::parse().with_message("a time component is required"));
    };
    validate_time_record(time)
}

pub(crate) fn parse_civil_date_time(source: &[u8]) -> TemporaResult<CivilDateTime> {
    let record = parse_ixdtf(source, ParseVariant::DateTime)?;
    reject_utc_designator(&record)?;
    let (Some(date), Some(time)) = (record.date, record.time) else {
        return Err(TemporaError::parse()
            .with_message("both a date and a time component are required"));
    };
    Ok(CivilDateTime::new(
        validate_date_record(date)?,
        validate_time_record(time)?,
    ))
}

pub(crate) fn parse_offset_date_time(source: &[u8]) -> TemporaResult<OffsetDateTime> {
    let record = parse_ixdtf(source, ParseVariant::DateTime)?;
    let (Some(date), Some(time), Some(offset)) = (record.date, record.time, record.offset) else {
        return Err(TemporaError::parse()
            .with_message("a date, a time, and an offset are required"));
    };
    let datetime = CivilDateTime::new(validate_date_record(date)?, validate_time_record(time)?);
    Ok(OffsetDateTime::new(datetime, offset_from_record(offset)?))
}

pub(crate) fn parse_offset_time(source: &[u8]) -> TemporaResult<OffsetTime> {
    let record = parse_ixdtf(source, ParseVariant::Time)?;
    let (Some(time), Some(offset)) = (record.time, record.offset) else {
        return Err(TemporaError::parse().with_message("a time and an offset are required"));
    };
    Ok(OffsetTime::new(
        validate_time_record(time)?,
        offset_from_record(offset)?,
    ))
}

pub(crate) fn parse_instant_text(source: &[u8]) -> TemporaResult<Instant> {
    let record = parse_ixdtf(source, ParseVariant::DateTime)?;
    let (Some(date), Some(time), Some(offset)) = (record.date, record.time, record.offset) else {
        return Err(TemporaError::parse()
            .with_message("an instant requires a date, a time, and an offset"));
    };
    let datetime = CivilDateTime::new(validate_date_record(date)?, validate_time_record(time)?);
    let offset = offset_from_record(offset)?;
    Instant::try_new(
        datetime.to_epoch_second(offset),
        datetime.time().nanosecond(),
    )
}

/// The offset component of a parsed zoned date-time string.
pub(crate) enum ParsedZoneOffset {
    /// A trailing `Z`: the string pins an exact instant.
    Utc,
    /// An explicit numeric offset.
    Offset(UtcOffset),
    /// No offset; the zone alone resolves the local time.
    None,
}

pub(crate) struct ParsedZonedDateTime {
    pub(crate) datetime: CivilDateTime,
    pub(crate) offset: ParsedZoneOffset,
    pub(crate) zone: String,
}

pub(crate) fn parse_zoned_date_time(source: &[u8]) -> TemporaResult<ParsedZonedDateTime> {
    let record = parse_ixdtf(source, ParseVariant::DateTime)?;
    let Some(annotation) = record.tz else {
        return Err(TemporaError::parse()
            .with_message("a time zone annotation is required for a zoned date-time"));
    };
    let (Some(date), Some(time)) = (record.date, record.time) else {
        return Err(TemporaError::parse()
            .with_message("both a date and a time component are required"));
    };
    let zone = match annotation.tz {
        TimeZoneRecord::Name(name) => String::from_utf8_lossy(name).into_owned(),
        TimeZoneRecord::Offset(minute_offset) => {
            let record = UtcOffsetRecord::MinutePrecision(minute_offset);
            offset_from_record(UtcOffsetRecordOrZ::Offset(record))?.to_string()
        }
        _ => {
            return Err(TemporaError::parse()
                .with_message("unsupported time zone annotation"));
        }
    };
    let offset = match record.offset {
        Some(UtcOffsetRecordOrZ::Z) => ParsedZoneOffset::Utc,
        Some(record) => ParsedZoneOffset::Offset(offset_from_record(record)?),
        None => ParsedZoneOffset::None,
    };
    Ok(ParsedZonedDateTime {
        datetime: CivilDateTime::new(validate_date_record(date)?, validate_time_record(time)?),
        offset,
        zone,
    })
}

/// Parses a standalone offset: `Z`, `±HH`, `±HHMM`, `±HH:MM`, `±HHMMSS`,
/// or `±HH:MM:SS`.
pub(crate) fn parse_utc_offset(source: &str) -> TemporaResult<UtcOffset> {
    if source == "Z" || source == "z" {
        return Ok(UtcOffset::UTC);
    }
    let bytes = source.as_bytes();
    let mut position = 0usize;

    let sign = match bytes.first() {
        Some(b'+') => 1,
        Some(b'-') => -1,
        _ => {
            return Err(TemporaError::parse()
                .with_message(alloc::format!("expected an offset sign in {source:?}"))
                .with_index(0));
        }
    };
    position += 1;

    let mut digit_pair = |position: &mut usize| -> TemporaResult<i32> {
        let pair = bytes.get(*position..*position + 2).ok_or_else(|| {
            TemporaError::parse()
                .with_message(alloc::format!("offset ended abruptly in {source:?}"))
                .with_index(*position)
        })?;
        if !pair.iter().all(u8::is_ascii_digit) {
            return Err(TemporaError::parse()
                .with_message(alloc::format!("expected two digits in {source:?}"))
                .with_index(*position));
        }
        *position += 2;
        Ok(i32::from(pair[0] - b'0') * 10 + i32::from(pair[1] - b'0'))
    };

    let hours = digit_pair(&mut position)?;
    let mut minutes = 0;
    let mut seconds = 0;
    if position < bytes.len() {
        if bytes[position] == b':' {
            position += 1;
        }
        minutes = digit_pair(&mut position)?;
    }
    if position < bytes.len() {
        if bytes[position] == b':' {
            position += 1;
        }
        seconds = digit_pair(&mut position)?;
    }
    if position != bytes.len() {
        return Err(TemporaError::parse()
            .with_message(alloc::format!("trailing characters in offset {source:?}"))
            .with_index(position));
    }
    if minutes > 59 || seconds > 59 {
        return Err(TemporaError::parse()
            .with_message(alloc::format!(
                "offset minute and second must be below 60 in {source:?}"
            )));
    }
    UtcOffset::from_seconds(sign * (hours * 3600 + minutes * 60 + seconds))
}

// ==== Writers ====

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precision {
    /// Trim trailing zero fraction digits; omit the fraction when zero.
    #[default]
    Auto,
    /// Stop after the minute component.
    Minute,
    /// Exactly this many fraction digits.
    Digit(u8),
}

#[derive(Debug)]
pub struct FormattableTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub nanosecond: u32,
    pub precision: Precision,
    pub include_sep: bool,
}

impl Writeable for FormattableTime {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        write_padded_u8(self.hour, sink)?;
        if self.include_sep {
            sink.write_char(':')?;
        }
        write_padded_u8(self.minute, sink)?;
        if self.precision == Precision::Minute {
            return Ok(());
        }
        if self.include_sep {
            sink.write_char(':')?;
        }
        write_padded_u8(self.second, sink)?;
        if (self.nanosecond == 0 && self.precision == Precision::Auto)
            || self.precision == Precision::Digit(0)
        {
            return Ok(());
        }
        sink.write_char('.')?;
        write_nanosecond(self.nanosecond, self.precision, sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        let sep = self.include_sep as usize;
        if self.precision == Precision::Minute {
            return LengthHint::exact(4 + sep);
        }
        let time_base = 6 + (sep * 2);
        if self.nanosecond == 0 || self.precision == Precision::Digit(0) {
            return LengthHint::exact(time_base);
        }
        if let Precision::Digit(digits) = self.precision {
            return LengthHint::exact(time_base + 1 + digits as usize);
        }
        LengthHint::between(time_base + 2, time_base + 10)
    }
}

#[derive(Debug)]
pub struct FormattableOffset {
    pub sign: Sign,
    pub time: FormattableTime,
}

impl Writeable for FormattableOffset {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        match self.sign {
            Sign::Negative => sink.write_char('-')?,
            _ => sink.write_char('+')?,
        }
        self.time.write_to(sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        self.time.writeable_length_hint() + 1
    }
}

#[derive(Debug)]
pub struct FormattableDate(pub i32, pub u8, pub u8);

impl Writeable for FormattableDate {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        write_year(self.0, sink)?;
        sink.write_char('-')?;
        write_padded_u8(self.1, sink)?;
        sink.write_char('-')?;
        write_padded_u8(self.2, sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::between(10, 17)
    }
}

#[derive(Debug)]
pub struct FormattablePeriod {
    pub years: i32,
    pub months: i32,
    pub days: i32,
}

impl Writeable for FormattablePeriod {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        sink.write_char('P')?;
        if self.years == 0 && self.months == 0 && self.days == 0 {
            return sink.write_str("0D");
        }
        if self.years != 0 {
            self.years.write_to(sink)?;
            sink.write_char('Y')?;
        }
        if self.months != 0 {
            self.months.write_to(sink)?;
            sink.write_char('M')?;
        }
        if self.days != 0 {
            self.days.write_to(sink)?;
            sink.write_char('D')?;
        }
        Ok(())
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::between(3, 37)
    }
}

impl_display_with_writeable!(FormattableTime);
impl_display_with_writeable!(FormattableOffset);
impl_display_with_writeable!(FormattableDate);
impl_display_with_writeable!(FormattablePeriod);

fn write_padded_u8<W: core::fmt::Write + ?Sized>(num: u8, sink: &mut W) -> core::fmt::Result {
    if num < 10 {
        sink.write_char('0')?;
    }
    num.write_to(sink)
}

fn write_year<W: core::fmt::Write + ?Sized>(year: i32, sink: &mut W) -> core::fmt::Result {
    if year < 0 {
        sink.write_char('-')?;
    } else if year > 9999 {
        sink.write_char('+')?;
    }
    let abs = year.unsigned_abs();
    // Years within four digits are zero-padded; wider years print as-is.
    if abs <= 9999 {
        if abs < 1000 {
            sink.write_char('0')?;
        }
        if abs < 100 {
            sink.write_char('0')?;
        }
        if abs < 10 {
            sink.write_char('0')?;
        }
    }
    abs.write_to(sink)
}

fn write_nanosecond<W: core::fmt::Write + ?Sized>(
    nanoseconds: u32,
    precision: Precision,
    sink: &mut W,
) -> core::fmt::Result {
    let (digits, index) = u32_to_digits(nanoseconds);
    let precision = match precision {
        Precision::Digit(digit) if digit <= 9 => digit as usize,
        _ => index,
    };
    for digit in digits.iter().take(precision) {
        digit.write_to(sink)?;
    }
    Ok(())
}

/// Splits a nanosecond value into nine decimal digits and the index one
/// past its last nonzero digit.
fn u32_to_digits(mut value: u32) -> ([u8; 9], usize) {
    let mut output = [0; 9];
    let mut precision = 0;
    let mut index = 9;
    while index != 0 {
        let digit = (value % 10) as u8;
        value /= 10;
        if precision == 0 && digit != 0 {
            precision = index;
        }
        output[index - 1] = digit;
        index -= 1;
    }
    (output, precision)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_writer_pads_and_extends() {
        assert_eq!(FormattableDate(2021, 3, 7).to_string(), "2021-03-07");
        assert_eq!(FormattableDate(-44, 3, 15).to_string(), "-0044-03-15");
        assert_eq!(FormattableDate(10_000, 1, 1).to_string(), "+10000-01-01");
        assert_eq!(
            FormattableDate(-999_999_999, 1, 1).to_string(),
            "-999999999-01-01"
        );
    }

    #[test]
    fn time_writer_trims_fraction() {
        let time = FormattableTime {
            hour: 4,
            minute: 5,
            second: 6,
            nanosecond: 123_000_000,
            precision: Precision::Auto,
            include_sep: true,
        };
        assert_eq!(time.to_string(), "04:05:06.123");
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert!(parse_civil_date(b"2020-13-01").is_err());
        assert!(parse_civil_date(b"2020-01-32").is_err());
        assert!(parse_civil_date(b"2021-02-29").is_err());
        assert!(parse_civil_date(b"junk").is_err());
        assert!(parse_civil_date(b"2020-01-01junk").is_err());
        assert!(parse_civil_date_time(b"2020-01-01T25:00").is_err());
        assert!(parse_civil_date_time(b"2020-01-01").is_err());
        // A trailing Z makes the value an instant, not a local one.
        assert!(parse_civil_date_time(b"2020-01-01T00:00Z").is_err());
        assert!(parse_civil_date(b"2020-01-01[u-ca=hebrew]").is_err());
    }

    #[test]
    fn parse_accepts_iso_forms() {
        assert_eq!(
            parse_civil_date(b"2020-02-29").unwrap(),
            CivilDate::try_new(2020, 2, 29).unwrap()
        );
        assert_eq!(
            parse_time_of_day(b"14:30:05.25").unwrap(),
            TimeOfDay::try_new(14, 30, 5, 250_000_000).unwrap()
        );
        assert_eq!(
            parse_time_of_day(b"2020-01-01T14:30").unwrap(),
            TimeOfDay::try_new(14, 30, 0, 0).unwrap()
        );
        let datetime = parse_civil_date_time(b"2020-01-01T00:30:15").unwrap();
        assert_eq!(datetime.time().second(), 15);
    }

    #[test]
    fn parse_instant_requires_an_offset() {
        assert!(parse_instant_text(b"2020-01-01T00:00:00").is_err());
        let at_utc = parse_instant_text(b"2020-01-01T00:00:00Z").unwrap();
        let shifted = parse_instant_text(b"2020-01-01T01:00:00+01:00").unwrap();
        assert_eq!(at_utc, shifted);
    }

    #[test]
    fn parse_zoned_forms() {
        let named = parse_zoned_date_time(b"2020-01-01T00:00:00[Europe/Paris]").unwrap();
        assert_eq!(named.zone, "Europe/Paris");
        assert!(matches!(named.offset, ParsedZoneOffset::None));

        let with_offset =
            parse_zoned_date_time(b"2020-01-01T00:00:00+01:00[Europe/Paris]").unwrap();
        assert!(matches!(with_offset.offset, ParsedZoneOffset::Offset(_)));

        assert!(parse_zoned_date_time(b"2020-01-01T00:00:00+01:00").is_err());
    }

    #[test]
    fn offset_parse_errors_carry_an_index() {
        let err = parse_utc_offset("+1").unwrap_err();
        assert_eq!(err.index(), Some(1));
        let err = parse_utc_offset("+01:0x").unwrap_err();
        assert_eq!(err.index(), Some(4));
        let err = parse_utc_offset("+01:00:00:00").unwrap_err();
        assert!(err.index().is_some());
    }

    #[test]
    fn iso_formatter_round_trips() {
        let formatter = IsoFormatter;
        let date = CivilDate::try_new(2021, 6, 1).unwrap();
        let text = ValueFormatter::<CivilDate>::format(&formatter, &date).unwrap();
        assert_eq!(text, "2021-06-01");
        assert_eq!(
            ValueFormatter::<CivilDate>::parse(&formatter, &text).unwrap(),
            date
        );
    }
}
