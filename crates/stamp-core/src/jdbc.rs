//! Default string forms used when locale formatting is off.
//!
//! These are the JDBC escape forms: `yyyy-[m]m-[d]d hh:mm:ss[.f...]` for
//! timestamps, `yyyy-[m]m-[d]d` for dates and `hh:mm:ss` for times. Clock
//! fields also accept a single digit, so `2003-01-02 1:05:00` parses.

use jiff::civil::{Date, DateTime, Time};

use crate::{
    error::{ConversionError, Result},
    value::TargetType,
};

pub const TIMESTAMP_FORMAT: &str = "yyyy-[m]m-[d]d hh:mm:ss[.f...]";
pub const DATE_FORMAT: &str = "yyyy-[m]m-[d]d";
pub const TIME_FORMAT: &str = "hh:mm:ss";

fn number(part: &str, widths: std::ops::RangeInclusive<usize>) -> Option<i64> {
    if widths.contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit()) {
        part.parse().ok()
    } else {
        None
    }
}

fn date_fields(input: &str) -> Option<Date> {
    let mut parts = input.split('-');
    let year = number(parts.next()?, 4..=4)?;
    let month = number(parts.next()?, 1..=2)?;
    let day = number(parts.next()?, 1..=2)?;
    if parts.next().is_some() {
        return None;
    }
    Date::new(year as i16, month as i8, day as i8).ok()
}

fn time_fields(input: &str, allow_fraction: bool) -> Option<Time> {
    let (clock, fraction) = match input.split_once('.') {
        Some((clock, fraction)) if allow_fraction => (clock, Some(fraction)),
        Some(_) => return None,
        None => (input, None),
    };

    let mut parts = clock.split(':');
    let hour = number(parts.next()?, 1..=2)?;
    let minute = number(parts.next()?, 1..=2)?;
    let second = number(parts.next()?, 1..=2)?;
    if parts.next().is_some() {
        return None;
    }

    let nanos = match fraction {
        Some(fraction) => {
            let digits = number(fraction, 1..=9)?;
            let scale = 10_i64.pow(9 - fraction.len() as u32);
            digits * scale
        }
        None => 0,
    };

    Time::new(hour as i8, minute as i8, second as i8, nanos as i32).ok()
}

/// Parses `yyyy-[m]m-[d]d hh:mm:ss[.f...]` with up to nine fraction digits.
///
/// # Errors
///
/// Returns `ConversionError::InvalidJdbc` if the text is not in that form or
/// names an impossible date or time.
pub fn parse_timestamp(input: &str) -> Result<DateTime> {
    input
        .split_once(' ')
        .and_then(|(date, time)| Some(date_fields(date)?.to_datetime(time_fields(time, true)?)))
        .ok_or_else(|| ConversionError::InvalidJdbc {
            input: input.to_string(),
            target: TargetType::Timestamp,
            expected: TIMESTAMP_FORMAT,
        })
}

/// Parses `yyyy-[m]m-[d]d`.
///
/// # Errors
///
/// Returns `ConversionError::InvalidJdbc` on malformed text.
pub fn parse_date(input: &str) -> Result<Date> {
    date_fields(input).ok_or_else(|| ConversionError::InvalidJdbc {
        input: input.to_string(),
        target: TargetType::Date,
        expected: DATE_FORMAT,
    })
}

/// Parses `hh:mm:ss`.
///
/// # Errors
///
/// Returns `ConversionError::InvalidJdbc` on malformed text.
pub fn parse_time(input: &str) -> Result<Time> {
    time_fields(input, false).ok_or_else(|| ConversionError::InvalidJdbc {
        input: input.to_string(),
        target: TargetType::Time,
        expected: TIME_FORMAT,
    })
}

/// Formats `yyyy-mm-dd hh:mm:ss.f`, trimming trailing fraction zeros but
/// keeping at least one digit.
pub fn format_timestamp(datetime: DateTime) -> String {
    let nanos = datetime.subsec_nanosecond();
    let fraction = if nanos == 0 {
        "0".to_string()
    } else {
        format!("{nanos:09}").trim_end_matches('0').to_string()
    };
    format!(
        "{} {}.{fraction}",
        format_date(datetime.date()),
        format_time(datetime.time())
    )
}

pub fn format_date(date: Date) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

pub fn format_time(time: Time) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        time.hour(),
        time.minute(),
        time.second()
    )
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, time};

    use super::*;

    #[test]
    fn test_parse_timestamp_forms() {
        assert_eq!(
            parse_timestamp("2003-01-02 16:05:00").unwrap(),
            date(2003, 1, 2).at(16, 5, 0, 0)
        );
        assert_eq!(
            parse_timestamp("2003-1-2 16:05:00.5").unwrap(),
            date(2003, 1, 2).at(16, 5, 0, 500_000_000)
        );
        assert_eq!(
            parse_timestamp("2003-01-02 16:05:00.123456789").unwrap(),
            date(2003, 1, 2).at(16, 5, 0, 123_456_789)
        );
        assert_eq!(
            parse_timestamp("2003-01-02 1:05:00").unwrap(),
            date(2003, 1, 2).at(1, 5, 0, 0)
        );
    }

    #[test]
    fn test_parse_timestamp_rejects_other_forms() {
        for input in [
            "2003-01-02",
            "2003-01-02T16:05:00",
            "03-01-02 16:05:00",
            "2003-01-02 16:05",
            "2003-13-02 16:05:00",
            "2003-01-02 16:05:00.1234567890",
            "1/2/03 4:05 PM",
        ] {
            let err = parse_timestamp(input).unwrap_err();
            assert!(
                matches!(err, ConversionError::InvalidJdbc { target: TargetType::Timestamp, .. }),
                "{input}: {err}"
            );
        }
    }

    #[test]
    fn test_parse_date_and_time() {
        assert_eq!(parse_date("2003-1-2").unwrap(), date(2003, 1, 2));
        assert!(parse_date("2003-02-30").is_err());
        assert_eq!(parse_time("16:05:09").unwrap(), time(16, 5, 9, 0));
        assert_eq!(parse_time("4:5:9").unwrap(), time(4, 5, 9, 0));
        assert!(parse_time("16:05:09.5").is_err());
        assert!(parse_time("160:05:09").is_err());
        assert!(parse_time("4:05 PM").is_err());
    }

    #[test]
    fn test_format_timestamp_trims_fraction() {
        assert_eq!(
            format_timestamp(date(2003, 1, 2).at(16, 5, 0, 0)),
            "2003-01-02 16:05:00.0"
        );
        assert_eq!(
            format_timestamp(date(2003, 1, 2).at(16, 5, 0, 120_000_000)),
            "2003-01-02 16:05:00.12"
        );
        assert_eq!(
            format_timestamp(date(2003, 1, 2).at(16, 5, 0, 1)),
            "2003-01-02 16:05:00.000000001"
        );
    }

    #[test]
    fn test_format_date_and_time() {
        assert_eq!(format_date(date(987, 6, 5)), "0987-06-05");
        assert_eq!(format_time(time(4, 5, 6, 0)), "04:05:06");
    }
}
