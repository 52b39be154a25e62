//! Compiled date/time patterns.
//!
//! Patterns use the familiar letter syntax (`yyyy-MM-dd HH:mm:ss`, `M/d/yy
//! h:mm a`, ...). A [`Pattern`] is compiled once and can then format zoned
//! values and strictly parse text back into instants.
//!
//! | Letter | Field | Example |
//! |--------|-------|---------|
//! | `G` | era | `AD` |
//! | `y` | year | `2003`, `03` |
//! | `M` | month | `1`, `01`, `Jan`, `January` |
//! | `d` | day of month | `2` |
//! | `E` | day of week | `Thu`, `Thursday` |
//! | `a` | am/pm marker | `PM` |
//! | `H` | hour (0-23) | `16` |
//! | `k` | hour (1-24) | `24` |
//! | `K` | hour (0-11) | `4` |
//! | `h` | hour (1-12) | `4` |
//! | `m` | minute | `05` |
//! | `s` | second | `09` |
//! | `S` | millisecond | `978` |
//! | `z` | zone abbreviation | `UTC` |
//! | `Z` | RFC 822 offset | `+0100` |
//! | `X` | ISO 8601 offset | `+01`, `+0100`, `+01:00`, `Z` |
//!
//! Text between single quotes is copied verbatim and `''` stands for one
//! quote. Other non-letter characters are literals.

use std::{fmt, ops::RangeInclusive, str::FromStr};

use jiff::{
    civil::DateTime,
    tz::{Offset, TimeZone},
    Timestamp, ToSpan, Zoned,
};

use crate::error::{ConversionError, Result};

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const AM_PM: [&str; 2] = ["AM", "PM"];
const ERAS: [&str; 2] = ["BC", "AD"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Era,
    Year,
    Month,
    Day,
    Weekday,
    AmPm,
    Hour0To23,
    Hour1To24,
    Hour0To11,
    Hour1To12,
    Minute,
    Second,
    Millisecond,
    ZoneName,
    ZoneRfc822,
    ZoneIso8601,
}

impl Field {
    fn from_letter(letter: char) -> Option<Self> {
        let field = match letter {
            'G' => Field::Era,
            'y' => Field::Year,
            'M' => Field::Month,
            'd' => Field::Day,
            'E' => Field::Weekday,
            'a' => Field::AmPm,
            'H' => Field::Hour0To23,
            'k' => Field::Hour1To24,
            'K' => Field::Hour0To11,
            'h' => Field::Hour1To12,
            'm' => Field::Minute,
            's' => Field::Second,
            'S' => Field::Millisecond,
            'z' => Field::ZoneName,
            'Z' => Field::ZoneRfc822,
            'X' => Field::ZoneIso8601,
            _ => return None,
        };
        Some(field)
    }

    fn is_numeric(self, width: usize) -> bool {
        match self {
            Field::Month => width < 3,
            Field::Era
            | Field::Weekday
            | Field::AmPm
            | Field::ZoneName
            | Field::ZoneRfc822
            | Field::ZoneIso8601 => false,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Field { field: Field, width: usize },
}

/// Why and where a parse stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    /// Byte offset into the input where parsing failed
    pub position: usize,
    pub reason: String,
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at position {}", self.reason, self.position)
    }
}

/// A compiled date/time pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    tokens: Vec<Token>,
}

impl Pattern {
    /// Compiles a pattern.
    ///
    /// # Errors
    ///
    /// Returns `ConversionError::InvalidPattern` for an empty pattern, an
    /// unknown pattern letter or an unterminated quote.
    pub fn compile(source: &str) -> Result<Self> {
        let invalid = |reason: String| ConversionError::invalid_pattern(source).with_reason(reason);

        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    literal.push('\'');
                    continue;
                }
                let mut closed = false;
                while let Some(quoted) = chars.next() {
                    if quoted != '\'' {
                        literal.push(quoted);
                    } else if chars.peek() == Some(&'\'') {
                        chars.next();
                        literal.push('\'');
                    } else {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(invalid("unterminated quote".to_string()));
                }
            } else if c.is_ascii_alphabetic() {
                let field = Field::from_letter(c)
                    .ok_or_else(|| invalid(format!("illegal pattern character '{c}'")))?;
                let mut width = 1;
                while chars.peek() == Some(&c) {
                    chars.next();
                    width += 1;
                }
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(Token::Field { field, width });
            } else {
                literal.push(c);
            }
        }
        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }
        if tokens.is_empty() {
            return Err(invalid("pattern is empty".to_string()));
        }

        Ok(Self {
            source: source.to_string(),
            tokens,
        })
    }

    /// The pattern text this was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Formats a zoned value.
    pub fn format(&self, zoned: &Zoned) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Field { field, width } => write_field(&mut out, *field, *width, zoned),
            }
        }
        out
    }

    /// Strictly parses `input` into an instant.
    ///
    /// Wall clock fields are interpreted in `time_zone` unless the input
    /// carries its own offset. Two-digit years place the result in the
    /// hundred years starting at `century_start`. Fields missing from the
    /// pattern default to 1970-01-01 00:00:00.000.
    pub fn parse(
        &self,
        input: &str,
        time_zone: &TimeZone,
        century_start: DateTime,
    ) -> std::result::Result<Timestamp, ParseFailure> {
        let mut fields = ParsedFields::default();
        let mut pos = 0;

        for (index, token) in self.tokens.iter().enumerate() {
            let rest = &input[pos..];
            let start = pos;
            let fail = move |reason: String| ParseFailure {
                position: start,
                reason,
            };
            match token {
                Token::Literal(text) => {
                    if !rest.starts_with(text.as_str()) {
                        return Err(fail(format!("expected '{text}'")));
                    }
                    pos += text.len();
                }
                Token::Field { field, width } if field.is_numeric(*width) => {
                    let abutting = matches!(
                        self.tokens.get(index + 1),
                        Some(Token::Field { field, width }) if field.is_numeric(*width)
                    );
                    let (value, digits) =
                        take_number(rest, abutting.then_some(*width)).map_err(fail)?;
                    fields
                        .set_numeric(*field, *width, value, digits, century_start.year())
                        .map_err(fail)?;
                    pos += digits;
                }
                Token::Field { field, width } => {
                    let consumed = fields.set_text(*field, *width, rest).map_err(fail)?;
                    pos += consumed;
                }
            }
        }

        if pos != input.len() {
            return Err(ParseFailure {
                position: pos,
                reason: format!("unparsed text '{}'", &input[pos..]),
            });
        }

        fields
            .into_timestamp(time_zone, century_start)
            .map_err(|reason| ParseFailure {
            position: pos,
            reason,
        })
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for Pattern {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::compile(s)
    }
}

fn pad(out: &mut String, value: i64, width: usize) {
    out.push_str(&format!("{value:0width$}"));
}

fn write_offset(out: &mut String, offset: Offset, separator: &str, with_minutes: bool) {
    let seconds = offset.seconds();
    let sign = if seconds < 0 { '-' } else { '+' };
    let hours = seconds.abs() / 3600;
    let minutes = seconds.abs() % 3600 / 60;
    out.push(sign);
    pad(out, i64::from(hours), 2);
    if with_minutes {
        out.push_str(separator);
        pad(out, i64::from(minutes), 2);
    }
}

fn write_field(out: &mut String, field: Field, width: usize, zoned: &Zoned) {
    let dt = zoned.datetime();
    let hour = i64::from(dt.hour());
    match field {
        Field::Era => out.push_str(ERAS[usize::from(dt.year() > 0)]),
        Field::Year => {
            let year = i64::from(dt.year());
            let year = if year <= 0 { 1 - year } else { year };
            if width == 2 {
                pad(out, year % 100, 2);
            } else {
                pad(out, year, width);
            }
        }
        Field::Month => {
            let month = usize::try_from(dt.month() - 1).unwrap_or_default();
            match width {
                1 | 2 => pad(out, i64::from(dt.month()), width),
                3 => out.push_str(&MONTHS[month][..3]),
                _ => out.push_str(MONTHS[month]),
            }
        }
        Field::Day => pad(out, i64::from(dt.day()), width),
        Field::Weekday => {
            let day = usize::try_from(dt.weekday().to_monday_zero_offset()).unwrap_or_default();
            if width >= 4 {
                out.push_str(WEEKDAYS[day]);
            } else {
                out.push_str(&WEEKDAYS[day][..3]);
            }
        }
        Field::AmPm => out.push_str(AM_PM[usize::from(hour >= 12)]),
        Field::Hour0To23 => pad(out, hour, width),
        Field::Hour1To24 => pad(out, if hour == 0 { 24 } else { hour }, width),
        Field::Hour0To11 => pad(out, hour % 12, width),
        Field::Hour1To12 => pad(out, if hour % 12 == 0 { 12 } else { hour % 12 }, width),
        Field::Minute => pad(out, i64::from(dt.minute()), width),
        Field::Second => pad(out, i64::from(dt.second()), width),
        Field::Millisecond => pad(out, i64::from(dt.subsec_nanosecond() / 1_000_000), width),
        Field::ZoneName => out.push_str(&zoned.strftime("%Z").to_string()),
        Field::ZoneRfc822 => write_offset(out, zoned.offset(), "", true),
        Field::ZoneIso8601 => {
            if zoned.offset().seconds() == 0 {
                out.push('Z');
            } else {
                let separator = if width >= 3 { ":" } else { "" };
                write_offset(out, zoned.offset(), separator, width >= 2);
            }
        }
    }
}

/// Reads leading ASCII digits, exactly `fixed` of them when given.
fn take_number(rest: &str, fixed: Option<usize>) -> std::result::Result<(i64, usize), String> {
    let available = rest.bytes().take_while(u8::is_ascii_digit).count();
    let digits = fixed.map_or(available, |width| available.min(width));
    if digits == 0 {
        return Err("expected digits".to_string());
    }
    if digits > 10 {
        return Err("number too long".to_string());
    }
    rest[..digits]
        .parse()
        .map(|value| (value, digits))
        .map_err(|e| format!("invalid number: {e}"))
}

/// Matches one of `names` case-insensitively at the start of `rest`.
fn match_name(rest: &str, names: &[&str]) -> Option<(usize, usize)> {
    names.iter().enumerate().find_map(|(index, name)| {
        rest.get(..name.len())
            .filter(|candidate| candidate.eq_ignore_ascii_case(name))
            .map(|_| (index, name.len()))
    })
}

fn match_full_or_abbreviated(rest: &str, names: &[&str]) -> Option<(usize, usize)> {
    let abbreviated: Vec<&str> = names.iter().map(|name| &name[..3]).collect();
    match_name(rest, names).or_else(|| match_name(rest, &abbreviated))
}

/// Parses `Z`, `UTC`/`GMT` with an optional offset, or a bare `+hh[[:]mm]`.
pub(crate) fn parse_offset(rest: &str) -> Option<(Offset, usize)> {
    if rest.starts_with('Z') {
        return Some((Offset::UTC, 1));
    }
    let (prefix, signed) = if let Some(name) = rest.get(..3).filter(|name| {
        name.eq_ignore_ascii_case("UTC") || name.eq_ignore_ascii_case("GMT")
    }) {
        let signed = &rest[name.len()..];
        if !signed.starts_with(['+', '-']) {
            return Some((Offset::UTC, 3));
        }
        (3, signed)
    } else {
        (0, rest)
    };

    let sign = match signed.chars().next()? {
        '+' => 1,
        '-' => -1,
        _ => return None,
    };
    let bytes = signed.as_bytes();
    let two_digits = |at: usize| -> Option<i32> {
        let pair = bytes.get(at..at + 2)?;
        if pair.iter().all(u8::is_ascii_digit) {
            Some(i32::from(pair[0] - b'0') * 10 + i32::from(pair[1] - b'0'))
        } else {
            None
        }
    };

    let hours = two_digits(1)?;
    let (minutes, consumed) = if bytes.get(3) == Some(&b':') {
        (two_digits(4)?, 6)
    } else if let Some(minutes) = two_digits(3) {
        (minutes, 5)
    } else {
        (0, 3)
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    let offset = Offset::from_seconds(sign * (hours * 3600 + minutes * 60)).ok()?;
    Some((offset, prefix + consumed))
}

fn check(name: &str, value: i64, range: RangeInclusive<i64>) -> std::result::Result<i64, String> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(format!(
            "{name} {value} outside {}..={}",
            range.start(),
            range.end()
        ))
    }
}

/// Places a two-digit year at or after the year `start`. A result equal to
/// `start` may still move a century later once the full date is known.
fn resolve_two_digit_year(two_digits: i64, start: i16) -> i64 {
    let start = i64::from(start);
    let year = start.div_euclid(100) * 100 + two_digits;
    if year < start {
        year + 100
    } else {
        year
    }
}

#[derive(Debug, Default)]
struct ParsedFields {
    before_christ: bool,
    year: Option<i64>,
    two_digit_year: bool,
    month: Option<i64>,
    day: Option<i64>,
    hour_0_to_23: Option<i64>,
    hour_1_to_24: Option<i64>,
    hour_0_to_11: Option<i64>,
    hour_1_to_12: Option<i64>,
    pm: Option<bool>,
    minute: Option<i64>,
    second: Option<i64>,
    millisecond: Option<i64>,
    offset: Option<Offset>,
    zone_name: Option<String>,
}

impl ParsedFields {
    fn set_numeric(
        &mut self,
        field: Field,
        width: usize,
        value: i64,
        digits: usize,
        century_start_year: i16,
    ) -> std::result::Result<(), String> {
        match field {
            Field::Year => {
                self.two_digit_year = width <= 2 && digits == 2;
                self.year = Some(if self.two_digit_year {
                    resolve_two_digit_year(value, century_start_year)
                } else {
                    value
                });
            }
            Field::Month => self.month = Some(check("month", value, 1..=12)?),
            Field::Day => self.day = Some(check("day", value, 1..=31)?),
            Field::Hour0To23 => self.hour_0_to_23 = Some(check("hour", value, 0..=23)?),
            Field::Hour1To24 => self.hour_1_to_24 = Some(check("hour", value, 1..=24)?),
            Field::Hour0To11 => self.hour_0_to_11 = Some(check("hour", value, 0..=11)?),
            Field::Hour1To12 => self.hour_1_to_12 = Some(check("hour", value, 1..=12)?),
            Field::Minute => self.minute = Some(check("minute", value, 0..=59)?),
            Field::Second => self.second = Some(check("second", value, 0..=59)?),
            Field::Millisecond => self.millisecond = Some(check("millisecond", value, 0..=999)?),
            _ => return Err(format!("{field:?} is not numeric")),
        }
        Ok(())
    }

    fn set_text(
        &mut self,
        field: Field,
        width: usize,
        rest: &str,
    ) -> std::result::Result<usize, String> {
        match field {
            Field::Month if width >= 3 => {
                let (index, len) = match_full_or_abbreviated(rest, &MONTHS)
                    .ok_or_else(|| "expected month name".to_string())?;
                self.month = Some(index as i64 + 1);
                Ok(len)
            }
            Field::Weekday => match_full_or_abbreviated(rest, &WEEKDAYS)
                .map(|(_, len)| len)
                .ok_or_else(|| "expected day name".to_string()),
            Field::AmPm => {
                let (index, len) =
                    match_name(rest, &AM_PM).ok_or_else(|| "expected AM or PM".to_string())?;
                self.pm = Some(index == 1);
                Ok(len)
            }
            Field::Era => {
                let (index, len) =
                    match_name(rest, &ERAS).ok_or_else(|| "expected AD or BC".to_string())?;
                self.before_christ = index == 0;
                Ok(len)
            }
            Field::ZoneName => {
                if let Some((offset, len)) = parse_offset(rest) {
                    self.offset = Some(offset);
                    return Ok(len);
                }
                let len = rest
                    .bytes()
                    .take_while(|b| b.is_ascii_alphabetic() || matches!(b, b'/' | b'_'))
                    .count();
                if len == 0 {
                    return Err("expected time zone".to_string());
                }
                self.zone_name = Some(rest[..len].to_string());
                Ok(len)
            }
            Field::ZoneRfc822 | Field::ZoneIso8601 => {
                let (offset, len) =
                    parse_offset(rest).ok_or_else(|| "expected time zone offset".to_string())?;
                self.offset = Some(offset);
                Ok(len)
            }
            _ => Err(format!("{field:?} is not textual")),
        }
    }

    fn hour(&self) -> i64 {
        let pm_shift = if self.pm == Some(true) { 12 } else { 0 };
        if let Some(hour) = self.hour_0_to_23 {
            hour
        } else if let Some(hour) = self.hour_1_to_24 {
            hour % 24
        } else if let Some(hour) = self.hour_1_to_12 {
            hour % 12 + pm_shift
        } else if let Some(hour) = self.hour_0_to_11 {
            hour + pm_shift
        } else {
            pm_shift
        }
    }

    fn into_timestamp(
        self,
        time_zone: &TimeZone,
        century_start: DateTime,
    ) -> std::result::Result<Timestamp, String> {
        let year = self.year.unwrap_or(1970);
        let year = if self.before_christ { 1 - year } else { year };
        let year = check("year", year, -9999..=9999)?;

        let datetime = DateTime::new(
            year as i16,
            self.month.unwrap_or(1) as i8,
            self.day.unwrap_or(1) as i8,
            self.hour() as i8,
            self.minute.unwrap_or(0) as i8,
            self.second.unwrap_or(0) as i8,
            (self.millisecond.unwrap_or(0) * 1_000_000) as i32,
        )
        .map_err(|e| e.to_string())?;
        let datetime = if self.two_digit_year && datetime < century_start {
            datetime
                .checked_add(100.years())
                .map_err(|e| e.to_string())?
        } else {
            datetime
        };

        let zone = match (self.offset, self.zone_name) {
            (Some(offset), _) => TimeZone::fixed(offset),
            (None, Some(name)) => return resolve_zone_name(datetime, &name, time_zone),
            (None, None) => time_zone.clone(),
        };
        datetime
            .to_zoned(zone)
            .map(|zoned| zoned.timestamp())
            .map_err(|e| e.to_string())
    }
}

/// Places `datetime` in the zone called `name`.
///
/// `name` may be the IANA name of `time_zone`, the abbreviation `time_zone`
/// uses at that wall clock time (`CET`, `CEST`), or any other IANA name.
fn resolve_zone_name(
    datetime: DateTime,
    name: &str,
    time_zone: &TimeZone,
) -> std::result::Result<Timestamp, String> {
    let zone = if time_zone.iana_name() == Some(name) {
        time_zone.clone()
    } else {
        let abbreviated = [
            time_zone.to_ambiguous_zoned(datetime).earlier(),
            time_zone.to_ambiguous_zoned(datetime).later(),
        ]
        .into_iter()
        .flatten()
        .find(|zoned| zoned.strftime("%Z").to_string() == name);
        if let Some(zoned) = abbreviated {
            return Ok(zoned.timestamp());
        }
        TimeZone::get(name).map_err(|_| format!("unknown time zone '{name}'"))?
    };
    datetime
        .to_zoned(zone)
        .map(|zoned| zoned.timestamp())
        .map_err(|e| e.to_string())
}
