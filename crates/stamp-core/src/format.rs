//! Configured date/time formatters.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp, ToSpan, Zoned};

use crate::{
    error::{ConversionError, Result},
    locale::Locale,
    pattern::{parse_offset, Pattern},
    value::TargetType,
};

/// How far before now the two-digit year window starts by default.
const TWO_DIGIT_YEAR_LOOKBACK_YEARS: i32 = 80;

/// A pattern bound to a locale and a time zone.
///
/// Each formatter is built for one use. Converters never cache or share
/// them, so callers can adjust one freely with the `with_*` methods.
#[derive(Debug, Clone)]
pub struct DateTimeFormat {
    pattern: Pattern,
    locale: Locale,
    time_zone: TimeZone,
    two_digit_year_start: Timestamp,
}

impl DateTimeFormat {
    /// Creates a formatter for a compiled pattern in the system time zone.
    pub fn new(pattern: Pattern, locale: Locale) -> Self {
        let time_zone = TimeZone::system();
        let two_digit_year_start = Timestamp::now()
            .to_zoned(time_zone.clone())
            .checked_sub(TWO_DIGIT_YEAR_LOOKBACK_YEARS.years())
            .map_or(Timestamp::MIN, |start| start.timestamp());
        Self {
            pattern,
            locale,
            time_zone,
            two_digit_year_start,
        }
    }

    /// Creates a formatter from pattern text.
    ///
    /// # Errors
    ///
    /// Returns `ConversionError::InvalidPattern` if the pattern does not
    /// compile.
    pub fn from_pattern(pattern: &str, locale: Locale) -> Result<Self> {
        Ok(Self::new(Pattern::compile(pattern)?, locale))
    }

    /// Creates the short date + short time formatter of `locale`.
    ///
    /// # Panics
    ///
    /// Never in practice: every built-in short style is a valid pattern.
    pub fn short(locale: Locale) -> Self {
        let pattern = Pattern::compile(&locale.short_style().date_time())
            .unwrap_or_else(|e| unreachable!("built-in short pattern failed to compile: {e}"));
        Self::new(pattern, locale)
    }

    /// Binds the formatter to a time zone.
    pub fn with_time_zone(mut self, time_zone: TimeZone) -> Self {
        self.time_zone = time_zone;
        self
    }

    /// Sets the instant where the hundred-year window two-digit years are
    /// parsed into starts. Defaults to eighty years before now.
    pub fn with_two_digit_year_start(mut self, start: Timestamp) -> Self {
        self.two_digit_year_start = start;
        self
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn time_zone(&self) -> &TimeZone {
        &self.time_zone
    }

    pub fn two_digit_year_start(&self) -> Timestamp {
        self.two_digit_year_start
    }

    /// Formats an instant in this formatter's time zone.
    pub fn format(&self, timestamp: Timestamp) -> String {
        self.format_zoned(&timestamp.to_zoned(self.time_zone.clone()))
    }

    /// Formats a zoned value using its own time zone.
    pub fn format_zoned(&self, zoned: &Zoned) -> String {
        self.pattern.format(zoned)
    }

    /// Strictly parses text into an instant.
    ///
    /// # Errors
    ///
    /// Returns `ConversionError::Parse` naming `target` if the text does not
    /// match the pattern exactly or describes an impossible date.
    pub fn parse(&self, input: &str, target: TargetType) -> Result<Timestamp> {
        self.pattern
            .parse(
                input,
                &self.time_zone,
                self.two_digit_year_start
                    .to_zoned(self.time_zone.clone())
                    .datetime(),
            )
            .map_err(|failure| {
                ConversionError::parse(input, target)
                    .with_pattern(self.pattern.as_str(), failure.to_string())
            })
    }
}

impl fmt::Display for DateTimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {})",
            self.pattern,
            self.locale,
            zone_name(&self.time_zone)
        )
    }
}

/// IANA name of a time zone, or its current offset when it has none.
pub fn zone_name(time_zone: &TimeZone) -> String {
    match time_zone.iana_name() {
        Some(name) => name.to_string(),
        None => time_zone.to_offset(Timestamp::now()).to_string(),
    }
}

/// Resolves a time zone name.
///
/// Accepts `UTC`/`GMT`/`Z`, `system`/`local`, fixed offsets such as
/// `+01:00` or `-0500`, and IANA names like `Europe/Paris`.
///
/// # Errors
///
/// Returns `ConversionError::InvalidTimeZone` if the name is not found in the
/// time zone database.
pub fn parse_time_zone(name: &str) -> Result<TimeZone> {
    let name = name.trim();
    if ["UTC", "GMT", "Z"]
        .iter()
        .any(|utc| name.eq_ignore_ascii_case(utc))
    {
        return Ok(TimeZone::UTC);
    }
    if name.eq_ignore_ascii_case("system") || name.eq_ignore_ascii_case("local") {
        return Ok(TimeZone::system());
    }
    if name.starts_with(['+', '-']) {
        if let Some((offset, consumed)) = parse_offset(name) {
            if consumed == name.len() {
                return Ok(TimeZone::fixed(offset));
            }
        }
    }
    TimeZone::get(name).map_err(|source| ConversionError::InvalidTimeZone {
        name: name.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use jiff::{civil::date, tz};

    use super::*;

    #[test]
    fn test_short_formatter_for_locale() {
        let format = DateTimeFormat::short(Locale::france()).with_time_zone(TimeZone::UTC);
        assert_eq!(format.pattern(), "dd/MM/yy HH:mm");
        assert_eq!(format.locale(), &Locale::france());

        let ts = date(2003, 1, 2)
            .at(16, 5, 0, 0)
            .to_zoned(TimeZone::UTC)
            .unwrap()
            .timestamp();
        assert_eq!(format.format(ts), "02/01/03 16:05");
    }

    #[test]
    fn test_format_applies_time_zone() {
        let format = DateTimeFormat::from_pattern("yyyy-MM-dd HH:mm", Locale::us())
            .unwrap()
            .with_time_zone(TimeZone::fixed(tz::offset(-5)));
        let ts = date(2003, 1, 2)
            .at(3, 0, 0, 0)
            .to_zoned(TimeZone::UTC)
            .unwrap()
            .timestamp();
        assert_eq!(format.format(ts), "2003-01-01 22:00");
    }

    #[test]
    fn test_parse_error_names_pattern_and_target() {
        let format = DateTimeFormat::short(Locale::us()).with_time_zone(TimeZone::UTC);
        let err = format.parse("2003-01-02", TargetType::Timestamp).unwrap_err();
        match err {
            ConversionError::Parse {
                input,
                target,
                pattern,
                ..
            } => {
                assert_eq!(input, "2003-01-02");
                assert_eq!(target, TargetType::Timestamp);
                assert_eq!(pattern, "M/d/yy h:mm a");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    fn offset_seconds(time_zone: &TimeZone) -> i32 {
        time_zone.to_offset(Timestamp::UNIX_EPOCH).seconds()
    }

    #[test]
    fn test_parse_time_zone_names() {
        assert_eq!(offset_seconds(&parse_time_zone("utc").unwrap()), 0);
        assert_eq!(parse_time_zone("Z").unwrap().iana_name(), Some("UTC"));
        assert_eq!(offset_seconds(&parse_time_zone("+01:00").unwrap()), 3600);
        assert_eq!(offset_seconds(&parse_time_zone("-0500").unwrap()), -18000);
        assert!(matches!(
            parse_time_zone("Not/AZone"),
            Err(ConversionError::InvalidTimeZone { .. })
        ));
        assert!(parse_time_zone("+01:00junk").is_err());
    }

    #[test]
    fn test_zone_name_of_fixed_zone_is_offset() {
        assert_eq!(zone_name(&TimeZone::UTC), "UTC");
        assert!(zone_name(&TimeZone::fixed(tz::offset(2))).starts_with("+02"));
    }

    #[test]
    fn test_two_digit_year_start_defaults_to_eighty_years_back() {
        let before = Timestamp::now();
        let format = DateTimeFormat::short(Locale::us());
        let start = format.two_digit_year_start().to_zoned(TimeZone::system());
        let expected_year = before.to_zoned(TimeZone::system()).year() - 80;
        assert!((expected_year..=expected_year + 1).contains(&start.year()));

        let start_1900 = date(1900, 1, 1).to_zoned(TimeZone::UTC).unwrap().timestamp();
        let format = format
            .with_two_digit_year_start(start_1900)
            .with_time_zone(TimeZone::UTC);
        let parsed = format.parse("1/2/03 4:05 PM", TargetType::Timestamp).unwrap();
        assert_eq!(
            parsed,
            date(1903, 1, 2)
                .at(16, 5, 0, 0)
                .to_zoned(TimeZone::UTC)
                .unwrap()
                .timestamp()
        );
    }

    #[test]
    fn test_two_digit_year_window_starts_at_an_instant() {
        let start = date(1946, 10, 17)
            .at(12, 0, 0, 0)
            .to_zoned(TimeZone::UTC)
            .unwrap()
            .timestamp();
        let format = DateTimeFormat::from_pattern("yy-MM-dd", Locale::us())
            .unwrap()
            .with_time_zone(TimeZone::UTC)
            .with_two_digit_year_start(start);
        let year_of = |text| {
            format
                .parse(text, TargetType::Timestamp)
                .unwrap()
                .to_zoned(TimeZone::UTC)
                .year()
        };

        assert_eq!(year_of("46-01-01"), 2046);
        assert_eq!(year_of("46-12-01"), 1946);
        assert_eq!(year_of("45-12-31"), 2045);
    }
}
