//! The generic date/time conversion engine.
//!
//! A [`DateTimeConverter`] owns the conversion policy: default values,
//! locale versus default string forms, pattern lists and time zones. The
//! type-specific parts (which type a converter produces and how its locale
//! formatter looks) come from a [`FormatProvider`].
//!
//! ```rust
//! use stamp_core::{TargetType, TimestampConverter, Value};
//!
//! let converter = TimestampConverter::builder()
//!     .with_pattern("yyyy-MM-dd HH:mm")
//!     .with_time_zone(jiff::tz::TimeZone::UTC)
//!     .build_timestamp()?;
//!
//! let value = converter.convert("2003-01-02 16:05")?;
//! assert_eq!(value.to_string(), "2003-01-02T16:05:00Z");
//!
//! let text = converter.convert_to(TargetType::String, value)?;
//! assert_eq!(text, Value::from("2003-01-02 16:05"));
//! # Ok::<(), stamp_core::ConversionError>(())
//! ```

mod builder;


use std::fmt;

use jiff::{
    civil::{self, Date},
    tz::TimeZone,
    Timestamp,
};
use log::debug;

pub use self::builder::ConverterBuilder;
use crate::{
    error::{ConversionError, RangeResultExt, Result},
    format::{zone_name, DateTimeFormat},
    jdbc,
    locale::Locale,
    pattern::Pattern,
    value::{TargetType, Value},
};

/// Calendar date a bare time of day is placed on.
const EPOCH_DATE: Date = civil::date(1970, 1, 1);

/// Type-specific policy plugged into a [`DateTimeConverter`].
pub trait FormatProvider {
    /// The type produced when no target type is requested.
    fn default_type(&self) -> TargetType;

    /// Builds a fresh formatter for the locale and time zone.
    ///
    /// An absent locale means the system default locale, an absent time zone
    /// the system time zone.
    fn format(&self, locale: Option<&Locale>, time_zone: Option<&TimeZone>) -> DateTimeFormat;

    /// Name used when describing a converter.
    fn name(&self) -> &'static str {
        "DateTimeConverter"
    }
}

/// What a converter does when a value is missing or cannot be converted.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DefaultPolicy {
    /// Return the error
    #[default]
    Error,
    /// Return this value instead, converted to the requested type
    Value(Value),
}

/// Converts values to and from date/time types.
#[derive(Debug, Clone)]
pub struct DateTimeConverter<P> {
    provider: P,
    default: DefaultPolicy,
    use_locale_format: bool,
    locale: Option<Locale>,
    time_zone: Option<TimeZone>,
    patterns: Vec<Pattern>,
}

impl<P: FormatProvider> DateTimeConverter<P> {
    /// Creates a converter that returns errors and uses the default string
    /// forms.
    pub fn from_provider(provider: P) -> Self {
        Self {
            provider,
            default: DefaultPolicy::Error,
            use_locale_format: false,
            locale: None,
            time_zone: None,
            patterns: Vec::new(),
        }
    }

    /// Switches the converter to return `value` on missing input or failed
    /// conversions.
    ///
    /// The value is converted to the provider's default type first;
    /// `Value::Null` is kept as is.
    ///
    /// # Errors
    ///
    /// Returns the conversion error if `value` cannot be converted.
    pub fn with_default_value(mut self, value: impl Into<Value>) -> Result<Self> {
        self.default = DefaultPolicy::Error;
        let value = value.into().into_scalar();
        let default = if value.is_null() {
            Value::Null
        } else {
            self.convert(value)?
        };
        self.default = DefaultPolicy::Value(default);
        Ok(self)
    }

    /// Sets the locale and switches on locale formatting.
    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = Some(locale);
        self.use_locale_format = true;
    }

    /// Sets the zone used for civil values, the JDBC forms and formatters
    /// instead of the system zone.
    pub fn set_time_zone(&mut self, time_zone: TimeZone) {
        self.time_zone = Some(time_zone);
    }

    /// Replaces the pattern list and switches on locale formatting.
    ///
    /// Parsing tries the patterns in order; formatting uses the first.
    ///
    /// # Errors
    ///
    /// Returns `ConversionError::InvalidPattern` if any pattern does not
    /// compile. The converter is left unchanged in that case.
    pub fn set_patterns<S: AsRef<str>>(&mut self, patterns: &[S]) -> Result<()> {
        let compiled = patterns
            .iter()
            .map(|pattern| Pattern::compile(pattern.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        self.patterns = compiled;
        self.use_locale_format = true;
        Ok(())
    }

    /// Chooses between locale/pattern text and the JDBC escape forms.
    pub fn set_use_locale_format(&mut self, use_locale_format: bool) {
        self.use_locale_format = use_locale_format;
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn default_policy(&self) -> &DefaultPolicy {
        &self.default
    }

    pub fn is_use_default(&self) -> bool {
        matches!(self.default, DefaultPolicy::Value(_))
    }

    pub fn use_locale_format(&self) -> bool {
        self.use_locale_format
    }

    pub fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }

    pub fn time_zone(&self) -> Option<&TimeZone> {
        self.time_zone.as_ref()
    }

    pub fn patterns(&self) -> Vec<&str> {
        self.patterns.iter().map(Pattern::as_str).collect()
    }

    /// The formatter used for locale formatting when no pattern is set.
    pub fn locale_format(&self) -> DateTimeFormat {
        self.provider
            .format(self.locale.as_ref(), self.time_zone.as_ref())
    }

    /// Converts to the provider's default type.
    ///
    /// # Errors
    ///
    /// See [`DateTimeConverter::convert_to`].
    pub fn convert(&self, value: impl Into<Value>) -> Result<Value> {
        self.convert_to(self.provider.default_type(), value)
    }

    /// Converts a value to `target`.
    ///
    /// Lists contribute their first element. Missing values and failures
    /// fall back to the default value when one is configured. Values already
    /// of the target type are returned unchanged.
    ///
    /// # Errors
    ///
    /// Without a default value: `ConversionError::Missing` for a missing
    /// value (except for a `String` target, which yields `Value::Null`), and
    /// the parse or range error of a failed conversion.
    pub fn convert_to(&self, target: TargetType, value: impl Into<Value>) -> Result<Value> {
        let value = value.into().into_scalar();
        if value.is_null() {
            return self.handle_missing(target);
        }

        let result = if target == TargetType::String {
            self.string_of(&value)
        } else if value.target_type() == Some(target) {
            Ok(value.clone())
        } else {
            self.convert_to_type(target, &value)
        };

        result.or_else(|err| self.handle_error(target, &value, err))
    }

    /// Converts to an instant, `None` when the default value is null.
    ///
    /// # Errors
    ///
    /// See [`DateTimeConverter::convert_to`].
    pub fn to_timestamp(&self, value: impl Into<Value>) -> Result<Option<Timestamp>> {
        match self.convert_to(TargetType::Timestamp, value)? {
            Value::Null => Ok(None),
            converted => Ok(converted.as_timestamp()),
        }
    }

    /// Converts to a display string, `None` for a missing value.
    ///
    /// # Errors
    ///
    /// See [`DateTimeConverter::convert_to`].
    pub fn to_display_string(&self, value: impl Into<Value>) -> Result<Option<String>> {
        match self.convert_to(TargetType::String, value)? {
            Value::String(text) => Ok(Some(text)),
            _ => Ok(None),
        }
    }

    fn zone(&self) -> TimeZone {
        self.time_zone.clone().unwrap_or_else(TimeZone::system)
    }

    fn pattern_format(&self, pattern: &Pattern) -> DateTimeFormat {
        let format = DateTimeFormat::new(pattern.clone(), self.locale.clone().unwrap_or_default());
        match &self.time_zone {
            Some(time_zone) => format.with_time_zone(time_zone.clone()),
            None => format,
        }
    }

    /// The instant a temporal value denotes; civil values are read in the
    /// configured time zone.
    fn instant_of(&self, value: &Value) -> Result<Option<Timestamp>> {
        let timestamp = match value {
            Value::Timestamp(timestamp) => *timestamp,
            Value::Zoned(zoned) => zoned.timestamp(),
            Value::Integer(millis) => {
                Timestamp::from_millisecond(*millis).range_context("epoch milliseconds")?
            }
            Value::DateTime(datetime) => datetime
                .to_zoned(self.zone())
                .range_context("date-time")?
                .timestamp(),
            Value::Date(date) => date.to_zoned(self.zone()).range_context("date")?.timestamp(),
            Value::Time(time) => EPOCH_DATE
                .to_datetime(*time)
                .to_zoned(self.zone())
                .range_context("time")?
                .timestamp(),
            Value::Null | Value::String(_) | Value::List(_) => return Ok(None),
        };
        Ok(Some(timestamp))
    }

    fn instant_to(&self, target: TargetType, timestamp: Timestamp) -> Result<Value> {
        let zoned = timestamp.to_zoned(self.zone());
        let value = match target {
            TargetType::Timestamp => Value::Timestamp(timestamp),
            TargetType::Zoned => Value::Zoned(zoned),
            TargetType::Date => Value::Date(zoned.date()),
            TargetType::Time => Value::Time(zoned.time()),
            TargetType::String => return self.string_of(&Value::Timestamp(timestamp)),
        };
        Ok(value)
    }

    fn convert_to_type(&self, target: TargetType, value: &Value) -> Result<Value> {
        if let Value::String(text) = value {
            return self.parse_text(target, text);
        }
        match self.instant_of(value)? {
            Some(timestamp) => self.instant_to(target, timestamp),
            None => Err(ConversionError::Missing { target }),
        }
    }

    fn parse_text(&self, target: TargetType, text: &str) -> Result<Value> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ConversionError::Missing { target });
        }

        if self.use_locale_format {
            let timestamp = self.parse_localized(target, text)?;
            return self.instant_to(target, timestamp);
        }

        match target {
            TargetType::Timestamp => {
                let datetime = jdbc::parse_timestamp(text)?;
                let zoned = datetime.to_zoned(self.zone()).range_context("timestamp")?;
                Ok(Value::Timestamp(zoned.timestamp()))
            }
            TargetType::Zoned => match jdbc::parse_timestamp(text) {
                Ok(datetime) => Ok(Value::Zoned(
                    datetime.to_zoned(self.zone()).range_context("timestamp")?,
                )),
                Err(err) => text.parse().map(Value::Zoned).map_err(|_| err),
            },
            TargetType::Date => Ok(Value::Date(jdbc::parse_date(text)?)),
            TargetType::Time => Ok(Value::Time(jdbc::parse_time(text)?)),
            TargetType::String => Ok(Value::String(text.to_string())),
        }
    }

    /// Tries each pattern in order, or the provider's formatter when there
    /// are none. Reports the first failure when nothing matches.
    fn parse_localized(&self, target: TargetType, text: &str) -> Result<Timestamp> {
        if self.patterns.is_empty() {
            let format = self.locale_format();
            debug!(
                "{}: parsing '{}' with locale format '{}'",
                self.provider.name(),
                text,
                format.pattern()
            );
            return format.parse(text, target);
        }

        let mut first_error = None;
        for pattern in &self.patterns {
            match self.pattern_format(pattern).parse(text, target) {
                Ok(timestamp) => return Ok(timestamp),
                Err(err) => {
                    debug!(
                        "{}: '{}' does not match '{}'",
                        self.provider.name(),
                        text,
                        pattern
                    );
                    first_error.get_or_insert(err);
                }
            }
        }
        Err(first_error.unwrap_or(ConversionError::Missing { target }))
    }

    fn string_of(&self, value: &Value) -> Result<Value> {
        if self.use_locale_format {
            if let Some(timestamp) = self.instant_of(value)? {
                let format = match self.patterns.first() {
                    Some(pattern) => self.pattern_format(pattern),
                    None => self.locale_format(),
                };
                return Ok(Value::String(format.format(timestamp)));
            }
        }

        let text = match value {
            Value::Timestamp(timestamp) => {
                jdbc::format_timestamp(timestamp.to_zoned(self.zone()).datetime())
            }
            Value::DateTime(datetime) => jdbc::format_timestamp(*datetime),
            Value::Date(date) => jdbc::format_date(*date),
            Value::Time(time) => jdbc::format_time(*time),
            other => other.to_string(),
        };
        Ok(Value::String(text))
    }

    fn handle_missing(&self, target: TargetType) -> Result<Value> {
        match &self.default {
            _ if target == TargetType::String => Ok(Value::Null),
            DefaultPolicy::Value(Value::Null) => Ok(Value::Null),
            DefaultPolicy::Value(default) if default.target_type() == Some(target) => {
                Ok(default.clone())
            }
            DefaultPolicy::Value(default) => self.convert_to_type(target, default),
            DefaultPolicy::Error => Err(ConversionError::Missing { target }),
        }
    }

    fn handle_error(&self, target: TargetType, value: &Value, err: ConversionError) -> Result<Value> {
        match self.default {
            DefaultPolicy::Value(_) => {
                debug!(
                    "{}: converting {} to {} failed, using default: {}",
                    self.provider.name(),
                    value.kind(),
                    target,
                    err
                );
                self.handle_missing(target)
            }
            DefaultPolicy::Error => Err(err),
        }
    }
}

impl<P: FormatProvider> fmt::Display for DateTimeConverter<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[UseDefault={}, UseLocaleFormat={}",
            self.provider.name(),
            self.is_use_default(),
            self.use_locale_format
        )?;
        if !self.patterns.is_empty() {
            write!(f, ", Patterns={{{}}}", self.patterns().join(", "))?;
        }
        if let Some(locale) = &self.locale {
            write!(f, ", Locale={locale}")?;
        }
        if let Some(time_zone) = &self.time_zone {
            write!(f, ", TimeZone={}", zone_name(time_zone))?;
        }
        f.write_str("]")
    }
}
