//! Builder for creating and configuring converter instances.

use jiff::tz::TimeZone;

use super::{DateTimeConverter, FormatProvider};
use crate::{
    config::ConverterConfig,
    error::Result,
    format::parse_time_zone,
    locale::Locale,
    value::Value,
};

/// Builder for creating and configuring converter instances.
///
/// Settings given directly take precedence over those of a loaded
/// [`ConverterConfig`].
#[derive(Debug, Clone, Default)]
pub struct ConverterBuilder {
    config: Option<ConverterConfig>,
    locale: Option<Locale>,
    time_zone: Option<TimeZone>,
    patterns: Vec<String>,
    use_locale_format: Option<bool>,
    default: Option<Value>,
}

impl ConverterBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a configuration as the base layer.
    pub fn with_config(mut self, config: Option<ConverterConfig>) -> Self {
        self.config = config;
        self
    }

    /// Sets the locale. Switches on locale formatting.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    /// Sets the time zone, overriding a configured zone name.
    pub fn with_time_zone(mut self, time_zone: TimeZone) -> Self {
        self.time_zone = Some(time_zone);
        self
    }

    /// Adds a pattern. Switches on locale formatting.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push(pattern.into());
        self
    }

    /// Explicitly turns locale formatting on or off, overriding what locale
    /// and pattern settings imply.
    pub fn with_use_locale_format(mut self, use_locale_format: bool) -> Self {
        self.use_locale_format = Some(use_locale_format);
        self
    }

    /// Makes the converter return `value` instead of failing.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Builds the configured converter.
    ///
    /// # Errors
    ///
    /// Returns `ConversionError::InvalidPattern` if a pattern does not compile
    /// Returns `ConversionError::InvalidTimeZone` if a configured time zone
    /// name is unknown
    /// Returns the conversion error if the default value cannot be converted
    pub fn build<P: FormatProvider>(self, provider: P) -> Result<DateTimeConverter<P>> {
        let config = self.config.unwrap_or_default();
        let default = self.default.or_else(|| config.default_value());
        let mut converter = DateTimeConverter::from_provider(provider);

        if let Some(locale) = self.locale.or(config.locale) {
            converter.set_locale(locale);
        }

        let time_zone = match self.time_zone {
            Some(time_zone) => Some(time_zone),
            None => config.time_zone.as_deref().map(parse_time_zone).transpose()?,
        };
        if let Some(time_zone) = time_zone {
            converter.set_time_zone(time_zone);
        }

        let patterns = if self.patterns.is_empty() {
            config.patterns
        } else {
            self.patterns
        };
        if !patterns.is_empty() {
            converter.set_patterns(&patterns)?;
        }

        if let Some(use_locale_format) = self.use_locale_format.or(config.use_locale_format) {
            converter.set_use_locale_format(use_locale_format);
        }

        match default {
            Some(default) => converter.with_default_value(default),
            None => Ok(converter),
        }
    }
}
