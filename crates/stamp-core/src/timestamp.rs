//! Conversion to and from timestamps.
//!
//! [`TimestampFormats`] tells the conversion engine that it produces
//! [`TargetType::Timestamp`] values and that locale formatting uses the
//! locale's short date and short time style, e.g. `1/2/03 4:05 PM` for
//! `en_US` or `02/01/03 16:05` for `fr_FR`.

use jiff::tz::TimeZone;

use crate::{
    converter::{ConverterBuilder, DateTimeConverter, FormatProvider},
    error::Result,
    format::DateTimeFormat,
    locale::Locale,
    value::{TargetType, Value},
};

/// Short-style formatting policy for timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimestampFormats;

impl FormatProvider for TimestampFormats {
    fn default_type(&self) -> TargetType {
        TargetType::Timestamp
    }

    fn format(&self, locale: Option<&Locale>, time_zone: Option<&TimeZone>) -> DateTimeFormat {
        let locale = locale.cloned().unwrap_or_else(Locale::system_default);
        let format = DateTimeFormat::short(locale);
        match time_zone {
            Some(time_zone) => format.with_time_zone(time_zone.clone()),
            None => format,
        }
    }

    fn name(&self) -> &'static str {
        "TimestampConverter"
    }
}

/// Converts values to and from [`jiff::Timestamp`].
pub type TimestampConverter = DateTimeConverter<TimestampFormats>;

impl DateTimeConverter<TimestampFormats> {
    /// Creates a converter that returns an error when a conversion fails.
    pub fn new() -> Self {
        Self::from_provider(TimestampFormats)
    }

    /// Creates a converter that returns `value` when the input is missing or
    /// cannot be converted.
    ///
    /// # Errors
    ///
    /// Returns the conversion error if `value` itself is not convertible to a
    /// timestamp.
    pub fn with_default(value: impl Into<Value>) -> Result<Self> {
        Self::new().with_default_value(value)
    }

    /// Starts a [`ConverterBuilder`]; finish with
    /// [`ConverterBuilder::build_timestamp`].
    pub fn builder() -> ConverterBuilder {
        ConverterBuilder::new()
    }
}

impl Default for DateTimeConverter<TimestampFormats> {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterBuilder {
    /// Builds a [`TimestampConverter`].
    ///
    /// # Errors
    ///
    /// See [`ConverterBuilder::build`].
    pub fn build_timestamp(self) -> Result<TimestampConverter> {
        self.build(TimestampFormats)
    }
}
