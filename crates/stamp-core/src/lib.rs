//! Core library for the Stamp conversion tool.
//!
//! This crate converts arbitrary values (text, epoch milliseconds, civil and
//! zoned date/time values) into timestamps and back into display strings,
//! using either the JDBC escape forms or locale- and pattern-based
//! formatting.
//!
//! # Architecture
//!
//! - **Engine** ([`converter`]): [`DateTimeConverter`] holds the conversion
//!   policy (default value, locale, time zone, patterns)
//! - **Policy** ([`FormatProvider`]): supplies the default target type and
//!   builds a fresh [`DateTimeFormat`] for a locale/time zone pair
//! - **Timestamps** ([`timestamp`]): [`TimestampFormats`] plugs short
//!   date/short time formatting into the engine as [`TimestampConverter`]
//!
//! # Quick Start
//!
//! ```rust
//! use stamp_core::{Locale, TimestampConverter};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let converter = TimestampConverter::builder()
//!     .with_locale(Locale::france())
//!     .with_time_zone(jiff::tz::TimeZone::UTC)
//!     .build_timestamp()?;
//!
//! let timestamp = converter.to_timestamp("02/01/03 16:05")?;
//! println!("Parsed: {:?}", timestamp);
//!
//! let text = converter.to_display_string(timestamp)?;
//! assert_eq!(text.as_deref(), Some("02/01/03 16:05"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod converter;
pub mod error;
pub mod format;
pub mod jdbc;
pub mod locale;
pub mod pattern;
pub mod timestamp;
pub mod value;

// Re-export commonly used types
pub use config::ConverterConfig;
pub use converter::{ConverterBuilder, DateTimeConverter, DefaultPolicy, FormatProvider};
pub use error::{ConversionError, Result};
pub use format::{parse_time_zone, DateTimeFormat};
pub use locale::Locale;
pub use pattern::Pattern;
pub use timestamp::{TimestampConverter, TimestampFormats};
pub use value::{TargetType, Value};
