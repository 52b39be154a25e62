use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use stamp_core::{ConverterConfig, Locale, TargetType};

/// Command-line interface for the Stamp conversion tool
///
/// Stamp converts text, epoch milliseconds and other date/time values into
/// timestamps and formats timestamps back into text. Conversion follows the
/// JDBC escape form (`yyyy-mm-dd hh:mm:ss.f`) unless a locale or patterns are
/// given, in which case the locale's short date/time style or the patterns
/// are used.
#[derive(Parser)]
#[command(version, about, name = "stamp")]
pub struct Args {
    /// Path to a JSON configuration file. Defaults to
    /// $XDG_CONFIG_HOME/stamp/config.json when that file exists
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the Stamp CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Convert a value to a timestamp (or another target type)
    #[command(alias = "c")]
    Convert(ConvertArgs),
    /// Format an instant as text
    #[command(alias = "f")]
    Format(FormatArgs),
    /// Describe the converter and the formatter it uses
    Inspect,
    /// Print the effective configuration as JSON
    Config(ConfigArgs),
}

/// Converter settings shared by all commands.
///
/// Each flag overrides the matching key of the configuration file.
#[derive(ClapArgs, Default)]
pub struct SettingsArgs {
    /// Locale whose short date/time style is used, e.g. fr_FR
    #[arg(long, global = true, value_parser = parse_locale)]
    pub locale: Option<Locale>,

    /// Time zone: UTC, an offset like +01:00, or an IANA name
    #[arg(long, global = true)]
    pub time_zone: Option<String>,

    /// Date/time pattern; repeat to try several when parsing
    #[arg(long = "pattern", global = true)]
    pub patterns: Vec<String>,

    /// Force locale formatting on or off
    #[arg(long, global = true)]
    pub use_locale_format: Option<bool>,

    /// Value returned instead of an error; empty for null
    #[arg(long, global = true)]
    pub default: Option<String>,
}

impl SettingsArgs {
    /// Layers the flags over a loaded configuration.
    pub fn overlay(self, config: ConverterConfig) -> ConverterConfig {
        ConverterConfig {
            locale: self.locale.or(config.locale),
            time_zone: self.time_zone.or(config.time_zone),
            patterns: if self.patterns.is_empty() {
                config.patterns
            } else {
                self.patterns
            },
            use_locale_format: self.use_locale_format.or(config.use_locale_format),
            default: self.default.or(config.default),
        }
    }
}

fn parse_locale(value: &str) -> Result<Locale, String> {
    value.parse().map_err(|e: stamp_core::ConversionError| e.to_string())
}

/// Type to convert to
#[derive(Clone, Copy, ValueEnum)]
pub enum TargetArg {
    Timestamp,
    Date,
    Time,
    Zoned,
    String,
}

impl From<TargetArg> for TargetType {
    fn from(val: TargetArg) -> Self {
        match val {
            TargetArg::Timestamp => TargetType::Timestamp,
            TargetArg::Date => TargetType::Date,
            TargetArg::Time => TargetType::Time,
            TargetArg::Zoned => TargetType::Zoned,
            TargetArg::String => TargetType::String,
        }
    }
}

/// Convert a value
#[derive(ClapArgs)]
pub struct ConvertArgs {
    /// Value to convert
    pub value: String,

    /// Target type of the conversion
    #[arg(short, long, value_enum, default_value_t = TargetArg::Timestamp)]
    pub target: TargetArg,

    /// Treat the value as milliseconds since the Unix epoch
    #[arg(long)]
    pub millis: bool,
}

/// Format an instant
#[derive(ClapArgs)]
pub struct FormatArgs {
    /// `now`, epoch milliseconds, an RFC 3339 timestamp, or text the
    /// converter can parse
    pub value: String,
}

/// Show or save the configuration
#[derive(ClapArgs)]
pub struct ConfigArgs {
    /// Write the configuration to the config file instead of printing it
    #[arg(long)]
    pub save: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_prefers_flags() {
        let config = ConverterConfig {
            locale: Some(Locale::germany()),
            time_zone: Some("UTC".to_string()),
            patterns: vec!["yyyy".to_string()],
            use_locale_format: None,
            default: Some("2003-01-02 00:00:00".to_string()),
        };
        let settings = SettingsArgs {
            locale: Some(Locale::france()),
            patterns: vec!["dd/MM/yyyy".to_string()],
            ..SettingsArgs::default()
        };

        let merged = settings.overlay(config);
        assert_eq!(merged.locale, Some(Locale::france()));
        assert_eq!(merged.time_zone.as_deref(), Some("UTC"));
        assert_eq!(merged.patterns, vec!["dd/MM/yyyy".to_string()]);
        assert_eq!(merged.default.as_deref(), Some("2003-01-02 00:00:00"));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "stamp",
            "--locale",
            "fr_FR",
            "convert",
            "02/01/03 16:05",
            "--target",
            "date",
        ]);
        assert_eq!(args.settings.locale, Some(Locale::france()));
        match args.command {
            Commands::Convert(convert) => {
                assert_eq!(convert.value, "02/01/03 16:05");
                assert_eq!(TargetType::from(convert.target), TargetType::Date);
            }
            _ => panic!("expected convert command"),
        }
    }

    #[test]
    fn test_invalid_locale_is_rejected() {
        assert!(Args::try_parse_from(["stamp", "--locale", "C", "inspect"]).is_err());
    }
}
