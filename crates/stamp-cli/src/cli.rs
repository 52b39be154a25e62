//! Command handlers for the Stamp CLI
//!
//! Each handler takes parsed arguments, runs the conversion through the core
//! converter and prints the result. Conversion results are printed as plain
//! text so they can be piped; descriptive output goes through the markdown
//! renderer.

use std::{fmt, path::PathBuf};

use anyhow::{Context, Result};
use jiff::Timestamp;
use log::debug;
use stamp_core::{
    format::zone_name, ConverterConfig, FormatProvider, Locale, TargetType, TimestampConverter,
    Value,
};

use crate::{
    args::{ConfigArgs, ConvertArgs, FormatArgs},
    renderer::TerminalRenderer,
};

/// CLI handler holding the configured converter
pub struct Cli {
    converter: TimestampConverter,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(converter: TimestampConverter, renderer: TerminalRenderer) -> Self {
        Self {
            converter,
            renderer,
        }
    }

    /// Convert a value and print the result
    pub fn convert(&self, args: ConvertArgs) -> Result<()> {
        let input = if args.millis {
            let millis: i64 = args
                .value
                .trim()
                .parse()
                .with_context(|| format!("'{}' is not a number of milliseconds", args.value))?;
            Value::Integer(millis)
        } else {
            Value::String(args.value)
        };

        let target = TargetType::from(args.target);
        debug!("Converting {} to {}", input.kind(), target);
        let converted = self
            .converter
            .convert_to(target, input)
            .with_context(|| format!("Failed to convert to {target}"))?;
        println!("{converted}");
        Ok(())
    }

    /// Format an instant and print the text
    pub fn format(&self, args: &FormatArgs) -> Result<()> {
        let value = args.value.trim();
        let instant = if value.eq_ignore_ascii_case("now") {
            Value::Timestamp(Timestamp::now())
        } else if let Ok(millis) = value.parse::<i64>() {
            Value::Timestamp(
                Timestamp::from_millisecond(millis)
                    .with_context(|| format!("{millis} ms is outside the supported range"))?,
            )
        } else if let Ok(timestamp) = value.parse::<Timestamp>() {
            Value::Timestamp(timestamp)
        } else {
            self.converter
                .convert(value)
                .with_context(|| format!("Failed to read '{value}' as a timestamp"))?
        };

        let text = self
            .converter
            .to_display_string(instant)
            .context("Failed to format value")?;
        println!("{}", text.unwrap_or_default());
        Ok(())
    }

    /// Describe the converter
    pub fn inspect(&self) -> Result<()> {
        self.renderer
            .render(&ConverterDescription(&self.converter).to_string())
    }

    /// Print the effective configuration, or save it
    pub fn config(
        &self,
        config: &ConverterConfig,
        args: &ConfigArgs,
        path: Option<PathBuf>,
    ) -> Result<()> {
        if args.save {
            let path = match path {
                Some(path) => path,
                None => ConverterConfig::default_path()
                    .context("Failed to locate configuration directory")?,
            };
            config
                .save(&path)
                .with_context(|| format!("Failed to save configuration to {}", path.display()))?;
            println!("Saved configuration to {}", path.display());
        } else {
            let json = config
                .to_json()
                .context("Failed to serialize configuration")?;
            println!("{json}");
        }
        Ok(())
    }
}

/// Markdown description of a converter and its locale formatter
struct ConverterDescription<'a>(&'a TimestampConverter);

impl fmt::Display for ConverterDescription<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let converter = self.0;
        let yes_no = |flag: bool| if flag { "yes" } else { "no" };

        writeln!(f, "# {}", converter.provider().name())?;
        writeln!(f)?;
        writeln!(
            f,
            "- **Default type**: {}",
            converter.provider().default_type()
        )?;
        writeln!(f, "- **Use default**: {}", yes_no(converter.is_use_default()))?;
        writeln!(
            f,
            "- **Locale format**: {}",
            yes_no(converter.use_locale_format())
        )?;
        match converter.locale() {
            Some(locale) => writeln!(f, "- **Locale**: {locale}")?,
            None => writeln!(
                f,
                "- **Locale**: system default ({})",
                Locale::system_default()
            )?,
        }
        match converter.time_zone() {
            Some(time_zone) => writeln!(f, "- **Time zone**: {}", zone_name(time_zone))?,
            None => writeln!(f, "- **Time zone**: system")?,
        }
        let patterns = converter.patterns();
        if patterns.is_empty() {
            writeln!(f, "- **Patterns**: none")?;
        } else {
            let quoted: Vec<String> = patterns.iter().map(|p| format!("`{p}`")).collect();
            writeln!(f, "- **Patterns**: {}", quoted.join(", "))?;
        }

        let format = converter.locale_format();
        writeln!(f)?;
        writeln!(f, "## Locale format")?;
        writeln!(f)?;
        writeln!(f, "- **Pattern**: `{}`", format.pattern())?;
        writeln!(f, "- **Now**: {}", format.format(Timestamp::now()))
    }
}

#[cfg(test)]
mod tests {
    use jiff::tz::TimeZone;

    use super::*;

    #[test]
    fn test_description_lists_settings() {
        let converter = TimestampConverter::builder()
            .with_locale(Locale::france())
            .with_time_zone(TimeZone::UTC)
            .with_pattern("yyyy-MM-dd")
            .build_timestamp()
            .unwrap();

        let text = ConverterDescription(&converter).to_string();
        assert!(text.starts_with("# TimestampConverter\n"));
        assert!(text.contains("- **Default type**: Timestamp"));
        assert!(text.contains("- **Locale**: fr_FR"));
        assert!(text.contains("- **Time zone**: UTC"));
        assert!(text.contains("- **Patterns**: `yyyy-MM-dd`"));
        assert!(text.contains("- **Pattern**: `dd/MM/yy HH:mm`"));
    }

    #[test]
    fn test_description_of_plain_converter() {
        let text = ConverterDescription(&TimestampConverter::new()).to_string();
        assert!(text.contains("- **Use default**: no"));
        assert!(text.contains("- **Locale format**: no"));
        assert!(text.contains("- **Time zone**: system"));
        assert!(text.contains("- **Patterns**: none"));
    }
}
