use std::{fs, path::PathBuf};

use jiff::{civil::date, tz::TimeZone, Timestamp};
use stamp_core::{
    ConversionError, ConverterConfig, Locale, TargetType, TimestampConverter, Value,
};
use tempfile::TempDir;

/// Helper function to create a temporary directory and config path
fn create_test_environment() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let config_path = temp_dir.path().join("config.json");
    (temp_dir, config_path)
}

fn sample() -> Timestamp {
    date(2003, 1, 2)
        .at(16, 5, 0, 0)
        .to_zoned(TimeZone::UTC)
        .unwrap()
        .timestamp()
}

#[test]
fn test_config_file_drives_conversion() {
    let (_temp_dir, config_path) = create_test_environment();
    fs::write(
        &config_path,
        r#"{
            "locale": "fr_FR",
            "time_zone": "UTC",
            "patterns": ["dd/MM/yyyy HH:mm", "dd/MM/yyyy"]
        }"#,
    )
    .expect("Failed to write config");

    let config = ConverterConfig::load(&config_path).expect("Failed to load config");
    let converter = TimestampConverter::builder()
        .with_config(Some(config))
        .build_timestamp()
        .expect("Failed to build converter");

    assert_eq!(converter.locale(), Some(&Locale::france()));
    assert_eq!(converter.patterns(), vec!["dd/MM/yyyy HH:mm", "dd/MM/yyyy"]);
    assert_eq!(
        converter.convert("02/01/2003 16:05").unwrap(),
        Value::Timestamp(sample())
    );
    assert_eq!(
        converter.to_display_string(sample()).unwrap().as_deref(),
        Some("02/01/2003 16:05")
    );
}

#[test]
fn test_explicit_settings_override_config() {
    let config = ConverterConfig {
        locale: Some(Locale::germany()),
        time_zone: Some("+05:00".to_string()),
        patterns: vec!["yyyy".to_string()],
        use_locale_format: Some(true),
        default: None,
    };

    let converter = TimestampConverter::builder()
        .with_config(Some(config))
        .with_locale(Locale::us())
        .with_time_zone(TimeZone::UTC)
        .with_pattern("M/d/yyyy")
        .build_timestamp()
        .expect("Failed to build converter");

    assert_eq!(converter.locale(), Some(&Locale::us()));
    assert_eq!(converter.patterns(), vec!["M/d/yyyy"]);
    assert_eq!(
        converter.to_timestamp("1/2/2003").unwrap(),
        Some(date(2003, 1, 2).to_zoned(TimeZone::UTC).unwrap().timestamp())
    );
}

#[test]
fn test_config_default_and_unknown_zone() {
    let config = ConverterConfig {
        default: Some(String::new()),
        ..ConverterConfig::default()
    };
    let converter = TimestampConverter::builder()
        .with_config(Some(config))
        .build_timestamp()
        .expect("Failed to build converter");
    assert_eq!(converter.convert("garbage").unwrap(), Value::Null);

    let config = ConverterConfig {
        time_zone: Some("Nowhere/Special".to_string()),
        ..ConverterConfig::default()
    };
    let result = TimestampConverter::builder()
        .with_config(Some(config))
        .build_timestamp();
    assert!(matches!(
        result,
        Err(ConversionError::InvalidTimeZone { .. })
    ));
}

#[test]
fn test_round_trip_through_locale_strings() {
    for (locale, text) in [
        (Locale::us(), "1/2/03 4:05 PM"),
        (Locale::uk(), "02/01/03 16:05"),
        (Locale::germany(), "02.01.03 16:05"),
        (Locale::japan(), "03/01/02 16:05"),
    ] {
        let converter = TimestampConverter::builder()
            .with_locale(locale.clone())
            .with_time_zone(TimeZone::UTC)
            .build_timestamp()
            .expect("Failed to build converter");

        let formatted = converter
            .convert_to(TargetType::String, sample())
            .expect("Failed to format");
        assert_eq!(formatted, Value::from(text), "{locale}");
        assert_eq!(
            converter.convert(formatted).expect("Failed to parse"),
            Value::Timestamp(sample()),
            "{locale}"
        );
    }
}

#[test]
fn test_sub_second_precision_survives_default_forms() {
    let converter = TimestampConverter::builder()
        .with_time_zone(TimeZone::UTC)
        .build_timestamp()
        .expect("Failed to build converter");

    let precise = converter
        .convert("2003-01-02 16:05:00.123456789")
        .expect("Failed to parse");
    let text = converter
        .to_display_string(precise.clone())
        .expect("Failed to format");
    assert_eq!(text.as_deref(), Some("2003-01-02 16:05:00.123456789"));
    assert_eq!(
        precise.as_timestamp().map(|ts| ts.subsec_nanosecond()),
        Some(123_456_789)
    );
}

#[test]
fn test_config_with_patterns_and_default() {
    let (_temp_dir, config_path) = create_test_environment();
    fs::write(
        &config_path,
        r#"{
            "time_zone": "UTC",
            "patterns": ["dd/MM/yyyy"],
            "default": "01/01/2000"
        }"#,
    )
    .expect("Failed to write config");

    let config = ConverterConfig::load(&config_path).expect("Failed to load config");
    let converter = TimestampConverter::builder()
        .with_config(Some(config))
        .build_timestamp()
        .expect("Failed to build converter");

    let fallback = date(2000, 1, 1).to_zoned(TimeZone::UTC).unwrap().timestamp();
    assert!(converter.is_use_default());
    assert_eq!(converter.to_timestamp("garbage").unwrap(), Some(fallback));
    assert_eq!(
        converter.to_timestamp("02/01/2003").unwrap(),
        Some(date(2003, 1, 2).to_zoned(TimeZone::UTC).unwrap().timestamp())
    );
}

#[test]
fn test_zone_abbreviation_pattern_reads_its_own_output() {
    let central_europe =
        TimeZone::posix("CET-1CEST,M3.5.0,M10.5.0/3").expect("Failed to build zone");
    let converter = TimestampConverter::builder()
        .with_pattern("yyyy-MM-dd HH:mm z")
        .with_time_zone(central_europe)
        .build_timestamp()
        .expect("Failed to build converter");

    for instant in [
        sample(),
        date(2003, 7, 2)
            .at(14, 5, 0, 0)
            .to_zoned(TimeZone::UTC)
            .unwrap()
            .timestamp(),
    ] {
        let text = converter
            .to_display_string(instant)
            .expect("Failed to format")
            .expect("Missing text");
        assert_eq!(
            converter.to_timestamp(text.as_str()).expect("Failed to parse"),
            Some(instant),
            "{text}"
        );
    }
}
