//! Converter configuration files.
//!
//! A configuration is a JSON document; every key is optional:
//!
//! ```json
//! {
//!   "locale": "fr_FR",
//!   "time_zone": "Europe/Paris",
//!   "patterns": ["dd/MM/yyyy HH:mm", "dd/MM/yyyy"],
//!   "use_locale_format": true,
//!   "default": ""
//! }
//! ```
//!
//! An empty `default` makes conversions return null instead of failing.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{ConversionError, Result},
    locale::Locale,
    value::Value,
};

const CONFIG_FILE: &str = "config.json";

/// Settings a converter can be built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_locale_format: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl ConverterConfig {
    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConversionError::FileSystem` if the file cannot be read
    /// Returns `ConversionError::Serialization` if it is not valid
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ConversionError::FileSystem {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Reads `$XDG_CONFIG_HOME/stamp/config.json` if it exists.
    ///
    /// # Errors
    ///
    /// See [`ConverterConfig::load`].
    pub fn load_default() -> Result<Option<Self>> {
        match xdg::BaseDirectories::with_prefix("stamp").find_config_file(CONFIG_FILE) {
            Some(path) => Self::load(&path).map(Some),
            None => Ok(None),
        }
    }

    /// Writes the configuration as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns `ConversionError::FileSystem` if the file cannot be written
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConversionError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        fs::write(path, self.to_json()? + "\n").map_err(|e| ConversionError::FileSystem {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// The configuration as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns the default configuration path following the XDG Base
    /// Directory specification, creating its directory.
    pub fn default_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("stamp")
            .place_config_file(CONFIG_FILE)
            .map_err(|e| ConversionError::XdgDirectory(e.to_string()))
    }

    /// The default value as a converter input; empty text means null.
    pub fn default_value(&self) -> Option<Value> {
        self.default.as_deref().map(|text| {
            if text.trim().is_empty() {
                Value::Null
            } else {
                Value::from(text)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_load_partial_config() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"locale": "de_DE", "patterns": ["dd.MM.yyyy"]}"#).unwrap();

        let config = ConverterConfig::load(&path).unwrap();
        assert_eq!(config.locale, Some(Locale::germany()));
        assert_eq!(config.patterns, vec!["dd.MM.yyyy".to_string()]);
        assert_eq!(config.time_zone, None);
        assert_eq!(config.default_value(), None);
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("nested").join("config.json");
        let config = ConverterConfig {
            locale: Some(Locale::japan()),
            time_zone: Some("UTC".to_string()),
            patterns: Vec::new(),
            use_locale_format: Some(true),
            default: Some(String::new()),
        };

        config.save(&path).unwrap();
        assert_eq!(ConverterConfig::load(&path).unwrap(), config);
        assert_eq!(config.default_value(), Some(Value::Null));
    }

    #[test]
    fn test_load_reports_missing_file_and_bad_json() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("absent.json");
        assert!(matches!(
            ConverterConfig::load(&missing),
            Err(ConversionError::FileSystem { .. })
        ));

        let broken = temp_dir.path().join("broken.json");
        fs::write(&broken, r#"{"locale": "C"}"#).unwrap();
        assert!(matches!(
            ConverterConfig::load(&broken),
            Err(ConversionError::Serialization { .. })
        ));
    }
}
