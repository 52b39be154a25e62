//! Locale selectors and their short date/time conventions.

use std::{env, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ConversionError;

/// Short date and short time patterns of a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortStyle {
    pub date: &'static str,
    pub time: &'static str,
}

impl ShortStyle {
    /// The combined date-time pattern, date first.
    pub fn date_time(&self) -> String {
        format!("{} {}", self.date, self.time)
    }
}

const ROOT_STYLE: ShortStyle = ShortStyle {
    date: "M/d/yy",
    time: "h:mm a",
};

/// Short styles keyed by language and optional country.
const SHORT_STYLES: &[(&str, Option<&str>, ShortStyle)] = &[
    ("en", None, ROOT_STYLE),
    (
        "en",
        Some("GB"),
        ShortStyle {
            date: "dd/MM/yy",
            time: "HH:mm",
        },
    ),
    (
        "fr",
        None,
        ShortStyle {
            date: "dd/MM/yy",
            time: "HH:mm",
        },
    ),
    (
        "fr",
        Some("CA"),
        ShortStyle {
            date: "yy-MM-dd",
            time: "HH:mm",
        },
    ),
    (
        "de",
        None,
        ShortStyle {
            date: "dd.MM.yy",
            time: "HH:mm",
        },
    ),
    (
        "it",
        None,
        ShortStyle {
            date: "dd/MM/yy",
            time: "H.mm",
        },
    ),
    (
        "es",
        None,
        ShortStyle {
            date: "d/MM/yy",
            time: "H:mm",
        },
    ),
    (
        "nl",
        None,
        ShortStyle {
            date: "d-M-yy",
            time: "H:mm",
        },
    ),
    (
        "pt",
        Some("BR"),
        ShortStyle {
            date: "dd/MM/yy",
            time: "HH:mm",
        },
    ),
    (
        "ja",
        None,
        ShortStyle {
            date: "yy/MM/dd",
            time: "H:mm",
        },
    ),
];

/// A selector for regional date/time formatting conventions.
///
/// The language is stored lowercase and the country uppercase, so `fr-fr`,
/// `fr_FR` and `fr_FR.UTF-8` all select the same locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    language: String,
    country: Option<String>,
}

impl Locale {
    /// Creates a locale from a language and optional country code.
    pub fn new(language: &str, country: Option<&str>) -> Self {
        Self {
            language: language.to_ascii_lowercase(),
            country: country.map(str::to_ascii_uppercase),
        }
    }

    /// `en_US`, also the fallback system locale.
    pub fn us() -> Self {
        Self::new("en", Some("US"))
    }

    /// `en_GB`
    pub fn uk() -> Self {
        Self::new("en", Some("GB"))
    }

    /// `fr_FR`
    pub fn france() -> Self {
        Self::new("fr", Some("FR"))
    }

    /// `de_DE`
    pub fn germany() -> Self {
        Self::new("de", Some("DE"))
    }

    /// `ja_JP`
    pub fn japan() -> Self {
        Self::new("ja", Some("JP"))
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// The locale configured for the running process.
    ///
    /// Reads `LC_ALL`, `LC_TIME` and `LANG` in that order. `C`, `POSIX` and
    /// unparseable values fall back to `en_US`.
    pub fn system_default() -> Self {
        ["LC_ALL", "LC_TIME", "LANG"]
            .iter()
            .filter_map(|var| env::var(var).ok())
            .find(|value| !value.trim().is_empty())
            .and_then(|value| value.parse().ok())
            .unwrap_or_else(Self::us)
    }

    /// Short date and time patterns for this locale.
    ///
    /// Looks up language and country, then the language alone, then falls
    /// back to the root conventions.
    pub fn short_style(&self) -> ShortStyle {
        let exact = SHORT_STYLES.iter().find(|(language, country, _)| {
            *language == self.language && country.is_some() && *country == self.country()
        });
        let by_language = || {
            SHORT_STYLES
                .iter()
                .find(|(language, country, _)| *language == self.language && country.is_none())
        };
        exact
            .or_else(by_language)
            .map(|(_, _, style)| *style)
            .unwrap_or(ROOT_STYLE)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::system_default()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.country {
            Some(country) => write!(f, "{}_{}", self.language, country),
            None => f.write_str(&self.language),
        }
    }
}

impl FromStr for Locale {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Drop encoding and modifier suffixes such as `.UTF-8` or `@euro`.
        let tag = s.trim().split(['.', '@']).next().unwrap_or_default();
        if tag.eq_ignore_ascii_case("c") || tag.eq_ignore_ascii_case("posix") {
            return Err(ConversionError::InvalidLocale(s.to_string()));
        }

        let mut parts = tag.split(['_', '-']);
        let language = parts.next().unwrap_or_default();
        let country = parts.next();
        let valid_language =
            (2..=3).contains(&language.len()) && language.chars().all(|c| c.is_ascii_alphabetic());
        let valid_country = country.map_or(true, |c| {
            (2..=3).contains(&c.len()) && c.chars().all(|c| c.is_ascii_alphanumeric())
        });
        if !valid_language || !valid_country || parts.next().is_some() {
            return Err(ConversionError::InvalidLocale(s.to_string()));
        }

        Ok(Locale::new(language, country))
    }
}

impl TryFrom<String> for Locale {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.to_string()
    }
}
