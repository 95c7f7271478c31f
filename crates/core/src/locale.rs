//! Report locales. Only date formatting depends on the locale.

use crate::error::{ReportError, ReportResult};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Locales a report can be generated for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ru,
    Uz,
    En,
}

impl Locale {
    pub fn tag(self) -> &'static str {
        match self {
            Locale::Ru => "ru",
            Locale::Uz => "uz",
            Locale::En => "en",
        }
    }

    fn chrono_locale(self) -> chrono::Locale {
        match self {
            Locale::Ru => chrono::Locale::ru_RU,
            Locale::Uz => chrono::Locale::uz_UZ,
            Locale::En => chrono::Locale::en_US,
        }
    }

    /// Long date with time, as printed in the report header.
    pub fn format_long(self, at: &DateTime<FixedOffset>) -> String {
        let pattern = match self {
            Locale::Ru => "%-d %B %Y г., %H:%M",
            Locale::Uz => "%-d %B %Y, %H:%M",
            Locale::En => "%B %-d, %Y, %I:%M %p",
        };
        at.format_localized(pattern, self.chrono_locale()).to_string()
    }

    /// Numeric date, as printed in the footer.
    pub fn format_short(self, at: &DateTime<FixedOffset>) -> String {
        let pattern = match self {
            Locale::Ru | Locale::Uz => "%d.%m.%Y",
            Locale::En => "%m/%d/%Y",
        };
        at.format(pattern).to_string()
    }
}

impl FromStr for Locale {
    type Err = ReportError;

    /// Accepts bare tags and region-qualified forms such as `ru-RU` or `en_US`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let language = s
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "ru" => Ok(Locale::Ru),
            "uz" => Ok(Locale::Uz),
            "en" => Ok(Locale::En),
            _ => Err(ReportError::UnsupportedLocale(s.to_string())),
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Parse a locale from an optional configuration value.
///
/// If `value` is `None` or empty/whitespace, returns the default locale.
pub fn locale_from_env_value(value: Option<String>) -> ReportResult<Locale> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value.map(|v| v.parse::<Locale>()).transpose()?;

    Ok(parsed.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visit_time() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-10-17T14:05:00+05:00").unwrap()
    }

    #[test]
    fn parses_tags_case_insensitively_with_region() {
        assert_eq!("ru".parse::<Locale>().unwrap(), Locale::Ru);
        assert_eq!("UZ".parse::<Locale>().unwrap(), Locale::Uz);
        assert_eq!("en-US".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!(" ru_RU ".parse::<Locale>().unwrap(), Locale::Ru);
    }

    #[test]
    fn rejects_unknown_tag() {
        assert!(matches!(
            "de".parse::<Locale>(),
            Err(ReportError::UnsupportedLocale(tag)) if tag == "de"
        ));
    }

    #[test]
    fn env_value_defaults_to_russian() {
        assert_eq!(locale_from_env_value(None).unwrap(), Locale::Ru);
        assert_eq!(locale_from_env_value(Some("  ".into())).unwrap(), Locale::Ru);
        assert_eq!(locale_from_env_value(Some("en".into())).unwrap(), Locale::En);
        assert!(locale_from_env_value(Some("xx".into())).is_err());
    }

    #[test]
    fn english_long_format() {
        assert_eq!(Locale::En.format_long(&visit_time()), "October 17, 2026, 02:05 PM");
    }

    #[test]
    fn russian_long_format_keeps_day_year_and_time() {
        let formatted = Locale::Ru.format_long(&visit_time());
        assert!(formatted.starts_with("17 "));
        assert!(formatted.contains("2026 г., 14:05"));
    }

    #[test]
    fn short_formats() {
        assert_eq!(Locale::Ru.format_short(&visit_time()), "17.10.2026");
        assert_eq!(Locale::Uz.format_short(&visit_time()), "17.10.2026");
        assert_eq!(Locale::En.format_short(&visit_time()), "10/17/2026");
    }
}
