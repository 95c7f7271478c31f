//! Report runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into the report service.
//! Nothing in the pipeline reads environment variables while a document is being built.

use crate::constants::{DEFAULT_BRAND, DEFAULT_FONT_DIR, DEFAULT_LOGO_REF};
use crate::error::{ReportError, ReportResult};
use crate::locale::Locale;
use std::path::{Path, PathBuf};

/// Report configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ReportConfig {
    locale: Locale,
    logo_ref: String,
    brand: String,
    font_dir: PathBuf,
}

impl ReportConfig {
    /// Create a new `ReportConfig`.
    ///
    /// `logo_ref` falls back to the default logo handle when absent or blank.
    pub fn new(
        locale: Locale,
        logo_ref: Option<String>,
        brand: String,
        font_dir: PathBuf,
    ) -> ReportResult<Self> {
        if brand.trim().is_empty() {
            return Err(ReportError::InvalidInput("brand cannot be empty".into()));
        }

        let logo_ref = logo_ref
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_LOGO_REF.to_string());

        Ok(Self {
            locale,
            logo_ref,
            brand: brand.trim().to_string(),
            font_dir,
        })
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn logo_ref(&self) -> &str {
        &self.logo_ref
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn font_dir(&self) -> &Path {
        &self.font_dir
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            logo_ref: DEFAULT_LOGO_REF.to_string(),
            brand: DEFAULT_BRAND.to_string(),
            font_dir: PathBuf::from(DEFAULT_FONT_DIR),
        }
    }
}
