//! Application configuration.
//!
//! Defaults mirror the upstream site the default registry scrapes; every
//! value can be overridden from a TOML file found at one of
//! [`constants::CONFIG_PATHS`]. Loading is tolerant: a missing file means
//! defaults, a broken file is an error the caller sees.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration constants and defaults.
pub mod constants {
    /// Directory translation files live under, one subdirectory per module.
    pub const DEFAULT_DATA_DIR: &str = "data/i18n";

    /// Languages tracked by the store. The source language is part of the
    /// list; targets are every other entry.
    pub const DEFAULT_LANGUAGES: &[&str] = &["ja", "en", "zh-CN", "zh-TW"];

    /// Language the scraped site publishes in.
    pub const DEFAULT_SOURCE_LANGUAGE: &str = "ja";

    /// Base URL of the scraped catalog site.
    pub const DEFAULT_SITE_URL: &str = "https://oreno3d.com";

    /// Pause between catalog page requests, to stay polite upstream.
    pub const DEFAULT_REQUEST_DELAY_MS: u64 = 1000;

    /// Retries for a single page fetch before giving up on the walk.
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

    pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
         AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

    /// Config file search order; first hit wins.
    pub const CONFIG_PATHS: &[&str] = &[
        "lexicat.toml",
        ".lexicat.toml",
        "/etc/lexicat/config.toml",
    ];
}

/// Pacing and transport settings for the catalog page-walker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub request_delay_ms: u64,
    pub max_retries: u32,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: constants::DEFAULT_REQUEST_DELAY_MS,
            max_retries: constants::DEFAULT_MAX_RETRIES,
            timeout_ms: constants::DEFAULT_TIMEOUT_MS,
            user_agent: constants::DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root directory for translation files (`<data_dir>/<module>/<lang>.json`).
    pub data_dir: PathBuf,

    /// All tracked languages, source language included.
    pub languages: Vec<String>,

    pub source_language: String,

    /// Base URL of the scraped site, used by the default module registry.
    pub site_url: String,

    pub scraper: ScraperConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(constants::DEFAULT_DATA_DIR),
            languages: constants::DEFAULT_LANGUAGES
                .iter()
                .map(|l| (*l).to_string())
                .collect(),
            source_language: constants::DEFAULT_SOURCE_LANGUAGE.to_string(),
            site_url: constants::DEFAULT_SITE_URL.to_string(),
            scraper: ScraperConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the first file found in
    /// [`constants::CONFIG_PATHS`], falling back to defaults when none exists.
    pub fn load() -> Result<Self> {
        for path in constants::CONFIG_PATHS {
            let path = Path::new(path);
            if path.exists() {
                return Self::from_file(path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency of the language list.
    pub fn validate(&self) -> Result<()> {
        if self.languages.is_empty() {
            return Err(Error::Config("language list must not be empty".into()));
        }
        if !self.languages.iter().any(|l| l == &self.source_language) {
            return Err(Error::Config(format!(
                "source language {:?} is missing from the language list",
                self.source_language
            )));
        }
        Ok(())
    }

    /// Languages that carry translations, i.e. everything except the source.
    pub fn target_languages(&self) -> impl Iterator<Item = &str> {
        self.languages
            .iter()
            .map(String::as_str)
            .filter(|l| *l != self.source_language)
    }

    pub fn is_valid_language(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l == language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_consistent() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.source_language, "ja");
        assert_eq!(config.target_languages().count(), config.languages.len() - 1);
    }

    #[test]
    fn target_languages_exclude_source() {
        let config = AppConfig::default();
        assert!(config.target_languages().all(|l| l != "ja"));
    }

    #[test]
    fn rejects_source_language_outside_list() {
        let config = AppConfig {
            source_language: "fr".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let config: AppConfig = toml::from_str("data_dir = \"/tmp/i18n\"").unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/i18n"));
        assert_eq!(config.source_language, "ja");
        assert_eq!(config.scraper.max_retries, 3);
    }
}
