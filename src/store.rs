//! Translation store: flat JSON key-value files, one per (module, language).
//!
//! The source-language file maps key -> plain string and always reflects the
//! latest scrape verbatim. Target-language files map key -> `{value,
//! translated}` and are only ever rewritten as whole mappings, so a file on
//! disk always equals one in-memory mapping.
//!
//! Reads are tolerant: a missing or unparsable file is an empty mapping, not
//! an error. First-run behavior for new modules and languages depends on
//! this.
//!
//! The store assumes a single writer at a time. There is no lock file and no
//! version stamp; concurrent scrapes or a scrape racing a manual edit can
//! lose updates. Callers must serialize access.

use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One target-language entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationValue {
    pub value: String,
    pub translated: bool,
}

impl TranslationValue {
    /// Seed entry for a newly scraped key: source text, untranslated.
    pub fn untranslated(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            translated: false,
        }
    }
}

/// Source-language mapping, in scrape order.
pub type SourceEntries = IndexMap<String, String>;

/// Target-language mapping, in scrape order.
pub type TargetEntries = IndexMap<String, TranslationValue>;

/// File-backed translation store rooted at one data directory.
#[derive(Debug, Clone)]
pub struct TranslationStore {
    data_dir: PathBuf,
    source_language: String,
}

impl TranslationStore {
    pub fn new(data_dir: impl Into<PathBuf>, source_language: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            source_language: source_language.into(),
        }
    }

    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    /// Path of the backing file for one (module, language) pair.
    pub fn language_file(&self, module: &str, language: &str) -> PathBuf {
        self.data_dir.join(module).join(format!("{language}.json"))
    }

    /// Read the source-language mapping for a module.
    pub fn read_source(&self, module: &str) -> SourceEntries {
        self.read_json(&self.language_file(module, &self.source_language))
    }

    /// Read a target-language mapping for a module.
    pub fn read_target(&self, module: &str, language: &str) -> TargetEntries {
        self.read_json(&self.language_file(module, language))
    }

    /// Replace the source-language file with `entries`.
    pub fn write_source(&self, module: &str, entries: &SourceEntries) -> Result<()> {
        self.write_json(&self.language_file(module, &self.source_language), entries)
    }

    /// Replace a target-language file with `entries`.
    pub fn write_target(&self, module: &str, language: &str, entries: &TargetEntries) -> Result<()> {
        self.write_json(&self.language_file(module, language), entries)
    }

    /// Replace a single target-language entry.
    ///
    /// This is a full replacement of the entry, not a patch: toggling only
    /// the `translated` flag still requires resending the current value.
    /// When `translated` is not given the entry is marked translated, since
    /// an operator edit normally *is* the translation.
    ///
    /// The source language is only mutated by reconciliation, never by a
    /// targeted edit; attempting it is a validation error.
    pub fn update_translation(
        &self,
        module: &str,
        key: &str,
        language: &str,
        value: String,
        translated: Option<bool>,
    ) -> Result<()> {
        if language == self.source_language {
            return Err(Error::Validation(
                "the source language file cannot be edited directly".into(),
            ));
        }

        let mut entries = self.read_target(module, language);
        entries.insert(
            key.to_string(),
            TranslationValue {
                value,
                translated: translated.unwrap_or(true),
            },
        );
        self.write_target(module, language, &entries)
    }

    /// Tolerant read: missing file or parse failure yields an empty mapping.
    fn read_json<T: DeserializeOwned + Default>(&self, path: &Path) -> T {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return T::default(),
        };
        match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable translation file, treating as empty");
                T::default()
            }
        }
    }

    /// Write the full mapping: create parent directories, serialize pretty,
    /// then rename a temp file over the destination so readers never observe
    /// a partial mapping.
    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let parent = path.parent().unwrap_or(&self.data_dir);
        std::fs::create_dir_all(parent)?;

        let json = serde_json::to_string_pretty(value)?;
        let mut file = tempfile::NamedTempFile::new_in(parent)?;
        file.write_all(json.as_bytes())?;
        file.persist(path).map_err(|e| Error::Storage(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> TranslationStore {
        TranslationStore::new(dir.path(), "ja")
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert!(store.read_source("tags").is_empty());
        assert!(store.read_target("tags", "en").is_empty());
    }

    #[test]
    fn garbage_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let path = store.language_file("tags", "en");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json {").unwrap();
        assert!(store.read_target("tags", "en").is_empty());
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let mut entries = TargetEntries::new();
        entries.insert("origin_1".into(), TranslationValue::untranslated("ゲーム"));
        store.write_target("origins", "en", &entries).unwrap();

        assert_eq!(store.read_target("origins", "en"), entries);
    }

    #[test]
    fn files_are_pretty_printed_with_two_space_indent() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let mut entries = SourceEntries::new();
        entries.insert("1".into(), "アクション".into());
        store.write_source("tags", &entries).unwrap();

        let content = std::fs::read_to_string(store.language_file("tags", "ja")).unwrap();
        assert!(content.starts_with("{\n  \""));
    }

    #[test]
    fn update_rejects_source_language() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let result = store.update_translation("tags", "1", "ja", "x".into(), None);
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(!store.language_file("tags", "ja").exists());
    }

    #[test]
    fn update_defaults_to_translated() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store
            .update_translation("tags", "1", "en", "Action".into(), None)
            .unwrap();
        let entries = store.read_target("tags", "en");
        assert_eq!(
            entries.get("1"),
            Some(&TranslationValue {
                value: "Action".into(),
                translated: true
            })
        );

        store
            .update_translation("tags", "1", "en", "Action?".into(), Some(false))
            .unwrap();
        let entries = store.read_target("tags", "en");
        assert_eq!(
            entries.get("1"),
            Some(&TranslationValue {
                value: "Action?".into(),
                translated: false
            })
        );
    }
}
