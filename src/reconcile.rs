//! Reconciliation engine: merges fresh scrapes into the translation store
//! without destroying existing translation work.
//!
//! For each module run, the source-language file is rebuilt wholesale from
//! the scraped items, while every target-language file is rebuilt by walking
//! the *scraped items*: keys that already exist keep their stored entry
//! verbatim, new keys are seeded with the source text marked untranslated.
//! Keys absent from the scrape drop out of every file, keeping source and
//! target key sets in sync.
//!
//! Reconciliation is not transactional across files; a crash mid-run can
//! leave source and target files inconsistent until the next run. Batch runs
//! are strictly sequential, both to respect upstream rate limits and because
//! the store has no locking.

use std::time::Instant;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::registry::{Module, ModuleRegistry};
use crate::stats::{self, ModuleStats};
use crate::store::{SourceEntries, TargetEntries, TranslationStore, TranslationValue};

/// Result of reconciling one module.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeOutcome {
    pub module_name: String,
    pub items_processed: usize,
    /// Keys absent from the previous source file.
    pub new_items: usize,
    /// Keys whose source text changed since the previous scrape.
    pub updated_items: usize,
    /// Wall-clock duration in milliseconds.
    pub duration: u64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of reconciling every registered module.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub total_modules: usize,
    pub successful_modules: usize,
    pub failed_modules: usize,
    pub results: Vec<ScrapeOutcome>,
    pub total_duration: u64,
}

/// One row of aggregated module data: a key and its text in every language.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleRow {
    pub key: String,
    /// Source language maps to a plain string, targets to full entries.
    pub translations: IndexMap<String, TranslationCell>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TranslationCell {
    Source(String),
    Target(TranslationValue),
}

/// A single translation edit, as submitted by the CLI or the admin API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationUpdate {
    pub key: String,
    pub lang: String,
    pub value: String,
    /// Defaults to `true`: an operator edit normally is the translation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated: Option<bool>,
}

/// The reconciliation engine. Owns the store; borrows nothing global.
///
/// Callers must serialize access: two concurrent reconciliations of the same
/// module, or a reconciliation racing a manual edit, can lose updates.
pub struct Reconciler {
    config: AppConfig,
    registry: ModuleRegistry,
    store: TranslationStore,
}

impl Reconciler {
    pub fn new(config: AppConfig, registry: ModuleRegistry) -> Self {
        let store = TranslationStore::new(config.data_dir.clone(), config.source_language.clone());
        Self {
            config,
            registry,
            store,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn store(&self) -> &TranslationStore {
        &self.store
    }

    fn module(&self, name: &str) -> Result<&Module> {
        self.registry
            .get(name)
            .ok_or_else(|| Error::Config(format!("unknown module: {name}")))
    }

    /// Scrape one module and merge the result into the store.
    ///
    /// An unknown module name is an error. Fetch and storage failures during
    /// the run are captured into a failed outcome instead, so batch callers
    /// can continue with the next module.
    pub fn reconcile_module(&self, name: &str) -> Result<ScrapeOutcome> {
        let module = self.module(name)?;
        let started = Instant::now();
        tracing::info!(module = name, "starting reconciliation");

        match self.run_module(module) {
            Ok((items_processed, new_items, updated_items)) => {
                let outcome = ScrapeOutcome {
                    module_name: name.to_string(),
                    items_processed,
                    new_items,
                    updated_items,
                    duration: started.elapsed().as_millis() as u64,
                    success: true,
                    error: None,
                };
                tracing::info!(
                    module = name,
                    items = items_processed,
                    new = new_items,
                    updated = updated_items,
                    duration_ms = outcome.duration,
                    "reconciliation finished"
                );
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!(module = name, error = %e, "reconciliation failed");
                Ok(ScrapeOutcome {
                    module_name: name.to_string(),
                    items_processed: 0,
                    new_items: 0,
                    updated_items: 0,
                    duration: started.elapsed().as_millis() as u64,
                    success: false,
                    error: Some(e.to_string()),
                })
            }
        }
    }

    /// Fetch, merge and persist; returns (processed, new, updated) counts.
    fn run_module(&self, module: &Module) -> Result<(usize, usize, usize)> {
        let items = module.source.fetch_items()?;
        tracing::info!(module = %module.name, items = items.len(), "scrape returned");

        // Source language: rebuild from scratch, in scrape order. Duplicate
        // ids within one run are last-write-wins.
        let previous = self.store.read_source(&module.name);
        let mut fresh = SourceEntries::with_capacity(items.len());
        let mut new_items = 0;
        let mut updated_items = 0;
        for item in &items {
            let key = module.key_for(item);
            match previous.get(&key) {
                None => new_items += 1,
                Some(old_name) if old_name != &item.name => updated_items += 1,
                Some(_) => {}
            }
            fresh.insert(key, item.name.clone());
        }
        self.store.write_source(&module.name, &fresh)?;

        // Target languages: walk the scraped items, keep existing entries
        // verbatim, seed new keys untranslated. Keys no longer scraped drop
        // out here.
        for language in self.config.target_languages() {
            let existing = self.store.read_target(&module.name, language);
            let mut merged = TargetEntries::with_capacity(items.len());
            for item in &items {
                let key = module.key_for(item);
                let entry = match existing.get(&key) {
                    Some(entry) => entry.clone(),
                    None => TranslationValue::untranslated(&item.name),
                };
                merged.insert(key, entry);
            }
            self.store.write_target(&module.name, language, &merged)?;
        }

        Ok((items.len(), new_items, updated_items))
    }

    /// Reconcile every registered module, strictly sequentially, continuing
    /// past individual failures. Never fails as a whole; partial success is
    /// an expected result.
    pub fn reconcile_all(&self) -> BatchOutcome {
        let started = Instant::now();
        tracing::info!(modules = self.registry.len(), "starting batch reconciliation");

        let mut results = Vec::with_capacity(self.registry.len());
        for module in self.registry.iter() {
            // Registered names always resolve; reconcile_module only errors
            // on unknown names.
            match self.reconcile_module(&module.name) {
                Ok(outcome) => results.push(outcome),
                Err(e) => results.push(ScrapeOutcome {
                    module_name: module.name.clone(),
                    items_processed: 0,
                    new_items: 0,
                    updated_items: 0,
                    duration: 0,
                    success: false,
                    error: Some(e.to_string()),
                }),
            }
        }

        let successful_modules = results.iter().filter(|r| r.success).count();
        let outcome = BatchOutcome {
            total_modules: results.len(),
            successful_modules,
            failed_modules: results.len() - successful_modules,
            results,
            total_duration: started.elapsed().as_millis() as u64,
        };
        tracing::info!(
            total = outcome.total_modules,
            successful = outcome.successful_modules,
            failed = outcome.failed_modules,
            duration_ms = outcome.total_duration,
            "batch reconciliation finished"
        );
        outcome
    }

    /// Aggregated rows for review: every source key with its text in every
    /// configured language, in source-file order. Target entries missing
    /// from disk are filled with the untranslated source text.
    pub fn module_data(&self, name: &str) -> Result<Vec<ModuleRow>> {
        let module = self.module(name)?;
        let source_entries = self.store.read_source(&module.name);

        let target_data: Vec<(String, TargetEntries)> = self
            .config
            .target_languages()
            .map(|language| (language.to_string(), self.store.read_target(&module.name, language)))
            .collect();

        let mut rows = Vec::with_capacity(source_entries.len());
        for (key, source_text) in &source_entries {
            let mut translations = IndexMap::new();
            for language in &self.config.languages {
                if language == self.store.source_language() {
                    translations.insert(
                        language.clone(),
                        TranslationCell::Source(source_text.clone()),
                    );
                    continue;
                }
                let entry = target_data
                    .iter()
                    .find(|(l, _)| l == language)
                    .and_then(|(_, entries)| entries.get(key))
                    .cloned()
                    .unwrap_or_else(|| TranslationValue::untranslated(source_text));
                translations.insert(language.clone(), TranslationCell::Target(entry));
            }
            rows.push(ModuleRow {
                key: key.clone(),
                translations,
            });
        }
        Ok(rows)
    }

    /// Apply a single translation edit. Fails loudly: there is no batch to
    /// protect, so storage errors propagate to the caller.
    pub fn update_translation(&self, name: &str, update: TranslationUpdate) -> Result<()> {
        let module = self.module(name)?;
        if !self.config.is_valid_language(&update.lang) {
            return Err(Error::Validation(format!(
                "unknown language: {}",
                update.lang
            )));
        }

        self.store.update_translation(
            &module.name,
            &update.key,
            &update.lang,
            update.value.clone(),
            update.translated,
        )?;
        tracing::info!(
            module = name,
            key = %update.key,
            lang = %update.lang,
            translated = update.translated.unwrap_or(true),
            "translation updated"
        );
        Ok(())
    }

    /// Completion statistics for one module.
    pub fn module_stats(&self, name: &str) -> Result<ModuleStats> {
        let module = self.module(name)?;
        Ok(stats::compute(module, &self.store, &self.config))
    }
}
