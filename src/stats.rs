//! Translation completion statistics, derived from the store on demand.

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::AppConfig;
use crate::registry::Module;
use crate::store::TranslationStore;

/// Per-language completion numbers for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageStats {
    pub total: usize,
    pub translated: usize,
    /// Rounded percentage, 0..=100.
    pub progress: u8,
}

/// Completion summary for one module across all configured languages.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleStats {
    pub module_name: String,
    pub display_name: String,
    pub description: String,
    /// Number of keys in the source-language file.
    pub total_items: usize,
    /// Overall progress across all target languages, 0..=100.
    pub progress: u8,
    /// Keyed by language, in configured language order.
    pub language_stats: IndexMap<String, LanguageStats>,
}

/// Integer percentage with round-half-up semantics; 0 when `whole` is 0.
fn percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u8
}

/// Compute completion stats for one module.
///
/// The source language always reports 100%. Entries absent from a target
/// file count as untranslated, not as errors. A module with no source keys
/// reports 0 everywhere instead of dividing by zero.
pub(crate) fn compute(module: &Module, store: &TranslationStore, config: &AppConfig) -> ModuleStats {
    let source_entries = store.read_source(&module.name);
    let total_items = source_entries.len();

    let mut language_stats = IndexMap::new();
    let mut total_translated = 0;

    for language in &config.languages {
        if language == store.source_language() {
            language_stats.insert(
                language.clone(),
                LanguageStats {
                    total: total_items,
                    translated: total_items,
                    progress: 100,
                },
            );
            continue;
        }

        let entries = store.read_target(&module.name, language);
        let translated = entries.values().filter(|v| v.translated).count();
        language_stats.insert(
            language.clone(),
            LanguageStats {
                total: total_items,
                translated,
                progress: percentage(translated, total_items),
            },
        );
        total_translated += translated;
    }

    let target_count = config.target_languages().count();
    let progress = if target_count == 0 {
        // Only the source language is configured; nothing to translate.
        100
    } else {
        percentage(total_translated, total_items * target_count)
    };

    ModuleStats {
        module_name: module.name.clone(),
        display_name: module.display_name.clone(),
        description: module.description.clone(),
        total_items,
        progress,
        language_stats,
    }
}
