// Shared helpers for integration tests: fake item sources and a reconciler
// wired to a temporary data directory.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

use lexicat::config::AppConfig;
use lexicat::registry::{ItemSource, Module, ModuleRegistry, ScrapedItem};
use lexicat::{Error, Reconciler, Result};

pub fn item(id: &str, name: &str) -> ScrapedItem {
    ScrapedItem::new(id, name)
}

/// Source returning the same items on every fetch.
pub struct FixedSource(pub Vec<ScrapedItem>);

impl ItemSource for FixedSource {
    fn fetch_items(&self) -> Result<Vec<ScrapedItem>> {
        Ok(self.0.clone())
    }
}

/// Source that always fails.
pub struct FailingSource(pub &'static str);

impl ItemSource for FailingSource {
    fn fetch_items(&self) -> Result<Vec<ScrapedItem>> {
        Err(Error::Fetch(self.0.to_string()))
    }
}

/// Source returning a different item list on each consecutive fetch.
pub struct SequenceSource {
    runs: Mutex<VecDeque<Vec<ScrapedItem>>>,
}

impl SequenceSource {
    pub fn new(runs: Vec<Vec<ScrapedItem>>) -> Self {
        Self {
            runs: Mutex::new(runs.into()),
        }
    }
}

impl ItemSource for SequenceSource {
    fn fetch_items(&self) -> Result<Vec<ScrapedItem>> {
        self.runs
            .lock()
            .expect("sequence source lock")
            .pop_front()
            .ok_or_else(|| Error::Fetch("sequence source exhausted".to_string()))
    }
}

pub fn module(name: &str, key_prefix: &str, source: Arc<dyn ItemSource>) -> Module {
    Module {
        name: name.to_string(),
        key_prefix: key_prefix.to_string(),
        display_name: name.to_string(),
        description: format!("test module {name}"),
        source,
    }
}

/// Config with languages ja (source), en, zh-CN rooted at `data_dir`.
pub fn test_config(data_dir: &Path) -> AppConfig {
    AppConfig {
        data_dir: data_dir.to_path_buf(),
        languages: vec!["ja".to_string(), "en".to_string(), "zh-CN".to_string()],
        source_language: "ja".to_string(),
        ..AppConfig::default()
    }
}

pub fn reconciler(data_dir: &Path, modules: Vec<Module>) -> Reconciler {
    Reconciler::new(test_config(data_dir), ModuleRegistry::new(modules))
}

/// Raw contents of one translation file, for byte-level comparisons.
pub fn raw_file(reconciler: &Reconciler, module: &str, language: &str) -> String {
    std::fs::read_to_string(reconciler.store().language_file(module, language))
        .expect("translation file should exist")
}
