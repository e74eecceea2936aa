//! Module registry: which catalog sections exist and how to scrape them.
//!
//! The registry is an explicit value handed to the [`crate::Reconciler`], so
//! tests can supply fake modules and item sources without touching global
//! state.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::AppConfig;
use crate::error::Result;
use crate::scrape::CatalogSource;

/// A raw item scraped from the upstream site, before key prefixing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedItem {
    /// Opaque identifier assigned by the source site.
    pub id: String,
    /// Source-language display text.
    pub name: String,
}

impl ScrapedItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Capability to produce the current item list for one module.
///
/// Implementations own their pagination, pacing and retry behavior; the
/// reconciliation engine only sees the final list. A fetch may be slow and
/// may fail.
pub trait ItemSource: Send + Sync {
    fn fetch_items(&self) -> Result<Vec<ScrapedItem>>;
}

/// One logical content category (tags, origins, a tag group, ...).
#[derive(Clone)]
pub struct Module {
    /// Unique, stable name; doubles as storage namespace and API path segment.
    pub name: String,

    /// Prefix prepended to every scraped id to form a translation key.
    /// Prevents collisions between modules that share an id space.
    pub key_prefix: String,

    pub display_name: String,
    pub description: String,

    pub source: Arc<dyn ItemSource>,
}

impl Module {
    /// Translation key for a scraped item: `key_prefix + id`.
    pub fn key_for(&self, item: &ScrapedItem) -> String {
        format!("{}{}", self.key_prefix, item.id)
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("key_prefix", &self.key_prefix)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of modules. Order is the batch reconciliation order.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: Vec<Module>,
}

impl ModuleRegistry {
    pub fn new(modules: Vec<Module>) -> Self {
        Self { modules }
    }

    pub fn get(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Number of tag-group sections on the upstream site.
const TAG_GROUP_COUNT: u32 = 8;

/// Build the registry for the upstream catalog site: `tags`, `origins`, and
/// one module per tag group, each backed by a paginated [`CatalogSource`].
pub fn default_registry(config: &AppConfig) -> Result<ModuleRegistry> {
    let site = Url::parse(&config.site_url)
        .map_err(|e| crate::Error::Config(format!("invalid site URL {:?}: {e}", config.site_url)))?;
    let join = |path: &str| {
        site.join(path)
            .map_err(|e| crate::Error::Config(format!("invalid section path {path:?}: {e}")))
    };

    let mut modules = vec![
        Module {
            name: "tags".to_string(),
            key_prefix: String::new(),
            display_name: "Tag Groups".to_string(),
            description: format!("All tag groups [{}/tags]", config.site_url),
            source: Arc::new(CatalogSource::new(join("tags")?, config.scraper.clone())),
        },
        Module {
            name: "origins".to_string(),
            key_prefix: "origin_".to_string(),
            display_name: "Origins".to_string(),
            description: format!("All origins [{}/origins]", config.site_url),
            source: Arc::new(CatalogSource::new(join("origins")?, config.scraper.clone())),
        },
    ];

    for group in 1..=TAG_GROUP_COUNT {
        modules.push(Module {
            name: format!("tag_group_{group}"),
            key_prefix: format!("tag_group_{group}_"),
            display_name: format!("Tag Group {group}"),
            description: format!("Tags in group {group} [{}/tag-groups/{group}]", config.site_url),
            source: Arc::new(CatalogSource::new(
                join(&format!("tag-groups/{group}"))?,
                config.scraper.clone(),
            )),
        });
    }

    Ok(ModuleRegistry::new(modules))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_lists_all_sections() {
        let registry = default_registry(&AppConfig::default()).unwrap();
        assert_eq!(registry.len(), 2 + TAG_GROUP_COUNT as usize);
        assert!(registry.contains("tags"));
        assert!(registry.contains("origins"));
        assert!(registry.contains("tag_group_1"));
        assert!(registry.contains("tag_group_8"));
        assert!(!registry.contains("tag_group_9"));
    }

    #[test]
    fn keys_are_prefixed_per_module() {
        let registry = default_registry(&AppConfig::default()).unwrap();
        let item = ScrapedItem::new("42", "アクション");
        assert_eq!(registry.get("tags").unwrap().key_for(&item), "42");
        assert_eq!(registry.get("origins").unwrap().key_for(&item), "origin_42");
        assert_eq!(
            registry.get("tag_group_3").unwrap().key_for(&item),
            "tag_group_3_42"
        );
    }
}
