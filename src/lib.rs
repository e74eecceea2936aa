//! lexicat
//!
//! Scrapes catalog metadata (tags, origins, tag groups) from one upstream
//! site into per-module, per-language JSON translation files, and exposes
//! the operations an admin CLI or API needs: reconcile scrapes into the
//! store without losing translation work, review aggregated module data,
//! edit single translations, and compute completion statistics.

pub mod config;
pub mod error;
pub mod reconcile;
pub mod registry;
pub mod scrape;
pub mod stats;
pub mod store;

#[cfg(feature = "web")]
pub mod web;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use reconcile::Reconciler;
