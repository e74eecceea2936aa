//! Catalog page-walker: the item source for the upstream site.
//!
//! Every catalog section (tags, origins, each tag group) shares the same
//! markup, so one parameterized [`CatalogSource`] covers them all: walk
//! `?page=N` sequentially, extract `{id, name}` pairs from the listing
//! markup, stop when a page is empty or the pagination has no active "next"
//! link. Pacing and bounded retry keep the walker polite to the upstream
//! site.

pub mod dom;

use std::collections::HashSet;
use std::thread;
use std::time::Duration;

use url::Url;

use crate::config::ScraperConfig;
use crate::error::{Error, Result};
use crate::registry::{ItemSource, ScrapedItem};

/// Listing entry markers in the upstream markup.
const ITEM_CLASS: &str = "group-list-li";
const NAME_CLASS: &str = "group-list-li-a-chara2";
const PAGINATION_CLASS: &str = "pagination";
const NEXT_CLASS: &str = "next";
const DISABLED_CLASS: &str = "disabled";

/// Items extracted from one catalog page.
#[derive(Debug, Clone)]
pub struct PageItems {
    pub items: Vec<ScrapedItem>,
    pub has_next_page: bool,
}

/// Extract catalog items and the next-page flag from raw page bytes.
///
/// An item is an element with class `group-list-li` containing an anchor;
/// the id is the last path segment of the anchor's `href`, the name is the
/// trimmed text of the anchor's `group-list-li-a-chara2` descendant. Items
/// with an empty id or name are skipped.
pub fn parse_catalog_page(body: &[u8], charset: &str) -> PageItems {
    let dom_tree = dom::html_to_dom(body, charset);

    let mut items = Vec::new();
    for element in dom::find_nodes_by_class(&dom_tree.document, ITEM_CLASS) {
        let anchors = dom::find_nodes_by_name(&element, "a");
        let Some(anchor) = anchors.first() else {
            continue;
        };
        let Some(href) = dom::get_node_attr(anchor, "href") else {
            continue;
        };

        // Last path segment of the href; a trailing slash yields an empty
        // id and the entry is skipped.
        let id = href.rsplit('/').next().unwrap_or("").to_string();
        let name = dom::find_nodes_by_class(anchor, NAME_CLASS)
            .first()
            .map(|n| dom::node_text(n).trim().to_string())
            .unwrap_or_default();

        if !id.is_empty() && !name.is_empty() {
            items.push(ScrapedItem::new(id, name));
        }
    }

    // Next page exists when the pagination block has a non-disabled "next"
    // link.
    let has_next_page = dom::find_nodes_by_class(&dom_tree.document, PAGINATION_CLASS)
        .iter()
        .flat_map(|p| dom::find_nodes_by_class(p, NEXT_CLASS))
        .any(|next| !dom::has_class(&next, DISABLED_CLASS));

    PageItems {
        items,
        has_next_page,
    }
}

/// Paginated item source for one catalog section.
#[derive(Debug, Clone)]
pub struct CatalogSource {
    section_url: Url,
    scraper: ScraperConfig,
}

impl CatalogSource {
    pub fn new(section_url: Url, scraper: ScraperConfig) -> Self {
        Self {
            section_url,
            scraper,
        }
    }

    fn page_url(&self, page: u32) -> Url {
        if page == 1 {
            self.section_url.clone()
        } else {
            let mut url = self.section_url.clone();
            url.set_query(Some(&format!("page={page}")));
            url
        }
    }

    fn fetch_page(&self, client: &reqwest::blocking::Client, url: &Url) -> Result<(Vec<u8>, String)> {
        let response = client
            .get(url.as_str())
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::Fetch(format!("GET {url} failed: {e}")))?;

        let charset = charset_from_content_type(
            response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
        );
        let body = response
            .bytes()
            .map_err(|e| Error::Fetch(format!("reading body of {url} failed: {e}")))?;
        Ok((body.to_vec(), charset))
    }
}

impl ItemSource for CatalogSource {
    /// Walk every page of the section. A page fetch is retried with a longer
    /// pause up to `max_retries` times; if it still fails, the walk stops
    /// and returns what it has, unless nothing was collected at all, which
    /// is a fetch error.
    fn fetch_items(&self) -> Result<Vec<ScrapedItem>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(self.scraper.timeout_ms))
            .user_agent(self.scraper.user_agent.as_str())
            .build()
            .map_err(|e| Error::Fetch(format!("building HTTP client failed: {e}")))?;

        let delay = Duration::from_millis(self.scraper.request_delay_ms);
        let mut results: Vec<ScrapedItem> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut page = 1u32;
        let mut retries = 0u32;

        loop {
            let url = self.page_url(page);
            tracing::debug!(%url, page, "fetching catalog page");

            let (body, charset) = match self.fetch_page(&client, &url) {
                Ok(fetched) => fetched,
                Err(e) => {
                    if retries < self.scraper.max_retries {
                        retries += 1;
                        tracing::warn!(%url, error = %e, retry = retries, "page fetch failed, retrying");
                        thread::sleep(delay * 3);
                        continue;
                    }
                    if results.is_empty() {
                        return Err(e);
                    }
                    tracing::error!(%url, error = %e, collected = results.len(),
                        "page fetch failed after retries, stopping walk with partial results");
                    break;
                }
            };
            retries = 0;

            let parsed = parse_catalog_page(&body, &charset);
            if parsed.items.is_empty() {
                tracing::debug!(page, "page yielded no items, stopping walk");
                break;
            }
            for item in parsed.items {
                if seen.insert(item.id.clone()) {
                    results.push(item);
                }
            }

            if !parsed.has_next_page {
                break;
            }
            page += 1;
            thread::sleep(delay);
        }

        tracing::info!(url = %self.section_url, items = results.len(), pages = page, "section walk finished");
        Ok(results)
    }
}

/// Pull the charset out of a Content-Type header value, defaulting to UTF-8.
fn charset_from_content_type(content_type: Option<&str>) -> String {
    content_type
        .and_then(|value| {
            value.split(';').find_map(|part| {
                part.trim()
                    .strip_prefix("charset=")
                    .map(|c| c.trim_matches('"').to_string())
            })
        })
        .unwrap_or_else(|| "utf-8".to_string())
}
