//! Graph projection of a crawl job's results.
//!
//! A completed crawl is a flat list of scraped pages; presentation layers
//! usually want a node/edge view of it. [`CrawlMap`] is that view: a pure,
//! immutable projection built once from the raw crawl status document and
//! safe to share across concurrent readers.

use crate::error::{Error, Result};
use serde_json::Value;

/// A page discovered during a crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlPage {
    /// Identifier unique within the owning [`CrawlMap`].
    pub id: String,
    /// URL of the page.
    pub url: String,
    /// Page title.
    pub title: String,
    /// Traversal depth from the root URL.
    pub depth: u32,
    /// HTTP status code seen when fetching the page.
    pub status: u16,
}

/// A directed link between two crawled pages.
///
/// `source_id` and `target_id` are non-owning references into the same map's
/// `pages`. A link referencing an absent page id is tolerated; lookups
/// return `None` rather than panicking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlLink {
    /// Identifier unique within the owning [`CrawlMap`].
    pub id: String,
    /// Id of the page the link originates from.
    pub source_id: String,
    /// Id of the page the link points to.
    pub target_id: String,
    /// Link text content.
    pub text: String,
}

/// Node/edge view of a crawl job's results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlMap {
    /// The crawl job this map was built from.
    pub job_id: String,
    /// The root URL the crawl started from.
    pub root_url: String,
    /// Pages discovered, in document order.
    pub pages: Vec<CrawlPage>,
    /// Links between pages, in document order.
    pub links: Vec<CrawlLink>,
}

impl CrawlMap {
    /// Build a map from a raw crawl status document.
    ///
    /// Two document shapes are understood. A pre-shaped graph document
    /// carries `pages` and `links` arrays with explicit ids. The Firecrawl
    /// status envelope instead carries a `data` array of scraped pages, from
    /// which pages are derived (url, title and status code read from each
    /// entry's metadata) with sequential ids and no links.
    ///
    /// This is a pure function: the same document always produces a
    /// structurally equal map.
    pub fn from_status(job_id: &str, root_url: &str, status: &Value) -> Result<Self> {
        let (pages, links) = if status.get("pages").is_some() {
            (
                decode_pages(status.get("pages").unwrap_or(&Value::Null))?,
                decode_links(status.get("links"))?,
            )
        } else {
            (derive_pages_from_data(status)?, Vec::new())
        };

        Ok(CrawlMap {
            job_id: job_id.to_string(),
            root_url: root_url.to_string(),
            pages,
            links,
        })
    }

    /// Look up a page by id.
    ///
    /// Returns `None` for unknown ids, including dangling link references.
    pub fn page(&self, id: &str) -> Option<&CrawlPage> {
        self.pages.iter().find(|p| p.id == id)
    }
}

fn decode_pages(pages: &Value) -> Result<Vec<CrawlPage>> {
    let entries = pages
        .as_array()
        .ok_or_else(|| Error::decode("pages", "expected an array"))?;

    entries
        .iter()
        .map(|entry| {
            Ok(CrawlPage {
                id: required_str(entry, "id")?,
                url: required_str(entry, "url")?,
                title: optional_str(entry, "title").unwrap_or_default(),
                depth: entry.get("depth").and_then(Value::as_u64).unwrap_or(0) as u32,
                status: entry
                    .get("status")
                    .and_then(Value::as_u64)
                    .and_then(|n| u16::try_from(n).ok())
                    .unwrap_or(0),
            })
        })
        .collect()
}

fn decode_links(links: Option<&Value>) -> Result<Vec<CrawlLink>> {
    let entries = match links {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(v) => v
            .as_array()
            .ok_or_else(|| Error::decode("links", "expected an array"))?,
    };

    entries
        .iter()
        .map(|entry| {
            Ok(CrawlLink {
                id: required_str(entry, "id")?,
                source_id: required_str(entry, "source")?,
                target_id: required_str(entry, "target")?,
                text: optional_str(entry, "text").unwrap_or_default(),
            })
        })
        .collect()
}

/// Derive pages from the Firecrawl status envelope's `data` array.
fn derive_pages_from_data(status: &Value) -> Result<Vec<CrawlPage>> {
    let entries = match status.get("data") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(v) => v
            .as_array()
            .ok_or_else(|| Error::decode("data", "expected an array"))?,
    };

    Ok(entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let metadata = entry.get("metadata").unwrap_or(&Value::Null);
            CrawlPage {
                id: format!("page-{index}"),
                url: optional_str(metadata, "sourceURL").unwrap_or_default(),
                title: optional_str(metadata, "title").unwrap_or_default(),
                depth: 0,
                status: metadata
                    .get("statusCode")
                    .and_then(Value::as_u64)
                    .and_then(|n| u16::try_from(n).ok())
                    .unwrap_or(0),
            }
        })
        .collect())
}

fn required_str(entry: &Value, key: &str) -> Result<String> {
    entry
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::decode(key, "expected a string"))
}

fn optional_str(entry: &Value, key: &str) -> Option<String> {
    entry.get(key).and_then(Value::as_str).map(str::to_string)
}
