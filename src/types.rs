//! API types for the AgniKit client.

use crate::json::JsonValue;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Default scrape timeout passed to the service, in milliseconds.
pub const DEFAULT_SCRAPE_TIMEOUT_MS: u64 = 30_000;

/// Output formats the scrape endpoint can produce.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ScrapeFormat {
    /// Markdown rendering of the page content.
    Markdown,
    /// Cleaned HTML.
    Html,
    /// The unmodified page HTML.
    RawHtml,
    /// A base64-encoded screenshot.
    Screenshot,
    /// Links found on the page.
    Links,
}

/// Request for scraping a single URL.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    /// URL to scrape.
    pub url: String,
    /// Output formats to request.
    pub formats: Vec<ScrapeFormat>,
    /// Only extract the main content of the page.
    pub only_main_content: bool,
    /// HTML tags to include.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_tags: Option<Vec<String>>,
    /// HTML tags to exclude.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_tags: Option<Vec<String>>,
    /// Extra HTTP headers the service should send to the target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    /// Milliseconds to wait for the page before extraction.
    #[serde(rename = "waitFor", skip_serializing_if = "Option::is_none")]
    pub wait_for_ms: Option<u64>,
    /// Server-side timeout for the scrape, in milliseconds.
    #[serde(rename = "timeout")]
    pub timeout_ms: u64,
    /// LLM extraction options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract: Option<Value>,
    /// Browser actions to perform before scraping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<Value>>,
}

impl Default for ScrapeRequest {
    fn default() -> Self {
        Self {
            url: String::new(),
            formats: vec![ScrapeFormat::Markdown],
            only_main_content: true,
            include_tags: None,
            exclude_tags: None,
            headers: None,
            wait_for_ms: None,
            timeout_ms: DEFAULT_SCRAPE_TIMEOUT_MS,
            extract: None,
            actions: None,
        }
    }
}

/// Response from the scrape endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeResponse {
    /// Whether the scrape succeeded.
    pub success: bool,
    /// The scraped content and associated information.
    pub data: ScrapeData,
}

/// Scraped content for a single page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeData {
    /// Markdown rendering, when requested.
    pub markdown: Option<String>,
    /// Cleaned HTML, when requested.
    pub html: Option<String>,
    /// Raw page HTML, when requested.
    pub raw_html: Option<String>,
    /// Base64-encoded screenshot, when requested.
    pub screenshot: Option<String>,
    /// Links found on the page, when requested.
    pub links: Option<Vec<String>>,
    /// Results of browser actions performed during the scrape.
    pub actions: Option<ScrapeActions>,
    /// Page metadata.
    pub metadata: Metadata,
    /// LLM extraction output, shaped by the request's `extract` options.
    #[serde(rename = "llm_extraction")]
    pub llm_extraction: Option<HashMap<String, JsonValue>>,
    /// Warning emitted by the service, if any.
    pub warning: Option<String>,
}

/// Action artifacts produced during a scrape.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeActions {
    /// Base64-encoded screenshots taken by screenshot actions.
    pub screenshots: Option<Vec<String>>,
}

/// Metadata about a scraped page.
///
/// The service's metadata object is an open schema: keys it adds in future
/// versions land in [`additional_info`](Metadata::additional_info) instead of
/// failing the decode. Only string-valued unknown keys are captured.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Metadata {
    /// Page title.
    pub title: Option<String>,
    /// Page description.
    pub description: Option<String>,
    /// Detected content language.
    pub language: Option<String>,
    /// The URL that was scraped.
    pub source_url: Option<String>,
    /// HTTP status code the service saw when fetching the page.
    pub status_code: Option<u16>,
    /// Error message associated with the fetch, if any.
    pub error: Option<String>,
    /// String-valued keys outside the known set, preserved verbatim.
    pub additional_info: Option<HashMap<String, String>>,
}

/// Keys decoded into named [`Metadata`] fields; everything else is routed to
/// `additional_info`.
const METADATA_KNOWN_KEYS: [&str; 6] = [
    "title",
    "description",
    "language",
    "sourceURL",
    "statusCode",
    "error",
];

impl<'de> Deserialize<'de> for Metadata {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = serde_json::Map::deserialize(deserializer)?;

        let get_str = |key: &str| -> Option<String> {
            map.get(key).and_then(Value::as_str).map(str::to_string)
        };

        let status_code = match map.get("statusCode") {
            None | Some(Value::Null) => None,
            Some(v) => Some(
                v.as_u64()
                    .and_then(|n| u16::try_from(n).ok())
                    .ok_or_else(|| de::Error::custom("statusCode is not an HTTP status code"))?,
            ),
        };

        let mut additional = HashMap::new();
        for (key, value) in &map {
            if METADATA_KNOWN_KEYS.contains(&key.as_str()) {
                continue;
            }
            if let Some(s) = value.as_str() {
                additional.insert(key.clone(), s.to_string());
            }
        }

        Ok(Metadata {
            title: get_str("title"),
            description: get_str("description"),
            language: get_str("language"),
            source_url: get_str("sourceURL"),
            status_code,
            error: get_str("error"),
            additional_info: (!additional.is_empty()).then_some(additional),
        })
    }
}

/// Request for starting a crawl job.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlRequest {
    /// Root URL to crawl from.
    pub url: String,
    /// URL path patterns to exclude.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_paths: Option<Vec<String>>,
    /// URL path patterns to include.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_paths: Option<Vec<String>>,
    /// Maximum traversal depth from the root URL.
    pub max_depth: u32,
    /// Skip the site's sitemap.xml.
    pub ignore_sitemap: bool,
    /// Maximum number of pages to crawl.
    pub limit: u32,
    /// Follow links to previously visited pages.
    pub allow_backward_links: bool,
    /// Follow links to external domains.
    pub allow_external_links: bool,
    /// Webhook URL notified on completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook: Option<String>,
    /// Scrape options applied to each crawled page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrape_options: Option<Value>,
}

impl Default for CrawlRequest {
    fn default() -> Self {
        Self {
            url: String::new(),
            exclude_paths: None,
            include_paths: None,
            max_depth: 2,
            ignore_sitemap: true,
            limit: 10,
            allow_backward_links: false,
            allow_external_links: false,
            webhook: None,
            scrape_options: None,
        }
    }
}

/// Response when a crawl job is accepted.
#[derive(Debug, Clone)]
pub struct CrawlJobCreated {
    /// Unique job identifier, polled via the crawl status endpoint.
    pub job_id: String,
    /// The full decoded response document.
    pub raw: Value,
}

/// Response from cancelling a crawl job.
#[derive(Debug, Clone, Deserialize)]
pub struct CancelResponse {
    /// Whether the cancellation was accepted.
    pub success: bool,
    /// Message from the service, if any.
    pub message: Option<String>,
}

/// Request for link discovery without content extraction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapRequest {
    /// URL to map.
    pub url: String,
    /// Search term to filter discovered links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Skip the site's sitemap.xml.
    pub ignore_sitemap: bool,
    /// Include links on subdomains.
    pub include_subdomains: bool,
    /// Maximum number of links to return.
    pub limit: u32,
}

impl Default for MapRequest {
    fn default() -> Self {
        Self {
            url: String::new(),
            search: None,
            ignore_sitemap: true,
            include_subdomains: false,
            limit: 5000,
        }
    }
}

/// Response from the map endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MapResponse {
    /// Whether the mapping succeeded.
    pub success: bool,
    /// Discovered links, in service order.
    pub links: Vec<String>,
}

/// Request for scraping a batch of URLs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchScrapeRequest {
    /// URLs to scrape. Must be non-empty.
    pub urls: Vec<String>,
    /// Output formats to request for every URL.
    pub formats: Vec<ScrapeFormat>,
    /// Only extract the main content of each page.
    pub only_main_content: bool,
    /// Server-side timeout per URL, in milliseconds.
    #[serde(rename = "timeout")]
    pub timeout_ms: u64,
}

impl Default for BatchScrapeRequest {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            formats: vec![ScrapeFormat::Markdown],
            only_main_content: true,
            timeout_ms: DEFAULT_SCRAPE_TIMEOUT_MS,
        }
    }
}

/// Progress envelope for a batch scrape job.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchScrapeResponse {
    /// Current job status, e.g. `scraping` or `completed`.
    pub status: String,
    /// Total number of URLs in the batch.
    pub total: u32,
    /// Number of URLs scraped so far.
    pub completed: u32,
    /// API credits consumed by the job.
    pub credits_used: u32,
    /// Timestamp after which the results expire.
    pub expires_at: String,
    /// Per-URL results available so far.
    #[serde(default)]
    pub data: Vec<BatchScrapeResult>,
}

impl BatchScrapeResponse {
    /// Check the service's progress invariants.
    ///
    /// The service contract promises `completed <= total` and no more
    /// results than completed URLs; a violating envelope indicates a
    /// malformed response and is surfaced as a decode failure rather than
    /// accepted silently.
    pub fn validate(&self) -> crate::Result<()> {
        if self.completed > self.total {
            return Err(crate::Error::decode(
                "completed",
                format!(
                    "completed ({}) exceeds total ({})",
                    self.completed, self.total
                ),
            ));
        }
        if self.data.len() as u32 > self.completed {
            return Err(crate::Error::decode(
                "data",
                format!(
                    "{} results for {} completed URLs",
                    self.data.len(),
                    self.completed
                ),
            ));
        }
        Ok(())
    }
}

/// Scraped result for a single URL in a batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchScrapeResult {
    /// Markdown rendering, when requested.
    pub markdown: Option<String>,
    /// Cleaned HTML, when requested.
    pub html: Option<String>,
    /// Page metadata.
    pub metadata: Metadata,
}

/// Response when an asynchronous batch scrape job is accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchScrapeJob {
    /// Whether the job was accepted.
    pub success: bool,
    /// Unique job identifier.
    pub id: String,
    /// URL to poll for job status.
    #[serde(rename = "url")]
    pub status_url: String,
}
