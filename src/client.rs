//! Main AgniKit client implementation.

use crate::error::{Error, Result};
use crate::types::*;
use crate::version::build_user_agent;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.firecrawl.dev";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builder for constructing a [`Client`].
pub struct ClientBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
    user_agent_suffix: Option<String>,
}

impl ClientBuilder {
    /// Create a new client builder with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent_suffix: None,
        }
    }

    /// Set the API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the transport-level deadline applied to every call.
    ///
    /// This is distinct from the `timeout_ms` field in scrape requests,
    /// which the service interprets server-side.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom User-Agent suffix.
    pub fn user_agent_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.user_agent_suffix = Some(suffix.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<Client> {
        if self.api_key.is_empty() {
            return Err(Error::Config("API key is required".into()));
        }

        // Warn about insecure connections
        if !self.base_url.starts_with("https://") {
            warn!(
                base_url = %self.base_url,
                "API base URL is not using HTTPS. This is insecure."
            );
        }

        let auth_header = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|_| Error::Config("API key contains invalid header characters".into()))?;

        let user_agent = build_user_agent(self.user_agent_suffix.as_deref());
        let user_agent_header = HeaderValue::from_str(&user_agent)
            .map_err(|_| Error::Config("User-Agent suffix contains invalid characters".into()))?;

        let http_client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(Error::Transport)?;

        Ok(Client {
            base_url: self.base_url,
            http_client,
            auth_header,
            user_agent_header,
        })
    }
}

/// Client for the Firecrawl scraping API.
///
/// The client is the single authenticated entry point for all remote
/// operations. It holds no mutable state, so a single instance can be
/// shared freely across concurrent callers. Each operation performs exactly
/// one round trip with no implicit retries: starting a crawl or a batch job
/// is billed and side-effecting, and whether to retry must stay an explicit
/// caller decision.
///
/// # Example
///
/// ```rust,no_run
/// use agnikit::{Client, ScrapeRequest};
///
/// #[tokio::main]
/// async fn main() -> Result<(), agnikit::Error> {
///     let client = Client::builder("your-api-key").build()?;
///
///     let result = client.scrape(ScrapeRequest {
///         url: "https://example.com".into(),
///         ..Default::default()
///     }).await?;
///
///     println!("{:?}", result.data.markdown);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Client {
    base_url: String,
    http_client: reqwest::Client,
    auth_header: HeaderValue,
    user_agent_header: HeaderValue,
}

impl Client {
    /// Create a new client builder.
    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// Scrape a single URL.
    ///
    /// Succeeds only when the service answers HTTP 200 with a
    /// `success: true` envelope carrying a `data` object.
    pub async fn scrape(&self, request: ScrapeRequest) -> Result<ScrapeResponse> {
        let value = self.post_value("/v1/scrape", &request).await?;
        ensure_envelope_success(&value)?;
        if value.get("data").is_none() {
            return Err(Error::decode("data", "missing from response envelope"));
        }
        serde_json::from_value(value).map_err(Error::from_json)
    }

    /// Start an asynchronous crawl job.
    ///
    /// Returns the accepted job's id along with the full response document;
    /// poll [`get_crawl_status`](Client::get_crawl_status) at your own
    /// cadence to follow its progress.
    pub async fn crawl(&self, request: CrawlRequest) -> Result<CrawlJobCreated> {
        let value = self.post_value("/v1/crawl", &request).await?;
        ensure_envelope_success(&value)?;
        let job_id = value
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::decode("id", "missing job id in response"))?
            .to_string();
        Ok(CrawlJobCreated { job_id, raw: value })
    }

    /// Get the raw status document for a crawl job.
    ///
    /// The client performs no polling of its own; callers re-invoke this at
    /// their chosen cadence. Once a job is cancelled or its results have
    /// expired, the service may legitimately answer 404.
    pub async fn get_crawl_status(&self, job_id: &str) -> Result<Value> {
        self.get_value(&format!("/v1/crawl/{job_id}")).await
    }

    /// Cancel a crawl job.
    ///
    /// Cancellation is one-way and not idempotent: a second cancel of the
    /// same job surfaces whatever the service answers, commonly
    /// [`Error::Http`] with status 404.
    pub async fn cancel_crawl(&self, job_id: &str) -> Result<CancelResponse> {
        let value = self.delete_value(&format!("/v1/crawl/{job_id}")).await?;
        ensure_envelope_success(&value)?;
        serde_json::from_value(value).map_err(Error::from_json)
    }

    /// Discover links on a site without extracting content.
    pub async fn map(&self, request: MapRequest) -> Result<MapResponse> {
        let value = self.post_value("/v1/map", &request).await?;
        ensure_envelope_success(&value)?;

        let links = value
            .get("links")
            .ok_or_else(|| Error::decode("links", "missing from response envelope"))?;
        if !links
            .as_array()
            .is_some_and(|l| l.iter().all(Value::is_string))
        {
            return Err(Error::decode("links", "expected an array of strings"));
        }

        serde_json::from_value(value).map_err(Error::from_json)
    }

    /// Scrape a batch of URLs, waiting for the service to finish all of them.
    ///
    /// The call suspends until the remote service completes the whole batch;
    /// its duration is bounded only by the client's transport deadline.
    pub async fn batch_scrape(&self, request: BatchScrapeRequest) -> Result<BatchScrapeResponse> {
        require_urls(&request)?;
        let value = self.post_value("/v1/batch/scrape", &request).await?;
        let response: BatchScrapeResponse =
            serde_json::from_value(value).map_err(Error::from_json)?;
        response.validate()?;
        Ok(response)
    }

    /// Create an asynchronous batch scrape job.
    ///
    /// Returns as soon as the job is accepted; poll
    /// [`get_batch_scrape_status`](Client::get_batch_scrape_status) to
    /// follow its progress.
    pub async fn create_batch_scrape_job(
        &self,
        request: BatchScrapeRequest,
    ) -> Result<BatchScrapeJob> {
        require_urls(&request)?;

        let mut body = serde_json::to_value(&request).map_err(Error::from_json)?;
        if let Some(map) = body.as_object_mut() {
            map.insert("async".to_string(), Value::Bool(true));
        }

        let value = self.post_value("/v1/batch/scrape", &body).await?;
        serde_json::from_value(value).map_err(Error::from_json)
    }

    /// Get the progress envelope for a batch scrape job.
    pub async fn get_batch_scrape_status(&self, job_id: &str) -> Result<BatchScrapeResponse> {
        let value = self
            .get_value(&format!("/v1/batch/scrape/{job_id}"))
            .await?;
        let response: BatchScrapeResponse =
            serde_json::from_value(value).map_err(Error::from_json)?;
        response.validate()?;
        Ok(response)
    }

    // === Internal methods ===

    async fn get_value(&self, path: &str) -> Result<Value> {
        self.request_value(reqwest::Method::GET, path, None::<&()>)
            .await
    }

    async fn post_value<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<Value> {
        self.request_value(reqwest::Method::POST, path, Some(body))
            .await
    }

    async fn delete_value(&self, path: &str) -> Result<Value> {
        self.request_value(reqwest::Method::DELETE, path, None::<&()>)
            .await
    }

    /// Perform a single round trip and parse the body as JSON.
    ///
    /// Exactly one request is sent per call; transport failures, non-2xx
    /// statuses and unparsable bodies each map to their own error kind.
    async fn request_value<B: serde::Serialize>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, url = %url, "sending request");

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.auth_header.clone());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, self.user_agent_header.clone());

        let mut req = self.http_client.request(method, &url).headers(headers);
        if let Some(b) = body {
            req = req.json(b);
        }

        let response = req.send().await.map_err(Error::Transport)?;

        // The service signals success exclusively with 200; any other
        // status, including other 2xx codes, is classified by status alone.
        if response.status() != reqwest::StatusCode::OK {
            return Err(Error::from_response(response).await);
        }

        let text = response.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&text).map_err(Error::from_json)
    }
}

/// Check the load-bearing top-level envelope fields.
///
/// `success` must be present and boolean; a well-formed `false` is a
/// service-signaled failure, not a decode problem.
fn ensure_envelope_success(value: &Value) -> Result<()> {
    let success = value
        .get("success")
        .and_then(Value::as_bool)
        .ok_or_else(|| Error::decode("success", "missing or not a boolean"))?;

    if !success {
        let message = value
            .get("error")
            .or_else(|| value.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string);
        return Err(Error::Service { message });
    }

    Ok(())
}

/// Reject empty batches before any network call is made.
fn require_urls(request: &BatchScrapeRequest) -> Result<()> {
    if request.urls.is_empty() {
        return Err(Error::Validation(
            "batch scrape requires at least one URL".into(),
        ));
    }
    Ok(())
}
