//! Rust client for the Firecrawl web scraping and crawling API.
//!
//! AgniKit wraps the Firecrawl REST endpoints (scrape, crawl, map and
//! batch scrape) behind a typed client with a closed error taxonomy.
//! Crawl and batch jobs are asynchronous on the service side; the client
//! exposes their status endpoints and leaves polling cadence to the caller,
//! and it never retries on its own (a retried crawl or batch job is a
//! duplicate billed job).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use agnikit::{Client, ScrapeRequest, ScrapeFormat};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), agnikit::Error> {
//!     let client = Client::builder("your-api-key").build()?;
//!
//!     let result = client.scrape(ScrapeRequest {
//!         url: "https://example.com".into(),
//!         formats: vec![ScrapeFormat::Markdown],
//!         ..Default::default()
//!     }).await?;
//!
//!     if let Some(markdown) = result.data.markdown {
//!         println!("{markdown}");
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod crawl_map;
mod error;
mod json;
mod types;
mod version;

pub use client::{Client, ClientBuilder};
pub use crawl_map::{CrawlLink, CrawlMap, CrawlPage};
pub use error::{Error, Result};
pub use json::JsonValue;
pub use types::*;
pub use version::{build_user_agent, CLIENT_VERSION};
