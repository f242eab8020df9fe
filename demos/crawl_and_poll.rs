//! Crawl example with caller-driven polling.
//!
//! Starts a crawl job, polls its status endpoint until it reaches a
//! terminal state, then projects the result into a page/link graph.
//!
//! Run with: `FIRECRAWL_API_KEY=your-key cargo run --example crawl_and_poll`

use agnikit::{Client, CrawlMap, CrawlRequest};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), agnikit::Error> {
    let api_key = std::env::var("FIRECRAWL_API_KEY").expect("FIRECRAWL_API_KEY must be set");
    let client = Client::builder(api_key).build()?;

    let root_url = "https://example.com";
    let job = client
        .crawl(CrawlRequest {
            url: root_url.into(),
            max_depth: 2,
            limit: 10,
            ..Default::default()
        })
        .await?;
    println!("Crawl job accepted: {}", job.job_id);

    // The client never polls on its own; cadence is ours to choose.
    let status = loop {
        let status = client.get_crawl_status(&job.job_id).await?;
        let state = status["status"].as_str().unwrap_or("unknown").to_string();
        println!(
            "status: {state} ({}/{} pages)",
            status["completed"].as_u64().unwrap_or(0),
            status["total"].as_u64().unwrap_or(0)
        );

        match state.as_str() {
            "completed" => break status,
            "failed" | "cancelled" => {
                eprintln!("crawl ended in state {state}");
                return Ok(());
            }
            _ => tokio::time::sleep(Duration::from_secs(2)).await,
        }
    };

    let map = CrawlMap::from_status(&job.job_id, root_url, &status)?;
    println!("\nCrawled {} pages:", map.pages.len());
    for page in &map.pages {
        println!("  [{}] {} - {}", page.status, page.url, page.title);
    }
    for link in &map.links {
        let target = map
            .page(&link.target_id)
            .map(|p| p.url.as_str())
            .unwrap_or("(unknown)");
        println!("  link: {} -> {target}", link.source_id);
    }

    Ok(())
}
