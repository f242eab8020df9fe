//! Basic scrape example.
//!
//! This example shows how to scrape a single page as markdown.
//!
//! Run with: `FIRECRAWL_API_KEY=your-key cargo run --example basic_scrape`

use agnikit::{Client, ScrapeFormat, ScrapeRequest};

#[tokio::main]
async fn main() -> Result<(), agnikit::Error> {
    // Create a client with your API key
    let api_key = std::env::var("FIRECRAWL_API_KEY").expect("FIRECRAWL_API_KEY must be set");
    let client = Client::builder(api_key).build()?;

    let result = client
        .scrape(ScrapeRequest {
            url: "https://example.com".into(),
            formats: vec![ScrapeFormat::Markdown, ScrapeFormat::Links],
            ..Default::default()
        })
        .await?;

    if let Some(markdown) = &result.data.markdown {
        println!("{markdown}");
    }

    if let Some(links) = &result.data.links {
        println!("\n{} links found", links.len());
    }

    if let Some(title) = &result.data.metadata.title {
        println!("Title: {title}");
    }

    Ok(())
}
