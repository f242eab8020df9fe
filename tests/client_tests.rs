//! Integration tests for the client facade against a mock HTTP server.

use agnikit::{
    BatchScrapeRequest, Client, CrawlRequest, Error, MapRequest, ScrapeFormat, ScrapeRequest,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> Client {
    Client::builder("fc-test-key")
        .base_url(server.uri())
        .build()
        .expect("client builds")
}

#[tokio::test]
async fn scrape_returns_markdown_and_metadata() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .and(header("Authorization", "Bearer fc-test-key"))
        .and(header("Content-Type", "application/json"))
        .and(body_partial_json(json!({
            "url": "https://example.com",
            "formats": ["markdown"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "markdown": "# Hi",
                "metadata": {
                    "sourceURL": "https://example.com",
                    "statusCode": 200
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client
        .scrape(ScrapeRequest {
            url: "https://example.com".into(),
            formats: vec![ScrapeFormat::Markdown],
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.data.markdown.as_deref(), Some("# Hi"));
    assert_eq!(
        result.data.metadata.source_url.as_deref(),
        Some("https://example.com")
    );
    assert_eq!(result.data.metadata.status_code, Some(200));
}

#[tokio::test]
async fn scrape_service_failure_surfaces_as_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "This website is not supported"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .scrape(ScrapeRequest {
            url: "https://blocked.example".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Service { message: Some(ref m) } if m == "This website is not supported"
    ));
}

#[tokio::test]
async fn scrape_non_json_body_is_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .scrape(ScrapeRequest {
            url: "https://example.com".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode { .. }));
}

#[tokio::test]
async fn scrape_missing_data_is_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .scrape(ScrapeRequest {
            url: "https://example.com".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Decode { field: Some(ref f), .. } if f == "data"
    ));
}

#[tokio::test]
async fn crawl_returns_job_id_and_raw_document() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/crawl"))
        .and(body_partial_json(json!({
            "url": "https://example.com",
            "maxDepth": 2,
            "limit": 10
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "id": "crawl-123",
            "url": "https://api.firecrawl.dev/v1/crawl/crawl-123"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let job = client
        .crawl(CrawlRequest {
            url: "https://example.com".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(job.job_id, "crawl-123");
    assert_eq!(job.raw["id"], json!("crawl-123"));
}

#[tokio::test]
async fn crawl_status_404_maps_to_http_error_without_decode() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/crawl/abc"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.get_crawl_status("abc").await.unwrap_err();

    // A non-JSON 404 body must not produce a decode error.
    assert!(matches!(err, Error::Http { status: 404, .. }));
}

#[tokio::test]
async fn crawl_status_returns_raw_json() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/crawl/crawl-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "scraping",
            "total": 10,
            "completed": 4
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let status = client.get_crawl_status("crawl-123").await.unwrap();

    assert_eq!(status["status"], json!("scraping"));
    assert_eq!(status["completed"], json!(4));
}

#[tokio::test]
async fn cancel_crawl_decodes_confirmation() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/crawl/crawl-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Crawl job successfully cancelled."
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let cancelled = client.cancel_crawl("crawl-123").await.unwrap();

    assert!(cancelled.success);
    assert_eq!(
        cancelled.message.as_deref(),
        Some("Crawl job successfully cancelled.")
    );
}

#[tokio::test]
async fn second_cancel_surfaces_service_404() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/crawl/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "error": "Job not found"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.cancel_crawl("gone").await.unwrap_err();

    assert!(matches!(err, Error::Http { status: 404, .. }));
}

#[tokio::test]
async fn map_preserves_link_order() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/map"))
        .and(body_partial_json(json!({
            "url": "https://example.com",
            "limit": 10
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "links": ["https://example.com/a", "https://example.com/b"]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client
        .map(MapRequest {
            url: "https://example.com".into(),
            limit: 10,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(
        result.links,
        vec!["https://example.com/a", "https://example.com/b"]
    );
}

#[tokio::test]
async fn map_without_links_is_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/map"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .map(MapRequest {
            url: "https://example.com".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Decode { field: Some(ref f), .. } if f == "links"
    ));
}

#[tokio::test]
async fn batch_scrape_decodes_full_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/batch/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed",
            "total": 2,
            "completed": 2,
            "creditsUsed": 2,
            "expiresAt": "2024-11-01T00:00:00Z",
            "data": [
                {"markdown": "# A", "metadata": {"sourceURL": "https://example.com/a"}},
                {"markdown": "# B", "metadata": {"sourceURL": "https://example.com/b"}}
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client
        .batch_scrape(BatchScrapeRequest {
            urls: vec![
                "https://example.com/a".into(),
                "https://example.com/b".into(),
            ],
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(result.status, "completed");
    assert_eq!(result.completed, 2);
    assert_eq!(result.data.len(), 2);
    assert_eq!(result.data[0].markdown.as_deref(), Some("# A"));
}

#[tokio::test]
async fn batch_scrape_flags_violated_progress_invariant() {
    let server = MockServer::start().await;

    // completed > total breaks the service contract and must not be
    // silently accepted.
    Mock::given(method("POST"))
        .and(path("/v1/batch/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "scraping",
            "total": 2,
            "completed": 3,
            "creditsUsed": 3,
            "expiresAt": "2024-11-01T00:00:00Z",
            "data": []
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .batch_scrape(BatchScrapeRequest {
            urls: vec!["https://example.com".into()],
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Decode { field: Some(ref f), .. } if f == "completed"
    ));
}

#[tokio::test]
async fn batch_scrape_status_flags_excess_results() {
    let server = MockServer::start().await;

    // More results than completed URLs breaks the service contract.
    Mock::given(method("GET"))
        .and(path("/v1/batch/scrape/batch-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "scraping",
            "total": 5,
            "completed": 1,
            "creditsUsed": 1,
            "expiresAt": "2024-11-01T00:00:00Z",
            "data": [
                {"markdown": "# A", "metadata": {"sourceURL": "https://example.com/a"}},
                {"markdown": "# B", "metadata": {"sourceURL": "https://example.com/b"}}
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.get_batch_scrape_status("batch-7").await.unwrap_err();

    assert!(matches!(
        err,
        Error::Decode { field: Some(ref f), .. } if f == "data"
    ));
}

#[tokio::test]
async fn create_batch_scrape_job_sends_async_flag() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/batch/scrape"))
        .and(body_partial_json(json!({"async": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "id": "batch-9",
            "url": "https://api.firecrawl.dev/v1/batch/scrape/batch-9"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let job = client
        .create_batch_scrape_job(BatchScrapeRequest {
            urls: vec!["https://example.com".into()],
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(job.success);
    assert_eq!(job.id, "batch-9");
    assert!(job.status_url.ends_with("/batch-9"));
}

#[tokio::test]
async fn batch_scrape_status_polls_partial_progress() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/batch/scrape/batch-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "scraping",
            "total": 3,
            "completed": 1,
            "creditsUsed": 1,
            "expiresAt": "2024-11-01T00:00:00Z",
            "data": [
                {"markdown": "# A", "metadata": {"sourceURL": "https://example.com/a"}}
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let status = client.get_batch_scrape_status("batch-9").await.unwrap();

    assert_eq!(status.status, "scraping");
    assert_eq!(status.total, 3);
    assert_eq!(status.completed, 1);
    assert_eq!(status.data.len(), 1);
}

#[tokio::test]
async fn non_200_success_status_maps_to_http_error() {
    let server = MockServer::start().await;

    // 204 is 2xx but not the service's success status; it must classify
    // as an HTTP error, not reach the decode path.
    Mock::given(method("GET"))
        .and(path("/v1/crawl/quiet"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.get_crawl_status("quiet").await.unwrap_err();

    assert!(matches!(err, Error::Http { status: 204, .. }));
}

#[tokio::test]
async fn http_error_carries_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(
            ResponseTemplate::new(402).set_body_json(json!({"error": "Payment required"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .scrape(ScrapeRequest {
            url: "https://example.com".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    match err {
        Error::Http { status, body } => {
            assert_eq!(status, 402);
            assert!(body.unwrap().contains("Payment required"));
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}
