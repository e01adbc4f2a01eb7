use pretty_assertions::assert_eq;
use serde_json::json;
use sitescan_client::{ClientError, ResultsResponse, ScanClient};
use sitescan_core::domain::job::JobState;
use sitescan_core::dto::scan::ScanRequest;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn submit_scan_posts_request_and_returns_scan_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scan"))
        .and(body_json(json!({
            "url": "https://example.com",
            "max_pages": 50,
            "include_external": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "scan_id": "scan-123",
            "status": "pending",
            "message": "Scan started successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ScanClient::new(server.uri());
    let ack = client
        .submit_scan(&ScanRequest::new("https://example.com"))
        .await
        .expect("submit ok");

    assert_eq!(ack.scan_id, "scan-123");
    assert_eq!(ack.status, "pending");
}

#[tokio::test]
async fn submit_scan_rejects_invalid_url_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = ScanClient::new(server.uri());
    let err = client
        .submit_scan(&ScanRequest::new("example.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::InvalidRequest(_)));
}

#[tokio::test]
async fn get_status_decodes_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scan/scan-1/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"scan_id": "scan-1", "status": "processing"})),
        )
        .mount(&server)
        .await;

    let client = ScanClient::new(server.uri());
    let status = client.get_status("scan-1").await.expect("status ok");

    assert_eq!(status.status, JobState::Processing);
    assert_eq!(status.scan_id.as_deref(), Some("scan-1"));
}

#[tokio::test]
async fn get_status_unknown_scan_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scan/missing/status"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Scan not found"})))
        .mount(&server)
        .await;

    let client = ScanClient::new(server.uri());
    let err = client.get_status("missing").await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn get_results_maps_202_to_not_ready() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scan/scan-1/results"))
        .respond_with(
            ResponseTemplate::new(202).set_body_json(json!({"detail": "Scan still in progress"})),
        )
        .mount(&server)
        .await;

    let client = ScanClient::new(server.uri());
    let response = client.get_results("scan-1").await.expect("results ok");

    assert_eq!(response, ResultsResponse::NotReady);
}

#[tokio::test]
async fn get_results_returns_body_on_success() {
    let server = MockServer::start().await;
    let body = json!({
        "scan_id": "scan-1",
        "duplicates": {"duplicates": [], "total_duplicates": 0, "methods_used": []}
    });
    Mock::given(method("GET"))
        .and(path("/scan/scan-1/results"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .mount(&server)
        .await;

    let client = ScanClient::new(server.uri());
    let response = client.get_results("scan-1").await.expect("results ok");

    assert_eq!(response, ResultsResponse::Ready(body));
}

#[tokio::test]
async fn get_results_keeps_failure_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scan/scan-1/results"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "detail": "Internal Server Error",
            "error_type": "RuntimeError",
            "traceback": "Traceback ..."
        })))
        .mount(&server)
        .await;

    let client = ScanClient::new(server.uri());
    let err = client.get_results("scan-1").await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    let body = err.body().expect("body kept");
    assert_eq!(body["error_type"], "RuntimeError");
    assert!(err.to_string().contains("Internal Server Error"));
}

#[tokio::test]
async fn health_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "healthy", "timestamp": "2025-03-01T10:00:00"})),
        )
        .mount(&server)
        .await;

    let client = ScanClient::new(server.uri());
    let health = client.health().await.expect("health ok");

    assert_eq!(health.status, "healthy");
}
