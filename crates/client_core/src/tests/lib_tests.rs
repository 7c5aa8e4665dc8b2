use super::*;
use crate::stub_api::{settings_for, spawn_stub_api};
use axum::http::StatusCode as HttpStatus;
use serde_json::json;
use shared::error::ErrorCode;

#[test]
fn rejects_base_url_that_cannot_carry_paths() {
    let err = ResourceClient::new(&settings_for("mailto:admin@example.com")).expect_err("must fail");
    assert!(matches!(err, RemoteError::InvalidUrl(_)), "{err}");
}

#[test]
fn endpoint_percent_encodes_ids_as_single_segments() {
    let client = ResourceClient::new(&settings_for("http://localhost:4000")).expect("client");
    let url = client.endpoint(&["invoices", "a/b c"]).expect("url");
    assert_eq!(url.as_str(), "http://localhost:4000/invoices/a%2Fb%20c");
}

#[test]
fn endpoint_keeps_base_path_prefix() {
    let client = ResourceClient::new(&settings_for("http://localhost:4000/api/")).expect("client");
    let url = client.endpoint(&["dashboard", "counts"]).expect("url");
    assert_eq!(url.as_str(), "http://localhost:4000/api/dashboard/counts");
}

#[test]
fn page_size_never_drops_to_zero() {
    let mut settings = settings_for("http://localhost:4000");
    settings.page_size = 0;
    let client = ResourceClient::new(&settings).expect("client");
    assert_eq!(client.page_size(), 1);
}

#[test]
fn classifies_statuses_into_failure_kinds() {
    let url = "http://localhost:4000/invoices";

    let not_found = error::classify_status(url, reqwest::StatusCode::NOT_FOUND, b"");
    assert!(not_found.is_not_found());
    assert!(!not_found.is_transient());

    let server = error::classify_status(url, reqwest::StatusCode::BAD_GATEWAY, b"");
    assert!(matches!(server, RemoteError::Server { status: 502, .. }));
    assert!(server.is_transient());
    assert_eq!(server.code(), ErrorCode::Unavailable);

    let body = json!({
        "message": "amount must be positive",
        "violations": { "amount": ["must be positive"] }
    })
    .to_string();
    let rejected =
        error::classify_status(url, reqwest::StatusCode::UNPROCESSABLE_ENTITY, body.as_bytes());
    assert_eq!(rejected.code(), ErrorCode::Rejected);
    assert!(!rejected.is_transient());
    let violations = rejected.violations().expect("violations");
    assert_eq!(
        violations.get("amount"),
        Some(&["must be positive".to_string()][..])
    );
    assert!(rejected.to_string().contains("amount must be positive"));
}

#[test]
fn rejection_without_json_body_falls_back_to_status_reason() {
    let err = error::classify_status(
        "http://localhost:4000/customers",
        reqwest::StatusCode::CONFLICT,
        b"<html>conflict</html>",
    );
    match err {
        RemoteError::Rejected {
            status,
            message,
            violations,
            ..
        } => {
            assert_eq!(status, 409);
            assert_eq!(message, "conflict");
            assert!(violations.is_none());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn requests_declare_json_accept_and_content_type() {
    let (base_url, stub) = spawn_stub_api().await;
    let client = ResourceClient::new(&settings_for(&base_url)).expect("client");

    client
        .create(Resource::Customers, &json!({ "name": "Amy" }))
        .await
        .expect("create");
    client.fetch_revenue().await.expect("revenue");

    let requests = stub.requests().await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].accept.as_deref(), Some("application/json"));
    assert_eq!(
        requests[0].content_type.as_deref(),
        Some("application/json")
    );
    assert_eq!(requests[1].method, "GET");
    assert_eq!(requests[1].path, "/revenues");
    assert_eq!(requests[1].accept.as_deref(), Some("application/json"));
    assert_eq!(requests[1].content_type, None);
}

#[tokio::test]
async fn slow_responses_time_out_as_transient_failures() {
    let (base_url, stub) = spawn_stub_api().await;
    stub.delay_responses(Duration::from_millis(500)).await;
    let mut settings = settings_for(&base_url);
    settings.request_timeout = Duration::from_millis(50);
    let client = ResourceClient::new(&settings).expect("client");

    let err = client.fetch_card_summary().await.expect_err("must time out");
    assert!(matches!(err, RemoteError::Timeout { .. }), "{err}");
    assert!(err.is_transient());
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = ResourceClient::new(&settings_for(&format!("http://{addr}"))).expect("client");
    let err = client.fetch_revenue().await.expect_err("must fail");
    assert!(err.is_transient(), "{err}");
    assert_eq!(err.code(), ErrorCode::Unavailable);
}

#[tokio::test]
async fn server_errors_are_not_decoded_as_success() {
    let (base_url, stub) = spawn_stub_api().await;
    stub.fail_with(HttpStatus::INTERNAL_SERVER_ERROR, json!({ "message": "boom" }))
        .await;
    let client = ResourceClient::new(&settings_for(&base_url)).expect("client");

    let err = client
        .update(Resource::Invoices, "i1", &json!({}))
        .await
        .expect_err("must fail");
    assert!(matches!(err, RemoteError::Server { status: 500, .. }), "{err}");
}

#[tokio::test]
async fn truncated_error_body_still_classifies_by_status() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;
        let head = "HTTP/1.1 422 Unprocessable Entity\r\n\
                    content-type: application/json\r\n\
                    content-length: 200\r\n\r\n\
                    {\"message\": \"amount";
        let _ = socket.write_all(head.as_bytes()).await;
        let _ = socket.shutdown().await;
    });

    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let client = ResourceClient::new(&settings_for(&format!("http://{addr}"))).expect("client");
    let err = client
        .update(Resource::Invoices, "i1", &json!({}))
        .await
        .expect_err("must fail");
    match err {
        RemoteError::Rejected {
            status,
            message,
            violations,
            ..
        } => {
            assert_eq!(status, 422);
            assert_eq!(message, "unprocessable entity");
            assert!(violations.is_none());
        }
        other => panic!("unexpected error: {other}"),
    }
}
