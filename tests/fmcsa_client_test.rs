use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use carrier_sales::carrier::VerificationStatus;
use carrier_sales::domain::McNumber;
use carrier_sales::{CarrierVerifier, FmcsaClient, VerificationError};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const WEB_KEY: &str = "test-web-key";

#[derive(Clone, Default)]
struct Stub {
    hits: Arc<AtomicUsize>,
}

async fn docket(
    State(stub): State<Stub>,
    Path(mc): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let attempt = stub.hits.fetch_add(1, Ordering::SeqCst);

    if query.get("webKey").map(String::as_str) != Some(WEB_KEY) {
        return StatusCode::FORBIDDEN.into_response();
    }

    match mc.as_str() {
        "123456" => Json(json!({"content": [{"carrier": {
            "allowedToOperate": "Y",
            "statusCode": "A",
            "legalName": "ACME FREIGHT LLC"
        }}]}))
        .into_response(),
        "222222" => Json(json!({"content": {"carrier": {
            "allowedToOperate": "N",
            "statusCode": "A",
            "legalName": "GROUNDED TRUCKING INC"
        }}}))
        .into_response(),
        "333333" if attempt == 0 => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        "333333" => Json(json!({"content": [{"carrier": {
            "allowedToOperate": "Y",
            "statusCode": "A"
        }}]}))
        .into_response(),
        "500500" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => Json(json!({"content": []})).into_response(),
    }
}

async fn spawn_stub() -> (String, Stub) {
    let stub = Stub::default();
    let app = Router::new()
        .route("/qc/services/carriers/docket-number/:mc", get(docket))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/qc/services/", addr), stub)
}

fn client(base_url: &str, key: &str) -> FmcsaClient {
    FmcsaClient::new(base_url.to_string(), key.to_string())
        .with_retry_budget(Duration::from_secs(2))
        .with_initial_interval(Duration::from_millis(20))
}

#[tokio::test]
async fn test_verified_carrier() {
    let (base_url, _stub) = spawn_stub().await;

    let result = client(&base_url, WEB_KEY)
        .verify(&McNumber::normalize("MC-123456"))
        .await
        .unwrap();
    assert!(result.eligible);
    assert_eq!(result.verification, VerificationStatus::Verified);
    assert_eq!(result.legal_name.as_deref(), Some("ACME FREIGHT LLC"));
    assert_eq!(result.mc_number, "123456");
}

#[tokio::test]
async fn test_not_authorized_and_unknown() {
    let (base_url, _stub) = spawn_stub().await;
    let fmcsa = client(&base_url, WEB_KEY);

    let result = fmcsa.verify(&McNumber::normalize("222222")).await.unwrap();
    assert!(!result.eligible);
    assert_eq!(result.verification, VerificationStatus::NotAuthorized);

    let result = fmcsa.verify(&McNumber::normalize("777")).await.unwrap();
    assert_eq!(result.verification, VerificationStatus::InvalidMc);
    assert_eq!(result.legal_name, None);
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let (base_url, stub) = spawn_stub().await;

    let result = client(&base_url, WEB_KEY)
        .verify(&McNumber::normalize("333333"))
        .await
        .unwrap();
    assert!(result.eligible);
    assert_eq!(stub.hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let (base_url, stub) = spawn_stub().await;

    let err = client(&base_url, "wrong-key")
        .verify(&McNumber::normalize("123456"))
        .await
        .unwrap_err();
    assert!(matches!(err, VerificationError::Http { status: 403, .. }), "{}", err);
    assert_eq!(stub.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_persistent_server_error_gives_up() {
    let (base_url, stub) = spawn_stub().await;

    let err = client(&base_url, WEB_KEY)
        .verify(&McNumber::normalize("500500"))
        .await
        .unwrap_err();
    assert!(matches!(err, VerificationError::Http { status: 500, .. }), "{}", err);
    assert!(stub.hits.load(Ordering::SeqCst) > 1);
}
