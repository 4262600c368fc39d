#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use carrier_sales::api::{self, AppState};
use carrier_sales::config::Config;
use carrier_sales::db::init_db;
use carrier_sales::{CarrierVerifier, Load, LoadId, MockCarrierVerifier, Money, Repository};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const API_KEY: &str = "test-internal-key";

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 14, 8, 0, 0).unwrap()
}

pub fn test_config(db_path: String) -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        database_path: db_path,
        internal_api_key: API_KEY.to_string(),
        fmcsa_api_key: String::new(),
        fmcsa_base_url: "http://example.invalid".to_string(),
        cors_origins: vec!["http://localhost:3000".to_string()],
        rate_limit_per_minute: 1000,
        seed_on_startup: false,
    }
}

pub async fn setup_repo() -> (Arc<Repository>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();

    let pool = init_db(&db_path).await.expect("init_db failed");
    (Arc::new(Repository::new(pool)), temp_dir)
}

pub struct TestApp {
    pub router: axum::Router,
    pub repo: Arc<Repository>,
    _temp: TempDir,
}

pub async fn setup_app_with(
    verifier: Arc<dyn CarrierVerifier>,
    rate_limit_per_minute: u32,
) -> TestApp {
    let (repo, temp) = setup_repo().await;
    let mut config = test_config(repo_path(&temp));
    config.rate_limit_per_minute = rate_limit_per_minute;

    let state = AppState::new(repo.clone(), config, verifier);
    TestApp {
        router: api::create_router(state),
        repo,
        _temp: temp,
    }
}

pub async fn setup_app() -> TestApp {
    let verifier = MockCarrierVerifier::new()
        .with_authorized("123456", "ACME FREIGHT LLC")
        .with_unauthorized("999999", "GROUNDED TRUCKING INC");
    setup_app_with(Arc::new(verifier), 1000).await
}

fn repo_path(temp: &TempDir) -> String {
    temp.path().join("test.db").to_string_lossy().to_string()
}

pub fn load(id: &str, origin: &str, equipment: &str, rate: &str, pickup_hours: i64) -> Load {
    let pickup = base_time() + Duration::hours(pickup_hours);
    Load {
        load_id: LoadId::new(id),
        origin: origin.to_string(),
        destination: "Atlanta, GA".to_string(),
        pickup_datetime: pickup,
        delivery_datetime: pickup + Duration::hours(16),
        equipment_type: equipment.to_string(),
        loadboard_rate: Money::parse(rate).unwrap(),
        notes: "Live load".to_string(),
        weight: 38000,
        commodity_type: "General Freight".to_string(),
        miles: 705,
        dimensions: "53ft trailer".to_string(),
        num_of_pieces: 22,
        is_active: true,
    }
}

impl TestApp {
    pub async fn insert(&self, loads: &[Load]) {
        self.repo.upsert_loads(loads).await.unwrap();
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("x-api-key", API_KEY)
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .header("x-api-key", API_KEY)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }
}
