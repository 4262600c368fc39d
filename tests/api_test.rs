mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use carrier_sales::{MockCarrierVerifier, VerificationError};
use common::{load, setup_app, setup_app_with, API_KEY};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_health_is_public() {
    let app = setup_app().await;

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_ready_checks_database() {
    let app = setup_app().await;

    let (status, body) = app.get("/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_missing_or_wrong_api_key_is_rejected() {
    let app = setup_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/verify-carrier")
        .header("content-type", "application/json")
        .body(Body::from(json!({"mc_number": "123456"}).to_string()))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid API key");

    let request = Request::builder()
        .method("GET")
        .uri("/dashboard/overview")
        .header("x-api-key", "not-the-key")
        .body(Body::empty())
        .unwrap();
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rate_limit_applies_per_client() {
    let app = setup_app_with(Arc::new(MockCarrierVerifier::new()), 2).await;

    for _ in 0..2 {
        let (status, _) = app.get("/dashboard/funnel").await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) = app.get("/dashboard/funnel").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body["error"].is_string());

    // A different forwarded client has its own window.
    let request = Request::builder()
        .method("GET")
        .uri("/dashboard/funnel")
        .header("x-api-key", API_KEY)
        .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
        .body(Body::empty())
        .unwrap();
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);

    // Health checks are never limited.
    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_booking_flow() {
    let app = setup_app().await;
    app.insert(&[
        load("L-DAL-1", "Dallas, TX", "Dry Van", "2200.00", 4),
        load("L-DEN-1", "Denver, CO", "Reefer", "2600.00", 4),
    ])
    .await;

    let (status, verification) = app
        .post("/verify-carrier", json!({"mc_number": "MC-123456"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(verification["eligible"], true);
    assert_eq!(verification["verification"], "verified");
    assert_eq!(verification["legal_name"], "ACME FREIGHT LLC");
    assert_eq!(verification["mc_number"], "123456");

    let (status, search) = app
        .post(
            "/search-loads",
            json!({
                "equipment_type": "dry van",
                "origin_location": "Dallas, TX",
                "availability_time": "2026-02-14T10:00:00"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let loads = search["loads"].as_array().unwrap();
    assert_eq!(loads.len(), 1);
    assert_eq!(loads[0]["load_id"], "L-DAL-1");
    assert_eq!(loads[0]["loadboard_rate"].as_f64(), Some(2200.0));
    assert!(loads[0].get("is_active").is_none());

    let (status, offer) = app
        .post(
            "/evaluate-offer",
            json!({
                "load_id": "L-DAL-1",
                "carrier_offer": 2220,
                "round_number": 1,
                "call_sid": "CA-1"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(offer["decision"], "accept");
    assert!(offer["counter_rate"].is_null());

    let (status, logged) = app
        .post(
            "/log-call",
            json!({
                "call_outcome": "booked",
                "sentiment": "positive",
                "mc_number": "123456",
                "carrier_verified": true,
                "load_id_discussed": "L-DAL-1",
                "initial_rate": 2200,
                "final_rate": 2220,
                "negotiation_rounds": 1
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logged["status"], "logged");
    assert!(logged["call_id"].as_i64().unwrap() > 0);

    let history = app.repo.negotiations_for_call("CA-1").await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_ineligible_carrier() {
    let app = setup_app().await;

    let (status, body) = app
        .post("/verify-carrier", json!({"mc_number": "999999"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["eligible"], false);
    assert_eq!(body["verification"], "not_authorized");

    let (status, body) = app
        .post("/verify-carrier", json!({"mc_number": "555"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["eligible"], false);
    assert_eq!(body["verification"], "invalid_mc");
    assert!(body["legal_name"].is_null());
}

#[tokio::test]
async fn test_verifier_failure_degrades_to_unavailable() {
    let verifier = MockCarrierVerifier::new().failing(VerificationError::Network(
        "connection refused".to_string(),
    ));
    let app = setup_app_with(Arc::new(verifier), 1000).await;

    let (status, body) = app
        .post("/verify-carrier", json!({"mc_number": "MC 123456"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["eligible"], false);
    assert_eq!(body["verification"], "verification_unavailable");
    assert_eq!(body["mc_number"], "123456");
}

#[tokio::test]
async fn test_verify_carrier_validation() {
    let app = setup_app().await;

    let (status, body) = app.post("/verify-carrier", json!({"mc_number": ""})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("mc_number"));

    let (status, _) = app.post("/verify-carrier", json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .post(
            "/verify-carrier",
            json!({"mc_number": "123456", "dot_number": "1"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = setup_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/evaluate-offer")
        .header("content-type", "application/json")
        .header("x-api-key", API_KEY)
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_search_with_no_loads_is_empty() {
    let app = setup_app().await;

    let (status, body) = app
        .post(
            "/search-loads",
            json!({
                "equipment_type": "Flatbed",
                "origin_location": "Boise, ID",
                "availability_time": "2026-02-14T10:00:00Z"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"loads": []}));
}

#[tokio::test]
async fn test_search_folds_equipment_aliases() {
    let app = setup_app().await;
    app.insert(&[
        load("B", "Chicago, Illinois", "DryVan", "2000.00", 16),
        load("A", "Chicago, IL", "Dry Van", "2000.00", 2),
    ])
    .await;

    let (status, body) = app
        .post(
            "/search-loads",
            json!({
                "equipment_type": "dryvan",
                "origin_location": "chicago il",
                "availability_time": "2026-02-14T09:00:00Z"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["loads"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["load_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["A", "B"]);
}

#[tokio::test]
async fn test_search_rejects_bad_timestamp() {
    let app = setup_app().await;

    let (status, _) = app
        .post(
            "/search-loads",
            json!({
                "equipment_type": "Dry Van",
                "origin_location": "Dallas, TX",
                "availability_time": "tomorrow morning"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_counters_never_regress() {
    let app = setup_app().await;
    app.insert(&[load("NEG-1", "Chicago, IL", "Dry Van", "2000.00", 4)])
        .await;

    let (status, first) = app
        .post(
            "/evaluate-offer",
            json!({"load_id": "NEG-1", "carrier_offer": 2280, "round_number": 1, "call_sid": "CA-9"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["decision"], "counter");
    assert_eq!(first["counter_rate"].as_f64(), Some(2120.0));

    let (_, second) = app
        .post(
            "/evaluate-offer",
            json!({"load_id": "NEG-1", "carrier_offer": 2180, "round_number": 2, "call_sid": "CA-9"}),
        )
        .await;
    assert_eq!(second["decision"], "counter");
    assert_eq!(second["counter_rate"].as_f64(), Some(2120.0));
}

#[tokio::test]
async fn test_final_round_premium_is_rejected() {
    let app = setup_app().await;
    app.insert(&[load("NEG-2", "Chicago, IL", "Dry Van", "2000.00", 4)])
        .await;

    let (status, body) = app
        .post(
            "/evaluate-offer",
            json!({"load_id": "NEG-2", "carrier_offer": 2250, "round_number": 3}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["decision"], "reject");
    assert!(body["counter_rate"].is_null());
}

#[tokio::test]
async fn test_unknown_load_needs_more_info() {
    let app = setup_app().await;

    let (status, body) = app
        .post(
            "/evaluate-offer",
            json!({"load_id": "NOPE", "carrier_offer": 1800, "round_number": 1, "call_sid": "CA-2"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["decision"], "needs_more_info");
    assert!(body["counter_rate"].is_null());

    assert!(app.repo.negotiations_for_call("CA-2").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_evaluate_offer_validation() {
    let app = setup_app().await;

    for body in [
        json!({"load_id": "L", "carrier_offer": 0, "round_number": 1}),
        json!({"load_id": "L", "carrier_offer": 1500, "round_number": 0}),
        json!({"load_id": "L", "carrier_offer": 1500, "round_number": 11}),
        json!({"load_id": "", "carrier_offer": 1500, "round_number": 1}),
        json!({"load_id": "L", "carrier_offer": 1500, "round_number": 1, "extra": 1}),
    ] {
        let (status, _) = app.post("/evaluate-offer", body.clone()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "body: {}", body);
    }
}

#[tokio::test]
async fn test_log_call_coerces_agent_values() {
    let app = setup_app().await;

    let (status, body) = app
        .post(
            "/log-call",
            json!({
                "call_outcome": "no_match",
                "sentiment": "Neutral",
                "mc_number": 123456,
                "carrier_verified": "true",
                "loads_returned_count": "3",
                "loads_presented_count": "null",
                "load_id_discussed": "n/a",
                "initial_rate": "2200.00",
                "carrier_counter_rate": "",
                "negotiation_rounds": "2",
                "availability_time": "2026-02-14T10:00:00",
                "driver_contact_collected": "no",
                "was_transferred": "false"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["status"], "logged");

    let (_, funnel) = app.get("/dashboard/funnel").await;
    assert_eq!(
        funnel,
        json!([
            {"stage": "Verified", "value": 1},
            {"stage": "Load Matched", "value": 0},
            {"stage": "Booked", "value": 0}
        ])
    );
}

#[tokio::test]
async fn test_log_call_validation() {
    let app = setup_app().await;

    let (status, _) = app
        .post("/log-call", json!({"call_outcome": "booked", "surprise": 1}))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app.post("/log-call", json!({"sentiment": "positive"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app.post("/log-call", json!({"call_outcome": "   "})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .post(
            "/log-call",
            json!({"call_outcome": "booked", "loads_returned_count": "several"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_dashboard_after_activity() {
    let app = setup_app().await;
    app.insert(&[
        load("L-A", "Dallas, TX", "Dry Van", "2200.00", 4),
        load("L-B", "Chicago, IL", "Reefer", "2000.00", 6),
    ])
    .await;

    let offers = [
        ("L-A", 2220, 1, "accept"),
        ("L-B", 2280, 1, "counter"),
        ("L-B", 2040, 2, "accept"),
    ];
    for (load_id, offer, round, expected) in offers {
        let (_, body) = app
            .post(
                "/evaluate-offer",
                json!({"load_id": load_id, "carrier_offer": offer, "round_number": round}),
            )
            .await;
        assert_eq!(body["decision"], expected);
    }

    for (outcome, sentiment, verified) in [
        ("booked", "positive", true),
        ("booked", "negative", true),
        ("not_eligible", "neutral", false),
    ] {
        let discussed = if verified { Some("L-A") } else { None };
        let (status, _) = app
            .post(
                "/log-call",
                json!({
                    "call_outcome": outcome,
                    "sentiment": sentiment,
                    "carrier_verified": verified,
                    "load_id_discussed": discussed
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, overview) = app.get("/dashboard/overview").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overview["total_calls"], 3);
    assert_eq!(overview["verified_carriers"], 2);
    assert_eq!(overview["booked_loads"], 2);
    assert_eq!(overview["avg_sentiment"].as_f64(), Some(0.0));
    assert_eq!(overview["revenue_accepted"].as_f64(), Some(4260.0));

    let (_, funnel) = app.get("/dashboard/funnel").await;
    assert_eq!(funnel[0]["value"], 2);
    assert_eq!(funnel[1]["value"], 2);
    assert_eq!(funnel[2]["value"], 2);

    let (_, negotiations) = app.get("/dashboard/negotiations").await;
    assert_eq!(
        negotiations,
        json!([
            {"decision": "accept", "count": 2, "avg_round": 1.5},
            {"decision": "counter", "count": 1, "avg_round": 1.0}
        ])
    );

    let (_, sentiment) = app.get("/dashboard/sentiment").await;
    let points = sentiment.as_array().unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0]["avg_sentiment"].as_f64(), Some(0.0));

    let (_, performance) = app.get("/dashboard/load-performance").await;
    let rows = performance.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["load_id"], "L-B");
    assert_eq!(rows[0]["acceptance_rate"].as_f64(), Some(50.0));
    assert_eq!(rows[0]["avg_offer"].as_f64(), Some(2160.0));
    assert_eq!(rows[0]["loadboard_rate"].as_f64(), Some(2000.0));
    assert_eq!(rows[1]["load_id"], "L-A");
    assert_eq!(rows[1]["acceptance_rate"].as_f64(), Some(100.0));
}

#[tokio::test]
async fn test_empty_dashboard() {
    let app = setup_app().await;

    let (status, overview) = app.get("/dashboard/overview").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overview["total_calls"], 0);
    assert_eq!(overview["avg_sentiment"].as_f64(), Some(0.0));
    assert_eq!(overview["revenue_accepted"].as_f64(), Some(0.0));

    let (_, negotiations) = app.get("/dashboard/negotiations").await;
    assert_eq!(negotiations, json!([]));
    let (_, performance) = app.get("/dashboard/load-performance").await;
    assert_eq!(performance, json!([]));
}
