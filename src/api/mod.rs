pub mod auth;
pub mod calls;
pub mod carriers;
pub mod dashboard;
pub mod health;
pub mod loads;
pub mod offers;

use crate::carrier::CarrierVerifier;
use crate::config::Config;
use crate::db::Repository;
use crate::error::AppError;
use crate::engine::{LoadMatcher, NegotiationEngine};
use crate::orchestration::{Dashboard, LoadFinder, OfferDesk};
use auth::{RateLimiter, API_KEY_HEADER};
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::{middleware, routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Config,
    pub verifier: Arc<dyn CarrierVerifier>,
    pub offers: Arc<OfferDesk>,
    pub finder: Arc<LoadFinder>,
    pub dashboard: Arc<Dashboard>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(repo: Arc<Repository>, config: Config, verifier: Arc<dyn CarrierVerifier>) -> Self {
        let offers = OfferDesk::new(repo.clone(), repo.clone(), NegotiationEngine::default());
        let finder = LoadFinder::new(repo.clone(), LoadMatcher::default());
        let rate_limiter = RateLimiter::new(config.rate_limit_per_minute);

        Self {
            dashboard: Arc::new(Dashboard::new(repo.clone())),
            repo,
            config,
            verifier,
            offers: Arc::new(offers),
            finder: Arc::new(finder),
            rate_limiter: Arc::new(rate_limiter),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/verify-carrier", post(carriers::verify_carrier))
        .route("/search-loads", post(loads::search_loads))
        .route("/evaluate-offer", post(offers::evaluate_offer))
        .route("/log-call", post(calls::log_call))
        .route("/dashboard/overview", get(dashboard::overview))
        .route("/dashboard/funnel", get(dashboard::funnel))
        .route("/dashboard/negotiations", get(dashboard::negotiations))
        .route("/dashboard/sentiment", get(dashboard::sentiment))
        .route("/dashboard/load-performance", get(dashboard::load_performance))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(API_KEY_HEADER),
        ]);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(parsed))
}

/// Character-count bounds shared by the request validators.
pub(crate) fn check_len(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len == 0 || len > max {
        return Err(AppError::Validation(format!(
            "{} must be 1 to {} characters",
            field, max
        )));
    }
    Ok(())
}
