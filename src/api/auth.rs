//! API-key authentication and per-client rate limiting.

use super::AppState;
use crate::error::AppError;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const API_KEY_HEADER: &str = "x-api-key";
const PUBLIC_PATHS: &[&str] = &["/health", "/ready"];
const WINDOW: Duration = Duration::from_secs(60);
const CLEANUP_EVERY: u64 = 1024;

#[derive(Debug, Clone, Copy)]
struct RequestCounter {
    count: u32,
    window_start: Instant,
}

/// Fixed one-minute window counter keyed by client.
#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    counters: DashMap<String, RequestCounter>,
    checks: AtomicU64,
}

impl RateLimiter {
    pub fn new(requests_per_minute: u32) -> Self {
        Self {
            limit: requests_per_minute,
            counters: DashMap::new(),
            checks: AtomicU64::new(0),
        }
    }

    /// Count a request for `key`; `false` once the window's budget is spent.
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> bool {
        if self.checks.fetch_add(1, Ordering::Relaxed) % CLEANUP_EVERY == CLEANUP_EVERY - 1 {
            self.cleanup_expired(now);
        }

        let mut entry = self
            .counters
            .entry(key.to_string())
            .or_insert(RequestCounter {
                count: 0,
                window_start: now,
            });
        let counter = entry.value_mut();

        if now.duration_since(counter.window_start) >= WINDOW {
            counter.count = 0;
            counter.window_start = now;
        }

        if counter.count >= self.limit {
            return false;
        }
        counter.count += 1;
        true
    }

    fn cleanup_expired(&self, now: Instant) {
        self.counters
            .retain(|_, counter| now.duration_since(counter.window_start) < WINDOW);
    }
}

/// Rejects requests without the shared API key, then applies rate limits.
///
/// Health probes and CORS preflights pass through untouched.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path();
    if request.method() == Method::OPTIONS || PUBLIC_PATHS.contains(&path) {
        debug!(path = %path, "Public path, skipping auth");
        return Ok(next.run(request).await);
    }

    let client = client_key(request.headers());
    if !state.rate_limiter.check(&client) {
        warn!(client = %client, path = %path, "Rate limit exceeded");
        return Err(AppError::TooManyRequests);
    }

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());
    if provided != Some(state.config.internal_api_key.as_str()) {
        warn!(path = %path, "Rejected request with missing or invalid API key");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// First forwarded address, else a shared bucket for direct callers.
fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .or_else(|| headers.get("x-real-ip").and_then(|v| v.to_str().ok()))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "direct".to_string())
}
