//! FMCSA QCMobile API client.

use super::{CarrierVerification, CarrierVerifier, VerificationError, VerificationStatus};
use crate::domain::McNumber;
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://mobile.fmcsa.dot.gov/qc/services";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);
const RETRY_BUDGET: Duration = Duration::from_secs(10);
const INITIAL_RETRY_INTERVAL: Duration = Duration::from_millis(500);

/// Carrier verifier backed by the public FMCSA docket-number lookup.
#[derive(Debug, Clone)]
pub struct FmcsaClient {
    client: Client,
    base_url: String,
    api_key: String,
    retry_budget: Duration,
    initial_interval: Duration,
}

impl FmcsaClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to build FMCSA HTTP client, using defaults");
                Client::new()
            });

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            retry_budget: RETRY_BUDGET,
            initial_interval: INITIAL_RETRY_INTERVAL,
        }
    }

    /// Cap the total time spent retrying transient failures.
    pub fn with_retry_budget(mut self, budget: Duration) -> Self {
        self.retry_budget = budget;
        self
    }

    /// Delay before the first retry; later delays grow from it.
    pub fn with_initial_interval(mut self, interval: Duration) -> Self {
        self.initial_interval = interval;
        self
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            current_interval: self.initial_interval,
            initial_interval: self.initial_interval,
            max_elapsed_time: Some(self.retry_budget),
            ..Default::default()
        }
    }

    async fn get_carrier(&self, mc_number: &McNumber) -> Result<Value, VerificationError> {
        let url = format!("{}/carriers/docket-number/{}", self.base_url, mc_number);

        retry(self.backoff(), || async {
            let response = self
                .client
                .get(&url)
                .query(&[("webKey", self.api_key.as_str())])
                .send()
                .await
                .map_err(|e| backoff::Error::transient(VerificationError::Network(e.to_string())))?;

            let status = response.status();
            if status == 429 || status.is_server_error() {
                return Err(backoff::Error::transient(VerificationError::Http {
                    status: status.as_u16(),
                    message: "Server error".to_string(),
                }));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(VerificationError::Http {
                    status: status.as_u16(),
                    message: "Client error".to_string(),
                }));
            }

            response
                .json::<Value>()
                .await
                .map_err(|e| backoff::Error::permanent(VerificationError::Parse(e.to_string())))
        })
        .await
    }
}

#[async_trait]
impl CarrierVerifier for FmcsaClient {
    async fn verify(&self, mc_number: &McNumber) -> Result<CarrierVerification, VerificationError> {
        if self.api_key.is_empty() {
            return Err(VerificationError::MissingApiKey);
        }

        debug!(mc_number = %mc_number, "Looking up carrier");
        let payload = self.get_carrier(mc_number).await?;
        parse_payload(&payload, mc_number)
    }
}

/// Interpret a docket-number lookup response.
///
/// `content` may be a list of `{carrier: {...}}` wrappers or a single object,
/// with or without the `carrier` wrapper.
pub fn parse_payload(
    payload: &Value,
    mc_number: &McNumber,
) -> Result<CarrierVerification, VerificationError> {
    let body = payload
        .as_object()
        .ok_or_else(|| VerificationError::Parse("Expected object response".to_string()))?;

    let content = match body.get("content") {
        Some(c) if !is_empty_value(c) => c,
        _ => return Ok(CarrierVerification::ineligible(VerificationStatus::InvalidMc, mc_number)),
    };

    let carrier = match content {
        Value::Array(items) => items.first().and_then(|first| first.get("carrier")),
        Value::Object(obj) => match obj.get("carrier") {
            Some(inner) if !is_empty_value(inner) => Some(inner),
            _ => Some(content),
        },
        _ => None,
    };

    let Some(carrier) = carrier.and_then(Value::as_object) else {
        return Ok(CarrierVerification::ineligible(VerificationStatus::InvalidMc, mc_number));
    };

    let allowed = field_text(carrier.get("allowedToOperate")).eq_ignore_ascii_case("Y");
    let status_active = field_text(carrier.get("statusCode")).eq_ignore_ascii_case("A");
    let eligible = allowed && status_active;

    Ok(CarrierVerification {
        eligible,
        verification: if eligible {
            VerificationStatus::Verified
        } else {
            VerificationStatus::NotAuthorized
        },
        legal_name: carrier
            .get("legalName")
            .and_then(Value::as_str)
            .map(str::to_string),
        mc_number: mc_number.as_str().to_string(),
    })
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
    }
}

fn field_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
