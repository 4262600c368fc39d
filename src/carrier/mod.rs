//! Carrier authority verification against the FMCSA registry.

use crate::domain::McNumber;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub mod fmcsa;
pub mod mock;

pub use fmcsa::FmcsaClient;
pub use mock::MockCarrierVerifier;

/// Registry verdict for a carrier lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Verified,
    NotAuthorized,
    InvalidMc,
    /// The registry could not be consulted; never returned by a verifier,
    /// only substituted by callers on error.
    VerificationUnavailable,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Verified => "verified",
            VerificationStatus::NotAuthorized => "not_authorized",
            VerificationStatus::InvalidMc => "invalid_mc",
            VerificationStatus::VerificationUnavailable => "verification_unavailable",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarrierVerification {
    pub eligible: bool,
    pub verification: VerificationStatus,
    pub legal_name: Option<String>,
    pub mc_number: String,
}

impl CarrierVerification {
    pub fn ineligible(status: VerificationStatus, mc_number: &McNumber) -> Self {
        Self {
            eligible: false,
            verification: status,
            legal_name: None,
            mc_number: mc_number.as_str().to_string(),
        }
    }

    /// Fallback answer when the verifier fails.
    pub fn unavailable(mc_number: &McNumber) -> Self {
        Self::ineligible(VerificationStatus::VerificationUnavailable, mc_number)
    }
}

#[derive(Debug, Clone, Error)]
pub enum VerificationError {
    #[error("FMCSA_API_KEY is not configured")]
    MissingApiKey,
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },
    #[error("parse error: {0}")]
    Parse(String),
}

/// Looks up a carrier's operating authority by MC number.
#[async_trait]
pub trait CarrierVerifier: Send + Sync + fmt::Debug {
    async fn verify(&self, mc_number: &McNumber) -> Result<CarrierVerification, VerificationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_error_display() {
        assert_eq!(
            VerificationError::MissingApiKey.to_string(),
            "FMCSA_API_KEY is not configured"
        );
        let err = VerificationError::Http {
            status: 503,
            message: "Server error".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error 503: Server error");
    }

    #[test]
    fn test_unavailable_serializes_snake_case() {
        let v = CarrierVerification::unavailable(&McNumber::normalize("MC-123456"));
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["eligible"], false);
        assert_eq!(json["verification"], "verification_unavailable");
        assert_eq!(json["legal_name"], serde_json::Value::Null);
        assert_eq!(json["mc_number"], "123456");
    }
}
