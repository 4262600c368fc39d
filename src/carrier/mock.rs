//! In-memory carrier verifier for tests and offline runs.

use super::{CarrierVerification, CarrierVerifier, VerificationError, VerificationStatus};
use crate::domain::McNumber;
use async_trait::async_trait;
use std::collections::HashMap;

/// Answers from a fixed registry; unknown MC numbers are `invalid_mc`.
#[derive(Debug, Clone, Default)]
pub struct MockCarrierVerifier {
    carriers: HashMap<String, (bool, Option<String>)>,
    failure: Option<VerificationError>,
}

impl MockCarrierVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a carrier that is allowed to operate with active authority.
    pub fn with_authorized(mut self, mc_number: &str, legal_name: &str) -> Self {
        self.carriers.insert(
            McNumber::normalize(mc_number).as_str().to_string(),
            (true, Some(legal_name.to_string())),
        );
        self
    }

    /// Register a carrier that exists but may not operate.
    pub fn with_unauthorized(mut self, mc_number: &str, legal_name: &str) -> Self {
        self.carriers.insert(
            McNumber::normalize(mc_number).as_str().to_string(),
            (false, Some(legal_name.to_string())),
        );
        self
    }

    /// Make every lookup fail with `error`.
    pub fn failing(mut self, error: VerificationError) -> Self {
        self.failure = Some(error);
        self
    }
}

#[async_trait]
impl CarrierVerifier for MockCarrierVerifier {
    async fn verify(&self, mc_number: &McNumber) -> Result<CarrierVerification, VerificationError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }

        Ok(match self.carriers.get(mc_number.as_str()) {
            Some((eligible, legal_name)) => CarrierVerification {
                eligible: *eligible,
                verification: if *eligible {
                    VerificationStatus::Verified
                } else {
                    VerificationStatus::NotAuthorized
                },
                legal_name: legal_name.clone(),
                mc_number: mc_number.as_str().to_string(),
            },
            None => CarrierVerification::ineligible(VerificationStatus::InvalidMc, mc_number),
        })
    }
}
