use super::{check_len, AppState};
use crate::carrier::CarrierVerification;
use crate::domain::McNumber;
use crate::error::AppError;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use tracing::{info, warn};

const MAX_MC_NUMBER_LEN: usize = 32;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifyCarrierRequest {
    pub mc_number: String,
}

/// Registry failures are answered with `verification_unavailable` so the
/// call can continue.
pub async fn verify_carrier(
    State(state): State<AppState>,
    payload: Result<Json<VerifyCarrierRequest>, JsonRejection>,
) -> Result<Json<CarrierVerification>, AppError> {
    let Json(request) = payload?;

    check_len("mc_number", &request.mc_number, MAX_MC_NUMBER_LEN)?;

    let mc_number = McNumber::normalize(&request.mc_number);
    let verification = match state.verifier.verify(&mc_number).await {
        Ok(v) => v,
        Err(e) => {
            warn!(mc_number = %mc_number, error = %e, "Carrier verification unavailable");
            CarrierVerification::unavailable(&mc_number)
        }
    };

    info!(
        mc_number = %mc_number,
        eligible = verification.eligible,
        verification = %verification.verification,
        "Verified carrier"
    );
    Ok(Json(verification))
}
