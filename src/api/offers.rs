use super::{check_len, AppState};
use crate::domain::{Money, OfferEvaluation};
use crate::error::AppError;
use crate::orchestration::OfferRequest;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;

const MAX_ROUND: u32 = 10;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluateOfferRequest {
    pub load_id: String,
    pub carrier_offer: Money,
    pub round_number: u32,
    #[serde(default)]
    pub call_sid: Option<String>,
}

impl EvaluateOfferRequest {
    fn validate(&self) -> Result<(), AppError> {
        check_len("load_id", &self.load_id, 64)?;
        if !self.carrier_offer.is_positive() {
            return Err(AppError::Validation(
                "carrier_offer must be greater than 0".to_string(),
            ));
        }
        if !(1..=MAX_ROUND).contains(&self.round_number) {
            return Err(AppError::Validation(format!(
                "round_number must be between 1 and {}",
                MAX_ROUND
            )));
        }
        Ok(())
    }
}

pub async fn evaluate_offer(
    State(state): State<AppState>,
    payload: Result<Json<EvaluateOfferRequest>, JsonRejection>,
) -> Result<Json<OfferEvaluation>, AppError> {
    let Json(request) = payload?;
    request.validate()?;

    let call_sid = request
        .call_sid
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let evaluation = state
        .offers
        .evaluate(&OfferRequest {
            load_id: request.load_id,
            carrier_offer: request.carrier_offer,
            round_number: request.round_number,
            call_sid,
        })
        .await?;

    Ok(Json(evaluation))
}
