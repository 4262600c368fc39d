use super::AppState;
use crate::domain::CallLog;
use crate::error::AppError;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct LogCallResponse {
    pub status: &'static str,
    pub call_id: i64,
}

/// Parse leniently, keep the raw body alongside the typed record.
pub async fn log_call(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<LogCallResponse>, AppError> {
    let Json(raw) = payload?;

    let call: CallLog =
        serde_json::from_value(raw.clone()).map_err(|e| AppError::Validation(e.to_string()))?;
    call.validate().map_err(AppError::Validation)?;

    let call_id = state.repo.insert_call(&call, &raw).await?;
    info!(
        call_id,
        call_outcome = %call.call_outcome,
        mc_number = ?call.mc_number,
        "Logged call"
    );

    Ok(Json(LogCallResponse {
        status: "logged",
        call_id,
    }))
}
