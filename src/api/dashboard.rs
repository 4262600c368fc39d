use super::AppState;
use crate::db::{DecisionBreakdown, FunnelStage, SentimentPoint};
use crate::error::AppError;
use crate::orchestration::{LoadPerformance, Overview};
use axum::{extract::State, Json};

pub async fn overview(State(state): State<AppState>) -> Result<Json<Overview>, AppError> {
    Ok(Json(state.dashboard.overview().await?))
}

pub async fn funnel(State(state): State<AppState>) -> Result<Json<Vec<FunnelStage>>, AppError> {
    Ok(Json(state.dashboard.funnel().await?))
}

pub async fn negotiations(
    State(state): State<AppState>,
) -> Result<Json<Vec<DecisionBreakdown>>, AppError> {
    Ok(Json(state.dashboard.negotiations().await?))
}

pub async fn sentiment(
    State(state): State<AppState>,
) -> Result<Json<Vec<SentimentPoint>>, AppError> {
    Ok(Json(state.dashboard.sentiment().await?))
}

pub async fn load_performance(
    State(state): State<AppState>,
) -> Result<Json<Vec<LoadPerformance>>, AppError> {
    Ok(Json(state.dashboard.load_performance().await?))
}
