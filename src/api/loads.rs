use super::{check_len, AppState};
use crate::domain::time::deserialize_timestamp;
use crate::domain::LoadOut;
use crate::error::AppError;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchLoadsRequest {
    pub equipment_type: String,
    pub origin_location: String,
    /// RFC 3339, or a naive ISO-8601 timestamp taken as UTC.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub availability_time: DateTime<Utc>,
}

impl SearchLoadsRequest {
    fn validate(&self) -> Result<(), AppError> {
        check_len("equipment_type", &self.equipment_type, 50)?;
        check_len("origin_location", &self.origin_location, 255)
    }
}

#[derive(Debug, Serialize)]
pub struct SearchLoadsResponse {
    pub loads: Vec<LoadOut>,
}

pub async fn search_loads(
    State(state): State<AppState>,
    payload: Result<Json<SearchLoadsRequest>, JsonRejection>,
) -> Result<Json<SearchLoadsResponse>, AppError> {
    let Json(request) = payload?;
    request.validate()?;

    let loads = state
        .finder
        .search(
            &request.equipment_type,
            &request.origin_location,
            request.availability_time,
        )
        .await?;

    Ok(Json(SearchLoadsResponse {
        loads: loads.into_iter().map(LoadOut::from).collect(),
    }))
}
