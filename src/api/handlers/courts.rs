//! Court catalog

use axum::extract::{Path, State};
use axum::Json;

use super::AppState;
use crate::api::dto::{domain_error, ApiResponse, ApiResult};
use crate::domain::Court;

pub async fn list_courts(State(state): State<AppState>) -> ApiResult<Vec<Court>> {
    let courts = state.service.list_courts().await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(courts)))
}

pub async fn get_court(
    State(state): State<AppState>,
    Path(court_id): Path<String>,
) -> ApiResult<Court> {
    let court = state.service.get_court(&court_id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(court)))
}
