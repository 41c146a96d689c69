//! Client hair history records

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use common::models::{HairHistory, HairHistoryFilter, NewHairHistory, UpdateHairHistory};
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
    validation::{ApiQuery, ValidatedJson},
};

pub async fn list_entries(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<HairHistoryFilter>,
) -> ApiResult<Json<Vec<HairHistory>>> {
    Ok(Json(state.storage.list_hair_history(&filter).await?))
}

pub async fn create_entry(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewHairHistory>,
) -> ApiResult<impl IntoResponse> {
    let entry = state.storage.create_hair_history(payload).await?;
    info!("Recorded hair history {} for client {}", entry.id, entry.client_id);
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<HairHistory>> {
    state
        .storage
        .get_hair_history(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Hair history"))
}

pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateHairHistory>,
) -> ApiResult<Json<HairHistory>> {
    state
        .storage
        .update_hair_history(&id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Hair history"))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.storage.delete_hair_history(&id).await? {
        return Err(ApiError::not_found("Hair history"));
    }
    Ok(StatusCode::NO_CONTENT)
}
