//! Message templates

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use common::models::{MessageTemplate, NewMessageTemplate, TemplateFilter, UpdateMessageTemplate};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
    validation::{ApiQuery, ValidatedJson},
};

/// A provider sees their own templates plus the defaults
pub async fn list_templates(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<TemplateFilter>,
) -> ApiResult<Json<Vec<MessageTemplate>>> {
    Ok(Json(state.storage.list_templates(&filter).await?))
}

pub async fn create_template(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewMessageTemplate>,
) -> ApiResult<impl IntoResponse> {
    let template = state.storage.create_template(payload).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageTemplate>> {
    state
        .storage
        .get_template(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Message template"))
}

pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateMessageTemplate>,
) -> ApiResult<Json<MessageTemplate>> {
    state
        .storage
        .update_template(&id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Message template"))
}

pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.storage.delete_template(&id).await? {
        return Err(ApiError::not_found("Message template"));
    }
    Ok(StatusCode::NO_CONTENT)
}
