//! Service categories and services

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use common::models::{
    NewService, NewServiceCategory, Service, ServiceCategory, ServiceFilter, UpdateService,
    UpdateServiceCategory,
};
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
    validation::{ApiQuery, ValidatedJson},
};

pub async fn list_categories(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ServiceCategory>>> {
    Ok(Json(state.storage.list_categories().await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewServiceCategory>,
) -> ApiResult<impl IntoResponse> {
    let category = state.storage.create_category(payload).await?;
    info!("Created service category {}", category.name);
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ServiceCategory>> {
    state
        .storage
        .get_category(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Service category"))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateServiceCategory>,
) -> ApiResult<Json<ServiceCategory>> {
    state
        .storage
        .update_category(&id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Service category"))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.storage.delete_category(&id).await? {
        return Err(ApiError::not_found("Service category"));
    }
    info!("Deleted service category {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// List services, optionally by provider, category or active flag
pub async fn list_services(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ServiceFilter>,
) -> ApiResult<Json<Vec<Service>>> {
    Ok(Json(state.storage.list_services(&filter).await?))
}

pub async fn create_service(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewService>,
) -> ApiResult<impl IntoResponse> {
    let service = state.storage.create_service(payload).await?;
    info!(
        "Created service {} for provider {}",
        service.id, service.hairstylist_id
    );
    Ok((StatusCode::CREATED, Json(service)))
}

pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Service>> {
    state
        .storage
        .get_service(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Service"))
}

pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateService>,
) -> ApiResult<Json<Service>> {
    state
        .storage
        .update_service(&id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Service"))
}

pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.storage.delete_service(&id).await? {
        return Err(ApiError::not_found("Service"));
    }
    info!("Deleted service {}", id);
    Ok(StatusCode::NO_CONTENT)
}
