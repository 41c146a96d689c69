//! Portfolio images

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use common::models::{NewPortfolioImage, PortfolioFilter, PortfolioImage, UpdatePortfolioImage};
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
    validation::{ApiQuery, ValidatedJson},
};

pub async fn list_images(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<PortfolioFilter>,
) -> ApiResult<Json<Vec<PortfolioImage>>> {
    Ok(Json(state.storage.list_portfolio_images(&filter).await?))
}

pub async fn create_image(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewPortfolioImage>,
) -> ApiResult<impl IntoResponse> {
    let image = state.storage.create_portfolio_image(payload).await?;
    info!(
        "Added portfolio image {} for provider {}",
        image.id, image.hairstylist_id
    );
    Ok((StatusCode::CREATED, Json(image)))
}

pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PortfolioImage>> {
    state
        .storage
        .get_portfolio_image(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Portfolio image"))
}

pub async fn update_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdatePortfolioImage>,
) -> ApiResult<Json<PortfolioImage>> {
    state
        .storage
        .update_portfolio_image(&id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Portfolio image"))
}

pub async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.storage.delete_portfolio_image(&id).await? {
        return Err(ApiError::not_found("Portfolio image"));
    }
    Ok(StatusCode::NO_CONTENT)
}
