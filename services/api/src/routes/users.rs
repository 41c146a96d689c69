//! User profiles and provider search

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use common::models::{
    PortfolioFilter, PublicUser, Role, ServiceFilter, ServiceProvider, UpdateUser, UserFilter,
};
use serde::Deserialize;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    session::CurrentUser,
    state::AppState,
    validation::{ApiQuery, ValidatedJson},
};

/// Get a user's public profile
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PublicUser>> {
    let user = state
        .storage
        .get_user(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    Ok(Json(user.into()))
}

/// Update the signed-in user's own profile
pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateUser>,
) -> ApiResult<Json<PublicUser>> {
    if current.id != id {
        return Err(ApiError::Forbidden);
    }
    let user = state
        .storage
        .update_user(&id, payload)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    info!("Updated profile of user {}", user.id);
    Ok(Json(user.into()))
}

/// Delete the signed-in user's own account
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if current.id != id {
        return Err(ApiError::Forbidden);
    }
    if !state.storage.delete_user(&id).await? {
        return Err(ApiError::not_found("User"));
    }
    info!("Deleted user {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// List every hairstylist
pub async fn list_hairstylists(State(state): State<AppState>) -> ApiResult<Json<Vec<PublicUser>>> {
    let filter = UserFilter {
        role: Some(Role::Hairstylist),
        ..Default::default()
    };
    let users = state.storage.list_users(&filter).await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

#[derive(Debug, Default, Deserialize)]
pub struct ProviderQuery {
    pub role: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// Search providers with their active services and a portfolio preview
pub async fn search_providers(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProviderQuery>,
) -> ApiResult<impl IntoResponse> {
    let role = match query.role.as_deref().filter(|r| !r.is_empty()) {
        Some(raw) => {
            let role: Role = raw
                .parse()
                .map_err(|e: String| ApiError::invalid_field("role", e))?;
            if !role.is_provider() {
                return Err(ApiError::invalid_field("role", "Not a provider role"));
            }
            Some(role)
        }
        None => None,
    };

    let filter = UserFilter {
        role,
        providers_only: true,
        city: query.city.filter(|c| !c.is_empty()),
        state: query.state.filter(|s| !s.is_empty()),
    };

    let mut providers = Vec::new();
    for user in state.storage.list_users(&filter).await? {
        let services = state
            .storage
            .list_services(&ServiceFilter {
                hairstylist_id: Some(user.id.clone()),
                is_active: Some(true),
                ..Default::default()
            })
            .await?;
        let portfolio = state
            .storage
            .list_portfolio_images(&PortfolioFilter {
                hairstylist_id: Some(user.id.clone()),
                ..Default::default()
            })
            .await?;
        providers.push(ServiceProvider::new(user.into(), services, portfolio));
    }

    Ok(Json(providers))
}
