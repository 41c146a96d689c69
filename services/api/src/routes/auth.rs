//! Registration, login and session handling

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::cookie::CookieJar;
use common::models::{LoginRequest, PublicUser, RegisterRequest};
use tracing::{error, info, warn};

use crate::{
    error::{ApiError, ApiResult},
    password::{hash_password, verify_password},
    session::{CurrentUser, removal_cookie, session_cookie},
    state::AppState,
    validation::{FieldError, ValidatedJson},
};

async fn start_session(state: &AppState, jar: CookieJar, user_id: &str) -> ApiResult<CookieJar> {
    let token = state.sessions.create(user_id).await.map_err(|e| {
        error!("Failed to create session: {}", e);
        ApiError::Internal(e.to_string())
    })?;
    Ok(jar.add(session_cookie(&state.config.session.cookie_name, token)))
}

/// Register a new user and sign them in
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    if payload.role.is_provider() {
        let mut missing = Vec::new();
        if payload.bio.as_deref().is_none_or(|b| b.trim().is_empty()) {
            missing.push(FieldError::new("bio", "Bio is required for service providers"));
        }
        if payload.location.as_deref().is_none_or(|l| l.trim().is_empty()) {
            missing.push(FieldError::new(
                "location",
                "Location is required for service providers",
            ));
        }
        if !missing.is_empty() {
            return Err(ApiError::Validation(missing));
        }
    }

    if state
        .storage
        .get_user_by_username(&payload.username)
        .await?
        .is_some()
    {
        return Err(ApiError::BadRequest("Username already exists".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = state
        .storage
        .create_user(payload.into_new_user(password_hash))
        .await?;
    info!("Registered user {} as {}", user.username, user.role);

    let jar = start_session(&state, jar, &user.id).await?;
    Ok((StatusCode::CREATED, jar, Json(PublicUser::from(user))))
}

/// Sign in with username and password
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .storage
        .get_user_by_username(&payload.username)
        .await?
        .filter(|user| verify_password(&payload.password, &user.password_hash));

    let Some(user) = user else {
        warn!("Rejected login for {}", payload.username);
        return Err(ApiError::InvalidCredentials);
    };

    let jar = start_session(&state, jar, &user.id).await?;
    info!("User {} signed in", user.username);
    Ok((jar, Json(PublicUser::from(user))))
}

/// End the current session, if any
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> ApiResult<impl IntoResponse> {
    let cookie_name = &state.config.session.cookie_name;
    if let Some(cookie) = jar.get(cookie_name) {
        state.sessions.destroy(cookie.value()).await.map_err(|e| {
            error!("Failed to destroy session: {}", e);
            ApiError::Internal(e.to_string())
        })?;
    }
    Ok((StatusCode::NO_CONTENT, jar.remove(removal_cookie(cookie_name))))
}

/// The signed-in user
pub async fn current_user(CurrentUser(user): CurrentUser) -> Json<PublicUser> {
    Json(PublicUser::from(user))
}
