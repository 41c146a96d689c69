//! API service routes

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderName, HeaderValue},
    response::IntoResponse,
    routing::{get, patch, post},
};
use common::{API_VERSION, API_VERSION_HEADER};
use serde_json::json;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::error;

use crate::state::AppState;

mod auth;
mod bookings;
mod catalog;
mod hair_history;
mod jobs;
mod messages;
mod portfolio;
mod templates;
mod users;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/user", get(auth::current_user))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/hairstylists", get(users::list_hairstylists))
        .route("/service-providers", get(users::search_providers))
        .route(
            "/service-categories",
            get(catalog::list_categories).post(catalog::create_category),
        )
        .route(
            "/service-categories/:id",
            get(catalog::get_category)
                .put(catalog::update_category)
                .delete(catalog::delete_category),
        )
        .route(
            "/services",
            get(catalog::list_services).post(catalog::create_service),
        )
        .route(
            "/services/:id",
            get(catalog::get_service)
                .put(catalog::update_service)
                .delete(catalog::delete_service),
        )
        .route(
            "/bookings",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route(
            "/bookings/:id",
            get(bookings::get_booking)
                .put(bookings::update_booking)
                .delete(bookings::delete_booking),
        )
        .route("/bookings/:id/status", patch(bookings::update_booking_status))
        .route(
            "/portfolio",
            get(portfolio::list_images).post(portfolio::create_image),
        )
        .route(
            "/portfolio/:id",
            get(portfolio::get_image)
                .put(portfolio::update_image)
                .delete(portfolio::delete_image),
        )
        .route(
            "/messages",
            get(messages::list_messages).post(messages::send_message),
        )
        .route(
            "/messages/:id",
            get(messages::get_message)
                .patch(messages::mark_read)
                .delete(messages::delete_message),
        )
        .route("/messages/:id/read", patch(messages::mark_read))
        .route("/conversations", get(messages::list_conversations))
        .route(
            "/conversations/:user_id/:other_user_id",
            get(messages::get_conversation),
        )
        .route(
            "/conversations/:user_id/:other_user_id/read",
            patch(messages::mark_conversation_read),
        )
        .route(
            "/message-templates",
            get(templates::list_templates).post(templates::create_template),
        )
        .route(
            "/message-templates/:id",
            get(templates::get_template)
                .put(templates::update_template)
                .delete(templates::delete_template),
        )
        .route(
            "/hair-history",
            get(hair_history::list_entries).post(hair_history::create_entry),
        )
        .route(
            "/hair-history/:id",
            get(hair_history::get_entry)
                .put(hair_history::update_entry)
                .delete(hair_history::delete_entry),
        )
        .route("/jobs", get(jobs::list_jobs).post(jobs::create_job))
        .route("/jobs/:id", get(jobs::get_job).delete(jobs::delete_job))
        .route("/jobs/:id/status", patch(jobs::update_job_status));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static(API_VERSION_HEADER),
            HeaderValue::from_static(API_VERSION),
        ))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let storage_ok = match state.storage.health_check().await {
        Ok(ok) => ok,
        Err(e) => {
            error!("Storage health check failed: {}", e);
            false
        }
    };

    Json(json!({
        "status": if storage_ok { "ok" } else { "degraded" },
        "service": "api",
        "storage": storage_ok,
    }))
}
