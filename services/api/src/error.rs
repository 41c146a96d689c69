//! Error types for the API service and their HTTP mapping

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::StoreError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::validation::FieldError;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request body or query failed validation
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// No valid session
    #[error("Unauthorized")]
    Unauthorized,

    /// Login with an unknown username or a wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Signed in, but not allowed to touch this resource
    #[error("Forbidden")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    /// Bad request with message
    #[error("{0}")]
    BadRequest(String),

    /// Storage failure; the detail is logged, never returned
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(entity: &str) -> Self {
        ApiError::NotFound(format!("{} not found", entity))
    }

    /// Validation error on a single field
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        ApiError::Validation(vec![FieldError::new(field, message)])
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::Duplicate { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(details) => json!({
                "error": "Validation failed",
                "details": details,
            }),
            ApiError::Store(StoreError::Duplicate { field, .. }) => {
                json!({ "error": duplicate_message(field) })
            }
            ApiError::Store(err) => {
                error!("Storage operation failed: {}", err);
                json!({ "error": "Internal server error" })
            }
            ApiError::Internal(detail) => {
                error!("Request failed: {}", detail);
                json!({ "error": "Internal server error" })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

fn duplicate_message(field: &str) -> String {
    match field {
        "username" => "Username already exists".to_string(),
        other => format!("{} already exists", other),
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn store_errors_hide_details() {
        let (status, body) =
            body_of(ApiError::Store(StoreError::Backend("disk on fire".to_string()))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert!(!body.to_string().contains("disk"));
    }

    #[tokio::test]
    async fn duplicate_username_is_a_bad_request() {
        let (status, body) = body_of(ApiError::Store(StoreError::Duplicate {
            entity: "User",
            field: "username",
        }))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Username already exists");
    }

    #[tokio::test]
    async fn validation_errors_list_fields() {
        let (status, body) = body_of(ApiError::invalid_field("status", "Must not be blank")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["details"][0]["path"][0], "status");
        assert_eq!(body["details"][0]["message"], "Must not be blank");
    }

    #[tokio::test]
    async fn not_found_names_the_entity() {
        let (status, body) = body_of(ApiError::not_found("Booking")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Booking not found");
    }
}
