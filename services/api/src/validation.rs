//! Request body and query extraction with field-level errors

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use validator::{Validate, ValidationErrors};

use crate::error::ApiError;

/// One entry of the `details` list in a validation error body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub path: Vec<String>,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        let path = if field.is_empty() {
            Vec::new()
        } else {
            vec![field.to_string()]
        };
        Self {
            path,
            message: message.into(),
        }
    }
}

/// `base_price` -> `basePrice`
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn default_message(code: &str) -> &'static str {
    match code {
        "length" => "Invalid length",
        "range" => "Value out of range",
        "required" => "Required",
        _ => "Invalid value",
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = if field == "__all__" {
                    String::new()
                } else {
                    camel_case(&field)
                };
                errs.iter()
                    .map(|err| {
                        let message = err
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| default_message(&err.code).to_string());
                        FieldError::new(&field, message)
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        details.sort_by(|a, b| a.path.cmp(&b.path));
        ApiError::Validation(details)
    }
}

/// Turn a serde error into a field error, recovering the field name from
/// "missing field `x`" and "unknown variant" style messages where possible
fn decode_error(err: serde_json::Error) -> ApiError {
    let message = err.to_string();
    let field = message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next());

    match field {
        Some(field) => ApiError::invalid_field(field, "Required"),
        None => {
            let message = message
                .split(" at line ")
                .next()
                .unwrap_or(&message)
                .to_string();
            ApiError::Validation(vec![FieldError::new("", message)])
        }
    }
}

/// Decode `value` strictly into `T` and run its validation rules
pub fn validated<T>(value: Value) -> Result<T, ApiError>
where
    T: DeserializeOwned + Validate,
{
    let payload: T = serde_json::from_value(value).map_err(decode_error)?;
    payload.validate()?;
    Ok(payload)
}

/// JSON body extractor that validates the payload
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(ValidatedJson(validated(value)?))
    }
}

/// Query string extractor with the API's JSON error body
pub struct ApiQuery<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(ApiQuery(query))
    }
}
