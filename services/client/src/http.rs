//! Fetch wrapper around `reqwest`

use common::{API_VERSION, API_VERSION_HEADER};
use reqwest::{
    Method, Response, StatusCode,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue},
    multipart::Form,
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    config::ClientConfig,
    error::{ClientError, ClientResult},
};

/// Request payload
pub enum RequestBody {
    Empty,
    Json(Value),
    /// Sent as-is; no JSON content type is set
    Multipart(Form),
}

/// One call to the API, relative to the configured base URL
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// Add the non-null fields of `filter` to the query string
    pub fn query<Q: Serialize>(mut self, filter: &Q) -> ClientResult<Self> {
        self.query.extend(query_pairs(filter)?);
        Ok(self)
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> ClientResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ClientError::Decode(format!("Failed to encode request: {}", e)))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn multipart(mut self, form: Form) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }
}

fn query_pairs<Q: Serialize>(filter: &Q) -> ClientResult<Vec<(String, String)>> {
    let value = serde_json::to_value(filter)
        .map_err(|e| ClientError::Decode(format!("Failed to encode query: {}", e)))?;
    let Value::Object(fields) = value else {
        return Err(ClientError::Decode("Query must be an object".to_string()));
    };

    Ok(fields
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect())
}

/// Pick the most useful message out of an error response body
fn error_message(status: StatusCode, body: &str) -> String {
    if !body.is_empty() {
        if let Ok(Value::Object(parsed)) = serde_json::from_str::<Value>(body) {
            for key in ["error", "message"] {
                if let Some(Value::String(message)) = parsed.get(key) {
                    return message.clone();
                }
            }
        }
        return body.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}

/// Reject responses announcing a different contract version
fn check_version(headers: &HeaderMap) -> ClientResult<()> {
    match headers.get(API_VERSION_HEADER) {
        Some(found) if found.as_bytes() != API_VERSION.as_bytes() => {
            Err(ClientError::VersionMismatch {
                expected: API_VERSION,
                found: String::from_utf8_lossy(found.as_bytes()).into_owned(),
            })
        }
        _ => Ok(()),
    }
}

/// Typed client for the marketplace API.
///
/// Cookies set by the server are kept and replayed, so a client that logged
/// in stays signed in for later calls.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Perform `request`; non-success statuses become [`ClientError::Api`]
    pub async fn send(&self, request: ApiRequest) -> ClientResult<Response> {
        let url = format!("{}{}", self.inner.base_url, request.path);
        debug!("{} {}", request.method, url);

        let mut builder = self.inner.client.request(request.method, &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match request.body {
            RequestBody::Empty => builder.header(CONTENT_TYPE, "application/json"),
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => builder.multipart(form),
        };

        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        warn!("Request to {} failed: {} {}", url, status.as_u16(), message);
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Perform `request` and decode the body strictly into `T`
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        let response = self.send(request).await?;
        check_version(response.headers())?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Perform `request`, ignoring any body
    pub async fn execute(&self, request: ApiRequest) -> ClientResult<()> {
        let response = self.send(request).await?;
        check_version(response.headers())
    }
}
