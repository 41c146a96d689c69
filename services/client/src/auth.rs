//! Account and session calls

use common::models::{LoginRequest, PublicUser, RegisterRequest};
use tracing::info;

use crate::{
    error::{ClientError, ClientResult},
    http::{ApiClient, ApiRequest},
};

impl ApiClient {
    /// Create an account; the client is signed in afterwards
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<PublicUser> {
        let user: PublicUser = self
            .fetch(ApiRequest::post("/api/register").json(request)?)
            .await?;
        info!("Registered as {}", user.username);
        Ok(user)
    }

    pub async fn login(&self, username: &str, password: &str) -> ClientResult<PublicUser> {
        let credentials = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.fetch(ApiRequest::post("/api/login").json(&credentials)?)
            .await
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.execute(ApiRequest::post("/api/logout")).await
    }

    /// The signed-in user, or `None` without a session
    pub async fn current_user(&self) -> ClientResult<Option<PublicUser>> {
        match self.fetch(ApiRequest::get("/api/user")).await {
            Ok(user) => Ok(Some(user)),
            Err(ClientError::Api { status: 401, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
