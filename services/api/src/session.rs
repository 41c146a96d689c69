//! Cookie sessions
//!
//! A session is an opaque random token mapped to a user id. The token travels
//! in an HTTP-only cookie; the mapping lives in memory or in Redis.

use anyhow::Result;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use common::cache::RedisPool;
use common::models::User;
use rand::{Rng, distributions::Alphanumeric};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::{error::ApiError, state::AppState};

const TOKEN_LEN: usize = 32;

pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Start a session for `user_id` and return its token
    async fn create(&self, user_id: &str) -> Result<String>;
    /// User id behind `token`, if the session is still alive
    async fn resolve(&self, token: &str) -> Result<Option<String>>;
    async fn destroy(&self, token: &str) -> Result<()>;
}

/// Sessions held in process memory
pub struct MemorySessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, (String, Instant)>>,
}

impl MemorySessionStore {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            ttl: Duration::from_secs(ttl_seconds),
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user_id: &str) -> Result<String> {
        let token = generate_token();
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();
        sessions.retain(|_, (_, expires_at)| *expires_at > now);
        sessions.insert(token.clone(), (user_id.to_string(), now + self.ttl));
        Ok(token)
    }

    async fn resolve(&self, token: &str) -> Result<Option<String>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(token)
            .filter(|(_, expires_at)| *expires_at > Instant::now())
            .map(|(user_id, _)| user_id.clone()))
    }

    async fn destroy(&self, token: &str) -> Result<()> {
        self.sessions.write().await.remove(token);
        Ok(())
    }
}

/// Sessions held in Redis with a TTL
pub struct RedisSessionStore {
    redis_pool: RedisPool,
    ttl_seconds: u64,
}

impl RedisSessionStore {
    pub fn new(redis_pool: RedisPool, ttl_seconds: u64) -> Self {
        Self {
            redis_pool,
            ttl_seconds,
        }
    }

    fn key(token: &str) -> String {
        format!("session:{}", token)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, user_id: &str) -> Result<String> {
        let token = generate_token();
        self.redis_pool
            .set(&Self::key(&token), user_id, Some(self.ttl_seconds))
            .await?;
        info!("Created session for user: {}", user_id);
        Ok(token)
    }

    async fn resolve(&self, token: &str) -> Result<Option<String>> {
        self.redis_pool.get(&Self::key(token)).await
    }

    async fn destroy(&self, token: &str) -> Result<()> {
        self.redis_pool.delete(&Self::key(token)).await?;
        Ok(())
    }
}

/// Session cookie carrying `token`; expiry is enforced by the session store
pub fn session_cookie(name: &str, token: String) -> Cookie<'static> {
    Cookie::build((name.to_string(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Cookie that clears the session on the client
pub fn removal_cookie(name: &str) -> Cookie<'static> {
    Cookie::build((name.to_string(), "")).path("/").build()
}

async fn load_session_user(parts: &Parts, state: &AppState) -> Result<Option<User>, ApiError> {
    let jar = CookieJar::from_headers(&parts.headers);
    let Some(cookie) = jar.get(&state.config.session.cookie_name) else {
        return Ok(None);
    };

    let user_id = state.sessions.resolve(cookie.value()).await.map_err(|e| {
        error!("Failed to resolve session: {}", e);
        ApiError::Internal(e.to_string())
    })?;

    match user_id {
        Some(user_id) => Ok(state.storage.get_user(&user_id).await?),
        None => Ok(None),
    }
}

/// The signed-in user; rejects with 401 when there is no valid session
pub struct CurrentUser(pub User);

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        load_session_user(parts, state)
            .await?
            .map(CurrentUser)
            .ok_or(ApiError::Unauthorized)
    }
}

/// The signed-in user, if any
pub struct MaybeUser(pub Option<User>);

#[axum::async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        Ok(MaybeUser(load_session_user(parts, state).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_random_alphanumeric() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), TOKEN_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_memory_sessions() {
        let store = MemorySessionStore::new(60);
        let token = store.create("user-1").await.unwrap();
        assert_eq!(store.resolve(&token).await.unwrap(), Some("user-1".to_string()));

        store.destroy(&token).await.unwrap();
        assert_eq!(store.resolve(&token).await.unwrap(), None);
        assert_eq!(store.resolve("forged").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_sessions_do_not_resolve() {
        let store = MemorySessionStore::new(0);
        let token = store.create("user-1").await.unwrap();
        assert_eq!(store.resolve(&token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_redis_sessions() {
        let Ok(url) = std::env::var("REDIS_URL") else {
            return;
        };
        let pool = RedisPool::new(&common::cache::RedisConfig {
            url,
            namespace: format!("session-test-{}", generate_token()),
        })
        .await
        .unwrap();
        let store = RedisSessionStore::new(pool, 30);

        let token = store.create("user-1").await.unwrap();
        assert_eq!(store.resolve(&token).await.unwrap(), Some("user-1".to_string()));
        store.destroy(&token).await.unwrap();
        assert_eq!(store.resolve(&token).await.unwrap(), None);
    }
}
