//! Messaging calls

use common::models::{ConversationSummary, Message, NewMessage};
use serde::Deserialize;

use crate::{
    error::ClientResult,
    http::{ApiClient, ApiRequest},
};

#[derive(Deserialize)]
struct Updated {
    updated: u64,
}

impl ApiClient {
    /// Inbox of the signed-in user
    pub async fn conversations(&self) -> ClientResult<Vec<ConversationSummary>> {
        self.fetch(ApiRequest::get("/api/conversations")).await
    }

    /// Messages between two users, oldest first
    pub async fn conversation(&self, user_id: &str, other_user_id: &str) -> ClientResult<Vec<Message>> {
        self.fetch(ApiRequest::get(format!(
            "/api/conversations/{}/{}",
            user_id, other_user_id
        )))
        .await
    }

    pub async fn send_message(&self, message: &NewMessage) -> ClientResult<Message> {
        self.fetch(ApiRequest::post("/api/messages").json(message)?)
            .await
    }

    pub async fn mark_message_read(&self, id: &str) -> ClientResult<Message> {
        self.fetch(ApiRequest::patch(format!("/api/messages/{}/read", id)))
            .await
    }

    /// Mark what `other_user_id` sent to `user_id` read; returns how many changed
    pub async fn mark_conversation_read(
        &self,
        user_id: &str,
        other_user_id: &str,
    ) -> ClientResult<u64> {
        let response: Updated = self
            .fetch(ApiRequest::patch(format!(
                "/api/conversations/{}/{}/read",
                user_id, other_user_id
            )))
            .await?;
        Ok(response.updated)
    }
}
