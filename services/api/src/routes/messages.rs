//! Direct messages and conversations

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use common::models::{
    ConversationSummary, Message, MessageFilter, NewMessage, UserSummary,
    summarize_conversations,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    session::MaybeUser,
    state::AppState,
    validation::{ApiQuery, ValidatedJson},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageQuery {
    pub user_id: Option<String>,
    pub with_user_id: Option<String>,
    pub booking_id: Option<String>,
}

/// `userId` from the query, falling back to the session user
fn resolve_user(user_id: Option<String>, session: MaybeUser) -> ApiResult<String> {
    user_id
        .filter(|id| !id.is_empty())
        .or(session.0.map(|user| user.id))
        .ok_or(ApiError::Unauthorized)
}

pub async fn list_messages(
    State(state): State<AppState>,
    session: MaybeUser,
    ApiQuery(query): ApiQuery<MessageQuery>,
) -> ApiResult<Json<Vec<Message>>> {
    let user_id = resolve_user(query.user_id, session)?;
    let filter = MessageFilter {
        participant: Some(user_id),
        counterpart: query.with_user_id.filter(|id| !id.is_empty()),
        booking_id: query.booking_id,
    };
    Ok(Json(state.storage.list_messages(&filter).await?))
}

/// Send a message; the signed-in user is the sender, `senderId` only
/// counts without a session
pub async fn send_message(
    State(state): State<AppState>,
    session: MaybeUser,
    ValidatedJson(payload): ValidatedJson<NewMessage>,
) -> ApiResult<impl IntoResponse> {
    let sender_id = session
        .0
        .map(|user| user.id)
        .or_else(|| payload.sender_id.clone().filter(|id| !id.is_empty()))
        .ok_or(ApiError::Unauthorized)?;
    let message = state.storage.create_message(&sender_id, payload).await?;
    info!(
        "Message {} sent from {} to {}",
        message.id, message.sender_id, message.recipient_id
    );
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Message>> {
    state
        .storage
        .get_message(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Message"))
}

/// Mark a single message read; repeating the call is harmless
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Message>> {
    state
        .storage
        .mark_message_read(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Message"))
}

pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.storage.delete_message(&id).await? {
        return Err(ApiError::not_found("Message"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationQuery {
    pub user_id: Option<String>,
}

/// Inbox of a user, newest conversation first
pub async fn list_conversations(
    State(state): State<AppState>,
    session: MaybeUser,
    ApiQuery(query): ApiQuery<ConversationQuery>,
) -> ApiResult<Json<Vec<ConversationSummary>>> {
    let user_id = resolve_user(query.user_id, session)?;
    let messages = state
        .storage
        .list_messages(&MessageFilter::involving(user_id.clone()))
        .await?;

    let mut people: HashMap<String, UserSummary> = HashMap::new();
    for message in &messages {
        for id in [&message.sender_id, &message.recipient_id] {
            if people.contains_key(id) {
                continue;
            }
            if let Some(user) = state.storage.get_user(id).await? {
                people.insert(id.clone(), UserSummary::from(&user));
            }
        }
    }

    Ok(Json(summarize_conversations(&user_id, &messages, |id| {
        people.get(id).cloned()
    })))
}

/// Messages between two users in the order they were sent
pub async fn get_conversation(
    State(state): State<AppState>,
    Path((user_id, other_user_id)): Path<(String, String)>,
) -> ApiResult<Json<Vec<Message>>> {
    let filter = MessageFilter::between(user_id, other_user_id);
    Ok(Json(state.storage.list_messages(&filter).await?))
}

/// Mark everything `otherUserId` sent to `userId` read
pub async fn mark_conversation_read(
    State(state): State<AppState>,
    Path((user_id, other_user_id)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let updated = state
        .storage
        .mark_conversation_read(&user_id, &other_user_id)
        .await?;
    Ok(Json(json!({ "updated": updated })))
}
