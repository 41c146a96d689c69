//! Direct messages between users and the conversation summaries built from them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use crate::models::user::UserSummary;
use crate::validation::validate_not_blank;

pub const DEFAULT_MESSAGE_TYPE: &str = "text";

/// Message entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub booking_id: Option<String>,
    pub content: String,
    pub message_type: String,
    pub template_id: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Build a stored message; the sender must already be resolved
    pub fn from_new(
        id: String,
        sender_id: String,
        new_message: NewMessage,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            sender_id,
            recipient_id: new_message.recipient_id,
            booking_id: new_message.booking_id,
            content: new_message.content,
            message_type: new_message
                .message_type
                .unwrap_or_else(|| DEFAULT_MESSAGE_TYPE.to_string()),
            template_id: new_message.template_id,
            is_read: false,
            created_at: now,
        }
    }

    pub fn involves(&self, user_id: &str) -> bool {
        self.sender_id == user_id || self.recipient_id == user_id
    }

    /// Whether the message was exchanged between exactly these two users
    pub fn is_between(&self, a: &str, b: &str) -> bool {
        (self.sender_id == a && self.recipient_id == b)
            || (self.sender_id == b && self.recipient_id == a)
    }

    /// The other side of the message as seen by `user_id`
    pub fn counterpart(&self, user_id: &str) -> &str {
        if self.sender_id == user_id {
            &self.recipient_id
        } else {
            &self.sender_id
        }
    }

    pub fn matches(&self, filter: &MessageFilter) -> bool {
        let participant_ok = match (&filter.participant, &filter.counterpart) {
            (Some(user), Some(other)) => self.is_between(user, other),
            (Some(user), None) => self.involves(user),
            (None, Some(other)) => self.involves(other),
            (None, None) => true,
        };
        participant_ok
            && filter
                .booking_id
                .as_ref()
                .is_none_or(|id| self.booking_id.as_ref() == Some(id))
    }
}

/// New message payload
///
/// `senderId` may be omitted when the request carries a session; the signed-in
/// user is then the sender.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub sender_id: Option<String>,
    #[serde(alias = "receiverId")]
    #[validate(length(min = 1, message = "recipientId is required"))]
    pub recipient_id: String,
    pub booking_id: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub content: String,
    pub message_type: Option<String>,
    pub template_id: Option<String>,
}

impl NewMessage {
    pub fn text(recipient_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sender_id: None,
            recipient_id: recipient_id.into(),
            booking_id: None,
            content: content.into(),
            message_type: None,
            template_id: None,
        }
    }
}

/// Query filters for message listings
#[derive(Debug, Clone, Default)]
pub struct MessageFilter {
    /// Messages sent or received by this user
    pub participant: Option<String>,
    /// Restrict to the conversation with this user
    pub counterpart: Option<String>,
    pub booking_id: Option<String>,
}

impl MessageFilter {
    pub fn involving(user_id: impl Into<String>) -> Self {
        Self {
            participant: Some(user_id.into()),
            ..Default::default()
        }
    }

    pub fn between(user_id: impl Into<String>, other_user_id: impl Into<String>) -> Self {
        Self {
            participant: Some(user_id.into()),
            counterpart: Some(other_user_id.into()),
            booking_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMessage {
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// One row of a user's inbox
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    /// Id of the other participant
    pub id: String,
    pub participants: Vec<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<LastMessage>,
    pub unread_count: u32,
}

/// Group `messages` by counterpart of `user_id`, newest conversation first.
///
/// `messages` must be in ascending creation order. Unread counts only include
/// messages addressed to `user_id`.
pub fn summarize_conversations<F>(
    user_id: &str,
    messages: &[Message],
    lookup_user: F,
) -> Vec<ConversationSummary>
where
    F: Fn(&str) -> Option<UserSummary>,
{
    let mut order: Vec<&str> = Vec::new();
    let mut latest: HashMap<&str, &Message> = HashMap::new();
    let mut unread: HashMap<&str, u32> = HashMap::new();

    for message in messages.iter().filter(|m| m.involves(user_id)) {
        let other = message.counterpart(user_id);
        if !latest.contains_key(other) {
            order.push(other);
        }
        latest.insert(other, message);
        if message.recipient_id == user_id && !message.is_read {
            *unread.entry(other).or_default() += 1;
        }
    }

    let me = lookup_user(user_id);
    let mut summaries: Vec<ConversationSummary> = order
        .into_iter()
        .map(|other| {
            let last = latest[other];
            let participants = me
                .iter()
                .cloned()
                .chain(lookup_user(other))
                .collect();
            ConversationSummary {
                id: other.to_string(),
                participants,
                last_message: Some(LastMessage {
                    content: last.content.clone(),
                    created_at: last.created_at,
                }),
                unread_count: unread.get(other).copied().unwrap_or(0),
            }
        })
        .collect();

    // Stable sort keeps first-contact order for equal timestamps
    summaries.sort_by(|a, b| {
        let a_at = a.last_message.as_ref().map(|m| m.created_at);
        let b_at = b.last_message.as_ref().map(|m| m.created_at);
        b_at.cmp(&a_at)
    });
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn message(id: &str, from: &str, to: &str, minutes: i64) -> Message {
        let base = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut new_message = NewMessage::text(to, format!("message {}", id));
        new_message.sender_id = Some(from.to_string());
        Message::from_new(
            id.to_string(),
            from.to_string(),
            new_message,
            base + Duration::minutes(minutes),
        )
    }

    fn summary(id: &str) -> Option<UserSummary> {
        Some(UserSummary {
            id: id.to_string(),
            full_name: format!("User {}", id),
            username: id.to_string(),
        })
    }

    #[test]
    fn defaults_for_new_messages() {
        let msg = message("m1", "alice", "bob", 0);
        assert_eq!(msg.message_type, "text");
        assert!(!msg.is_read);
        assert!(msg.booking_id.is_none());
    }

    #[test]
    fn filter_between_two_users_ignores_others() {
        let filter = MessageFilter::between("alice", "bob");
        assert!(message("m1", "alice", "bob", 0).matches(&filter));
        assert!(message("m2", "bob", "alice", 1).matches(&filter));
        assert!(!message("m3", "alice", "carol", 2).matches(&filter));
        assert!(!message("m4", "carol", "bob", 3).matches(&filter));
    }

    #[test]
    fn conversations_are_grouped_by_counterpart() {
        let mut from_carol = message("m4", "carol", "alice", 30);
        from_carol.is_read = true;
        let messages = vec![
            message("m1", "alice", "bob", 0),
            message("m2", "bob", "alice", 5),
            message("m3", "bob", "alice", 10),
            from_carol,
            message("m5", "dave", "erin", 40),
        ];

        let summaries = summarize_conversations("alice", &messages, summary);
        assert_eq!(summaries.len(), 2);

        assert_eq!(summaries[0].id, "carol");
        assert_eq!(summaries[0].unread_count, 0);

        let bob = &summaries[1];
        assert_eq!(bob.id, "bob");
        assert_eq!(bob.unread_count, 2);
        assert_eq!(bob.participants.len(), 2);
        assert_eq!(
            bob.last_message.as_ref().map(|m| m.content.as_str()),
            Some("message m3")
        );
    }

    #[test]
    fn unknown_users_are_left_out_of_participants() {
        let messages = vec![message("m1", "alice", "ghost", 0)];
        let summaries = summarize_conversations("alice", &messages, |id| {
            if id == "alice" { summary(id) } else { None }
        });
        assert_eq!(summaries[0].participants.len(), 1);
        assert_eq!(summaries[0].id, "ghost");
    }
}
