//! Reusable message templates; provider-owned or global defaults

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageTemplate {
    pub id: String,
    /// `None` for templates shared by every provider
    pub hairstylist_id: Option<String>,
    pub name: String,
    pub content: String,
    pub category: Option<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl MessageTemplate {
    pub fn from_new(id: String, new_template: NewMessageTemplate, now: DateTime<Utc>) -> Self {
        Self {
            id,
            hairstylist_id: new_template.hairstylist_id,
            name: new_template.name,
            content: new_template.content,
            category: new_template.category,
            is_default: new_template.is_default.unwrap_or(false),
            created_at: now,
        }
    }

    pub fn apply(&mut self, changes: UpdateMessageTemplate) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(category) = changes.category {
            self.category = Some(category);
        }
        if let Some(is_default) = changes.is_default {
            self.is_default = is_default;
        }
    }

    /// A provider sees their own templates plus every default one
    pub fn matches(&self, filter: &TemplateFilter) -> bool {
        let owner_ok = filter
            .hairstylist_id
            .as_ref()
            .is_none_or(|id| self.is_default || self.hairstylist_id.as_ref() == Some(id));
        owner_ok
            && filter
                .category
                .as_ref()
                .is_none_or(|c| self.category.as_ref() == Some(c))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewMessageTemplate {
    pub hairstylist_id: Option<String>,
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub category: Option<String>,
    pub is_default: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMessageTemplate {
    #[validate(length(min = 1, max = 120))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hairstylist_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}
