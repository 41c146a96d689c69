//! Client hair history records kept by providers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HairHistory {
    pub id: String,
    pub client_id: String,
    pub booking_id: Option<String>,
    pub hair_type: Option<String>,
    pub hair_length: Option<String>,
    pub hair_color: Option<String>,
    pub previous_treatments: Vec<String>,
    pub allergies: Option<String>,
    pub preferences: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl HairHistory {
    pub fn from_new(id: String, new_entry: NewHairHistory, now: DateTime<Utc>) -> Self {
        Self {
            id,
            client_id: new_entry.client_id,
            booking_id: new_entry.booking_id,
            hair_type: new_entry.hair_type,
            hair_length: new_entry.hair_length,
            hair_color: new_entry.hair_color,
            previous_treatments: new_entry.previous_treatments,
            allergies: new_entry.allergies,
            preferences: new_entry.preferences,
            notes: new_entry.notes,
            created_at: now,
        }
    }

    pub fn apply(&mut self, changes: UpdateHairHistory) {
        if let Some(booking_id) = changes.booking_id {
            self.booking_id = Some(booking_id);
        }
        if let Some(hair_type) = changes.hair_type {
            self.hair_type = Some(hair_type);
        }
        if let Some(hair_length) = changes.hair_length {
            self.hair_length = Some(hair_length);
        }
        if let Some(hair_color) = changes.hair_color {
            self.hair_color = Some(hair_color);
        }
        if let Some(previous_treatments) = changes.previous_treatments {
            self.previous_treatments = previous_treatments;
        }
        if let Some(allergies) = changes.allergies {
            self.allergies = Some(allergies);
        }
        if let Some(preferences) = changes.preferences {
            self.preferences = Some(preferences);
        }
        if let Some(notes) = changes.notes {
            self.notes = Some(notes);
        }
    }

    pub fn matches(&self, filter: &HairHistoryFilter) -> bool {
        filter
            .client_id
            .as_ref()
            .is_none_or(|id| &self.client_id == id)
            && filter
                .booking_id
                .as_ref()
                .is_none_or(|id| self.booking_id.as_ref() == Some(id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewHairHistory {
    #[validate(length(min = 1, message = "clientId is required"))]
    pub client_id: String,
    pub booking_id: Option<String>,
    pub hair_type: Option<String>,
    pub hair_length: Option<String>,
    pub hair_color: Option<String>,
    #[serde(default)]
    pub previous_treatments: Vec<String>,
    pub allergies: Option<String>,
    pub preferences: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHairHistory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hair_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hair_length: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hair_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_treatments: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HairHistoryFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
}
