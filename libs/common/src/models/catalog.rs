//! Service categories and the services providers offer

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::money;
use crate::validation::validate_non_negative;

/// Service category entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCategory {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl ServiceCategory {
    pub fn from_new(id: String, new_category: NewServiceCategory) -> Self {
        Self {
            id,
            name: new_category.name,
            description: new_category.description,
            icon: new_category.icon,
            color: new_category.color,
        }
    }

    pub fn apply(&mut self, changes: UpdateServiceCategory) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        if let Some(icon) = changes.icon {
            self.icon = Some(icon);
        }
        if let Some(color) = changes.color {
            self.color = Some(color);
        }
    }
}

/// New category payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewServiceCategory {
    #[validate(length(min = 1, max = 80, message = "Name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// Category update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceCategory {
    #[validate(length(min = 1, max = 80))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A service offered by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub hairstylist_id: String,
    pub category_id: String,
    pub name: String,
    pub description: Option<String>,
    pub base_price: Decimal,
    /// Minutes
    pub duration: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Service {
    pub fn from_new(id: String, new_service: NewService, now: DateTime<Utc>) -> Self {
        Self {
            id,
            hairstylist_id: new_service.hairstylist_id,
            category_id: new_service.category_id,
            name: new_service.name,
            description: new_service.description,
            base_price: money(new_service.base_price),
            duration: new_service.duration,
            is_active: new_service.is_active.unwrap_or(true),
            created_at: now,
        }
    }

    pub fn apply(&mut self, changes: UpdateService) {
        if let Some(hairstylist_id) = changes.hairstylist_id {
            self.hairstylist_id = hairstylist_id;
        }
        if let Some(category_id) = changes.category_id {
            self.category_id = category_id;
        }
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        if let Some(base_price) = changes.base_price {
            self.base_price = money(base_price);
        }
        if let Some(duration) = changes.duration {
            self.duration = duration;
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
    }

    pub fn matches(&self, filter: &ServiceFilter) -> bool {
        filter
            .hairstylist_id
            .as_ref()
            .is_none_or(|id| &self.hairstylist_id == id)
            && filter
                .category_id
                .as_ref()
                .is_none_or(|id| &self.category_id == id)
            && filter.is_active.is_none_or(|active| self.is_active == active)
    }
}

/// New service payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewService {
    #[validate(length(min = 1, message = "hairstylistId is required"))]
    pub hairstylist_id: String,
    #[validate(length(min = 1, message = "categoryId is required"))]
    pub category_id: String,
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom(function = "validate_non_negative"))]
    pub base_price: Decimal,
    #[validate(range(min = 1, max = 1440, message = "Duration must be between 1 and 1440 minutes"))]
    pub duration: i32,
    pub is_active: Option<bool>,
}

/// Service update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateService {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hairstylist_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[validate(length(min = 1, max = 120))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(custom(function = "validate_non_negative"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_price: Option<Decimal>,
    #[validate(range(min = 1, max = 1440))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Query filters for service listings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hairstylist_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
