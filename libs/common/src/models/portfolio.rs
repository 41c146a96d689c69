//! Before/after work samples showcased on provider profiles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioImage {
    pub id: String,
    pub hairstylist_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub before_image: Option<String>,
    pub after_image: String,
    pub service_id: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl PortfolioImage {
    pub fn from_new(id: String, new_image: NewPortfolioImage, now: DateTime<Utc>) -> Self {
        Self {
            id,
            hairstylist_id: new_image.hairstylist_id,
            title: new_image.title,
            description: new_image.description,
            before_image: new_image.before_image,
            after_image: new_image.after_image,
            service_id: new_image.service_id,
            tags: new_image.tags,
            created_at: now,
        }
    }

    pub fn apply(&mut self, changes: UpdatePortfolioImage) {
        if let Some(title) = changes.title {
            self.title = Some(title);
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        if let Some(before_image) = changes.before_image {
            self.before_image = Some(before_image);
        }
        if let Some(after_image) = changes.after_image {
            self.after_image = after_image;
        }
        if let Some(service_id) = changes.service_id {
            self.service_id = Some(service_id);
        }
        if let Some(tags) = changes.tags {
            self.tags = tags;
        }
    }

    pub fn matches(&self, filter: &PortfolioFilter) -> bool {
        filter
            .hairstylist_id
            .as_ref()
            .is_none_or(|id| &self.hairstylist_id == id)
            && filter
                .service_id
                .as_ref()
                .is_none_or(|id| self.service_id.as_ref() == Some(id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolioImage {
    #[validate(length(min = 1, message = "hairstylistId is required"))]
    pub hairstylist_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub before_image: Option<String>,
    #[validate(length(min = 1, message = "afterImage is required"))]
    pub after_image: String,
    pub service_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePortfolioImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before_image: Option<String>,
    #[validate(length(min = 1))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hairstylist_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_default_to_empty() {
        let new_image: NewPortfolioImage = serde_json::from_value(serde_json::json!({
            "hairstylistId": "stylist-1",
            "afterImage": "https://cdn.example.com/after.jpg"
        }))
        .unwrap();
        let image = PortfolioImage::from_new("p1".to_string(), new_image, Utc::now());
        assert!(image.tags.is_empty());
        assert!(image.before_image.is_none());
        assert!(image.matches(&PortfolioFilter {
            hairstylist_id: Some("stylist-1".to_string()),
            ..Default::default()
        }));
    }

    #[test]
    fn service_filter_skips_unlinked_images() {
        let image = PortfolioImage::from_new(
            "p1".to_string(),
            NewPortfolioImage {
                hairstylist_id: "stylist-1".to_string(),
                title: Some("Copper balayage".to_string()),
                description: None,
                before_image: None,
                after_image: "https://cdn.example.com/after.jpg".to_string(),
                service_id: None,
                tags: vec!["color".to_string()],
            },
            Utc::now(),
        );
        let filter = PortfolioFilter {
            service_id: Some("svc-1".to_string()),
            ..Default::default()
        };
        assert!(!image.matches(&filter));
    }
}
