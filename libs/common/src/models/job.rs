//! Jobs posted by clients for providers to pick up

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::money;
use crate::models::user::UserSummary;
use crate::validation::validate_non_negative;

pub mod status {
    pub const OPEN: &str = "open";
    pub const CLOSED: &str = "closed";
}

/// Job entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub poster_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub city: String,
    pub state: String,
    pub budget_min: Option<Decimal>,
    pub budget_max: Option<Decimal>,
    pub urgency: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn from_new(id: String, poster_id: String, new_job: NewJob, now: DateTime<Utc>) -> Self {
        Self {
            id,
            poster_id,
            title: new_job.title,
            description: new_job.description,
            category: new_job.category,
            city: new_job.city,
            state: new_job.state,
            budget_min: new_job.budget_min.map(money),
            budget_max: new_job.budget_max.map(money),
            urgency: new_job.urgency,
            status: status::OPEN.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_status(&mut self, status: String, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }

    pub fn matches(&self, filter: &JobFilter) -> bool {
        filter.status.as_ref().is_none_or(|s| &self.status == s)
            && filter
                .category
                .as_ref()
                .is_none_or(|c| self.category.eq_ignore_ascii_case(c))
            && filter
                .city
                .as_ref()
                .is_none_or(|c| self.city.eq_ignore_ascii_case(c))
            && filter
                .state
                .as_ref()
                .is_none_or(|s| self.state.eq_ignore_ascii_case(s))
            && filter
                .poster_id
                .as_ref()
                .is_none_or(|id| &self.poster_id == id)
    }
}

/// New job payload; the poster is the signed-in user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_budget_range", skip_on_field_errors = true))]
pub struct NewJob {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "State is required"))]
    pub state: String,
    #[validate(custom(function = "validate_non_negative"))]
    pub budget_min: Option<Decimal>,
    #[validate(custom(function = "validate_non_negative"))]
    pub budget_max: Option<Decimal>,
    pub urgency: Option<String>,
}

fn validate_budget_range(job: &NewJob) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (job.budget_min, job.budget_max) {
        if min > max {
            return Err(ValidationError::new("budget_range")
                .with_message("budgetMin must not exceed budgetMax".into()));
        }
    }
    Ok(())
}

/// Query filters for job listings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_id: Option<String>,
}

/// Job as returned by the API, with the poster embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    #[serde(flatten)]
    pub job: Job,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<UserSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn new_job() -> NewJob {
        NewJob {
            title: "Bridal updo".to_string(),
            description: "Updo for a June wedding".to_string(),
            category: "styling".to_string(),
            city: "Austin".to_string(),
            state: "TX".to_string(),
            budget_min: Some(Decimal::from_str("80").unwrap()),
            budget_max: Some(Decimal::from_str("150").unwrap()),
            urgency: Some("this_week".to_string()),
        }
    }

    #[test]
    fn jobs_open_on_creation() {
        let job = Job::from_new("j1".to_string(), "client-1".to_string(), new_job(), Utc::now());
        assert_eq!(job.status, status::OPEN);
        let open = JobFilter {
            status: Some("open".to_string()),
            ..Default::default()
        };
        assert!(job.matches(&open));
    }

    #[test]
    fn closing_a_job_drops_it_from_open_listing() {
        let mut job = Job::from_new("j1".to_string(), "client-1".to_string(), new_job(), Utc::now());
        job.set_status(status::CLOSED.to_string(), Utc::now());
        let open = JobFilter {
            status: Some(status::OPEN.to_string()),
            ..Default::default()
        };
        assert!(!job.matches(&open));
    }

    #[test]
    fn inverted_budget_is_rejected() {
        let mut payload = new_job();
        payload.budget_min = Some(Decimal::from_str("200").unwrap());
        assert!(payload.validate().is_err());
        payload.budget_max = None;
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn view_flattens_job_fields() {
        let job = Job::from_new("j1".to_string(), "client-1".to_string(), new_job(), Utc::now());
        let view = JobView {
            job,
            poster: Some(UserSummary {
                id: "client-1".to_string(),
                full_name: "Jane Doe".to_string(),
                username: "jane".to_string(),
            }),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["title"], "Bridal updo");
        assert_eq!(json["budgetMin"], "80.00");
        assert_eq!(json["poster"]["fullName"], "Jane Doe");
    }
}
