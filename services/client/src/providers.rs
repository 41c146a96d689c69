//! Provider search

use chrono::{DateTime, Utc};
use common::models::{ProviderFilter, PublicUser, Role, ServiceProvider};
use tracing::info;

use crate::{
    error::ClientResult,
    http::{ApiClient, ApiRequest},
};

/// Search outcome; `Fallback` means the API found nobody and the canned
/// showcase list is returned instead
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResults {
    Live(Vec<ServiceProvider>),
    Fallback(Vec<ServiceProvider>),
}

impl ProviderResults {
    pub fn providers(&self) -> &[ServiceProvider] {
        match self {
            ProviderResults::Live(providers) | ProviderResults::Fallback(providers) => providers,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ProviderResults::Fallback(_))
    }
}

fn showcase(id: &str, name: &str, role: Role, bio: &str, city: &str, state: &str) -> ServiceProvider {
    let user = PublicUser {
        id: id.to_string(),
        username: id.to_string(),
        email: format!("{}@example.com", id),
        full_name: name.to_string(),
        role,
        profile_image: None,
        bio: Some(bio.to_string()),
        location: Some(format!("{}, {}", city, state)),
        city: Some(city.to_string()),
        state: Some(state.to_string()),
        created_at: DateTime::<Utc>::default(),
    };
    ServiceProvider::new(user, Vec::new(), Vec::new())
}

/// Providers shown when a search comes back empty
pub fn fallback_providers() -> Vec<ServiceProvider> {
    vec![
        showcase(
            "fallback-glamour-studio",
            "Glamour Studio",
            Role::Hairstylist,
            "Full-service salon for cuts, color and special occasion styling",
            "Los Angeles",
            "CA",
        ),
        showcase(
            "fallback-elite-cuts",
            "Elite Cuts",
            Role::Barber,
            "Classic and modern barbering, fades and beard trims",
            "New York",
            "NY",
        ),
    ]
}

impl ApiClient {
    pub async fn search_providers(&self, filter: &ProviderFilter) -> ClientResult<ProviderResults> {
        let providers: Vec<ServiceProvider> = self
            .fetch(ApiRequest::get("/api/service-providers").query(filter)?)
            .await?;

        if providers.is_empty() {
            info!("No providers matched, returning showcase list");
            return Ok(ProviderResults::Fallback(fallback_providers()));
        }
        Ok(ProviderResults::Live(providers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_list() {
        let results = ProviderResults::Fallback(fallback_providers());
        assert!(results.is_fallback());
        let names: Vec<&str> = results.providers().iter().map(|p| p.business_name()).collect();
        assert_eq!(names, vec!["Glamour Studio", "Elite Cuts"]);
        assert!(results.providers().iter().all(|p| p.user.role.is_provider()));
    }
}
