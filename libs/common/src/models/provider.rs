//! Provider search results

use serde::{Deserialize, Serialize};

use crate::models::catalog::Service;
use crate::models::portfolio::PortfolioImage;
use crate::models::user::{PublicUser, Role};

/// Number of portfolio images attached to each search result
pub const PORTFOLIO_PREVIEW_LEN: usize = 3;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// A provider with the services they offer and a few portfolio samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProvider {
    #[serde(flatten)]
    pub user: PublicUser,
    pub services: Vec<Service>,
    pub portfolio_preview: Vec<PortfolioImage>,
}

impl ServiceProvider {
    pub fn new(user: PublicUser, services: Vec<Service>, mut portfolio: Vec<PortfolioImage>) -> Self {
        portfolio.truncate(PORTFOLIO_PREVIEW_LEN);
        Self {
            user,
            services,
            portfolio_preview: portfolio,
        }
    }

    /// Display name: full name, or the username when no name is set
    pub fn business_name(&self) -> &str {
        if self.user.full_name.trim().is_empty() {
            &self.user.username
        } else {
            &self.user.full_name
        }
    }
}
