//! Typed HTTP client for the marketplace API
//!
//! ```rust,no_run
//! use client::{ApiClient, ClientConfig};
//! use common::models::JobFilter;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(&ClientConfig::from_env()?)?;
//!     client.login("jane", "password123").await?;
//!     for view in client.list_jobs(&JobFilter::default()).await? {
//!         println!("{} ({})", view.job.title, view.job.city);
//!     }
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod bookings;
pub mod config;
pub mod error;
pub mod http;
pub mod jobs;
pub mod messages;
pub mod providers;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{ApiClient, ApiRequest, RequestBody};
pub use providers::{ProviderResults, fallback_providers};
