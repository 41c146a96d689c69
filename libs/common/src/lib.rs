//! Common library for the marketplace services
//!
//! Holds the contract types exchanged between the API server and its client,
//! the shared validation rules, and the PostgreSQL and Redis helpers used by
//! the storage and session backends.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, init_pool, health_check};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config).await?;
//!     let is_healthy = health_check(&pool).await?;
//!     println!("Database health check: {}", is_healthy);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod database;
pub mod error;
pub mod models;
pub mod validation;

/// Version of the JSON contract served by the API
pub const API_VERSION: &str = "1";

/// Response header carrying [`API_VERSION`]
pub const API_VERSION_HEADER: &str = "x-api-version";
