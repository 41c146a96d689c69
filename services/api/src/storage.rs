//! Storage abstraction for marketplace entities
//!
//! Handlers only see [`Storage`]; the backend is picked at startup from
//! configuration. Every operation is independent: there are no multi-call
//! transactions. An unknown id is reported as `Ok(None)` or `Ok(false)`,
//! never as an error.

use async_trait::async_trait;
use common::error::StoreResult;
use common::models::{
    Booking, BookingFilter, HairHistory, HairHistoryFilter, Job, JobFilter, Message,
    MessageFilter, MessageTemplate, NewBooking, NewHairHistory, NewJob, NewMessage,
    NewMessageTemplate, NewPortfolioImage, NewService, NewServiceCategory, NewUser,
    PortfolioFilter, PortfolioImage, Service, ServiceCategory, ServiceFilter, TemplateFilter,
    UpdateBooking, UpdateHairHistory, UpdateMessageTemplate, UpdatePortfolioImage, UpdateService,
    UpdateServiceCategory, UpdateUser, User, UserFilter,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStorage;
pub use postgres::PostgresStorage;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Whether the backend can serve requests
    async fn health_check(&self) -> StoreResult<bool> {
        Ok(true)
    }

    // Users
    /// Fails with [`common::error::StoreError::Duplicate`] when the username
    /// is taken; the check and the insert are atomic
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User>;
    async fn get_user(&self, id: &str) -> StoreResult<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    async fn list_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>>;
    async fn update_user(&self, id: &str, changes: UpdateUser) -> StoreResult<Option<User>>;
    async fn delete_user(&self, id: &str) -> StoreResult<bool>;

    // Service categories
    async fn create_category(&self, new_category: NewServiceCategory)
    -> StoreResult<ServiceCategory>;
    async fn get_category(&self, id: &str) -> StoreResult<Option<ServiceCategory>>;
    async fn list_categories(&self) -> StoreResult<Vec<ServiceCategory>>;
    async fn update_category(
        &self,
        id: &str,
        changes: UpdateServiceCategory,
    ) -> StoreResult<Option<ServiceCategory>>;
    async fn delete_category(&self, id: &str) -> StoreResult<bool>;

    // Services
    async fn create_service(&self, new_service: NewService) -> StoreResult<Service>;
    async fn get_service(&self, id: &str) -> StoreResult<Option<Service>>;
    async fn list_services(&self, filter: &ServiceFilter) -> StoreResult<Vec<Service>>;
    async fn update_service(&self, id: &str, changes: UpdateService)
    -> StoreResult<Option<Service>>;
    async fn delete_service(&self, id: &str) -> StoreResult<bool>;

    // Bookings
    /// Fails with `StoreError::MissingField` unless duration and total price are set
    async fn create_booking(&self, new_booking: NewBooking) -> StoreResult<Booking>;
    async fn get_booking(&self, id: &str) -> StoreResult<Option<Booking>>;
    async fn list_bookings(&self, filter: &BookingFilter) -> StoreResult<Vec<Booking>>;
    async fn update_booking(&self, id: &str, changes: UpdateBooking)
    -> StoreResult<Option<Booking>>;
    /// Changes only the status and `updatedAt`
    async fn update_booking_status(&self, id: &str, status: &str)
    -> StoreResult<Option<Booking>>;
    async fn delete_booking(&self, id: &str) -> StoreResult<bool>;

    // Portfolio
    async fn create_portfolio_image(
        &self,
        new_image: NewPortfolioImage,
    ) -> StoreResult<PortfolioImage>;
    async fn get_portfolio_image(&self, id: &str) -> StoreResult<Option<PortfolioImage>>;
    async fn list_portfolio_images(
        &self,
        filter: &PortfolioFilter,
    ) -> StoreResult<Vec<PortfolioImage>>;
    async fn update_portfolio_image(
        &self,
        id: &str,
        changes: UpdatePortfolioImage,
    ) -> StoreResult<Option<PortfolioImage>>;
    async fn delete_portfolio_image(&self, id: &str) -> StoreResult<bool>;

    // Messages
    async fn create_message(&self, sender_id: &str, new_message: NewMessage)
    -> StoreResult<Message>;
    async fn get_message(&self, id: &str) -> StoreResult<Option<Message>>;
    /// Ascending creation order
    async fn list_messages(&self, filter: &MessageFilter) -> StoreResult<Vec<Message>>;
    /// Idempotent; a read message stays read
    async fn mark_message_read(&self, id: &str) -> StoreResult<Option<Message>>;
    /// Mark every message from `other_user_id` to `user_id` read; returns how many changed
    async fn mark_conversation_read(&self, user_id: &str, other_user_id: &str)
    -> StoreResult<u64>;
    async fn delete_message(&self, id: &str) -> StoreResult<bool>;

    // Message templates
    async fn create_template(&self, new_template: NewMessageTemplate)
    -> StoreResult<MessageTemplate>;
    async fn get_template(&self, id: &str) -> StoreResult<Option<MessageTemplate>>;
    async fn list_templates(&self, filter: &TemplateFilter) -> StoreResult<Vec<MessageTemplate>>;
    async fn update_template(
        &self,
        id: &str,
        changes: UpdateMessageTemplate,
    ) -> StoreResult<Option<MessageTemplate>>;
    async fn delete_template(&self, id: &str) -> StoreResult<bool>;

    // Hair history
    async fn create_hair_history(&self, new_entry: NewHairHistory) -> StoreResult<HairHistory>;
    async fn get_hair_history(&self, id: &str) -> StoreResult<Option<HairHistory>>;
    async fn list_hair_history(&self, filter: &HairHistoryFilter)
    -> StoreResult<Vec<HairHistory>>;
    async fn update_hair_history(
        &self,
        id: &str,
        changes: UpdateHairHistory,
    ) -> StoreResult<Option<HairHistory>>;
    async fn delete_hair_history(&self, id: &str) -> StoreResult<bool>;

    // Jobs
    async fn create_job(&self, poster_id: &str, new_job: NewJob) -> StoreResult<Job>;
    async fn get_job(&self, id: &str) -> StoreResult<Option<Job>>;
    async fn list_jobs(&self, filter: &JobFilter) -> StoreResult<Vec<Job>>;
    async fn update_job_status(&self, id: &str, status: &str) -> StoreResult<Option<Job>>;
    async fn delete_job(&self, id: &str) -> StoreResult<bool>;
}
