//! Contract types shared by the API server and its client

pub mod booking;
pub mod catalog;
pub mod hair_history;
pub mod job;
pub mod message;
pub mod portfolio;
pub mod provider;
pub mod template;
pub mod user;

pub use booking::{Booking, BookingFilter, NewBooking, StatusUpdate, UpdateBooking};
pub use catalog::{
    NewService, NewServiceCategory, Service, ServiceCategory, ServiceFilter, UpdateService,
    UpdateServiceCategory,
};
pub use hair_history::{HairHistory, HairHistoryFilter, NewHairHistory, UpdateHairHistory};
pub use job::{Job, JobFilter, JobView, NewJob};
pub use message::{
    ConversationSummary, LastMessage, Message, MessageFilter, NewMessage,
    summarize_conversations,
};
pub use portfolio::{NewPortfolioImage, PortfolioFilter, PortfolioImage, UpdatePortfolioImage};
pub use provider::{ProviderFilter, ServiceProvider};
pub use template::{MessageTemplate, NewMessageTemplate, TemplateFilter, UpdateMessageTemplate};
pub use user::{
    LoginRequest, NewUser, PublicUser, RegisterRequest, Role, UpdateUser, User, UserFilter,
    UserSummary,
};

use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;

/// Generate a fresh entity id
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current timestamp, truncated to microseconds so values survive a
/// round-trip through PostgreSQL unchanged
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Money amounts are kept with two decimal places
pub fn money(mut amount: Decimal) -> Decimal {
    amount.rescale(2);
    amount
}
