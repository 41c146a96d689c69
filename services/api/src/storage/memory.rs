//! In-memory storage backend
//!
//! Each collection is a vector in creation order behind one async lock, so a
//! single call is atomic with respect to every other call. Lookups are linear
//! scans. Everything is lost when the process exits.

use async_trait::async_trait;
use common::error::{StoreError, StoreResult};
use common::models::{
    self, Booking, BookingFilter, HairHistory, HairHistoryFilter, Job, JobFilter, Message,
    MessageFilter, MessageTemplate, NewBooking, NewHairHistory, NewJob, NewMessage,
    NewMessageTemplate, NewPortfolioImage, NewService, NewServiceCategory, NewUser,
    PortfolioFilter, PortfolioImage, Service, ServiceCategory, ServiceFilter, TemplateFilter,
    UpdateBooking, UpdateHairHistory, UpdateMessageTemplate, UpdatePortfolioImage, UpdateService,
    UpdateServiceCategory, UpdateUser, User, UserFilter,
};
use tokio::sync::RwLock;

use super::Storage;

trait Keyed {
    fn key(&self) -> &str;
}

macro_rules! keyed {
    ($($entity:ty),* $(,)?) => {
        $(impl Keyed for $entity {
            fn key(&self) -> &str {
                &self.id
            }
        })*
    };
}

keyed!(
    User,
    ServiceCategory,
    Service,
    Booking,
    PortfolioImage,
    Message,
    MessageTemplate,
    HairHistory,
    Job,
);

fn find<'a, T: Keyed>(rows: &'a [T], id: &str) -> Option<&'a T> {
    rows.iter().find(|row| row.key() == id)
}

fn find_mut<'a, T: Keyed>(rows: &'a mut [T], id: &str) -> Option<&'a mut T> {
    rows.iter_mut().find(|row| row.key() == id)
}

fn remove<T: Keyed>(rows: &mut Vec<T>, id: &str) -> bool {
    match rows.iter().position(|row| row.key() == id) {
        Some(index) => {
            rows.remove(index);
            true
        }
        None => false,
    }
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    categories: Vec<ServiceCategory>,
    services: Vec<Service>,
    bookings: Vec<Booking>,
    portfolio: Vec<PortfolioImage>,
    messages: Vec<Message>,
    templates: Vec<MessageTemplate>,
    hair_history: Vec<HairHistory>,
    jobs: Vec<Job>,
}

/// Storage backed by process memory
#[derive(Default)]
pub struct MemoryStorage {
    tables: RwLock<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == new_user.username) {
            return Err(StoreError::Duplicate {
                entity: "User",
                field: "username",
            });
        }
        let user = User::from_new(models::new_id(), new_user, models::now());
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: &str) -> StoreResult<Option<User>> {
        Ok(find(&self.tables.read().await.users, id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn list_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .filter(|user| user.matches(filter))
            .cloned()
            .collect())
    }

    async fn update_user(&self, id: &str, changes: UpdateUser) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(find_mut(&mut tables.users, id).map(|user| {
            user.apply(changes);
            user.clone()
        }))
    }

    async fn delete_user(&self, id: &str) -> StoreResult<bool> {
        Ok(remove(&mut self.tables.write().await.users, id))
    }

    async fn create_category(
        &self,
        new_category: NewServiceCategory,
    ) -> StoreResult<ServiceCategory> {
        let category = ServiceCategory::from_new(models::new_id(), new_category);
        self.tables.write().await.categories.push(category.clone());
        Ok(category)
    }

    async fn get_category(&self, id: &str) -> StoreResult<Option<ServiceCategory>> {
        Ok(find(&self.tables.read().await.categories, id).cloned())
    }

    async fn list_categories(&self) -> StoreResult<Vec<ServiceCategory>> {
        Ok(self.tables.read().await.categories.clone())
    }

    async fn update_category(
        &self,
        id: &str,
        changes: UpdateServiceCategory,
    ) -> StoreResult<Option<ServiceCategory>> {
        let mut tables = self.tables.write().await;
        Ok(find_mut(&mut tables.categories, id).map(|category| {
            category.apply(changes);
            category.clone()
        }))
    }

    async fn delete_category(&self, id: &str) -> StoreResult<bool> {
        Ok(remove(&mut self.tables.write().await.categories, id))
    }

    async fn create_service(&self, new_service: NewService) -> StoreResult<Service> {
        let service = Service::from_new(models::new_id(), new_service, models::now());
        self.tables.write().await.services.push(service.clone());
        Ok(service)
    }

    async fn get_service(&self, id: &str) -> StoreResult<Option<Service>> {
        Ok(find(&self.tables.read().await.services, id).cloned())
    }

    async fn list_services(&self, filter: &ServiceFilter) -> StoreResult<Vec<Service>> {
        let tables = self.tables.read().await;
        Ok(tables
            .services
            .iter()
            .filter(|service| service.matches(filter))
            .cloned()
            .collect())
    }

    async fn update_service(
        &self,
        id: &str,
        changes: UpdateService,
    ) -> StoreResult<Option<Service>> {
        let mut tables = self.tables.write().await;
        Ok(find_mut(&mut tables.services, id).map(|service| {
            service.apply(changes);
            service.clone()
        }))
    }

    async fn delete_service(&self, id: &str) -> StoreResult<bool> {
        Ok(remove(&mut self.tables.write().await.services, id))
    }

    async fn create_booking(&self, new_booking: NewBooking) -> StoreResult<Booking> {
        let booking = Booking::from_new(models::new_id(), new_booking, models::now())?;
        self.tables.write().await.bookings.push(booking.clone());
        Ok(booking)
    }

    async fn get_booking(&self, id: &str) -> StoreResult<Option<Booking>> {
        Ok(find(&self.tables.read().await.bookings, id).cloned())
    }

    async fn list_bookings(&self, filter: &BookingFilter) -> StoreResult<Vec<Booking>> {
        let tables = self.tables.read().await;
        Ok(tables
            .bookings
            .iter()
            .filter(|booking| booking.matches(filter))
            .cloned()
            .collect())
    }

    async fn update_booking(
        &self,
        id: &str,
        changes: UpdateBooking,
    ) -> StoreResult<Option<Booking>> {
        let mut tables = self.tables.write().await;
        Ok(find_mut(&mut tables.bookings, id).map(|booking| {
            booking.apply(changes, models::now());
            booking.clone()
        }))
    }

    async fn update_booking_status(
        &self,
        id: &str,
        status: &str,
    ) -> StoreResult<Option<Booking>> {
        let mut tables = self.tables.write().await;
        Ok(find_mut(&mut tables.bookings, id).map(|booking| {
            booking.set_status(status.to_string(), models::now());
            booking.clone()
        }))
    }

    async fn delete_booking(&self, id: &str) -> StoreResult<bool> {
        Ok(remove(&mut self.tables.write().await.bookings, id))
    }

    async fn create_portfolio_image(
        &self,
        new_image: NewPortfolioImage,
    ) -> StoreResult<PortfolioImage> {
        let image = PortfolioImage::from_new(models::new_id(), new_image, models::now());
        self.tables.write().await.portfolio.push(image.clone());
        Ok(image)
    }

    async fn get_portfolio_image(&self, id: &str) -> StoreResult<Option<PortfolioImage>> {
        Ok(find(&self.tables.read().await.portfolio, id).cloned())
    }

    async fn list_portfolio_images(
        &self,
        filter: &PortfolioFilter,
    ) -> StoreResult<Vec<PortfolioImage>> {
        let tables = self.tables.read().await;
        Ok(tables
            .portfolio
            .iter()
            .filter(|image| image.matches(filter))
            .cloned()
            .collect())
    }

    async fn update_portfolio_image(
        &self,
        id: &str,
        changes: UpdatePortfolioImage,
    ) -> StoreResult<Option<PortfolioImage>> {
        let mut tables = self.tables.write().await;
        Ok(find_mut(&mut tables.portfolio, id).map(|image| {
            image.apply(changes);
            image.clone()
        }))
    }

    async fn delete_portfolio_image(&self, id: &str) -> StoreResult<bool> {
        Ok(remove(&mut self.tables.write().await.portfolio, id))
    }

    async fn create_message(
        &self,
        sender_id: &str,
        new_message: NewMessage,
    ) -> StoreResult<Message> {
        let message = Message::from_new(
            models::new_id(),
            sender_id.to_string(),
            new_message,
            models::now(),
        );
        self.tables.write().await.messages.push(message.clone());
        Ok(message)
    }

    async fn get_message(&self, id: &str) -> StoreResult<Option<Message>> {
        Ok(find(&self.tables.read().await.messages, id).cloned())
    }

    async fn list_messages(&self, filter: &MessageFilter) -> StoreResult<Vec<Message>> {
        let tables = self.tables.read().await;
        Ok(tables
            .messages
            .iter()
            .filter(|message| message.matches(filter))
            .cloned()
            .collect())
    }

    async fn mark_message_read(&self, id: &str) -> StoreResult<Option<Message>> {
        let mut tables = self.tables.write().await;
        Ok(find_mut(&mut tables.messages, id).map(|message| {
            message.is_read = true;
            message.clone()
        }))
    }

    async fn mark_conversation_read(
        &self,
        user_id: &str,
        other_user_id: &str,
    ) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let mut changed = 0;
        for message in tables.messages.iter_mut().filter(|m| {
            m.recipient_id == user_id && m.sender_id == other_user_id && !m.is_read
        }) {
            message.is_read = true;
            changed += 1;
        }
        Ok(changed)
    }

    async fn delete_message(&self, id: &str) -> StoreResult<bool> {
        Ok(remove(&mut self.tables.write().await.messages, id))
    }

    async fn create_template(
        &self,
        new_template: NewMessageTemplate,
    ) -> StoreResult<MessageTemplate> {
        let template = MessageTemplate::from_new(models::new_id(), new_template, models::now());
        self.tables.write().await.templates.push(template.clone());
        Ok(template)
    }

    async fn get_template(&self, id: &str) -> StoreResult<Option<MessageTemplate>> {
        Ok(find(&self.tables.read().await.templates, id).cloned())
    }

    async fn list_templates(&self, filter: &TemplateFilter) -> StoreResult<Vec<MessageTemplate>> {
        let tables = self.tables.read().await;
        Ok(tables
            .templates
            .iter()
            .filter(|template| template.matches(filter))
            .cloned()
            .collect())
    }

    async fn update_template(
        &self,
        id: &str,
        changes: UpdateMessageTemplate,
    ) -> StoreResult<Option<MessageTemplate>> {
        let mut tables = self.tables.write().await;
        Ok(find_mut(&mut tables.templates, id).map(|template| {
            template.apply(changes);
            template.clone()
        }))
    }

    async fn delete_template(&self, id: &str) -> StoreResult<bool> {
        Ok(remove(&mut self.tables.write().await.templates, id))
    }

    async fn create_hair_history(&self, new_entry: NewHairHistory) -> StoreResult<HairHistory> {
        let entry = HairHistory::from_new(models::new_id(), new_entry, models::now());
        self.tables.write().await.hair_history.push(entry.clone());
        Ok(entry)
    }

    async fn get_hair_history(&self, id: &str) -> StoreResult<Option<HairHistory>> {
        Ok(find(&self.tables.read().await.hair_history, id).cloned())
    }

    async fn list_hair_history(
        &self,
        filter: &HairHistoryFilter,
    ) -> StoreResult<Vec<HairHistory>> {
        let tables = self.tables.read().await;
        Ok(tables
            .hair_history
            .iter()
            .filter(|entry| entry.matches(filter))
            .cloned()
            .collect())
    }

    async fn update_hair_history(
        &self,
        id: &str,
        changes: UpdateHairHistory,
    ) -> StoreResult<Option<HairHistory>> {
        let mut tables = self.tables.write().await;
        Ok(find_mut(&mut tables.hair_history, id).map(|entry| {
            entry.apply(changes);
            entry.clone()
        }))
    }

    async fn delete_hair_history(&self, id: &str) -> StoreResult<bool> {
        Ok(remove(&mut self.tables.write().await.hair_history, id))
    }

    async fn create_job(&self, poster_id: &str, new_job: NewJob) -> StoreResult<Job> {
        let job = Job::from_new(
            models::new_id(),
            poster_id.to_string(),
            new_job,
            models::now(),
        );
        self.tables.write().await.jobs.push(job.clone());
        Ok(job)
    }

    async fn get_job(&self, id: &str) -> StoreResult<Option<Job>> {
        Ok(find(&self.tables.read().await.jobs, id).cloned())
    }

    async fn list_jobs(&self, filter: &JobFilter) -> StoreResult<Vec<Job>> {
        let tables = self.tables.read().await;
        Ok(tables
            .jobs
            .iter()
            .filter(|job| job.matches(filter))
            .cloned()
            .collect())
    }

    async fn update_job_status(&self, id: &str, status: &str) -> StoreResult<Option<Job>> {
        let mut tables = self.tables.write().await;
        Ok(find_mut(&mut tables.jobs, id).map(|job| {
            job.set_status(status.to_string(), models::now());
            job.clone()
        }))
    }

    async fn delete_job(&self, id: &str) -> StoreResult<bool> {
        Ok(remove(&mut self.tables.write().await.jobs, id))
    }
}
