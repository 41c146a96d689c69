//! PostgreSQL storage backend
//!
//! Records are built with the same model constructors as the in-memory
//! backend and written whole. Partial updates lock the row, merge the changes
//! in Rust and write the row back inside one transaction.

use async_trait::async_trait;
use common::error::{StoreError, StoreResult};
use common::models::{
    self, Booking, BookingFilter, HairHistory, HairHistoryFilter, Job, JobFilter, Message,
    MessageFilter, MessageTemplate, NewBooking, NewHairHistory, NewJob, NewMessage,
    NewMessageTemplate, NewPortfolioImage, NewService, NewServiceCategory, NewUser,
    PortfolioFilter, PortfolioImage, Role, Service, ServiceCategory, ServiceFilter,
    TemplateFilter, UpdateBooking, UpdateHairHistory, UpdateMessageTemplate, UpdatePortfolioImage,
    UpdateService, UpdateServiceCategory, UpdateUser, User, UserFilter,
};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::info;

use super::Storage;

const USER_COLUMNS: &str = "id, username, password_hash, email, full_name, role, profile_image, \
     bio, location, city, state, created_at";
const CATEGORY_COLUMNS: &str = "id, name, description, icon, color";
const SERVICE_COLUMNS: &str = "id, hairstylist_id, category_id, name, description, base_price, \
     duration, is_active, created_at";
const BOOKING_COLUMNS: &str = "id, client_id, hairstylist_id, service_id, appointment_date, \
     duration, status, total_price, notes, created_at, updated_at";
const PORTFOLIO_COLUMNS: &str = "id, hairstylist_id, title, description, before_image, \
     after_image, service_id, tags, created_at";
const MESSAGE_COLUMNS: &str = "id, sender_id, recipient_id, booking_id, content, message_type, \
     template_id, is_read, created_at";
const TEMPLATE_COLUMNS: &str = "id, hairstylist_id, name, content, category, is_default, created_at";
const HAIR_HISTORY_COLUMNS: &str = "id, client_id, booking_id, hair_type, hair_length, \
     hair_color, previous_treatments, allergies, preferences, notes, created_at";
const JOB_COLUMNS: &str = "id, poster_id, title, description, category, city, state, \
     budget_min, budget_max, urgency, status, created_at, updated_at";

/// Storage backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the embedded migrations
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(format!("migration failed: {}", e)))?;
        info!("Database migrations applied");
        Ok(())
    }

    async fn delete_by_id(&self, table: &str, id: &str) -> StoreResult<bool> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", table))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn lock_row(
        tx: &mut Transaction<'_, Postgres>,
        table: &str,
        columns: &str,
        id: &str,
    ) -> StoreResult<Option<PgRow>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM {} WHERE id = $1 FOR UPDATE",
            columns, table
        ))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(row)
    }
}

fn map_user(row: &PgRow) -> StoreResult<User> {
    let role: String = row.try_get("role")?;
    let role = role
        .parse::<Role>()
        .map_err(|reason| StoreError::Corrupt {
            entity: "users",
            reason,
        })?;

    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        email: row.try_get("email")?,
        full_name: row.try_get("full_name")?,
        role,
        profile_image: row.try_get("profile_image")?,
        bio: row.try_get("bio")?,
        location: row.try_get("location")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        created_at: row.try_get("created_at")?,
    })
}

fn map_category(row: &PgRow) -> StoreResult<ServiceCategory> {
    Ok(ServiceCategory {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        icon: row.try_get("icon")?,
        color: row.try_get("color")?,
    })
}

fn map_service(row: &PgRow) -> StoreResult<Service> {
    Ok(Service {
        id: row.try_get("id")?,
        hairstylist_id: row.try_get("hairstylist_id")?,
        category_id: row.try_get("category_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        base_price: row.try_get("base_price")?,
        duration: row.try_get("duration")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
    })
}

fn map_booking(row: &PgRow) -> StoreResult<Booking> {
    Ok(Booking {
        id: row.try_get("id")?,
        client_id: row.try_get("client_id")?,
        hairstylist_id: row.try_get("hairstylist_id")?,
        service_id: row.try_get("service_id")?,
        appointment_date: row.try_get("appointment_date")?,
        duration: row.try_get("duration")?,
        status: row.try_get("status")?,
        total_price: row.try_get("total_price")?,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn map_portfolio_image(row: &PgRow) -> StoreResult<PortfolioImage> {
    let Json(tags): Json<Vec<String>> = row.try_get("tags")?;
    Ok(PortfolioImage {
        id: row.try_get("id")?,
        hairstylist_id: row.try_get("hairstylist_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        before_image: row.try_get("before_image")?,
        after_image: row.try_get("after_image")?,
        service_id: row.try_get("service_id")?,
        tags,
        created_at: row.try_get("created_at")?,
    })
}

fn map_message(row: &PgRow) -> StoreResult<Message> {
    Ok(Message {
        id: row.try_get("id")?,
        sender_id: row.try_get("sender_id")?,
        recipient_id: row.try_get("recipient_id")?,
        booking_id: row.try_get("booking_id")?,
        content: row.try_get("content")?,
        message_type: row.try_get("message_type")?,
        template_id: row.try_get("template_id")?,
        is_read: row.try_get("is_read")?,
        created_at: row.try_get("created_at")?,
    })
}

fn map_template(row: &PgRow) -> StoreResult<MessageTemplate> {
    Ok(MessageTemplate {
        id: row.try_get("id")?,
        hairstylist_id: row.try_get("hairstylist_id")?,
        name: row.try_get("name")?,
        content: row.try_get("content")?,
        category: row.try_get("category")?,
        is_default: row.try_get("is_default")?,
        created_at: row.try_get("created_at")?,
    })
}

fn map_hair_history(row: &PgRow) -> StoreResult<HairHistory> {
    let Json(previous_treatments): Json<Vec<String>> = row.try_get("previous_treatments")?;
    Ok(HairHistory {
        id: row.try_get("id")?,
        client_id: row.try_get("client_id")?,
        booking_id: row.try_get("booking_id")?,
        hair_type: row.try_get("hair_type")?,
        hair_length: row.try_get("hair_length")?,
        hair_color: row.try_get("hair_color")?,
        previous_treatments,
        allergies: row.try_get("allergies")?,
        preferences: row.try_get("preferences")?,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
    })
}

fn map_job(row: &PgRow) -> StoreResult<Job> {
    Ok(Job {
        id: row.try_get("id")?,
        poster_id: row.try_get("poster_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        category: row.try_get("category")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        budget_min: row.try_get("budget_min")?,
        budget_max: row.try_get("budget_max")?,
        urgency: row.try_get("urgency")?,
        status: row.try_get("status")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn map_all<T>(rows: Vec<PgRow>, map: fn(&PgRow) -> StoreResult<T>) -> StoreResult<Vec<T>> {
    rows.iter().map(map).collect()
}

#[async_trait]
impl Storage for PostgresStorage {
    async fn health_check(&self) -> StoreResult<bool> {
        let row = sqlx::query("SELECT 1 AS ok").fetch_one(&self.pool).await?;
        let ok: i32 = row.try_get("ok")?;
        Ok(ok == 1)
    }

    async fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        let user = User::from_new(models::new_id(), new_user, models::now());
        sqlx::query(&format!(
            "INSERT INTO users ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
            USER_COLUMNS
        ))
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(user.role.as_str())
        .bind(&user.profile_image)
        .bind(&user.bio)
        .bind(&user.location)
        .bind(&user.city)
        .bind(&user.state)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return StoreError::Duplicate {
                    entity: "User",
                    field: "username",
                };
            }
            StoreError::Database(e)
        })?;

        info!("Created user {}", user.id);
        Ok(user)
    }

    async fn get_user(&self, id: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_user).transpose()
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_user).transpose()
    }

    async fn list_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM users
            WHERE ($1::text IS NULL OR role = $1)
              AND ($2 = FALSE OR role <> 'client')
              AND ($3::text IS NULL OR LOWER(city) = LOWER($3))
              AND ($4::text IS NULL OR LOWER(state) = LOWER($4))
            ORDER BY seq
            "#,
            USER_COLUMNS
        ))
        .bind(filter.role.map(|role| role.as_str()))
        .bind(filter.providers_only)
        .bind(&filter.city)
        .bind(&filter.state)
        .fetch_all(&self.pool)
        .await?;
        map_all(rows, map_user)
    }

    async fn update_user(&self, id: &str, changes: UpdateUser) -> StoreResult<Option<User>> {
        let mut tx = self.pool.begin().await?;
        let Some(row) = Self::lock_row(&mut tx, "users", USER_COLUMNS, id).await? else {
            return Ok(None);
        };
        let mut user = map_user(&row)?;
        user.apply(changes);

        sqlx::query(
            r#"
            UPDATE users
            SET full_name = $2, email = $3, profile_image = $4, bio = $5,
                location = $6, city = $7, state = $8
            WHERE id = $1
            "#,
        )
        .bind(&user.id)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.profile_image)
        .bind(&user.bio)
        .bind(&user.location)
        .bind(&user.city)
        .bind(&user.state)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(Some(user))
    }

    async fn delete_user(&self, id: &str) -> StoreResult<bool> {
        self.delete_by_id("users", id).await
    }

    async fn create_category(
        &self,
        new_category: NewServiceCategory,
    ) -> StoreResult<ServiceCategory> {
        let category = ServiceCategory::from_new(models::new_id(), new_category);
        sqlx::query(&format!(
            "INSERT INTO service_categories ({}) VALUES ($1, $2, $3, $4, $5)",
            CATEGORY_COLUMNS
        ))
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(&category.icon)
        .bind(&category.color)
        .execute(&self.pool)
        .await?;
        Ok(category)
    }

    async fn get_category(&self, id: &str) -> StoreResult<Option<ServiceCategory>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM service_categories WHERE id = $1",
            CATEGORY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_category).transpose()
    }

    async fn list_categories(&self) -> StoreResult<Vec<ServiceCategory>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM service_categories ORDER BY seq",
            CATEGORY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        map_all(rows, map_category)
    }

    async fn update_category(
        &self,
        id: &str,
        changes: UpdateServiceCategory,
    ) -> StoreResult<Option<ServiceCategory>> {
        let mut tx = self.pool.begin().await?;
        let Some(row) = Self::lock_row(&mut tx, "service_categories", CATEGORY_COLUMNS, id).await?
        else {
            return Ok(None);
        };
        let mut category = map_category(&row)?;
        category.apply(changes);

        sqlx::query(
            "UPDATE service_categories SET name = $2, description = $3, icon = $4, color = $5 \
             WHERE id = $1",
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(&category.icon)
        .bind(&category.color)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(Some(category))
    }

    async fn delete_category(&self, id: &str) -> StoreResult<bool> {
        self.delete_by_id("service_categories", id).await
    }

    async fn create_service(&self, new_service: NewService) -> StoreResult<Service> {
        let service = Service::from_new(models::new_id(), new_service, models::now());
        sqlx::query(&format!(
            "INSERT INTO services ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            SERVICE_COLUMNS
        ))
        .bind(&service.id)
        .bind(&service.hairstylist_id)
        .bind(&service.category_id)
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.base_price)
        .bind(service.duration)
        .bind(service.is_active)
        .bind(service.created_at)
        .execute(&self.pool)
        .await?;
        Ok(service)
    }

    async fn get_service(&self, id: &str) -> StoreResult<Option<Service>> {
        let row = sqlx::query(&format!("SELECT {} FROM services WHERE id = $1", SERVICE_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_service).transpose()
    }

    async fn list_services(&self, filter: &ServiceFilter) -> StoreResult<Vec<Service>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM services
            WHERE ($1::text IS NULL OR hairstylist_id = $1)
              AND ($2::text IS NULL OR category_id = $2)
              AND ($3::boolean IS NULL OR is_active = $3)
            ORDER BY seq
            "#,
            SERVICE_COLUMNS
        ))
        .bind(&filter.hairstylist_id)
        .bind(&filter.category_id)
        .bind(filter.is_active)
        .fetch_all(&self.pool)
        .await?;
        map_all(rows, map_service)
    }

    async fn update_service(
        &self,
        id: &str,
        changes: UpdateService,
    ) -> StoreResult<Option<Service>> {
        let mut tx = self.pool.begin().await?;
        let Some(row) = Self::lock_row(&mut tx, "services", SERVICE_COLUMNS, id).await? else {
            return Ok(None);
        };
        let mut service = map_service(&row)?;
        service.apply(changes);

        sqlx::query(
            r#"
            UPDATE services
            SET hairstylist_id = $2, category_id = $3, name = $4, description = $5,
                base_price = $6, duration = $7, is_active = $8
            WHERE id = $1
            "#,
        )
        .bind(&service.id)
        .bind(&service.hairstylist_id)
        .bind(&service.category_id)
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.base_price)
        .bind(service.duration)
        .bind(service.is_active)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(Some(service))
    }

    async fn delete_service(&self, id: &str) -> StoreResult<bool> {
        self.delete_by_id("services", id).await
    }

    async fn create_booking(&self, new_booking: NewBooking) -> StoreResult<Booking> {
        let booking = Booking::from_new(models::new_id(), new_booking, models::now())?;
        sqlx::query(&format!(
            "INSERT INTO bookings ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
            BOOKING_COLUMNS
        ))
        .bind(&booking.id)
        .bind(&booking.client_id)
        .bind(&booking.hairstylist_id)
        .bind(&booking.service_id)
        .bind(booking.appointment_date)
        .bind(booking.duration)
        .bind(&booking.status)
        .bind(booking.total_price)
        .bind(&booking.notes)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;

        info!("Created booking {}", booking.id);
        Ok(booking)
    }

    async fn get_booking(&self, id: &str) -> StoreResult<Option<Booking>> {
        let row = sqlx::query(&format!("SELECT {} FROM bookings WHERE id = $1", BOOKING_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_booking).transpose()
    }

    async fn list_bookings(&self, filter: &BookingFilter) -> StoreResult<Vec<Booking>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM bookings
            WHERE ($1::text IS NULL OR client_id = $1)
              AND ($2::text IS NULL OR hairstylist_id = $2)
              AND ($3::text IS NULL OR status = $3)
            ORDER BY seq
            "#,
            BOOKING_COLUMNS
        ))
        .bind(&filter.client_id)
        .bind(&filter.hairstylist_id)
        .bind(&filter.status)
        .fetch_all(&self.pool)
        .await?;
        map_all(rows, map_booking)
    }

    async fn update_booking(
        &self,
        id: &str,
        changes: UpdateBooking,
    ) -> StoreResult<Option<Booking>> {
        let mut tx = self.pool.begin().await?;
        let Some(row) = Self::lock_row(&mut tx, "bookings", BOOKING_COLUMNS, id).await? else {
            return Ok(None);
        };
        let mut booking = map_booking(&row)?;
        booking.apply(changes, models::now());

        sqlx::query(
            r#"
            UPDATE bookings
            SET client_id = $2, hairstylist_id = $3, service_id = $4, appointment_date = $5,
                duration = $6, status = $7, total_price = $8, notes = $9, updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(&booking.id)
        .bind(&booking.client_id)
        .bind(&booking.hairstylist_id)
        .bind(&booking.service_id)
        .bind(booking.appointment_date)
        .bind(booking.duration)
        .bind(&booking.status)
        .bind(booking.total_price)
        .bind(&booking.notes)
        .bind(booking.updated_at)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(Some(booking))
    }

    async fn update_booking_status(
        &self,
        id: &str,
        status: &str,
    ) -> StoreResult<Option<Booking>> {
        let row = sqlx::query(&format!(
            "UPDATE bookings SET status = $2, updated_at = $3 WHERE id = $1 RETURNING {}",
            BOOKING_COLUMNS
        ))
        .bind(id)
        .bind(status)
        .bind(models::now())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_booking).transpose()
    }

    async fn delete_booking(&self, id: &str) -> StoreResult<bool> {
        self.delete_by_id("bookings", id).await
    }

    async fn create_portfolio_image(
        &self,
        new_image: NewPortfolioImage,
    ) -> StoreResult<PortfolioImage> {
        let image = PortfolioImage::from_new(models::new_id(), new_image, models::now());
        sqlx::query(&format!(
            "INSERT INTO portfolio_images ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            PORTFOLIO_COLUMNS
        ))
        .bind(&image.id)
        .bind(&image.hairstylist_id)
        .bind(&image.title)
        .bind(&image.description)
        .bind(&image.before_image)
        .bind(&image.after_image)
        .bind(&image.service_id)
        .bind(Json(&image.tags))
        .bind(image.created_at)
        .execute(&self.pool)
        .await?;
        Ok(image)
    }

    async fn get_portfolio_image(&self, id: &str) -> StoreResult<Option<PortfolioImage>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM portfolio_images WHERE id = $1",
            PORTFOLIO_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_portfolio_image).transpose()
    }

    async fn list_portfolio_images(
        &self,
        filter: &PortfolioFilter,
    ) -> StoreResult<Vec<PortfolioImage>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM portfolio_images
            WHERE ($1::text IS NULL OR hairstylist_id = $1)
              AND ($2::text IS NULL OR service_id = $2)
            ORDER BY seq
            "#,
            PORTFOLIO_COLUMNS
        ))
        .bind(&filter.hairstylist_id)
        .bind(&filter.service_id)
        .fetch_all(&self.pool)
        .await?;
        map_all(rows, map_portfolio_image)
    }

    async fn update_portfolio_image(
        &self,
        id: &str,
        changes: UpdatePortfolioImage,
    ) -> StoreResult<Option<PortfolioImage>> {
        let mut tx = self.pool.begin().await?;
        let Some(row) = Self::lock_row(&mut tx, "portfolio_images", PORTFOLIO_COLUMNS, id).await?
        else {
            return Ok(None);
        };
        let mut image = map_portfolio_image(&row)?;
        image.apply(changes);

        sqlx::query(
            r#"
            UPDATE portfolio_images
            SET title = $2, description = $3, before_image = $4, after_image = $5,
                service_id = $6, tags = $7
            WHERE id = $1
            "#,
        )
        .bind(&image.id)
        .bind(&image.title)
        .bind(&image.description)
        .bind(&image.before_image)
        .bind(&image.after_image)
        .bind(&image.service_id)
        .bind(Json(&image.tags))
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(Some(image))
    }

    async fn delete_portfolio_image(&self, id: &str) -> StoreResult<bool> {
        self.delete_by_id("portfolio_images", id).await
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
        sqlx::query(&format!(
            "INSERT INTO messages ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            MESSAGE_COLUMNS
        ))
        .bind(&message.id)
        .bind(&message.sender_id)
        .bind(&message.recipient_id)
        .bind(&message.booking_id)
        .bind(&message.content)
        .bind(&message.message_type)
        .bind(&message.template_id)
        .bind(message.is_read)
        .bind(message.created_at)
        .execute(&self.pool)
        .await?;
        Ok(message)
    }

    async fn get_message(&self, id: &str) -> StoreResult<Option<Message>> {
        let row = sqlx::query(&format!("SELECT {} FROM messages WHERE id = $1", MESSAGE_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_message).transpose()
    }

    async fn list_messages(&self, filter: &MessageFilter) -> StoreResult<Vec<Message>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM messages
            WHERE ($1::text IS NULL OR sender_id = $1 OR recipient_id = $1)
              AND ($2::text IS NULL OR sender_id = $2 OR recipient_id = $2)
              AND ($1::text IS NULL OR $2::text IS NULL
                   OR (sender_id = $1 AND recipient_id = $2)
                   OR (sender_id = $2 AND recipient_id = $1))
              AND ($3::text IS NULL OR booking_id = $3)
            ORDER BY created_at, seq
            "#,
            MESSAGE_COLUMNS
        ))
        .bind(&filter.participant)
        .bind(&filter.counterpart)
        .bind(&filter.booking_id)
        .fetch_all(&self.pool)
        .await?;
        map_all(rows, map_message)
    }

    async fn mark_message_read(&self, id: &str) -> StoreResult<Option<Message>> {
        let row = sqlx::query(&format!(
            "UPDATE messages SET is_read = TRUE WHERE id = $1 RETURNING {}",
            MESSAGE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_message).transpose()
    }

    async fn mark_conversation_read(
        &self,
        user_id: &str,
        other_user_id: &str,
    ) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = TRUE \
             WHERE recipient_id = $1 AND sender_id = $2 AND is_read = FALSE",
        )
        .bind(user_id)
        .bind(other_user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete_message(&self, id: &str) -> StoreResult<bool> {
        self.delete_by_id("messages", id).await
    }

    async fn create_template(
        &self,
        new_template: NewMessageTemplate,
    ) -> StoreResult<MessageTemplate> {
        let template = MessageTemplate::from_new(models::new_id(), new_template, models::now());
        sqlx::query(&format!(
            "INSERT INTO message_templates ({}) VALUES ($1, $2, $3, $4, $5, $6, $7)",
            TEMPLATE_COLUMNS
        ))
        .bind(&template.id)
        .bind(&template.hairstylist_id)
        .bind(&template.name)
        .bind(&template.content)
        .bind(&template.category)
        .bind(template.is_default)
        .bind(template.created_at)
        .execute(&self.pool)
        .await?;
        Ok(template)
    }

    async fn get_template(&self, id: &str) -> StoreResult<Option<MessageTemplate>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM message_templates WHERE id = $1",
            TEMPLATE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_template).transpose()
    }

    async fn list_templates(&self, filter: &TemplateFilter) -> StoreResult<Vec<MessageTemplate>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM message_templates
            WHERE ($1::text IS NULL OR is_default OR hairstylist_id = $1)
              AND ($2::text IS NULL OR category = $2)
            ORDER BY seq
            "#,
            TEMPLATE_COLUMNS
        ))
        .bind(&filter.hairstylist_id)
        .bind(&filter.category)
        .fetch_all(&self.pool)
        .await?;
        map_all(rows, map_template)
    }

    async fn update_template(
        &self,
        id: &str,
        changes: UpdateMessageTemplate,
    ) -> StoreResult<Option<MessageTemplate>> {
        let mut tx = self.pool.begin().await?;
        let Some(row) = Self::lock_row(&mut tx, "message_templates", TEMPLATE_COLUMNS, id).await?
        else {
            return Ok(None);
        };
        let mut template = map_template(&row)?;
        template.apply(changes);

        sqlx::query(
            "UPDATE message_templates SET name = $2, content = $3, category = $4, \
             is_default = $5 WHERE id = $1",
        )
        .bind(&template.id)
        .bind(&template.name)
        .bind(&template.content)
        .bind(&template.category)
        .bind(template.is_default)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(Some(template))
    }

    async fn delete_template(&self, id: &str) -> StoreResult<bool> {
        self.delete_by_id("message_templates", id).await
    }

    async fn create_hair_history(&self, new_entry: NewHairHistory) -> StoreResult<HairHistory> {
        let entry = HairHistory::from_new(models::new_id(), new_entry, models::now());
        sqlx::query(&format!(
            "INSERT INTO hair_history ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
            HAIR_HISTORY_COLUMNS
        ))
        .bind(&entry.id)
        .bind(&entry.client_id)
        .bind(&entry.booking_id)
        .bind(&entry.hair_type)
        .bind(&entry.hair_length)
        .bind(&entry.hair_color)
        .bind(Json(&entry.previous_treatments))
        .bind(&entry.allergies)
        .bind(&entry.preferences)
        .bind(&entry.notes)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn get_hair_history(&self, id: &str) -> StoreResult<Option<HairHistory>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM hair_history WHERE id = $1",
            HAIR_HISTORY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_hair_history).transpose()
    }

    async fn list_hair_history(
        &self,
        filter: &HairHistoryFilter,
    ) -> StoreResult<Vec<HairHistory>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM hair_history
            WHERE ($1::text IS NULL OR client_id = $1)
              AND ($2::text IS NULL OR booking_id = $2)
            ORDER BY seq
            "#,
            HAIR_HISTORY_COLUMNS
        ))
        .bind(&filter.client_id)
        .bind(&filter.booking_id)
        .fetch_all(&self.pool)
        .await?;
        map_all(rows, map_hair_history)
    }

    async fn update_hair_history(
        &self,
        id: &str,
        changes: UpdateHairHistory,
    ) -> StoreResult<Option<HairHistory>> {
        let mut tx = self.pool.begin().await?;
        let Some(row) = Self::lock_row(&mut tx, "hair_history", HAIR_HISTORY_COLUMNS, id).await?
        else {
            return Ok(None);
        };
        let mut entry = map_hair_history(&row)?;
        entry.apply(changes);

        sqlx::query(
            r#"
            UPDATE hair_history
            SET booking_id = $2, hair_type = $3, hair_length = $4, hair_color = $5,
                previous_treatments = $6, allergies = $7, preferences = $8, notes = $9
            WHERE id = $1
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.booking_id)
        .bind(&entry.hair_type)
        .bind(&entry.hair_length)
        .bind(&entry.hair_color)
        .bind(Json(&entry.previous_treatments))
        .bind(&entry.allergies)
        .bind(&entry.preferences)
        .bind(&entry.notes)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(Some(entry))
    }

    async fn delete_hair_history(&self, id: &str) -> StoreResult<bool> {
        self.delete_by_id("hair_history", id).await
    }

    async fn create_job(&self, poster_id: &str, new_job: NewJob) -> StoreResult<Job> {
        let job = Job::from_new(
            models::new_id(),
            poster_id.to_string(),
            new_job,
            models::now(),
        );
        sqlx::query(&format!(
            "INSERT INTO jobs ({}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
            JOB_COLUMNS
        ))
        .bind(&job.id)
        .bind(&job.poster_id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.category)
        .bind(&job.city)
        .bind(&job.state)
        .bind(job.budget_min)
        .bind(job.budget_max)
        .bind(&job.urgency)
        .bind(&job.status)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await?;

        info!("Created job {}", job.id);
        Ok(job)
    }

    async fn get_job(&self, id: &str) -> StoreResult<Option<Job>> {
        let row = sqlx::query(&format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_job).transpose()
    }

    async fn list_jobs(&self, filter: &JobFilter) -> StoreResult<Vec<Job>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM jobs
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::text IS NULL OR LOWER(category) = LOWER($2))
              AND ($3::text IS NULL OR LOWER(city) = LOWER($3))
              AND ($4::text IS NULL OR LOWER(state) = LOWER($4))
              AND ($5::text IS NULL OR poster_id = $5)
            ORDER BY seq
            "#,
            JOB_COLUMNS
        ))
        .bind(&filter.status)
        .bind(&filter.category)
        .bind(&filter.city)
        .bind(&filter.state)
        .bind(&filter.poster_id)
        .fetch_all(&self.pool)
        .await?;
        map_all(rows, map_job)
    }

    async fn update_job_status(&self, id: &str, status: &str) -> StoreResult<Option<Job>> {
        let row = sqlx::query(&format!(
            "UPDATE jobs SET status = $2, updated_at = $3 WHERE id = $1 RETURNING {}",
            JOB_COLUMNS
        ))
        .bind(id)
        .bind(status)
        .bind(models::now())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_job).transpose()
    }

    async fn delete_job(&self, id: &str) -> StoreResult<bool> {
        self.delete_by_id("jobs", id).await
    }
}
