//! Bookings link a client, a provider and one of the provider's services

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{StoreError, StoreResult};
use crate::models::catalog::Service;
use crate::models::money;
use crate::validation::{validate_non_negative, validate_not_blank};

/// Booking status values used by the marketplace. Status is stored as a free-form
/// string, so other values are accepted too.
pub mod status {
    pub const PENDING: &str = "pending";
    pub const CONFIRMED: &str = "confirmed";
    pub const COMPLETED: &str = "completed";
    pub const CANCELLED: &str = "cancelled";
}

/// Booking entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub client_id: String,
    pub hairstylist_id: String,
    pub service_id: String,
    pub appointment_date: DateTime<Utc>,
    /// Minutes
    pub duration: i32,
    pub status: String,
    pub total_price: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Build a stored booking. Duration and total price must already be resolved.
    pub fn from_new(id: String, new_booking: NewBooking, now: DateTime<Utc>) -> StoreResult<Self> {
        let duration = new_booking
            .duration
            .ok_or(StoreError::MissingField { field: "duration" })?;
        let total_price = new_booking
            .total_price
            .ok_or(StoreError::MissingField { field: "totalPrice" })?;

        Ok(Self {
            id,
            client_id: new_booking.client_id,
            hairstylist_id: new_booking.hairstylist_id,
            service_id: new_booking.service_id,
            appointment_date: new_booking.appointment_date,
            duration,
            status: new_booking
                .status
                .unwrap_or_else(|| status::PENDING.to_string()),
            total_price: money(total_price),
            notes: new_booking.notes,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, changes: UpdateBooking, now: DateTime<Utc>) {
        if let Some(client_id) = changes.client_id {
            self.client_id = client_id;
        }
        if let Some(hairstylist_id) = changes.hairstylist_id {
            self.hairstylist_id = hairstylist_id;
        }
        if let Some(service_id) = changes.service_id {
            self.service_id = service_id;
        }
        if let Some(appointment_date) = changes.appointment_date {
            self.appointment_date = appointment_date;
        }
        if let Some(duration) = changes.duration {
            self.duration = duration;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(total_price) = changes.total_price {
            self.total_price = money(total_price);
        }
        if let Some(notes) = changes.notes {
            self.notes = Some(notes);
        }
        self.updated_at = now;
    }

    pub fn set_status(&mut self, status: String, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }

    pub fn matches(&self, filter: &BookingFilter) -> bool {
        filter
            .client_id
            .as_ref()
            .is_none_or(|id| &self.client_id == id)
            && filter
                .hairstylist_id
                .as_ref()
                .is_none_or(|id| &self.hairstylist_id == id)
            && filter.status.as_ref().is_none_or(|s| &self.status == s)
    }
}

/// New booking payload
///
/// `duration` and `totalPrice` may be omitted; they are then taken from the
/// selected service.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    #[validate(length(min = 1, message = "clientId is required"))]
    pub client_id: String,
    #[validate(length(min = 1, message = "hairstylistId is required"))]
    pub hairstylist_id: String,
    #[validate(length(min = 1, message = "serviceId is required"))]
    pub service_id: String,
    pub appointment_date: DateTime<Utc>,
    #[validate(range(min = 1, max = 1440))]
    pub duration: Option<i32>,
    #[validate(custom(function = "validate_not_blank"))]
    pub status: Option<String>,
    #[validate(custom(function = "validate_non_negative"))]
    pub total_price: Option<Decimal>,
    pub notes: Option<String>,
}

impl NewBooking {
    /// Book `service` for `client_id`, pricing from the service's base price
    pub fn for_service(
        service: &Service,
        client_id: impl Into<String>,
        appointment_date: DateTime<Utc>,
        notes: Option<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            hairstylist_id: service.hairstylist_id.clone(),
            service_id: service.id.clone(),
            appointment_date,
            duration: Some(service.duration),
            status: None,
            total_price: Some(service.base_price),
            notes,
        }
    }

    /// Whether the service must be looked up to complete this booking
    pub fn needs_pricing(&self) -> bool {
        self.duration.is_none() || self.total_price.is_none()
    }

    /// Fill a missing duration or total price from `service`
    pub fn priced_from(mut self, service: &Service) -> Self {
        self.duration.get_or_insert(service.duration);
        self.total_price.get_or_insert(service.base_price);
        self
    }
}

/// Booking update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBooking {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hairstylist_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_date: Option<DateTime<Utc>>,
    #[validate(range(min = 1, max = 1440))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    #[validate(custom(function = "validate_not_blank"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[validate(custom(function = "validate_non_negative"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of the booking and job status endpoints
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    #[validate(custom(function = "validate_not_blank"))]
    pub status: String,
}

impl StatusUpdate {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}

/// Query filters for booking listings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hairstylist_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::NewService;
    use std::str::FromStr;

    fn service() -> Service {
        Service::from_new(
            "svc-1".to_string(),
            NewService {
                hairstylist_id: "stylist-1".to_string(),
                category_id: "cuts".to_string(),
                name: "Balayage".to_string(),
                description: None,
                base_price: Decimal::from_str("120.50").unwrap(),
                duration: 150,
                is_active: None,
            },
            Utc::now(),
        )
    }

    #[test]
    fn for_service_copies_price_and_duration() {
        let service = service();
        let booking = NewBooking::for_service(&service, "client-1", Utc::now(), None);
        assert_eq!(booking.total_price, Some(service.base_price));
        assert_eq!(booking.duration, Some(150));
        assert_eq!(booking.hairstylist_id, "stylist-1");
        assert!(!booking.needs_pricing());
    }

    #[test]
    fn priced_from_keeps_explicit_values() {
        let service = service();
        let mut booking = NewBooking::for_service(&service, "client-1", Utc::now(), None);
        booking.total_price = Some(Decimal::from_str("99.00").unwrap());
        booking.duration = None;

        let booking = booking.priced_from(&service);
        assert_eq!(booking.total_price, Some(Decimal::from_str("99.00").unwrap()));
        assert_eq!(booking.duration, Some(150));
    }

    #[test]
    fn new_bookings_start_pending() {
        let new_booking = NewBooking::for_service(&service(), "client-1", Utc::now(), None);
        let booking = Booking::from_new("b1".to_string(), new_booking, Utc::now()).unwrap();
        assert_eq!(booking.status, status::PENDING);
        assert_eq!(booking.created_at, booking.updated_at);
    }

    #[test]
    fn unpriced_bookings_are_rejected() {
        let mut new_booking = NewBooking::for_service(&service(), "client-1", Utc::now(), None);
        new_booking.total_price = None;
        let err = Booking::from_new("b1".to_string(), new_booking, Utc::now()).unwrap_err();
        assert!(matches!(err, StoreError::MissingField { field: "totalPrice" }));
    }

    #[test]
    fn set_status_touches_only_status_and_timestamp() {
        let new_booking = NewBooking::for_service(&service(), "client-1", Utc::now(), None);
        let created = Utc::now();
        let mut booking = Booking::from_new("b1".to_string(), new_booking, created).unwrap();
        let before = booking.clone();

        let later = created + chrono::Duration::minutes(5);
        booking.set_status(status::CONFIRMED.to_string(), later);

        assert_eq!(booking.status, "confirmed");
        assert_eq!(booking.updated_at, later);
        assert_eq!(booking.total_price, before.total_price);
        assert_eq!(booking.appointment_date, before.appointment_date);
        assert_eq!(booking.created_at, before.created_at);
    }

    #[test]
    fn blank_status_fails_validation() {
        assert!(StatusUpdate::new("   ").validate().is_err());
        assert!(StatusUpdate::new("on_hold").validate().is_ok());
    }
}
