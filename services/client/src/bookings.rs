//! Booking calls

use chrono::{DateTime, Utc};
use common::models::{Booking, BookingFilter, NewBooking, Service, StatusUpdate};
use tracing::info;

use crate::{
    error::ClientResult,
    http::{ApiClient, ApiRequest},
};

impl ApiClient {
    /// Book `service`; price and duration are taken from the service
    pub async fn book_service(
        &self,
        service: &Service,
        client_id: &str,
        appointment_date: DateTime<Utc>,
        notes: Option<String>,
    ) -> ClientResult<Booking> {
        let booking = NewBooking::for_service(service, client_id, appointment_date, notes);
        let booking: Booking = self
            .fetch(ApiRequest::post("/api/bookings").json(&booking)?)
            .await?;
        info!("Booked {} as {}", service.name, booking.id);
        Ok(booking)
    }

    pub async fn list_bookings(&self, filter: &BookingFilter) -> ClientResult<Vec<Booking>> {
        self.fetch(ApiRequest::get("/api/bookings").query(filter)?)
            .await
    }

    pub async fn update_booking_status(&self, id: &str, status: &str) -> ClientResult<Booking> {
        let request = ApiRequest::patch(format!("/api/bookings/{}/status", id))
            .json(&StatusUpdate::new(status))?;
        self.fetch(request).await
    }
}
