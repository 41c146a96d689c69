//! Runs against a real database; skipped unless DATABASE_URL is set

use api::storage::{PostgresStorage, Storage};
use common::error::StoreError;
use common::database::{DatabaseConfig, init_pool};
use common::models::{
    JobFilter, MessageFilter, NewBooking, NewJob, NewMessage, NewService, NewUser, Role,
    StatusUpdate, new_id,
};
use rust_decimal::Decimal;
use std::str::FromStr;

async fn storage() -> Option<PostgresStorage> {
    if std::env::var("DATABASE_URL").is_err() {
        return None;
    }
    let config = DatabaseConfig::from_env().unwrap();
    let storage = PostgresStorage::new(init_pool(&config).await.unwrap());
    storage.migrate().await.unwrap();
    Some(storage)
}

fn new_user(role: Role) -> NewUser {
    let username = format!("pg_{}", &new_id()[..8]);
    NewUser {
        email: format!("{}@example.com", username),
        username,
        password_hash: "hash".to_string(),
        full_name: "Postgres Tester".to_string(),
        role,
        profile_image: None,
        bio: Some("bio".to_string()),
        location: Some("Austin, TX".to_string()),
        city: Some("Austin".to_string()),
        state: Some("TX".to_string()),
    }
}

#[tokio::test]
async fn test_taken_username_is_a_duplicate() {
    let Some(storage) = storage().await else {
        return;
    };

    let first = storage.create_user(new_user(Role::Client)).await.unwrap();
    let mut second = new_user(Role::Barber);
    second.username = first.username.clone();

    let err = storage.create_user(second).await.unwrap_err();
    assert!(matches!(err, StoreError::Duplicate { field: "username", .. }));
}

#[tokio::test]
async fn test_booking_round_trip() {
    let Some(storage) = storage().await else {
        return;
    };

    let client = storage.create_user(new_user(Role::Client)).await.unwrap();
    let stylist = storage.create_user(new_user(Role::Hairstylist)).await.unwrap();
    assert_eq!(
        storage.get_user_by_username(&client.username).await.unwrap(),
        Some(client.clone())
    );

    let service = storage
        .create_service(NewService {
            hairstylist_id: stylist.id.clone(),
            category_id: "cuts".to_string(),
            name: "Cut".to_string(),
            description: None,
            base_price: Decimal::from_str("45").unwrap(),
            duration: 60,
            is_active: None,
        })
        .await
        .unwrap();
    assert_eq!(service.base_price.to_string(), "45.00");

    let booking = storage
        .create_booking(NewBooking::for_service(
            &service,
            client.id.clone(),
            common::models::now(),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(booking.status, "pending");
    assert_eq!(storage.get_booking(&booking.id).await.unwrap(), Some(booking.clone()));

    let confirmed = storage
        .update_booking_status(&booking.id, &StatusUpdate::new("confirmed").status)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(confirmed.status, "confirmed");
    assert_eq!(confirmed.total_price, booking.total_price);

    assert!(storage.delete_booking(&booking.id).await.unwrap());
    assert!(!storage.delete_booking(&booking.id).await.unwrap());
}

#[tokio::test]
async fn test_messages_and_jobs() {
    let Some(storage) = storage().await else {
        return;
    };

    let alice = storage.create_user(new_user(Role::Client)).await.unwrap();
    let bob = storage.create_user(new_user(Role::Barber)).await.unwrap();

    let first = storage
        .create_message(&alice.id, NewMessage::text(bob.id.clone(), "hello"))
        .await
        .unwrap();
    storage
        .create_message(&bob.id, NewMessage::text(alice.id.clone(), "hi back"))
        .await
        .unwrap();

    let thread = storage
        .list_messages(&MessageFilter::between(alice.id.clone(), bob.id.clone()))
        .await
        .unwrap();
    assert_eq!(thread.len(), 2);
    assert_eq!(thread[0].id, first.id);

    for _ in 0..2 {
        let read = storage.mark_message_read(&first.id).await.unwrap().unwrap();
        assert!(read.is_read);
    }
    assert_eq!(
        storage.mark_conversation_read(&alice.id, &bob.id).await.unwrap(),
        1
    );

    let job = storage
        .create_job(
            &alice.id,
            NewJob {
                title: "Fade".to_string(),
                description: "Skin fade before Saturday".to_string(),
                category: "cuts".to_string(),
                city: "Austin".to_string(),
                state: "TX".to_string(),
                budget_min: None,
                budget_max: None,
                urgency: None,
            },
        )
        .await
        .unwrap();
    let open = JobFilter {
        status: Some("open".to_string()),
        poster_id: Some(alice.id.clone()),
        ..Default::default()
    };
    assert_eq!(storage.list_jobs(&open).await.unwrap().len(), 1);

    storage.update_job_status(&job.id, "closed").await.unwrap();
    assert!(storage.list_jobs(&open).await.unwrap().is_empty());
}
