//! End-to-end reservation workflows against the in-memory store

use chrono::{NaiveDate, TimeZone, Utc};
use dine_core::domain::{DishAttributes, ReservationStatus};
use dine_core::services::{
    CatalogService, CreateReservationRequest, LineItemRequest, ReservationService,
};
use dine_core::store::{MemoryImageStorage, MemoryStore};
use dine_core::ErrorCode;
use rust_decimal_macros::dec;
use std::sync::Arc;
use uuid::Uuid;

struct TestApp {
    reservations: ReservationService,
    catalog: CatalogService,
}

fn app() -> TestApp {
    dine_core::logging::try_init_for_tests();
    let store = Arc::new(MemoryStore::new());
    let images = Arc::new(MemoryImageStorage::new());
    TestApp {
        reservations: ReservationService::new(store.clone(), store.clone(), store.clone()),
        catalog: CatalogService::new(store.clone(), store.clone(), images, store.clone()),
    }
}

async fn seed_dish(app: &TestApp) -> Uuid {
    let category = app
        .catalog
        .create_category("სალათები", "Salads", None, None, 0)
        .await
        .unwrap();
    app.catalog
        .create_dish(DishAttributes {
            name_ka: "ფხალი".into(),
            name_en: "Pkhali".into(),
            price: Some(dec!(6.00)),
            category_id: category.id(),
            ..Default::default()
        })
        .await
        .unwrap()
        .id()
}

fn request(items: Vec<LineItemRequest>) -> CreateReservationRequest {
    CreateReservationRequest {
        customer_name: "Nino".into(),
        customer_phone: "+995 599 112233".into(),
        reservation_date: Utc.with_ymd_and_hms(2025, 6, 14, 11, 22, 33).unwrap(),
        reservation_time: "19:30".into(),
        guest_count: 4,
        table_number: 7,
        notes: None,
        items,
    }
}

#[tokio::test]
async fn test_create_with_pre_order() {
    let app = app();
    let dish = seed_dish(&app).await;

    let reservation = app
        .reservations
        .create_reservation(request(vec![LineItemRequest {
            dish_id: dish,
            quantity: 3,
            special_instructions: None,
        }]))
        .await
        .unwrap();

    assert_eq!(reservation.status(), ReservationStatus::Pending);
    assert_eq!(
        reservation.reservation_date(),
        NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()
    );
    assert_eq!(reservation.total_amount(), dec!(18.00));
}

#[tokio::test]
async fn test_create_without_items_is_fine() {
    let app = app();
    let reservation = app
        .reservations
        .create_reservation(request(vec![]))
        .await
        .unwrap();
    assert!(reservation.items().is_empty());
    assert_eq!(reservation.total_amount(), dec!(0));
}

#[tokio::test]
async fn test_malformed_time_fails_creation() {
    let app = app();
    let mut bad = request(vec![]);
    bad.reservation_time = "7:30 PM".into();

    let err = app.reservations.create_reservation(bad).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidReservationTime);
}

#[tokio::test]
async fn test_unknown_dish_fails_pre_order() {
    let app = app();
    let err = app
        .reservations
        .create_reservation(request(vec![LineItemRequest {
            dish_id: Uuid::new_v4(),
            quantity: 1,
            special_instructions: None,
        }]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::DishNotFound);
}

#[tokio::test]
async fn test_lifecycle_through_service() {
    let app = app();
    let reservation = app
        .reservations
        .create_reservation(request(vec![]))
        .await
        .unwrap();

    app.reservations.confirm(reservation.id()).await.unwrap();
    let done = app
        .reservations
        .update_status(reservation.id(), ReservationStatus::Completed)
        .await
        .unwrap();
    assert_eq!(done.status(), ReservationStatus::Completed);

    let err = app.reservations.cancel(reservation.id()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ReservationCompleted);
}

#[tokio::test]
async fn test_cancelled_blocks_further_updates() {
    let app = app();
    let reservation = app
        .reservations
        .create_reservation(request(vec![]))
        .await
        .unwrap();

    app.reservations.cancel(reservation.id()).await.unwrap();

    let err = app
        .reservations
        .update_status(reservation.id(), ReservationStatus::Confirmed)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ReservationAlreadyCancelled);

    let err = app.reservations.cancel(reservation.id()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ReservationAlreadyCancelled);
}

#[tokio::test]
async fn test_add_item_merges_on_existing_reservation() {
    let app = app();
    let dish = seed_dish(&app).await;
    let reservation = app
        .reservations
        .create_reservation(request(vec![LineItemRequest {
            dish_id: dish,
            quantity: 1,
            special_instructions: None,
        }]))
        .await
        .unwrap();

    let updated = app
        .reservations
        .add_item(
            reservation.id(),
            LineItemRequest {
                dish_id: dish,
                quantity: 2,
                special_instructions: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.items().len(), 1);
    assert_eq!(updated.items()[0].quantity(), 3);
    assert_eq!(updated.total_amount(), dec!(18.00));
}

#[tokio::test]
async fn test_unknown_reservation_id() {
    let app = app();
    let err = app.reservations.cancel(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ReservationNotFound);
}
