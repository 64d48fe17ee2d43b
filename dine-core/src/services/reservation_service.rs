//! Reservation workflows

use super::requests::{CreateReservationRequest, LineItemRequest};
use crate::domain::{Dish, Reservation, ReservationStatus};
use crate::store::{DishStore, ReservationStore, UnitOfWork};
use shared::{AppError, AppResult, ErrorCode, Money};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct ReservationService {
    reservations: Arc<dyn ReservationStore>,
    dishes: Arc<dyn DishStore>,
    uow: Arc<dyn UnitOfWork>,
}

impl ReservationService {
    pub fn new(
        reservations: Arc<dyn ReservationStore>,
        dishes: Arc<dyn DishStore>,
        uow: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            reservations,
            dishes,
            uow,
        }
    }

    /// Create a reservation, with an optional pre-order.
    pub async fn create_reservation(
        &self,
        request: CreateReservationRequest,
    ) -> AppResult<Reservation> {
        let mut reservation = Reservation::create(
            request.customer_name,
            request.customer_phone,
            request.reservation_date,
            &request.reservation_time,
            request.guest_count,
            request.table_number,
            request.notes,
        )?;

        for item in &request.items {
            let dish = self.resolve_dish(item.dish_id).await?;
            reservation.add_item(
                dish.id(),
                dish.name_ka(),
                dish.name_en(),
                item.quantity,
                dish.price().unwrap_or(Money::ZERO),
                item.special_instructions.clone(),
            )?;
        }

        self.reservations.add(&reservation).await?;
        self.uow.commit().await?;

        info!(
            reservation = %reservation.reservation_number(),
            table = reservation.table_number(),
            guests = reservation.guest_count(),
            "reservation created"
        );
        Ok(reservation)
    }

    pub async fn add_item(
        &self,
        reservation_id: Uuid,
        item: LineItemRequest,
    ) -> AppResult<Reservation> {
        let mut reservation = self.load(reservation_id).await?;
        let dish = self.resolve_dish(item.dish_id).await?;

        reservation.add_item(
            dish.id(),
            dish.name_ka(),
            dish.name_en(),
            item.quantity,
            dish.price().unwrap_or(Money::ZERO),
            item.special_instructions,
        )?;

        self.reservations.update(&reservation).await?;
        self.uow.commit().await?;
        Ok(reservation)
    }

    pub async fn update_status(
        &self,
        reservation_id: Uuid,
        status: ReservationStatus,
    ) -> AppResult<Reservation> {
        let mut reservation = self.load(reservation_id).await?;
        reservation.update_status(status)?;

        self.reservations.update(&reservation).await?;
        self.uow.commit().await?;

        info!(
            reservation = %reservation.reservation_number(),
            status = %status,
            "reservation status updated"
        );
        Ok(reservation)
    }

    pub async fn cancel(&self, reservation_id: Uuid) -> AppResult<Reservation> {
        let mut reservation = self.load(reservation_id).await?;
        reservation.cancel()?;

        self.reservations.update(&reservation).await?;
        self.uow.commit().await?;

        info!(reservation = %reservation.reservation_number(), "reservation cancelled");
        Ok(reservation)
    }

    pub async fn confirm(&self, reservation_id: Uuid) -> AppResult<Reservation> {
        let mut reservation = self.load(reservation_id).await?;
        reservation.confirm()?;

        self.reservations.update(&reservation).await?;
        self.uow.commit().await?;

        info!(reservation = %reservation.reservation_number(), "reservation confirmed");
        Ok(reservation)
    }

    pub async fn get(&self, reservation_id: Uuid) -> AppResult<Reservation> {
        self.load(reservation_id).await
    }

    async fn load(&self, reservation_id: Uuid) -> AppResult<Reservation> {
        self.reservations
            .get_by_id(reservation_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::ReservationNotFound,
                    format!("Reservation {reservation_id} not found"),
                )
            })
    }

    async fn resolve_dish(&self, dish_id: Uuid) -> AppResult<Dish> {
        let dish = self
            .dishes
            .get_by_id(dish_id)
            .await?
            .filter(|d| !d.is_deleted())
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::DishNotFound,
                    format!("Dish {dish_id} not found"),
                )
            })?;

        if !dish.is_available() {
            return Err(AppError::with_message(
                ErrorCode::DishNotAvailable,
                format!("Dish '{}' is currently not available", dish.name_en()),
            ));
        }
        Ok(dish)
    }
}
