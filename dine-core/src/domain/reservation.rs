//! Reservation aggregate

use super::{EntityMeta, LineItem};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use shared::validation::{
    validate_optional_text, validate_required_text, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_PHONE_LEN,
};
use shared::{AppError, AppResult, ErrorCode, Money};
use std::fmt;
use uuid::Uuid;

/// Reservation lifecycle status
///
/// Two short branches: Pending → {Confirmed, Cancelled} and
/// Confirmed → {Completed, Cancelled}. Only Cancelled blocks further
/// transitions; there is no forward-ordering rule like the order machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReservationStatus::Pending => "Pending",
            ReservationStatus::Confirmed => "Confirmed",
            ReservationStatus::Completed => "Completed",
            ReservationStatus::Cancelled => "Cancelled",
        };
        write!(f, "{s}")
    }
}

/// Parse a reservation time from its strict `HH:mm` textual form.
pub fn parse_reservation_time(value: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| {
        AppError::with_message(
            ErrorCode::InvalidReservationTime,
            format!("Invalid reservation time '{value}'. Expected HH:mm format."),
        )
    })
}

/// Table reservation (aggregate root)
///
/// Carries an optional pre-order: line items follow the same snapshot and
/// merge rules as order items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    meta: EntityMeta,
    reservation_number: String,
    customer_name: String,
    customer_phone: String,
    // date and time-of-day kept apart; the date never carries a time component
    reservation_date: NaiveDate,
    reservation_time: NaiveTime,
    guest_count: i32,
    table_number: i32,
    notes: Option<String>,
    status: ReservationStatus,
    items: Vec<LineItem>,
    total_amount: Money,
}

impl Reservation {
    /// Create a new reservation in `Pending` status.
    ///
    /// The date is normalized to a date-only value; the time-of-day comes
    /// from a strict `HH:mm` string and fails loudly when malformed.
    pub fn create(
        customer_name: impl Into<String>,
        customer_phone: impl Into<String>,
        reservation_date: DateTime<Utc>,
        reservation_time: &str,
        guest_count: i32,
        table_number: i32,
        notes: Option<String>,
    ) -> AppResult<Self> {
        let customer_name = customer_name.into();
        let customer_phone = customer_phone.into();

        validate_required_text(&customer_name, "customer_name", MAX_NAME_LEN)?;
        validate_required_text(&customer_phone, "customer_phone", MAX_PHONE_LEN)?;
        validate_optional_text(notes.as_deref(), "notes", MAX_NOTE_LEN)?;

        if guest_count < 1 {
            return Err(AppError::validation("Guest count must be at least 1"));
        }
        if table_number < 1 {
            return Err(AppError::validation("Table number must be at least 1"));
        }

        let reservation_time = parse_reservation_time(reservation_time)?;

        Ok(Self {
            meta: EntityMeta::new(),
            reservation_number: shared::util::reservation_number(),
            customer_name,
            customer_phone,
            reservation_date: reservation_date.date_naive(),
            reservation_time,
            guest_count,
            table_number,
            notes,
            status: ReservationStatus::Pending,
            items: Vec::new(),
            total_amount: Money::ZERO,
        })
    }

    /// Add a pre-ordered item; same merge rule as orders.
    pub fn add_item(
        &mut self,
        dish_id: Uuid,
        dish_name_ka: &str,
        dish_name_en: &str,
        quantity: i32,
        unit_price: Money,
        special_instructions: Option<String>,
    ) -> AppResult<()> {
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.merges_with(dish_id, special_instructions.as_deref()))
        {
            let merged = existing
                .quantity()
                .checked_add(quantity)
                .ok_or_else(|| AppError::validation("Quantity is too large"))?;
            existing.update_quantity(merged)?;
        } else {
            let item = LineItem::new(
                dish_id,
                dish_name_ka,
                dish_name_en,
                quantity,
                unit_price,
                special_instructions,
            )?;
            self.items.push(item);
        }

        self.recalculate_total();
        self.meta.touch();
        Ok(())
    }

    /// Move the reservation to a new status. Cancelled blocks everything.
    pub fn update_status(&mut self, new_status: ReservationStatus) -> AppResult<()> {
        if self.status == ReservationStatus::Cancelled {
            return Err(AppError::with_message(
                ErrorCode::ReservationAlreadyCancelled,
                "Cannot update status of a cancelled reservation",
            ));
        }
        self.status = new_status;
        self.meta.touch();
        Ok(())
    }

    /// Cancel the reservation. Completed and cancelled reservations refuse.
    pub fn cancel(&mut self) -> AppResult<()> {
        match self.status {
            ReservationStatus::Completed => Err(AppError::with_message(
                ErrorCode::ReservationCompleted,
                "Cannot cancel a completed reservation",
            )),
            ReservationStatus::Cancelled => Err(AppError::with_message(
                ErrorCode::ReservationAlreadyCancelled,
                "Reservation has already been cancelled",
            )),
            _ => {
                self.status = ReservationStatus::Cancelled;
                self.meta.touch();
                Ok(())
            }
        }
    }

    /// Confirm a pending reservation.
    pub fn confirm(&mut self) -> AppResult<()> {
        if self.status != ReservationStatus::Pending {
            return Err(AppError::invalid_transition(
                "Only pending reservations can be confirmed",
            ));
        }
        self.status = ReservationStatus::Confirmed;
        self.meta.touch();
        Ok(())
    }

    fn recalculate_total(&mut self) {
        self.total_amount = self.items.iter().map(|i| i.total_price()).sum();
    }

    pub fn id(&self) -> Uuid {
        self.meta.id
    }

    pub fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    pub fn reservation_number(&self) -> &str {
        &self.reservation_number
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn customer_phone(&self) -> &str {
        &self.customer_phone
    }

    pub fn reservation_date(&self) -> NaiveDate {
        self.reservation_date
    }

    pub fn reservation_time(&self) -> NaiveTime {
        self.reservation_time
    }

    pub fn guest_count(&self) -> i32 {
        self.guest_count
    }

    pub fn table_number(&self) -> i32 {
        self.table_number
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn status(&self) -> ReservationStatus {
        self.status
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn dinner_reservation() -> Reservation {
        let date = Utc.with_ymd_and_hms(2025, 6, 14, 15, 42, 7).unwrap();
        Reservation::create("Nino", "+995 599 112233", date, "19:30", 4, 7, None).unwrap()
    }

    #[test]
    fn test_create_normalizes_date_and_parses_time() {
        let res = dinner_reservation();
        assert_eq!(res.status(), ReservationStatus::Pending);
        assert_eq!(
            res.reservation_date(),
            NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()
        );
        assert_eq!(
            res.reservation_time(),
            NaiveTime::from_hms_opt(19, 30, 0).unwrap()
        );
        assert!(res.reservation_number().starts_with("RES-"));
    }

    #[test]
    fn test_time_parse_is_strict() {
        let date = Utc::now();
        for bad in ["7:30 PM", "25:00", "19:61", "1930", ""] {
            let err = Reservation::create("Nino", "+995 599", date, bad, 2, 1, None).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidReservationTime, "time '{bad}'");
        }
    }

    #[test]
    fn test_create_validates_counts() {
        let date = Utc::now();
        assert!(Reservation::create("Nino", "+995 599", date, "19:00", 0, 1, None).is_err());
        assert!(Reservation::create("Nino", "+995 599", date, "19:00", 2, 0, None).is_err());
        assert!(Reservation::create(" ", "+995 599", date, "19:00", 2, 1, None).is_err());
    }

    #[test]
    fn test_add_item_merges_and_totals() {
        let mut res = dinner_reservation();
        let dish = Uuid::new_v4();

        res.add_item(dish, "მწვადი", "Mtsvadi", 2, dec!(15.00), None)
            .unwrap();
        res.add_item(dish, "მწვადი", "Mtsvadi", 1, dec!(15.00), None)
            .unwrap();

        assert_eq!(res.items().len(), 1);
        assert_eq!(res.items()[0].quantity(), 3);
        assert_eq!(res.total_amount(), dec!(45.00));
    }

    #[test]
    fn test_merge_rejects_quantity_overflow() {
        let mut res = dinner_reservation();
        let dish = Uuid::new_v4();

        res.add_item(dish, "მწვადი", "Mtsvadi", i32::MAX, dec!(15.00), None)
            .unwrap();
        let err = res
            .add_item(dish, "მწვადი", "Mtsvadi", 1, dec!(15.00), None)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(res.items()[0].quantity(), i32::MAX);
    }

    #[test]
    fn test_confirm_then_complete() {
        let mut res = dinner_reservation();
        res.confirm().unwrap();
        assert_eq!(res.status(), ReservationStatus::Confirmed);

        res.update_status(ReservationStatus::Completed).unwrap();
        assert_eq!(res.status(), ReservationStatus::Completed);
    }

    #[test]
    fn test_confirm_requires_pending() {
        let mut res = dinner_reservation();
        res.confirm().unwrap();
        let err = res.confirm().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTransition);
    }

    #[test]
    fn test_cancel_rules() {
        let mut pending = dinner_reservation();
        pending.cancel().unwrap();
        assert_eq!(pending.status(), ReservationStatus::Cancelled);
        let err = pending.cancel().unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationAlreadyCancelled);

        let mut done = dinner_reservation();
        done.update_status(ReservationStatus::Completed).unwrap();
        let err = done.cancel().unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationCompleted);
    }

    #[test]
    fn test_cancelled_blocks_all_updates() {
        let mut res = dinner_reservation();
        res.cancel().unwrap();

        for status in [
            ReservationStatus::Pending,
            ReservationStatus::Confirmed,
            ReservationStatus::Completed,
        ] {
            let err = res.update_status(status).unwrap_err();
            assert_eq!(err.code, ErrorCode::ReservationAlreadyCancelled);
        }
    }
}
