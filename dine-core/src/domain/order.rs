//! Order aggregate

use super::{EntityMeta, LineItem};
use serde::{Deserialize, Serialize};
use shared::validation::{
    validate_optional_text, validate_required_text, MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN,
    MAX_PHONE_LEN,
};
use shared::{AppError, AppResult, ErrorCode, Money};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// How the order is fulfilled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    DineIn,
    TakeAway,
    Delivery,
}

impl FromStr for OrderType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Case-insensitive; underscores tolerated ("dine_in" == "DineIn")
        match s.to_ascii_lowercase().replace('_', "").as_str() {
            "dinein" => Ok(OrderType::DineIn),
            "takeaway" => Ok(OrderType::TakeAway),
            "delivery" => Ok(OrderType::Delivery),
            _ => Err(AppError::with_message(
                ErrorCode::InvalidOrderType,
                format!("Invalid order type: {s}. Valid types are: DineIn, TakeAway, Delivery."),
            )),
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderType::DineIn => "DineIn",
            OrderType::TakeAway => "TakeAway",
            OrderType::Delivery => "Delivery",
        };
        write!(f, "{s}")
    }
}

/// Order lifecycle status
///
/// Persisted as its string name; transition rules live in an explicit
/// table ([`OrderStatus::can_transition`]), never in enum ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Allowed-transition table.
    ///
    /// Forward-only along Pending → Confirmed → Preparing → Ready →
    /// Delivered; re-asserting the current status is a permitted no-op;
    /// Cancelled is reachable only from Pending/Confirmed and is terminal,
    /// as is Delivered.
    pub fn can_transition(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (Cancelled, _) => false,
            (current, next) if current == next => true,
            (Pending | Confirmed, Cancelled) => true,
            (_, Cancelled) => false,
            (Pending, _) => true,
            (Confirmed, Preparing | Ready | Delivered) => true,
            (Preparing, Ready | Delivered) => true,
            (Ready, Delivered) => true,
            (Delivered, _) => false,
            _ => false,
        }
    }

    /// Terminal states accept no further transitions (other than the
    /// same-status no-op for Delivered).
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::Ready => "Ready",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        };
        write!(f, "{s}")
    }
}

/// Customer order (aggregate root)
///
/// Owns its line items; the total is recomputed after every item mutation
/// and is never settable from outside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    meta: EntityMeta,
    order_number: String,
    customer_name: String,
    customer_phone: String,
    customer_address: Option<String>,
    order_type: OrderType,
    status: OrderStatus,
    table_number: Option<i32>,
    notes: Option<String>,
    table_session_id: Option<Uuid>,
    items: Vec<LineItem>,
    total_amount: Money,
}

impl Order {
    /// Create a new order in `Pending` status with no items.
    pub fn create(
        customer_name: impl Into<String>,
        customer_phone: impl Into<String>,
        order_type: OrderType,
        customer_address: Option<String>,
        table_number: Option<i32>,
        notes: Option<String>,
    ) -> AppResult<Self> {
        let customer_name = customer_name.into();
        let customer_phone = customer_phone.into();

        validate_required_text(&customer_name, "customer_name", MAX_NAME_LEN)?;
        validate_required_text(&customer_phone, "customer_phone", MAX_PHONE_LEN)?;
        validate_optional_text(notes.as_deref(), "notes", MAX_NOTE_LEN)?;
        validate_optional_text(customer_address.as_deref(), "customer_address", MAX_ADDRESS_LEN)?;

        if order_type == OrderType::Delivery
            && customer_address.as_deref().is_none_or(|a| a.trim().is_empty())
        {
            return Err(AppError::validation(
                "Address is required for delivery orders",
            ));
        }

        Ok(Self {
            meta: EntityMeta::new(),
            order_number: shared::util::order_number(),
            customer_name,
            customer_phone,
            customer_address,
            order_type,
            status: OrderStatus::Pending,
            table_number,
            notes,
            table_session_id: None,
            items: Vec::new(),
            total_amount: Money::ZERO,
        })
    }

    /// Add an item, merging with an existing line when the dish id and
    /// instructions match exactly.
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

    /// Remove a line item by its id.
    pub fn remove_item(&mut self, item_id: Uuid) -> AppResult<()> {
        let before = self.items.len();
        self.items.retain(|i| i.id() != item_id);
        if self.items.len() == before {
            return Err(AppError::with_message(
                ErrorCode::OrderItemNotFound,
                format!("Order item {item_id} not found"),
            ));
        }
        self.recalculate_total();
        self.meta.touch();
        Ok(())
    }

    /// Move the order to a new status, enforcing the transition table.
    pub fn update_status(&mut self, new_status: OrderStatus) -> AppResult<()> {
        if self.status == OrderStatus::Cancelled {
            return Err(AppError::with_message(
                ErrorCode::OrderAlreadyCancelled,
                "Cannot update status of a cancelled order",
            ));
        }

        if !self.status.can_transition(new_status) {
            let code = if new_status == OrderStatus::Cancelled {
                ErrorCode::OrderNotCancellable
            } else if new_status.can_transition(self.status) {
                // the reverse direction is legal, so this is a revert
                ErrorCode::OrderStatusRegression
            } else {
                ErrorCode::InvalidTransition
            };
            return Err(AppError::with_message(
                code,
                format!("Cannot move order from {} to {}", self.status, new_status),
            ));
        }

        self.status = new_status;
        self.meta.touch();
        Ok(())
    }

    /// Cancel the order. Only `Pending` and `Confirmed` orders qualify.
    pub fn cancel(&mut self) -> AppResult<()> {
        match self.status {
            OrderStatus::Cancelled => Err(AppError::with_message(
                ErrorCode::OrderAlreadyCancelled,
                "Order has already been cancelled",
            )),
            OrderStatus::Pending | OrderStatus::Confirmed => {
                self.status = OrderStatus::Cancelled;
                self.meta.touch();
                Ok(())
            }
            status => Err(AppError::with_message(
                ErrorCode::OrderNotCancellable,
                format!(
                    "Cannot cancel order with status {status}. Only Pending or Confirmed orders can be cancelled."
                ),
            )),
        }
    }

    /// Confirm a pending, non-empty order.
    pub fn confirm(&mut self) -> AppResult<()> {
        if self.status != OrderStatus::Pending {
            return Err(AppError::invalid_transition(
                "Only pending orders can be confirmed",
            ));
        }
        if self.items.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::OrderEmpty,
                "Cannot confirm an empty order",
            ));
        }
        self.status = OrderStatus::Confirmed;
        self.meta.touch();
        Ok(())
    }

    /// Update customer contact details.
    pub fn update_customer_info(
        &mut self,
        customer_name: impl Into<String>,
        customer_phone: impl Into<String>,
        customer_address: Option<String>,
    ) -> AppResult<()> {
        let customer_name = customer_name.into();
        let customer_phone = customer_phone.into();

        validate_required_text(&customer_name, "customer_name", MAX_NAME_LEN)?;
        validate_required_text(&customer_phone, "customer_phone", MAX_PHONE_LEN)?;
        validate_optional_text(customer_address.as_deref(), "customer_address", MAX_ADDRESS_LEN)?;

        if self.order_type == OrderType::Delivery
            && customer_address.as_deref().is_none_or(|a| a.trim().is_empty())
        {
            return Err(AppError::validation(
                "Address is required for delivery orders",
            ));
        }

        self.customer_name = customer_name;
        self.customer_phone = customer_phone;
        self.customer_address = customer_address;
        self.meta.touch();
        Ok(())
    }

    /// Bind this order to a table session.
    pub fn set_table_session(&mut self, session_id: Uuid) {
        self.table_session_id = Some(session_id);
        self.meta.touch();
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

    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn customer_phone(&self) -> &str {
        &self.customer_phone
    }

    pub fn customer_address(&self) -> Option<&str> {
        self.customer_address.as_deref()
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn table_number(&self) -> Option<i32> {
        self.table_number
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn table_session_id(&self) -> Option<Uuid> {
        self.table_session_id
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }
}
