//! Table sessions
//!
//! A session groups the orders placed at one table during one seating.
//! Orders are referenced by id, never owned; closing or deleting a session
//! leaves its orders intact.

use super::{EntityMeta, Order};
use serde::{Deserialize, Serialize};
use shared::validation::{validate_required_text, MAX_NAME_LEN, MAX_PHONE_LEN};
use shared::{AppError, AppResult, ErrorCode, Money};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableSessionStatus {
    Active,
    Closed,
}

impl fmt::Display for TableSessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TableSessionStatus::Active => "Active",
            TableSessionStatus::Closed => "Closed",
        };
        write!(f, "{s}")
    }
}

/// One table seating (aggregate root)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSession {
    meta: EntityMeta,
    session_number: String,
    table_number: i32,
    customer_name: String,
    customer_phone: String,
    status: TableSessionStatus,
    order_ids: Vec<Uuid>,
    total_amount: Money,
}

impl TableSession {
    /// Open a new active session for a table.
    ///
    /// Name and phone are an identity snapshot taken from whoever opened
    /// the table, usually the first order's customer.
    pub fn open(
        table_number: i32,
        customer_name: impl Into<String>,
        customer_phone: impl Into<String>,
    ) -> AppResult<Self> {
        let customer_name = customer_name.into();
        let customer_phone = customer_phone.into();

        validate_required_text(&customer_name, "customer_name", MAX_NAME_LEN)?;
        validate_required_text(&customer_phone, "customer_phone", MAX_PHONE_LEN)?;

        if table_number < 1 {
            return Err(AppError::validation("Table number must be at least 1"));
        }

        Ok(Self {
            meta: EntityMeta::new(),
            session_number: shared::util::session_number(),
            table_number,
            customer_name,
            customer_phone,
            status: TableSessionStatus::Active,
            order_ids: Vec::new(),
            total_amount: Money::ZERO,
        })
    }

    /// Attach an order to this session and add its total.
    ///
    /// Later changes to the order's contents do not propagate here on
    /// their own; callers re-run [`TableSession::recalculate_total`] after
    /// mutating an attached order.
    pub fn add_order(&mut self, order: &Order) -> AppResult<()> {
        if self.status == TableSessionStatus::Closed {
            return Err(AppError::with_message(
                ErrorCode::TableSessionClosed,
                "Cannot add an order to a closed table session",
            ));
        }
        // re-attaching is a no-op; the total was already counted
        if self.order_ids.contains(&order.id()) {
            return Ok(());
        }
        self.order_ids.push(order.id());
        self.total_amount += order.total_amount();
        self.meta.touch();
        Ok(())
    }

    /// Re-sum the session total from the attached orders.
    ///
    /// `orders` is the caller-loaded set for this session; entries not
    /// attached to it are ignored.
    pub fn recalculate_total(&mut self, orders: &[Order]) {
        self.total_amount = orders
            .iter()
            .filter(|o| self.order_ids.contains(&o.id()))
            .map(|o| o.total_amount())
            .sum();
        self.meta.touch();
    }

    /// Close the session. One-way.
    pub fn close(&mut self) -> AppResult<()> {
        if self.status == TableSessionStatus::Closed {
            return Err(AppError::with_message(
                ErrorCode::TableSessionClosed,
                "Table session is already closed",
            ));
        }
        self.status = TableSessionStatus::Closed;
        self.meta.touch();
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.status == TableSessionStatus::Active
    }

    pub fn id(&self) -> Uuid {
        self.meta.id
    }

    pub fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    pub fn session_number(&self) -> &str {
        &self.session_number
    }

    pub fn table_number(&self) -> i32 {
        self.table_number
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn customer_phone(&self) -> &str {
        &self.customer_phone
    }

    pub fn status(&self) -> TableSessionStatus {
        self.status
    }

    pub fn order_ids(&self) -> &[Uuid] {
        &self.order_ids
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }
}
