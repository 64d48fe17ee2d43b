//! Inbound command payloads
//!
//! Plain data as it arrives from the caller. Order type and reservation
//! time come in as text and are parsed strictly by the services; nothing
//! here is trusted until the aggregates have validated it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemRequest {
    pub dish_id: Uuid,
    pub quantity: i32,
    pub special_instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_name: String,
    pub customer_phone: String,
    /// One of DineIn / TakeAway / Delivery, case-insensitive
    pub order_type: String,
    pub customer_address: Option<String>,
    pub table_number: Option<i32>,
    /// Bind to this specific session instead of resolving by table
    pub table_session_id: Option<Uuid>,
    pub notes: Option<String>,
    pub items: Vec<LineItemRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReservationRequest {
    pub customer_name: String,
    pub customer_phone: String,
    pub reservation_date: DateTime<Utc>,
    /// Strict HH:mm
    pub reservation_time: String,
    pub guest_count: i32,
    pub table_number: i32,
    pub notes: Option<String>,
    /// Optional pre-order
    #[serde(default)]
    pub items: Vec<LineItemRequest>,
}
