//! Domain aggregates
//!
//! Rich entities constructed through validating factories and mutated only
//! through named operations. No raw field setters are exposed; every
//! mutation maintains the aggregate's invariants before returning.

pub mod dish;
pub mod dish_category;
pub mod line_item;
pub mod order;
pub mod reservation;
pub mod table_session;

pub use dish::{Dish, DishAttributes, DishImage};
pub use dish_category::DishCategory;
pub use line_item::LineItem;
pub use order::{Order, OrderStatus, OrderType};
pub use reservation::{Reservation, ReservationStatus};
pub use table_session::{TableSession, TableSessionStatus};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity and audit timestamps shared by all entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMeta {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EntityMeta {
    pub fn new() -> Self {
        let now = shared::util::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Bump the last-update timestamp
    pub fn touch(&mut self) {
        self.updated_at = shared::util::now();
    }
}

impl Default for EntityMeta {
    fn default() -> Self {
        Self::new()
    }
}

/// Soft-delete state for catalog entities
///
/// A tagged state instead of a bool plus nullable timestamp: a deletion
/// timestamp cannot exist without the deleted flag, and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeleteState {
    #[default]
    Active,
    Deleted {
        at: DateTime<Utc>,
    },
}

impl DeleteState {
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteState::Deleted { .. })
    }

    pub fn delete(&mut self) {
        *self = DeleteState::Deleted {
            at: shared::util::now(),
        };
    }

    pub fn restore(&mut self) {
        *self = DeleteState::Active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_meta_touch_moves_updated_at() {
        let mut meta = EntityMeta::new();
        let before = meta.updated_at;
        meta.touch();
        assert!(meta.updated_at >= before);
        assert!(meta.created_at <= meta.updated_at);
    }

    #[test]
    fn test_delete_state_roundtrip() {
        let mut state = DeleteState::Active;
        assert!(!state.is_deleted());

        state.delete();
        assert!(state.is_deleted());

        state.restore();
        assert_eq!(state, DeleteState::Active);
    }

    #[test]
    fn test_delete_state_serializes_tagged() {
        let json = serde_json::to_string(&DeleteState::Active).unwrap();
        assert_eq!(json, r#"{"state":"ACTIVE"}"#);

        let mut state = DeleteState::Active;
        state.delete();
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains(r#""state":"DELETED""#));
        assert!(json.contains("at"));
    }
}
