//! Restaurant order/reservation/table-session consistency core
//!
//! Aggregate entities enforcing business invariants (status lifecycles,
//! monetary totals, quantity merging, soft-delete/restore) plus the
//! orchestration services that keep related aggregates mutually consistent.
//! Persistence, transport and blob storage live behind the collaborator
//! traits in [`store`].

pub mod domain;
pub mod logging;
pub mod services;
pub mod store;

// Re-exports
pub use domain::{
    Dish, DishAttributes, DishCategory, DishImage, EntityMeta, LineItem, Order, OrderStatus,
    OrderType, Reservation, ReservationStatus, TableSession, TableSessionStatus,
};
pub use services::{CatalogService, OrderService, ReservationService, TableSessionService};
pub use shared::{AppError, AppResult, ErrorCategory, ErrorCode};
