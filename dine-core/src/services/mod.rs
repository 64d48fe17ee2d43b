//! Orchestration services
//!
//! Cross-aggregate workflows. Each public operation validates everything
//! first, mutates the aggregates it loaded, stages the writes, and commits
//! the unit of work exactly once at the end. A failure anywhere before the
//! commit leaves no partial state behind.

pub mod catalog_service;
pub mod order_service;
pub mod requests;
pub mod reservation_service;
pub mod session_service;

pub use catalog_service::CatalogService;
pub use order_service::OrderService;
pub use requests::{CreateOrderRequest, CreateReservationRequest, LineItemRequest};
pub use reservation_service::ReservationService;
pub use session_service::TableSessionService;
