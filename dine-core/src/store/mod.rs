//! Persistence and blob-storage collaborators
//!
//! The core never does I/O itself. Everything it needs from the outside
//! world sits behind the async traits in this module; [`memory`] provides
//! the in-process implementation used by the services' tests and by
//! single-node deployments.

pub mod memory;

pub use memory::{MemoryImageStorage, MemoryStore};

use crate::domain::{
    Dish, DishCategory, Order, OrderStatus, Reservation, ReservationStatus, TableSession,
};
use async_trait::async_trait;
use shared::{AppError, ErrorCode};
use thiserror::Error;
use uuid::Uuid;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            StoreError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            StoreError::Storage(msg) => AppError::storage(msg),
        }
    }
}

/// Dish lookup and persistence
///
/// `get_by_id` returns soft-deleted dishes too; callers that must reject
/// deleted records check `is_deleted()` themselves. The list operations
/// split along the active/deleted line.
#[async_trait]
pub trait DishStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Dish>>;
    async fn exists_active_in_category(&self, category_id: Uuid) -> StoreResult<bool>;
    async fn add(&self, dish: &Dish) -> StoreResult<()>;
    async fn update(&self, dish: &Dish) -> StoreResult<()>;
    async fn list_active(&self) -> StoreResult<Vec<Dish>>;
    async fn list_deleted(&self) -> StoreResult<Vec<Dish>>;
}

#[async_trait]
pub trait DishCategoryStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<DishCategory>>;
    async fn add(&self, category: &DishCategory) -> StoreResult<()>;
    async fn update(&self, category: &DishCategory) -> StoreResult<()>;
    async fn list_active(&self) -> StoreResult<Vec<DishCategory>>;
    async fn list_deleted(&self) -> StoreResult<Vec<DishCategory>>;
}

/// Order persistence
///
/// `add` enforces order-number uniqueness with a `Duplicate` error.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Order>>;
    async fn get_by_number(&self, order_number: &str) -> StoreResult<Option<Order>>;
    async fn add(&self, order: &Order) -> StoreResult<()>;
    async fn update(&self, order: &Order) -> StoreResult<()>;
    async fn list_by_status(&self, status: OrderStatus) -> StoreResult<Vec<Order>>;
    async fn list_for_session(&self, session_id: Uuid) -> StoreResult<Vec<Order>>;
}

#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Reservation>>;
    async fn get_by_number(&self, reservation_number: &str) -> StoreResult<Option<Reservation>>;
    async fn add(&self, reservation: &Reservation) -> StoreResult<()>;
    async fn update(&self, reservation: &Reservation) -> StoreResult<()>;
    async fn list_by_status(&self, status: ReservationStatus) -> StoreResult<Vec<Reservation>>;
}

/// Table-session persistence
///
/// `add` is the uniqueness point for the "at most one Active session per
/// table" rule: inserting a second active session for the same table fails
/// with `Duplicate`. Concurrent session creation resolves here, not in
/// the aggregates.
#[async_trait]
pub trait TableSessionStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<TableSession>>;
    async fn get_active_for_table(&self, table_number: i32) -> StoreResult<Option<TableSession>>;
    async fn add(&self, session: &TableSession) -> StoreResult<()>;
    async fn update(&self, session: &TableSession) -> StoreResult<()>;
}

/// One logical operation's persistence boundary
///
/// Services stage all their writes, then call `commit` exactly once; a
/// failure before the commit leaves nothing persisted.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Flush staged writes. Returns the number of records written.
    async fn commit(&self) -> StoreResult<usize>;
}

/// Uploaded blob reference returned by [`ImageStorage::upload`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub url: String,
    pub public_id: String,
}

/// External blob storage for dish images
#[async_trait]
pub trait ImageStorage: Send + Sync {
    async fn upload(&self, file_name: &str, bytes: &[u8]) -> StoreResult<StoredImage>;
    async fn delete(&self, public_id: &str) -> StoreResult<()>;
}
