//! In-memory store
//!
//! DashMap-backed implementation of every store trait. Writes land
//! immediately; the unit-of-work only counts them, so "commit" here means
//! "how many records this operation wrote", which is what the services
//! assert on in tests.

use super::{
    DishCategoryStore, DishStore, ImageStorage, OrderStore, ReservationStore, StoreError,
    StoreResult, StoredImage, TableSessionStore, UnitOfWork,
};
use crate::domain::{
    Dish, DishCategory, Order, OrderStatus, Reservation, ReservationStatus, TableSession,
};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    dishes: DashMap<Uuid, Dish>,
    categories: DashMap<Uuid, DishCategory>,
    orders: DashMap<Uuid, Order>,
    order_numbers: DashMap<String, Uuid>,
    reservations: DashMap<Uuid, Reservation>,
    reservation_numbers: DashMap<String, Uuid>,
    sessions: DashMap<Uuid, TableSession>,
    // table number -> its single active session
    active_tables: DashMap<i32, Uuid>,
    staged: AtomicUsize,
    commits: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn record_write(&self) {
        self.staged.fetch_add(1, Ordering::SeqCst);
    }

    /// Commits performed so far. Test hook.
    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    /// Writes staged since the last commit. Test hook.
    pub fn staged_writes(&self) -> usize {
        self.staged.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DishStore for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Dish>> {
        Ok(self.dishes.get(&id).map(|d| d.clone()))
    }

    async fn exists_active_in_category(&self, category_id: Uuid) -> StoreResult<bool> {
        Ok(self
            .dishes
            .iter()
            .any(|d| d.category_id() == category_id && !d.is_deleted()))
    }

    async fn add(&self, dish: &Dish) -> StoreResult<()> {
        if self.dishes.contains_key(&dish.id()) {
            return Err(StoreError::Duplicate(format!("dish {}", dish.id())));
        }
        self.dishes.insert(dish.id(), dish.clone());
        self.record_write();
        Ok(())
    }

    async fn update(&self, dish: &Dish) -> StoreResult<()> {
        if !self.dishes.contains_key(&dish.id()) {
            return Err(StoreError::NotFound(format!("dish {}", dish.id())));
        }
        self.dishes.insert(dish.id(), dish.clone());
        self.record_write();
        Ok(())
    }

    async fn list_active(&self) -> StoreResult<Vec<Dish>> {
        Ok(self
            .dishes
            .iter()
            .filter(|d| !d.is_deleted())
            .map(|d| d.clone())
            .collect())
    }

    async fn list_deleted(&self) -> StoreResult<Vec<Dish>> {
        Ok(self
            .dishes
            .iter()
            .filter(|d| d.is_deleted())
            .map(|d| d.clone())
            .collect())
    }
}

#[async_trait]
impl DishCategoryStore for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<DishCategory>> {
        Ok(self.categories.get(&id).map(|c| c.clone()))
    }

    async fn add(&self, category: &DishCategory) -> StoreResult<()> {
        if self.categories.contains_key(&category.id()) {
            return Err(StoreError::Duplicate(format!("category {}", category.id())));
        }
        self.categories.insert(category.id(), category.clone());
        self.record_write();
        Ok(())
    }

    async fn update(&self, category: &DishCategory) -> StoreResult<()> {
        if !self.categories.contains_key(&category.id()) {
            return Err(StoreError::NotFound(format!("category {}", category.id())));
        }
        self.categories.insert(category.id(), category.clone());
        self.record_write();
        Ok(())
    }

    async fn list_active(&self) -> StoreResult<Vec<DishCategory>> {
        Ok(self
            .categories
            .iter()
            .filter(|c| !c.is_deleted())
            .map(|c| c.clone())
            .collect())
    }

    async fn list_deleted(&self) -> StoreResult<Vec<DishCategory>> {
        Ok(self
            .categories
            .iter()
            .filter(|c| c.is_deleted())
            .map(|c| c.clone())
            .collect())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Order>> {
        Ok(self.orders.get(&id).map(|o| o.clone()))
    }

    async fn get_by_number(&self, order_number: &str) -> StoreResult<Option<Order>> {
        let Some(id) = self.order_numbers.get(order_number).map(|e| *e) else {
            return Ok(None);
        };
        Ok(self.orders.get(&id).map(|o| o.clone()))
    }

    async fn add(&self, order: &Order) -> StoreResult<()> {
        if self.orders.contains_key(&order.id())
            || self.order_numbers.contains_key(order.order_number())
        {
            return Err(StoreError::Duplicate(format!(
                "order {}",
                order.order_number()
            )));
        }
        self.order_numbers
            .insert(order.order_number().to_string(), order.id());
        self.orders.insert(order.id(), order.clone());
        self.record_write();
        Ok(())
    }

    async fn update(&self, order: &Order) -> StoreResult<()> {
        if !self.orders.contains_key(&order.id()) {
            return Err(StoreError::NotFound(format!("order {}", order.id())));
        }
        self.orders.insert(order.id(), order.clone());
        self.record_write();
        Ok(())
    }

    async fn list_by_status(&self, status: OrderStatus) -> StoreResult<Vec<Order>> {
        Ok(self
            .orders
            .iter()
            .filter(|o| o.status() == status)
            .map(|o| o.clone())
            .collect())
    }

    async fn list_for_session(&self, session_id: Uuid) -> StoreResult<Vec<Order>> {
        Ok(self
            .orders
            .iter()
            .filter(|o| o.table_session_id() == Some(session_id))
            .map(|o| o.clone())
            .collect())
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Reservation>> {
        Ok(self.reservations.get(&id).map(|r| r.clone()))
    }

    async fn get_by_number(&self, reservation_number: &str) -> StoreResult<Option<Reservation>> {
        let Some(id) = self.reservation_numbers.get(reservation_number).map(|e| *e) else {
            return Ok(None);
        };
        Ok(self.reservations.get(&id).map(|r| r.clone()))
    }

    async fn add(&self, reservation: &Reservation) -> StoreResult<()> {
        if self.reservations.contains_key(&reservation.id())
            || self
                .reservation_numbers
                .contains_key(reservation.reservation_number())
        {
            return Err(StoreError::Duplicate(format!(
                "reservation {}",
                reservation.reservation_number()
            )));
        }
        self.reservation_numbers
            .insert(reservation.reservation_number().to_string(), reservation.id());
        self.reservations.insert(reservation.id(), reservation.clone());
        self.record_write();
        Ok(())
    }

    async fn update(&self, reservation: &Reservation) -> StoreResult<()> {
        if !self.reservations.contains_key(&reservation.id()) {
            return Err(StoreError::NotFound(format!(
                "reservation {}",
                reservation.id()
            )));
        }
        self.reservations.insert(reservation.id(), reservation.clone());
        self.record_write();
        Ok(())
    }

    async fn list_by_status(&self, status: ReservationStatus) -> StoreResult<Vec<Reservation>> {
        Ok(self
            .reservations
            .iter()
            .filter(|r| r.status() == status)
            .map(|r| r.clone())
            .collect())
    }
}

#[async_trait]
impl TableSessionStore for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<TableSession>> {
        Ok(self.sessions.get(&id).map(|s| s.clone()))
    }

    async fn get_active_for_table(&self, table_number: i32) -> StoreResult<Option<TableSession>> {
        let Some(id) = self.active_tables.get(&table_number).map(|e| *e) else {
            return Ok(None);
        };
        Ok(self
            .sessions
            .get(&id)
            .filter(|s| s.is_active())
            .map(|s| s.clone()))
    }

    async fn add(&self, session: &TableSession) -> StoreResult<()> {
        if self.sessions.contains_key(&session.id()) {
            return Err(StoreError::Duplicate(format!("session {}", session.id())));
        }
        if session.is_active() {
            // entry() holds the shard lock, so two concurrent adds for the
            // same table cannot both pass this check
            use dashmap::mapref::entry::Entry;
            match self.active_tables.entry(session.table_number()) {
                Entry::Occupied(mut occupied) => {
                    let existing_active = self
                        .sessions
                        .get(occupied.get())
                        .map(|s| s.is_active())
                        .unwrap_or(false);
                    if existing_active {
                        return Err(StoreError::Duplicate(format!(
                            "active session already exists for table {}",
                            session.table_number()
                        )));
                    }
                    occupied.insert(session.id());
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(session.id());
                }
            }
        }
        self.sessions.insert(session.id(), session.clone());
        self.record_write();
        Ok(())
    }

    async fn update(&self, session: &TableSession) -> StoreResult<()> {
        if !self.sessions.contains_key(&session.id()) {
            return Err(StoreError::NotFound(format!("session {}", session.id())));
        }
        if !session.is_active() {
            self.active_tables
                .remove_if(&session.table_number(), |_, id| *id == session.id());
        }
        self.sessions.insert(session.id(), session.clone());
        self.record_write();
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for MemoryStore {
    async fn commit(&self) -> StoreResult<usize> {
        let written = self.staged.swap(0, Ordering::SeqCst);
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(written)
    }
}

/// In-memory blob storage with a failure toggle for dependency tests
#[derive(Default)]
pub struct MemoryImageStorage {
    blobs: DashMap<String, Vec<u8>>,
    fail_uploads: AtomicBool,
}

impl MemoryImageStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn contains(&self, public_id: &str) -> bool {
        self.blobs.contains_key(public_id)
    }
}

#[async_trait]
impl ImageStorage for MemoryImageStorage {
    async fn upload(&self, file_name: &str, bytes: &[u8]) -> StoreResult<StoredImage> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StoreError::Storage("image upload failed".into()));
        }
        let public_id = Uuid::new_v4().simple().to_string();
        self.blobs.insert(public_id.clone(), bytes.to_vec());
        Ok(StoredImage {
            url: format!("memory://{public_id}/{file_name}"),
            public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> StoreResult<()> {
        self.blobs
            .remove(public_id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("image {public_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderType;

    fn open_session(table: i32) -> TableSession {
        TableSession::open(table, "Giorgi", "+995 555").unwrap()
    }

    #[tokio::test]
    async fn test_one_active_session_per_table() {
        let store = MemoryStore::new();
        let first = open_session(5);
        let second = open_session(5);

        TableSessionStore::add(&store, &first).await.unwrap();
        let err = TableSessionStore::add(&store, &second).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));

        // a different table is fine
        TableSessionStore::add(&store, &open_session(6)).await.unwrap();
    }

    #[tokio::test]
    async fn test_closing_session_frees_the_table() {
        let store = MemoryStore::new();
        let mut session = open_session(5);
        TableSessionStore::add(&store, &session).await.unwrap();

        session.close().unwrap();
        TableSessionStore::update(&store, &session).await.unwrap();
        assert!(store.get_active_for_table(5).await.unwrap().is_none());

        TableSessionStore::add(&store, &open_session(5)).await.unwrap();
    }

    #[tokio::test]
    async fn test_order_number_lookup_and_uniqueness() {
        let store = MemoryStore::new();
        let order = Order::create("Giorgi", "+995 555", OrderType::TakeAway, None, None, None)
            .unwrap();

        OrderStore::add(&store, &order).await.unwrap();
        let found = OrderStore::get_by_number(&store, order.order_number())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id(), order.id());

        let err = OrderStore::add(&store, &order).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_update_requires_existing_record() {
        let store = MemoryStore::new();
        let order = Order::create("Giorgi", "+995 555", OrderType::TakeAway, None, None, None)
            .unwrap();
        let err = OrderStore::update(&store, &order).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_commit_counts_staged_writes() {
        let store = MemoryStore::new();
        TableSessionStore::add(&store, &open_session(1)).await.unwrap();
        TableSessionStore::add(&store, &open_session(2)).await.unwrap();
        assert_eq!(store.staged_writes(), 2);

        let written = store.commit().await.unwrap();
        assert_eq!(written, 2);
        assert_eq!(store.staged_writes(), 0);
        assert_eq!(store.commit_count(), 1);
    }

    #[tokio::test]
    async fn test_image_storage_round_trip_and_failure_toggle() {
        let storage = MemoryImageStorage::new();
        let stored = storage.upload("khinkali.jpg", b"bytes").await.unwrap();
        assert!(storage.contains(&stored.public_id));

        storage.delete(&stored.public_id).await.unwrap();
        assert!(!storage.contains(&stored.public_id));

        storage.set_fail_uploads(true);
        let err = storage.upload("khinkali.jpg", b"bytes").await.unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));
    }
}
