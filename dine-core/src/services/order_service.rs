//! Order workflows
//!
//! Order creation is the one genuinely cross-aggregate path: it validates
//! the request, snapshots dishes into line items, resolves or opens the
//! table session for dine-in orders, and persists everything under a
//! single commit.

use super::requests::{CreateOrderRequest, LineItemRequest};
use crate::domain::{Dish, Order, OrderStatus, OrderType, TableSession};
use crate::store::{DishStore, OrderStore, StoreError, TableSessionStore, UnitOfWork};
use shared::{AppError, AppResult, ErrorCode, Money};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

enum SessionBinding {
    Reused(TableSession),
    Opened(TableSession),
}

#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderStore>,
    sessions: Arc<dyn TableSessionStore>,
    dishes: Arc<dyn DishStore>,
    uow: Arc<dyn UnitOfWork>,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        sessions: Arc<dyn TableSessionStore>,
        dishes: Arc<dyn DishStore>,
        uow: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            orders,
            sessions,
            dishes,
            uow,
        }
    }

    /// Create an order from an inbound request.
    ///
    /// Dine-in orders with a table number get bound to that table's active
    /// session, opening one when none exists. All writes land in one
    /// commit; any validation failure persists nothing.
    pub async fn create_order(&self, request: CreateOrderRequest) -> AppResult<Order> {
        let order_type: OrderType = request.order_type.parse()?;

        if request.items.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::OrderEmpty,
                "Order must contain at least one item",
            ));
        }

        let mut order = Order::create(
            request.customer_name.clone(),
            request.customer_phone.clone(),
            order_type,
            request.customer_address.clone(),
            request.table_number,
            request.notes.clone(),
        )?;

        for item in &request.items {
            let dish = self.resolve_dish(item.dish_id).await?;
            order.add_item(
                dish.id(),
                dish.name_ka(),
                dish.name_en(),
                item.quantity,
                dish.price().unwrap_or(Money::ZERO),
                item.special_instructions.clone(),
            )?;
        }

        let binding = if order_type == OrderType::DineIn {
            match request.table_number {
                Some(table) => Some(self.resolve_session(&request, table).await?),
                None => None,
            }
        } else {
            None
        };

        match binding {
            Some(SessionBinding::Reused(mut session)) => {
                order.set_table_session(session.id());
                session.add_order(&order)?;
                self.sessions.update(&session).await?;
            }
            Some(SessionBinding::Opened(mut session)) => {
                order.set_table_session(session.id());
                session.add_order(&order)?;
                match self.sessions.add(&session).await {
                    Ok(()) => {
                        info!(
                            session = %session.session_number(),
                            table = session.table_number(),
                            "opened table session"
                        );
                    }
                    Err(StoreError::Duplicate(_)) => {
                        // lost the race for this table; fall back to the winner
                        warn!(table = session.table_number(), "concurrent session creation, reusing winner");
                        let mut winner = self
                            .sessions
                            .get_active_for_table(session.table_number())
                            .await?
                            .ok_or_else(|| {
                                AppError::with_message(
                                    ErrorCode::TableSessionExists,
                                    "Active session for this table vanished during creation",
                                )
                            })?;
                        order.set_table_session(winner.id());
                        winner.add_order(&order)?;
                        self.sessions.update(&winner).await?;
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            None => {}
        }

        self.orders.add(&order).await?;
        self.uow.commit().await?;

        info!(
            order = %order.order_number(),
            order_type = %order.order_type(),
            items = order.items().len(),
            "order created"
        );
        Ok(order)
    }

    /// Add an item to an existing order, refreshing the bound session total.
    pub async fn add_item(&self, order_id: Uuid, item: LineItemRequest) -> AppResult<Order> {
        let mut order = self.load_order(order_id).await?;
        let dish = self.resolve_dish(item.dish_id).await?;

        order.add_item(
            dish.id(),
            dish.name_ka(),
            dish.name_en(),
            item.quantity,
            dish.price().unwrap_or(Money::ZERO),
            item.special_instructions,
        )?;

        self.orders.update(&order).await?;
        self.refresh_session_total(&order).await?;
        self.uow.commit().await?;
        Ok(order)
    }

    /// Remove a line item, refreshing the bound session total.
    pub async fn remove_item(&self, order_id: Uuid, item_id: Uuid) -> AppResult<Order> {
        let mut order = self.load_order(order_id).await?;
        order.remove_item(item_id)?;

        self.orders.update(&order).await?;
        self.refresh_session_total(&order).await?;
        self.uow.commit().await?;
        Ok(order)
    }

    pub async fn update_status(&self, order_id: Uuid, status: OrderStatus) -> AppResult<Order> {
        let mut order = self.load_order(order_id).await?;
        order.update_status(status)?;

        self.orders.update(&order).await?;
        self.uow.commit().await?;

        info!(order = %order.order_number(), status = %status, "order status updated");
        Ok(order)
    }

    pub async fn cancel(&self, order_id: Uuid) -> AppResult<Order> {
        let mut order = self.load_order(order_id).await?;
        order.cancel()?;

        self.orders.update(&order).await?;
        self.refresh_session_total(&order).await?;
        self.uow.commit().await?;

        info!(order = %order.order_number(), "order cancelled");
        Ok(order)
    }

    pub async fn confirm(&self, order_id: Uuid) -> AppResult<Order> {
        let mut order = self.load_order(order_id).await?;
        order.confirm()?;

        self.orders.update(&order).await?;
        self.uow.commit().await?;

        info!(order = %order.order_number(), "order confirmed");
        Ok(order)
    }

    pub async fn get(&self, order_id: Uuid) -> AppResult<Order> {
        self.load_order(order_id).await
    }

    pub async fn get_by_number(&self, order_number: &str) -> AppResult<Order> {
        self.orders
            .get_by_number(order_number)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::OrderNotFound,
                    format!("Order {order_number} not found"),
                )
            })
    }

    async fn load_order(&self, order_id: Uuid) -> AppResult<Order> {
        self.orders.get_by_id(order_id).await?.ok_or_else(|| {
            AppError::with_message(ErrorCode::OrderNotFound, format!("Order {order_id} not found"))
        })
    }

    /// Resolve a dish for a line item: missing and soft-deleted both read
    /// as not found, unavailable is a distinct conflict.
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

    async fn resolve_session(
        &self,
        request: &CreateOrderRequest,
        table: i32,
    ) -> AppResult<SessionBinding> {
        if let Some(session_id) = request.table_session_id {
            let session = self.sessions.get_by_id(session_id).await?.ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::TableSessionNotFound,
                    format!("Table session {session_id} not found"),
                )
            })?;
            if !session.is_active() {
                return Err(AppError::with_message(
                    ErrorCode::TableSessionClosed,
                    "Cannot attach an order to a closed table session",
                ));
            }
            return Ok(SessionBinding::Reused(session));
        }

        match self.sessions.get_active_for_table(table).await? {
            Some(session) => Ok(SessionBinding::Reused(session)),
            None => {
                let session = TableSession::open(
                    table,
                    request.customer_name.clone(),
                    request.customer_phone.clone(),
                )?;
                Ok(SessionBinding::Opened(session))
            }
        }
    }

    /// Re-sum the bound session's total from its stored orders.
    ///
    /// Runs after the order itself has been written, so the session sees
    /// the fresh totals.
    async fn refresh_session_total(&self, order: &Order) -> AppResult<()> {
        let Some(session_id) = order.table_session_id() else {
            return Ok(());
        };
        let Some(mut session) = self.sessions.get_by_id(session_id).await? else {
            return Ok(());
        };
        let orders = self.orders.list_for_session(session_id).await?;
        session.recalculate_total(&orders);
        self.sessions.update(&session).await?;
        Ok(())
    }
}
