//! Table-session workflows

use crate::domain::{Order, TableSession};
use crate::store::{OrderStore, TableSessionStore, UnitOfWork};
use shared::{AppError, AppResult, ErrorCode};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct TableSessionService {
    sessions: Arc<dyn TableSessionStore>,
    orders: Arc<dyn OrderStore>,
    uow: Arc<dyn UnitOfWork>,
}

impl TableSessionService {
    pub fn new(
        sessions: Arc<dyn TableSessionStore>,
        orders: Arc<dyn OrderStore>,
        uow: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            sessions,
            orders,
            uow,
        }
    }

    /// Close a session after a final total recomputation.
    pub async fn close(&self, session_id: Uuid) -> AppResult<TableSession> {
        let mut session = self.load(session_id).await?;
        let orders = self.orders.list_for_session(session_id).await?;
        session.recalculate_total(&orders);
        session.close()?;

        self.sessions.update(&session).await?;
        self.uow.commit().await?;

        info!(
            session = %session.session_number(),
            table = session.table_number(),
            total = %session.total_amount(),
            "table session closed"
        );
        Ok(session)
    }

    /// Re-sum the session total from its stored orders.
    pub async fn recalculate_total(&self, session_id: Uuid) -> AppResult<TableSession> {
        let mut session = self.load(session_id).await?;
        let orders = self.orders.list_for_session(session_id).await?;
        session.recalculate_total(&orders);

        self.sessions.update(&session).await?;
        self.uow.commit().await?;
        Ok(session)
    }

    /// Load a session together with all orders placed under it.
    pub async fn get_with_orders(&self, session_id: Uuid) -> AppResult<(TableSession, Vec<Order>)> {
        let session = self.load(session_id).await?;
        let orders = self.orders.list_for_session(session_id).await?;
        Ok((session, orders))
    }

    pub async fn get_active_for_table(&self, table_number: i32) -> AppResult<Option<TableSession>> {
        Ok(self.sessions.get_active_for_table(table_number).await?)
    }

    async fn load(&self, session_id: Uuid) -> AppResult<TableSession> {
        self.sessions.get_by_id(session_id).await?.ok_or_else(|| {
            AppError::with_message(
                ErrorCode::TableSessionNotFound,
                format!("Table session {session_id} not found"),
            )
        })
    }
}
