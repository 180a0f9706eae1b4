//! CancelOrderHandler - Command handler for withdrawing a pending order.

use std::sync::Arc;

use crate::application::locks::KeyedLocks;
use crate::domain::foundation::{Caller, DomainError, ErrorCode, OrderId, OwnedByUser};
use crate::ports::OrderStore;

/// Command to cancel an order.
#[derive(Debug, Clone)]
pub struct CancelOrderCommand {
    pub caller: Caller,
    pub order_id: OrderId,
}

/// Handler for cancelling orders.
///
/// Cancellation is a status transition on the retained row, not a delete,
/// so the purchase trail stays auditable.
pub struct CancelOrderHandler {
    store: Arc<dyn OrderStore>,
    order_locks: Arc<KeyedLocks<OrderId>>,
}

impl CancelOrderHandler {
    pub fn new(store: Arc<dyn OrderStore>, order_locks: Arc<KeyedLocks<OrderId>>) -> Self {
        Self { store, order_locks }
    }

    pub async fn handle(&self, cmd: CancelOrderCommand) -> Result<(), DomainError> {
        let _guard = self.order_locks.acquire(cmd.order_id).await;

        let mut order = self
            .store
            .find_by_id(&cmd.order_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::OrderNotFound, "Order not found"))?;

        order.check_access(&cmd.caller)?;

        order.cancel()?;
        self.store.update(&order).await?;

        tracing::info!(order_id = %order.id, "Order cancelled");
        Ok(())
    }
}
