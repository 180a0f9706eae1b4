//! GetOrderHandler - Query handler for a single order.

use std::sync::Arc;

use crate::domain::foundation::{Caller, DomainError, ErrorCode, OrderId, OwnedByUser};
use crate::domain::order::{project_order, OrderView};
use crate::ports::OrderStore;

/// Query for one order by id.
#[derive(Debug, Clone)]
pub struct GetOrderQuery {
    pub caller: Caller,
    pub order_id: OrderId,
}

/// Handler returning a single order, owner-or-privileged only.
pub struct GetOrderHandler {
    store: Arc<dyn OrderStore>,
}

impl GetOrderHandler {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetOrderQuery) -> Result<OrderView, DomainError> {
        let order = self
            .store
            .find_by_id(&query.order_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::OrderNotFound, "Order not found"))?;

        order.check_access(&query.caller)?;

        Ok(project_order(&order, &query.caller))
    }
}
