//! ListMyOrdersHandler - Query handler for the caller's own orders.

use std::sync::Arc;

use crate::domain::foundation::{Caller, DomainError};
use crate::domain::order::{project_order, OrderView};
use crate::ports::OrderStore;

/// Query for the caller's orders.
#[derive(Debug, Clone)]
pub struct ListMyOrdersQuery {
    pub caller: Caller,
}

/// Handler listing the caller's orders, gated per order.
pub struct ListMyOrdersHandler {
    store: Arc<dyn OrderStore>,
}

impl ListMyOrdersHandler {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: ListMyOrdersQuery) -> Result<Vec<OrderView>, DomainError> {
        let orders = self.store.find_by_user(&query.caller.user_id).await?;
        Ok(orders
            .iter()
            .map(|order| project_order(order, &query.caller))
            .collect())
    }
}
