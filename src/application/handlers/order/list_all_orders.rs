//! ListAllOrdersHandler - Privileged query handler over every order.

use std::sync::Arc;

use crate::domain::foundation::{Caller, DomainError, ErrorCode};
use crate::domain::order::{project_order, OrderView};
use crate::ports::OrderStore;

/// Query for all orders in the store.
#[derive(Debug, Clone)]
pub struct ListAllOrdersQuery {
    pub caller: Caller,
}

/// Handler listing every order. Privileged callers only.
pub struct ListAllOrdersHandler {
    store: Arc<dyn OrderStore>,
}

impl ListAllOrdersHandler {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: ListAllOrdersQuery) -> Result<Vec<OrderView>, DomainError> {
        if !query.caller.privileged {
            return Err(DomainError::new(
                ErrorCode::Forbidden,
                "Listing all orders requires the administrative role",
            ));
        }

        let orders = self.store.find_all().await?;
        Ok(orders
            .iter()
            .map(|order| project_order(order, &query.caller))
            .collect())
    }
}
