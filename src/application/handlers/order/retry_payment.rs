//! RetryPaymentHandler - Command handler for starting a fresh payment attempt.

use std::sync::Arc;

use crate::application::locks::KeyedLocks;
use crate::domain::foundation::{
    Caller, DomainError, ErrorCode, OrderId, OwnedByUser,
};
use crate::domain::order::{project_order, OrderView, PaymentAttempt, PaymentStatus};
use crate::domain::payment::IntentMetadata;
use crate::ports::{CreateIntentRequest, OrderStore, PaymentProvider};

/// Command to retry payment on an unresolved or failed order.
#[derive(Debug, Clone)]
pub struct RetryPaymentCommand {
    pub caller: Caller,
    pub order_id: OrderId,
}

/// Handler for retrying payment.
///
/// Issues a fresh provider intent for the snapshot price, replaces the
/// order's attempt credentials, and resets it to Pending. The superseded
/// payment id becomes unreachable for reconciliation: any late event
/// bearing it is ignored.
pub struct RetryPaymentHandler {
    store: Arc<dyn OrderStore>,
    provider: Arc<dyn PaymentProvider>,
    order_locks: Arc<KeyedLocks<OrderId>>,
    currency: String,
}

impl RetryPaymentHandler {
    pub fn new(
        store: Arc<dyn OrderStore>,
        provider: Arc<dyn PaymentProvider>,
        order_locks: Arc<KeyedLocks<OrderId>>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            store,
            provider,
            order_locks,
            currency: currency.into(),
        }
    }

    pub async fn handle(&self, cmd: RetryPaymentCommand) -> Result<OrderView, DomainError> {
        // Retry mutates the attempt identity, so it takes the same per-order
        // critical section as the reconcile path.
        let _guard = self.order_locks.acquire(cmd.order_id).await;

        let mut order = self
            .store
            .find_by_id(&cmd.order_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::OrderNotFound, "Order not found"))?;

        order.check_access(&cmd.caller)?;

        if order.status == PaymentStatus::Success {
            return Err(DomainError::new(
                ErrorCode::PaymentAlreadyCompleted,
                "Payment already completed for this order",
            )
            .with_detail("order_id", order.id.to_string()));
        }

        let intent = self
            .provider
            .create_intent(CreateIntentRequest {
                amount_cents: order.course.price_cents,
                currency: self.currency.clone(),
                metadata: IntentMetadata {
                    order_id: order.id,
                    user_id: order.user_id.clone(),
                    course_id: order.course.id,
                },
            })
            .await?;

        let superseded = order.payment_id.clone();
        order.begin_new_attempt(PaymentAttempt {
            payment_id: intent.provider_id,
            client_secret: intent.client_secret,
        })?;

        self.store.update(&order).await?;

        tracing::info!(
            order_id = %order.id,
            payment_id = %order.payment_id,
            superseded_payment_id = %superseded,
            "Payment retry started"
        );

        Ok(project_order(&order, &cmd.caller))
    }
}
