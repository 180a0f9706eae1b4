//! PaymentReconciler - the serialized apply-status primitive.
//!
//! Both confirmation sources converge here. The reconciler owns the
//! per-order critical section, reads current persisted state, lets the
//! aggregate decide, and persists only when the decision mutated the order.

use std::sync::Arc;

use crate::application::locks::KeyedLocks;
use crate::domain::foundation::{DomainError, ErrorCode, OrderId};
use crate::domain::order::{Order, PaymentResolution, TransitionOutcome};
use crate::ports::OrderStore;

/// Applies provider resolutions to orders, one at a time per order.
pub struct PaymentReconciler {
    store: Arc<dyn OrderStore>,
    order_locks: Arc<KeyedLocks<OrderId>>,
}

impl PaymentReconciler {
    pub fn new(store: Arc<dyn OrderStore>, order_locks: Arc<KeyedLocks<OrderId>>) -> Self {
        Self { store, order_locks }
    }

    /// Applies one provider resolution to an order.
    ///
    /// Runs under the order's critical section, so a racing synchronous
    /// confirmation and webhook delivery for the same payment serialize
    /// here and the idempotent rules in [`Order::reconcile`] make the loser
    /// a no-op.
    ///
    /// Returns the order after the decision together with the outcome.
    ///
    /// # Errors
    ///
    /// - `OrderNotFound` if the order does not exist
    /// - `DatabaseError` if persisting an applied transition fails
    pub async fn apply_status(
        &self,
        order_id: OrderId,
        provider_payment_id: &str,
        resolution: PaymentResolution,
    ) -> Result<(Order, TransitionOutcome), DomainError> {
        let _guard = self.order_locks.acquire(order_id).await;

        let mut order = self
            .store
            .find_by_id(&order_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::OrderNotFound, "Order not found"))?;

        let status_before = order.status;
        let outcome = order.reconcile(provider_payment_id, resolution);

        match outcome {
            TransitionOutcome::Applied => {
                if order.status != status_before {
                    self.store.update(&order).await?;
                    tracing::info!(
                        order_id = %order.id,
                        payment_id = %provider_payment_id,
                        status = ?order.status,
                        "Payment resolution applied"
                    );
                } else {
                    tracing::debug!(
                        order_id = %order.id,
                        payment_id = %provider_payment_id,
                        "Duplicate resolution replayed, no change"
                    );
                }
            }
            TransitionOutcome::Ignored(reason) => {
                tracing::warn!(
                    order_id = %order.id,
                    payment_id = %provider_payment_id,
                    current_payment_id = %order.payment_id,
                    status = ?order.status,
                    requested = ?resolution,
                    reason = ?reason,
                    "Payment resolution ignored"
                );
            }
        }

        Ok((order, outcome))
    }
}
