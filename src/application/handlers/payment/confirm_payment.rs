//! ConfirmPaymentHandler - synchronous confirmation of a payment intent.
//!
//! The caller supplies a payment method token (or raw card details) and
//! blocks for the resolved status. The provider outcome feeds the same
//! reconcile primitive the webhook path uses, so a concurrent webhook for
//! the same payment cannot double-apply.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, OrderId};
use crate::domain::order::{PaymentResolution, PaymentStatus, TransitionOutcome};
use crate::ports::{CardDetails, OrderStore, PaymentProvider};

use super::PaymentReconciler;

/// Command to confirm payment with a provider method token.
#[derive(Debug, Clone)]
pub struct ConfirmPaymentCommand {
    pub order_id: OrderId,
    /// Provider payment method or token (e.g. "pm_card_visa", "tok_visa").
    pub method_token: String,
}

/// Command to confirm payment from raw card details (server-side).
#[derive(Debug, Clone)]
pub struct ConfirmPaymentWithCardCommand {
    pub order_id: OrderId,
    pub card: CardDetails,
}

/// Result of a synchronous confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPaymentResult {
    /// The order's status after reconciliation.
    pub status: PaymentStatus,

    /// Whether this confirmation applied the resolution or lost to a
    /// concurrent path / superseded attempt.
    pub outcome: TransitionOutcome,
}

/// Handler for synchronous payment confirmation.
pub struct ConfirmPaymentHandler {
    store: Arc<dyn OrderStore>,
    provider: Arc<dyn PaymentProvider>,
    reconciler: Arc<PaymentReconciler>,
}

impl ConfirmPaymentHandler {
    pub fn new(
        store: Arc<dyn OrderStore>,
        provider: Arc<dyn PaymentProvider>,
        reconciler: Arc<PaymentReconciler>,
    ) -> Self {
        Self {
            store,
            provider,
            reconciler,
        }
    }

    pub async fn handle(
        &self,
        cmd: ConfirmPaymentCommand,
    ) -> Result<ConfirmPaymentResult, DomainError> {
        self.confirm_with_method(cmd.order_id, &cmd.method_token)
            .await
    }

    /// Confirms from raw card details by first creating a provider payment
    /// method, then confirming with its id.
    pub async fn handle_with_card(
        &self,
        cmd: ConfirmPaymentWithCardCommand,
    ) -> Result<ConfirmPaymentResult, DomainError> {
        let method_id = self.provider.create_payment_method(cmd.card).await?;
        self.confirm_with_method(cmd.order_id, &method_id).await
    }

    async fn confirm_with_method(
        &self,
        order_id: OrderId,
        method_token: &str,
    ) -> Result<ConfirmPaymentResult, DomainError> {
        let order = self
            .store
            .find_by_id(&order_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::OrderNotFound, "Order not found"))?;

        // Capture the attempt we are confirming. If a retry swaps the
        // payment id while the provider call is in flight, the reconcile
        // guard ignores this confirmation as stale.
        let payment_id = order.payment_id.clone();

        let confirmation = self
            .provider
            .confirm_intent(&payment_id, method_token)
            .await?;

        let resolution = PaymentResolution::from_provider_status(&confirmation.status);

        let (order, outcome) = self
            .reconciler
            .apply_status(order_id, &payment_id, resolution)
            .await?;

        Ok(ConfirmPaymentResult {
            status: order.status,
            outcome,
        })
    }
}
