//! IngestWebhookHandler - asynchronous, provider-invoked reconciliation.
//!
//! Verifies the delivery's signature before any mutating work, maps the
//! event onto a payment resolution, and feeds the shared reconcile
//! primitive. Deliveries are safe to replay: duplicates and conflicting
//! late events come back as no-ops, which the endpoint acknowledges so the
//! provider stops retrying.

use std::sync::Arc;

use crate::domain::foundation::ErrorCode;
use crate::domain::order::{PaymentResolution, TransitionOutcome};
use crate::domain::payment::{ProviderEventKind, WebhookError};
use crate::ports::PaymentProvider;

use super::PaymentReconciler;

/// Command carrying one raw webhook delivery.
#[derive(Debug, Clone)]
pub struct IngestWebhookCommand {
    /// Raw request body, exactly as signed by the provider.
    pub payload: Vec<u8>,
    /// Signature header value.
    pub signature: String,
}

/// Result of ingesting a webhook delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestWebhookResult {
    /// A payment resolution was applied to an order.
    Applied,

    /// The event was valid but deliberately not applied (duplicate,
    /// superseded attempt, or conflicting late report).
    Ignored,

    /// The event kind is not one the reconciler handles; acknowledged as a
    /// forward-compatible no-op.
    Acknowledged,
}

/// Handler for provider webhook deliveries.
pub struct IngestWebhookHandler {
    provider: Arc<dyn PaymentProvider>,
    reconciler: Arc<PaymentReconciler>,
}

impl IngestWebhookHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>, reconciler: Arc<PaymentReconciler>) -> Self {
        Self {
            provider,
            reconciler,
        }
    }

    pub async fn handle(
        &self,
        cmd: IngestWebhookCommand,
    ) -> Result<IngestWebhookResult, WebhookError> {
        // 1. Signature first; nothing mutates before this passes.
        let event = self
            .provider
            .verify_webhook(&cmd.payload, &cmd.signature)
            .await?;

        // 2. Map the event kind onto a resolution.
        let resolution = match &event.kind {
            ProviderEventKind::PaymentSucceeded => PaymentResolution::Succeeded,
            ProviderEventKind::PaymentFailed => PaymentResolution::Failed,
            ProviderEventKind::Other(kind) => {
                tracing::debug!(event_id = %event.id, kind = %kind, "Unhandled webhook event kind");
                return Ok(IngestWebhookResult::Acknowledged);
            }
        };

        // 3. Locate the order through the intent metadata binding.
        let order_id = event.order_id()?;
        let payment_id = event.payment_id()?.to_string();

        // 4. Converge on the shared transition primitive.
        match self
            .reconciler
            .apply_status(order_id, &payment_id, resolution)
            .await
        {
            Ok((_, TransitionOutcome::Applied)) => Ok(IngestWebhookResult::Applied),
            Ok((_, TransitionOutcome::Ignored(_))) => Ok(IngestWebhookResult::Ignored),
            Err(err) if err.code == ErrorCode::OrderNotFound => {
                tracing::warn!(
                    event_id = %event.id,
                    order_id = %order_id,
                    "Webhook event references unknown order"
                );
                Err(WebhookError::OrderNotFound)
            }
            Err(err) => Err(WebhookError::Database(err.to_string())),
        }
    }
}
