//! Payment reconciliation handlers.
//!
//! Two producers - the synchronous confirm path and the provider webhook -
//! feed one serialized, idempotent transition primitive.

mod confirm_payment;
mod ingest_webhook;
mod reconciler;

pub use confirm_payment::{
    ConfirmPaymentCommand, ConfirmPaymentHandler, ConfirmPaymentResult,
    ConfirmPaymentWithCardCommand,
};
pub use ingest_webhook::{IngestWebhookCommand, IngestWebhookHandler, IngestWebhookResult};
pub use reconciler::PaymentReconciler;
