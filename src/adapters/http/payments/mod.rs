//! Payment HTTP endpoints: synchronous confirmation and the provider
//! webhook.

mod dto;
mod handlers;
mod routes;

pub use dto::{CardDetailsRequest, ConfirmPaymentRequest, ConfirmPaymentResponse, WebhookAck};
pub use routes::{routes, webhook_routes};
