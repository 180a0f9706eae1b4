//! Axum routers for payment endpoints.

use axum::routing::post;
use axum::Router;

use super::super::AppState;
use super::handlers::{confirm_payment, handle_webhook};

/// Create the payment API router.
///
/// # Routes
/// - `POST /confirm/:order_id` - Synchronously confirm an order's payment
pub fn routes() -> Router<AppState> {
    Router::new().route("/confirm/:order_id", post(confirm_payment))
}

/// Create the webhook router.
///
/// Separate from the payment routes because webhook deliveries carry no
/// user authentication; they are verified via signature instead.
///
/// # Routes
/// - `POST /stripe` - Provider webhook ingestion
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/stripe", post(handle_webhook))
}
