//! Axum router for order endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::super::AppState;
use super::handlers::{
    cancel_order, create_order, get_order, list_all_orders, list_my_orders, retry_payment,
};

/// Create the order API router.
///
/// # Routes
///
/// ## User Endpoints (owner-scoped)
/// - `POST /` - Create an order and receive the confirmation secret
/// - `GET /my` - List the caller's orders
/// - `GET /:id` - Fetch one order (owner-or-privileged)
/// - `POST /:id/retry` - Start a fresh payment attempt
/// - `POST /:id/cancel` - Cancel a pending order
///
/// ## Admin Endpoints (require admin role)
/// - `GET /` - List every order
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order).get(list_all_orders))
        .route("/my", get(list_my_orders))
        .route("/:id", get(get_order))
        .route("/:id/retry", post(retry_payment))
        .route("/:id/cancel", post(cancel_order))
}
