//! HTTP adapters.
//!
//! Axum routers, handlers, and DTOs exposing the order and payment
//! operations, plus the webhook endpoint the provider calls back on.

mod auth;
mod error;
pub mod orders;
pub mod payments;

pub use auth::AuthenticatedCaller;
pub use error::{ApiError, ErrorResponse};

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::application::handlers::order::{
    CancelOrderHandler, CreateOrderHandler, GetOrderHandler, ListAllOrdersHandler,
    ListMyOrdersHandler, RetryPaymentHandler,
};
use crate::application::handlers::payment::{
    ConfirmPaymentHandler, IngestWebhookHandler, PaymentReconciler,
};
use crate::application::locks::KeyedLocks;
use crate::domain::foundation::{CourseId, OrderId, UserId};
use crate::ports::{CourseCatalog, OrderStore, PaymentProvider, UserDirectory};

/// Shared application state containing all dependencies.
///
/// Cloned per request; everything inside is Arc-wrapped. The two lock maps
/// are shared by every handler touching the same orders, which is what
/// makes the per-order critical sections global to the process.
#[derive(Clone)]
pub struct AppState {
    pub order_store: Arc<dyn OrderStore>,
    pub user_directory: Arc<dyn UserDirectory>,
    pub course_catalog: Arc<dyn CourseCatalog>,
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub order_locks: Arc<KeyedLocks<OrderId>>,
    pub pair_locks: Arc<KeyedLocks<(UserId, CourseId)>>,
    pub currency: String,
}

impl AppState {
    pub fn new(
        order_store: Arc<dyn OrderStore>,
        user_directory: Arc<dyn UserDirectory>,
        course_catalog: Arc<dyn CourseCatalog>,
        payment_provider: Arc<dyn PaymentProvider>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            order_store,
            user_directory,
            course_catalog,
            payment_provider,
            order_locks: Arc::new(KeyedLocks::new()),
            pair_locks: Arc::new(KeyedLocks::new()),
            currency: currency.into(),
        }
    }

    // Handlers are created on demand from the shared state.

    pub fn create_order_handler(&self) -> CreateOrderHandler {
        CreateOrderHandler::new(
            self.order_store.clone(),
            self.user_directory.clone(),
            self.course_catalog.clone(),
            self.payment_provider.clone(),
            self.pair_locks.clone(),
            self.currency.clone(),
        )
    }

    pub fn retry_payment_handler(&self) -> RetryPaymentHandler {
        RetryPaymentHandler::new(
            self.order_store.clone(),
            self.payment_provider.clone(),
            self.order_locks.clone(),
            self.currency.clone(),
        )
    }

    pub fn cancel_order_handler(&self) -> CancelOrderHandler {
        CancelOrderHandler::new(self.order_store.clone(), self.order_locks.clone())
    }

    pub fn get_order_handler(&self) -> GetOrderHandler {
        GetOrderHandler::new(self.order_store.clone())
    }

    pub fn list_my_orders_handler(&self) -> ListMyOrdersHandler {
        ListMyOrdersHandler::new(self.order_store.clone())
    }

    pub fn list_all_orders_handler(&self) -> ListAllOrdersHandler {
        ListAllOrdersHandler::new(self.order_store.clone())
    }

    pub fn reconciler(&self) -> Arc<PaymentReconciler> {
        Arc::new(PaymentReconciler::new(
            self.order_store.clone(),
            self.order_locks.clone(),
        ))
    }

    pub fn confirm_payment_handler(&self) -> ConfirmPaymentHandler {
        ConfirmPaymentHandler::new(
            self.order_store.clone(),
            self.payment_provider.clone(),
            self.reconciler(),
        )
    }

    pub fn ingest_webhook_handler(&self) -> IngestWebhookHandler {
        IngestWebhookHandler::new(self.payment_provider.clone(), self.reconciler())
    }
}

/// Build the complete API router.
///
/// # Routes
///
/// - `/api/orders` - order lifecycle (authenticated)
/// - `/api/payments` - synchronous confirmation (authenticated)
/// - `/api/webhooks` - provider callbacks (signature verified, no auth)
/// - `/health` - liveness probe
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/orders", orders::routes())
        .nest("/api/payments", payments::routes())
        .nest("/api/webhooks", payments::webhook_routes())
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
}
