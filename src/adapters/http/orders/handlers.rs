//! HTTP handlers for order endpoints.
//!
//! Thin glue between Axum routes and the application layer handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::application::handlers::order::{
    CancelOrderCommand, CreateOrderCommand, GetOrderQuery, ListAllOrdersQuery, ListMyOrdersQuery,
    RetryPaymentCommand,
};
use crate::domain::foundation::OrderId;

use super::super::{ApiError, AppState, AuthenticatedCaller};
use super::dto::{CreateOrderRequest, MessageResponse, OrderResponse};

/// POST /api/orders - create an order for a course.
pub async fn create_order(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Json(request): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state
        .create_order_handler()
        .handle(CreateOrderCommand {
            caller,
            course_id: request.course_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(OrderResponse::from(view))))
}

/// GET /api/orders/my - the caller's orders.
pub async fn list_my_orders(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
) -> Result<impl IntoResponse, ApiError> {
    let views = state
        .list_my_orders_handler()
        .handle(ListMyOrdersQuery { caller })
        .await?;

    let responses: Vec<OrderResponse> = views.into_iter().map(OrderResponse::from).collect();
    Ok(Json(responses))
}

/// GET /api/orders - all orders (privileged).
pub async fn list_all_orders(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
) -> Result<impl IntoResponse, ApiError> {
    let views = state
        .list_all_orders_handler()
        .handle(ListAllOrdersQuery { caller })
        .await?;

    let responses: Vec<OrderResponse> = views.into_iter().map(OrderResponse::from).collect();
    Ok(Json(responses))
}

/// GET /api/orders/:id - one order (owner-or-privileged).
pub async fn get_order(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(order_id): Path<OrderId>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state
        .get_order_handler()
        .handle(GetOrderQuery { caller, order_id })
        .await?;

    Ok(Json(OrderResponse::from(view)))
}

/// POST /api/orders/:id/retry - start a fresh payment attempt.
pub async fn retry_payment(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(order_id): Path<OrderId>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state
        .retry_payment_handler()
        .handle(RetryPaymentCommand { caller, order_id })
        .await?;

    Ok(Json(OrderResponse::from(view)))
}

/// POST /api/orders/:id/cancel - withdraw a pending order.
pub async fn cancel_order(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(order_id): Path<OrderId>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .cancel_order_handler()
        .handle(CancelOrderCommand { caller, order_id })
        .await?;

    Ok(Json(MessageResponse::new("Order cancelled successfully")))
}
