//! HTTP handlers for payment endpoints.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use crate::application::handlers::payment::{
    ConfirmPaymentCommand, ConfirmPaymentWithCardCommand, IngestWebhookCommand,
};
use crate::domain::foundation::{DomainError, ErrorCode, OrderId};

use super::super::{ApiError, AppState, AuthenticatedCaller};
use super::dto::{ConfirmPaymentRequest, ConfirmPaymentResponse, WebhookAck};

/// Header carrying the provider's webhook signature.
const SIGNATURE_HEADER: &str = "stripe-signature";

/// POST /api/payments/confirm/:order_id - synchronous confirmation.
pub async fn confirm_payment(
    State(state): State<AppState>,
    AuthenticatedCaller(_caller): AuthenticatedCaller,
    Path(order_id): Path<OrderId>,
    Json(request): Json<ConfirmPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.confirm_payment_handler();

    let result = match (request.token, request.card) {
        (Some(token), _) => {
            handler
                .handle(ConfirmPaymentCommand {
                    order_id,
                    method_token: token,
                })
                .await?
        }
        (None, Some(card)) => {
            handler
                .handle_with_card(ConfirmPaymentWithCardCommand {
                    order_id,
                    card: card.into(),
                })
                .await?
        }
        (None, None) => {
            return Err(ApiError(DomainError::new(
                ErrorCode::ValidationFailed,
                "Either 'token' or 'card' must be provided",
            )))
        }
    };

    Ok(Json(ConfirmPaymentResponse {
        status: result.status,
    }))
}

/// POST /api/webhooks/stripe - provider webhook ingestion.
///
/// No authentication; the signature over the raw body is the credential.
/// Rejections use the webhook error's own status mapping so the provider's
/// retry policy sees the right class of failure, and the response body
/// never leaks order detail.
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let result = state
        .ingest_webhook_handler()
        .handle(IngestWebhookCommand {
            payload: body.to_vec(),
            signature,
        })
        .await;

    match result {
        Ok(outcome) => {
            tracing::debug!(?outcome, "Webhook delivery processed");
            (StatusCode::OK, Json(WebhookAck { received: true })).into_response()
        }
        Err(err) => {
            tracing::warn!(error = %err, retryable = err.is_retryable(), "Webhook delivery rejected");
            (err.status_code(), Json(WebhookAck { received: false })).into_response()
        }
    }
}
