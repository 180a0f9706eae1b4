//! HTTP DTOs for payment endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::order::PaymentStatus;
use crate::ports::CardDetails;

/// Request to confirm payment for an order.
///
/// Carries either a provider method token (the usual path) or raw card
/// details for the server-side path. Exactly one must be present.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmPaymentRequest {
    /// Provider payment method or token (e.g. "pm_card_visa", "tok_visa").
    #[serde(default)]
    pub token: Option<String>,

    /// Raw card details for server-side confirmation.
    #[serde(default)]
    pub card: Option<CardDetailsRequest>,
}

/// Card details as sent by the client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetailsRequest {
    pub number: String,
    pub exp_month: u32,
    pub exp_year: u32,
    pub cvc: String,
}

impl From<CardDetailsRequest> for CardDetails {
    fn from(request: CardDetailsRequest) -> Self {
        CardDetails {
            number: request.number,
            exp_month: request.exp_month,
            exp_year: request.exp_year,
            cvc: request.cvc,
        }
    }
}

/// Response for a synchronous confirmation.
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmPaymentResponse {
    /// The order's payment status after reconciliation.
    pub status: PaymentStatus,
}

/// Acknowledgement body for webhook deliveries.
///
/// Deliberately carries no order detail; the provider only needs to know
/// whether to stop retrying.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}
