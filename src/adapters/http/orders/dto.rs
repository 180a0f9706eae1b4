//! HTTP DTOs for order endpoints.
//!
//! JSON request/response shapes at the boundary between HTTP and the
//! application layer.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::CourseId;
use crate::domain::order::{CourseView, OrderView, PaymentStatus};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to create an order (buy a course).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    /// The course to purchase.
    pub course_id: CourseId,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Course fields as serialized for a specific caller.
#[derive(Debug, Clone, Serialize)]
pub struct CourseResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price_cents: i64,
    /// Present only when the caller may access the content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    pub image_url: String,
}

impl From<CourseView> for CourseResponse {
    fn from(view: CourseView) -> Self {
        Self {
            id: view.id.to_string(),
            title: view.title,
            description: view.description,
            price_cents: view.price_cents,
            content_url: view.content_url,
            image_url: view.image_url,
        }
    }
}

/// An order as serialized for a specific caller.
#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub user_id: String,
    pub course: CourseResponse,
    pub status: PaymentStatus,
    pub payment_id: String,
    /// Confirmation secret for the frontend payment flow.
    pub client_secret: String,
    /// Start of the current payment attempt (ISO 8601).
    pub created_at: String,
}

impl From<OrderView> for OrderResponse {
    fn from(view: OrderView) -> Self {
        Self {
            id: view.id.to_string(),
            user_id: view.user_id.to_string(),
            course: view.course.into(),
            status: view.status,
            payment_id: view.payment_id,
            client_secret: view.client_secret,
            created_at: view.created_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Plain acknowledgement body.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
