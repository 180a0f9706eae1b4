//! Provider webhook events and intent metadata.
//!
//! A [`ProviderEvent`] is what the payment provider adapter yields after
//! signature verification. Only the fields reconciliation needs are
//! modeled; everything else in the provider's event schema is ignored.

use std::collections::HashMap;

use crate::domain::foundation::{CourseId, OrderId, UserId};
use serde::{Deserialize, Serialize};

use super::WebhookError;

/// Metadata attached to every payment intent at creation time.
///
/// This binding is the sole mechanism the webhook path uses to locate the
/// order, so it must carry the final persisted order id before any
/// confirmation can succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentMetadata {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub course_id: CourseId,
}

impl IntentMetadata {
    /// Renders the metadata as the provider's string map.
    pub fn to_map(&self) -> HashMap<String, String> {
        HashMap::from([
            ("orderId".to_string(), self.order_id.to_string()),
            ("userId".to_string(), self.user_id.to_string()),
            ("courseId".to_string(), self.course_id.to_string()),
        ])
    }
}

/// Kinds of provider events the reconciler cares about.
///
/// Every other kind is acknowledged and ignored, which keeps the endpoint
/// forward-compatible with new provider event types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEventKind {
    /// A payment intent was collected.
    PaymentSucceeded,
    /// A payment intent attempt failed.
    PaymentFailed,
    /// Any other event type, kept verbatim for logging.
    Other(String),
}

impl ProviderEventKind {
    /// Parses the provider's event type string.
    pub fn parse(s: &str) -> Self {
        match s {
            "payment_intent.succeeded" => Self::PaymentSucceeded,
            "payment_intent.payment_failed" => Self::PaymentFailed,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the provider's event type string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::PaymentSucceeded => "payment_intent.succeeded",
            Self::PaymentFailed => "payment_intent.payment_failed",
            Self::Other(s) => s,
        }
    }
}

/// A verified webhook event from the payment provider.
#[derive(Debug, Clone)]
pub struct ProviderEvent {
    /// Provider's event id (used for audit logging).
    pub id: String,

    /// Parsed event kind.
    pub kind: ProviderEventKind,

    /// Provider payment intent id the event refers to.
    /// Present on payment events; may be absent on other kinds.
    pub payment_id: Option<String>,

    /// Metadata echoed back from intent creation.
    pub metadata: HashMap<String, String>,

    /// Provider-side creation time (Unix seconds).
    pub created: i64,
}

impl ProviderEvent {
    /// Extracts the bound order id from event metadata.
    ///
    /// # Errors
    ///
    /// - `MissingMetadata` if the event carries no `orderId` entry
    /// - `ParseError` if the entry is not a valid order id
    pub fn order_id(&self) -> Result<OrderId, WebhookError> {
        let raw = self
            .metadata
            .get("orderId")
            .ok_or(WebhookError::MissingMetadata("orderId"))?;

        raw.parse()
            .map_err(|_| WebhookError::ParseError(format!("invalid orderId metadata: {}", raw)))
    }

    /// Extracts the provider payment id the event refers to.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` if the event carries no payment intent id.
    pub fn payment_id(&self) -> Result<&str, WebhookError> {
        self.payment_id
            .as_deref()
            .ok_or(WebhookError::MissingField("payment_intent id"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata_map(order_id: &str) -> HashMap<String, String> {
        HashMap::from([
            ("orderId".to_string(), order_id.to_string()),
            ("userId".to_string(), "user-1".to_string()),
            ("courseId".to_string(), "550e8400-e29b-41d4-a716-446655440000".to_string()),
        ])
    }

    fn event(kind: &str, metadata: HashMap<String, String>) -> ProviderEvent {
        ProviderEvent {
            id: "evt_1".to_string(),
            kind: ProviderEventKind::parse(kind),
            payment_id: Some("pi_1".to_string()),
            metadata,
            created: 1704067200,
        }
    }

    #[test]
    fn intent_metadata_renders_provider_keys() {
        let metadata = IntentMetadata {
            order_id: "550e8400-e29b-41d4-a716-446655440000".parse().unwrap(),
            user_id: UserId::new("user-1").unwrap(),
            course_id: CourseId::new(),
        };

        let map = metadata.to_map();
        assert_eq!(
            map.get("orderId"),
            Some(&"550e8400-e29b-41d4-a716-446655440000".to_string())
        );
        assert_eq!(map.get("userId"), Some(&"user-1".to_string()));
        assert!(map.contains_key("courseId"));
    }

    #[test]
    fn event_kind_parses_payment_events() {
        assert_eq!(
            ProviderEventKind::parse("payment_intent.succeeded"),
            ProviderEventKind::PaymentSucceeded
        );
        assert_eq!(
            ProviderEventKind::parse("payment_intent.payment_failed"),
            ProviderEventKind::PaymentFailed
        );
    }

    #[test]
    fn event_kind_keeps_unknown_types_verbatim() {
        let kind = ProviderEventKind::parse("charge.refunded");
        assert_eq!(kind, ProviderEventKind::Other("charge.refunded".to_string()));
        assert_eq!(kind.as_str(), "charge.refunded");
    }

    #[test]
    fn event_kind_as_str_roundtrips() {
        for s in ["payment_intent.succeeded", "payment_intent.payment_failed"] {
            assert_eq!(ProviderEventKind::parse(s).as_str(), s);
        }
    }

    #[test]
    fn order_id_extracts_from_metadata() {
        let event = event(
            "payment_intent.succeeded",
            metadata_map("550e8400-e29b-41d4-a716-446655440000"),
        );

        let order_id = event.order_id().unwrap();
        assert_eq!(order_id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn missing_order_id_metadata_is_an_error() {
        let event = event("payment_intent.succeeded", HashMap::new());

        assert!(matches!(
            event.order_id(),
            Err(WebhookError::MissingMetadata("orderId"))
        ));
    }

    #[test]
    fn malformed_order_id_metadata_is_a_parse_error() {
        let event = event("payment_intent.succeeded", metadata_map("not-a-uuid"));

        assert!(matches!(event.order_id(), Err(WebhookError::ParseError(_))));
    }

    #[test]
    fn missing_payment_id_is_an_error() {
        let mut e = event("payment_intent.succeeded", HashMap::new());
        e.payment_id = None;

        assert!(matches!(
            e.payment_id(),
            Err(WebhookError::MissingField(_))
        ));
    }
}
