//! Access-gated order projection.
//!
//! Every path that serializes an order passes through [`project_order`],
//! which decides what the caller may see. The protected content reference
//! is revealed to privileged callers unconditionally, and to owners only
//! once payment resolved SUCCESS. This function is pure; it never touches
//! the store or the provider.

use crate::domain::foundation::{Caller, CourseId, OrderId, OwnedByUser, Timestamp, UserId};
use serde::Serialize;

use super::{Order, PaymentStatus};

/// Course fields as visible to a specific caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseView {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub price_cents: i64,

    /// Present only for privileged callers, or for owners of orders whose
    /// payment resolved SUCCESS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,

    pub image_url: String,
}

/// Order fields as visible to a specific caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderView {
    pub id: OrderId,
    pub user_id: UserId,
    pub course: CourseView,
    pub status: PaymentStatus,
    pub payment_id: String,
    pub client_secret: String,
    pub created_at: Timestamp,
}

/// Projects an order for a caller, applying the content-gating rule.
pub fn project_order(order: &Order, caller: &Caller) -> OrderView {
    let reveal_content =
        caller.privileged || (order.is_owner(&caller.user_id) && order.status.grants_access());

    OrderView {
        id: order.id,
        user_id: order.user_id.clone(),
        course: CourseView {
            id: order.course.id,
            title: order.course.title.clone(),
            description: order.course.description.clone(),
            price_cents: order.course.price_cents,
            content_url: reveal_content.then(|| order.course.content_url.clone()),
            image_url: order.course.image_url.clone(),
        },
        status: order.status,
        payment_id: order.payment_id.clone(),
        client_secret: order.client_secret.clone(),
        created_at: order.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{Course, PaymentAttempt, PaymentResolution};

    fn owner_id() -> UserId {
        UserId::new("owner-1").unwrap()
    }

    fn pending_order() -> Order {
        let course = Course::new(
            CourseId::new(),
            "Applied Cryptography",
            "MACs, signatures, protocols",
            4999,
            "https://cdn.example.com/crypto/content",
            "https://cdn.example.com/crypto/cover.png",
        )
        .unwrap();

        Order::create(
            OrderId::new(),
            owner_id(),
            course,
            PaymentAttempt {
                payment_id: "pi_1".to_string(),
                client_secret: "pi_1_secret".to_string(),
            },
        )
    }

    fn successful_order() -> Order {
        let mut order = pending_order();
        order.reconcile("pi_1", PaymentResolution::Succeeded);
        order
    }

    #[test]
    fn owner_of_pending_order_sees_no_content_url() {
        let order = pending_order();
        let view = project_order(&order, &Caller::user(owner_id()));

        assert!(view.course.content_url.is_none());
        assert_eq!(view.course.price_cents, 4999);
        assert_eq!(view.course.title, "Applied Cryptography");
    }

    #[test]
    fn owner_of_successful_order_sees_content_url() {
        let order = successful_order();
        let view = project_order(&order, &Caller::user(owner_id()));

        assert_eq!(
            view.course.content_url.as_deref(),
            Some("https://cdn.example.com/crypto/content")
        );
    }

    #[test]
    fn privileged_caller_sees_content_url_even_pending() {
        let order = pending_order();
        let view = project_order(&order, &Caller::privileged(UserId::new("admin").unwrap()));

        assert!(view.course.content_url.is_some());
    }

    #[test]
    fn non_owner_of_successful_order_sees_no_content_url() {
        let order = successful_order();
        let view = project_order(&order, &Caller::user(UserId::new("someone-else").unwrap()));

        assert!(view.course.content_url.is_none());
    }

    #[test]
    fn failed_order_owner_sees_no_content_url() {
        let mut order = pending_order();
        order.reconcile("pi_1", PaymentResolution::Failed);

        let view = project_order(&order, &Caller::user(owner_id()));
        assert!(view.course.content_url.is_none());
    }

    #[test]
    fn view_always_carries_attempt_fields() {
        let order = pending_order();
        let view = project_order(&order, &Caller::user(owner_id()));

        assert_eq!(view.payment_id, "pi_1");
        assert_eq!(view.client_secret, "pi_1_secret");
        assert_eq!(view.status, PaymentStatus::Pending);
    }

    #[test]
    fn gated_view_omits_content_url_in_json() {
        let order = pending_order();
        let view = project_order(&order, &Caller::user(owner_id()));

        let json = serde_json::to_value(&view).unwrap();
        assert!(json["course"].get("content_url").is_none());
        assert_eq!(json["course"]["price_cents"], 4999);
    }
}
