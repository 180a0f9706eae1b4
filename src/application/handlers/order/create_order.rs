//! CreateOrderHandler - Command handler for starting a purchase.

use std::sync::Arc;

use crate::application::locks::KeyedLocks;
use crate::domain::foundation::{Caller, CourseId, DomainError, ErrorCode, OrderId, UserId};
use crate::domain::order::{project_order, Order, OrderView, PaymentAttempt};
use crate::domain::payment::IntentMetadata;
use crate::ports::{CourseCatalog, CreateIntentRequest, OrderStore, PaymentProvider, UserDirectory};

/// Command to create a purchase order.
#[derive(Debug, Clone)]
pub struct CreateOrderCommand {
    /// The buyer.
    pub caller: Caller,
    /// Course to purchase.
    pub course_id: CourseId,
}

/// Handler for creating purchase orders.
///
/// Reserves the order id, creates the provider payment intent with metadata
/// bound to that id, and persists the order only after the intent call
/// succeeds. The duplicate-purchase check runs inside a (user, course)
/// critical section so two concurrent creations cannot both pass it.
pub struct CreateOrderHandler {
    store: Arc<dyn OrderStore>,
    users: Arc<dyn UserDirectory>,
    catalog: Arc<dyn CourseCatalog>,
    provider: Arc<dyn PaymentProvider>,
    pair_locks: Arc<KeyedLocks<(UserId, CourseId)>>,
    currency: String,
}

impl CreateOrderHandler {
    pub fn new(
        store: Arc<dyn OrderStore>,
        users: Arc<dyn UserDirectory>,
        catalog: Arc<dyn CourseCatalog>,
        provider: Arc<dyn PaymentProvider>,
        pair_locks: Arc<KeyedLocks<(UserId, CourseId)>>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            store,
            users,
            catalog,
            provider,
            pair_locks,
            currency: currency.into(),
        }
    }

    pub async fn handle(&self, cmd: CreateOrderCommand) -> Result<OrderView, DomainError> {
        let user = self
            .users
            .find_by_id(&cmd.caller.user_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::UserNotFound, "User not found"))?;

        let course = self
            .catalog
            .find_by_id(&cmd.course_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::CourseNotFound, "Course not found"))?;

        // Serialize the check-then-act against concurrent creations for the
        // same pair; the store's unique index is the second line of defense.
        let _guard = self
            .pair_locks
            .acquire((user.id.clone(), course.id))
            .await;

        if self
            .store
            .exists_successful_order(&user.id, &course.id)
            .await?
        {
            return Err(DomainError::new(
                ErrorCode::AlreadyPurchased,
                "You have already purchased this course",
            )
            .with_detail("course_id", course.id.to_string()));
        }

        // Reserve the id up front so the intent metadata carries the final
        // persisted order id.
        let order_id = OrderId::new();

        let intent = self
            .provider
            .create_intent(CreateIntentRequest {
                amount_cents: course.price_cents,
                currency: self.currency.clone(),
                metadata: IntentMetadata {
                    order_id,
                    user_id: user.id.clone(),
                    course_id: course.id,
                },
            })
            .await?;

        let order = Order::create(
            order_id,
            user.id,
            course,
            PaymentAttempt {
                payment_id: intent.provider_id,
                client_secret: intent.client_secret,
            },
        );

        self.store.insert(&order).await?;

        tracing::info!(
            order_id = %order.id,
            user_id = %order.user_id,
            course_id = %order.course.id,
            payment_id = %order.payment_id,
            amount_cents = order.course.price_cents,
            "Order created"
        );

        Ok(project_order(&order, &cmd.caller))
    }
}
