//! Integration tests for the purchase lifecycle.
//!
//! Drives the application handlers end to end against in-memory ports and
//! the scripted mock provider: create, confirm (both outcomes), retry,
//! webhook reconciliation, and cancellation.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;

use coursepay::adapters::stripe::MockPaymentProvider;
use coursepay::application::handlers::order::{
    CancelOrderCommand, CancelOrderHandler, CreateOrderCommand, CreateOrderHandler,
    RetryPaymentCommand, RetryPaymentHandler,
};
use coursepay::application::handlers::payment::{
    ConfirmPaymentCommand, ConfirmPaymentHandler, IngestWebhookCommand, IngestWebhookHandler,
    IngestWebhookResult, PaymentReconciler,
};
use coursepay::application::locks::KeyedLocks;
use coursepay::domain::foundation::{Caller, CourseId, DomainError, ErrorCode, OrderId, UserId};
use coursepay::domain::order::{Course, Order, PaymentStatus};
use coursepay::domain::payment::{ProviderEvent, ProviderEventKind};
use coursepay::ports::{CourseCatalog, OrderStore, UserDirectory, UserRecord};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// In-memory order store mirroring the Postgres adapter's contract,
/// including the partial unique constraint on successful orders.
struct InMemoryOrderStore {
    orders: Mutex<Vec<Order>>,
}

impl InMemoryOrderStore {
    fn new() -> Self {
        Self {
            orders: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: &Order) -> Result<(), DomainError> {
        let mut orders = self.orders.lock().unwrap();
        if order.status == PaymentStatus::Success
            && orders.iter().any(|o| {
                o.user_id == order.user_id
                    && o.course.id == order.course.id
                    && o.status == PaymentStatus::Success
            })
        {
            return Err(DomainError::new(
                ErrorCode::AlreadyPurchased,
                "You have already purchased this course",
            ));
        }
        orders.push(order.clone());
        Ok(())
    }

    async fn update(&self, order: &Order) -> Result<(), DomainError> {
        let mut orders = self.orders.lock().unwrap();
        if order.status == PaymentStatus::Success
            && orders.iter().any(|o| {
                o.id != order.id
                    && o.user_id == order.user_id
                    && o.course.id == order.course.id
                    && o.status == PaymentStatus::Success
            })
        {
            return Err(DomainError::new(
                ErrorCode::AlreadyPurchased,
                "You have already purchased this course",
            ));
        }
        match orders.iter_mut().find(|o| o.id == order.id) {
            Some(existing) => {
                *existing = order.clone();
                Ok(())
            }
            None => Err(DomainError::new(ErrorCode::OrderNotFound, "Order not found")),
        }
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError> {
        Ok(self.orders.lock().unwrap().iter().find(|o| &o.id == id).cloned())
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Order>, DomainError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| &o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<Order>, DomainError> {
        Ok(self.orders.lock().unwrap().clone())
    }

    async fn exists_successful_order(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<bool, DomainError> {
        Ok(self.orders.lock().unwrap().iter().any(|o| {
            &o.user_id == user_id && &o.course.id == course_id && o.status == PaymentStatus::Success
        }))
    }
}

struct SingleUserDirectory {
    user: UserRecord,
}

#[async_trait]
impl UserDirectory for SingleUserDirectory {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, DomainError> {
        Ok((&self.user.id == id).then(|| self.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DomainError> {
        Ok((self.user.email == email).then(|| self.user.clone()))
    }
}

struct SingleCourseCatalog {
    course: Course,
}

#[async_trait]
impl CourseCatalog for SingleCourseCatalog {
    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError> {
        Ok((&self.course.id == id).then(|| self.course.clone()))
    }
}

/// Everything a purchase flow needs, wired against one buyer and course.
struct Fixture {
    store: Arc<InMemoryOrderStore>,
    provider: Arc<MockPaymentProvider>,
    create: CreateOrderHandler,
    retry: RetryPaymentHandler,
    cancel: CancelOrderHandler,
    confirm: ConfirmPaymentHandler,
    webhook: IngestWebhookHandler,
    course_id: CourseId,
}

fn buyer() -> Caller {
    Caller::user(UserId::new("buyer-1").unwrap())
}

fn fixture() -> Fixture {
    let course_id = CourseId::new();
    let course = Course::new(
        course_id,
        "Practical Cryptography",
        "From MACs to protocols",
        4999,
        "https://cdn.example.com/crypto/content",
        "https://cdn.example.com/crypto/cover.png",
    )
    .unwrap();

    let store = Arc::new(InMemoryOrderStore::new());
    let provider = Arc::new(MockPaymentProvider::new());
    let users = Arc::new(SingleUserDirectory {
        user: UserRecord {
            id: UserId::new("buyer-1").unwrap(),
            email: "buyer@example.com".to_string(),
        },
    });
    let catalog = Arc::new(SingleCourseCatalog { course });

    let order_locks = Arc::new(KeyedLocks::new());
    let pair_locks = Arc::new(KeyedLocks::new());
    let reconciler = Arc::new(PaymentReconciler::new(store.clone(), order_locks.clone()));

    Fixture {
        create: CreateOrderHandler::new(
            store.clone(),
            users,
            catalog,
            provider.clone(),
            pair_locks,
            "usd",
        ),
        retry: RetryPaymentHandler::new(
            store.clone(),
            provider.clone(),
            order_locks.clone(),
            "usd",
        ),
        cancel: CancelOrderHandler::new(store.clone(), order_locks),
        confirm: ConfirmPaymentHandler::new(store.clone(), provider.clone(), reconciler.clone()),
        webhook: IngestWebhookHandler::new(provider.clone(), reconciler),
        store,
        provider,
        course_id,
    }
}

fn succeeded_event(payment_id: &str, order_id: OrderId) -> ProviderEvent {
    ProviderEvent {
        id: format!("evt_{}", payment_id),
        kind: ProviderEventKind::PaymentSucceeded,
        payment_id: Some(payment_id.to_string()),
        metadata: HashMap::from([("orderId".to_string(), order_id.to_string())]),
        created: 1704067200,
    }
}

fn delivery() -> IngestWebhookCommand {
    IngestWebhookCommand {
        payload: br#"{"id":"evt"}"#.to_vec(),
        signature: "t=0,v1=mock".to_string(),
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn create_then_confirm_success_unlocks_content() {
    let fx = fixture();

    let view = fx
        .create
        .handle(CreateOrderCommand {
            caller: buyer(),
            course_id: fx.course_id,
        })
        .await
        .unwrap();

    assert_eq!(view.status, PaymentStatus::Pending);
    assert!(!view.payment_id.is_empty());
    assert!(!view.client_secret.is_empty());
    assert!(view.course.content_url.is_none());

    let result = fx
        .confirm
        .handle(ConfirmPaymentCommand {
            order_id: view.id,
            method_token: "tok_success".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(result.status, PaymentStatus::Success);

    // The owner's projection now includes the content reference.
    let order = fx.store.find_by_id(&view.id).await.unwrap().unwrap();
    let projected = coursepay::domain::order::project_order(&order, &buyer());
    assert_eq!(
        projected.course.content_url.as_deref(),
        Some("https://cdn.example.com/crypto/content")
    );
}

#[tokio::test]
async fn failed_confirmation_then_retry_issues_fresh_attempt() {
    let fx = fixture();

    let view = fx
        .create
        .handle(CreateOrderCommand {
            caller: buyer(),
            course_id: fx.course_id,
        })
        .await
        .unwrap();
    let first_payment_id = view.payment_id.clone();

    let result = fx
        .confirm
        .handle(ConfirmPaymentCommand {
            order_id: view.id,
            method_token: "tok_declined".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(result.status, PaymentStatus::Failed);

    let retried = fx
        .retry
        .handle(RetryPaymentCommand {
            caller: buyer(),
            order_id: view.id,
        })
        .await
        .unwrap();

    assert_eq!(retried.status, PaymentStatus::Pending);
    assert_ne!(retried.payment_id, first_payment_id);
    assert!(!retried.client_secret.is_empty());
}

#[tokio::test]
async fn duplicate_webhook_delivery_has_no_second_effect() {
    let fx = fixture();

    let view = fx
        .create
        .handle(CreateOrderCommand {
            caller: buyer(),
            course_id: fx.course_id,
        })
        .await
        .unwrap();

    fx.provider
        .set_event(succeeded_event(&view.payment_id, view.id));

    let first = fx.webhook.handle(delivery()).await.unwrap();
    let after_first = fx.store.find_by_id(&view.id).await.unwrap().unwrap();

    let second = fx.webhook.handle(delivery()).await.unwrap();
    let after_second = fx.store.find_by_id(&view.id).await.unwrap().unwrap();

    assert_eq!(first, IngestWebhookResult::Applied);
    assert_eq!(second, IngestWebhookResult::Applied);
    assert_eq!(after_first, after_second);
    assert_eq!(after_second.status, PaymentStatus::Success);
}

#[tokio::test]
async fn stale_webhook_after_retry_leaves_new_attempt_alone() {
    let fx = fixture();

    let view = fx
        .create
        .handle(CreateOrderCommand {
            caller: buyer(),
            course_id: fx.course_id,
        })
        .await
        .unwrap();
    let first_payment_id = view.payment_id.clone();

    let retried = fx
        .retry
        .handle(RetryPaymentCommand {
            caller: buyer(),
            order_id: view.id,
        })
        .await
        .unwrap();

    // A late success report for the superseded attempt arrives.
    fx.provider
        .set_event(succeeded_event(&first_payment_id, view.id));
    let outcome = fx.webhook.handle(delivery()).await.unwrap();

    assert_eq!(outcome, IngestWebhookResult::Ignored);
    let stored = fx.store.find_by_id(&view.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PaymentStatus::Pending);
    assert_eq!(stored.payment_id, retried.payment_id);

    // The current attempt still resolves normally afterwards.
    fx.provider
        .set_event(succeeded_event(&retried.payment_id, view.id));
    let outcome = fx.webhook.handle(delivery()).await.unwrap();
    assert_eq!(outcome, IngestWebhookResult::Applied);

    let stored = fx.store.find_by_id(&view.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PaymentStatus::Success);
}

#[tokio::test]
async fn repurchase_after_success_is_rejected() {
    let fx = fixture();

    let view = fx
        .create
        .handle(CreateOrderCommand {
            caller: buyer(),
            course_id: fx.course_id,
        })
        .await
        .unwrap();

    fx.confirm
        .handle(ConfirmPaymentCommand {
            order_id: view.id,
            method_token: "tok_success".to_string(),
        })
        .await
        .unwrap();

    let result = fx
        .create
        .handle(CreateOrderCommand {
            caller: buyer(),
            course_id: fx.course_id,
        })
        .await;

    assert_eq!(result.unwrap_err().code, ErrorCode::AlreadyPurchased);
}

#[tokio::test]
async fn cancel_after_success_is_rejected_and_order_unchanged() {
    let fx = fixture();

    let view = fx
        .create
        .handle(CreateOrderCommand {
            caller: buyer(),
            course_id: fx.course_id,
        })
        .await
        .unwrap();

    fx.confirm
        .handle(ConfirmPaymentCommand {
            order_id: view.id,
            method_token: "tok_success".to_string(),
        })
        .await
        .unwrap();

    let result = fx
        .cancel
        .handle(CancelOrderCommand {
            caller: buyer(),
            order_id: view.id,
        })
        .await;

    assert_eq!(result.unwrap_err().code, ErrorCode::CannotCancelCompleted);
    let stored = fx.store.find_by_id(&view.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PaymentStatus::Success);
}

#[tokio::test]
async fn webhook_and_confirmation_race_settles_once() {
    let fx = fixture();

    let view = fx
        .create
        .handle(CreateOrderCommand {
            caller: buyer(),
            course_id: fx.course_id,
        })
        .await
        .unwrap();

    fx.provider
        .set_event(succeeded_event(&view.payment_id, view.id));

    let confirm_handler = fx.confirm;
    let webhook_handler = fx.webhook;
    let order_id = view.id;

    let confirm = tokio::spawn(async move {
        confirm_handler
            .handle(ConfirmPaymentCommand {
                order_id,
                method_token: "tok_success".to_string(),
            })
            .await
    });
    let webhook = tokio::spawn(async move { webhook_handler.handle(delivery()).await });

    let confirm_result = confirm.await.unwrap().unwrap();
    let webhook_result = webhook.await.unwrap().unwrap();

    // Both observers see SUCCESS; whichever lost the race was a no-op.
    assert_eq!(confirm_result.status, PaymentStatus::Success);
    assert!(matches!(
        webhook_result,
        IngestWebhookResult::Applied | IngestWebhookResult::Ignored
    ));

    let stored = fx.store.find_by_id(&view.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PaymentStatus::Success);
}
