//! Order aggregate entity.
//!
//! The Order aggregate links a buyer, a course snapshot, and the current
//! payment attempt. It owns the reconcile primitive that both confirmation
//! paths (synchronous confirm and provider webhook) converge on.
//!
//! # Design Decisions
//!
//! - **One SUCCESS per (user, course)**: enforced by the store's partial
//!   unique index plus a pair-keyed critical section in the create handler
//! - **Money in cents**: all monetary values are i64 minor units
//! - **Attempt identity**: `payment_id`/`client_secret` always describe the
//!   current outstanding attempt and are replaced together on retry
//! - **First resolution wins**: a resolved attempt never changes status for
//!   the same payment id; conflicting reports are ignored, not applied

use crate::domain::foundation::{
    DomainError, ErrorCode, OrderId, OwnedByUser, StateMachine, Timestamp, UserId,
};
use serde::{Deserialize, Serialize};

use super::{Course, PaymentResolution, PaymentStatus};

/// Provider-issued credentials for one payment attempt.
///
/// Both fields come from a single intent-creation call and are stored
/// together, atomically with respect to the order record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentAttempt {
    /// Provider's payment intent id.
    pub payment_id: String,

    /// Provider's confirmation token for the client. Ephemeral; replaced on retry.
    pub client_secret: String,
}

/// Outcome of feeding a provider resolution into an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The resolution was accepted. Covers both a fresh transition and an
    /// idempotent replay of the already-accepted resolution.
    Applied,

    /// The resolution was deliberately not applied. Never an error; the
    /// reason is kept for audit logging.
    Ignored(IgnoreReason),
}

/// Why a provider resolution was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The resolution refers to a superseded attempt (a retry issued a new
    /// payment id after this one).
    StaleAttempt,

    /// The attempt already resolved to a different status. The first
    /// accepted resolution is authoritative.
    ConflictingResolution,

    /// The order was cancelled before the attempt resolved.
    OrderCancelled,
}

/// Order aggregate - one purchase of a course by a user.
///
/// # Invariants
///
/// - `id` is globally unique and immutable
/// - `payment_id` and `client_secret` describe the current attempt
/// - Status transitions follow the [`PaymentStatus`] state machine
/// - `created_at` reflects the start of the current attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier for this order.
    pub id: OrderId,

    /// User who placed the order.
    pub user_id: UserId,

    /// Course as sold, snapshotted at creation.
    pub course: Course,

    /// Current status in the payment lifecycle.
    pub status: PaymentStatus,

    /// Provider payment intent id for the current attempt.
    pub payment_id: String,

    /// Provider confirmation token for the current attempt.
    pub client_secret: String,

    /// When the current payment attempt started.
    pub created_at: Timestamp,

    /// When the order was last updated.
    pub updated_at: Timestamp,

    /// When the order was cancelled (if cancelled).
    pub cancelled_at: Option<Timestamp>,
}

impl Order {
    /// Creates a new pending order for a fresh payment attempt.
    ///
    /// The caller reserves the id before asking the provider for an intent,
    /// so the intent metadata carries the final persisted order id.
    pub fn create(id: OrderId, user_id: UserId, course: Course, attempt: PaymentAttempt) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            user_id,
            course,
            status: PaymentStatus::Pending,
            payment_id: attempt.payment_id,
            client_secret: attempt.client_secret,
            created_at: now,
            updated_at: now,
            cancelled_at: None,
        }
    }

    /// Starts a new payment attempt (retry).
    ///
    /// Replaces the provider credentials, resets the order to Pending, and
    /// refreshes `created_at` to mark the new attempt. The previous payment
    /// id becomes unreachable: any late resolution bearing it is ignored by
    /// [`Order::reconcile`].
    ///
    /// # Errors
    ///
    /// Returns `PaymentAlreadyCompleted` if the order already resolved SUCCESS.
    pub fn begin_new_attempt(&mut self, attempt: PaymentAttempt) -> Result<(), DomainError> {
        if self.status == PaymentStatus::Success {
            return Err(DomainError::new(
                ErrorCode::PaymentAlreadyCompleted,
                "Payment already completed for this order",
            )
            .with_detail("order_id", self.id.to_string()));
        }

        let now = Timestamp::now();
        self.status = PaymentStatus::Pending;
        self.payment_id = attempt.payment_id;
        self.client_secret = attempt.client_secret;
        self.created_at = now;
        self.updated_at = now;
        self.cancelled_at = None;
        Ok(())
    }

    /// Cancels a pending order.
    ///
    /// Cancelling an already-cancelled order is an idempotent no-op success.
    ///
    /// # Errors
    ///
    /// - `CannotCancelCompleted` if the order resolved SUCCESS
    /// - `InvalidStateTransition` if the order resolved FAILED (retry or
    ///   leave it; a resolved order is not silently cancelled)
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        match self.status {
            PaymentStatus::Cancelled => Ok(()),
            PaymentStatus::Success => Err(DomainError::new(
                ErrorCode::CannotCancelCompleted,
                "Cannot cancel a completed purchase",
            )
            .with_detail("order_id", self.id.to_string())),
            PaymentStatus::Failed => Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Only pending orders can be cancelled",
            )
            .with_detail("order_id", self.id.to_string())),
            PaymentStatus::Pending => {
                self.status = self
                    .status
                    .transition_to(PaymentStatus::Cancelled)
                    .map_err(|e| {
                        DomainError::new(ErrorCode::InvalidStateTransition, e.to_string())
                    })?;
                let now = Timestamp::now();
                self.cancelled_at = Some(now);
                self.updated_at = now;
                Ok(())
            }
        }
    }

    /// Feeds one provider resolution into the order.
    ///
    /// This is the idempotent transition primitive both the synchronous
    /// confirm path and the webhook path converge on. Callers must hold the
    /// per-order critical section; the rules here assume no concurrent
    /// mutation of this aggregate instance.
    ///
    /// Rules, in order:
    /// 1. A resolution for a payment id other than the current attempt is
    ///    ignored (stale attempt after retry).
    /// 2. Replaying the already-accepted resolution is `Applied` with no
    ///    mutation (duplicate webhook delivery).
    /// 3. A conflicting resolution for an already-resolved attempt is
    ///    ignored; the first accepted resolution wins.
    /// 4. A resolution for a cancelled order is ignored.
    /// 5. A pending order takes the resolution.
    pub fn reconcile(
        &mut self,
        provider_payment_id: &str,
        resolution: PaymentResolution,
    ) -> TransitionOutcome {
        if self.payment_id != provider_payment_id {
            return TransitionOutcome::Ignored(IgnoreReason::StaleAttempt);
        }

        let target = resolution.status();

        if self.status == target {
            return TransitionOutcome::Applied;
        }

        if self.status.is_resolved() {
            return TransitionOutcome::Ignored(IgnoreReason::ConflictingResolution);
        }

        if self.status == PaymentStatus::Cancelled {
            return TransitionOutcome::Ignored(IgnoreReason::OrderCancelled);
        }

        self.status = target;
        self.updated_at = Timestamp::now();
        TransitionOutcome::Applied
    }
}

impl OwnedByUser for Order {
    fn owner_id(&self) -> &UserId {
        &self.user_id
    }
}
