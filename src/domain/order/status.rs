//! Payment status state machine.
//!
//! Defines the order's payment states and valid transitions across the
//! purchase lifecycle, plus the resolution outcomes a payment provider
//! can report for an attempt.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Payment status of a purchase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// A payment attempt is outstanding with the provider.
    /// No access to protected content.
    Pending,

    /// The provider confirmed payment. Grants access; final for the order.
    Success,

    /// The provider reported the attempt failed.
    /// Final for the attempt; a retry starts a new attempt.
    Failed,

    /// The buyer withdrew the order before it resolved.
    /// A retry re-enters the lifecycle with a fresh attempt.
    Cancelled,
}

impl PaymentStatus {
    /// Returns true if this status grants access to protected content.
    pub fn grants_access(&self) -> bool {
        matches!(self, PaymentStatus::Success)
    }

    /// Returns true if the current payment attempt has resolved.
    ///
    /// A resolved status is final for the attempt's payment id: the first
    /// accepted resolution wins and later conflicting reports are ignored.
    pub fn is_resolved(&self) -> bool {
        matches!(self, PaymentStatus::Success | PaymentStatus::Failed)
    }
}

impl StateMachine for PaymentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PaymentStatus::*;
        matches!(
            (self, target),
            // From PENDING: the provider resolves the attempt, or the buyer cancels
            (Pending, Success)
                | (Pending, Failed)
                | (Pending, Cancelled)
            // From FAILED: retry opens a fresh attempt
                | (Failed, Pending)
            // From CANCELLED: retry re-enters the lifecycle
                | (Cancelled, Pending)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PaymentStatus::*;
        match self {
            Pending => vec![Success, Failed, Cancelled],
            Success => vec![],
            Failed => vec![Pending],
            Cancelled => vec![Pending],
        }
    }
}

/// Resolution the provider reports for one payment attempt.
///
/// Only resolutions enter the reconcile path; intermediate provider states
/// ("processing", "requires_action") never mutate an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentResolution {
    /// The provider collected the payment.
    Succeeded,
    /// The provider could not collect the payment.
    Failed,
}

impl PaymentResolution {
    /// The order status this resolution maps to.
    pub fn status(&self) -> PaymentStatus {
        match self {
            PaymentResolution::Succeeded => PaymentStatus::Success,
            PaymentResolution::Failed => PaymentStatus::Failed,
        }
    }

    /// Maps a provider intent status string to a resolution.
    ///
    /// The provider reports "succeeded" for collected payments; any other
    /// confirmation outcome is treated as a failure of the attempt.
    pub fn from_provider_status(status: &str) -> Self {
        if status == "succeeded" {
            PaymentResolution::Succeeded
        } else {
            PaymentResolution::Failed
        }
    }
}
