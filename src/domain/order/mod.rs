//! Order domain module.
//!
//! Handles the purchase order lifecycle: creation, payment attempts,
//! reconciliation of provider outcomes, cancellation, and the access-gated
//! projection of orders for callers.
//!
//! # Module Structure
//!
//! - `aggregate` - Order aggregate entity and the idempotent reconcile primitive
//! - `course` - Course snapshot embedded in each order
//! - `status` - PaymentStatus state machine and provider resolutions
//! - `view` - Access-gated order projection (AccessPolicy)

mod aggregate;
mod course;
mod status;
mod view;

pub use aggregate::{IgnoreReason, Order, PaymentAttempt, TransitionOutcome};
pub use course::Course;
pub use status::{PaymentResolution, PaymentStatus};
pub use view::{project_order, CourseView, OrderView};
