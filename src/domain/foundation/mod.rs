//! Foundation types shared across the domain.
//!
//! Value objects, error types, and traits with no dependencies on any
//! specific aggregate: identifiers, timestamps, the state machine trait,
//! ownership checking, and the caller identity.

mod caller;
mod errors;
mod ids;
mod ownership;
mod state_machine;
mod timestamp;

pub use caller::Caller;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{CourseId, OrderId, UserId};
pub use ownership::OwnedByUser;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
