//! Ports - boundary interfaces the core depends on.
//!
//! Each port is a trait the application layer consumes; adapters provide
//! the implementations (PostgreSQL for storage, Stripe for payments).

mod course_catalog;
mod order_store;
mod payment_provider;
mod user_directory;

pub use course_catalog::CourseCatalog;
pub use order_store::OrderStore;
pub use payment_provider::{
    CardDetails, CreateIntentRequest, IntentConfirmation, PaymentError, PaymentErrorCode,
    PaymentIntentRef, PaymentProvider,
};
pub use user_directory::{UserDirectory, UserRecord};
