//! Domain layer.
//!
//! Pure business logic: the order lifecycle, payment reconciliation rules,
//! and the access-gated projection. No I/O, no framework types beyond the
//! HTTP status mapping on boundary errors.

pub mod foundation;
pub mod order;
pub mod payment;
