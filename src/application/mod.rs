//! Application layer.
//!
//! Command and query handlers orchestrating the domain against the ports,
//! plus the keyed critical sections that serialize transitions per order.

pub mod handlers;
pub mod locks;
