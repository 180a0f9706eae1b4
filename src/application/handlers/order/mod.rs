//! Order lifecycle handlers.
//!
//! Creation, retry, cancellation, and the read paths. Every returned order
//! passes through the access-gated projection.

mod cancel_order;
mod create_order;
mod get_order;
mod list_all_orders;
mod list_my_orders;
mod retry_payment;

pub use cancel_order::{CancelOrderCommand, CancelOrderHandler};
pub use create_order::{CreateOrderCommand, CreateOrderHandler};
pub use get_order::{GetOrderHandler, GetOrderQuery};
pub use list_all_orders::{ListAllOrdersHandler, ListAllOrdersQuery};
pub use list_my_orders::{ListMyOrdersHandler, ListMyOrdersQuery};
pub use retry_payment::{RetryPaymentCommand, RetryPaymentHandler};
