//! Order HTTP endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{CourseResponse, CreateOrderRequest, MessageResponse, OrderResponse};
pub use routes::routes;
