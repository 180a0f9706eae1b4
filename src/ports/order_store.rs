//! Order store port.
//!
//! Defines the contract for persisting and retrieving Order aggregates.
//!
//! # Design
//!
//! - **Indexed duplicate check**: `exists_successful_order` is an atomic
//!   store primitive, not a scan over all orders
//! - **No in-process caching**: every transition reads persisted state
//!   before deciding
//! - Implementations back `exists_successful_order` with a partial unique
//!   index so concurrent creations cannot both slip past the check

use crate::domain::foundation::{CourseId, DomainError, OrderId, UserId};
use crate::domain::order::Order;
use async_trait::async_trait;

/// Repository port for Order aggregate persistence.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert a new order.
    ///
    /// # Errors
    ///
    /// - `AlreadyPurchased` if the store's uniqueness constraint rejects a
    ///   second successful order for the same (user, course) pair
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, order: &Order) -> Result<(), DomainError>;

    /// Update an existing order.
    ///
    /// # Errors
    ///
    /// - `OrderNotFound` if the order doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, order: &Order) -> Result<(), DomainError>;

    /// Find an order by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError>;

    /// Find all orders placed by a user, most recent first.
    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Order>, DomainError>;

    /// Find all orders, most recent first. Privileged read path.
    async fn find_all(&self) -> Result<Vec<Order>, DomainError>;

    /// Check whether the user already holds a successful order for the course.
    ///
    /// This is the duplicate-purchase guard; it must be an indexed lookup
    /// evaluated against current persisted state.
    async fn exists_successful_order(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<bool, DomainError>;
}
