//! User directory port.
//!
//! Account management lives in a separate service; the core only needs to
//! resolve buyers by id or email.

use crate::domain::foundation::{DomainError, UserId};
use async_trait::async_trait;

/// A user as known to the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// The user's identifier.
    pub id: UserId,

    /// The user's email address.
    pub email: String,
}

/// Lookup port for user accounts.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find a user by id. Returns `None` if absent.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, DomainError>;

    /// Find a user by email. Returns `None` if absent.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DomainError>;
}
