//! Caller identity for authorization decisions.
//!
//! Identity and role are resolved upstream (gateway or auth middleware);
//! the domain only sees who is asking and whether they carry the
//! administrative privilege.

use super::UserId;

/// The authenticated caller of an operation.
///
/// Privileged callers bypass ownership checks and see gated fields on any
/// order. Ordinary callers see gated fields only on their own resolved
/// orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// The caller's user identifier.
    pub user_id: UserId,

    /// Whether the caller holds the administrative role.
    pub privileged: bool,
}

impl Caller {
    /// Creates an ordinary (non-privileged) caller.
    pub fn user(user_id: UserId) -> Self {
        Self {
            user_id,
            privileged: false,
        }
    }

    /// Creates a privileged (administrative) caller.
    pub fn privileged(user_id: UserId) -> Self {
        Self {
            user_id,
            privileged: true,
        }
    }

    /// Returns true if this caller owns the given resource or is privileged.
    pub fn owns_or_privileged(&self, owner: &UserId) -> bool {
        self.privileged || &self.user_id == owner
    }
}
