//! Ownership trait for user-owned resources.
//!
//! Standardizes the owner-or-privileged rule used by retry, cancel, and
//! the single-order read path, instead of ad-hoc checks per operation.
//!
//! # Example
//!
//! ```ignore
//! impl OwnedByUser for Order {
//!     fn owner_id(&self) -> &UserId {
//!         &self.user_id
//!     }
//! }
//!
//! // In a handler:
//! order.check_access(&caller)?;  // Returns Err(Forbidden) if not owner nor privileged
//! ```

use super::{Caller, DomainError, ErrorCode, UserId};

/// Trait for aggregates that have a single owner.
///
/// Implementors return the `UserId` of the owning user; the trait provides
/// the authorization check against a [`Caller`].
pub trait OwnedByUser {
    /// Returns the ID of the user who owns this resource.
    fn owner_id(&self) -> &UserId;

    /// Checks if the given user is the owner.
    fn is_owner(&self, user_id: &UserId) -> bool {
        self.owner_id() == user_id
    }

    /// Validates access, returning an error unless the caller is the owner
    /// or carries the administrative privilege.
    ///
    /// This is the preferred method in command handlers as it returns a
    /// properly formed `DomainError` with `Forbidden` code.
    fn check_access(&self, caller: &Caller) -> Result<(), DomainError> {
        if caller.owns_or_privileged(self.owner_id()) {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::Forbidden,
                "Caller does not own this resource",
            )
            .with_detail("owner_id", self.owner_id().to_string())
            .with_detail("requested_by", caller.user_id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test struct that implements OwnedByUser
    struct TestResource {
        owner: UserId,
    }

    impl OwnedByUser for TestResource {
        fn owner_id(&self) -> &UserId {
            &self.owner
        }
    }

    fn test_user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[test]
    fn is_owner_returns_true_for_owner() {
        let owner = test_user("owner-123");
        let resource = TestResource {
            owner: owner.clone(),
        };

        assert!(resource.is_owner(&owner));
    }

    #[test]
    fn is_owner_returns_false_for_non_owner() {
        let resource = TestResource {
            owner: test_user("owner-123"),
        };

        assert!(!resource.is_owner(&test_user("other-456")));
    }

    #[test]
    fn check_access_succeeds_for_owner() {
        let owner = test_user("owner-123");
        let resource = TestResource {
            owner: owner.clone(),
        };

        assert!(resource.check_access(&Caller::user(owner)).is_ok());
    }

    #[test]
    fn check_access_succeeds_for_privileged_non_owner() {
        let resource = TestResource {
            owner: test_user("owner-123"),
        };

        let result = resource.check_access(&Caller::privileged(test_user("admin-1")));
        assert!(result.is_ok());
    }

    #[test]
    fn check_access_fails_for_non_owner() {
        let resource = TestResource {
            owner: test_user("owner-123"),
        };

        let result = resource.check_access(&Caller::user(test_user("other-456")));
        assert!(result.is_err());

        let err = result.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
        assert!(err.message.contains("does not own"));
    }

    #[test]
    fn check_access_error_includes_details() {
        let resource = TestResource {
            owner: test_user("owner-123"),
        };

        let err = resource
            .check_access(&Caller::user(test_user("other-456")))
            .unwrap_err();

        assert_eq!(err.details.get("owner_id"), Some(&"owner-123".to_string()));
        assert_eq!(
            err.details.get("requested_by"),
            Some(&"other-456".to_string())
        );
    }
}
