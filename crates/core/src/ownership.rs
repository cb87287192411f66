//! Ownership checks shared by every entity the engine guards.
//!
//! Entities answer `owning_user()` themselves, so permission checks never
//! branch on the concrete entity type.

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// The authenticated principal supplied by the identity boundary.
///
/// The engine trusts this value as-is and only uses it to scope ownership.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: String,
}

impl Principal {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Capability of an entity to report the user that owns it.
pub trait Ownable {
    /// Identifier of the owning user.
    fn owning_user(&self) -> &str;

    /// Human readable label used in permission errors.
    fn ownership_label(&self) -> String;

    fn is_owned_by(&self, principal: &Principal) -> bool {
        self.owning_user() == principal.user_id
    }
}

/// Fails with `PermissionDenied` unless `principal` owns `entity`.
pub fn ensure_owned_by<T: Ownable + ?Sized>(entity: &T, principal: &Principal) -> Result<()> {
    if entity.is_owned_by(principal) {
        Ok(())
    } else {
        Err(Error::PermissionDenied(format!(
            "{} is not owned by the current user",
            entity.ownership_label()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Thing {
        owner: String,
    }

    impl Ownable for Thing {
        fn owning_user(&self) -> &str {
            &self.owner
        }

        fn ownership_label(&self) -> String {
            "Thing".to_string()
        }
    }

    #[test]
    fn test_owner_passes() {
        let thing = Thing {
            owner: "user-1".to_string(),
        };
        assert!(ensure_owned_by(&thing, &Principal::new("user-1")).is_ok());
    }

    #[test]
    fn test_other_user_is_denied() {
        let thing = Thing {
            owner: "user-1".to_string(),
        };
        let err = ensure_owned_by(&thing, &Principal::new("user-2")).unwrap_err();
        assert!(matches!(err, Error::PermissionDenied(_)));
    }
}
