//! Role names and the capability check used to gate mutations.
//!
//! A user holds any number of roles; each role row carries capability flags.
//! Handlers never inspect role names directly, they ask [`authorize`] whether
//! the role set grants a [`Capability`].
//!
//! Role names must match the seed data in `20250101000002_create_roles.sql`.

use crate::error::CoreError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EDITOR: &str = "editor";
pub const ROLE_VIEWER: &str = "viewer";

/// An action a role may permit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Create and edit characters, tags, relationships and images.
    Create,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::Create => "can_create",
        }
    }
}

/// Implemented by anything that exposes a role's capability flags.
pub trait RoleCapabilities {
    fn can_create(&self) -> bool;

    fn grants(&self, capability: Capability) -> bool {
        match capability {
            Capability::Create => self.can_create(),
        }
    }
}

/// `true` when at least one role in the set grants `capability`.
pub fn has_capability<R: RoleCapabilities>(roles: &[R], capability: Capability) -> bool {
    roles.iter().any(|role| role.grants(capability))
}

/// Fail with [`CoreError::Forbidden`] unless the role set grants `capability`.
pub fn authorize<R: RoleCapabilities>(roles: &[R], capability: Capability) -> Result<(), CoreError> {
    if has_capability(roles, capability) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Missing capability: {}",
            capability.as_str()
        )))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    struct Flag(bool);

    impl RoleCapabilities for Flag {
        fn can_create(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn empty_role_set_is_forbidden() {
        let roles: Vec<Flag> = Vec::new();
        assert!(!has_capability(&roles, Capability::Create));
        assert_matches!(
            authorize(&roles, Capability::Create),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn any_granting_role_is_enough() {
        let roles = vec![Flag(false), Flag(true), Flag(false)];
        assert!(authorize(&roles, Capability::Create).is_ok());
    }

    #[test]
    fn roles_without_flag_are_forbidden() {
        let roles = vec![Flag(false), Flag(false)];
        let err = authorize(&roles, Capability::Create).unwrap_err();
        assert!(err.to_string().contains("can_create"));
    }
}
