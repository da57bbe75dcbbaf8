//! Role-based access gate
//!
//! Maps (principal, resource class) to an allow/deny decision. The gate is
//! stateless and takes an already-authenticated principal; it never
//! re-validates credentials or session existence.

use crate::auth::directory::{Principal, Role};
use crate::error::{AuthGateError, Result};

/// Resource classes guarded by the gate. The raw query value is decided
/// into this enum once at the boundary and never re-stringified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceClass {
    Users,
    Admin,
    Unknown(String),
}

impl ResourceClass {
    /// Parse the raw query value. An absent resource defaults to `Users`.
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw {
            None | Some("users") => ResourceClass::Users,
            Some("admin") => ResourceClass::Admin,
            Some(other) => ResourceClass::Unknown(other.to_string()),
        }
    }
}

/// The decision function over the two-tier role lattice
pub struct AccessGate;

impl AccessGate {
    /// Decide whether the principal may access the resource class.
    ///
    /// An unrecognized resource is its own failure kind, not a deny; the
    /// admin-required message differs from the generic insufficient-role
    /// one for UX only.
    pub fn check(principal: &Principal, resource: &ResourceClass) -> Result<()> {
        let required = match resource {
            ResourceClass::Users => Role::User,
            ResourceClass::Admin => Role::Admin,
            ResourceClass::Unknown(name) => {
                return Err(AuthGateError::UnknownResource(name.clone()))
            }
        };

        if principal.role.satisfies(required) {
            Ok(())
        } else {
            match required {
                Role::Admin => Err(AuthGateError::AdminRequired),
                Role::User => Err(AuthGateError::InsufficientRole),
            }
        }
    }
}
