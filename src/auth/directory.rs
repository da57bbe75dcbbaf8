//! User directory and credential validation
//!
//! The directory is a fixed username -> {password, role} mapping,
//! read-only for process lifetime. Passwords are stored plaintext in this
//! demo scope; hashing policy is out of scope.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{AuthGateError, Result};
use crate::security::timing::constant_time_eq;

/// Coarse permission tier. `Admin` strictly supersedes `User`; no other
/// partial orders exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Whether this role satisfies the required tier
    pub fn satisfies(&self, required: Role) -> bool {
        match self {
            Role::Admin => true,
            Role::User => required == Role::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

/// An authenticated identity: the output of every successful strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub username: String,
    pub role: Role,
}

/// A directory entry
#[derive(Debug, Clone)]
pub struct User {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl User {
    pub fn new(username: &str, password: &str, role: Role) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            role,
        }
    }
}

/// Fixed mapping from username to directory entry
pub struct UserDirectory {
    users: HashMap<String, User>,
}

impl UserDirectory {
    pub fn new(entries: Vec<User>) -> Self {
        let users = entries
            .into_iter()
            .map(|user| (user.username.clone(), user))
            .collect();
        Self { users }
    }

    /// The built-in demo directory
    pub fn demo() -> Self {
        Self::new(vec![
            User::new("alice", "alice123", Role::User),
            User::new("admin", "admin123", Role::Admin),
        ])
    }

    /// Check a credential pair against the directory.
    ///
    /// Failure is always the same opaque error, whichever field was wrong.
    pub fn validate(&self, username: &str, password: &str) -> Result<Principal> {
        let user = self
            .users
            .get(username)
            .ok_or(AuthGateError::InvalidCredentials)?;

        if !constant_time_eq(&user.password, password) {
            return Err(AuthGateError::InvalidCredentials);
        }

        Ok(Principal {
            username: user.username.clone(),
            role: user.role,
        })
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
