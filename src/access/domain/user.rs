//! User account record and identifier.

use super::{DepartmentScope, Role};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a user account, assigned by the user store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Creates a user identifier from a store-assigned value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User account as owned by the user store.
///
/// The password hash is opaque to this crate; credential verification and
/// account mutation are Administrator actions performed by the collaborating
/// user store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: String,
    password_hash: String,
    role: Role,
    view_scope: DepartmentScope,
    edit_scope: DepartmentScope,
    must_change_password: bool,
}

impl User {
    /// Creates a user record.
    ///
    /// `edit_scope` is meaningful for the Editor role only; other roles use
    /// `view_scope` for both viewing and (where permitted) editing.
    #[must_use]
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
        view_scope: DepartmentScope,
        edit_scope: DepartmentScope,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            password_hash: password_hash.into(),
            role,
            view_scope,
            edit_scope,
            must_change_password: false,
        }
    }

    /// Marks the account as requiring a password change at next login.
    #[must_use]
    pub const fn with_forced_password_change(mut self) -> Self {
        self.must_change_password = true;
        self
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the unique username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the opaque password credential.
    #[must_use]
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Returns the user's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the departments the user may view.
    #[must_use]
    pub const fn view_scope(&self) -> &DepartmentScope {
        &self.view_scope
    }

    /// Returns the departments the user may edit (Editor role).
    #[must_use]
    pub const fn edit_scope(&self) -> &DepartmentScope {
        &self.edit_scope
    }

    /// Returns `true` when the account must change its password at login.
    #[must_use]
    pub const fn must_change_password(&self) -> bool {
        self.must_change_password
    }
}
