//! Role enum, per-role capability table, and department scope sets.

use super::{IssueStatus, ParseRoleError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// User role.
///
/// Roles form a closed set; every capability is derived from the fixed
/// table in [`Role::capabilities`] plus scope-set membership tests on
/// [`DepartmentScope`]. There is no inheritance between roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full system access, including user management and deletion.
    Administrator,
    /// Full issue editing within the edit department scope.
    Editor,
    /// Department-bound editing of a fixed field subset.
    Restricted,
    /// Read-only access within the view department scope.
    Viewer,
}

impl Role {
    /// Returns the canonical display and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Administrator => "Administrator",
            Self::Editor => "Editor",
            Self::Restricted => "Restricted",
            Self::Viewer => "Viewer",
        }
    }

    /// Returns the fixed capability row for this role.
    #[must_use]
    pub const fn capabilities(self) -> RoleCapabilities {
        match self {
            Self::Administrator => RoleCapabilities {
                can_manage_users: true,
                can_configure_database: true,
                can_bulk_import: true,
                can_export_data: true,
                can_close_issues: true,
                can_create_issues: true,
                forced_initial_status: None,
            },
            Self::Editor => RoleCapabilities {
                can_manage_users: false,
                can_configure_database: false,
                can_bulk_import: false,
                can_export_data: true,
                can_close_issues: true,
                can_create_issues: true,
                forced_initial_status: None,
            },
            Self::Restricted => RoleCapabilities {
                can_manage_users: false,
                can_configure_database: false,
                can_bulk_import: false,
                can_export_data: true,
                can_close_issues: false,
                can_create_issues: true,
                forced_initial_status: Some(IssueStatus::Draft),
            },
            Self::Viewer => RoleCapabilities {
                can_manage_users: false,
                can_configure_database: false,
                can_bulk_import: false,
                can_export_data: true,
                can_close_issues: false,
                can_create_issues: false,
                forced_initial_status: None,
            },
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "Administrator" => Ok(Self::Administrator),
            "Editor" => Ok(Self::Editor),
            "Restricted" => Ok(Self::Restricted),
            "Viewer" => Ok(Self::Viewer),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fixed capability row for a role.
///
/// One row per role; no hidden state. Department scoping is handled
/// separately by [`DepartmentScope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleCapabilities {
    /// May create, modify, and delete user accounts.
    pub can_manage_users: bool,
    /// May change the record store location and settings.
    pub can_configure_database: bool,
    /// May run bulk record imports.
    pub can_bulk_import: bool,
    /// May export visible records.
    pub can_export_data: bool,
    /// May drive Remediated→Closed (and Draft→Open) transitions.
    pub can_close_issues: bool,
    /// May create new issues at all.
    pub can_create_issues: bool,
    /// Initial status forced on records this role creates, if any.
    pub forced_initial_status: Option<IssueStatus>,
}

/// Set of departments a user may act within.
///
/// The empty set is an explicit sentinel for "unrestricted", not "none".
/// Membership is compared case-sensitively, matching the record store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepartmentScope(BTreeSet<String>);

impl DepartmentScope {
    /// Creates the unrestricted scope.
    #[must_use]
    pub const fn unrestricted() -> Self {
        Self(BTreeSet::new())
    }

    /// Creates a scope restricted to the given departments.
    ///
    /// An empty iterator yields the unrestricted scope.
    pub fn restricted_to(departments: impl IntoIterator<Item = String>) -> Self {
        Self(departments.into_iter().collect())
    }

    /// Returns `true` when the scope imposes no restriction.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` when a record in `department` falls within the scope.
    ///
    /// A record with no department assignment is accessible under every
    /// scope; an unrestricted scope permits every department.
    #[must_use]
    pub fn permits(&self, department: Option<&str>) -> bool {
        if self.0.is_empty() {
            return true;
        }
        department.is_none_or(|name| self.0.contains(name))
    }

    /// Returns the departments in the scope, in sorted order.
    pub fn departments(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}
