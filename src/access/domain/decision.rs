//! Permission decision values returned by the access control engine.

use super::IssueStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cause of a denied permission decision.
///
/// Reasons are part of the public contract so the calling layer can present
/// an accurate message rather than a generic "not allowed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// The role never grants the requested action.
    InsufficientRole,
    /// The record's department lies outside the user's scope.
    DepartmentOutOfScope,
    /// The requested status change is not a workflow edge.
    InvalidTransition,
    /// The role may edit the record but not this field.
    FieldLocked,
    /// The record's current status locks it against this role.
    RecordLocked,
}

impl DenialReason {
    /// Returns a stable machine-readable code for the reason.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InsufficientRole => "insufficient_role",
            Self::DepartmentOutOfScope => "department_out_of_scope",
            Self::InvalidTransition => "invalid_transition",
            Self::FieldLocked => "field_locked",
            Self::RecordLocked => "record_locked",
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a single permission check.
///
/// Decisions are ephemeral values produced per call and never persisted.
/// Checks are total: they always produce a decision and never error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionDecision {
    /// The action is permitted.
    Allow,
    /// The action is denied for the stated reason.
    Deny(DenialReason),
}

impl PermissionDecision {
    /// Returns `true` when the action is permitted.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Returns the denial reason, if the decision is a denial.
    #[must_use]
    pub const fn denial_reason(self) -> Option<DenialReason> {
        match self {
            Self::Allow => None,
            Self::Deny(reason) => Some(reason),
        }
    }

    /// Converts the decision into a `Result`, erring with the denial reason.
    ///
    /// # Errors
    ///
    /// Returns the [`DenialReason`] when the decision is a denial.
    pub const fn into_result(self) -> Result<(), DenialReason> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(reason) => Err(reason),
        }
    }
}

/// Outcome of an issue-creation permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationDecision {
    /// Creation is permitted.
    Allow {
        /// Initial status the role is forced to use, if any. `None` leaves
        /// the choice to the caller (defaulting to [`IssueStatus::Open`]).
        forced_initial_status: Option<IssueStatus>,
    },
    /// Creation is denied for the stated reason.
    Deny(DenialReason),
}

impl CreationDecision {
    /// Returns `true` when creation is permitted.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow { .. })
    }
}
