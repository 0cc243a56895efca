//! Pure role gate over the issue status workflow.
//!
//! The gate is total over the 5×5 transition space: every non-adjacent
//! status pair denies with [`DenialReason::InvalidTransition`], every
//! forward edge allows or denies keyed on role alone. Department scoping is
//! layered on top by the access control engine; this module knows nothing
//! about users or records.

use super::{DenialReason, IssueStatus, PermissionDecision, Role};

/// Decides whether `role` may drive the status change `from` → `to`.
///
/// Edge gates:
///
/// - Draft→Open and Remediated→Closed require Editor or Administrator.
/// - Open→In Progress and In Progress→Remediated are open to any role with
///   edit access, which excludes Viewer.
/// - Everything else is not a workflow edge and denies with
///   `InvalidTransition` regardless of role.
#[must_use]
pub fn gate_transition(role: Role, from: IssueStatus, to: IssueStatus) -> PermissionDecision {
    if !from.can_advance_to(to) {
        return PermissionDecision::Deny(DenialReason::InvalidTransition);
    }
    let permitted = match (from, to) {
        (IssueStatus::Draft, IssueStatus::Open)
        | (IssueStatus::Remediated, IssueStatus::Closed) => {
            role.capabilities().can_close_issues
        }
        (IssueStatus::Open, IssueStatus::InProgress)
        | (IssueStatus::InProgress, IssueStatus::Remediated) => role != Role::Viewer,
        // Unreachable behind `can_advance_to`, kept for totality.
        _ => false,
    };
    if permitted {
        PermissionDecision::Allow
    } else {
        PermissionDecision::Deny(DenialReason::InsufficientRole)
    }
}
