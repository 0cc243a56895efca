//! Access control engine composing role policy, department scoping, and the
//! workflow gate into record- and field-level decisions.
//!
//! The engine is pure computation: it reads role, scope, and status and
//! produces [`PermissionDecision`] values. It never touches storage, never
//! retries (decisions are deterministic), and never logs; the calling layer
//! is responsible for emitting audit events from decision outcomes.

use crate::access::domain::{
    CreationDecision, DenialReason, Issue, IssueField, IssueStatus, PermissionDecision, Role, User,
    workflow,
};

/// Record- and field-level permission decisions for one configuration.
///
/// Construct with [`AccessControlEngine::new`], passing the current value of
/// the `authentication_enabled` setting. When authentication is disabled the
/// engine substitutes the Administrator role for every decision (the full
/// bypass the desktop application documents) while still enforcing workflow
/// edge validity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessControlEngine {
    bypass_roles: bool,
}

impl AccessControlEngine {
    /// Creates an engine.
    ///
    /// `authentication_enabled = false` puts the engine in bypass mode.
    #[must_use]
    pub const fn new(authentication_enabled: bool) -> Self {
        Self {
            bypass_roles: !authentication_enabled,
        }
    }

    /// Returns the role every decision is evaluated under.
    const fn effective_role(self, user: &User) -> Role {
        if self.bypass_roles {
            Role::Administrator
        } else {
            user.role()
        }
    }

    /// Decides whether `user` may view `issue`.
    #[must_use]
    pub fn can_view(self, user: &User, issue: &Issue) -> PermissionDecision {
        match self.effective_role(user) {
            Role::Administrator => PermissionDecision::Allow,
            Role::Editor | Role::Restricted | Role::Viewer => {
                if user.view_scope().permits(issue.department()) {
                    PermissionDecision::Allow
                } else {
                    PermissionDecision::Deny(DenialReason::DepartmentOutOfScope)
                }
            }
        }
    }

    /// Decides whether `user` may edit `field` on `issue`.
    ///
    /// The Restricted role is limited to its fixed field subset and is
    /// locked out entirely while the record is in Draft or Closed. Status
    /// changes during valid forward transitions are exempt from that lock;
    /// see [`Self::can_transition`].
    #[must_use]
    pub fn can_edit(self, user: &User, issue: &Issue, field: IssueField) -> PermissionDecision {
        match self.effective_role(user) {
            Role::Administrator => PermissionDecision::Allow,
            Role::Viewer => PermissionDecision::Deny(DenialReason::InsufficientRole),
            Role::Editor => {
                if user.edit_scope().permits(issue.department()) {
                    PermissionDecision::Allow
                } else {
                    PermissionDecision::Deny(DenialReason::DepartmentOutOfScope)
                }
            }
            Role::Restricted => {
                if !user.view_scope().permits(issue.department()) {
                    PermissionDecision::Deny(DenialReason::DepartmentOutOfScope)
                } else if matches!(issue.status, IssueStatus::Draft | IssueStatus::Closed) {
                    PermissionDecision::Deny(DenialReason::RecordLocked)
                } else if field.restricted_editable() {
                    PermissionDecision::Allow
                } else {
                    PermissionDecision::Deny(DenialReason::FieldLocked)
                }
            }
        }
    }

    /// Decides whether `user` may create issues, and at which status.
    ///
    /// Viewer is denied; Restricted is forced to Draft; Editor and
    /// Administrator choose their own initial status (defaulting to Open).
    #[must_use]
    pub fn can_create(self, user: &User) -> CreationDecision {
        let caps = self.effective_role(user).capabilities();
        if caps.can_create_issues {
            CreationDecision::Allow {
                forced_initial_status: caps.forced_initial_status,
            }
        } else {
            CreationDecision::Deny(DenialReason::InsufficientRole)
        }
    }

    /// Decides whether `user` may move `issue` to `target`.
    ///
    /// Delegates edge validity and the role gate to
    /// [`workflow::gate_transition`], then applies department scoping. The
    /// Draft/Closed record lock deliberately does not apply here: the act of
    /// transitioning is what changes the status.
    #[must_use]
    pub fn can_transition(
        self,
        user: &User,
        issue: &Issue,
        target: IssueStatus,
    ) -> PermissionDecision {
        let role = self.effective_role(user);
        let gate = workflow::gate_transition(role, issue.status, target);
        if !gate.is_allowed() {
            return gate;
        }
        let in_scope = match role {
            Role::Administrator => true,
            Role::Editor => user.edit_scope().permits(issue.department()),
            Role::Restricted | Role::Viewer => user.view_scope().permits(issue.department()),
        };
        if in_scope {
            PermissionDecision::Allow
        } else {
            PermissionDecision::Deny(DenialReason::DepartmentOutOfScope)
        }
    }

    /// Decides whether `user` may delete `issue`. Administrator only.
    #[must_use]
    pub fn can_delete(self, user: &User, _issue: &Issue) -> PermissionDecision {
        match self.effective_role(user) {
            Role::Administrator => PermissionDecision::Allow,
            Role::Editor | Role::Restricted | Role::Viewer => {
                PermissionDecision::Deny(DenialReason::InsufficientRole)
            }
        }
    }

    /// Decides whether `user` may manage attachments on `issue`.
    ///
    /// Attachment management is gated exactly like editing the
    /// supporting-documents field.
    #[must_use]
    pub fn can_manage_attachments(self, user: &User, issue: &Issue) -> PermissionDecision {
        self.can_edit(user, issue, IssueField::SupportingDocs)
    }

    /// Filters `issues` down to those `user` may view, preserving order.
    #[must_use]
    pub fn visible_issues(self, user: &User, issues: Vec<Issue>) -> Vec<Issue> {
        issues
            .into_iter()
            .filter(|issue| self.can_view(user, issue).is_allowed())
            .collect()
    }
}
