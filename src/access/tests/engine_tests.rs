//! Unit tests for the access control engine's record- and field-level
//! decisions, including bypass mode.

use crate::access::domain::{
    CreationDecision, DenialReason, IssueField, IssueStatus, PermissionDecision, Role,
};
use crate::access::engine::AccessControlEngine;
use crate::access::tests::fixtures::{issue, scoped_user, unrestricted_user};
use rstest::{fixture, rstest};

#[fixture]
fn engine() -> AccessControlEngine {
    AccessControlEngine::new(true)
}

#[fixture]
fn bypass() -> AccessControlEngine {
    AccessControlEngine::new(false)
}

// ============================================================================
// can_view
// ============================================================================

#[rstest]
#[case(Role::Administrator, true)]
#[case(Role::Editor, false)]
#[case(Role::Restricted, false)]
#[case(Role::Viewer, false)]
fn only_administrator_views_outside_scope(
    engine: AccessControlEngine,
    #[case] role: Role,
    #[case] allowed: bool,
) {
    let actor = scoped_user(role, &["Finance"]);
    let record = issue(IssueStatus::Open, Some("Legal"));
    assert_eq!(engine.can_view(&actor, &record).is_allowed(), allowed);
}

#[rstest]
fn scoped_viewer_sees_records_in_scope(engine: AccessControlEngine) {
    let actor = scoped_user(Role::Viewer, &["Finance"]);
    let record = issue(IssueStatus::Open, Some("Finance"));
    assert_eq!(engine.can_view(&actor, &record), PermissionDecision::Allow);
}

#[rstest]
fn unrestricted_scope_views_every_department(engine: AccessControlEngine) {
    let actor = unrestricted_user(Role::Viewer);
    for department in [Some("Finance"), Some("Legal"), None] {
        let record = issue(IssueStatus::Open, department);
        assert!(engine.can_view(&actor, &record).is_allowed());
    }
}

// ============================================================================
// can_edit
// ============================================================================

#[rstest]
fn viewer_edits_nothing(engine: AccessControlEngine) {
    let actor = unrestricted_user(Role::Viewer);
    let record = issue(IssueStatus::Open, None);
    assert_eq!(
        engine.can_edit(&actor, &record, IssueField::Updates),
        PermissionDecision::Deny(DenialReason::InsufficientRole)
    );
}

#[rstest]
fn editor_edits_any_field_in_scope(engine: AccessControlEngine) {
    let actor = scoped_user(Role::Editor, &["Finance"]);
    let record = issue(IssueStatus::Open, Some("Finance"));
    for field in [IssueField::Title, IssueField::RiskLevel, IssueField::Updates] {
        assert!(engine.can_edit(&actor, &record, field).is_allowed());
    }
}

#[rstest]
fn editor_out_of_scope_is_denied_by_department(engine: AccessControlEngine) {
    let actor = scoped_user(Role::Editor, &["Finance"]);
    let record = issue(IssueStatus::Open, Some("Legal"));
    assert_eq!(
        engine.can_edit(&actor, &record, IssueField::Title),
        PermissionDecision::Deny(DenialReason::DepartmentOutOfScope)
    );
}

#[rstest]
#[case(IssueField::Status, true)]
#[case(IssueField::Updates, true)]
#[case(IssueField::SupportingDocs, true)]
#[case(IssueField::FollowUpDate, true)]
#[case(IssueField::Title, false)]
#[case(IssueField::Department, false)]
#[case(IssueField::DueDate, false)]
fn restricted_role_is_limited_to_its_field_subset(
    engine: AccessControlEngine,
    #[case] field: IssueField,
    #[case] allowed: bool,
) {
    let actor = unrestricted_user(Role::Restricted);
    let record = issue(IssueStatus::Open, None);
    let decision = engine.can_edit(&actor, &record, field);
    assert_eq!(decision.is_allowed(), allowed);
    if !allowed {
        assert_eq!(decision.denial_reason(), Some(DenialReason::FieldLocked));
    }
}

#[rstest]
#[case(IssueStatus::Draft)]
#[case(IssueStatus::Closed)]
fn restricted_role_is_locked_out_of_draft_and_closed_records(
    engine: AccessControlEngine,
    #[case] status: IssueStatus,
) {
    let actor = unrestricted_user(Role::Restricted);
    let record = issue(status, None);
    // Even fields the role may normally edit are locked.
    assert_eq!(
        engine.can_edit(&actor, &record, IssueField::Updates),
        PermissionDecision::Deny(DenialReason::RecordLocked)
    );
}

#[rstest]
fn restricted_scope_denial_precedes_the_record_lock(engine: AccessControlEngine) {
    let actor = scoped_user(Role::Restricted, &["Finance"]);
    let record = issue(IssueStatus::Draft, Some("Legal"));
    assert_eq!(
        engine.can_edit(&actor, &record, IssueField::Updates),
        PermissionDecision::Deny(DenialReason::DepartmentOutOfScope)
    );
}

// ============================================================================
// can_create
// ============================================================================

#[rstest]
fn viewer_may_not_create(engine: AccessControlEngine) {
    let actor = unrestricted_user(Role::Viewer);
    assert_eq!(
        engine.can_create(&actor),
        CreationDecision::Deny(DenialReason::InsufficientRole)
    );
}

#[rstest]
#[case(Role::Administrator, None)]
#[case(Role::Editor, None)]
#[case(Role::Restricted, Some(IssueStatus::Draft))]
fn creation_forces_draft_for_restricted_only(
    engine: AccessControlEngine,
    #[case] role: Role,
    #[case] forced: Option<IssueStatus>,
) {
    let actor = unrestricted_user(role);
    assert_eq!(
        engine.can_create(&actor),
        CreationDecision::Allow {
            forced_initial_status: forced
        }
    );
}

// ============================================================================
// can_transition
// ============================================================================

#[rstest]
fn restricted_user_drives_draft_issues_forward_only_via_editor_roles(
    engine: AccessControlEngine,
) {
    let actor = unrestricted_user(Role::Restricted);
    let record = issue(IssueStatus::Draft, None);
    assert_eq!(
        engine.can_transition(&actor, &record, IssueStatus::Open),
        PermissionDecision::Deny(DenialReason::InsufficientRole)
    );
}

#[rstest]
fn transition_is_exempt_from_the_draft_record_lock(engine: AccessControlEngine) {
    let actor = unrestricted_user(Role::Editor);
    let record = issue(IssueStatus::Draft, None);
    assert_eq!(
        engine.can_transition(&actor, &record, IssueStatus::Open),
        PermissionDecision::Allow
    );
}

#[rstest]
fn editor_transition_respects_edit_scope(engine: AccessControlEngine) {
    let actor = scoped_user(Role::Editor, &["Finance"]);
    let record = issue(IssueStatus::Open, Some("Legal"));
    assert_eq!(
        engine.can_transition(&actor, &record, IssueStatus::InProgress),
        PermissionDecision::Deny(DenialReason::DepartmentOutOfScope)
    );
}

#[rstest]
fn invalid_edge_denies_before_scope_is_consulted(engine: AccessControlEngine) {
    let actor = scoped_user(Role::Editor, &["Finance"]);
    let record = issue(IssueStatus::Closed, Some("Legal"));
    assert_eq!(
        engine.can_transition(&actor, &record, IssueStatus::Open),
        PermissionDecision::Deny(DenialReason::InvalidTransition)
    );
}

// ============================================================================
// can_delete and attachment management
// ============================================================================

#[rstest]
#[case(Role::Administrator, true)]
#[case(Role::Editor, false)]
#[case(Role::Restricted, false)]
#[case(Role::Viewer, false)]
fn only_administrator_deletes(
    engine: AccessControlEngine,
    #[case] role: Role,
    #[case] allowed: bool,
) {
    let actor = unrestricted_user(role);
    let record = issue(IssueStatus::Open, None);
    assert_eq!(engine.can_delete(&actor, &record).is_allowed(), allowed);
}

#[rstest]
fn attachment_management_follows_the_supporting_docs_field(engine: AccessControlEngine) {
    let restricted = unrestricted_user(Role::Restricted);
    let open = issue(IssueStatus::Open, None);
    let closed = issue(IssueStatus::Closed, None);
    assert!(engine.can_manage_attachments(&restricted, &open).is_allowed());
    assert_eq!(
        engine.can_manage_attachments(&restricted, &closed),
        PermissionDecision::Deny(DenialReason::RecordLocked)
    );
}

// ============================================================================
// bypass mode
// ============================================================================

#[rstest]
fn bypass_substitutes_administrator_for_every_role(bypass: AccessControlEngine) {
    let actor = scoped_user(Role::Viewer, &["Finance"]);
    let record = issue(IssueStatus::Open, Some("Legal"));
    assert!(bypass.can_view(&actor, &record).is_allowed());
    assert!(bypass.can_edit(&actor, &record, IssueField::Title).is_allowed());
    assert!(bypass.can_delete(&actor, &record).is_allowed());
    assert!(
        bypass
            .can_transition(&actor, &record, IssueStatus::InProgress)
            .is_allowed()
    );
}

#[rstest]
fn bypass_still_rejects_invalid_workflow_edges(bypass: AccessControlEngine) {
    let actor = scoped_user(Role::Viewer, &["Finance"]);
    let record = issue(IssueStatus::Closed, None);
    assert_eq!(
        bypass.can_transition(&actor, &record, IssueStatus::Open),
        PermissionDecision::Deny(DenialReason::InvalidTransition)
    );
}

// ============================================================================
// visible_issues
// ============================================================================

#[rstest]
fn visible_issues_filters_by_scope_preserving_order(engine: AccessControlEngine) {
    let actor = scoped_user(Role::Viewer, &["Finance"]);
    let records = vec![
        issue(IssueStatus::Open, Some("Finance")),
        issue(IssueStatus::Open, Some("Legal")),
        issue(IssueStatus::Open, None),
    ];
    let visible = engine.visible_issues(&actor, records);
    let departments: Vec<Option<&str>> =
        visible.iter().map(|record| record.department()).collect();
    assert_eq!(departments, vec![Some("Finance"), None]);
}
