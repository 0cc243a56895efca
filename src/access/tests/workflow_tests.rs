//! Unit tests for the forward-only workflow edge set and the role gate.

use crate::access::domain::{
    DenialReason, IssueStatus, PermissionDecision, Role, workflow::gate_transition,
};
use rstest::rstest;

#[rstest]
#[case(IssueStatus::Draft, IssueStatus::Draft, false)]
#[case(IssueStatus::Draft, IssueStatus::Open, true)]
#[case(IssueStatus::Draft, IssueStatus::InProgress, false)]
#[case(IssueStatus::Draft, IssueStatus::Remediated, false)]
#[case(IssueStatus::Draft, IssueStatus::Closed, false)]
#[case(IssueStatus::Open, IssueStatus::Draft, false)]
#[case(IssueStatus::Open, IssueStatus::Open, false)]
#[case(IssueStatus::Open, IssueStatus::InProgress, true)]
#[case(IssueStatus::Open, IssueStatus::Remediated, false)]
#[case(IssueStatus::Open, IssueStatus::Closed, false)]
#[case(IssueStatus::InProgress, IssueStatus::Draft, false)]
#[case(IssueStatus::InProgress, IssueStatus::Open, false)]
#[case(IssueStatus::InProgress, IssueStatus::InProgress, false)]
#[case(IssueStatus::InProgress, IssueStatus::Remediated, true)]
#[case(IssueStatus::InProgress, IssueStatus::Closed, false)]
#[case(IssueStatus::Remediated, IssueStatus::Draft, false)]
#[case(IssueStatus::Remediated, IssueStatus::Open, false)]
#[case(IssueStatus::Remediated, IssueStatus::InProgress, false)]
#[case(IssueStatus::Remediated, IssueStatus::Remediated, false)]
#[case(IssueStatus::Remediated, IssueStatus::Closed, true)]
#[case(IssueStatus::Closed, IssueStatus::Draft, false)]
#[case(IssueStatus::Closed, IssueStatus::Open, false)]
#[case(IssueStatus::Closed, IssueStatus::InProgress, false)]
#[case(IssueStatus::Closed, IssueStatus::Remediated, false)]
#[case(IssueStatus::Closed, IssueStatus::Closed, false)]
fn can_advance_to_returns_expected(
    #[case] from: IssueStatus,
    #[case] to: IssueStatus,
    #[case] expected: bool,
) {
    assert_eq!(from.can_advance_to(to), expected);
}

#[rstest]
#[case(Role::Administrator, IssueStatus::Draft, IssueStatus::Open, true)]
#[case(Role::Editor, IssueStatus::Draft, IssueStatus::Open, true)]
#[case(Role::Restricted, IssueStatus::Draft, IssueStatus::Open, false)]
#[case(Role::Viewer, IssueStatus::Draft, IssueStatus::Open, false)]
#[case(Role::Administrator, IssueStatus::Open, IssueStatus::InProgress, true)]
#[case(Role::Editor, IssueStatus::Open, IssueStatus::InProgress, true)]
#[case(Role::Restricted, IssueStatus::Open, IssueStatus::InProgress, true)]
#[case(Role::Viewer, IssueStatus::Open, IssueStatus::InProgress, false)]
#[case(Role::Administrator, IssueStatus::InProgress, IssueStatus::Remediated, true)]
#[case(Role::Editor, IssueStatus::InProgress, IssueStatus::Remediated, true)]
#[case(Role::Restricted, IssueStatus::InProgress, IssueStatus::Remediated, true)]
#[case(Role::Viewer, IssueStatus::InProgress, IssueStatus::Remediated, false)]
#[case(Role::Administrator, IssueStatus::Remediated, IssueStatus::Closed, true)]
#[case(Role::Editor, IssueStatus::Remediated, IssueStatus::Closed, true)]
#[case(Role::Restricted, IssueStatus::Remediated, IssueStatus::Closed, false)]
#[case(Role::Viewer, IssueStatus::Remediated, IssueStatus::Closed, false)]
fn gate_applies_role_policy_on_valid_edges(
    #[case] role: Role,
    #[case] from: IssueStatus,
    #[case] to: IssueStatus,
    #[case] allowed: bool,
) {
    let decision = gate_transition(role, from, to);
    assert_eq!(decision.is_allowed(), allowed);
    if !allowed {
        assert_eq!(decision.denial_reason(), Some(DenialReason::InsufficientRole));
    }
}

#[rstest]
#[case(Role::Administrator)]
#[case(Role::Editor)]
#[case(Role::Restricted)]
#[case(Role::Viewer)]
fn invalid_edges_deny_regardless_of_role(#[case] role: Role) {
    for (from, to) in [
        (IssueStatus::Closed, IssueStatus::Open),
        (IssueStatus::Open, IssueStatus::Closed),
        (IssueStatus::Remediated, IssueStatus::InProgress),
        (IssueStatus::Draft, IssueStatus::Draft),
    ] {
        assert_eq!(
            gate_transition(role, from, to),
            PermissionDecision::Deny(DenialReason::InvalidTransition)
        );
    }
}
