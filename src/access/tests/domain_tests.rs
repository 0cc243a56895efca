//! Unit tests for domain parsing, scope sets, and revision diffing.

use crate::access::domain::{
    DepartmentScope, IssueField, IssueStatus, RiskLevel, Role,
};
use crate::access::tests::fixtures::issue;
use chrono::NaiveDate;
use rstest::rstest;

const ALL_STATUSES: [IssueStatus; 5] = [
    IssueStatus::Draft,
    IssueStatus::Open,
    IssueStatus::InProgress,
    IssueStatus::Remediated,
    IssueStatus::Closed,
];

#[rstest]
#[case(IssueStatus::Draft, "Draft")]
#[case(IssueStatus::Open, "Open")]
#[case(IssueStatus::InProgress, "In Progress")]
#[case(IssueStatus::Remediated, "Remediated")]
#[case(IssueStatus::Closed, "Closed")]
fn status_as_str_uses_display_form(#[case] status: IssueStatus, #[case] expected: &str) {
    assert_eq!(status.as_str(), expected);
    assert_eq!(status.to_string(), expected);
}

#[rstest]
fn status_round_trips_through_display_form() {
    for status in ALL_STATUSES {
        assert_eq!(IssueStatus::try_from(status.as_str()), Ok(status));
    }
}

#[rstest]
#[case("")]
#[case("draft")]
#[case("InProgress")]
#[case("in progress")]
#[case("Reopened")]
fn status_rejects_unknown_names(#[case] input: &str) {
    assert!(IssueStatus::try_from(input).is_err());
}

#[rstest]
#[case(IssueStatus::Draft, false)]
#[case(IssueStatus::Open, true)]
#[case(IssueStatus::InProgress, true)]
#[case(IssueStatus::Remediated, true)]
#[case(IssueStatus::Closed, false)]
fn status_is_active_covers_working_states(#[case] status: IssueStatus, #[case] expected: bool) {
    assert_eq!(status.is_active(), expected);
}

#[test]
fn only_closed_is_terminal() {
    for status in ALL_STATUSES {
        assert_eq!(status.is_terminal(), status == IssueStatus::Closed);
    }
}

#[rstest]
#[case(Role::Administrator, "Administrator")]
#[case(Role::Editor, "Editor")]
#[case(Role::Restricted, "Restricted")]
#[case(Role::Viewer, "Viewer")]
fn role_round_trips_through_display_form(#[case] role: Role, #[case] expected: &str) {
    assert_eq!(role.as_str(), expected);
    assert_eq!(Role::try_from(expected), Ok(role));
}

#[rstest]
#[case("admin")]
#[case("EDITOR")]
#[case("")]
fn role_rejects_unknown_names(#[case] input: &str) {
    assert!(Role::try_from(input).is_err());
}

#[rstest]
#[case("None", RiskLevel::None)]
#[case("Low", RiskLevel::Low)]
#[case("Medium", RiskLevel::Medium)]
#[case("High", RiskLevel::High)]
fn risk_level_parses_display_form(#[case] input: &str, #[case] expected: RiskLevel) {
    assert_eq!(RiskLevel::try_from(input), Ok(expected));
}

#[test]
fn restricted_editable_fields_are_the_fixed_subset() {
    let editable = [
        IssueField::Status,
        IssueField::Updates,
        IssueField::SupportingDocs,
        IssueField::FollowUpDate,
    ];
    for field in editable {
        assert!(field.restricted_editable(), "{field} should be editable");
    }
    for field in [
        IssueField::Title,
        IssueField::Department,
        IssueField::Description,
        IssueField::RiskLevel,
        IssueField::ClosingDate,
    ] {
        assert!(!field.restricted_editable(), "{field} should be locked");
    }
}

#[test]
fn empty_scope_is_the_unrestricted_sentinel() {
    let scope = DepartmentScope::unrestricted();
    assert!(scope.is_unrestricted());
    assert!(scope.permits(Some("Finance")));
    assert!(scope.permits(None));
}

#[rstest]
#[case(Some("Finance"), true)]
#[case(Some("Operations"), true)]
#[case(Some("Legal"), false)]
#[case(None, true)]
fn restricted_scope_permits_members_and_unassigned_records(
    #[case] department: Option<&str>,
    #[case] expected: bool,
) {
    let scope = DepartmentScope::restricted_to(
        ["Finance".to_owned(), "Operations".to_owned()],
    );
    assert!(!scope.is_unrestricted());
    assert_eq!(scope.permits(department), expected);
}

#[test]
fn scope_membership_is_case_sensitive() {
    let scope = DepartmentScope::restricted_to(["Finance".to_owned()]);
    assert!(!scope.permits(Some("finance")));
}

#[test]
fn changed_fields_reports_exactly_the_differing_fields() {
    let original = issue(IssueStatus::Open, Some("Finance"));
    let mut revised = original.clone();
    revised.title = "Retitled".to_owned();
    revised.status = IssueStatus::InProgress;
    revised.details.owner = Some("R. Okafor".to_owned());

    let changed = original.changed_fields(&revised);
    assert_eq!(
        changed,
        vec![IssueField::Title, IssueField::Status, IssueField::Owner]
    );
}

#[test]
fn changed_fields_ignores_timestamps() {
    let original = issue(IssueStatus::Open, None);
    let mut revised = original.clone();
    revised.updated_at = revised.updated_at + chrono::Duration::hours(1);
    assert!(original.changed_fields(&revised).is_empty());
}

#[rstest]
#[case(IssueStatus::Open, true)]
#[case(IssueStatus::Closed, false)]
fn overdue_requires_a_non_terminal_status(#[case] status: IssueStatus, #[case] expected: bool) {
    let mut record = issue(status, None);
    record.details.due_date = NaiveDate::from_ymd_opt(2026, 1, 15);
    let today = NaiveDate::from_ymd_opt(2026, 2, 1).expect("valid date");
    assert_eq!(record.is_overdue(today), expected);
}

#[test]
fn issue_without_due_date_is_never_overdue() {
    let record = issue(IssueStatus::Open, None);
    let today = NaiveDate::from_ymd_opt(2026, 2, 1).expect("valid date");
    assert!(!record.is_overdue(today));
}
