//! Shared builders for access control tests.

use crate::access::domain::{
    DepartmentScope, Issue, IssueDetails, IssueId, IssueStatus, Role, User, UserId,
};
use chrono::{DateTime, TimeZone, Utc};

pub(super) fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// User with the same scope for viewing and editing.
pub(super) fn user_with_scope(role: Role, scope: DepartmentScope) -> User {
    User::new(
        UserId::new(7),
        "casework",
        "argon2-hash",
        role,
        scope.clone(),
        scope,
    )
}

pub(super) fn unrestricted_user(role: Role) -> User {
    user_with_scope(role, DepartmentScope::unrestricted())
}

pub(super) fn scoped_user(role: Role, departments: &[&str]) -> User {
    user_with_scope(
        role,
        DepartmentScope::restricted_to(departments.iter().map(|d| (*d).to_owned())),
    )
}

pub(super) fn issue(status: IssueStatus, department: Option<&str>) -> Issue {
    let at = fixed_time();
    Issue {
        id: IssueId::new(1),
        title: "Reconciliation gap in quarterly report".to_owned(),
        status,
        department: department.map(str::to_owned),
        details: IssueDetails::default(),
        created_at: at,
        updated_at: at,
    }
}
