//! Domain model for access control.
//!
//! The access domain models users, roles, department scopes, issue records,
//! and the forward-only status workflow while keeping all infrastructure
//! concerns outside of the domain boundary. Every permission check is a
//! total function over these types; denial is a value, never an error.

mod decision;
mod error;
mod issue;
mod role;
mod status;
mod user;
pub mod workflow;

pub use decision::{CreationDecision, DenialReason, PermissionDecision};
pub use error::{ParseRiskLevelError, ParseRoleError, ParseStatusError};
pub use issue::{Issue, IssueDetails, IssueField, IssueId, NewIssue, RiskLevel};
pub use role::{DepartmentScope, Role, RoleCapabilities};
pub use status::IssueStatus;
pub use user::{User, UserId};
