//! Issue record, identifier, field enumeration, and revision diffing.

use super::{IssueStatus, ParseRiskLevelError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an issue record, assigned by the record store on
/// creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueId(u64);

impl IssueId {
    /// Creates an issue identifier from a store-assigned value.
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

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Assessed risk level of an issue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// No assessed risk.
    #[default]
    None,
    /// Low risk.
    Low,
    /// Medium risk.
    Medium,
    /// High risk.
    High,
}

impl RiskLevel {
    /// Returns the canonical display and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl TryFrom<&str> for RiskLevel {
    type Error = ParseRiskLevelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "None" => Ok(Self::None),
            "Low" => Ok(Self::Low),
            "Medium" => Ok(Self::Medium),
            "High" => Ok(Self::High),
            _ => Err(ParseRiskLevelError(value.to_owned())),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Every editable field of an issue record.
///
/// Field-level permission decisions key on this enum; the Restricted role
/// may touch only the subset in [`IssueField::RESTRICTED_EDITABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueField {
    /// Issue title.
    Title,
    /// Workflow status.
    Status,
    /// Owning department.
    Department,
    /// Concise overview.
    SummaryDescription,
    /// Categorical classification.
    Topic,
    /// Person who reported the issue.
    IdentifiedBy,
    /// Person responsible for resolution.
    Owner,
    /// Detailed explanation.
    Description,
    /// Planned or completed corrective actions.
    RemediationAction,
    /// Assessment of potential impact.
    RiskDescription,
    /// Assessed risk level.
    RiskLevel,
    /// Date the issue was first identified.
    IdentificationDate,
    /// Target resolution date.
    DueDate,
    /// Scheduled date for the next review.
    FollowUpDate,
    /// Chronological progress notes.
    Updates,
    /// Date the issue was formally closed.
    ClosingDate,
    /// Attached supporting document names.
    SupportingDocs,
}

impl IssueField {
    /// Fields the Restricted role may edit, when the record is not locked.
    pub const RESTRICTED_EDITABLE: [Self; 4] = [
        Self::Status,
        Self::Updates,
        Self::SupportingDocs,
        Self::FollowUpDate,
    ];

    /// Returns the stable field name used in audit details.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Status => "status",
            Self::Department => "department",
            Self::SummaryDescription => "summary_description",
            Self::Topic => "topic",
            Self::IdentifiedBy => "identified_by",
            Self::Owner => "owner",
            Self::Description => "description",
            Self::RemediationAction => "remediation_action",
            Self::RiskDescription => "risk_description",
            Self::RiskLevel => "risk_level",
            Self::IdentificationDate => "identification_date",
            Self::DueDate => "due_date",
            Self::FollowUpDate => "follow_up_date",
            Self::Updates => "updates",
            Self::ClosingDate => "closing_date",
            Self::SupportingDocs => "supporting_docs",
        }
    }

    /// Returns `true` when the Restricted role may edit this field.
    #[must_use]
    pub fn restricted_editable(self) -> bool {
        Self::RESTRICTED_EDITABLE.contains(&self)
    }
}

impl fmt::Display for IssueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Descriptive fields of an issue, irrelevant to workflow logic but gated by
/// the same field-level permission decisions as everything else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueDetails {
    /// Concise overview of the issue.
    pub summary_description: Option<String>,
    /// Categorical classification.
    pub topic: Option<String>,
    /// Person who discovered or reported the issue.
    pub identified_by: Option<String>,
    /// Person responsible for resolution.
    pub owner: Option<String>,
    /// Detailed explanation.
    pub description: Option<String>,
    /// Planned or completed corrective actions.
    pub remediation_action: Option<String>,
    /// Assessment of potential impact.
    pub risk_description: Option<String>,
    /// Assessed risk level.
    pub risk_level: RiskLevel,
    /// Date the issue was first identified.
    pub identification_date: Option<NaiveDate>,
    /// Target resolution date.
    pub due_date: Option<NaiveDate>,
    /// Scheduled date for the next review.
    pub follow_up_date: Option<NaiveDate>,
    /// Chronological progress notes, newest entry last.
    pub updates: Option<String>,
    /// Date the issue was formally closed.
    pub closing_date: Option<NaiveDate>,
    /// Stored names of attached supporting documents.
    pub supporting_docs: Vec<String>,
}

/// Issue record as owned by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Store-assigned identifier.
    pub id: IssueId,
    /// Brief descriptive title.
    pub title: String,
    /// Current workflow status.
    pub status: IssueStatus,
    /// Organisational unit associated with the issue, if any.
    pub department: Option<String>,
    /// Descriptive fields.
    pub details: IssueDetails,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Record last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Issue {
    /// Returns the department as a borrowed string, if assigned.
    #[must_use]
    pub fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }

    /// Returns `true` when the issue is past its due date and not closed.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.details.due_date.is_some_and(|due| due < today)
    }

    /// Returns the fields whose values differ between `self` and `other`.
    ///
    /// Timestamps and the identifier are not compared; they are bookkeeping,
    /// not content.
    #[must_use]
    pub fn changed_fields(&self, other: &Self) -> Vec<IssueField> {
        let d = &self.details;
        let o = &other.details;
        let comparisons = [
            (IssueField::Title, self.title != other.title),
            (IssueField::Status, self.status != other.status),
            (IssueField::Department, self.department != other.department),
            (
                IssueField::SummaryDescription,
                d.summary_description != o.summary_description,
            ),
            (IssueField::Topic, d.topic != o.topic),
            (IssueField::IdentifiedBy, d.identified_by != o.identified_by),
            (IssueField::Owner, d.owner != o.owner),
            (IssueField::Description, d.description != o.description),
            (
                IssueField::RemediationAction,
                d.remediation_action != o.remediation_action,
            ),
            (
                IssueField::RiskDescription,
                d.risk_description != o.risk_description,
            ),
            (IssueField::RiskLevel, d.risk_level != o.risk_level),
            (
                IssueField::IdentificationDate,
                d.identification_date != o.identification_date,
            ),
            (IssueField::DueDate, d.due_date != o.due_date),
            (
                IssueField::FollowUpDate,
                d.follow_up_date != o.follow_up_date,
            ),
            (IssueField::Updates, d.updates != o.updates),
            (IssueField::ClosingDate, d.closing_date != o.closing_date),
            (
                IssueField::SupportingDocs,
                d.supporting_docs != o.supporting_docs,
            ),
        ];
        comparisons
            .into_iter()
            .filter_map(|(field, changed)| changed.then_some(field))
            .collect()
    }
}

/// Issue data submitted for creation, before the store assigns an
/// identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    /// Brief descriptive title.
    pub title: String,
    /// Initial workflow status, as decided by the access control engine.
    pub status: IssueStatus,
    /// Organisational unit associated with the issue, if any.
    pub department: Option<String>,
    /// Descriptive fields.
    pub details: IssueDetails,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}
