//! Issue status enum and the forward-only workflow edge set.

use super::ParseStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Issue lifecycle status.
///
/// The workflow is strictly forward-only: each status advances to at most
/// one successor and nothing leaves [`IssueStatus::Closed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    /// Issue captured by a restricted user, not yet opened.
    Draft,
    /// Issue acknowledged and awaiting work.
    Open,
    /// Issue is being worked.
    InProgress,
    /// Corrective action has been applied.
    Remediated,
    /// Issue formally closed. Terminal.
    Closed,
}

impl IssueStatus {
    /// Returns the canonical display and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Remediated => "Remediated",
            Self::Closed => "Closed",
        }
    }

    /// Returns `true` when the status permits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Returns `true` when the issue counts as active work.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Open | Self::InProgress | Self::Remediated)
    }

    /// Returns `true` when `to` is the single permitted forward step from
    /// this status.
    ///
    /// The edge set is Draft→Open, Open→In Progress, In Progress→Remediated,
    /// Remediated→Closed. Self-loops, skips, and backward moves are all
    /// rejected.
    #[must_use]
    pub const fn can_advance_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Draft, Self::Open)
                | (Self::Open, Self::InProgress)
                | (Self::InProgress, Self::Remediated)
                | (Self::Remediated, Self::Closed)
        )
    }
}

impl TryFrom<&str> for IssueStatus {
    type Error = ParseStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "Draft" => Ok(Self::Draft),
            "Open" => Ok(Self::Open),
            "In Progress" => Ok(Self::InProgress),
            "Remediated" => Ok(Self::Remediated),
            "Closed" => Ok(Self::Closed),
            _ => Err(ParseStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
