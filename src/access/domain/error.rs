//! Error types for access domain parsing.

use thiserror::Error;

/// Error returned while parsing roles from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

/// Error returned while parsing issue statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown issue status: {0}")]
pub struct ParseStatusError(pub String);

/// Error returned while parsing risk levels from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown risk level: {0}")]
pub struct ParseRiskLevelError(pub String);
