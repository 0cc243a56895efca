//! Audit event emission port.
//!
//! The core emits one structured event after every allow decision that
//! results in a state change (transition executed, record written, file
//! committed or removed). Formatting and persistence belong to the
//! collaborating audit writer.

use crate::access::domain::{User, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Action recorded by an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Entity created.
    Created,
    /// Entity fields updated.
    Updated,
    /// Issue workflow status changed.
    StatusChanged,
    /// Entity deleted.
    Deleted,
    /// File attached to an issue.
    FileAttached,
    /// File soft-deleted from an issue.
    FileRemoved,
    /// Staged files committed to an issue.
    FilesCommitted,
}

/// Kind of entity an audit event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEntity {
    /// Issue record.
    Issue,
    /// User account.
    User,
    /// Application setting.
    Settings,
}

/// Structured description of a completed state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Identifier of the acting user.
    pub actor_id: UserId,
    /// Username of the acting user, stored for historical reference.
    pub actor: String,
    /// Action performed.
    pub action: AuditAction,
    /// Kind of entity affected.
    pub entity: AuditEntity,
    /// Identifier of the affected entity, when it has one.
    pub entity_id: Option<u64>,
    /// Free-form context, e.g. changed field names or before/after values.
    pub details: Value,
    /// When the action occurred.
    pub recorded_at: DateTime<Utc>,
}

impl AuditEvent {
    /// Creates an event attributed to `actor`.
    #[must_use]
    pub fn new(
        actor: &User,
        action: AuditAction,
        entity: AuditEntity,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            actor_id: actor.id(),
            actor: actor.username().to_owned(),
            action,
            entity,
            entity_id: None,
            details: Value::Null,
            recorded_at,
        }
    }

    /// Sets the affected entity identifier.
    #[must_use]
    pub const fn with_entity_id(mut self, id: u64) -> Self {
        self.entity_id = Some(id);
        self
    }

    /// Sets the event details.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }
}

/// Destination for audit events.
///
/// Sinks must absorb their own failures; a lost audit record must never
/// fail the state change it describes.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Records one event.
    async fn record(&self, event: AuditEvent);
}
