//! Service layer for permission-checked issue CRUD and workflow transitions.

use crate::access::domain::{
    CreationDecision, DenialReason, Issue, IssueDetails, IssueField, IssueId, IssueStatus,
    NewIssue, User,
};
use crate::access::engine::AccessControlEngine;
use crate::access::ports::{
    AUTHENTICATION_ENABLED, AuditAction, AuditEntity, AuditEvent, AuditSink, IssueStore,
    IssueStoreError, SettingsStore, SettingsStoreError,
};
use mockable::Clock;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIssueRequest {
    title: String,
    department: Option<String>,
    requested_status: Option<IssueStatus>,
    details: IssueDetails,
}

impl CreateIssueRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            department: None,
            requested_status: None,
            details: IssueDetails::default(),
        }
    }

    /// Sets the owning department.
    #[must_use]
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// Requests an initial status.
    ///
    /// Ignored for roles whose capability table forces a status; when
    /// absent, the issue opens at [`IssueStatus::Open`].
    #[must_use]
    pub const fn with_status(mut self, status: IssueStatus) -> Self {
        self.requested_status = Some(status);
        self
    }

    /// Sets the descriptive fields.
    #[must_use]
    pub fn with_details(mut self, details: IssueDetails) -> Self {
        self.details = details;
        self
    }
}

/// Service-level errors for issue operations.
#[derive(Debug, Error)]
pub enum IssueServiceError {
    /// The access control engine denied the operation.
    #[error("permission denied: {0}")]
    PermissionDenied(DenialReason),

    /// The issue does not exist.
    #[error("issue not found: {0}")]
    NotFound(IssueId),

    /// Record store failure.
    #[error(transparent)]
    Store(#[from] IssueStoreError),

    /// Settings store failure.
    #[error(transparent)]
    Settings(#[from] SettingsStoreError),
}

/// Result type for issue service operations.
pub type IssueServiceResult<T> = Result<T, IssueServiceError>;

/// Permission-checked issue orchestration.
///
/// Callers pass their store references at construction; there is no global
/// service locator. Every state change emits one audit event through the
/// sink.
#[derive(Clone)]
pub struct IssueService<S, K, A, C>
where
    S: IssueStore,
    K: SettingsStore,
    A: AuditSink,
    C: Clock + Send + Sync,
{
    issues: Arc<S>,
    settings: Arc<K>,
    audit: Arc<A>,
    clock: Arc<C>,
}

impl<S, K, A, C> IssueService<S, K, A, C>
where
    S: IssueStore,
    K: SettingsStore,
    A: AuditSink,
    C: Clock + Send + Sync,
{
    /// Creates a new issue service.
    #[must_use]
    pub const fn new(issues: Arc<S>, settings: Arc<K>, audit: Arc<A>, clock: Arc<C>) -> Self {
        Self {
            issues,
            settings,
            audit,
            clock,
        }
    }

    /// Builds an engine reflecting the current authentication setting.
    ///
    /// An unset flag counts as disabled, matching the desktop application's
    /// out-of-the-box behaviour.
    ///
    /// # Errors
    ///
    /// Returns [`IssueServiceError::Settings`] when the settings store
    /// fails.
    pub async fn engine(&self) -> IssueServiceResult<AccessControlEngine> {
        let enabled = self
            .settings
            .get_bool(AUTHENTICATION_ENABLED)
            .await?
            .unwrap_or(false);
        Ok(AccessControlEngine::new(enabled))
    }

    /// Creates an issue on behalf of `actor`.
    ///
    /// The initial status follows the creation decision: forced for
    /// Restricted, caller-chosen (default Open) otherwise. The
    /// identification date defaults to today.
    ///
    /// # Errors
    ///
    /// Returns [`IssueServiceError::PermissionDenied`] when the role may not
    /// create issues, or a store error.
    pub async fn create_issue(
        &self,
        actor: &User,
        request: CreateIssueRequest,
    ) -> IssueServiceResult<Issue> {
        let engine = self.engine().await?;
        let status = match engine.can_create(actor) {
            CreationDecision::Deny(reason) => {
                tracing::debug!(actor = actor.username(), %reason, "issue creation denied");
                return Err(IssueServiceError::PermissionDenied(reason));
            }
            CreationDecision::Allow {
                forced_initial_status,
            } => forced_initial_status
                .or(request.requested_status)
                .unwrap_or(IssueStatus::Open),
        };

        let now = self.clock.utc();
        let mut details = request.details;
        if details.identification_date.is_none() {
            details.identification_date = Some(now.date_naive());
        }

        let created = self
            .issues
            .create(NewIssue {
                title: request.title,
                status,
                department: request.department,
                details,
                created_at: now,
            })
            .await?;

        self.audit
            .record(
                AuditEvent::new(actor, AuditAction::Created, AuditEntity::Issue, now)
                    .with_entity_id(created.id.value())
                    .with_details(json!({
                        "title": created.title,
                        "status": created.status.as_str(),
                    })),
            )
            .await;
        Ok(created)
    }

    /// Applies an edited revision of an issue on behalf of `actor`.
    ///
    /// Every changed field is checked through the engine; a status change is
    /// routed through the workflow gate instead of the field lock. Moving to
    /// Closed sets the closing date when unset.
    ///
    /// # Errors
    ///
    /// Returns [`IssueServiceError::NotFound`] when the issue does not
    /// exist, [`IssueServiceError::PermissionDenied`] when any changed field
    /// or the status change is denied, or a store error.
    pub async fn update_issue(&self, actor: &User, updated: Issue) -> IssueServiceResult<Issue> {
        let engine = self.engine().await?;
        let original = self
            .issues
            .get(updated.id)
            .await?
            .ok_or(IssueServiceError::NotFound(updated.id))?;

        let changed = original.changed_fields(&updated);
        if changed.is_empty() {
            // No fields to gate, but reading the record back still requires
            // view permission, matching `get_issue`.
            if let Some(reason) = engine.can_view(actor, &original).denial_reason() {
                return Err(IssueServiceError::PermissionDenied(reason));
            }
            return Ok(original);
        }

        for field in &changed {
            let decision = if *field == IssueField::Status {
                engine.can_transition(actor, &original, updated.status)
            } else {
                engine.can_edit(actor, &original, *field)
            };
            if let Some(reason) = decision.denial_reason() {
                tracing::debug!(
                    actor = actor.username(),
                    issue = %original.id,
                    field = field.as_str(),
                    %reason,
                    "issue edit denied"
                );
                return Err(IssueServiceError::PermissionDenied(reason));
            }
        }

        let now = self.clock.utc();
        let mut next = updated;
        let status_changed = original.status != next.status;
        if status_changed && next.status == IssueStatus::Closed {
            next.details
                .closing_date
                .get_or_insert_with(|| now.date_naive());
        }
        next.created_at = original.created_at;
        next.updated_at = now;
        self.issues.update(&next).await?;

        let changed_names: Vec<&str> = changed.iter().map(|field| field.as_str()).collect();
        self.audit
            .record(
                AuditEvent::new(actor, AuditAction::Updated, AuditEntity::Issue, now)
                    .with_entity_id(next.id.value())
                    .with_details(json!({ "changed": changed_names })),
            )
            .await;
        if status_changed {
            self.audit
                .record(
                    AuditEvent::new(actor, AuditAction::StatusChanged, AuditEntity::Issue, now)
                        .with_entity_id(next.id.value())
                        .with_details(json!({
                            "before": original.status.as_str(),
                            "after": next.status.as_str(),
                        })),
                )
                .await;
        }
        Ok(next)
    }

    /// Moves an issue to `target` on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`IssueServiceError::NotFound`] when the issue does not
    /// exist, [`IssueServiceError::PermissionDenied`] when the transition is
    /// not a permitted workflow edge for the actor, or a store error.
    pub async fn transition_status(
        &self,
        actor: &User,
        id: IssueId,
        target: IssueStatus,
    ) -> IssueServiceResult<Issue> {
        let engine = self.engine().await?;
        let original = self
            .issues
            .get(id)
            .await?
            .ok_or(IssueServiceError::NotFound(id))?;

        if let Some(reason) = engine
            .can_transition(actor, &original, target)
            .denial_reason()
        {
            tracing::debug!(
                actor = actor.username(),
                issue = %id,
                from = original.status.as_str(),
                to = target.as_str(),
                %reason,
                "status transition denied"
            );
            return Err(IssueServiceError::PermissionDenied(reason));
        }

        let now = self.clock.utc();
        let mut next = original.clone();
        next.status = target;
        if target == IssueStatus::Closed {
            next.details
                .closing_date
                .get_or_insert_with(|| now.date_naive());
        }
        next.updated_at = now;
        self.issues.update(&next).await?;

        self.audit
            .record(
                AuditEvent::new(actor, AuditAction::StatusChanged, AuditEntity::Issue, now)
                    .with_entity_id(id.value())
                    .with_details(json!({
                        "before": original.status.as_str(),
                        "after": target.as_str(),
                    })),
            )
            .await;
        Ok(next)
    }

    /// Deletes an issue on behalf of `actor`. Administrator only.
    ///
    /// # Errors
    ///
    /// Returns [`IssueServiceError::NotFound`] when the issue does not
    /// exist, [`IssueServiceError::PermissionDenied`] for non-administrator
    /// actors, or a store error.
    pub async fn delete_issue(&self, actor: &User, id: IssueId) -> IssueServiceResult<()> {
        let engine = self.engine().await?;
        let issue = self
            .issues
            .get(id)
            .await?
            .ok_or(IssueServiceError::NotFound(id))?;

        if let Some(reason) = engine.can_delete(actor, &issue).denial_reason() {
            return Err(IssueServiceError::PermissionDenied(reason));
        }
        self.issues.delete(id).await?;

        self.audit
            .record(
                AuditEvent::new(
                    actor,
                    AuditAction::Deleted,
                    AuditEntity::Issue,
                    self.clock.utc(),
                )
                .with_entity_id(id.value())
                .with_details(json!({ "title": issue.title })),
            )
            .await;
        Ok(())
    }

    /// Retrieves an issue, applying the view permission.
    ///
    /// # Errors
    ///
    /// Returns [`IssueServiceError::NotFound`] when the issue does not
    /// exist, [`IssueServiceError::PermissionDenied`] when the actor may not
    /// view it, or a store error.
    pub async fn get_issue(&self, actor: &User, id: IssueId) -> IssueServiceResult<Issue> {
        let engine = self.engine().await?;
        let issue = self
            .issues
            .get(id)
            .await?
            .ok_or(IssueServiceError::NotFound(id))?;
        if let Some(reason) = engine.can_view(actor, &issue).denial_reason() {
            return Err(IssueServiceError::PermissionDenied(reason));
        }
        Ok(issue)
    }

    /// Lists the issues the actor may view, in identifier order.
    ///
    /// # Errors
    ///
    /// Returns a store error when listing fails.
    pub async fn list_issues(&self, actor: &User) -> IssueServiceResult<Vec<Issue>> {
        let engine = self.engine().await?;
        let issues = self.issues.list().await?;
        Ok(engine.visible_issues(actor, issues))
    }

    /// Appends a timestamped, attributed note to an issue's updates log.
    ///
    /// # Errors
    ///
    /// Returns [`IssueServiceError::NotFound`] when the issue does not
    /// exist, [`IssueServiceError::PermissionDenied`] when the actor may not
    /// edit the updates field, or a store error.
    pub async fn append_update_note(
        &self,
        actor: &User,
        id: IssueId,
        note: &str,
    ) -> IssueServiceResult<Issue> {
        let engine = self.engine().await?;
        let original = self
            .issues
            .get(id)
            .await?
            .ok_or(IssueServiceError::NotFound(id))?;
        if let Some(reason) = engine
            .can_edit(actor, &original, IssueField::Updates)
            .denial_reason()
        {
            return Err(IssueServiceError::PermissionDenied(reason));
        }

        let now = self.clock.utc();
        let entry = format!(
            "[{}] {}: {note}",
            now.format("%Y-%m-%d %H:%M"),
            actor.username()
        );
        let mut next = original;
        next.details.updates = Some(match next.details.updates.take() {
            Some(existing) => format!("{existing}\n{entry}"),
            None => entry,
        });
        next.updated_at = now;
        self.issues.update(&next).await?;

        self.audit
            .record(
                AuditEvent::new(actor, AuditAction::Updated, AuditEntity::Issue, now)
                    .with_entity_id(id.value())
                    .with_details(json!({ "changed": ["updates"] })),
            )
            .await;
        Ok(next)
    }
}
