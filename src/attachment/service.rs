//! Permission-checked orchestration over the attachment manager.

use camino::{Utf8Path, Utf8PathBuf};
use mockable::Clock;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::access::domain::{DenialReason, Issue, User};
use crate::access::engine::AccessControlEngine;
use crate::access::ports::{AuditAction, AuditEntity, AuditEvent, AuditSink};
use crate::attachment::domain::{AttachmentError, ContainerKey, StagingToken};
use crate::attachment::manager::AttachmentManager;

/// Errors surfaced by the attachment workflow.
#[derive(Debug, Error)]
pub enum AttachmentWorkflowError {
    /// The access control engine denied the operation.
    #[error("permission denied: {0}")]
    PermissionDenied(DenialReason),

    /// The manager reported a lifecycle failure.
    #[error(transparent)]
    Attachment(#[from] AttachmentError),
}

/// Result type for attachment workflow operations.
pub type AttachmentWorkflowResult<T> = Result<T, AttachmentWorkflowError>;

/// Gates attachment lifecycle operations behind the access control engine
/// and emits one audit event per completed state change.
///
/// The engine is supplied per call because it reflects a mutable
/// application setting; the workflow holds no authentication state of its
/// own.
#[derive(Clone)]
pub struct AttachmentWorkflow<A, C>
where
    A: AuditSink,
    C: Clock + Send + Sync,
{
    manager: Arc<AttachmentManager>,
    audit: Arc<A>,
    clock: Arc<C>,
}

impl<A, C> AttachmentWorkflow<A, C>
where
    A: AuditSink,
    C: Clock + Send + Sync,
{
    /// Creates a new attachment workflow.
    #[must_use]
    pub const fn new(manager: Arc<AttachmentManager>, audit: Arc<A>, clock: Arc<C>) -> Self {
        Self {
            manager,
            audit,
            clock,
        }
    }

    /// Attaches `source` to a saved issue, returning the stored name.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentWorkflowError::PermissionDenied`] when the actor
    /// may not manage the issue's attachments, or a manager error.
    pub async fn attach_to_issue(
        &self,
        engine: AccessControlEngine,
        actor: &User,
        issue: &Issue,
        source: &Utf8Path,
    ) -> AttachmentWorkflowResult<String> {
        self.check(engine, actor, issue)?;
        let stored = self
            .manager
            .add_file(ContainerKey::Issue(issue.id), source)?;
        self.audit
            .record(
                AuditEvent::new(
                    actor,
                    AuditAction::FileAttached,
                    AuditEntity::Issue,
                    self.clock.utc(),
                )
                .with_entity_id(issue.id.value())
                .with_details(json!({ "file": stored })),
            )
            .await;
        Ok(stored)
    }

    /// Allocates a staging token for an issue that has not been saved yet.
    ///
    /// No permission check applies: the issue does not exist, so there is
    /// no scope to check against. The gate runs at commit time.
    ///
    /// # Errors
    ///
    /// Returns a manager error when the staging folder cannot be created.
    pub fn begin_staging(&self) -> AttachmentWorkflowResult<StagingToken> {
        Ok(self.manager.begin_staging()?)
    }

    /// Stages `source` under `token`, returning the stored name.
    ///
    /// # Errors
    ///
    /// Returns a manager error when the copy fails or a ceiling is hit.
    pub fn stage_file(
        &self,
        token: StagingToken,
        source: &Utf8Path,
    ) -> AttachmentWorkflowResult<String> {
        Ok(self
            .manager
            .add_file(ContainerKey::Staging(token), source)?)
    }

    /// Commits the staged set of `token` into the saved issue.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentWorkflowError::PermissionDenied`] when the actor
    /// may not manage the issue's attachments, or a manager error,
    /// including a partial commit failure naming the relocated files.
    pub async fn commit_staged(
        &self,
        engine: AccessControlEngine,
        actor: &User,
        issue: &Issue,
        token: StagingToken,
    ) -> AttachmentWorkflowResult<Vec<String>> {
        self.check(engine, actor, issue)?;
        let committed = self.manager.commit(token, issue.id)?;
        if !committed.is_empty() {
            self.audit
                .record(
                    AuditEvent::new(
                        actor,
                        AuditAction::FilesCommitted,
                        AuditEntity::Issue,
                        self.clock.utc(),
                    )
                    .with_entity_id(issue.id.value())
                    .with_details(json!({ "files": committed })),
                )
                .await;
        }
        Ok(committed)
    }

    /// Discards the staged set of `token`. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns a manager error when an existing staging folder cannot be
    /// removed.
    pub fn abandon_staging(&self, token: StagingToken) -> AttachmentWorkflowResult<()> {
        Ok(self.manager.abandon(token)?)
    }

    /// Soft-deletes a stored file from a saved issue.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentWorkflowError::PermissionDenied`] when the actor
    /// may not manage the issue's attachments, or a manager error.
    pub async fn remove_from_issue(
        &self,
        engine: AccessControlEngine,
        actor: &User,
        issue: &Issue,
        stored_name: &str,
    ) -> AttachmentWorkflowResult<()> {
        self.check(engine, actor, issue)?;
        self.manager.remove_file(issue.id, stored_name)?;
        self.audit
            .record(
                AuditEvent::new(
                    actor,
                    AuditAction::FileRemoved,
                    AuditEntity::Issue,
                    self.clock.utc(),
                )
                .with_entity_id(issue.id.value())
                .with_details(json!({ "file": stored_name })),
            )
            .await;
        Ok(())
    }

    /// Exports a stored file for viewing, applying the view permission.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentWorkflowError::PermissionDenied`] when the actor
    /// may not view the issue, or a manager error.
    pub fn open_from_issue(
        &self,
        engine: AccessControlEngine,
        actor: &User,
        issue: &Issue,
        stored_name: &str,
        export_root: &Utf8Path,
    ) -> AttachmentWorkflowResult<Utf8PathBuf> {
        if let Some(reason) = engine.can_view(actor, issue).denial_reason() {
            return Err(AttachmentWorkflowError::PermissionDenied(reason));
        }
        Ok(self.manager.open_file(issue.id, stored_name, export_root)?)
    }

    fn check(
        &self,
        engine: AccessControlEngine,
        actor: &User,
        issue: &Issue,
    ) -> AttachmentWorkflowResult<()> {
        if let Some(reason) = engine.can_manage_attachments(actor, issue).denial_reason() {
            tracing::debug!(
                actor = actor.username(),
                issue = %issue.id,
                %reason,
                "attachment operation denied"
            );
            return Err(AttachmentWorkflowError::PermissionDenied(reason));
        }
        Ok(())
    }
}
