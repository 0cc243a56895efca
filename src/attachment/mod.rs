//! Attachment lifecycle management for the Issue Register.
//!
//! Supporting documents live in a directory tree the manager treats as
//! opaque storage: one folder per issue, a `_staging` area for issues that
//! do not have an identifier yet, and a `_deleted` area holding soft-deleted
//! payloads for later recovery. The manager is pure file and metadata
//! bookkeeping; permission checks belong to its caller, which
//! [`service::AttachmentWorkflow`] implements.
//!
//! - Domain types in [`domain`]
//! - Filesystem bookkeeping in [`manager`]
//! - Permission-checked orchestration in [`service`]

pub mod domain;
pub mod manager;
pub mod service;

#[cfg(test)]
mod tests;
