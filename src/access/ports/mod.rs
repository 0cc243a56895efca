//! Port contracts for external collaborators.
//!
//! The record store, user store, settings store, and audit sink are owned by
//! the embedding application; the core calls them through these traits and
//! never implements persistence itself.

mod audit;
mod store;

pub use audit::{AuditAction, AuditEntity, AuditEvent, AuditSink};
pub use store::{
    AUTHENTICATION_ENABLED, IssueStore, IssueStoreError, IssueStoreResult, SettingsStore,
    SettingsStoreError, SettingsStoreResult, UserStore, UserStoreError, UserStoreResult,
};
