//! Issue Register core: access control and attachment lifecycle management.
//!
//! This crate provides the decision-making heart of the Issue Register
//! application: a role- and department-scoped access-control engine gating
//! field-level editing and a forward-only issue workflow, and an attachment
//! lifecycle manager that stages files for not-yet-created records, commits
//! them on save, and soft-deletes them recoverable.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory stores, etc.)
//!
//! # Modules
//!
//! - [`access`]: Role policy, workflow state machine, and the access-control
//!   engine, plus the issue orchestration service
//! - [`attachment`]: Staged, committed, and soft-deleted file sets per issue

pub mod access;
pub mod attachment;
