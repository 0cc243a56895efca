//! Access control for the Issue Register.
//!
//! This module composes three layers: a table-driven role policy, a pure
//! workflow state machine over the five issue statuses, and the access
//! control engine that turns both into field-level and record-level
//! decisions. An orchestration service applies those decisions against the
//! issue store and emits audit events for every state change. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Engine decisions in [`engine`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod engine;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
