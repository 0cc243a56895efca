//! Unit tests for the access control module.
//!
//! Organised by layer: domain parsing and diffing, the workflow gate, the
//! permission engine, the in-memory adapters, and the orchestrating issue
//! service.

mod adapters_tests;
mod domain_tests;
mod engine_tests;
mod fixtures;
mod workflow_tests;
