//! Unit tests for the attachment module.
//!
//! Organised by layer: stored-name hygiene, the filesystem manager, and the
//! permission-checked workflow.
