//! Domain model for attachment lifecycle management.

mod container;
mod error;
pub mod naming;

pub use container::{AttachmentRecord, ContainerKey, FileState, StagingToken};
pub use error::AttachmentError;
