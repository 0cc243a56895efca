//! Adapter implementations of the access ports.

pub mod memory;
