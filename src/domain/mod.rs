//! Domain logic - pure version rules independent of manifest I/O

pub mod project;
pub mod version;

pub use project::Project;
pub use version::{Component, Version, MAX_COMPONENT};
