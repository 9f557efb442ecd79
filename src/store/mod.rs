//! Manifest storage abstraction layer
//!
//! The editor never touches storage itself. Hosts hand it text loaded through
//! a [ManifestStore] and persist whatever it returns through the same store.
//!
//! - [fs::FsManifestStore]: reads and writes files on disk
//! - [mock::MockManifestStore]: in-memory store for tests and embedding hosts
//!   that keep manifests in editor buffers

pub mod fs;
pub mod mock;

pub use fs::FsManifestStore;
pub use mock::MockManifestStore;

use crate::error::Result;
use std::path::Path;

/// Manifest text together with its editing state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestBuffer {
    /// Full UTF-8 text of the manifest
    pub text: String,
    /// Whether an editable in-memory copy holds unsaved changes
    pub dirty: bool,
}

impl ManifestBuffer {
    /// A clean buffer, as read straight from storage.
    pub fn clean(text: impl Into<String>) -> Self {
        ManifestBuffer {
            text: text.into(),
            dirty: false,
        }
    }
}

/// Storage operations the host performs on behalf of the editor
///
/// ## Error Handling
///
/// Implementations map storage failures to [crate::error::ProjectVersionError]:
/// reads to `ManifestUnreadable`, writes to `WriteFailed`.
pub trait ManifestStore: Send + Sync {
    /// Whether a manifest exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Load the manifest at `path`.
    ///
    /// # Returns
    /// * `Ok(ManifestBuffer)` - Text and dirty flag of the manifest
    /// * `Err(ManifestUnreadable)` - If it cannot be read as UTF-8 text
    fn load(&self, path: &Path) -> Result<ManifestBuffer>;

    /// Replace the manifest at `path` with `text`.
    ///
    /// # Returns
    /// * `Ok(())` - The text was persisted
    /// * `Err(WriteFailed)` - If persistence failed
    fn write(&self, path: &Path, text: &str) -> Result<()>;
}
