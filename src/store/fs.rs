use crate::error::{ProjectVersionError, Result};
use crate::store::{ManifestBuffer, ManifestStore};
use std::fs;
use std::path::Path;

/// Manifest store backed by the local filesystem
///
/// Files on disk have no unsaved edits, so loaded buffers are always clean.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsManifestStore;

impl FsManifestStore {
    pub fn new() -> Self {
        FsManifestStore
    }
}

impl ManifestStore for FsManifestStore {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn load(&self, path: &Path) -> Result<ManifestBuffer> {
        let text = fs::read_to_string(path).map_err(|e| {
            ProjectVersionError::unreadable(format!("cannot read {}: {}", path.display(), e))
        })?;
        Ok(ManifestBuffer::clean(text))
    }

    fn write(&self, path: &Path, text: &str) -> Result<()> {
        fs::write(path, text).map_err(|source| ProjectVersionError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fs_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");
        let store = FsManifestStore::new();

        assert!(!store.exists(&path));
        store.write(&path, "{\"version\": \"1.0.0\"}").unwrap();
        assert!(store.exists(&path));

        let buffer = store.load(&path).unwrap();
        assert_eq!(buffer.text, "{\"version\": \"1.0.0\"}");
        assert!(!buffer.dirty);
    }

    #[test]
    fn test_fs_store_missing_file_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let err = FsManifestStore::new()
            .load(&dir.path().join("package.json"))
            .unwrap_err();
        assert!(matches!(err, ProjectVersionError::ManifestUnreadable(_)));
    }

    #[test]
    fn test_fs_store_directory_is_not_a_manifest() {
        let dir = TempDir::new().unwrap();
        assert!(!FsManifestStore::new().exists(dir.path()));
    }

    #[test]
    fn test_fs_store_write_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("package.json");
        let err = FsManifestStore::new().write(&path, "{}").unwrap_err();
        assert!(matches!(err, ProjectVersionError::WriteFailed { .. }));
    }
}
