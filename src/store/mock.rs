use crate::error::{ProjectVersionError, Result};
use crate::store::{ManifestBuffer, ManifestStore};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MockState {
    files: HashMap<PathBuf, ManifestBuffer>,
    fail_writes: bool,
    writes: usize,
}

/// In-memory manifest store for testing without a filesystem
#[derive(Debug, Default)]
pub struct MockManifestStore {
    state: Mutex<MockState>,
}

impl MockManifestStore {
    /// Create a new empty mock store
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add or replace a clean manifest
    pub fn insert(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.state()
            .files
            .insert(path.into(), ManifestBuffer::clean(text));
    }

    /// Remove a manifest
    pub fn remove(&self, path: &Path) {
        self.state().files.remove(path);
    }

    /// Mark a manifest as having unsaved edits
    pub fn set_dirty(&self, path: &Path, dirty: bool) {
        if let Some(buffer) = self.state().files.get_mut(path) {
            buffer.dirty = dirty;
        }
    }

    /// Make every subsequent write fail
    pub fn fail_writes(&self, fail: bool) {
        self.state().fail_writes = fail;
    }

    /// Current text of a manifest
    pub fn text(&self, path: &Path) -> Option<String> {
        self.state().files.get(path).map(|b| b.text.clone())
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.state().writes
    }
}

impl ManifestStore for MockManifestStore {
    fn exists(&self, path: &Path) -> bool {
        self.state().files.contains_key(path)
    }

    fn load(&self, path: &Path) -> Result<ManifestBuffer> {
        self.state().files.get(path).cloned().ok_or_else(|| {
            ProjectVersionError::unreadable(format!("no manifest at {}", path.display()))
        })
    }

    fn write(&self, path: &Path, text: &str) -> Result<()> {
        let mut state = self.state();
        if state.fail_writes {
            return Err(ProjectVersionError::WriteFailed {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "mock write failure"),
            });
        }
        state
            .files
            .insert(path.to_path_buf(), ManifestBuffer::clean(text));
        state.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_store_basic() {
        let store = MockManifestStore::new();
        let path = Path::new("/work/package.json");

        assert!(!store.exists(path));
        store.insert(path, "{}");
        assert!(store.exists(path));
        assert_eq!(store.load(path).unwrap(), ManifestBuffer::clean("{}"));
    }

    #[test]
    fn test_mock_store_dirty_flag() {
        let store = MockManifestStore::new();
        let path = Path::new("/work/package.json");
        store.insert(path, "{}");
        store.set_dirty(path, true);
        assert!(store.load(path).unwrap().dirty);
    }

    #[test]
    fn test_mock_store_writes() {
        let store = MockManifestStore::new();
        let path = Path::new("/work/package.json");
        store.write(path, "a").unwrap();
        assert_eq!(store.text(path).as_deref(), Some("a"));
        assert_eq!(store.write_count(), 1);

        store.fail_writes(true);
        assert!(store.write(path, "b").is_err());
        assert_eq!(store.text(path).as_deref(), Some("a"));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_mock_store_remove() {
        let store = MockManifestStore::default();
        let path = Path::new("/work/package.json");
        store.insert(path, "{}");
        store.remove(path);
        assert!(store.load(path).is_err());
    }
}
