//! Manifest version editor
//!
//! Owns the cached [Project] for a single manifest and performs bounded
//! version bumps by exact substring replacement, so every byte of the
//! manifest outside the `"version"` value survives untouched.
//!
//! ```text
//! Unresolved -> Resolved -> {Valid, Invalid} -> (Valid <-> Stale)
//! ```
//!
//! Callers that suspend between taking a [LocationToken] and handing text
//! back (awaited I/O, prompts) pass the token to [`ManifestEditor::read_at`] /
//! [`ManifestEditor::bump_at`]. If the location was reset or re-resolved in
//! the meantime the call fails with `LocationChanged` and nothing is committed.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::domain::{Component, Project, Version, MAX_COMPONENT};
use crate::error::{ProjectVersionError, Result};
use crate::store::ManifestBuffer;

/// File name of the manifest inside the workspace root.
pub const MANIFEST_FILE_NAME: &str = "package.json";

/// Lifecycle of the manifest resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestState {
    /// No location computed yet
    Unresolved,
    /// Location known, nothing read yet
    Resolved,
    /// Last read produced a name and a usable version
    Valid,
    /// Last read failed or had no usable version
    Invalid,
    /// The manifest changed since the last successful read
    Stale,
}

/// Identifies the manifest location an operation started against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationToken(u64);

/// Outcome of a successful read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Name or version differ from the cache; the cache was replaced
    Changed,
    /// Same name and version as cached; nothing was touched
    Unchanged,
}

impl ReadOutcome {
    /// Whether the collaborator should redraw.
    pub fn needs_repaint(&self) -> bool {
        matches!(self, ReadOutcome::Changed)
    }
}

/// Result of a successful bump
#[derive(Debug, Clone, PartialEq)]
pub struct BumpOutcome {
    pub component: Component,
    pub previous: Version,
    pub current: Version,
    /// Manifest text with only the version value replaced
    pub text: String,
}

/// Editor for the `name`/`version` pair of one manifest
#[derive(Debug)]
pub struct ManifestEditor {
    location: Option<PathBuf>,
    generation: u64,
    project: Project,
    state: ManifestState,
    strict: bool,
    max_component: u32,
}

impl ManifestEditor {
    /// Create an unresolved editor.
    ///
    /// # Arguments
    /// * `strict` - Validate versions as plain `MAJOR.MINOR.PATCH`
    pub fn new(strict: bool) -> Self {
        Self::with_max_component(strict, MAX_COMPONENT)
    }

    /// Create an unresolved editor whose versions are capped at `max_component`.
    pub fn with_max_component(strict: bool, max_component: u32) -> Self {
        ManifestEditor {
            location: None,
            generation: 0,
            project: Project::default(),
            state: ManifestState::Unresolved,
            strict,
            max_component,
        }
    }

    pub fn state(&self) -> ManifestState {
        self.state
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    pub fn has_package(&self) -> bool {
        self.project.has_package
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Compute the manifest path under `workspace_root`.
    ///
    /// Idempotent: an already resolved location is kept until
    /// [`reset_location`](Self::reset_location). Does no I/O.
    pub fn resolve_location(&mut self, workspace_root: Option<&Path>) -> Option<&Path> {
        if self.location.is_none() {
            if let Some(root) = workspace_root {
                let path = root.join(MANIFEST_FILE_NAME);
                tracing::debug!(path = %path.display(), "manifest location resolved");
                self.location = Some(path);
                self.generation += 1;
                self.project.has_package = true;
                self.state = ManifestState::Resolved;
            }
        }
        self.location.as_deref()
    }

    /// Forget the location, e.g. after the manifest was deleted.
    pub fn reset_location(&mut self) {
        if self.location.take().is_some() {
            tracing::debug!("manifest location reset");
        }
        self.generation += 1;
        self.project = Project::default();
        self.state = ManifestState::Unresolved;
    }

    /// Token for the current location.
    ///
    /// # Returns
    /// * `Err(ManifestNotFound)` - If no location is resolved
    pub fn location_token(&self) -> Result<LocationToken> {
        if self.location.is_some() {
            Ok(LocationToken(self.generation))
        } else {
            Err(ProjectVersionError::ManifestNotFound)
        }
    }

    /// Fail with `LocationChanged` unless `token` still names the current location.
    pub fn ensure_current(&self, token: LocationToken) -> Result<()> {
        if self.location.is_none() {
            return Err(ProjectVersionError::ManifestNotFound);
        }
        if token.0 != self.generation {
            tracing::warn!("manifest location changed during an in-flight operation");
            return Err(ProjectVersionError::LocationChanged);
        }
        Ok(())
    }

    /// Record that the manifest changed on storage since the last read.
    pub fn mark_stale(&mut self) {
        if self.state == ManifestState::Valid {
            self.state = ManifestState::Stale;
        }
    }

    /// Parse manifest text against the current location.
    pub fn read(&mut self, raw: &str) -> Result<ReadOutcome> {
        let token = self.location_token()?;
        self.read_at(token, raw)
    }

    /// Parse manifest text loaded for `token`'s location.
    ///
    /// # Returns
    /// * `Ok(Changed)` - Name or version differ; the cached project was replaced
    /// * `Ok(Unchanged)` - Nothing differs; no repaint needed
    /// * `Err(ManifestUnreadable)` - Not JSON; name and version are cleared
    /// * `Err(VersionFieldMissing)` - No version, or one that fails validation
    pub fn read_at(&mut self, token: LocationToken, raw: &str) -> Result<ReadOutcome> {
        self.ensure_current(token)?;

        let json: Value = match serde_json::from_str(raw) {
            Ok(json) => json,
            Err(e) => {
                tracing::debug!(error = %e, "manifest is not valid JSON");
                self.project = Project::new("", None, true);
                self.state = ManifestState::Invalid;
                return Err(ProjectVersionError::unreadable(e.to_string()));
            }
        };

        let name = json.get("name").and_then(Value::as_str).unwrap_or("");
        let version = json.get("version").and_then(Value::as_str);

        if !self.project.differs_from(name, version) {
            if self.project.version.is_none() {
                return Err(ProjectVersionError::VersionFieldMissing);
            }
            self.state = ManifestState::Valid;
            return Ok(ReadOutcome::Unchanged);
        }

        let parsed = match version.map(|text| Version::parse_with_max(text, self.strict, self.max_component)) {
            Some(Ok(v)) => Some(v),
            Some(Err(e)) => {
                tracing::debug!(error = %e, "manifest version rejected");
                None
            }
            None => None,
        };

        self.project = Project::new(name, parsed, true);
        if self.project.version.is_none() {
            self.state = ManifestState::Invalid;
            return Err(ProjectVersionError::VersionFieldMissing);
        }

        tracing::info!(
            name = %self.project.name,
            version = %self.project.version_text(),
            "manifest read"
        );
        self.state = ManifestState::Valid;
        Ok(ReadOutcome::Changed)
    }

    /// Bump `component` in `buffer` against the current location.
    pub fn bump(&mut self, component: Component, by: u64, buffer: &ManifestBuffer) -> Result<BumpOutcome> {
        let token = self.location_token()?;
        self.bump_at(token, component, by, buffer)
    }

    /// Bump `component` by `by` and rewrite `buffer`'s text.
    ///
    /// Only the first literal `"version": "<old>"` is replaced. If it is not
    /// present the cached version is left as it was and `RewriteMismatch` is
    /// returned, so a hand-edited manifest is never overwritten with a guess.
    ///
    /// # Returns
    /// * `Ok(BumpOutcome)` - The rewritten text; the cached version is updated
    /// * `Err(ManifestNotFound | LocationChanged)` - Location missing or moved
    /// * `Err(BufferDirty)` - The buffer has unsaved edits
    /// * `Err(VersionFieldMissing)` - No cached version to bump
    /// * `Err(OutOfRange)` - `by` is 0 or above `max_increase`
    /// * `Err(RewriteMismatch)` - The old version literal is not in the text
    pub fn bump_at(
        &mut self,
        token: LocationToken,
        component: Component,
        by: u64,
        buffer: &ManifestBuffer,
    ) -> Result<BumpOutcome> {
        self.ensure_current(token)?;

        if buffer.dirty {
            return Err(ProjectVersionError::BufferDirty);
        }

        let previous = self
            .project
            .version
            .clone()
            .ok_or(ProjectVersionError::VersionFieldMissing)?;

        let mut current = previous.clone();
        current.increase(component, by)?;

        let needle = version_literal(&previous);
        if !buffer.text.contains(&needle) {
            tracing::warn!(expected = %needle, "version literal not found in manifest");
            return Err(ProjectVersionError::RewriteMismatch);
        }
        let text = buffer.text.replacen(&needle, &version_literal(&current), 1);

        tracing::info!(%component, by, from = %previous, to = %current, "version bumped");
        self.project.version = Some(current.clone());

        Ok(BumpOutcome {
            component,
            previous,
            current,
            text,
        })
    }

    /// Undo a committed bump whose text could not be persisted.
    ///
    /// Only restores when the cache still holds the bumped version.
    pub fn rollback(&mut self, outcome: &BumpOutcome) {
        if self.project.version.as_ref() == Some(&outcome.current) {
            tracing::debug!(to = %outcome.previous, "version bump rolled back");
            self.project.version = Some(outcome.previous.clone());
        }
    }

    /// Largest legal increment for `component` of the cached version.
    pub fn max_increase(&self, component: Component) -> Option<u32> {
        self.project.version.as_ref().map(|v| v.max_increase(component))
    }
}

/// The exact `"version": "<v>"` text a bump looks for.
fn version_literal(version: &Version) -> String {
    format!("\"version\": \"{}\"", version)
}
