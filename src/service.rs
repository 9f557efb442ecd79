//! Composition boundary between a host and the version editor
//!
//! A [ProjectVersionService] is constructed explicitly by the host, owns one
//! [ManifestEditor], the active [Config] and a [ManifestStore], and exposes
//! the host-facing operations as plain methods: refresh the status item,
//! open the manifest, bump a component, react to workspace events.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::config::Config;
use crate::display::{format_display, StatusItem};
use crate::domain::{Component, Project, Version};
use crate::error::{ProjectVersionError, Result};
use crate::events::{EventBus, Subscription, WorkspaceEvent};
use crate::manifest::{ManifestEditor, ReadOutcome, MANIFEST_FILE_NAME};
use crate::store::ManifestStore;

/// What happened to the rewritten manifest after a bump
#[derive(Debug, Clone, PartialEq)]
pub enum BumpReport {
    /// Written through the store (`autoSaveOnVersionChange = true`)
    Saved {
        path: PathBuf,
        from: Version,
        to: Version,
    },
    /// Handed back for the host to place in its editing buffer
    Pending {
        path: PathBuf,
        from: Version,
        to: Version,
        text: String,
    },
}

impl BumpReport {
    pub fn new_version(&self) -> &Version {
        match self {
            BumpReport::Saved { to, .. } | BumpReport::Pending { to, .. } => to,
        }
    }
}

/// Host-facing project version service
pub struct ProjectVersionService<S: ManifestStore> {
    store: S,
    config: Config,
    editor: ManifestEditor,
    workspace_root: Option<PathBuf>,
    status: StatusItem,
    needs_repaint: bool,
}

impl<S: ManifestStore> ProjectVersionService<S> {
    /// Create a service for `workspace_root`. Nothing is read until
    /// [`init`](Self::init) or an event arrives.
    pub fn new(store: S, config: Config, workspace_root: Option<PathBuf>) -> Self {
        let status = StatusItem::loading(
            config.status_bar_item_alignment,
            config.status_bar_item_priority,
        );
        ProjectVersionService {
            store,
            editor: ManifestEditor::new(config.strict),
            config,
            workspace_root,
            status,
            needs_repaint: true,
        }
    }

    /// Resolve the manifest when the workspace has one, then paint the status.
    pub fn init(&mut self) -> &StatusItem {
        let present = self
            .workspace_root
            .as_ref()
            .map(|root| self.store.exists(&root.join(MANIFEST_FILE_NAME)))
            .unwrap_or(false);

        if present {
            self.editor.resolve_location(self.workspace_root.as_deref());
            self.refresh(true, false)
        } else {
            tracing::info!("no manifest in workspace");
            self.status.set_no_package();
            &self.status
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn status(&self) -> &StatusItem {
        &self.status
    }

    pub fn project(&self) -> &Project {
        self.editor.project()
    }

    pub fn editor(&self) -> &ManifestEditor {
        &self.editor
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn needs_repaint(&self) -> bool {
        self.needs_repaint
    }

    /// Whether a manifest is resolved and present in the store.
    pub fn package_file_exists(&self) -> bool {
        self.editor
            .location()
            .map(|path| self.store.exists(path))
            .unwrap_or(false)
    }

    fn existing_manifest(&self) -> Result<PathBuf> {
        match self.editor.location() {
            Some(path) if self.store.exists(path) => Ok(path.to_path_buf()),
            _ => Err(ProjectVersionError::ManifestNotFound),
        }
    }

    /// Status text for the cached project.
    pub fn display_text(&self) -> String {
        let project = self.editor.project();
        format_display(
            &project.name,
            &project.version_text(),
            self.config.display,
            &self.config.custom_format,
        )
    }

    /// Update the status item.
    ///
    /// # Arguments
    /// * `force` - Repaint even if the last read found nothing new
    /// * `use_cached` - Re-render from the cached project without reading
    pub fn refresh(&mut self, force: bool, use_cached: bool) -> &StatusItem {
        if !force && !self.needs_repaint {
            return &self.status;
        }

        if use_cached {
            if self.editor.project().version.is_none() {
                self.status.set_no_package();
                return &self.status;
            }
        } else if let Err(e) = self.read_package_info() {
            tracing::debug!(error = %e, "manifest unavailable");
            self.status.set_no_package();
            return &self.status;
        }

        let text = self.display_text();
        self.status.set_ready(text);
        &self.status
    }

    fn read_package_info(&mut self) -> Result<ReadOutcome> {
        let token = self.editor.location_token()?;
        let path = self.existing_manifest()?;
        let buffer = self.store.load(&path)?;
        let outcome = self.editor.read_at(token, &buffer.text)?;
        self.needs_repaint = outcome.needs_repaint();
        Ok(outcome)
    }

    /// Path of the manifest for the host to open.
    pub fn open(&self) -> Result<PathBuf> {
        self.existing_manifest()
    }

    /// Largest legal increment for `component`.
    pub fn max_increase(&self, component: Component) -> Result<u32> {
        self.editor
            .max_increase(component)
            .ok_or(ProjectVersionError::VersionFieldMissing)
    }

    /// Validate user input for an increase-by prompt.
    ///
    /// # Returns
    /// * `Ok(by)` - A whole number accepted by `can_increase`
    /// * `Err(OutOfRange)` - Anything else, including non-numeric input
    pub fn validate_increase_by(&self, component: Component, input: &str) -> Result<u64> {
        let version = self
            .editor
            .project()
            .version
            .as_ref()
            .ok_or(ProjectVersionError::VersionFieldMissing)?;
        let max = version.max_increase(component);

        let by = input.trim().parse::<u64>().unwrap_or(0);
        if version.can_increase(component, by) {
            Ok(by)
        } else {
            Err(ProjectVersionError::OutOfRange { component, by, max })
        }
    }

    /// Bump `component` by `by` in the manifest.
    ///
    /// With `autoSaveOnVersionChange` the text is written through the store;
    /// a failed write rolls the cached version back. Otherwise the rewritten
    /// text is returned for the host to apply.
    pub fn bump(&mut self, component: Component, by: u64) -> Result<BumpReport> {
        let token = self.editor.location_token()?;
        let path = self.existing_manifest()?;
        let buffer = self.store.load(&path)?;
        let outcome = self.editor.bump_at(token, component, by, &buffer)?;

        let report = if self.config.auto_save_on_version_change {
            let written = self
                .editor
                .ensure_current(token)
                .and_then(|_| self.store.write(&path, &outcome.text));
            if let Err(e) = written {
                tracing::warn!(error = %e, path = %path.display(), "failed to save bumped manifest");
                self.editor.rollback(&outcome);
                return Err(e);
            }
            tracing::info!(path = %path.display(), version = %outcome.current, "manifest saved");
            BumpReport::Saved {
                path,
                from: outcome.previous,
                to: outcome.current,
            }
        } else {
            BumpReport::Pending {
                path,
                from: outcome.previous,
                to: outcome.current,
                text: outcome.text,
            }
        };

        self.refresh(true, true);
        Ok(report)
    }

    /// Apply a new configuration.
    ///
    /// Alignment and priority are copied onto the status item untouched. A
    /// change of strictness rebuilds the editor and re-reads the manifest.
    pub fn update_config(&mut self, config: Config) {
        self.status.alignment = config.status_bar_item_alignment;
        self.status.priority = config.status_bar_item_priority;

        let reread = config.strict != self.config.strict;
        self.config = config;

        if reread {
            self.editor = ManifestEditor::new(self.config.strict);
        }
        self.editor.resolve_location(self.workspace_root.as_deref());
        self.refresh(true, !reread);
    }

    /// React to a host notification.
    pub fn handle_event(&mut self, event: &WorkspaceEvent) {
        tracing::debug!(event = event.name(), "handling workspace event");
        match event {
            WorkspaceEvent::ManifestCreated => {
                self.editor.resolve_location(self.workspace_root.as_deref());
                self.refresh(true, false);
            }
            WorkspaceEvent::ManifestChanged => {
                self.editor.mark_stale();
                self.refresh(true, false);
            }
            WorkspaceEvent::ManifestDeleted => {
                self.editor.reset_location();
                self.refresh(true, false);
            }
            WorkspaceEvent::WorkspaceFoldersChanged(root) => {
                if root.as_deref() != self.workspace_root.as_deref() {
                    self.workspace_root = root.clone();
                    self.editor.reset_location();
                }
                self.editor.resolve_location(self.workspace_root.as_deref());
                self.refresh(true, false);
            }
            WorkspaceEvent::ConfigurationChanged(config) => self.update_config(config.clone()),
        }
    }

    pub fn workspace_root(&self) -> Option<&Path> {
        self.workspace_root.as_deref()
    }
}

/// Route every event published on `bus` to `service`.
///
/// Events arriving while the service is already borrowed are dropped.
pub fn connect<S>(bus: &EventBus, service: &Rc<RefCell<ProjectVersionService<S>>>) -> Subscription
where
    S: ManifestStore + 'static,
{
    let service = Rc::clone(service);
    bus.subscribe(move |event| match service.try_borrow_mut() {
        Ok(mut service) => service.handle_event(event),
        Err(_) => tracing::warn!(event = event.name(), "service busy, event dropped"),
    })
}
