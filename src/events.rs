//! Workspace notifications and disposable subscriptions
//!
//! The core never registers callbacks on its own. A host publishes what it
//! observed (file watcher hits, workspace or configuration changes) on an
//! [EventBus], and wires handlers such as
//! [`ProjectVersionService::handle_event`](crate::service::ProjectVersionService::handle_event)
//! through [`EventBus::subscribe`]. Each returned [Subscription] is disposed
//! independently, explicitly or on drop.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::{Rc, Weak};

use crate::config::Config;

/// Something the host observed that may affect the displayed version
#[derive(Debug, Clone, PartialEq)]
pub enum WorkspaceEvent {
    /// A manifest appeared in the workspace
    ManifestCreated,
    /// The manifest's content changed on storage
    ManifestChanged,
    /// The manifest was deleted
    ManifestDeleted,
    /// The workspace root changed; `None` when no folder is open
    WorkspaceFoldersChanged(Option<PathBuf>),
    /// The host's settings changed
    ConfigurationChanged(Config),
}

impl WorkspaceEvent {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            WorkspaceEvent::ManifestCreated => "manifest-created",
            WorkspaceEvent::ManifestChanged => "manifest-changed",
            WorkspaceEvent::ManifestDeleted => "manifest-deleted",
            WorkspaceEvent::WorkspaceFoldersChanged(_) => "workspace-folders-changed",
            WorkspaceEvent::ConfigurationChanged(_) => "configuration-changed",
        }
    }
}

type Handler = Rc<RefCell<dyn FnMut(&WorkspaceEvent)>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: Vec<(u64, Handler)>,
}

/// Single-threaded publish/subscribe hub for [WorkspaceEvent]s
#[derive(Default, Clone)]
pub struct EventBus {
    registry: Rc<RefCell<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for every subsequently published event.
    ///
    /// The handler stays registered until the returned [Subscription] is
    /// disposed or dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: FnMut(&WorkspaceEvent) + 'static,
    {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        let handler: Handler = Rc::new(RefCell::new(handler));
        registry.handlers.push((id, handler));

        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Deliver `event` to every current subscriber in subscription order.
    ///
    /// Handlers may subscribe or dispose while an event is being delivered.
    /// A handler that publishes re-entrantly does not receive its own nested
    /// event.
    pub fn publish(&self, event: &WorkspaceEvent) {
        let handlers: Vec<Handler> = self
            .registry
            .borrow()
            .handlers
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();

        tracing::debug!(event = event.name(), subscribers = handlers.len(), "publishing event");
        for handler in handlers {
            if let Ok(mut handler) = handler.try_borrow_mut() {
                (&mut *handler)(event);
            }
        }
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.registry.borrow().handlers.len()
    }
}

/// Handle that keeps one handler registered on an [EventBus]
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    /// Unregister the handler now.
    pub fn dispose(self) {
        // Drop does the work.
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .borrow_mut()
                .handlers
                .retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(WorkspaceEvent::ManifestCreated.name(), "manifest-created");
        assert_eq!(WorkspaceEvent::ManifestDeleted.name(), "manifest-deleted");
        assert_eq!(
            WorkspaceEvent::ConfigurationChanged(Config::default()).name(),
            "configuration-changed"
        );
    }

    #[test]
    fn test_publish_reaches_subscribers() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let _sub = bus.subscribe(move |event| sink.borrow_mut().push(event.name()));

        bus.publish(&WorkspaceEvent::ManifestChanged);
        bus.publish(&WorkspaceEvent::ManifestDeleted);
        assert_eq!(*seen.borrow(), vec!["manifest-changed", "manifest-deleted"]);
    }

    #[test]
    fn test_dispose_unsubscribes_independently() {
        let bus = EventBus::new();
        let count = Rc::new(RefCell::new((0, 0)));

        let a = Rc::clone(&count);
        let first = bus.subscribe(move |_| a.borrow_mut().0 += 1);
        let b = Rc::clone(&count);
        let _second = bus.subscribe(move |_| b.borrow_mut().1 += 1);
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(&WorkspaceEvent::ManifestCreated);
        first.dispose();
        bus.publish(&WorkspaceEvent::ManifestCreated);

        assert_eq!(*count.borrow(), (1, 2));
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let bus = EventBus::new();
        {
            let _sub = bus.subscribe(|_| {});
            assert_eq!(bus.subscriber_count(), 1);
        }
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_subscription_outliving_bus() {
        let sub = {
            let bus = EventBus::new();
            bus.subscribe(|_| {})
        };
        sub.dispose();
    }
}
