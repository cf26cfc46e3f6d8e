//! Listener registries and the events that flow through them.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::fs::metadata::FileMetadata;

/// Event type names understood by the dispatchers.
pub const MOVE: &str = "move";
pub const DELETE: &str = "delete";
pub const INPUT_CHANGED: &str = "InputChanged";
pub const SELECTION_CHANGED: &str = "selectionChanged";

/// Handle returned by [`EventTarget::add_event_listener`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<E> = Box<dyn Fn(&E) + Send>;

struct Registry<E> {
    next_id: u64,
    listeners: Vec<(ListenerId, &'static str, Listener<E>)>,
}

/// A cloneable registry of typed listeners, keyed by event type name.
///
/// Clones share the same listener list.
pub struct EventTarget<E> {
    registry: Arc<Mutex<Registry<E>>>,
}

impl<E> Clone for EventTarget<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E> Default for EventTarget<E> {
    fn default() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }
}

impl<E> EventTarget<E> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Registry<E>> {
        self.registry.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn add_event_listener(
        &self,
        event_type: &'static str,
        listener: impl Fn(&E) + Send + 'static,
    ) -> ListenerId {
        let mut registry = self.lock();
        let id = ListenerId(registry.next_id);
        registry.next_id += 1;
        registry.listeners.push((id, event_type, Box::new(listener)));
        id
    }

    /// Returns whether a listener was removed.
    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        let mut registry = self.lock();
        let before = registry.listeners.len();
        registry.listeners.retain(|(lid, _, _)| *lid != id);
        registry.listeners.len() != before
    }

    /// Invoke every listener registered for `event_type`, in registration order.
    ///
    /// Listeners must not re-enter the same target.
    pub fn dispatch_event(&self, event_type: &str, event: &E) {
        let registry = self.lock();
        for (_, ty, listener) in registry.listeners.iter() {
            if *ty == event_type {
                listener(event);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }
}

/// Kind of a file-model change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelChangeKind {
    Move,
    Delete,
}

impl ModelChangeKind {
    pub fn event_type(self) -> &'static str {
        match self {
            ModelChangeKind::Move => MOVE,
            ModelChangeKind::Delete => DELETE,
        }
    }
}

/// A move/rename/delete of a file-model node.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelChangeEvent {
    pub kind: ModelChangeKind,
    pub old_value: FileMetadata,
    /// Absent for deletions.
    pub new_value: Option<FileMetadata>,
}

/// Dispatcher for file-model changes.
#[derive(Clone, Default)]
pub struct ModelEventDispatcher {
    target: EventTarget<ModelChangeEvent>,
}

impl ModelEventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> &EventTarget<ModelChangeEvent> {
        &self.target
    }

    pub fn dispatch(&self, event: ModelChangeEvent) {
        tracing::debug!(kind = ?event.kind, old = %event.old_value.location, "model change");
        self.target.dispatch_event(event.kind.event_type(), &event);
    }

    pub fn moved(&self, old_value: FileMetadata, new_value: FileMetadata) {
        self.dispatch(ModelChangeEvent {
            kind: ModelChangeKind::Move,
            old_value,
            new_value: Some(new_value),
        });
    }

    pub fn deleted(&self, old_value: FileMetadata) {
        self.dispatch(ModelChangeEvent {
            kind: ModelChangeKind::Delete,
            old_value,
            new_value: None,
        });
    }
}

/// The editor switched to a different input.
#[derive(Debug, Clone, PartialEq)]
pub struct InputChangedEvent {
    pub metadata: Option<FileMetadata>,
}

/// A new selection was published.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChangedEvent {
    pub selections: Vec<FileMetadata>,
}

/// Notifications the explorer feeds back into itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    ModelChanged(ModelChangeEvent),
    InputChanged(InputChangedEvent),
    SelectionChanged(SelectionChangedEvent),
}

/// Notifications the explorer emits to its host.
#[derive(Debug, Clone, PartialEq)]
pub enum NavEvent {
    /// The open file, or one of its ancestors, moved or was deleted.
    /// `new_input` is `None` when the host should re-derive its input.
    EditorInputMoved {
        parent: Option<String>,
        new_input: Option<String>,
    },
    SelectionChanged(Vec<FileMetadata>),
    /// Scope change requested: display `navigate` as the new root.
    Navigate { navigate: String },
}
