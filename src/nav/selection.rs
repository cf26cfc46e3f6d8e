use std::sync::{Arc, Mutex};

use crate::fs::metadata::FileMetadata;
use crate::nav::events::{EventTarget, ListenerId, SelectionChangedEvent, SELECTION_CHANGED};

/// Shared selection broadcaster.
///
/// Holds a set of selected items (deduplicated by Location) and notifies
/// `selectionChanged` listeners whenever it is replaced. Clones share state.
#[derive(Clone)]
pub struct Selection {
    id: &'static str,
    selections: Arc<Mutex<Vec<FileMetadata>>>,
    target: EventTarget<SelectionChangedEvent>,
}

impl Selection {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            selections: Arc::new(Mutex::new(Vec::new())),
            target: EventTarget::new(),
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn get_selections(&self) -> Vec<FileMetadata> {
        self.selections
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn get_selection(&self) -> Option<FileMetadata> {
        self.get_selections().into_iter().next()
    }

    /// Replace the selection and notify listeners.
    pub fn set_selections(&self, items: Vec<FileMetadata>) {
        let mut unique: Vec<FileMetadata> = Vec::with_capacity(items.len());
        for item in items {
            if !unique.iter().any(|u| u.location == item.location) {
                unique.push(item);
            }
        }
        {
            let mut guard = self.selections.lock().unwrap_or_else(|e| e.into_inner());
            *guard = unique.clone();
        }
        self.target.dispatch_event(
            SELECTION_CHANGED,
            &SelectionChangedEvent { selections: unique },
        );
    }

    pub fn add_event_listener(
        &self,
        listener: impl Fn(&SelectionChangedEvent) + Send + 'static,
    ) -> ListenerId {
        self.target.add_event_listener(SELECTION_CHANGED, listener)
    }

    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        self.target.remove_event_listener(id)
    }
}
