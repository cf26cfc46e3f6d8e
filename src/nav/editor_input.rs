use std::sync::{Arc, Mutex};

use crate::fs::metadata::FileMetadata;
use crate::nav::events::{EventTarget, InputChangedEvent, ListenerId, INPUT_CHANGED};

/// Tracks the file open in the editor and announces changes to it.
///
/// Clones share state, so the host and the explorer can both hold one.
#[derive(Clone, Default)]
pub struct EditorInputManager {
    current: Arc<Mutex<Option<FileMetadata>>>,
    target: EventTarget<InputChangedEvent>,
}

impl EditorInputManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_file_metadata(&self) -> Option<FileMetadata> {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Switch the editor input and dispatch `InputChanged`.
    pub fn set_input(&self, metadata: Option<FileMetadata>) {
        {
            let mut guard = self.current.lock().unwrap_or_else(|e| e.into_inner());
            *guard = metadata.clone();
        }
        tracing::debug!(
            location = metadata.as_ref().map(|m| m.location.as_str()).unwrap_or("<none>"),
            "editor input changed"
        );
        self.target
            .dispatch_event(INPUT_CHANGED, &InputChangedEvent { metadata });
    }

    pub fn add_event_listener(
        &self,
        listener: impl Fn(&InputChangedEvent) + Send + 'static,
    ) -> ListenerId {
        self.target.add_event_listener(INPUT_CHANGED, listener)
    }

    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        self.target.remove_event_listener(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn set_input_updates_and_notifies() {
        let manager = EditorInputManager::new();
        let fired = Arc::new(AtomicBool::new(false));
        let f = fired.clone();
        manager.add_event_listener(move |event| {
            f.store(event.metadata.is_some(), Ordering::SeqCst);
        });
        manager.set_input(Some(FileMetadata::from_location("/file/a.rs")));
        assert!(fired.load(Ordering::SeqCst));
        assert_eq!(
            manager.get_file_metadata().map(|m| m.location),
            Some("/file/a.rs".to_string())
        );
    }

    #[test]
    fn clearing_input() {
        let manager = EditorInputManager::new();
        manager.set_input(Some(FileMetadata::from_location("/file/a.rs")));
        manager.set_input(None);
        assert!(manager.get_file_metadata().is_none());
    }
}
