use crate::fs::metadata::FileMetadata;

/// The type of clipboard operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardOp {
    Copy,
    Cut,
}

/// Buffer behind the copy/paste-selections keybindings.
#[derive(Debug, Clone, Default)]
pub struct ClipboardState {
    pub items: Vec<FileMetadata>,
    pub operation: Option<ClipboardOp>,
}

impl ClipboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the clipboard contents.
    pub fn set(&mut self, items: Vec<FileMetadata>, op: ClipboardOp) {
        self.items = items;
        self.operation = Some(op);
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.operation = None;
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Drop entries whose Location is `location` or lies below it.
    pub fn forget(&mut self, location: &str) {
        self.items.retain(|item| !item.location.starts_with(location));
        if self.items.is_empty() {
            self.operation = None;
        }
    }
}
