//! Cached tree state: the current root, its fetched descendants, the set of
//! expanded folders and the flattened rows the widget draws.

use std::collections::HashSet;

use crate::error::Result;
use crate::fs::metadata::FileMetadata;
use crate::nav::selection::Selection;

/// A flattened, displayable view of one cached node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub location: String,
    pub name: String,
    pub depth: usize,
    pub is_folder: bool,
    pub is_expanded: bool,
    pub is_last_sibling: bool,
    pub is_hidden: bool,
}

/// Tree root plus every listing fetched beneath it.
///
/// The root itself is not a row; its children are the top-level rows.
pub struct TreeModel {
    pub root: FileMetadata,
    expanded: HashSet<String>,
    /// Hidden entries shown anyway because a reveal targeted them.
    forced_visible: HashSet<String>,
    pub rows: Vec<Row>,
    pub cursor: usize,
    pub scroll_offset: usize,
    pub show_hidden: bool,
}

impl Default for TreeModel {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeModel {
    pub fn new() -> Self {
        Self {
            root: FileMetadata::default(),
            expanded: HashSet::new(),
            forced_visible: HashSet::new(),
            rows: Vec::new(),
            cursor: 0,
            scroll_offset: 0,
            show_hidden: false,
        }
    }

    /// Replace the root wholesale, forgetting every expansion.
    pub fn set_root(&mut self, root: FileMetadata) {
        self.root = root;
        self.expanded.clear();
        self.forced_visible.clear();
        self.cursor = 0;
        self.scroll_offset = 0;
        self.flatten();
    }

    /// Rebuild `rows` from the cache, respecting `show_hidden`.
    pub fn flatten(&mut self) {
        let mut rows = Vec::new();
        if let Some(children) = &self.root.children {
            self.flatten_children(children, 0, &mut rows);
        }
        self.rows = rows;
        if !self.rows.is_empty() && self.cursor >= self.rows.len() {
            self.cursor = self.rows.len() - 1;
        }
    }

    fn flatten_children(&self, children: &[FileMetadata], depth: usize, rows: &mut Vec<Row>) {
        let visible: Vec<&FileMetadata> = children
            .iter()
            .filter(|c| {
                self.show_hidden || !c.is_hidden() || self.forced_visible.contains(&c.location)
            })
            .collect();
        for (i, child) in visible.iter().enumerate() {
            let is_expanded = self.node_is_expanded(child);
            rows.push(Row {
                location: child.location.clone(),
                name: child.name.clone(),
                depth,
                is_folder: child.is_folder(),
                is_expanded,
                is_last_sibling: i == visible.len() - 1,
                is_hidden: child.is_hidden(),
            });
            if is_expanded {
                if let Some(grandchildren) = &child.children {
                    self.flatten_children(grandchildren, depth + 1, rows);
                }
            }
        }
    }

    fn node_is_expanded(&self, node: &FileMetadata) -> bool {
        node.children.is_some() && self.expanded.contains(&node.location)
    }

    /// Find a cached node by Location (the root included).
    pub fn find_node(&self, location: &str) -> Option<&FileMetadata> {
        fn walk<'a>(node: &'a FileMetadata, target: &str) -> Option<&'a FileMetadata> {
            if node.location == target {
                return Some(node);
            }
            node.children
                .as_ref()?
                .iter()
                .find_map(|child| walk(child, target))
        }
        walk(&self.root, location)
    }

    pub fn find_node_mut(&mut self, location: &str) -> Option<&mut FileMetadata> {
        fn walk<'a>(node: &'a mut FileMetadata, target: &str) -> Option<&'a mut FileMetadata> {
            if node.location == target {
                return Some(node);
            }
            node.children
                .as_mut()?
                .iter_mut()
                .find_map(|child| walk(child, target))
        }
        walk(&mut self.root, location)
    }

    /// Index of the row displaying `location`, if it is on screen.
    pub fn get_row(&self, location: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.location == location)
    }

    /// The cached item bound to the row displaying `location`.
    pub fn row_item(&self, location: &str) -> Option<&FileMetadata> {
        self.get_row(location).and_then(|_| self.find_node(location))
    }

    pub fn is_expanded(&self, location: &str) -> bool {
        self.find_node(location)
            .map(|node| self.node_is_expanded(node) || node.location == self.root.location)
            .unwrap_or(false)
    }

    /// Store a fresh listing for `location`. Expansions recorded below the
    /// node are dropped because the old descendants no longer exist in the cache.
    pub fn set_children(&mut self, location: &str, children: Vec<FileMetadata>) -> bool {
        let mut stale = Vec::new();
        let Some(node) = self.find_node_mut(location) else {
            return false;
        };
        if let Some(old) = &node.children {
            collect_locations(old, &mut stale);
        }
        node.children = Some(children);
        for loc in stale {
            self.expanded.remove(&loc);
        }
        self.flatten();
        true
    }

    /// Show `locations` even while hidden entries are filtered out. Replaces
    /// the previous set.
    pub fn force_visible(&mut self, locations: impl IntoIterator<Item = String>) {
        self.forced_visible = locations.into_iter().collect();
        self.flatten();
    }

    /// Mark a node with cached children as expanded.
    pub fn mark_expanded(&mut self, location: &str) {
        self.expanded.insert(location.to_string());
        self.flatten();
    }

    pub fn collapse(&mut self, location: &str) {
        if self.expanded.remove(location) {
            self.flatten();
        }
    }

    /// Locations currently expanded, for diagnostics and restore.
    pub fn expanded_locations(&self) -> impl Iterator<Item = &str> {
        self.expanded.iter().map(String::as_str)
    }

    pub fn cursor_row(&self) -> Option<&Row> {
        self.rows.get(self.cursor)
    }

    pub fn cursor_item(&self) -> Option<&FileMetadata> {
        self.cursor_row().and_then(|row| self.find_node(&row.location))
    }

    /// Move the cursor to the row displaying `location`.
    pub fn cursor_on(&mut self, location: &str) -> bool {
        match self.get_row(location) {
            Some(idx) => {
                self.cursor = idx;
                true
            }
            None => false,
        }
    }

    pub fn select_next(&mut self) {
        if !self.rows.is_empty() && self.cursor < self.rows.len() - 1 {
            self.cursor += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.cursor = 0;
    }

    pub fn select_last(&mut self) {
        self.cursor = self.rows.len().saturating_sub(1);
    }

    /// Move the cursor to the row of the nearest displayed ancestor.
    pub fn cursor_to_parent(&mut self) -> bool {
        let Some(row) = self.cursor_row() else {
            return false;
        };
        let depth = row.depth;
        if depth == 0 {
            return false;
        }
        if let Some(idx) = (0..self.cursor).rev().find(|&i| self.rows[i].depth < depth) {
            self.cursor = idx;
            return true;
        }
        false
    }

    /// Keep the cursor row within a viewport of `visible_height` rows.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + visible_height {
            self.scroll_offset = self.cursor - visible_height + 1;
        }
    }

    pub fn toggle_hidden(&mut self) {
        self.show_hidden = !self.show_hidden;
        self.flatten();
    }
}

fn collect_locations(children: &[FileMetadata], out: &mut Vec<String>) {
    for child in children {
        out.push(child.location.clone());
        if let Some(grandchildren) = &child.children {
            collect_locations(grandchildren, out);
        }
    }
}

/// Cursor and selection operations over the tree, shared by the explorer
/// and its renderer.
pub struct NavHandler {
    pub model: TreeModel,
    selection: Selection,
}

impl NavHandler {
    pub fn new(selection: Selection) -> Self {
        Self {
            model: TreeModel::new(),
            selection,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Put the cursor on the row bound to `item`, when it is displayed.
    pub fn cursor_on(&mut self, item: &FileMetadata) -> bool {
        self.model.cursor_on(&item.location)
    }

    /// Publish `item` as the sole selection.
    pub fn set_selection(&self, item: &FileMetadata) {
        self.selection.set_selections(vec![item.clone()]);
    }

    /// The item under the cursor.
    pub fn cursor(&self) -> Option<&FileMetadata> {
        self.model.cursor_item()
    }

    pub fn is_expandable(&self, item: &FileMetadata) -> bool {
        item.is_folder()
    }

    pub fn is_expanded(&self, item: &FileMetadata) -> bool {
        self.model.is_expanded(&item.location)
    }
}

/// Tree operations an explorer exposes to its renderer.
#[allow(async_fn_in_trait)]
pub trait TreeExplorer {
    fn nav_handler(&self) -> &NavHandler;

    fn nav_handler_mut(&mut self) -> &mut NavHandler;

    /// Expand the folder at `location`, fetching its children if uncached.
    async fn expand(&mut self, location: &str) -> Result<()>;

    fn collapse(&mut self, location: &str);

    /// Re-fetch the children of `location`, optionally expanding it.
    async fn changed_item(&mut self, location: &str, force_expand: bool) -> Result<()>;

    /// Install `root` (with its cached children) as the tree root.
    fn load(&mut self, root: FileMetadata);
}
