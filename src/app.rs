use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use ratatui::layout::Rect;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::error::{NavError, Result};
use crate::fs::clipboard::{ClipboardOp, ClipboardState};
use crate::fs::local::LocalFileService;
use crate::fs::metadata::{FileMetadata, CHILDREN_QUERY};
use crate::fs::service::{FileOperations, FileService};
use crate::nav::commands::RenderedCommand;
use crate::nav::editor_input::EditorInputManager;
use crate::nav::events::{ModelEventDispatcher, NavEvent};
use crate::nav::explorer::{NavExplorer, NavExplorerParams, PageParams};
use crate::nav::file_commands::*;
use crate::nav::renderer::NavRenderer;
use crate::nav::tree::TreeExplorer;
use crate::theme::{resolve_theme, ThemeColors};

/// Prefix of the navigator toolbar scopes.
pub const TOOLBAR_ID: &str = "sidebarToolbar";

/// The kind of dialog being displayed.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogKind {
    CreateFile { parent: FileMetadata },
    CreateFolder { parent: FileMetadata },
    CreateProject,
    Rename { target: FileMetadata },
    DeleteConfirm { targets: Vec<FileMetadata> },
    /// Destination is a workspace-relative folder path.
    CopyTo { items: Vec<FileMetadata> },
    MoveTo { items: Vec<FileMetadata> },
    /// Source is a path outside the workspace.
    Import { dest: FileMetadata },
    Export { item: FileMetadata },
    Error { message: String },
}

impl DialogKind {
    pub fn title(&self) -> &'static str {
        match self {
            DialogKind::CreateFile { .. } => "New File",
            DialogKind::CreateFolder { .. } => "New Folder",
            DialogKind::CreateProject => "New Project",
            DialogKind::Rename { .. } => "Rename",
            DialogKind::DeleteConfirm { .. } => "Delete Confirmation",
            DialogKind::CopyTo { .. } => "Copy To (folder in workspace)",
            DialogKind::MoveTo { .. } => "Move To (folder in workspace)",
            DialogKind::Import { .. } => "Import (local path)",
            DialogKind::Export { .. } => "Export To (local directory)",
            DialogKind::Error { .. } => "Error",
        }
    }

    pub fn takes_input(&self) -> bool {
        !matches!(
            self,
            DialogKind::DeleteConfirm { .. } | DialogKind::Error { .. }
        )
    }
}

/// Application mode.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum AppMode {
    #[default]
    Normal,
    Dialog(DialogKind),
    /// The command menu built from the toolbar sections.
    Menu,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Tree,
    Editor,
}

/// State for a dialog's text input.
#[derive(Debug, Default)]
pub struct DialogState {
    pub input: String,
    /// Byte offset into `input`.
    pub cursor_position: usize,
}

/// One line of the command menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: String,
    pub depth: usize,
    /// Command id and the scope it was rendered into; `None` for group headers.
    pub command: Option<(&'static str, String)>,
}

#[derive(Debug, Default)]
pub struct MenuState {
    pub entries: Vec<MenuEntry>,
    pub cursor: usize,
}

/// The open file, or the listing of an opened folder.
#[derive(Debug, Default, Clone)]
pub struct EditorPane {
    pub location: Option<String>,
    pub title: String,
    pub lines: Vec<String>,
    pub scroll: usize,
    pub is_listing: bool,
}

/// Main application state.
pub struct App {
    pub explorer: NavExplorer<LocalFileService>,
    pub service: Arc<LocalFileService>,
    pub editor_input: EditorInputManager,
    pub dispatcher: ModelEventDispatcher,
    pub nav_rx: mpsc::UnboundedReceiver<NavEvent>,
    pub clipboard: ClipboardState,
    pub editor: EditorPane,
    pub mode: AppMode,
    pub focus: Focus,
    pub dialog_state: DialogState,
    pub menu: MenuState,
    pub status_message: Option<(String, Instant)>,
    pub should_quit: bool,
    pub watcher_active: bool,
    pub confirm_delete: bool,
    pub use_icons: bool,
    pub theme: ThemeColors,
    /// Last area the tree was drawn into, for mouse hit-testing.
    pub tree_area: Rect,
    navigate: Option<String>,
}

impl App {
    /// Create the app over `workspace`. Nothing is loaded until [`App::start`].
    pub fn new(workspace: &Path, config: &AppConfig, navigate: Option<String>) -> Self {
        let service = Arc::new(LocalFileService::new(workspace).dirs_first(config.dirs_first()));
        let editor_input = EditorInputManager::new();
        let dispatcher = ModelEventDispatcher::new();
        let (nav_tx, nav_rx) = mpsc::unbounded_channel();

        let mut explorer = NavExplorer::new(NavExplorerParams {
            service: service.clone(),
            editor_input: editor_input.clone(),
            dispatcher: dispatcher.clone(),
            toolbar_id: TOOLBAR_ID.to_string(),
            nav_tx,
            renderer: NavRenderer::new(config.show_folder_links()),
            page: PageParams {
                resource: None,
                navigate: navigate.clone(),
            },
        });
        explorer.tree_mut().show_hidden = config.show_hidden();

        Self {
            explorer,
            service,
            editor_input,
            dispatcher,
            nav_rx,
            clipboard: ClipboardState::new(),
            editor: EditorPane::default(),
            mode: AppMode::Normal,
            focus: Focus::Tree,
            dialog_state: DialogState::default(),
            menu: MenuState::default(),
            status_message: None,
            should_quit: false,
            watcher_active: config.watcher_enabled(),
            confirm_delete: config.confirm_delete(),
            use_icons: config.use_icons(),
            theme: resolve_theme(&config.theme),
            tree_area: Rect::default(),
            navigate,
        }
    }

    /// Display the initial root and put the cursor on its first row.
    pub async fn start(&mut self) -> Result<()> {
        let navigate = self.navigate.take();
        self.explorer.display(navigate.as_deref(), false).await?;
        self.explorer.tree_mut().select_first();
        self.explorer.select_cursor();
        Ok(())
    }

    // ---------- dialogs ----------

    pub fn open_dialog(&mut self, kind: DialogKind) {
        self.dialog_state = DialogState::default();
        if let DialogKind::Rename { target } = &kind {
            self.dialog_state.input = target.name.clone();
            self.dialog_state.cursor_position = target.name.len();
        }
        self.mode = AppMode::Dialog(kind);
    }

    pub fn close_dialog(&mut self) {
        self.mode = AppMode::Normal;
        self.dialog_state = DialogState::default();
    }

    pub fn dialog_input_char(&mut self, c: char) {
        let state = &mut self.dialog_state;
        state.input.insert(state.cursor_position, c);
        state.cursor_position += c.len_utf8();
    }

    /// Backspace.
    pub fn dialog_delete_char(&mut self) {
        let state = &mut self.dialog_state;
        if let Some(prev) = state.input[..state.cursor_position].chars().next_back() {
            state.cursor_position -= prev.len_utf8();
            state.input.remove(state.cursor_position);
        }
    }

    pub fn dialog_move_cursor_left(&mut self) {
        let state = &mut self.dialog_state;
        if let Some(prev) = state.input[..state.cursor_position].chars().next_back() {
            state.cursor_position -= prev.len_utf8();
        }
    }

    pub fn dialog_move_cursor_right(&mut self) {
        let state = &mut self.dialog_state;
        if let Some(next) = state.input[state.cursor_position..].chars().next() {
            state.cursor_position += next.len_utf8();
        }
    }

    pub fn dialog_cursor_home(&mut self) {
        self.dialog_state.cursor_position = 0;
    }

    pub fn dialog_cursor_end(&mut self) {
        self.dialog_state.cursor_position = self.dialog_state.input.len();
    }

    /// Carry out the open dialog with its current input.
    pub async fn confirm_dialog(&mut self) -> Result<()> {
        let AppMode::Dialog(kind) = std::mem::take(&mut self.mode) else {
            return Ok(());
        };
        let input = std::mem::take(&mut self.dialog_state.input);
        self.close_dialog();
        let input = input.trim();
        if kind.takes_input() && input.is_empty() {
            return Ok(());
        }

        match kind {
            DialogKind::CreateFile { parent } => {
                let created = self.service.create_file(&parent, input).await?;
                self.after_create(&parent, created).await?;
            }
            DialogKind::CreateFolder { parent } => {
                let created = self.service.create_folder(&parent, input).await?;
                self.after_create(&parent, created).await?;
            }
            DialogKind::CreateProject => {
                let created = self.service.create_project(input).await?;
                let workspace_root = self.service.read("").await?;
                self.after_create(&workspace_root, created).await?;
            }
            DialogKind::Rename { target } => {
                let renamed = self.service.rename(&target, input).await?;
                self.set_status_message(format!("Renamed {} to {}", target.name, renamed.name));
                self.forget_clipboard(&target.location);
                self.dispatcher.moved(target, renamed);
            }
            DialogKind::DeleteConfirm { targets } => self.delete_items(targets).await?,
            DialogKind::CopyTo { items } => {
                let dest = self.resolve_workspace_folder(input).await?;
                self.paste_into(&items, &dest, ClipboardOp::Copy).await?;
            }
            DialogKind::MoveTo { items } => {
                let dest = self.resolve_workspace_folder(input).await?;
                self.paste_into(&items, &dest, ClipboardOp::Cut).await?;
            }
            DialogKind::Import { dest } => {
                let imported = self.service.import_path(Path::new(input), &dest).await?;
                self.set_status_message(format!("Imported {}", imported.name));
                self.explorer.changed_item(&dest.location, true).await?;
            }
            DialogKind::Export { item } => {
                let exported = self.service.export_to(&item, Path::new(input)).await?;
                self.set_status_message(format!("Exported to {}", exported.display()));
            }
            DialogKind::Error { .. } => {}
        }
        Ok(())
    }

    /// Report a failed operation in an error dialog.
    pub fn show_error(&mut self, err: NavError) {
        tracing::warn!(error = %err, "operation failed");
        self.open_dialog(DialogKind::Error {
            message: err.to_string(),
        });
    }

    // ---------- status ----------

    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    /// Clear the status message once it has been displayed for 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, created)) = &self.status_message {
            if created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    // ---------- commands ----------

    /// Build the command menu from what the toolbar sections currently show.
    pub fn open_menu(&mut self) {
        let mut entries = Vec::new();
        for scope in self.explorer.sections().all() {
            let Some(section) = self.explorer.registry().rendered(scope) else {
                continue;
            };
            for command in &section.commands {
                push_menu_entries(command, scope, 0, &mut entries);
            }
        }
        if entries.is_empty() {
            self.set_status_message("No commands available".into());
            return;
        }
        let cursor = entries.iter().position(|e| e.command.is_some()).unwrap_or(0);
        self.menu = MenuState { entries, cursor };
        self.mode = AppMode::Menu;
    }

    pub fn close_menu(&mut self) {
        self.mode = AppMode::Normal;
        self.menu = MenuState::default();
    }

    /// Move the menu cursor by `delta` entries, skipping group headers.
    pub fn menu_move(&mut self, delta: isize) {
        let len = self.menu.entries.len() as isize;
        let mut idx = self.menu.cursor as isize;
        for _ in 0..len {
            idx += delta;
            if idx < 0 || idx >= len {
                return;
            }
            if self.menu.entries[idx as usize].command.is_some() {
                self.menu.cursor = idx as usize;
                return;
            }
        }
    }

    pub async fn run_menu_selection(&mut self) -> Result<()> {
        let command = self
            .menu
            .entries
            .get(self.menu.cursor)
            .and_then(|e| e.command.clone());
        self.close_menu();
        match command {
            Some((id, scope)) => self.run_command(id, &scope).await,
            None => Ok(()),
        }
    }

    /// Run `command_id` contributed to `scope` against the items that scope acts on.
    pub async fn run_command(&mut self, command_id: &str, scope: &str) -> Result<()> {
        let items = self.command_items(command_id, scope);
        let visible = self
            .explorer
            .registry()
            .find_command(command_id)
            .is_some_and(|command| command.is_visible(&items));
        if !visible {
            tracing::debug!(command = command_id, "command not applicable");
            return Ok(());
        }
        tracing::debug!(command = command_id, count = items.len(), "running command");
        self.execute_command(command_id, items).await
    }

    fn command_items(&self, command_id: &str, scope: &str) -> Vec<FileMetadata> {
        let selections = self.explorer.selection().get_selections();
        match command_id {
            COPY_SELECTIONS => selections,
            PASTE_SELECTIONS => match selections.as_slice() {
                [folder] if folder.is_folder() => vec![folder.clone()],
                _ => vec![self.explorer.root().clone()],
            },
            _ if scope == self.explorer.sections().selection_actions => selections,
            _ => match self.explorer.registry().rendered(scope) {
                Some(section) => section.items.clone(),
                None => vec![self.explorer.root().clone()],
            },
        }
    }

    pub async fn execute_command(&mut self, command_id: &str, items: Vec<FileMetadata>) -> Result<()> {
        let first = items.first().cloned();
        match (command_id, first) {
            (COPY_SELECTIONS, _) => {
                let count = items.len();
                self.clipboard.set(items, ClipboardOp::Copy);
                self.set_status_message(format!("Copied {} item(s)", count));
            }
            (PASTE_SELECTIONS, Some(dest)) => {
                let Some(op) = self.clipboard.operation else {
                    self.set_status_message("Clipboard is empty".into());
                    return Ok(());
                };
                let pending = self.clipboard.items.clone();
                self.paste_into(&pending, &dest, op).await?;
                if op == ClipboardOp::Cut {
                    self.clipboard.clear();
                }
            }
            (NEW_FILE, Some(parent)) => self.open_dialog(DialogKind::CreateFile { parent }),
            (NEW_FOLDER, Some(parent)) => self.open_dialog(DialogKind::CreateFolder { parent }),
            (NEW_PROJECT, _) => self.open_dialog(DialogKind::CreateProject),
            (UP_FOLDER, _) => self.explorer.scope_up(),
            (DOWN_FOLDER, Some(folder)) => self.explorer.scope_down(&folder),
            (RENAME, Some(target)) => self.open_dialog(DialogKind::Rename { target }),
            (COPY_FILE, _) => self.open_dialog(DialogKind::CopyTo { items }),
            (MOVE_FILE, _) => self.open_dialog(DialogKind::MoveTo { items }),
            (DELETE_FILE, _) if self.confirm_delete => {
                self.open_dialog(DialogKind::DeleteConfirm { targets: items })
            }
            (DELETE_FILE, _) => self.delete_items(items).await?,
            (IMPORT, Some(dest)) => self.open_dialog(DialogKind::Import { dest }),
            (DOWNLOAD_FILE, Some(item)) => self.open_dialog(DialogKind::Export { item }),
            (other, _) => {
                tracing::info!(command = other, "command has no local handler");
                self.set_status_message(format!("{} is not supported here", other));
            }
        }
        Ok(())
    }

    async fn delete_items(&mut self, targets: Vec<FileMetadata>) -> Result<()> {
        let count = targets.len();
        for target in targets {
            self.service.delete(&target).await?;
            self.forget_clipboard(&target.location);
            self.dispatcher.deleted(target);
        }
        self.set_status_message(format!("Deleted {} item(s)", count));
        Ok(())
    }

    async fn paste_into(&mut self, items: &[FileMetadata], dest: &FileMetadata, op: ClipboardOp) -> Result<()> {
        for item in items {
            match op {
                ClipboardOp::Copy => {
                    self.service.copy_to(item, dest).await?;
                }
                ClipboardOp::Cut => {
                    let moved = self.service.move_to(item, dest).await?;
                    self.dispatcher.moved(item.clone(), moved);
                }
            }
        }
        if op == ClipboardOp::Copy && self.explorer.tree().find_node(&dest.location).is_some() {
            self.explorer.changed_item(&dest.location, true).await?;
        }
        let verb = if op == ClipboardOp::Copy { "Copied" } else { "Moved" };
        self.set_status_message(format!("{} {} item(s) to {}", verb, items.len(), dest.name));
        Ok(())
    }

    async fn after_create(&mut self, parent: &FileMetadata, created: FileMetadata) -> Result<()> {
        self.set_status_message(format!("Created {}", created.name));
        if self.explorer.tree().find_node(&parent.location).is_some() {
            self.explorer.changed_item(&parent.location, true).await?;
        }
        self.explorer.reveal(Some(&created), true).await
    }

    /// Folder named by a workspace-relative path; empty or `/` is the workspace root.
    async fn resolve_workspace_folder(&self, input: &str) -> Result<FileMetadata> {
        let path = self.service.workspace().join(input.trim_start_matches('/'));
        let location = self.service.location_for(&path, true)?;
        let folder = self.service.read(&location).await?;
        if !folder.is_folder() {
            return Err(NavError::InvalidLocation(location));
        }
        Ok(folder)
    }

    fn forget_clipboard(&mut self, location: &str) {
        self.clipboard.forget(location);
    }

    // ---------- tree ----------

    /// Open the item under the cursor: folders are toggled, files opened.
    pub async fn activate_cursor(&mut self) -> Result<()> {
        let Some(item) = self.explorer.tree().cursor_item().cloned() else {
            return Ok(());
        };
        if item.is_folder() {
            if let Some(activation) = self.explorer.activate_folder(&item.location).await? {
                if let Some(location) = activation.follow {
                    self.open_location(&location).await?;
                }
            }
            Ok(())
        } else {
            self.open_location(&item.location).await
        }
    }

    pub async fn expand_cursor(&mut self) -> Result<()> {
        let Some(item) = self.explorer.tree().cursor_item().cloned() else {
            return Ok(());
        };
        if item.is_folder() {
            self.explorer.expand(&item.location).await?;
        }
        Ok(())
    }

    /// Collapse the folder under the cursor, or move to the parent row.
    pub fn collapse_cursor(&mut self) {
        let Some(row) = self.explorer.tree().cursor_row().cloned() else {
            return;
        };
        if row.is_folder && row.is_expanded {
            self.explorer.collapse(&row.location);
        } else {
            self.explorer.tree_mut().cursor_to_parent();
        }
        self.explorer.select_cursor();
    }

    /// Handle a left click at terminal row `y` inside the tree area.
    pub async fn click_tree_row(&mut self, y: u16) -> Result<()> {
        let area = self.tree_area;
        if y <= area.y || y >= area.y + area.height.saturating_sub(1) {
            return Ok(());
        }
        let idx = self.explorer.tree().scroll_offset + (y - area.y - 1) as usize;
        if idx >= self.explorer.tree().rows.len() {
            return Ok(());
        }
        self.focus = Focus::Tree;
        self.explorer.tree_mut().cursor = idx;
        self.explorer.select_cursor();
        self.activate_cursor().await
    }

    /// Reload the current root and every cached folder from disk.
    pub async fn refresh(&mut self) -> Result<()> {
        let expanded: Vec<String> = self
            .explorer
            .tree()
            .expanded_locations()
            .map(str::to_string)
            .collect();
        let root = self.explorer.root().location.clone();
        self.explorer.display(Some(&root), true).await?;
        for location in expanded {
            if self.explorer.tree().find_node(&location).is_some() {
                self.explorer.expand(&location).await?;
            }
        }
        self.set_status_message("Refreshed".into());
        Ok(())
    }

    // ---------- editor ----------

    /// Open a Location as the editor input. Folders show their listing.
    pub async fn open_location(&mut self, location: &str) -> Result<()> {
        let metadata = self.service.read(location).await?;
        let lines: Vec<String> = if metadata.is_folder() {
            let children_location = metadata
                .children_location
                .clone()
                .unwrap_or_else(|| format!("{}{}", metadata.location, CHILDREN_QUERY));
            self.service
                .fetch_children(&children_location)
                .await?
                .into_iter()
                .map(|c| if c.is_folder() { format!("{}/", c.name) } else { c.name })
                .collect()
        } else {
            self.service
                .read_contents(&metadata.location)
                .await?
                .lines()
                .map(str::to_string)
                .collect()
        };
        tracing::debug!(location = %metadata.location, lines = lines.len(), "opened editor input");
        self.editor = EditorPane {
            location: Some(metadata.location.clone()),
            title: metadata.name.clone(),
            lines,
            scroll: 0,
            is_listing: metadata.is_folder(),
        };
        self.editor_input.set_input(Some(metadata));
        Ok(())
    }

    pub fn close_editor(&mut self) {
        self.editor = EditorPane::default();
        self.editor_input.set_input(None);
    }

    pub fn scroll_editor(&mut self, delta: isize) {
        let max = self.editor.lines.len().saturating_sub(1);
        let next = self.editor.scroll as isize + delta;
        self.editor.scroll = next.clamp(0, max as isize) as usize;
    }

    // ---------- notifications ----------

    pub async fn handle_nav_event(&mut self, event: NavEvent) -> Result<()> {
        match event {
            NavEvent::EditorInputMoved {
                new_input: Some(location),
                ..
            } => {
                if let Err(err) = self.open_location(&location).await {
                    tracing::warn!(location = %location, error = %err, "moved input unreadable");
                    self.close_editor();
                }
            }
            NavEvent::EditorInputMoved { new_input: None, .. } => {
                let current = self.editor.location.clone();
                let still_there = match &current {
                    Some(location) => self.service.read(location).await.is_ok(),
                    None => false,
                };
                match current {
                    Some(location) if still_there => self.open_location(&location).await?,
                    _ => {
                        self.close_editor();
                        self.set_status_message("The open file was moved or deleted".into());
                    }
                }
            }
            NavEvent::SelectionChanged(items) => {
                tracing::trace!(count = items.len(), "selection changed");
            }
            NavEvent::Navigate { navigate } => {
                self.explorer.display(Some(&navigate), false).await?;
                self.explorer.tree_mut().select_first();
                self.explorer.select_cursor();
            }
        }
        Ok(())
    }

    /// Bring the cached tree in step with paths the watcher saw change.
    pub async fn handle_fs_change(&mut self, paths: Vec<PathBuf>) -> Result<()> {
        let mut refresh = BTreeSet::new();
        for path in paths {
            if path.exists() {
                if path.is_dir() {
                    refresh.insert(self.service.location_for(&path, true)?);
                }
                if let Some(parent) = path.parent().filter(|p| p.starts_with(self.service.workspace())) {
                    refresh.insert(self.service.location_for(parent, true)?);
                }
                if !path.is_dir() && self.editor.location == Some(self.service.location_for(&path, false)?) {
                    if let Some(location) = self.editor.location.clone() {
                        let scroll = self.editor.scroll;
                        self.open_location(&location).await?;
                        self.editor.scroll = scroll.min(self.editor.lines.len().saturating_sub(1));
                    }
                }
            } else {
                self.vanished(&path)?;
            }
        }
        for location in refresh {
            let cached = self
                .explorer
                .tree()
                .find_node(&location)
                .is_some_and(|node| node.children.is_some());
            if cached {
                self.explorer.changed_item(&location, false).await?;
            }
        }
        Ok(())
    }

    /// A path vanished from disk; report it as a delete.
    fn vanished(&mut self, path: &Path) -> Result<()> {
        let dir_location = self.service.location_for(path, true)?;
        let is_dir = self.explorer.tree().find_node(&dir_location).is_some()
            || self
                .editor_input
                .get_file_metadata()
                .is_some_and(|f| f.parent_chain().iter().any(|p| p.location == dir_location));
        let location = if is_dir {
            dir_location
        } else {
            self.service.location_for(path, false)?
        };
        tracing::debug!(location = %location, "path vanished");
        self.forget_clipboard(&location);
        self.dispatcher.deleted(FileMetadata::from_location(location));
        Ok(())
    }

    /// Workspace-relative display path for a Location.
    pub fn display_path(&self, location: &str) -> String {
        match self.service.path_for(location) {
            Ok(path) => path.display().to_string(),
            Err(_) => location.to_string(),
        }
    }
}

fn push_menu_entries(command: &RenderedCommand, scope: &str, depth: usize, out: &mut Vec<MenuEntry>) {
    match command {
        RenderedCommand::Item {
            command_id,
            name,
            key_label,
            ..
        } => {
            let label = match key_label {
                Some(key) => format!("{}  ({})", name, key),
                None => name.to_string(),
            };
            out.push(MenuEntry {
                label,
                depth,
                command: Some((*command_id, scope.to_string())),
            });
        }
        RenderedCommand::Group {
            title, children, ..
        } => {
            let child_depth = match title {
                Some(title) => {
                    out.push(MenuEntry {
                        label: title.clone(),
                        depth,
                        command: None,
                    });
                    depth + 1
                }
                None => depth,
            };
            for child in children {
                push_menu_entries(child, scope, child_depth, out);
            }
        }
    }
}
