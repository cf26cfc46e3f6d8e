//! The navigator: keeps the cached tree in step with the editor input, the
//! selection and file-model changes, and populates the navigator toolbar.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use crate::error::{NavError, Result};
use crate::fs::metadata::{strip_children_query, FileMetadata, CHILDREN_QUERY};
use crate::fs::service::FileService;
use crate::nav::commands::{CommandRegistry, KeyBinding, RenderType, NAV_DOM_SCOPE, NAV_SCOPE_NAME};
use crate::nav::editor_input::EditorInputManager;
use crate::nav::events::{
    Inbound, ListenerId, ModelChangeEvent, ModelEventDispatcher, NavEvent, DELETE, MOVE,
};
use crate::nav::file_commands::{self, *};
use crate::nav::renderer::{FolderActivation, NavRenderer, Toggle};
use crate::nav::selection::Selection;
use crate::nav::tree::{NavHandler, TreeExplorer, TreeModel};

/// Id of the selection the explorer publishes.
pub const SELECTION_ID: &str = "commonNavFileSelection";

/// Toolbar section a navigator contribution lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    NewActions,
    SelectionActions,
    FolderNav,
}

/// Command group a navigator contribution is nested under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Under {
    Top,
    NewContent,
    Actions,
    ImportExport,
}

impl Under {
    fn path(self) -> Option<String> {
        match self {
            Under::Top => None,
            Under::NewContent => Some(format!("{}/{}", NEW_GROUP, NEW_CONTENT_GROUP)),
            Under::Actions => Some(SELECTION_GROUP.to_string()),
            Under::ImportExport => Some(format!("{}/{}", SELECTION_GROUP, IMPORT_EXPORT_GROUP)),
        }
    }
}

type Chord = Option<(KeyCode, KeyModifiers)>;

const KEY_CTRL_C: Chord = Some((KeyCode::Char('c'), KeyModifiers::CONTROL));
const KEY_CTRL_V: Chord = Some((KeyCode::Char('v'), KeyModifiers::CONTROL));
const KEY_ALT_UP: Chord = Some((KeyCode::Up, KeyModifiers::ALT));
const KEY_ALT_DOWN: Chord = Some((KeyCode::Down, KeyModifiers::ALT));
const KEY_F2: Chord = Some((KeyCode::F(2), KeyModifiers::NONE));
const KEY_DELETE: Chord = Some((KeyCode::Delete, KeyModifiers::NONE));

/// Navigator contributions in registration order:
/// (section, command, position, group, binding only, key).
/// The two binding-only entries are never rendered.
const NAV_CONTRIBUTIONS: &[(Section, &str, u32, Under, bool, Chord)] = &[
    (Section::NewActions, COPY_SELECTIONS, 1, Under::Top, true, KEY_CTRL_C),
    (Section::NewActions, PASTE_SELECTIONS, 1, Under::Top, true, KEY_CTRL_V),
    (Section::NewActions, NEW_FILE, 1, Under::NewContent, false, None),
    (Section::NewActions, NEW_FOLDER, 2, Under::NewContent, false, None),
    (Section::NewActions, NEW_PROJECT, 3, Under::NewContent, false, None),
    (Section::NewActions, NEW_LINK_PROJECT, 4, Under::NewContent, false, None),
    (Section::FolderNav, UP_FOLDER, 1, Under::Top, false, KEY_ALT_UP),
    (Section::SelectionActions, DOWN_FOLDER, 1, Under::Actions, false, KEY_ALT_DOWN),
    (Section::SelectionActions, RENAME, 2, Under::Actions, false, KEY_F2),
    (Section::SelectionActions, COPY_FILE, 3, Under::Actions, false, None),
    (Section::SelectionActions, MOVE_FILE, 4, Under::Actions, false, None),
    (Section::SelectionActions, DELETE_FILE, 5, Under::Actions, false, KEY_DELETE),
    (Section::SelectionActions, COMPARE_WITH_EACH_OTHER, 6, Under::Actions, false, None),
    (Section::SelectionActions, COMPARE_WITH, 7, Under::Actions, false, None),
    (Section::SelectionActions, IMPORT_ZIP_URL, 1, Under::ImportExport, false, None),
    (Section::SelectionActions, IMPORT, 2, Under::ImportExport, false, None),
    (Section::SelectionActions, DOWNLOAD_FILE, 3, Under::ImportExport, false, None),
    (Section::SelectionActions, IMPORT_SFTP, 4, Under::ImportExport, false, None),
    (Section::SelectionActions, EXPORT_SFTP, 5, Under::ImportExport, false, None),
];

/// Navigation parameters of the hosting page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageParams {
    pub resource: Option<String>,
    /// Set while an explicit navigation is pending; suppresses re-rooting.
    pub navigate: Option<String>,
}

/// Everything a [`NavExplorer`] is constructed from.
pub struct NavExplorerParams<S> {
    pub service: Arc<S>,
    pub editor_input: EditorInputManager,
    pub dispatcher: ModelEventDispatcher,
    /// Prefix of the three toolbar section scopes.
    pub toolbar_id: String,
    pub nav_tx: mpsc::UnboundedSender<NavEvent>,
    pub renderer: NavRenderer,
    pub page: PageParams,
}

/// Scope ids of the three toolbar sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSections {
    pub new_actions: String,
    pub selection_actions: String,
    pub folder_nav_actions: String,
}

impl ActionSections {
    fn for_toolbar(toolbar_id: &str) -> Self {
        Self {
            new_actions: format!("{}New", toolbar_id),
            selection_actions: format!("{}Selection", toolbar_id),
            folder_nav_actions: format!("{}Folder", toolbar_id),
        }
    }

    pub fn all(&self) -> [&str; 3] {
        [
            &self.new_actions,
            &self.selection_actions,
            &self.folder_nav_actions,
        ]
    }
}

pub struct NavExplorer<S: FileService> {
    service: Arc<S>,
    handler: NavHandler,
    registry: CommandRegistry,
    editor_input: EditorInputManager,
    dispatcher: ModelEventDispatcher,
    renderer: NavRenderer,
    page: PageParams,
    sections: ActionSections,
    sections_created: bool,
    commands_registered: bool,
    model_listeners: Vec<ListenerId>,
    editor_listener: Option<ListenerId>,
    selection_listener: Option<ListenerId>,
    inbound_rx: mpsc::UnboundedReceiver<Inbound>,
    nav_tx: mpsc::UnboundedSender<NavEvent>,
}

impl<S: FileService> NavExplorer<S> {
    /// Create the explorer, subscribe to its collaborators and register the
    /// navigator commands.
    pub fn new(params: NavExplorerParams<S>) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let selection = Selection::new(SELECTION_ID);

        let model_listeners: Vec<ListenerId> = [MOVE, DELETE]
            .into_iter()
            .map(|event_type| {
                let tx = inbound_tx.clone();
                params
                    .dispatcher
                    .target()
                    .add_event_listener(event_type, move |event: &ModelChangeEvent| {
                        let _ = tx.send(Inbound::ModelChanged(event.clone()));
                    })
            })
            .collect();

        let tx = inbound_tx.clone();
        let editor_listener = params.editor_input.add_event_listener(move |event| {
            let _ = tx.send(Inbound::InputChanged(event.clone()));
        });

        let tx = inbound_tx;
        let selection_listener = selection.add_event_listener(move |event| {
            let _ = tx.send(Inbound::SelectionChanged(event.clone()));
        });

        let mut explorer = Self {
            service: params.service,
            handler: NavHandler::new(selection),
            registry: CommandRegistry::new(),
            editor_input: params.editor_input,
            dispatcher: params.dispatcher,
            renderer: params.renderer,
            page: params.page,
            sections: ActionSections::for_toolbar(&params.toolbar_id),
            sections_created: false,
            commands_registered: false,
            model_listeners,
            editor_listener: Some(editor_listener),
            selection_listener: Some(selection_listener),
            inbound_rx,
            nav_tx: params.nav_tx,
        };
        explorer.register_commands();
        explorer
    }

    /// Unsubscribe from every collaborator and remove the toolbar sections.
    pub fn destroy(&mut self) {
        for id in self.model_listeners.drain(..) {
            self.dispatcher.target().remove_event_listener(id);
        }
        if let Some(id) = self.editor_listener.take() {
            self.editor_input.remove_event_listener(id);
        }
        if let Some(id) = self.selection_listener.take() {
            self.handler.selection().remove_event_listener(id);
        }
        for scope in self.sections.all() {
            self.registry.destroy(scope);
        }
        self.sections_created = false;
        tracing::debug!("navigator destroyed");
    }

    pub fn tree(&self) -> &TreeModel {
        &self.handler.model
    }

    pub fn tree_mut(&mut self) -> &mut TreeModel {
        &mut self.handler.model
    }

    pub fn root(&self) -> &FileMetadata {
        &self.handler.model.root
    }

    pub fn selection(&self) -> &Selection {
        self.handler.selection()
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn sections(&self) -> &ActionSections {
        &self.sections
    }

    pub fn renderer(&self) -> NavRenderer {
        self.renderer
    }

    pub fn page(&self) -> &PageParams {
        &self.page
    }

    /// Load `location` as the root, refresh the toolbar, then reveal the
    /// editor's file.
    pub async fn display(&mut self, location: Option<&str>, force: bool) -> Result<()> {
        self.load_root(location.unwrap_or_default(), force).await?;
        self.update_commands();
        let editor_file = self.editor_input.get_file_metadata();
        self.reveal(editor_file.as_ref(), true).await
    }

    /// Load a Location or ChildrenLocation as the tree root. An empty
    /// location names the workspace root.
    pub async fn load_root(&mut self, location: &str, force: bool) -> Result<()> {
        if !self.commands_registered {
            self.register_commands();
        }
        let location = match strip_children_query(location) {
            "" => self.service.file_service_root_url(""),
            other => other.to_string(),
        };
        if !force && self.root().location == location {
            return Ok(());
        }
        let mut root = self.service.read(&location).await?;
        let children_location = root
            .children_location
            .clone()
            .ok_or_else(|| NavError::InvalidLocation(location.clone()))?;
        root.children = Some(self.service.fetch_children(&children_location).await?);
        self.load(root);
        Ok(())
    }

    /// Bring the cursor and selection to `metadata`. With `expand`, the
    /// ancestors are fetched and expanded first, re-rooting when the item
    /// lies outside the current root.
    pub async fn reveal(&mut self, metadata: Option<&FileMetadata>, expand: bool) -> Result<()> {
        let Some(metadata) = metadata else {
            return Ok(());
        };
        if !expand {
            self.focus(metadata);
            return Ok(());
        }
        if self.file_in_current_tree(metadata) {
            if let Some(stale) = self.out_of_sync(metadata).map(|n| n.location.clone()) {
                tracing::debug!(location = %stale, "cached listing out of sync");
                self.changed_item(&stale, true).await?;
            }
        } else if self.page.navigate.is_none() {
            let root_url = self.service.file_service_root_url(&metadata.location);
            tracing::info!(root = %root_url, target = %metadata.location, "re-rooting to reveal");
            self.load_root(&root_url, false).await?;
        } else {
            return Ok(());
        }
        // A hidden target, or one under a hidden folder, still needs rows.
        let path = std::iter::once(metadata.location.clone())
            .chain(metadata.parent_chain().iter().map(|p| p.location.clone()));
        self.handler.model.force_visible(path);
        if self.expand_to_item(metadata).await? {
            self.focus(metadata);
        }
        Ok(())
    }

    /// Move the cursor and selection without expanding anything.
    fn focus(&mut self, metadata: &FileMetadata) {
        let tree = &self.handler.model;
        let mut item = tree
            .row_item(&metadata.location)
            .cloned()
            .unwrap_or_else(|| metadata.clone());
        if item.location == tree.root.location {
            if let Some(first) = tree.rows.first().and_then(|r| tree.find_node(&r.location)) {
                item = first.clone();
            }
        }
        self.handler.cursor_on(&item);
        self.handler.set_selection(&item);
    }

    /// Expand every ancestor of `item` from the nearest displayed one down.
    ///
    /// Returns `false` when no ancestor is on screen.
    pub async fn expand_to_item(&mut self, item: &FileMetadata) -> Result<bool> {
        if item.location == self.root().location {
            return Ok(true);
        }
        let chain: Vec<String> = std::iter::once(item.location.clone())
            .chain(item.parent_chain().iter().map(|p| p.location.clone()))
            .collect();
        let Some(start) = chain.iter().position(|loc| self.tree().get_row(loc).is_some()) else {
            return Ok(false);
        };
        for location in chain[..=start].iter().rev() {
            self.expand(location).await?;
        }
        Ok(true)
    }

    /// Find the cached node whose children lack the next segment of the
    /// path from the root down to `target`.
    ///
    /// Unexpanded (uncached) levels are not stale; the walk stops there.
    pub fn out_of_sync(&self, target: &FileMetadata) -> Option<&FileMetadata> {
        let root = self.root();
        if target.location == root.location {
            return None;
        }
        let mut path: Vec<&str> = Vec::new();
        if !root.location.is_empty() {
            for parent in target.parent_chain() {
                if parent.location == root.location {
                    break;
                }
                path.push(&parent.location);
            }
        }
        path.reverse();
        path.push(&target.location);

        let mut node = root;
        for location in path {
            let Some(children) = &node.children else {
                break;
            };
            match children.iter().find(|c| c.location == location) {
                Some(child) => node = child,
                None => return Some(node),
            }
        }
        None
    }

    /// Whether `target` lies under the current root.
    pub fn file_in_current_tree(&self, target: &FileMetadata) -> bool {
        let root = self.root();
        if root.location.is_empty() {
            return false;
        }
        if self.service.file_service_root_url(&target.location)
            != self.service.file_service_root_url(&root.location)
        {
            return false;
        }
        if target.location == root.location || root.parents.is_none() {
            return true;
        }
        target
            .parent_chain()
            .iter()
            .any(|p| p.location == root.location)
    }

    /// Request that `children_location` become the root.
    pub fn scope(&mut self, children_location: &str) {
        self.page.navigate = Some(children_location.to_string());
        self.page.resource = None;
        tracing::info!(navigate = children_location, "scope change");
        let _ = self.nav_tx.send(NavEvent::Navigate {
            navigate: children_location.to_string(),
        });
    }

    pub fn scope_up(&mut self) {
        let root = self.root();
        let navigate = match root.parent_chain().first() {
            Some(parent) => parent
                .children_location
                .clone()
                .unwrap_or_else(|| format!("{}{}", parent.location, CHILDREN_QUERY)),
            None => self.service.file_service_root_url(&root.location),
        };
        self.scope(&navigate);
    }

    pub fn scope_down(&mut self, item: &FileMetadata) {
        if let Some(children_location) = item.children_location.clone() {
            self.scope(&children_location);
        }
    }

    /// React to a move or delete in the file model.
    pub async fn on_file_model_change(&mut self, event: &ModelChangeEvent) -> Result<()> {
        if let Some(editor_file) = self.editor_input.get_file_metadata() {
            let old = &event.old_value.location;
            if *old == editor_file.location {
                let new_input = event.new_value.as_ref().and_then(FileMetadata::replacement_input);
                self.emit_input_moved(new_input);
            } else if editor_file.parent_chain().iter().any(|p| p.location == *old) {
                self.emit_input_moved(None);
            }
        }

        let mut folders = Vec::new();
        folders.extend(parent_location(&event.old_value));
        if let Some(new_value) = &event.new_value {
            folders.extend(parent_location(new_value));
        }
        folders.dedup();
        for folder in folders {
            let cached = self
                .tree()
                .find_node(&folder)
                .is_some_and(|node| node.children.is_some());
            if !cached {
                continue;
            }
            if let Err(err) = self.changed_item(&folder, false).await {
                tracing::warn!(folder = %folder, error = %err, "failed to refresh folder");
            }
        }
        Ok(())
    }

    fn emit_input_moved(&self, new_input: Option<String>) {
        let parent = self.root().children_location.clone();
        tracing::info!(?parent, ?new_input, "editor input moved");
        let _ = self.nav_tx.send(NavEvent::EditorInputMoved { parent, new_input });
    }

    /// Create the three toolbar containers; idempotent.
    pub fn create_action_sections(&mut self) {
        if self.sections_created {
            return;
        }
        self.sections_created = true;
        tracing::debug!(sections = ?self.sections.all(), "created action sections");
    }

    pub fn register_commands(&mut self) {
        let ActionSections {
            new_actions,
            selection_actions,
            folder_nav_actions,
        } = self.sections.clone();
        let registry = &mut self.registry;

        registry.add_command_group(
            &new_actions,
            NEW_GROUP,
            1000,
            Some("New"),
            None,
            Some("core-sprite-addcontent"),
            true,
        );
        registry.add_command_group(
            &selection_actions,
            SELECTION_GROUP,
            100,
            Some("Actions"),
            None,
            Some("core-sprite-gear"),
            true,
        );
        registry.register_selection_service(&selection_actions, self.handler.selection().clone());

        for &(section, command_id, position, under, binding_only, chord) in NAV_CONTRIBUTIONS {
            let scope = match section {
                Section::NewActions => &new_actions,
                Section::SelectionActions => &selection_actions,
                Section::FolderNav => &folder_nav_actions,
            };
            let key_binding = chord.map(|(code, modifiers)| {
                KeyBinding::new(code, modifiers).scoped(NAV_DOM_SCOPE, NAV_SCOPE_NAME)
            });
            registry.register_command_contribution(
                scope,
                command_id,
                position,
                under.path().as_deref(),
                binding_only,
                key_binding,
            );
        }

        file_commands::create_file_commands(registry, &new_actions, &selection_actions);
        self.commands_registered = true;
    }

    /// Re-render the toolbar sections against the current root and selection.
    pub fn update_commands(&mut self) {
        self.create_action_sections();
        let root = self.root().clone();
        let sections = &self.sections;
        file_commands::update_nav_tools(
            &mut self.registry,
            &sections.new_actions,
            &sections.selection_actions,
            &root,
        );
        self.registry.destroy(&sections.folder_nav_actions);
        self.registry.render_commands(
            &sections.folder_nav_actions,
            Some(std::slice::from_ref(&root)),
            RenderType::Tool,
        );
    }

    /// Publish the item under the cursor as the selection.
    pub fn select_cursor(&mut self) {
        if let Some(item) = self.handler.cursor().cloned() {
            self.handler.set_selection(&item);
        }
    }

    /// Activate the folder at `location` through the renderer.
    pub async fn activate_folder(&mut self, location: &str) -> Result<Option<FolderActivation>> {
        let Some(folder) = self.tree().find_node(location).cloned() else {
            return Ok(None);
        };
        let renderer = self.renderer;
        let activation = renderer.activate_folder(self, &folder).await?;
        Ok(Some(activation))
    }

    /// Toggle the folder at `location` without following its link.
    pub async fn toggle_folder(&mut self, location: &str) -> Result<Option<Toggle>> {
        let Some(folder) = self.tree().find_node(location).cloned() else {
            return Ok(None);
        };
        let renderer = self.renderer;
        renderer.toggle_folder_expansion_state(self, &folder).await
    }

    /// Wait for the next notification from a collaborator. Returns `None`
    /// once every subscription has been removed.
    pub async fn next_inbound(&mut self) -> Option<Inbound> {
        self.inbound_rx.recv().await
    }

    pub async fn process(&mut self, inbound: Inbound) -> Result<()> {
        match inbound {
            Inbound::ModelChanged(event) => self.on_file_model_change(&event).await,
            Inbound::InputChanged(event) => self.reveal(event.metadata.as_ref(), true).await,
            Inbound::SelectionChanged(event) => {
                self.update_commands();
                let _ = self.nav_tx.send(NavEvent::SelectionChanged(event.selections));
                Ok(())
            }
        }
    }

    /// Process every queued notification, including those raised while processing.
    pub async fn process_pending(&mut self) -> Result<()> {
        while let Ok(inbound) = self.inbound_rx.try_recv() {
            self.process(inbound).await?;
        }
        Ok(())
    }

    fn children_location_of(&self, location: &str) -> Option<String> {
        let node = self.tree().find_node(location)?;
        if !node.is_folder() {
            return None;
        }
        Some(
            node.children_location
                .clone()
                .unwrap_or_else(|| format!("{}{}", node.location, CHILDREN_QUERY)),
        )
    }
}

impl<S: FileService> TreeExplorer for NavExplorer<S> {
    fn nav_handler(&self) -> &NavHandler {
        &self.handler
    }

    fn nav_handler_mut(&mut self) -> &mut NavHandler {
        &mut self.handler
    }

    async fn expand(&mut self, location: &str) -> Result<()> {
        if self.tree().is_expanded(location) {
            return Ok(());
        }
        let Some(children_location) = self.children_location_of(location) else {
            return Ok(());
        };
        let cached = self
            .tree()
            .find_node(location)
            .is_some_and(|node| node.children.is_some());
        if !cached {
            let children = self.service.fetch_children(&children_location).await?;
            self.tree_mut().set_children(location, children);
        }
        self.tree_mut().mark_expanded(location);
        Ok(())
    }

    fn collapse(&mut self, location: &str) {
        self.tree_mut().collapse(location);
    }

    async fn changed_item(&mut self, location: &str, force_expand: bool) -> Result<()> {
        let Some(children_location) = self.children_location_of(location) else {
            return Ok(());
        };
        let children = self.service.fetch_children(&children_location).await?;
        tracing::debug!(location, count = children.len(), "refreshed folder");
        self.tree_mut().set_children(location, children);
        if force_expand {
            self.tree_mut().mark_expanded(location);
        }
        Ok(())
    }

    fn load(&mut self, root: FileMetadata) {
        tracing::info!(root = %root.location, "loaded root");
        self.handler.model.set_root(root);
    }
}

/// Location of the folder containing `item`.
fn parent_location(item: &FileMetadata) -> Option<String> {
    if let Some(parent) = item.parent_chain().first() {
        return Some(parent.location.clone());
    }
    let trimmed = item.location.trim_end_matches('/');
    let idx = trimmed.rfind('/')?;
    Some(trimmed[..=idx].to_string())
}
