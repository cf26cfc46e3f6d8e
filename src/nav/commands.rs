//! Command registry: command definitions, groups, per-scope contributions,
//! keybindings and the rendered command sections the toolbar draws.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::fs::metadata::FileMetadata;
use crate::nav::selection::Selection;

/// DOM scope every navigator keybinding is attached to.
pub const NAV_DOM_SCOPE: &str = "sidebar";
/// Human-readable scope name shown next to navigator keybindings.
pub const NAV_SCOPE_NAME: &str = "Navigator";

/// A key chord, optionally restricted to a DOM scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
    pub dom_scope: Option<&'static str>,
    pub scope_name: Option<&'static str>,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self {
            code,
            modifiers,
            dom_scope: None,
            scope_name: None,
        }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub fn alt(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::ALT)
    }

    pub fn scoped(mut self, dom_scope: &'static str, scope_name: &'static str) -> Self {
        self.dom_scope = Some(dom_scope);
        self.scope_name = Some(scope_name);
        self
    }

    /// Whether `key` triggers this binding. Shift is ignored for characters
    /// since it is already reflected in the character itself.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        let mut modifiers = key.modifiers;
        let code = match key.code {
            KeyCode::Char(c) => {
                modifiers.remove(KeyModifiers::SHIFT);
                KeyCode::Char(c.to_ascii_lowercase())
            }
            other => other,
        };
        code == self.code && modifiers == self.modifiers
    }

    /// Display label such as `Ctrl+C` or `Alt+Up`.
    pub fn label(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".into());
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            parts.push("Alt".into());
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".into());
        }
        parts.push(match self.code {
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::F(n) => format!("F{}", n),
            KeyCode::Up => "Up".into(),
            KeyCode::Down => "Down".into(),
            KeyCode::Left => "Left".into(),
            KeyCode::Right => "Right".into(),
            KeyCode::Delete => "Delete".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Backspace => "Backspace".into(),
            other => format!("{:?}", other),
        });
        parts.join("+")
    }
}

/// Predicate deciding whether a command applies to its target items.
pub type Visibility = fn(&[FileMetadata]) -> bool;

/// A command definition.
#[derive(Clone)]
pub struct Command {
    pub id: &'static str,
    pub name: &'static str,
    pub tooltip: &'static str,
    visible_when: Visibility,
}

impl Command {
    pub fn new(
        id: &'static str,
        name: &'static str,
        tooltip: &'static str,
        visible_when: Visibility,
    ) -> Self {
        Self {
            id,
            name,
            tooltip,
            visible_when,
        }
    }

    pub fn is_visible(&self, items: &[FileMetadata]) -> bool {
        (self.visible_when)(items)
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

/// A named, positioned container for contributions within a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandGroup {
    pub scope: String,
    pub id: String,
    pub position: u32,
    pub title: Option<String>,
    /// Slash-separated ids of enclosing groups.
    pub parent_path: Option<String>,
    pub image_class: Option<String>,
    pub dropdown: bool,
}

impl CommandGroup {
    fn path(&self) -> String {
        join_path(self.parent_path.as_deref(), &self.id)
    }
}

/// Placement of a command within a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    pub scope: String,
    pub command_id: String,
    pub position: u32,
    pub parent_path: Option<String>,
    /// Contributes only its keybinding; never rendered.
    pub binding_only: bool,
    pub key_binding: Option<KeyBinding>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderType {
    Button,
    Tool,
    Menu,
}

/// A rendered toolbar entry.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedCommand {
    Item {
        command_id: &'static str,
        name: &'static str,
        tooltip: &'static str,
        key_label: Option<String>,
    },
    Group {
        id: String,
        title: Option<String>,
        dropdown: bool,
        children: Vec<RenderedCommand>,
    },
}

impl RenderedCommand {
    /// Depth-first list of the command ids this entry contains.
    pub fn command_ids(&self) -> Vec<&'static str> {
        match self {
            RenderedCommand::Item { command_id, .. } => vec![*command_id],
            RenderedCommand::Group { children, .. } => {
                children.iter().flat_map(|c| c.command_ids()).collect()
            }
        }
    }
}

/// The live contents of one scope's container.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSection {
    pub items: Vec<FileMetadata>,
    pub render_type: RenderType,
    pub commands: Vec<RenderedCommand>,
}

impl RenderedSection {
    pub fn command_ids(&self) -> Vec<&'static str> {
        self.commands.iter().flat_map(|c| c.command_ids()).collect()
    }
}

#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<&'static str, Command>,
    groups: Vec<CommandGroup>,
    contributions: Vec<Contribution>,
    selection_services: HashMap<String, Selection>,
    rendered: HashMap<String, RenderedSection>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: Command) {
        self.commands.insert(command.id, command);
    }

    pub fn find_command(&self, id: &str) -> Option<&Command> {
        self.commands.get(id)
    }

    /// Declare a group. Re-declaring the same group in the same scope replaces it.
    #[allow(clippy::too_many_arguments)]
    pub fn add_command_group(
        &mut self,
        scope: &str,
        id: &str,
        position: u32,
        title: Option<&str>,
        parent_path: Option<&str>,
        image_class: Option<&str>,
        dropdown: bool,
    ) {
        let group = CommandGroup {
            scope: scope.to_string(),
            id: id.to_string(),
            position,
            title: title.map(str::to_string),
            parent_path: parent_path.map(str::to_string),
            image_class: image_class.map(str::to_string),
            dropdown,
        };
        let path = group.path();
        match self
            .groups
            .iter_mut()
            .find(|g| g.scope == scope && g.path() == path)
        {
            Some(existing) => *existing = group,
            None => self.groups.push(group),
        }
    }

    /// Attach `selection` as the source of target items for `scope`.
    pub fn register_selection_service(&mut self, scope: &str, selection: Selection) {
        self.selection_services.insert(scope.to_string(), selection);
    }

    /// Place a command in a scope. Re-contributing a command to the same
    /// scope replaces the earlier placement.
    pub fn register_command_contribution(
        &mut self,
        scope: &str,
        command_id: &str,
        position: u32,
        parent_path: Option<&str>,
        binding_only: bool,
        key_binding: Option<KeyBinding>,
    ) {
        let contribution = Contribution {
            scope: scope.to_string(),
            command_id: command_id.to_string(),
            position,
            parent_path: parent_path.map(str::to_string),
            binding_only,
            key_binding,
        };
        match self
            .contributions
            .iter_mut()
            .find(|c| c.scope == scope && c.command_id == command_id)
        {
            Some(existing) => *existing = contribution,
            None => self.contributions.push(contribution),
        }
    }

    pub fn contributions(&self, scope: &str) -> impl Iterator<Item = &Contribution> {
        let scope = scope.to_string();
        self.contributions.iter().filter(move |c| c.scope == scope)
    }

    pub fn groups(&self, scope: &str) -> impl Iterator<Item = &CommandGroup> {
        let scope = scope.to_string();
        self.groups.iter().filter(move |g| g.scope == scope)
    }

    /// Render the commands contributed to `scope` against `items`, or against
    /// the scope's selection service when `items` is `None`.
    pub fn render_commands(
        &mut self,
        scope: &str,
        items: Option<&[FileMetadata]>,
        render_type: RenderType,
    ) -> &RenderedSection {
        let items: Vec<FileMetadata> = match items {
            Some(items) => items.to_vec(),
            None => self
                .selection_services
                .get(scope)
                .map(Selection::get_selections)
                .unwrap_or_default(),
        };
        let commands = self.render_level(scope, None, &items);
        tracing::debug!(scope, count = commands.len(), ?render_type, "rendered commands");
        self.rendered.insert(
            scope.to_string(),
            RenderedSection {
                items,
                render_type,
                commands,
            },
        );
        &self.rendered[scope]
    }

    fn render_level(
        &self,
        scope: &str,
        path: Option<&str>,
        items: &[FileMetadata],
    ) -> Vec<RenderedCommand> {
        let mut entries: Vec<(u32, RenderedCommand)> = Vec::new();

        for group in self
            .groups(scope)
            .filter(|g| g.parent_path.as_deref().filter(|p| !p.is_empty()) == path)
        {
            let group_path = group.path();
            let children = self.render_level(scope, Some(&group_path), items);
            if children.is_empty() {
                continue;
            }
            entries.push((
                group.position,
                RenderedCommand::Group {
                    id: group.id.clone(),
                    title: group.title.clone(),
                    dropdown: group.dropdown,
                    children,
                },
            ));
        }

        for contribution in self.contributions(scope).filter(|c| {
            !c.binding_only && c.parent_path.as_deref().filter(|p| !p.is_empty()) == path
        }) {
            let Some(command) = self.commands.get(contribution.command_id.as_str()) else {
                continue;
            };
            if !command.is_visible(items) {
                continue;
            }
            entries.push((
                contribution.position,
                RenderedCommand::Item {
                    command_id: command.id,
                    name: command.name,
                    tooltip: command.tooltip,
                    key_label: contribution.key_binding.as_ref().map(KeyBinding::label),
                },
            ));
        }

        entries.sort_by_key(|(position, _)| *position);
        entries.into_iter().map(|(_, entry)| entry).collect()
    }

    pub fn rendered(&self, scope: &str) -> Option<&RenderedSection> {
        self.rendered.get(scope)
    }

    /// Remove everything rendered into `scope`'s container.
    pub fn destroy(&mut self, scope: &str) {
        self.rendered.remove(scope);
    }

    /// Find the command bound to `key` within `dom_scope`.
    ///
    /// Returns the command id together with the scope it was contributed to.
    pub fn find_key_binding(
        &self,
        key: &KeyEvent,
        dom_scope: &str,
    ) -> Option<(&'static str, &str)> {
        self.contributions.iter().find_map(|c| {
            let binding = c.key_binding.as_ref()?;
            if binding.dom_scope.is_some_and(|s| s != dom_scope) || !binding.matches(key) {
                return None;
            }
            let command = self.commands.get(c.command_id.as_str())?;
            Some((command.id, c.scope.as_str()))
        })
    }
}

fn join_path(parent: Option<&str>, id: &str) -> String {
    match parent {
        Some(p) if !p.is_empty() => format!("{}/{}", p, id),
        _ => id.to_string(),
    }
}
