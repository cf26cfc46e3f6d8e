use serde::{Deserialize, Serialize};

/// Query suffix that turns a folder Location into its ChildrenLocation.
pub const CHILDREN_QUERY: &str = "?depth=1";

/// Lightweight reference to an ancestor folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParentRef {
    pub name: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_location: Option<String>,
}

/// A node in the file tree as described by the file service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileMetadata {
    pub name: String,
    /// Stable unique identifier.
    pub location: String,
    /// Present for folders: the location their listing is fetched from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_location: Option<String>,
    #[serde(default)]
    pub directory: bool,
    #[serde(default)]
    pub length: u64,
    /// Milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_time_stamp: Option<u64>,
    /// Ancestors, nearest first. `None` marks the workspace root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parents: Option<Vec<ParentRef>>,
    /// Children cached from the last successful fetch, if any.
    #[serde(rename = "Children", default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileMetadata>>,
}

impl FileMetadata {
    /// Bare metadata carrying only a location, e.g. for a path that no longer exists.
    pub fn from_location(location: impl Into<String>) -> Self {
        let location = location.into();
        let name = location
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            name,
            location,
            ..Default::default()
        }
    }

    /// Whether the node can be expanded in the tree.
    pub fn is_folder(&self) -> bool {
        self.directory || self.children_location.is_some()
    }

    /// Hidden files follow the dotfile convention.
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }

    /// Whether `location` is this node's Location or ChildrenLocation.
    pub fn matches(&self, location: &str) -> bool {
        self.location == location || self.children_location.as_deref() == Some(location)
    }

    /// Ancestor chain, nearest first; empty when none is recorded.
    pub fn parent_chain(&self) -> &[ParentRef] {
        self.parents.as_deref().unwrap_or(&[])
    }

    /// Reference to this node suitable for a child's `Parents` list.
    pub fn as_parent(&self) -> ParentRef {
        ParentRef {
            name: self.name.clone(),
            location: self.location.clone(),
            children_location: self.children_location.clone(),
        }
    }

    /// The identifier an editor should switch to when this node replaces
    /// the file it had open: ChildrenLocation, then ContentLocation, then Location.
    pub fn replacement_input(&self) -> Option<String> {
        self.children_location
            .clone()
            .or_else(|| self.content_location.clone())
            .or_else(|| (!self.location.is_empty()).then(|| self.location.clone()))
    }

    /// Find a cached child by Location.
    pub fn cached_child(&self, location: &str) -> Option<&FileMetadata> {
        self.children
            .as_ref()
            .and_then(|children| children.iter().find(|c| c.location == location))
    }
}

/// Strip a ChildrenLocation query, leaving the folder Location.
pub fn strip_children_query(location: &str) -> &str {
    match location.find('?') {
        Some(idx) => &location[..idx],
        None => location,
    }
}
