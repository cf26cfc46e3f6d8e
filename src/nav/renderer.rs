use crate::error::Result;
use crate::fs::metadata::FileMetadata;
use crate::nav::tree::TreeExplorer;

/// Style class of folder links.
pub const FOLDER_LINK_CLASS: &str = "commonNavFolder";
/// Style class of folders that only toggle.
pub const FAKE_LINK_CLASS: &str = "nav_fakelink";

/// Display node for a folder row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderNode {
    pub label: String,
    /// `#` followed by the folder Location; absent for fake links.
    pub href: Option<String>,
    pub class: &'static str,
}

impl FolderNode {
    pub fn is_link(&self) -> bool {
        self.href.is_some()
    }
}

/// Outcome of toggling a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Expanded,
    Collapsed,
}

/// What activating a folder node did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderActivation {
    pub toggled: Option<Toggle>,
    /// Location to open as editor input when the node is a link.
    pub follow: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavRenderer {
    pub show_folder_links: bool,
}

impl Default for NavRenderer {
    fn default() -> Self {
        Self {
            show_folder_links: true,
        }
    }
}

impl NavRenderer {
    pub fn new(show_folder_links: bool) -> Self {
        Self { show_folder_links }
    }

    pub fn create_folder_node(&self, folder: &FileMetadata) -> FolderNode {
        if self.show_folder_links {
            FolderNode {
                label: folder.name.clone(),
                href: Some(format!("#{}", folder.location)),
                class: FOLDER_LINK_CLASS,
            }
        } else {
            FolderNode {
                label: folder.name.clone(),
                href: None,
                class: FAKE_LINK_CLASS,
            }
        }
    }

    /// Put the cursor and selection on `folder`, then expand or collapse the
    /// item under the cursor depending on its current state.
    pub async fn toggle_folder_expansion_state<E: TreeExplorer>(
        &self,
        explorer: &mut E,
        folder: &FileMetadata,
    ) -> Result<Option<Toggle>> {
        let handler = explorer.nav_handler_mut();
        handler.cursor_on(folder);
        handler.set_selection(folder);
        let Some(current) = handler.cursor().cloned() else {
            return Ok(None);
        };
        if !handler.is_expandable(&current) {
            return Ok(None);
        }
        if handler.is_expanded(&current) {
            explorer.collapse(&current.location);
            Ok(Some(Toggle::Collapsed))
        } else {
            explorer.expand(&current.location).await?;
            Ok(Some(Toggle::Expanded))
        }
    }

    /// Activate a folder node: toggle it, and follow the link when folder
    /// links are enabled.
    pub async fn activate_folder<E: TreeExplorer>(
        &self,
        explorer: &mut E,
        folder: &FileMetadata,
    ) -> Result<FolderActivation> {
        let node = self.create_folder_node(folder);
        let toggled = self.toggle_folder_expansion_state(explorer, folder).await?;
        Ok(FolderActivation {
            toggled,
            follow: node.is_link().then(|| folder.location.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::selection::Selection;
    use crate::nav::tree::NavHandler;

    struct FakeExplorer {
        handler: NavHandler,
        expanded: Vec<String>,
    }

    impl TreeExplorer for FakeExplorer {
        fn nav_handler(&self) -> &NavHandler {
            &self.handler
        }

        fn nav_handler_mut(&mut self) -> &mut NavHandler {
            &mut self.handler
        }

        async fn expand(&mut self, location: &str) -> Result<()> {
            self.expanded.push(location.to_string());
            self.handler.model.mark_expanded(location);
            Ok(())
        }

        fn collapse(&mut self, location: &str) {
            self.handler.model.collapse(location);
        }

        async fn changed_item(&mut self, _location: &str, _force_expand: bool) -> Result<()> {
            Ok(())
        }

        fn load(&mut self, root: FileMetadata) {
            self.handler.model.set_root(root);
        }
    }

    fn folder(location: &str) -> FileMetadata {
        FileMetadata {
            directory: true,
            children_location: Some(format!("{}?depth=1", location)),
            ..FileMetadata::from_location(location)
        }
    }

    fn fake() -> FakeExplorer {
        let mut explorer = FakeExplorer {
            handler: NavHandler::new(Selection::new("test")),
            expanded: Vec::new(),
        };
        let mut child = folder("/file/a/");
        child.children = Some(vec![FileMetadata::from_location("/file/a/x")]);
        let mut root = folder("/file/");
        root.children = Some(vec![FileMetadata::from_location("/file/top"), child]);
        explorer.load(root);
        explorer
    }

    #[test]
    fn folder_links_point_at_location() {
        let node = NavRenderer::new(true).create_folder_node(&folder("/file/a/"));
        assert_eq!(node.href.as_deref(), Some("#/file/a/"));
        assert_eq!(node.class, FOLDER_LINK_CLASS);
        assert_eq!(node.label, "a");
    }

    #[test]
    fn disabled_links_use_fake_link_style() {
        let node = NavRenderer::new(false).create_folder_node(&folder("/file/a/"));
        assert!(!node.is_link());
        assert_eq!(node.class, FAKE_LINK_CLASS);
    }

    #[tokio::test]
    async fn toggle_moves_cursor_then_expands_and_collapses() {
        let mut explorer = fake();
        let renderer = NavRenderer::default();
        let target = folder("/file/a/");

        let first = renderer
            .toggle_folder_expansion_state(&mut explorer, &target)
            .await
            .unwrap();
        assert_eq!(first, Some(Toggle::Expanded));
        assert_eq!(explorer.expanded, vec!["/file/a/".to_string()]);
        assert_eq!(explorer.handler.model.cursor, 1);
        assert_eq!(
            explorer.handler.selection().get_selection().map(|s| s.location),
            Some("/file/a/".to_string())
        );

        let second = renderer
            .toggle_folder_expansion_state(&mut explorer, &target)
            .await
            .unwrap();
        assert_eq!(second, Some(Toggle::Collapsed));
        assert!(!explorer.handler.is_expanded(&target));
    }

    #[tokio::test]
    async fn activation_follows_only_links() {
        let mut explorer = fake();
        let target = folder("/file/a/");
        let linked = NavRenderer::new(true)
            .activate_folder(&mut explorer, &target)
            .await
            .unwrap();
        assert_eq!(linked.follow.as_deref(), Some("/file/a/"));

        let plain = NavRenderer::new(false)
            .activate_folder(&mut explorer, &target)
            .await
            .unwrap();
        assert_eq!(plain.follow, None);
        assert_eq!(plain.toggled, Some(Toggle::Collapsed));
    }
}
