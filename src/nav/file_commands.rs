//! The navigator's file commands and their placement helpers.

use crate::fs::metadata::FileMetadata;
use crate::nav::commands::{Command, CommandRegistry, RenderType};

pub const COPY_SELECTIONS: &str = "eclipse.copySelections";
pub const PASTE_SELECTIONS: &str = "eclipse.pasteSelections";
pub const NEW_FILE: &str = "eclipse.newFile";
pub const NEW_FOLDER: &str = "eclipse.newFolder";
pub const NEW_PROJECT: &str = "orion.new.project";
pub const NEW_LINK_PROJECT: &str = "orion.new.linkProject";
pub const UP_FOLDER: &str = "eclipse.upFolder";
pub const DOWN_FOLDER: &str = "eclipse.downFolder";
pub const RENAME: &str = "eclipse.renameResource";
pub const COPY_FILE: &str = "eclipse.copyFile";
pub const MOVE_FILE: &str = "eclipse.moveFile";
pub const DELETE_FILE: &str = "eclipse.deleteFile";
pub const COMPARE_WITH_EACH_OTHER: &str = "eclipse.compareWithEachOther";
pub const COMPARE_WITH: &str = "eclipse.compareWith";
pub const IMPORT_ZIP_URL: &str = "orion.importZipURL";
pub const IMPORT: &str = "orion.import";
pub const DOWNLOAD_FILE: &str = "eclipse.downloadFile";
pub const IMPORT_SFTP: &str = "orion.importSFTP";
pub const EXPORT_SFTP: &str = "eclipse.exportSFTPCommand";

pub const NEW_GROUP: &str = "orion.commonNavNewGroup";
pub const NEW_CONTENT_GROUP: &str = "orion.newContentGroup";
pub const SELECTION_GROUP: &str = "orion.commonNavSelectionGroup";
pub const IMPORT_EXPORT_GROUP: &str = "orion.importExportGroup";

fn single_folder(items: &[FileMetadata]) -> bool {
    matches!(items, [item] if item.is_folder())
}

fn workspace_root(items: &[FileMetadata]) -> bool {
    matches!(items, [item] if item.parents.is_none())
}

/// Non-empty, and never the workspace root itself.
fn resources(items: &[FileMetadata]) -> bool {
    !items.is_empty() && items.iter().all(|item| item.parents.is_some())
}

fn single_resource(items: &[FileMetadata]) -> bool {
    items.len() == 1 && resources(items)
}

fn any(items: &[FileMetadata]) -> bool {
    !items.is_empty()
}

fn has_parent(items: &[FileMetadata]) -> bool {
    matches!(items, [item] if item.parents.is_some())
}

/// Define the file commands and the sub-groups their contributions live in.
pub fn create_file_commands(registry: &mut CommandRegistry, new_scope: &str, selection_scope: &str) {
    let commands = [
        Command::new(COPY_SELECTIONS, "Copy", "Copy the selected items", any),
        Command::new(PASTE_SELECTIONS, "Paste", "Paste copied items", single_folder),
        Command::new(NEW_FILE, "File", "Create a new file", single_folder),
        Command::new(NEW_FOLDER, "Folder", "Create a new folder", single_folder),
        Command::new(NEW_PROJECT, "Project", "Create a new top-level folder", workspace_root),
        Command::new(UP_FOLDER, "Up", "Go up to the parent folder", has_parent),
        Command::new(DOWN_FOLDER, "Down", "Show the folder as the root", single_folder),
        Command::new(RENAME, "Rename", "Rename the selected item", single_resource),
        Command::new(COPY_FILE, "Copy to", "Copy the selected items to a folder", resources),
        Command::new(MOVE_FILE, "Move to", "Move the selected items to a folder", resources),
        Command::new(DELETE_FILE, "Delete", "Delete the selected items", resources),
        Command::new(IMPORT, "Import local path", "Copy a local path into the folder", single_folder),
        Command::new(DOWNLOAD_FILE, "Export", "Copy the item to a local directory", single_resource),
    ];
    for command in commands {
        registry.add_command(command);
    }
    registry.add_command_group(new_scope, NEW_CONTENT_GROUP, 0, None, Some(NEW_GROUP), None, false);
    registry.add_command_group(
        selection_scope,
        IMPORT_EXPORT_GROUP,
        100,
        Some("Import/Export"),
        Some(SELECTION_GROUP),
        None,
        true,
    );
}

/// Re-render the new-actions section against `root` and the selection
/// section against the current selection.
pub fn update_nav_tools(
    registry: &mut CommandRegistry,
    new_scope: &str,
    selection_scope: &str,
    root: &FileMetadata,
) {
    registry.destroy(new_scope);
    registry.render_commands(new_scope, Some(std::slice::from_ref(root)), RenderType::Button);
    registry.destroy(selection_scope);
    registry.render_commands(selection_scope, None, RenderType::Button);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::metadata::ParentRef;

    fn folder(location: &str, parents: Option<Vec<ParentRef>>) -> FileMetadata {
        FileMetadata {
            directory: true,
            children_location: Some(format!("{}?depth=1", location)),
            parents,
            ..FileMetadata::from_location(location)
        }
    }

    #[test]
    fn workspace_root_gets_project_but_not_rename() {
        let root = folder("/file/", None);
        assert!(workspace_root(std::slice::from_ref(&root)));
        assert!(!single_resource(std::slice::from_ref(&root)));
        assert!(!has_parent(std::slice::from_ref(&root)));
    }

    #[test]
    fn files_cannot_receive_new_content() {
        let file = FileMetadata {
            parents: Some(Vec::new()),
            ..FileMetadata::from_location("/file/a.txt")
        };
        assert!(!single_folder(std::slice::from_ref(&file)));
        assert!(resources(std::slice::from_ref(&file)));
    }

    #[test]
    fn update_nav_tools_renders_both_sections() {
        let mut registry = CommandRegistry::new();
        registry.add_command_group("new", NEW_GROUP, 1000, Some("New"), None, None, true);
        create_file_commands(&mut registry, "new", "sel");
        registry.register_command_contribution(
            "new",
            NEW_FILE,
            1,
            Some("orion.commonNavNewGroup/orion.newContentGroup"),
            false,
            None,
        );
        let root = folder("/file/", None);
        update_nav_tools(&mut registry, "new", "sel", &root);
        assert_eq!(registry.rendered("new").unwrap().command_ids(), vec![NEW_FILE]);
        assert!(registry.rendered("sel").unwrap().commands.is_empty());
    }
}
