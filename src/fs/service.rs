//! Collaborator interfaces the navigator is written against.
//!
//! The explorer itself only needs [`FileService`]. Hosts that execute file
//! commands additionally need [`FileOperations`].

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fs::metadata::FileMetadata;

/// Read side of a file service.
#[allow(async_fn_in_trait)]
pub trait FileService {
    /// Fetch metadata (including `Parents`) for a Location or ChildrenLocation.
    /// An empty location names the workspace root.
    async fn read(&self, location: &str) -> Result<FileMetadata>;

    /// Fetch the listing of a folder by its ChildrenLocation.
    async fn fetch_children(&self, children_location: &str) -> Result<Vec<FileMetadata>>;

    /// The root URL of the file system that owns `location`.
    fn file_service_root_url(&self, location: &str) -> String;
}

/// Write side of a file service, used by file commands.
#[allow(async_fn_in_trait)]
pub trait FileOperations {
    async fn create_file(&self, parent: &FileMetadata, name: &str) -> Result<FileMetadata>;

    async fn create_folder(&self, parent: &FileMetadata, name: &str) -> Result<FileMetadata>;

    /// Create a top-level folder directly under the workspace root.
    async fn create_project(&self, name: &str) -> Result<FileMetadata>;

    async fn rename(&self, item: &FileMetadata, new_name: &str) -> Result<FileMetadata>;

    async fn copy_to(&self, item: &FileMetadata, dest_folder: &FileMetadata) -> Result<FileMetadata>;

    async fn move_to(&self, item: &FileMetadata, dest_folder: &FileMetadata) -> Result<FileMetadata>;

    async fn delete(&self, item: &FileMetadata) -> Result<()>;

    /// Read a file's text contents.
    async fn read_contents(&self, location: &str) -> Result<String>;

    /// Copy a path from outside the workspace into `dest_folder`.
    async fn import_path(&self, source: &Path, dest_folder: &FileMetadata) -> Result<FileMetadata>;

    /// Copy an item out of the workspace into a local directory.
    async fn export_to(&self, item: &FileMetadata, dest_dir: &Path) -> Result<PathBuf>;
}
