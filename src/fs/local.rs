//! A [`FileService`] over a local workspace directory.
//!
//! Locations live under [`ROOT_URL`]: folders end in `/` and carry a
//! ChildrenLocation of `<Location>?depth=1`, files carry a ContentLocation
//! equal to their Location. Path segments are percent-encoded, so a raw `?`
//! in a Location always starts the query.

use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;

use tokio::fs;

use crate::error::{NavError, Result};
use crate::fs::metadata::{strip_children_query, FileMetadata, ParentRef, CHILDREN_QUERY};
use crate::fs::operations::{self, Transfer};
use crate::fs::service::{FileOperations, FileService};

/// Root URL of the local file system.
pub const ROOT_URL: &str = "/file/";

/// File service backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct LocalFileService {
    workspace: PathBuf,
    dirs_first: bool,
}

impl LocalFileService {
    pub fn new(workspace: &Path) -> Self {
        Self {
            workspace: workspace.to_path_buf(),
            dirs_first: true,
        }
    }

    /// List directories before files in fetched listings.
    pub fn dirs_first(mut self, dirs_first: bool) -> Self {
        self.dirs_first = dirs_first;
        self
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Map a Location (or ChildrenLocation) to a path inside the workspace.
    pub fn path_for(&self, location: &str) -> Result<PathBuf> {
        let location = strip_children_query(location);
        if location.is_empty() {
            return Ok(self.workspace.clone());
        }
        let rel = location
            .strip_prefix(ROOT_URL)
            .or_else(|| (location == ROOT_URL.trim_end_matches('/')).then_some(""))
            .ok_or_else(|| NavError::InvalidLocation(location.to_string()))?;

        let invalid = || NavError::InvalidLocation(location.to_string());
        let mut path = self.workspace.clone();
        for segment in rel.split('/').filter(|s| !s.is_empty()) {
            let name = urlencoding::decode(segment).map_err(|_| invalid())?;
            if name == "." || name == ".." || name.contains('/') {
                return Err(invalid());
            }
            path.push(name.as_ref());
        }
        Ok(path)
    }

    /// Map a path inside the workspace to its Location.
    pub fn location_for(&self, path: &Path, is_dir: bool) -> Result<String> {
        let rel = path
            .strip_prefix(&self.workspace)
            .map_err(|_| NavError::InvalidPath(path.display().to_string()))?;
        let mut location = ROOT_URL.to_string();
        let segments: Vec<String> = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => {
                    Some(urlencoding::encode(&name.to_string_lossy()).into_owned())
                }
                _ => None,
            })
            .collect();
        location.push_str(&segments.join("/"));
        if is_dir && !segments.is_empty() {
            location.push('/');
        }
        Ok(location)
    }

    /// Build metadata for an existing path, including its `Parents`.
    async fn metadata_for(&self, path: &Path) -> Result<FileMetadata> {
        let mut meta = self.entry_metadata(path).await?;
        if path == self.workspace {
            meta.parents = None;
            return Ok(meta);
        }

        let mut parents = Vec::new();
        let mut current = path.parent();
        while let Some(dir) = current {
            if dir == self.workspace || !dir.starts_with(&self.workspace) {
                break;
            }
            let location = self.location_for(dir, true)?;
            parents.push(ParentRef {
                name: file_name(dir),
                children_location: Some(format!("{}{}", location, CHILDREN_QUERY)),
                location,
            });
            current = dir.parent();
        }
        meta.parents = Some(parents);
        Ok(meta)
    }

    /// Metadata for a single entry, without `Parents`.
    async fn entry_metadata(&self, path: &Path) -> Result<FileMetadata> {
        let stat = fs::metadata(path).await.map_err(|e| not_found_or(e, path))?;
        let is_dir = stat.is_dir();
        let location = self.location_for(path, is_dir)?;
        let name = if path == self.workspace {
            file_name(&self.workspace)
        } else {
            file_name(path)
        };
        let local_time_stamp = stat
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as u64);

        Ok(FileMetadata {
            name,
            children_location: is_dir.then(|| format!("{}{}", location, CHILDREN_QUERY)),
            content_location: (!is_dir).then(|| location.clone()),
            location,
            directory: is_dir,
            length: if is_dir { 0 } else { stat.len() },
            local_time_stamp,
            parents: None,
            children: None,
        })
    }

    fn sort_listing(&self, children: &mut [FileMetadata]) {
        let dirs_first = self.dirs_first;
        children.sort_by(|a, b| {
            let mut cmp = std::cmp::Ordering::Equal;
            if dirs_first {
                cmp = b.directory.cmp(&a.directory);
            }
            cmp.then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
    }

    fn folder_path(&self, folder: &FileMetadata) -> Result<PathBuf> {
        if !folder.is_folder() {
            return Err(NavError::InvalidLocation(folder.location.clone()));
        }
        self.path_for(&folder.location)
    }
}

impl FileService for LocalFileService {
    async fn read(&self, location: &str) -> Result<FileMetadata> {
        let path = self.path_for(location)?;
        self.metadata_for(&path).await
    }

    async fn fetch_children(&self, children_location: &str) -> Result<Vec<FileMetadata>> {
        let dir = self.path_for(children_location)?;
        let parent = self.metadata_for(&dir).await?;
        let mut chain = vec![parent.as_parent()];
        if dir == self.workspace {
            chain.clear();
        } else {
            chain.extend(parent.parent_chain().iter().cloned());
        }

        let mut entries = fs::read_dir(&dir).await.map_err(|e| not_found_or(e, &dir))?;
        let mut children = Vec::new();
        // Unreadable entries and broken symlinks are skipped.
        while let Some(entry) = entries.next_entry().await? {
            match self.entry_metadata(&entry.path()).await {
                Ok(mut child) => {
                    child.parents = Some(chain.clone());
                    children.push(child);
                }
                Err(e) => tracing::debug!(path = %entry.path().display(), error = %e, "skipping entry"),
            }
        }
        self.sort_listing(&mut children);
        tracing::debug!(location = children_location, count = children.len(), "fetched children");
        Ok(children)
    }

    fn file_service_root_url(&self, _location: &str) -> String {
        ROOT_URL.to_string()
    }
}

impl FileOperations for LocalFileService {
    async fn create_file(&self, parent: &FileMetadata, name: &str) -> Result<FileMetadata> {
        let path = self.folder_path(parent)?.join(validate_name(name)?);
        let target = path.clone();
        blocking(move || operations::create_file(&target)).await?;
        self.metadata_for(&path).await
    }

    async fn create_folder(&self, parent: &FileMetadata, name: &str) -> Result<FileMetadata> {
        let path = self.folder_path(parent)?.join(validate_name(name)?);
        let target = path.clone();
        blocking(move || operations::create_dir(&target)).await?;
        self.metadata_for(&path).await
    }

    async fn create_project(&self, name: &str) -> Result<FileMetadata> {
        let path = self.workspace.join(validate_name(name)?);
        let target = path.clone();
        blocking(move || operations::create_dir(&target)).await?;
        self.metadata_for(&path).await
    }

    async fn rename(&self, item: &FileMetadata, new_name: &str) -> Result<FileMetadata> {
        let from = self.path_for(&item.location)?;
        if from == self.workspace {
            return Err(NavError::InvalidLocation(item.location.clone()));
        }
        let to = from
            .parent()
            .ok_or_else(|| NavError::InvalidPath(from.display().to_string()))?
            .join(validate_name(new_name)?);
        let (src, dest) = (from.clone(), to.clone());
        blocking(move || operations::rename(&src, &dest)).await?;
        self.metadata_for(&to).await
    }

    async fn copy_to(&self, item: &FileMetadata, dest_folder: &FileMetadata) -> Result<FileMetadata> {
        let src = self.path_for(&item.location)?;
        let dest_dir = self.folder_path(dest_folder)?;
        let copied = blocking(move || operations::transfer(&src, &dest_dir, Transfer::Copy)).await?;
        self.metadata_for(&copied).await
    }

    async fn move_to(&self, item: &FileMetadata, dest_folder: &FileMetadata) -> Result<FileMetadata> {
        let src = self.path_for(&item.location)?;
        if src == self.workspace {
            return Err(NavError::InvalidLocation(item.location.clone()));
        }
        let dest_dir = self.folder_path(dest_folder)?;
        let moved = blocking(move || operations::transfer(&src, &dest_dir, Transfer::Move)).await?;
        self.metadata_for(&moved).await
    }

    async fn delete(&self, item: &FileMetadata) -> Result<()> {
        let path = self.path_for(&item.location)?;
        if path == self.workspace {
            return Err(NavError::InvalidLocation(item.location.clone()));
        }
        blocking(move || operations::delete(&path)).await
    }

    async fn read_contents(&self, location: &str) -> Result<String> {
        let path = self.path_for(location)?;
        let bytes = fs::read(&path).await.map_err(|e| not_found_or(e, &path))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn import_path(&self, source: &Path, dest_folder: &FileMetadata) -> Result<FileMetadata> {
        let dest_dir = self.folder_path(dest_folder)?;
        let src = source.to_path_buf();
        let imported = blocking(move || operations::transfer(&src, &dest_dir, Transfer::Copy)).await?;
        self.metadata_for(&imported).await
    }

    async fn export_to(&self, item: &FileMetadata, dest_dir: &Path) -> Result<PathBuf> {
        let src = self.path_for(&item.location)?;
        let dest = dest_dir.to_path_buf();
        blocking(move || operations::transfer(&src, &dest, Transfer::Copy)).await
    }
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| NavError::Io(std::io::Error::other(e)))?
}

fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return Err(NavError::InvalidPath(name.to_string()));
    }
    Ok(name)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

fn not_found_or(err: std::io::Error, path: &Path) -> NavError {
    if err.kind() == std::io::ErrorKind::NotFound {
        NavError::NotFound(path.display().to_string())
    } else {
        NavError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self as stdfs, File};
    use tempfile::TempDir;

    fn setup() -> (TempDir, LocalFileService) {
        let dir = TempDir::new().unwrap();
        stdfs::create_dir_all(dir.path().join("proj").join("src")).unwrap();
        stdfs::create_dir(dir.path().join("beta")).unwrap();
        File::create(dir.path().join("proj").join("src").join("main.rs")).unwrap();
        File::create(dir.path().join("readme.md")).unwrap();
        let service = LocalFileService::new(dir.path());
        (dir, service)
    }

    #[test]
    fn locations_round_trip_through_paths() {
        let (dir, service) = setup();
        let src = dir.path().join("proj").join("src");
        let loc = service.location_for(&src, true).unwrap();
        assert_eq!(loc, "/file/proj/src/");
        assert_eq!(service.path_for(&loc).unwrap(), src);
        assert_eq!(service.path_for("/file/proj/src/?depth=1").unwrap(), src);
        assert_eq!(service.path_for("").unwrap(), dir.path());
    }

    #[test]
    fn path_for_rejects_escapes() {
        let (_dir, service) = setup();
        assert!(matches!(
            service.path_for("/file/../etc/passwd"),
            Err(NavError::InvalidLocation(_))
        ));
        assert!(matches!(
            service.path_for("/other/x"),
            Err(NavError::InvalidLocation(_))
        ));
    }

    #[tokio::test]
    async fn names_with_query_characters_are_encoded() {
        let (dir, service) = setup();
        File::create(dir.path().join("what?.txt")).unwrap();
        stdfs::create_dir(dir.path().join("q?x")).unwrap();
        File::create(dir.path().join("q?x").join("in #1.txt")).unwrap();

        let file = service.read("/file/what%3F.txt").await.unwrap();
        assert_eq!(file.name, "what?.txt");

        let children = service.fetch_children("/file/?depth=1").await.unwrap();
        let folder = children.iter().find(|c| c.name == "q?x").unwrap();
        assert_eq!(folder.location, "/file/q%3Fx/");
        assert_eq!(folder.children_location.as_deref(), Some("/file/q%3Fx/?depth=1"));

        let inner = service
            .fetch_children(folder.children_location.as_deref().unwrap())
            .await
            .unwrap();
        assert_eq!(inner.len(), 1);
        assert_eq!(inner[0].name, "in #1.txt");
        assert_eq!(inner[0].location, "/file/q%3Fx/in%20%231.txt");
        assert_eq!(
            service.path_for(&inner[0].location).unwrap(),
            dir.path().join("q?x").join("in #1.txt")
        );
    }

    #[test]
    fn encoded_separators_cannot_escape() {
        let (_dir, service) = setup();
        assert!(matches!(
            service.path_for("/file/%2E%2E/etc"),
            Err(NavError::InvalidLocation(_))
        ));
        assert!(matches!(
            service.path_for("/file/a%2Fb"),
            Err(NavError::InvalidLocation(_))
        ));
    }

    #[tokio::test]
    async fn read_builds_parent_chain_nearest_first() {
        let (_dir, service) = setup();
        let meta = service.read("/file/proj/src/main.rs").await.unwrap();
        assert!(!meta.directory);
        assert_eq!(meta.content_location.as_deref(), Some("/file/proj/src/main.rs"));
        let parents: Vec<&str> = meta.parent_chain().iter().map(|p| p.location.as_str()).collect();
        assert_eq!(parents, vec!["/file/proj/src/", "/file/proj/"]);
    }

    #[tokio::test]
    async fn workspace_root_has_no_parents() {
        let (_dir, service) = setup();
        let root = service.read(ROOT_URL).await.unwrap();
        assert!(root.parents.is_none());
        assert_eq!(root.children_location.as_deref(), Some("/file/?depth=1"));

        let project = service.read("/file/proj/").await.unwrap();
        assert_eq!(project.parents, Some(Vec::new()));
    }

    #[tokio::test]
    async fn fetch_children_sorts_dirs_first() {
        let (_dir, service) = setup();
        let children = service.fetch_children("/file/?depth=1").await.unwrap();
        let names: Vec<&str> = children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["beta", "proj", "readme.md"]);
        assert!(children.iter().all(|c| c.parents == Some(Vec::new())));
    }

    #[tokio::test]
    async fn fetch_children_carries_parent_chain() {
        let (_dir, service) = setup();
        let children = service.fetch_children("/file/proj/src/?depth=1").await.unwrap();
        assert_eq!(children.len(), 1);
        let parents: Vec<&str> = children[0]
            .parent_chain()
            .iter()
            .map(|p| p.location.as_str())
            .collect();
        assert_eq!(parents, vec!["/file/proj/src/", "/file/proj/"]);
    }

    #[tokio::test]
    async fn read_missing_is_not_found() {
        let (_dir, service) = setup();
        assert!(matches!(
            service.read("/file/nope.txt").await,
            Err(NavError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn rename_returns_new_metadata() {
        let (dir, service) = setup();
        let item = service.read("/file/readme.md").await.unwrap();
        let renamed = service.rename(&item, "README.md").await.unwrap();
        assert_eq!(renamed.location, "/file/README.md");
        assert!(dir.path().join("README.md").exists());
    }

    #[tokio::test]
    async fn create_and_delete_file() {
        let (dir, service) = setup();
        let beta = service.read("/file/beta/").await.unwrap();
        let created = service.create_file(&beta, "notes.txt").await.unwrap();
        assert_eq!(created.location, "/file/beta/notes.txt");
        service.delete(&created).await.unwrap();
        assert!(!dir.path().join("beta").join("notes.txt").exists());
    }

    #[tokio::test]
    async fn create_file_rejects_bad_names() {
        let (_dir, service) = setup();
        let beta = service.read("/file/beta/").await.unwrap();
        assert!(service.create_file(&beta, "a/b").await.is_err());
        assert!(service.create_file(&beta, "  ").await.is_err());
    }

    #[tokio::test]
    async fn deleting_workspace_root_is_refused() {
        let (_dir, service) = setup();
        let root = service.read("").await.unwrap();
        assert!(service.delete(&root).await.is_err());
    }

    #[tokio::test]
    async fn move_to_folder() {
        let (dir, service) = setup();
        let item = service.read("/file/readme.md").await.unwrap();
        let beta = service.read("/file/beta/").await.unwrap();
        let moved = service.move_to(&item, &beta).await.unwrap();
        assert_eq!(moved.location, "/file/beta/readme.md");
        assert!(!dir.path().join("readme.md").exists());
    }

    #[tokio::test]
    async fn export_copies_out_of_workspace() {
        let (_dir, service) = setup();
        let out = TempDir::new().unwrap();
        let item = service.read("/file/proj/").await.unwrap();
        let exported = service.export_to(&item, out.path()).await.unwrap();
        assert!(exported.join("src").join("main.rs").exists());
    }
}
