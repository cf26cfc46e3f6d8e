//! In-memory [`FileService`] used by explorer tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{NavError, Result};
use crate::fs::metadata::{strip_children_query, FileMetadata, CHILDREN_QUERY};
use crate::fs::service::FileService;

pub const ROOT: &str = "/file/";

#[derive(Default)]
struct Inner {
    nodes: HashMap<String, FileMetadata>,
    listings: HashMap<String, Vec<String>>,
    fetches: Vec<String>,
}

pub struct MemoryFileService {
    inner: Mutex<Inner>,
}

impl MemoryFileService {
    /// A service holding only the workspace root.
    pub fn new() -> Self {
        let root = FileMetadata {
            name: "workspace".into(),
            location: ROOT.into(),
            children_location: Some(format!("{}{}", ROOT, CHILDREN_QUERY)),
            directory: true,
            ..Default::default()
        };
        let mut inner = Inner::default();
        inner.listings.insert(ROOT.into(), Vec::new());
        inner.nodes.insert(ROOT.into(), root);
        Self {
            inner: Mutex::new(inner),
        }
    }

    pub fn add_folder(&self, parent: &str, name: &str) -> FileMetadata {
        self.add(parent, name, true)
    }

    pub fn add_file(&self, parent: &str, name: &str) -> FileMetadata {
        self.add(parent, name, false)
    }

    fn add(&self, parent: &str, name: &str, directory: bool) -> FileMetadata {
        let mut inner = self.inner.lock().unwrap();
        let parent_meta = inner.nodes.get(parent).cloned().expect("parent exists");
        let mut location = format!("{}{}", parent, name);
        if directory {
            location.push('/');
        }
        let parents = if parent == ROOT {
            Vec::new()
        } else {
            let mut chain = vec![parent_meta.as_parent()];
            chain.extend(parent_meta.parent_chain().iter().cloned());
            chain
        };
        let meta = FileMetadata {
            name: name.into(),
            location: location.clone(),
            children_location: directory.then(|| format!("{}{}", location, CHILDREN_QUERY)),
            content_location: (!directory).then(|| location.clone()),
            directory,
            parents: Some(parents),
            ..Default::default()
        };
        if directory {
            inner.listings.insert(location.clone(), Vec::new());
        }
        inner
            .listings
            .get_mut(parent)
            .expect("parent is a folder")
            .push(location.clone());
        inner.nodes.insert(location, meta.clone());
        meta
    }

    /// Remove a node from its parent's listing.
    pub fn remove(&self, location: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.nodes.remove(location);
        for listing in inner.listings.values_mut() {
            listing.retain(|l| l != location);
        }
    }

    /// Children locations fetched so far, in order.
    pub fn fetches(&self) -> Vec<String> {
        self.inner.lock().unwrap().fetches.clone()
    }
}

impl FileService for MemoryFileService {
    async fn read(&self, location: &str) -> Result<FileMetadata> {
        let key = match strip_children_query(location) {
            "" => ROOT,
            other => other,
        };
        self.inner
            .lock()
            .unwrap()
            .nodes
            .get(key)
            .cloned()
            .ok_or_else(|| NavError::NotFound(location.to_string()))
    }

    async fn fetch_children(&self, children_location: &str) -> Result<Vec<FileMetadata>> {
        let mut inner = self.inner.lock().unwrap();
        inner.fetches.push(children_location.to_string());
        let key = strip_children_query(children_location);
        let listing = inner
            .listings
            .get(key)
            .cloned()
            .ok_or_else(|| NavError::NotFound(children_location.to_string()))?;
        Ok(listing
            .iter()
            .filter_map(|l| inner.nodes.get(l).cloned())
            .collect())
    }

    fn file_service_root_url(&self, _location: &str) -> String {
        ROOT.to_string()
    }
}
