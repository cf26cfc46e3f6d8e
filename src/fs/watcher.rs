use std::path::{Path, PathBuf};
use std::time::Duration;

use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use tokio::sync::mpsc;

use crate::event::Event;

/// Default patterns to ignore when watching the filesystem.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    ".git",
    "node_modules",
    "__pycache__",
    "venv",
    ".venv",
    "target",
];

/// Events per debounce window above which a watcher batch collapses to the root.
pub const DEFAULT_FLOOD_THRESHOLD: usize = 100;

/// Watches the workspace and forwards debounced change batches as [`Event::FsChange`].
pub struct FsWatcher {
    _debouncer: notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>,
}

impl FsWatcher {
    /// Watch `root` recursively. Batches larger than `flood_threshold`
    /// collapse into a single refresh of `root`.
    pub fn new(
        root: &Path,
        debounce_duration: Duration,
        ignore_patterns: Vec<String>,
        flood_threshold: usize,
        event_tx: mpsc::UnboundedSender<Event>,
    ) -> notify::Result<Self> {
        let root_path = root.to_path_buf();

        let mut debouncer = new_debouncer(
            debounce_duration,
            move |result: Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>| {
                match result {
                    Ok(events) => {
                        let paths: Vec<PathBuf> = events
                            .iter()
                            .filter(|e| e.kind == DebouncedEventKind::Any)
                            .map(|e| e.path.clone())
                            .filter(|p| !should_ignore(p, &ignore_patterns))
                            .collect();
                        if let Some(batch) = collapse_flood(paths, flood_threshold, &root_path) {
                            let _ = event_tx.send(Event::FsChange(batch));
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "watcher error"),
                }
            },
        )?;

        debouncer
            .watcher()
            .watch(root, notify::RecursiveMode::Recursive)?;
        tracing::info!(root = %root.display(), "filesystem watcher started");

        Ok(Self {
            _debouncer: debouncer,
        })
    }
}

/// Collapse an oversized batch to `root`; `None` for an empty batch.
pub fn collapse_flood(paths: Vec<PathBuf>, threshold: usize, root: &Path) -> Option<Vec<PathBuf>> {
    if paths.is_empty() {
        None
    } else if paths.len() > threshold {
        Some(vec![root.to_path_buf()])
    } else {
        Some(paths)
    }
}

/// True when some component of `path` is exactly one of `patterns`.
pub fn should_ignore(path: &Path, patterns: &[String]) -> bool {
    path.iter()
        .filter_map(|part| part.to_str())
        .any(|part| patterns.iter().any(|p| p == part))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Vec<String> {
        DEFAULT_IGNORE_PATTERNS.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn build_and_vcs_dirs_are_ignored() {
        let patterns = defaults();
        assert!(should_ignore(Path::new("/w/.git/HEAD"), &patterns));
        assert!(should_ignore(Path::new("/w/web/node_modules/x/index.js"), &patterns));
        assert!(should_ignore(Path::new("/w/target"), &patterns));
        assert!(!should_ignore(Path::new("/w/src/main.rs"), &patterns));
    }

    #[test]
    fn patterns_match_whole_components() {
        let patterns = vec!["target".to_string()];
        assert!(!should_ignore(Path::new("/w/target2/file.txt"), &patterns));
        assert!(!should_ignore(Path::new("/w/my_target"), &patterns));
    }

    #[test]
    fn oversized_batch_becomes_one_root_refresh() {
        let root = Path::new("/w");
        let batch = |n: usize| (0..n).map(|i| root.join(format!("f{i}"))).collect::<Vec<_>>();

        assert_eq!(collapse_flood(batch(101), 100, root), Some(vec![root.to_path_buf()]));
        assert_eq!(collapse_flood(batch(100), 100, root).map(|b| b.len()), Some(100));
        assert_eq!(collapse_flood(batch(0), 100, root), None);
    }
}
