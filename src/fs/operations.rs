//! Blocking filesystem primitives behind [`LocalFileService`](crate::fs::local::LocalFileService).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{NavError, Result};

/// What [`transfer`] does with the source once the target is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    Copy,
    Move,
}

impl Transfer {
    fn verb(self) -> &'static str {
        match self {
            Transfer::Copy => "copy",
            Transfer::Move => "move",
        }
    }
}

/// Create an empty file. Fails if something already exists at `path`.
pub fn create_file(path: &Path) -> Result<()> {
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map(drop)
        .map_err(|e| collision_error(e, path))
}

pub fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir(path).map_err(|e| collision_error(e, path))
}

/// Rename in place. Refuses to clobber an existing entry.
pub fn rename(from: &Path, to: &Path) -> Result<()> {
    if fs::symlink_metadata(to).is_ok() {
        return Err(NavError::AlreadyExists(to.display().to_string()));
    }
    Ok(fs::rename(from, to)?)
}

/// Remove a file, or a folder with everything under it.
pub fn delete(path: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if meta.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// First name in `dir` that is not taken, starting from `name` itself.
///
/// Taken names get a ` (copy)` marker before the extension, then
/// ` (copy 2)`, ` (copy 3)` and so on.
pub fn free_name(dir: &Path, name: &str) -> PathBuf {
    let first = dir.join(name);
    if !first.exists() {
        return first;
    }
    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > 0 => name.split_at(dot),
        _ => (name, ""),
    };
    (1..)
        .map(|n| match n {
            1 => dir.join(format!("{stem} (copy){ext}")),
            n => dir.join(format!("{stem} (copy {n}){ext}")),
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

/// Copy or move `src` into `dest_dir` under a free name. Returns the new path.
pub fn transfer(src: &Path, dest_dir: &Path, mode: Transfer) -> Result<PathBuf> {
    let name = src
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| NavError::InvalidPath(src.display().to_string()))?;
    if src.is_dir() && dest_dir.starts_with(src) {
        return Err(NavError::InvalidPath(format!(
            "cannot {} {} into itself",
            mode.verb(),
            src.display()
        )));
    }
    let target = free_name(dest_dir, name);

    match mode {
        Transfer::Copy => copy_tree(src, &target)?,
        // A failed rename usually means a device boundary.
        Transfer::Move => {
            if fs::rename(src, &target).is_err() {
                copy_tree(src, &target)?;
                delete(src)?;
            }
        }
    }
    Ok(target)
}

fn copy_tree(src: &Path, target: &Path) -> Result<()> {
    if !src.is_dir() {
        fs::copy(src, target)?;
        return Ok(());
    }
    fs::create_dir_all(target)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        copy_tree(&entry.path(), &target.join(entry.file_name()))?;
    }
    Ok(())
}

fn collision_error(err: io::Error, path: &Path) -> NavError {
    match err.kind() {
        io::ErrorKind::AlreadyExists => NavError::AlreadyExists(path.display().to_string()),
        _ => NavError::Io(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn create_file_refuses_existing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("notes.md");
        create_file(&path).unwrap();
        assert!(path.is_file());
        assert!(matches!(create_file(&path), Err(NavError::AlreadyExists(_))));
    }

    #[test]
    fn create_dir_refuses_existing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("src");
        create_dir(&path).unwrap();
        assert!(matches!(create_dir(&path), Err(NavError::AlreadyExists(_))));
    }

    #[test]
    fn rename_keeps_the_existing_target() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.txt");
        let b = tmp.path().join("b.txt");
        fs::write(&a, "a").unwrap();
        fs::write(&b, "b").unwrap();
        assert!(matches!(rename(&a, &b), Err(NavError::AlreadyExists(_))));
        assert_eq!(fs::read_to_string(&b).unwrap(), "b");

        let c = tmp.path().join("c.txt");
        rename(&a, &c).unwrap();
        assert!(!a.exists());
        assert!(c.exists());
    }

    #[test]
    fn delete_removes_nested_folders() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("outer");
        fs::create_dir_all(dir.join("inner")).unwrap();
        fs::write(dir.join("inner/leaf.txt"), "x").unwrap();
        delete(&dir).unwrap();
        assert!(!dir.exists());
        assert!(delete(&dir).is_err());
    }

    #[test]
    fn free_name_marks_copies() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(free_name(tmp.path(), "a.txt"), tmp.path().join("a.txt"));

        fs::write(tmp.path().join("a.txt"), "").unwrap();
        assert_eq!(free_name(tmp.path(), "a.txt"), tmp.path().join("a (copy).txt"));

        fs::write(tmp.path().join("a (copy).txt"), "").unwrap();
        assert_eq!(free_name(tmp.path(), "a.txt"), tmp.path().join("a (copy 2).txt"));

        fs::write(tmp.path().join("Makefile"), "").unwrap();
        assert_eq!(free_name(tmp.path(), "Makefile"), tmp.path().join("Makefile (copy)"));

        fs::write(tmp.path().join(".env"), "").unwrap();
        assert_eq!(free_name(tmp.path(), ".env"), tmp.path().join(".env (copy)"));
    }

    #[test]
    fn copy_folder_keeps_source() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("pkg");
        fs::create_dir_all(src.join("sub")).unwrap();
        fs::write(src.join("sub/b.txt"), "bbb").unwrap();
        let dest = tmp.path().join("dest");
        fs::create_dir(&dest).unwrap();

        let copied = transfer(&src, &dest, Transfer::Copy).unwrap();
        assert_eq!(copied, dest.join("pkg"));
        assert_eq!(fs::read_to_string(copied.join("sub/b.txt")).unwrap(), "bbb");
        assert!(src.exists());
    }

    #[test]
    fn copy_into_same_folder_picks_free_name() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("file.txt");
        fs::write(&src, "original").unwrap();
        let copied = transfer(&src, tmp.path(), Transfer::Copy).unwrap();
        assert_eq!(copied, tmp.path().join("file (copy).txt"));
        assert_eq!(fs::read_to_string(copied).unwrap(), "original");
    }

    #[test]
    fn move_file_removes_source() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("move_me.txt");
        fs::write(&src, "content").unwrap();
        let dest = tmp.path().join("dest");
        fs::create_dir(&dest).unwrap();

        let moved = transfer(&src, &dest, Transfer::Move).unwrap();
        assert_eq!(moved, dest.join("move_me.txt"));
        assert!(!src.exists());
        assert_eq!(fs::read_to_string(moved).unwrap(), "content");
    }

    #[test]
    fn folder_cannot_land_inside_itself() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("outer");
        fs::create_dir_all(src.join("inner")).unwrap();
        assert!(transfer(&src, &src, Transfer::Copy).is_err());
        assert!(transfer(&src, &src.join("inner"), Transfer::Move).is_err());
        assert!(src.join("inner").exists());
    }
}
