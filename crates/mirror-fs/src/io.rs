//! Copy, move, and delete primitives
//!
//! Copies preserve the source modification time so that an unchanged entry
//! compares equal on the next reconciliation cycle.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use filetime::FileTime;
use walkdir::WalkDir;

use crate::{Error, Result};

/// Modification time of an entry.
pub fn modified(path: &Path) -> Result<SystemTime> {
    let meta = fs::metadata(path).map_err(|e| Error::io(path, e))?;
    meta.modified().map_err(|e| Error::io(path, e))
}

/// Create the parent directory of `path` if it does not exist.
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    Ok(())
}

/// Copy a file's content, permissions, and modification time.
pub fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    fs::copy(src, dest).map_err(|e| Error::io(src, e))?;
    copy_times(src, dest)
}

/// Copy permissions and modification time without touching content.
pub fn copy_metadata(src: &Path, dest: &Path) -> Result<()> {
    let meta = fs::metadata(src).map_err(|e| Error::io(src, e))?;
    fs::set_permissions(dest, meta.permissions()).map_err(|e| Error::io(dest, e))?;
    set_mtime_from(&meta, dest)
}

/// Recursively copy a directory tree.
///
/// Directory mtimes are stamped bottom-up after all file contents land, so
/// that creating children does not disturb them.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest).map_err(|e| Error::io(dest, e))?;
    let mut dirs: Vec<(PathBuf, PathBuf)> = Vec::new();
    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry.map_err(Error::walk)?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|_| Error::outside_root(entry.path(), src))?;
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
            dirs.push((entry.path().to_path_buf(), target));
        } else {
            copy_file(entry.path(), &target)?;
        }
    }
    for (from, to) in dirs.iter().rev() {
        copy_times(from, to)?;
    }
    copy_times(src, dest)
}

/// Rename an entry, creating the destination parent if needed.
pub fn move_entry(src: &Path, dest: &Path) -> Result<()> {
    ensure_parent(dest)?;
    fs::rename(src, dest).map_err(|e| Error::io(src, e))
}

/// Remove a single file.
pub fn remove_file(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| Error::io(path, e))
}

/// Remove a directory and everything under it.
pub fn remove_tree(path: &Path) -> Result<()> {
    fs::remove_dir_all(path).map_err(|e| Error::io(path, e))
}

fn copy_times(src: &Path, dest: &Path) -> Result<()> {
    let meta = fs::metadata(src).map_err(|e| Error::io(src, e))?;
    set_mtime_from(&meta, dest)
}

fn set_mtime_from(meta: &fs::Metadata, dest: &Path) -> Result<()> {
    let mtime = FileTime::from_last_modification_time(meta);
    filetime::set_file_mtime(dest, mtime).map_err(|e| Error::io(dest, e))
}
