//! Directory scanning utilities for discovering image files.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Error;

/// Extensions accepted by the scan (lowercase, without dot).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff", "tif"];

/// One discovered image: the path as walked plus its path relative to the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    /// Full path on disk.
    pub path: PathBuf,
    /// Path relative to the scan root; this is what gets persisted.
    pub relative: PathBuf,
}

/// Result of a scan: the ordered sequence plus how many candidates the
/// ignore list filtered out.
#[derive(Debug, Clone)]
pub struct Discovery {
    /// Surviving entries, sorted ascending by full path string.
    pub entries: Vec<ImageEntry>,
    /// Candidates excluded because a path segment matched the ignore list.
    pub ignored: usize,
}

impl Discovery {
    /// Whether the scan found nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of surviving entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Return `true` if `path` has an allowed image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.iter().any(|e| *e == ext)
        })
}

/// Return `true` if any directory segment of `relative` matches an ignore entry.
fn is_ignored(relative: &Path, ignore: &HashSet<String>) -> bool {
    if ignore.is_empty() {
        return false;
    }
    let Some(parent) = relative.parent() else {
        return false;
    };
    parent.components().any(|c| {
        c.as_os_str()
            .to_str()
            .is_some_and(|name| ignore.contains(name))
    })
}

/// Recursively scan `root` for supported images, applying the ignore list.
///
/// The returned sequence is sorted ascending by full path string, so a
/// re-scan with unchanged inputs reproduces the same navigation order.
///
/// # Errors
/// Returns [`Error::BadRoot`] if `root` is missing or not a directory.
pub fn discover(root: &Path, ignore: &HashSet<String>) -> Result<Discovery, Error> {
    if !root.exists() || !root.is_dir() {
        return Err(Error::BadRoot(root.display().to_string()));
    }

    let mut entries = Vec::new();
    let mut ignored = 0usize;
    for entry in WalkDir::new(root).into_iter() {
        let Ok(entry) = entry else { continue };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !is_supported_image(path) {
            continue;
        }
        // walkdir yields paths prefixed by the root we handed it.
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        if is_ignored(relative, ignore) {
            ignored += 1;
            continue;
        }
        entries.push(ImageEntry {
            path: path.to_path_buf(),
            relative: relative.to_path_buf(),
        });
    }

    entries.sort_by(|a, b| a.path.as_os_str().cmp(b.path.as_os_str()));

    Ok(Discovery { entries, ignored })
}
