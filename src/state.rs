//! Per-directory position persistence.
//!
//! The store is one JSON document mapping canonicalized root paths to the
//! position last viewed there, so independent slideshows over different
//! trees coexist in the same file. Saves go through a temporary file in the
//! same directory followed by a rename, so an interrupted write leaves the
//! previous document intact.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Error;

/// Schema tag written into every document.
pub const STATE_VERSION: &str = "1.0";

/// Position metadata persisted for one root directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedPosition {
    /// Last viewed image, relative to the root.
    pub last_image_path: PathBuf,
    /// Index of that image in the sequence at save time.
    pub last_index: usize,
    /// Sequence length at save time.
    pub total_images: usize,
    /// When the position was saved.
    pub last_updated: DateTime<Utc>,
}

/// The whole persisted store: version tag plus one entry per root directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateDocument {
    /// Schema version.
    pub version: String,
    /// Canonicalized absolute root path -> position.
    pub directories: BTreeMap<String, PersistedPosition>,
}

impl StateDocument {
    /// An empty document at the current schema version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: STATE_VERSION.to_string(),
            directories: BTreeMap::new(),
        }
    }
}

impl Default for StateDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// Canonical store key for a root directory.
///
/// Falls back to the absolute (non-resolved) path when canonicalization
/// fails, e.g. for a directory deleted mid-session.
#[must_use]
pub fn canonical_key(root: &Path) -> String {
    fs::canonicalize(root)
        .or_else(|_| std::path::absolute(root))
        .unwrap_or_else(|_| root.to_path_buf())
        .display()
        .to_string()
}

/// Load the store from `path`.
///
/// A missing file yields an empty document. A file that cannot be read or
/// does not parse as the expected shape yields an empty document with a
/// warning; corrupt state never blocks startup.
#[must_use]
pub fn load(path: &Path) -> StateDocument {
    if !path.exists() {
        debug!(path = %path.display(), "no state file; starting fresh");
        return StateDocument::new();
    }
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read state file; starting fresh");
            return StateDocument::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(doc) => doc,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "state file is corrupt; starting fresh");
            StateDocument::new()
        }
    }
}

/// Write the full store to `path` atomically.
///
/// The document is serialized to `<path>.tmp` in the same directory and
/// renamed over the target, so a crash mid-write cannot leave a truncated
/// or missing state file.
///
/// # Errors
/// Returns an error if serialization, the temporary write, or the rename
/// fails. Callers at shutdown report the failure and carry on.
pub fn save(path: &Path, doc: &StateDocument) -> Result<(), Error> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let body = serde_json::to_string_pretty(doc)?;
    fs::write(&tmp, body)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Read-modify-write: replace `root`'s entry in the store on disk.
///
/// # Errors
/// Propagates [`save`] failures.
pub fn record_position(
    path: &Path,
    root: &Path,
    position: PersistedPosition,
) -> Result<(), Error> {
    let mut doc = load(path);
    doc.directories.insert(canonical_key(root), position);
    save(path, &doc)
}
