//! Ignore-list loading: folder names excluded from the scan.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde_json::{Value, json};
use tracing::{debug, warn};

/// Folder names seeded into a freshly created ignore file. Both are
/// thumbnail directories commonly embedded inside photo libraries.
pub const DEFAULT_IGNORED_FOLDERS: &[&str] = &[".thumbnails", "@eaDir"];

const IGNORE_KEY: &str = "ignore_folders";

/// Load the ignore list from `path`, creating it with defaults if absent.
///
/// Degrades rather than fails: a malformed file or any IO problem yields an
/// empty set (filtering disabled) with a warning. Non-string entries inside
/// the list are skipped individually.
#[must_use]
pub fn load_or_create(path: &Path) -> HashSet<String> {
    if !path.exists() {
        let defaults: HashSet<String> = DEFAULT_IGNORED_FOLDERS
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        if let Err(e) = write_default(path) {
            warn!(path = %path.display(), error = %e, "could not create ignore file; using defaults");
        } else {
            debug!(path = %path.display(), "created default ignore file");
        }
        return defaults;
    }

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read ignore file; filtering disabled");
            return HashSet::new();
        }
    };

    let doc: Value = match serde_json::from_str(&raw) {
        Ok(doc) => doc,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignore file is not valid JSON; filtering disabled");
            return HashSet::new();
        }
    };

    let Some(list) = doc.get(IGNORE_KEY).and_then(Value::as_array) else {
        warn!(
            path = %path.display(),
            "ignore file has no `{IGNORE_KEY}` list; filtering disabled"
        );
        return HashSet::new();
    };

    let mut out = HashSet::new();
    for item in list {
        match item.as_str() {
            Some(name) => {
                out.insert(name.to_string());
            }
            None => {
                warn!(entry = %item, "skipping non-string ignore entry");
            }
        }
    }
    out
}

fn write_default(path: &Path) -> std::io::Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)?;
    }
    let doc = json!({ IGNORE_KEY: DEFAULT_IGNORED_FOLDERS });
    fs::write(path, format!("{:#}\n", doc))
}
