use std::fs;

use rust_slideshow::ignore::{DEFAULT_IGNORED_FOLDERS, load_or_create};
use tempfile::tempdir;

#[test]
fn missing_file_is_created_with_defaults() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("ignore.json");

    let set = load_or_create(&path);
    for name in DEFAULT_IGNORED_FOLDERS {
        assert!(set.contains(*name));
    }
    assert_eq!(set.len(), DEFAULT_IGNORED_FOLDERS.len());

    // the file now exists and loads back to the same set
    assert!(path.exists());
    assert_eq!(load_or_create(&path), set);
}

#[test]
fn missing_parent_directories_are_created() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("deep").join("nested").join("ignore.json");

    let set = load_or_create(&path);
    assert!(!set.is_empty());
    assert!(path.exists());
}

#[test]
fn list_of_strings_is_loaded() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("ignore.json");
    fs::write(&path, r#"{"ignore_folders": ["drafts", ".cache"]}"#).unwrap();

    let set = load_or_create(&path);
    assert_eq!(set.len(), 2);
    assert!(set.contains("drafts"));
    assert!(set.contains(".cache"));
}

#[test]
fn non_list_field_yields_empty_set() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("ignore.json");
    fs::write(&path, r#"{"ignore_folders": "drafts"}"#).unwrap();

    assert!(load_or_create(&path).is_empty());
}

#[test]
fn non_object_top_level_yields_empty_set() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("ignore.json");
    fs::write(&path, r#"["drafts"]"#).unwrap();

    assert!(load_or_create(&path).is_empty());
}

#[test]
fn invalid_json_yields_empty_set() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("ignore.json");
    fs::write(&path, b"{not json").unwrap();

    assert!(load_or_create(&path).is_empty());
}

#[test]
fn non_string_entries_are_skipped_individually() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("ignore.json");
    fs::write(
        &path,
        r#"{"ignore_folders": ["keepers", 3, null, {"bad": true}, "also"]}"#,
    )
    .unwrap();

    let set = load_or_create(&path);
    assert_eq!(set.len(), 2);
    assert!(set.contains("keepers"));
    assert!(set.contains("also"));
}
