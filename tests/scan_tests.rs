use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use rust_slideshow::error::Error;
use rust_slideshow::navigation::Navigator;
use rust_slideshow::scan::{discover, is_supported_image};
use tempfile::tempdir;

fn ignore(names: &[&str]) -> HashSet<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn scan_finds_nested_images_in_path_order() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();

    fs::create_dir_all(root.join("zoo")).unwrap();
    fs::create_dir_all(root.join("arch").join("deep")).unwrap();
    fs::write(root.join("zoo").join("a.jpg"), b"x").unwrap();
    fs::write(root.join("arch").join("deep").join("b.png"), b"x").unwrap();
    fs::write(root.join("c.gif"), b"x").unwrap();
    fs::write(root.join("notes.txt"), b"x").unwrap();

    let found = discover(root, &HashSet::new()).unwrap();
    assert_eq!(found.ignored, 0);

    let rels: Vec<PathBuf> = found.entries.iter().map(|e| e.relative.clone()).collect();
    assert_eq!(
        rels,
        vec![
            PathBuf::from("arch/deep/b.png"),
            PathBuf::from("c.gif"),
            PathBuf::from("zoo/a.jpg"),
        ]
    );
}

#[test]
fn scan_is_deterministic() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();

    for name in ["q.jpg", "m.png", "a.webp", "z.bmp"] {
        fs::write(root.join(name), b"x").unwrap();
    }
    fs::create_dir_all(root.join("sub")).unwrap();
    fs::write(root.join("sub").join("k.tiff"), b"x").unwrap();

    let first = discover(root, &HashSet::new()).unwrap();
    let second = discover(root, &HashSet::new()).unwrap();
    assert_eq!(first.entries, second.entries);
}

#[test]
fn extension_match_is_case_insensitive() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();

    fs::write(root.join("upper.JPG"), b"x").unwrap();
    fs::write(root.join("mixed.PnG"), b"x").unwrap();

    let found = discover(root, &HashSet::new()).unwrap();
    assert_eq!(found.len(), 2);

    assert!(is_supported_image(&PathBuf::from("x.TIF")));
    assert!(!is_supported_image(&PathBuf::from("x.jpg.bak")));
    assert!(!is_supported_image(&PathBuf::from("noext")));
}

#[test]
fn ignored_folder_excludes_at_any_depth() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();

    fs::create_dir_all(root.join("keep").join("skipme").join("below")).unwrap();
    fs::create_dir_all(root.join("skipme")).unwrap();
    fs::write(root.join("keep").join("ok.jpg"), b"x").unwrap();
    fs::write(root.join("skipme").join("top.jpg"), b"x").unwrap();
    fs::write(
        root.join("keep").join("skipme").join("below").join("deep.jpg"),
        b"x",
    )
    .unwrap();

    let found = discover(root, &ignore(&["skipme"])).unwrap();
    assert_eq!(found.ignored, 2);
    let rels: Vec<PathBuf> = found.entries.iter().map(|e| e.relative.clone()).collect();
    assert_eq!(rels, vec![PathBuf::from("keep/ok.jpg")]);
}

#[test]
fn ignore_matches_directory_segments_not_file_names() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();

    fs::write(root.join("skipme.jpg"), b"x").unwrap();

    let found = discover(root, &ignore(&["skipme.jpg"])).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found.ignored, 0);
}

#[test]
fn missing_root_is_an_error() {
    let tmp = tempdir().unwrap();
    let bogus = tmp.path().join("nope");

    match discover(&bogus, &HashSet::new()) {
        Err(Error::BadRoot(_)) => {}
        other => panic!("expected BadRoot, got {other:?}"),
    }
}

#[test]
fn scan_and_navigator_cooperate() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();

    fs::write(root.join("x.jpg"), b"x").unwrap();
    fs::create_dir_all(root.join("sub")).unwrap();
    fs::write(root.join("sub").join("y.png"), b"x").unwrap();

    let found = discover(root, &HashSet::new()).unwrap();
    assert_eq!(found.len(), 2);

    let mut nav = Navigator::new(found.entries, root, 0).unwrap();
    assert_eq!(nav.current().relative, PathBuf::from("sub/y.png"));
    nav.next();
    assert_eq!(nav.current().relative, PathBuf::from("x.jpg"));
    nav.next();
    assert_eq!(nav.current().relative, PathBuf::from("sub/y.png"));
}
