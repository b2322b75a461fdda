//! End-to-end flow: scan, persist a position, rescan, resume.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use rust_slideshow::navigation::{Navigator, compute_resume_index};
use rust_slideshow::scan::discover;
use rust_slideshow::state::{PersistedPosition, canonical_key, load, record_position};
use tempfile::tempdir;

#[test]
fn saved_position_survives_unrelated_tree_changes() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("photos");
    fs::create_dir_all(root.join("trip")).unwrap();
    for name in ["trip/one.jpg", "trip/two.jpg", "zebra.jpg"] {
        fs::write(root.join(name), b"x").unwrap();
    }

    let state_file = tmp.path().join("state.json");

    // first session: browse to the second image and quit
    let found = discover(&root, &HashSet::new()).unwrap();
    let mut nav = Navigator::new(found.entries, &root, 0).unwrap();
    nav.next();
    assert_eq!(nav.current().relative, PathBuf::from("trip/two.jpg"));

    record_position(
        &state_file,
        &root,
        PersistedPosition {
            last_image_path: nav.current().relative.clone(),
            last_index: nav.index(),
            total_images: nav.len(),
            last_updated: Utc::now(),
        },
    )
    .unwrap();

    // the tree changes: a new image sorts ahead of the saved one
    fs::write(root.join("trip").join("aaa.jpg"), b"x").unwrap();

    // second session: the saved path is found at its new index
    let found = discover(&root, &HashSet::new()).unwrap();
    let doc = load(&state_file);
    let saved = doc.directories.get(&canonical_key(&root)).unwrap();
    let index = compute_resume_index(saved, &root, &found.entries);
    assert_eq!(found.entries[index].relative, PathBuf::from("trip/two.jpg"));
    assert_eq!(index, 2);
}

#[test]
fn two_roots_keep_independent_positions() {
    let tmp = tempdir().unwrap();
    let state_file = tmp.path().join("state.json");

    for (dir, count) in [("alpha", 3usize), ("beta", 2usize)] {
        let root = tmp.path().join(dir);
        fs::create_dir_all(&root).unwrap();
        for i in 0..count {
            fs::write(root.join(format!("{i}.jpg")), b"x").unwrap();
        }

        let found = discover(&root, &HashSet::new()).unwrap();
        let mut nav = Navigator::new(found.entries, &root, 0).unwrap();
        nav.next();
        record_position(
            &state_file,
            &root,
            PersistedPosition {
                last_image_path: nav.current().relative.clone(),
                last_index: nav.index(),
                total_images: nav.len(),
                last_updated: Utc::now(),
            },
        )
        .unwrap();
    }

    let doc = load(&state_file);
    assert_eq!(doc.directories.len(), 2);

    let alpha = doc
        .directories
        .get(&canonical_key(&tmp.path().join("alpha")))
        .unwrap();
    assert_eq!(alpha.total_images, 3);
    assert_eq!(alpha.last_index, 1);

    let beta = doc
        .directories
        .get(&canonical_key(&tmp.path().join("beta")))
        .unwrap();
    assert_eq!(beta.total_images, 2);
    assert_eq!(beta.last_index, 1);
}
