#![cfg(unix)]

//! Dry runs must leave the file system and the catalog byte-identical, and plan
//! exactly what the real run then does.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use walkdir::WalkDir;

use ::take_over::prelude::*;

/// Every entry under `root` with its kind and content (or link target).
fn snapshot(root: &Path) -> BTreeMap<PathBuf, String> {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .map(|e| e.unwrap())
        .map(|e| {
            let ft = e.file_type();
            let desc = if ft.is_symlink() {
                format!("link -> {}", fs::read_link(e.path()).unwrap().display())
            } else if ft.is_dir() {
                "dir".to_string()
            } else {
                format!("file {}", fs::read_to_string(e.path()).unwrap())
            };
            (e.path().to_path_buf(), desc)
        })
        .collect()
}

fn setup(root: &Path) -> (Catalog, PathBuf) {
    let db = root.join("db");
    fs::create_dir_all(&db).unwrap();
    let src = root.join("src/cfg");
    fs::create_dir_all(src.join("nested")).unwrap();
    fs::write(src.join("a.ini"), "a").unwrap();
    fs::write(src.join("nested/b.ini"), "b").unwrap();
    fs::write(src.join("notes.txt"), "n").unwrap();
    let catalog = Catalog::new(&db);
    catalog.create().unwrap();
    (catalog, src)
}

fn request(src: &Path) -> TakeOverRequest {
    TakeOverRequest {
        path: src.to_path_buf(),
        storage_alias: Some("%TAKEOVER_DB%".into()),
        extensions: vec!["ini".into()],
    }
}

fn normalized(actions: &[Action], id: &str) -> Vec<String> {
    actions
        .iter()
        .map(|a| format!("{a:?}").replace(id, "<id>"))
        .collect()
}

#[test]
fn take_over_dry_run_changes_nothing_and_matches_real_run() {
    let td = tempdir().unwrap();
    let (mut catalog, src) = setup(td.path());
    let before = snapshot(td.path());
    let catalog_bytes = fs::read(catalog.file_path()).unwrap();

    let mut dry = Executor::new(true);
    let planned = take_over(&mut catalog, &request(&src), &mut dry).unwrap();
    assert_eq!(snapshot(td.path()), before);
    assert_eq!(fs::read(catalog.file_path()).unwrap(), catalog_bytes);
    assert!(!dry.actions().is_empty());

    let mut catalog = Catalog::new(catalog.dir());
    let mut real = Executor::new(false);
    let done = take_over(&mut catalog, &request(&src), &mut real).unwrap();
    assert_eq!(planned.captured, done.captured);
    assert_eq!(
        normalized(dry.actions(), &planned.id),
        normalized(real.actions(), &done.id)
    );
}

#[test]
fn dry_run_without_a_catalog_creates_none() {
    let td = tempdir().unwrap();
    let src = td.path().join("cfg");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("x.conf"), "x").unwrap();
    fs::create_dir_all(td.path().join("db")).unwrap();
    let before = snapshot(td.path());

    let mut catalog = Catalog::new(td.path().join("db"));
    let req = TakeOverRequest {
        path: src,
        ..Default::default()
    };
    take_over(&mut catalog, &req, &mut Executor::new(true)).unwrap();
    assert_eq!(snapshot(td.path()), before);
    assert!(!catalog.file_path().exists());
}

#[test]
fn restore_remove_set_and_unset_links_dry_runs_are_inert() {
    let td = tempdir().unwrap();
    let (mut catalog, src) = setup(td.path());
    let req = TakeOverRequest {
        storage_alias: None,
        ..request(&src)
    };
    take_over(&mut catalog, &req, &mut Executor::new(false)).unwrap();
    // Replace one link with a local edit so forced operations have work to plan.
    fs::remove_file(src.join("a.ini")).unwrap();
    fs::write(src.join("a.ini"), "edited").unwrap();

    let before = snapshot(td.path());
    let catalog_bytes = fs::read(catalog.file_path()).unwrap();
    let unchanged = |catalog: &Catalog| {
        assert_eq!(snapshot(td.path()), before);
        assert_eq!(fs::read(catalog.file_path()).unwrap(), catalog_bytes);
    };

    let opts = RestoreOptions { remove: true, force: true };
    restore_source(&mut catalog, None, opts, &mut Executor::new(true)).unwrap();
    unchanged(&catalog);

    set_links(&mut catalog, None, Some("//nas/db"), true, &mut Executor::new(true)).unwrap();
    unchanged(&catalog);

    unset_links(&mut catalog, None, &mut Executor::new(true)).unwrap();
    unchanged(&catalog);

    remove_source(&mut catalog, "cfg", &mut Executor::new(true)).unwrap();
    unchanged(&catalog);
    assert_eq!(catalog.len(), 1);
}

#[test]
fn forced_set_links_plans_the_same_steps_it_takes() {
    let td = tempdir().unwrap();
    let (mut catalog, src) = setup(td.path());
    let req = TakeOverRequest {
        storage_alias: None,
        ..request(&src)
    };
    take_over(&mut catalog, &req, &mut Executor::new(false)).unwrap();
    fs::remove_file(src.join("nested/b.ini")).unwrap();
    fs::write(src.join("nested/b.ini"), "local").unwrap();
    fs::remove_file(src.join("a.ini")).unwrap();

    let mut dry = Executor::new(true);
    set_links(&mut catalog, Some("cfg"), None, true, &mut dry).unwrap();
    let mut real = Executor::new(false);
    set_links(&mut catalog, Some("cfg"), None, true, &mut real).unwrap();

    assert_eq!(dry.actions(), real.actions());
    assert_eq!(
        dry.actions()
            .iter()
            .filter(|a| matches!(a, Action::Symlink { .. }))
            .count(),
        2
    );
    assert!(fs::symlink_metadata(src.join("nested/b.ini")).unwrap().file_type().is_symlink());
}
