//! Drives the compiled binary. Every run points TAKE_OVER_CONFIG at a temp
//! location so a config in the user's home never leaks in.

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use std::fs;
use std::path::Path;

fn bin(config: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_take_over"));
    cmd.env("TAKE_OVER_CONFIG", config);
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let out = cmd.output().expect("spawn binary");
    assert!(out.status.success(), "command failed: {out:?}");
    String::from_utf8(out.stdout).unwrap()
}

#[test]
fn print_config_reports_env_override() {
    let td = TempDir::new().unwrap();
    let cfg = td.child("custom.xml");
    let out = stdout_of(bin(cfg.path()).arg("--print-config"));
    assert!(out.contains("TAKE_OVER_CONFIG"));
    assert!(out.contains(&cfg.path().display().to_string()));
}

#[test]
fn no_arguments_prints_help_and_fails() {
    let td = TempDir::new().unwrap();
    bin(&td.path().join("none.xml")).assert().failure();
}

#[test]
fn init_creates_catalog_and_is_idempotent() {
    let td = TempDir::new().unwrap();
    let cfg = td.path().join("none.xml");
    bin(&cfg).arg("-C").arg(td.path()).arg("init").assert().success();
    td.child("takeover_db.json").assert("{}");
    bin(&cfg).arg("-C").arg(td.path()).arg("init").assert().success();
    td.child("takeover_db.json").assert("{}");
}

#[test]
fn init_dry_run_writes_nothing() {
    let td = TempDir::new().unwrap();
    bin(&td.path().join("none.xml"))
        .args(["init", "-d", "-C"])
        .arg(td.path())
        .assert()
        .success();
    assert!(!td.child("takeover_db.json").path().exists());
}

#[test]
fn list_without_catalog_is_a_config_error() {
    let td = TempDir::new().unwrap();
    bin(&td.path().join("none.xml"))
        .arg("-C")
        .arg(td.path())
        .arg("list")
        .assert()
        .code(2);
}

#[test]
fn update_is_not_implemented() {
    let td = TempDir::new().unwrap();
    bin(&td.path().join("none.xml"))
        .arg("-C")
        .arg(td.path())
        .args(["update", "-n", "cfg", "-e", "ini"])
        .assert()
        .code(7);
}

#[test]
fn unknown_name_is_a_lookup_error() {
    let td = TempDir::new().unwrap();
    let cfg = td.path().join("none.xml");
    bin(&cfg).arg("-C").arg(td.path()).arg("init").assert().success();
    bin(&cfg)
        .arg("-C")
        .arg(td.path())
        .args(["remove_source", "-n", "ghost"])
        .assert()
        .code(4);
}

#[test]
fn missing_source_is_a_filesystem_error() {
    let td = TempDir::new().unwrap();
    bin(&td.path().join("none.xml"))
        .arg("-C")
        .arg(td.path())
        .arg("takeover")
        .arg(td.path().join("ghost"))
        .assert()
        .code(5);
}

#[test]
fn bad_config_file_is_a_config_error() {
    let td = TempDir::new().unwrap();
    let cfg = td.child("config.xml");
    cfg.write_str("<config><catalog_root>/x</catalog_root></config>").unwrap();
    bin(cfg.path()).arg("list").assert().code(2);
}

#[test]
fn config_file_supplies_catalog_dir() {
    let td = TempDir::new().unwrap();
    let db = td.child("db");
    db.create_dir_all().unwrap();
    let cfg = td.child("config.xml");
    cfg.write_str(&format!(
        "<config><catalog_dir>{}</catalog_dir><log_level>quiet</log_level></config>",
        db.path().display()
    ))
    .unwrap();
    bin(cfg.path()).arg("init").assert().success();
    db.child("takeover_db.json").assert("{}");
}

#[cfg(unix)]
#[test]
fn takeover_then_list_then_restore() {
    let td = TempDir::new().unwrap();
    let cfg = td.path().join("none.xml");
    let db = td.child("db");
    db.create_dir_all().unwrap();
    let src = td.child("dotfiles");
    src.child("a.ini").write_str("a").unwrap();
    src.child("sub/b.ini").write_str("b").unwrap();

    bin(&cfg).arg("-C").arg(db.path()).arg("init").assert().success();

    // Dry run first: nothing may change.
    bin(&cfg)
        .arg("-C")
        .arg(db.path())
        .arg("takeover")
        .arg(src.path())
        .arg("-d")
        .assert()
        .success();
    db.child("takeover_db.json").assert("{}");
    assert!(!fs::symlink_metadata(src.child("a.ini").path()).unwrap().file_type().is_symlink());

    bin(&cfg)
        .arg("-C")
        .arg(db.path())
        .arg("takeover")
        .arg(src.path())
        .args(["-e", "ini"])
        .assert()
        .success();
    assert!(fs::symlink_metadata(src.child("a.ini").path()).unwrap().file_type().is_symlink());

    let brief = stdout_of(bin(&cfg).arg("-C").arg(db.path()).arg("list"));
    assert_eq!(brief.trim(), "dotfiles");
    let verbose = stdout_of(bin(&cfg).arg("-C").arg(db.path()).args(["list", "-v"]));
    assert!(verbose.contains("_dotfiles"));
    let full = stdout_of(bin(&cfg).arg("-C").arg(db.path()).args(["list", "--very_verbose"]));
    assert!(full.contains(".ini"));

    bin(&cfg)
        .arg("-C")
        .arg(db.path())
        .args(["restore_source", "-n", "dotfiles", "-r", "-f"])
        .assert()
        .success();
    src.child("sub/b.ini").assert("b");
    assert!(fs::symlink_metadata(src.child("sub/b.ini").path()).unwrap().file_type().is_file());
    db.child("takeover_db.json").assert("{}");
}

#[cfg(unix)]
#[test]
fn relative_catalog_dir_still_yields_resolvable_links() {
    let td = TempDir::new().unwrap();
    let cfg = td.path().join("none.xml");
    td.child("db").create_dir_all().unwrap();
    td.child("cfg/a.ini").write_str("a").unwrap();

    bin(&cfg)
        .current_dir(td.path())
        .args(["-C", "db", "init"])
        .assert()
        .success();
    bin(&cfg)
        .current_dir(td.path())
        .args(["-C", "db", "takeover", "cfg"])
        .assert()
        .success();

    let link = td.child("cfg/a.ini");
    let target = fs::read_link(link.path()).unwrap();
    assert!(target.is_absolute(), "link target {} is relative", target.display());
    assert!(target.starts_with(td.path().join("db")));
    assert_eq!(fs::read_to_string(link.path()).unwrap(), "a");
}

#[cfg(unix)]
#[test]
fn takeover_of_a_folder_holding_the_catalog_is_refused() {
    let td = TempDir::new().unwrap();
    let cfg = td.path().join("none.xml");
    let home = td.child("home");
    home.child("db").create_dir_all().unwrap();
    home.child(".bashrc").write_str("alias ll='ls -l'").unwrap();

    bin(&cfg).arg("-C").arg(home.child("db").path()).arg("init").assert().success();
    bin(&cfg)
        .arg("-C")
        .arg(home.child("db").path())
        .arg("takeover")
        .arg(home.path())
        .assert()
        .code(5);

    let db_file = home.child("db/takeover_db.json");
    assert!(fs::symlink_metadata(db_file.path()).unwrap().file_type().is_file());
    db_file.assert("{}");
    assert!(fs::symlink_metadata(home.child(".bashrc").path()).unwrap().file_type().is_file());
    assert_eq!(fs::read_dir(home.child("db").path()).unwrap().count(), 1);
}
