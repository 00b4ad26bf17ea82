use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

use take_over::{CONFIG_ENV, LogLevel, default_config_path, load_config};

struct EnvGuard;

impl EnvGuard {
    fn set(value: &std::path::Path) -> Self {
        // Serialized by #[serial]; no other thread reads the environment meanwhile.
        unsafe { std::env::set_var(CONFIG_ENV, value) };
        EnvGuard
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe { std::env::remove_var(CONFIG_ENV) };
    }
}

#[test]
#[serial]
fn env_pointing_at_a_file_is_used_verbatim() {
    let td = tempdir().unwrap();
    let cfg = td.path().join("custom.xml");
    let _g = EnvGuard::set(&cfg);
    assert_eq!(default_config_path().unwrap(), cfg);
}

#[test]
#[serial]
fn env_pointing_at_a_directory_means_config_xml_inside() {
    let td = tempdir().unwrap();
    let _g = EnvGuard::set(td.path());
    assert_eq!(default_config_path().unwrap(), td.path().join("config.xml"));
}

#[test]
#[serial]
fn missing_file_means_defaults_and_is_not_created() {
    let td = tempdir().unwrap();
    let cfg = td.path().join("absent.xml");
    let _g = EnvGuard::set(&cfg);
    assert!(load_config().unwrap().is_none());
    assert!(!cfg.exists());
}

#[test]
#[serial]
fn file_values_are_loaded() {
    let td = tempdir().unwrap();
    let cfg = td.path().join("config.xml");
    fs::write(
        &cfg,
        "<config>\n  <catalog_dir>/srv/db</catalog_dir>\n  <storage_alias>\\\\nas\\db</storage_alias>\n  <log_level>info</log_level>\n</config>\n",
    )
    .unwrap();
    let _g = EnvGuard::set(&cfg);
    let loaded = load_config().unwrap().unwrap();
    assert_eq!(loaded.catalog_dir, PathBuf::from("/srv/db"));
    assert_eq!(loaded.storage_alias.as_deref(), Some("\\\\nas\\db"));
    assert_eq!(loaded.log_level, LogLevel::Info);
    assert!(loaded.log_file.is_none());
}
