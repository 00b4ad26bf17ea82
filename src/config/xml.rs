//! XML configuration support.
//! - Loads settings from config.xml (quick_xml).
//! - A missing file means "use defaults"; it is never created implicitly so dry runs stay write-free.
//!
//! Example:
//! <config>
//!   <catalog_dir>/srv/takeover</catalog_dir>
//!   <storage_alias>\\fileserver\takeover</storage_alias>
//!   <log_level>normal</log_level>
//!   <log_file>/var/log/take_over.log</log_file>
//! </config>

use anyhow::{Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::paths::default_config_path;
use super::types::{Config, LogLevel};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    catalog_dir: Option<String>,
    storage_alias: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

// Map XmlConfig onto defaults; unset or blank fields keep the default.
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();
    if let Some(dir) = non_empty(parsed.catalog_dir.as_deref()) {
        cfg.catalog_dir = PathBuf::from(dir);
    }
    cfg.storage_alias = non_empty(parsed.storage_alias.as_deref()).map(str::to_owned);
    if let Some(lvl) = non_empty(parsed.log_level.as_deref()) {
        cfg.log_level = lvl
            .parse::<LogLevel>()
            .map_err(anyhow::Error::msg)
            .context("config log_level")?;
    }
    cfg.log_file = non_empty(parsed.log_file.as_deref()).map(PathBuf::from);
    Ok(cfg)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed)
}

/// Load the config from the default location.
/// Returns Ok(None) when no config file exists; parse errors are surfaced.
pub fn load_config() -> Result<Option<Config>> {
    let path = default_config_path()?;
    if !path.exists() {
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok(None);
    }
    debug!(path = %path.display(), "loading config");
    load_config_from_xml_path(&path).map(Some)
}
