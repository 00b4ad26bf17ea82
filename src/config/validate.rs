//! Config validation logic.
//! Verifies the catalog folder is an existing readable directory and the storage alias is usable.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info};

use super::types::Config;

impl Config {
    /// Validate the catalog folder and alias before any workflow runs.
    pub fn validate(&self) -> Result<()> {
        let dir = &self.catalog_dir;

        ensure_dir_exists_and_is_dir(dir, "catalog_dir")?;
        ensure_readable(dir, "catalog_dir")?;

        if let Some(alias) = &self.storage_alias
            && alias.trim().is_empty()
        {
            error!("storage_alias is set but empty");
            bail!("storage_alias is set but empty");
        }

        info!(
            catalog_dir = %dir.display(),
            storage_alias = self.storage_alias.as_deref().unwrap_or("<catalog_dir>"),
            log_file = %self
                .log_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<none>".into()),
            "config validated"
        );
        Ok(())
    }
}

/// Ensure path exists and is a directory; emit clear errors with path context.
fn ensure_dir_exists_and_is_dir(path: &Path, name: &str) -> Result<()> {
    if !path.exists() {
        error!("{name} does not exist: {}", path.display());
        bail!("{name} does not exist: {}", path.display());
    }
    if !path.is_dir() {
        error!("{name} is not a directory: {}", path.display());
        bail!("{name} is not a directory: {}", path.display());
    }
    Ok(())
}

fn ensure_readable(path: &Path, name: &str) -> Result<()> {
    fs::read_dir(path).with_context(|| {
        format!("Cannot read {name} directory '{}'; check permissions", path.display())
    })?;
    debug!("{name} readable: {}", path.display());
    Ok(())
}
