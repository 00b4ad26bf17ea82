//! Remove: forget one item, deleting its storage. Links and originals stay.

use anyhow::Result;
use tracing::info;

use crate::catalog::Catalog;
use crate::fs_ops::Executor;

/// Delete the storage and catalog entry of the item `name` resolves to.
/// Returns the removed id.
pub fn remove_source(catalog: &mut Catalog, name: &str, exec: &mut Executor) -> Result<String> {
    catalog.create_or_load(exec.is_dry_run())?;
    let item = catalog.find(name)?;
    let id = item.id().to_string();
    info!(id = %id, storage = %item.storage_path().display(), "removing item");
    catalog.remove(&id, exec)?;
    Ok(id)
}
