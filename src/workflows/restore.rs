//! Restore: copy stored files back to where they were taken from.

use anyhow::Result;
use tracing::{error, info, warn};

use super::select;
use crate::catalog::{Catalog, Item};
use crate::fs_ops::{BatchReport, Executor, StepOutcome};

#[derive(Debug, Clone, Copy, Default)]
pub struct RestoreOptions {
    /// Forget the item afterwards (catalog entry and storage).
    pub remove: bool,
    /// Replace files or links already at the destination.
    pub force: bool,
}

fn restore_item(
    catalog: &mut Catalog,
    item: &Item,
    opts: RestoreOptions,
    exec: &mut Executor,
) -> Result<BatchReport> {
    let report = item.restore(opts.force, exec)?;
    info!(
        id = %item.id(),
        restored = report.done_count(),
        skipped = report.skipped_count(),
        failed = report.failed_count(),
        "restore finished"
    );
    if !opts.remove {
        return Ok(report);
    }
    if report.failed_count() > 0 || report.skipped_count() > 0 {
        // Storage still holds the only copy of something.
        warn!(id = %item.id(), "not every file was restored; item kept in catalog");
        return Ok(report);
    }
    catalog.remove(item.id(), exec)?;
    Ok(report)
}

/// Restore the named item, or every item when `name` is `None`.
pub fn restore_source(
    catalog: &mut Catalog,
    name: Option<&str>,
    opts: RestoreOptions,
    exec: &mut Executor,
) -> Result<BatchReport> {
    catalog.create_or_load(exec.is_dry_run())?;
    let items = select(catalog, name)?;

    let mut total = BatchReport::new();
    for item in &items {
        match restore_item(catalog, item, opts, exec) {
            Ok(report) => total.merge(report),
            Err(e) => {
                error!(id = %item.id(), error = %e, "restore failed");
                total.record(item.storage_path(), StepOutcome::Failed(e.to_string()));
            }
        }
    }
    Ok(total.into_result("restore")?)
}
