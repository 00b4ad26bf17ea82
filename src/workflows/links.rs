//! Set and unset the links that point at stored files.

use anyhow::Result;
use tracing::{error, info};

use super::select;
use crate::catalog::Catalog;
use crate::fs_ops::{BatchReport, Executor, StepOutcome};

/// (Re)create links for the named item, or for every item.
///
/// `alias_override` replaces each record's storage alias in the link targets
/// for this run only; the catalog is not changed.
pub fn set_links(
    catalog: &mut Catalog,
    name: Option<&str>,
    alias_override: Option<&str>,
    force: bool,
    exec: &mut Executor,
) -> Result<BatchReport> {
    catalog.create_or_load(exec.is_dry_run())?;
    let mut total = BatchReport::new();
    for item in select(catalog, name)? {
        match item.create_all_links(alias_override, force, exec) {
            Ok(report) => {
                info!(id = %item.id(), linked = report.done_count(), failed = report.failed_count(), "set links");
                total.merge(report);
            }
            Err(e) => {
                error!(id = %item.id(), error = %e, "cannot set links");
                total.record(item.storage_path(), StepOutcome::Failed(e.to_string()));
            }
        }
    }
    Ok(total.into_result("set links")?)
}

/// Remove the links created for the named item, or for every item.
/// Storage and catalog are left alone.
pub fn unset_links(
    catalog: &mut Catalog,
    name: Option<&str>,
    exec: &mut Executor,
) -> Result<BatchReport> {
    catalog.create_or_load(exec.is_dry_run())?;
    let mut total = BatchReport::new();
    for item in select(catalog, name)? {
        match item.delete_created_links(exec) {
            Ok(report) => {
                info!(id = %item.id(), removed = report.done_count(), "unset links");
                total.merge(report);
            }
            Err(e) => {
                error!(id = %item.id(), error = %e, "cannot unset links");
                total.record(item.storage_path(), StepOutcome::Failed(e.to_string()));
            }
        }
    }
    Ok(total.into_result("unset links")?)
}
