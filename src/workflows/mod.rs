//! Catalog-level workflows.
//!
//! Every workflow takes an explicit [`Catalog`] handle and an [`Executor`]; the
//! executor decides whether mutations happen or are only reported.

pub mod links;
pub mod list;
pub mod remove;
pub mod restore;
pub mod take_over;

pub use links::{set_links, unset_links};
pub use list::{ListStyle, format_listing, list};
pub use remove::remove_source;
pub use restore::{RestoreOptions, restore_source};
pub use take_over::{TakeOverOutcome, TakeOverRequest, take_over};

use anyhow::Result;
use tracing::{error, info, warn};

use crate::catalog::{Catalog, CreateOutcome, Item};
use crate::errors::TakeOverError;

/// Create an empty catalog in the catalog folder. An existing one is left untouched.
pub fn init(catalog: &Catalog, dry_run: bool) -> Result<CreateOutcome> {
    if dry_run {
        let outcome = if catalog.file_path().exists() {
            CreateOutcome::AlreadyExists
        } else {
            CreateOutcome::Created
        };
        info!(path = %catalog.file_path().display(), ?outcome, "dry-run: init");
        return Ok(outcome);
    }
    let outcome = catalog.create()?;
    if outcome == CreateOutcome::AlreadyExists {
        warn!(path = %catalog.file_path().display(), "catalog already exists; left as is");
    }
    Ok(outcome)
}

/// Re-capture an item with a new extension filter. Not available.
pub fn update(name: &str) -> Result<()> {
    error!(name, "update is not implemented");
    Err(TakeOverError::NotImplemented("update").into())
}

/// The named item, or every item when no name is given.
///
/// The list is a snapshot so callers may mutate the catalog while walking it.
pub(crate) fn select(catalog: &Catalog, name: Option<&str>) -> Result<Vec<Item>, TakeOverError> {
    match name {
        Some(token) => Ok(vec![catalog.find(token)?]),
        None => Ok(catalog.all().collect()),
    }
}
