//! Read-only listing of catalog entries.

use anyhow::Result;

use crate::catalog::{Catalog, Item, id_suffix};

const NAME_CELL: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListStyle {
    /// Item names only.
    #[default]
    Brief,
    /// Name and id.
    Verbose,
    /// Every record field.
    VeryVerbose,
}

fn short_name(item: &Item) -> &str {
    id_suffix(item.id()).unwrap_or(item.id())
}

fn describe(item: &Item) -> String {
    let r = item.record();
    let extensions = match &r.extension_filter {
        Some(f) if !f.is_empty() => f.suffixes().collect::<Vec<_>>().join(", "),
        _ => "(all files)".to_string(),
    };
    format!(
        "{id}\n  name:                  {name}\n  is file:               {is_file}\n  original path:         {orig}\n  default database path: {alias}\n  symlink path:          {link}\n  extensions:            {extensions}",
        id = r.id,
        name = r.name,
        is_file = r.is_file,
        orig = r.original_path.display(),
        alias = r.storage_root_alias,
        link = r.link_target_path.display(),
    )
}

/// One output line (or block) per item, in id order.
pub fn format_listing(catalog: &Catalog, style: ListStyle) -> Vec<String> {
    catalog
        .all()
        .map(|item| match style {
            ListStyle::Brief => short_name(&item).to_string(),
            ListStyle::Verbose => format!("{:<NAME_CELL$}  {}", short_name(&item), item.id()),
            ListStyle::VeryVerbose => describe(&item),
        })
        .collect()
}

/// Load the catalog and format it. Never writes; a missing catalog is an error.
pub fn list(catalog: &mut Catalog, style: ListStyle) -> Result<Vec<String>> {
    catalog.load()?;
    Ok(format_listing(catalog, style))
}
