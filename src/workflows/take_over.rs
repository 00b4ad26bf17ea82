//! Take-over: capture a file or directory into the catalog and put links in its place.

use anyhow::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::catalog::{Catalog, ExtensionFilter, Item, ItemRecord, new_id};
use crate::errors::TakeOverError;
use crate::fs_ops::{BatchReport, Executor, io_error_with_help};

/// What to take over and how links should refer to storage.
#[derive(Debug, Clone, Default)]
pub struct TakeOverRequest {
    pub path: PathBuf,
    /// Path written into links instead of the catalog folder.
    pub storage_alias: Option<String>,
    /// Restrict capture to these extensions (directories only). Empty means all files.
    pub extensions: Vec<String>,
}

#[derive(Debug)]
pub struct TakeOverOutcome {
    pub id: String,
    pub captured: usize,
    pub links: BatchReport,
}

fn absolute(path: &Path) -> Result<PathBuf> {
    let abs = std::path::absolute(path).map_err(io_error_with_help("resolve path", path))?;
    Ok(dunce::simplified(&abs).to_path_buf())
}

/// True when either path lies inside the other, compared lexically and, where
/// both resolve, after following symlinked ancestors.
fn overlaps(a: &Path, b: &Path) -> bool {
    let nested = |x: &Path, y: &Path| x.starts_with(y) || y.starts_with(x);
    if nested(a, b) {
        return true;
    }
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(a), Ok(b)) => nested(&a, &b),
        _ => false,
    }
}

/// Capture `req.path` into `catalog`, delete the captured originals and link them back.
///
/// The catalog entry is only persisted after a complete capture. Any failure
/// before that point removes the partial storage subtree again.
pub fn take_over(
    catalog: &mut Catalog,
    req: &TakeOverRequest,
    exec: &mut Executor,
) -> Result<TakeOverOutcome> {
    let meta = match fs::symlink_metadata(&req.path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            error!(path = %req.path.display(), "cannot take over: path does not exist");
            return Err(TakeOverError::SourceNotFound(req.path.clone()).into());
        }
        Err(e) => return Err(io_error_with_help("inspect", &req.path)(e)),
    };
    if meta.file_type().is_symlink() {
        error!(path = %req.path.display(), "cannot take over: path is a symbolic link");
        return Err(TakeOverError::SourceIsSymlink(req.path.clone()).into());
    }

    let original = absolute(&req.path)?;
    let name = original
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| TakeOverError::SourceNotFound(original.clone()))?;

    // Links must resolve from wherever they live, so storage is addressed absolutely.
    let catalog_dir = absolute(catalog.dir())?;
    if overlaps(&original, &catalog_dir) {
        error!(
            path = %original.display(),
            catalog = %catalog_dir.display(),
            "cannot take over: path overlaps the catalog folder"
        );
        return Err(TakeOverError::OverlapsCatalog {
            path: original,
            catalog: catalog_dir,
        }
        .into());
    }

    catalog.create_or_load(exec.is_dry_run())?;

    let id = new_id(&name);
    if catalog.contains(&id) || catalog.dir().join(&id).exists() {
        error!(id = %id, "item id already in use");
        return Err(TakeOverError::IdCollision(id).into());
    }

    let filter = ExtensionFilter::new(&req.extensions);
    let is_file = meta.is_file();
    if is_file && !filter.is_empty() {
        warn!(path = %original.display(), "extension filter ignored for a single file");
    }
    let record = ItemRecord {
        name,
        id: id.clone(),
        is_file,
        original_path: original.clone(),
        storage_root_alias: req
            .storage_alias
            .clone()
            .unwrap_or_else(|| catalog_dir.to_string_lossy().into_owned()),
        link_target_path: original.clone(),
        extension_filter: (!is_file && !filter.is_empty()).then_some(filter),
    };
    let item = Item::new(record.clone(), catalog.dir());
    let storage = item.storage_path();
    info!(id = %id, src = %original.display(), storage = %storage.display(), "taking over");

    exec.create_dir_all(&storage)?;
    let capture = item.capture(exec);
    if !capture.is_success() || capture.files.is_empty() {
        let err = if capture.files.is_empty() && capture.is_success() {
            TakeOverError::NothingCaptured(original.clone())
        } else {
            TakeOverError::PartialFailure {
                op: "capture",
                failed: capture.report.failed_count(),
            }
        };
        error!(id = %id, error = %err, "capture failed; discarding storage");
        if let Err(e) = exec.remove_tree(&storage) {
            error!(path = %storage.display(), error = %e, "cannot clean up storage");
        }
        return Err(err.into());
    }

    if !exec.is_dry_run() {
        catalog.insert(record)?;
        if let Err(e) = catalog.save() {
            error!(id = %id, error = %e, "cannot persist catalog; rolling back");
            catalog.forget(&id);
            if let Err(e) = exec.remove_tree(&storage) {
                error!(path = %storage.display(), error = %e, "cannot clean up storage");
            }
            return Err(e.into());
        }
    }

    let mut report = item.delete_original_files(&capture.files, exec);
    let links = item.create_links_for(&capture.files, None, true, exec);
    report.merge(links.clone());
    report.into_result("take over")?;

    info!(id = %id, files = capture.files.len(), "took over");
    Ok(TakeOverOutcome {
        id,
        captured: capture.files.len(),
        links,
    })
}
