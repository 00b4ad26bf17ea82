//! Copy engine.
//! - capture: original tree (or single file) -> storage subtree
//! - restore: storage subtree -> original location
//!
//! Both walks skip symlinks, honor the extension filter, keep relative paths,
//! and continue past per-file failures; the returned report carries the verdict.

use anyhow::{Result, anyhow, bail};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use super::exec::{EntryKind, Executor};
use super::report::{BatchReport, StepOutcome};
use crate::catalog::ExtensionFilter;

/// Result of a capture walk.
#[derive(Debug, Default)]
pub struct Capture {
    pub report: BatchReport,
    /// Captured files relative to the storage root, in walk order.
    pub files: Vec<PathBuf>,
}

impl Capture {
    pub fn is_success(&self) -> bool {
        self.report.is_success()
    }
}

fn copy_into(src: &Path, dest: &Path, exec: &mut Executor) -> Result<()> {
    let parent = dest
        .parent()
        .ok_or_else(|| anyhow!("destination has no parent: {}", dest.display()))?;
    exec.create_dir_all(parent)?;
    exec.copy_file(src, dest)
}

/// Copy `original` into `storage`.
///
/// A directory is walked recursively (sorted, so runs are reproducible); a
/// single file lands at `storage/<file name>` and ignores the filter.
pub fn capture(
    original: &Path,
    storage: &Path,
    filter: &ExtensionFilter,
    exec: &mut Executor,
) -> Capture {
    let mut out = Capture::default();

    match exec.probe(original) {
        Ok(EntryKind::Dir) => {}
        Ok(EntryKind::File) => {
            let Some(name) = original.file_name() else {
                out.report.record(original, StepOutcome::Failed("path has no file name".into()));
                return out;
            };
            let rel = PathBuf::from(name);
            match copy_into(original, &storage.join(&rel), exec) {
                Ok(()) => {
                    out.report.record(original, StepOutcome::Done);
                    out.files.push(rel);
                }
                Err(e) => {
                    error!(src = %original.display(), error = %e, "capture failed");
                    out.report.record(original, StepOutcome::Failed(e.to_string()));
                }
            }
            return out;
        }
        Ok(other) => {
            let msg = format!("cannot capture {other:?}");
            error!(path = %original.display(), "{msg}");
            out.report.record(original, StepOutcome::Failed(msg));
            return out;
        }
        Err(e) => {
            error!(path = %original.display(), error = %e, "cannot inspect capture source");
            out.report.record(original, StepOutcome::Failed(e.to_string()));
            return out;
        }
    }

    for entry in WalkDir::new(original).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                let path = e.path().unwrap_or(original).to_path_buf();
                error!(path = %path.display(), error = %e, "walk failed");
                out.report.record(path, StepOutcome::Failed(e.to_string()));
                continue;
            }
        };
        let ft = entry.file_type();
        if ft.is_symlink() {
            debug!(path = %entry.path().display(), "skipping symlink");
            out.report.record(entry.path(), StepOutcome::Skipped("symlink".into()));
            continue;
        }
        if !ft.is_file() || !filter.matches(entry.path()) {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(original) else {
            continue;
        };
        let rel = rel.to_path_buf();
        match copy_into(entry.path(), &storage.join(&rel), exec) {
            Ok(()) => {
                out.report.record(entry.path(), StepOutcome::Done);
                out.files.push(rel);
            }
            Err(e) => {
                error!(src = %entry.path().display(), error = %e, "capture failed");
                out.report.record(entry.path(), StepOutcome::Failed(e.to_string()));
            }
        }
    }
    out
}

/// Put `src` at `dest`, replacing an existing file or link only with `force`.
fn place_file(src: &Path, dest: &Path, force: bool, exec: &mut Executor) -> StepOutcome {
    let kind = match exec.probe(dest) {
        Ok(k) => k,
        Err(e) => return StepOutcome::Failed(e.to_string()),
    };
    match kind {
        EntryKind::Missing => {}
        EntryKind::Dir => {
            error!(dest = %dest.display(), "cannot restore file: a directory is in the way");
            return StepOutcome::Failed("a directory is in the way".into());
        }
        _ if !force => {
            info!(
                dest = %dest.display(),
                "file already exists in destination; not restored (use --force to replace it)"
            );
            return StepOutcome::Skipped("destination exists".into());
        }
        _ => {
            if let Err(e) = exec.remove_file(dest) {
                error!(dest = %dest.display(), error = %e, "cannot replace destination");
                return StepOutcome::Failed(e.to_string());
            }
        }
    }
    match copy_into(src, dest, exec) {
        Ok(()) => StepOutcome::Done,
        Err(e) => {
            error!(src = %src.display(), dest = %dest.display(), error = %e, "restore failed");
            StepOutcome::Failed(e.to_string())
        }
    }
}

/// Regular files directly inside `dir`, sorted.
fn files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(super::io_error_with_help("read directory", dir))? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Copy stored files from `stored` back under `original`.
///
/// `stored` is read through the storage alias, which may be a different mount
/// than the path the catalog itself uses.
pub fn restore(
    stored: &Path,
    original: &Path,
    is_file: bool,
    filter: &ExtensionFilter,
    force: bool,
    exec: &mut Executor,
) -> Result<BatchReport> {
    let mut report = BatchReport::new();

    if is_file {
        let files = files_in(stored)?;
        let [only] = files.as_slice() else {
            bail!(
                "item storage {} should hold exactly one file but holds {}",
                stored.display(),
                files.len()
            );
        };
        report.record(original, place_file(only, original, force, exec));
        return Ok(report);
    }

    if !stored.is_dir() {
        bail!("item storage {} is not a readable directory", stored.display());
    }

    for entry in WalkDir::new(stored).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                let path = e.path().unwrap_or(stored).to_path_buf();
                error!(path = %path.display(), error = %e, "walk failed");
                report.record(path, StepOutcome::Failed(e.to_string()));
                continue;
            }
        };
        let ft = entry.file_type();
        if ft.is_symlink() {
            warn!(path = %entry.path().display(), "symlink inside item storage; skipped");
            continue;
        }
        if !ft.is_file() || !filter.matches(entry.path()) {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(stored) else {
            continue;
        };
        let dest = original.join(rel);
        let outcome = place_file(entry.path(), &dest, force, exec);
        report.record(dest, outcome);
    }
    Ok(report)
}
