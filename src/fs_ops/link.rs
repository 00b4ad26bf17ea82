//! Link engine.
//! Creates and removes the symlinks that mirror an item's storage subtree at
//! its external location.

use anyhow::{Result, bail};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use super::exec::{EntryKind, Executor};
use super::report::{BatchReport, StepOutcome};

/// Regular files under `storage`, relative to it, sorted.
pub fn stored_files(storage: &Path) -> Result<Vec<PathBuf>> {
    if !storage.is_dir() {
        bail!("item storage {} is not a readable directory", storage.display());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(storage).follow_links(false).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(storage) {
            files.push(rel.to_path_buf());
        }
    }
    Ok(files)
}

/// Create one link at `link` pointing at `target`.
///
/// - A directory (or a link to one) in the way is an error; links never replace directories.
/// - A file or link in the way is an error unless `force`, in which case it is removed first.
/// - A link that already points at exactly `target` is left as is.
/// - `target` is written verbatim so it may carry an alias or an unexpanded variable.
pub fn create_link(
    link: &Path,
    target: &Path,
    force: bool,
    exec: &mut Executor,
) -> Result<StepOutcome> {
    let existing = exec.probe(link)?;
    if existing.is_dir_like() {
        bail!(
            "cannot create link {} -> {}: a directory is in the way",
            link.display(),
            target.display()
        );
    }
    if existing != EntryKind::Missing {
        if existing.is_symlink() && exec.link_target(link).as_deref() == Some(target) {
            debug!(link = %link.display(), "link already in place");
            return Ok(StepOutcome::Skipped("already linked".into()));
        }
        if !force {
            bail!(
                "cannot create link {}: a file with the same name already exists (use --force to replace it)",
                link.display()
            );
        }
        exec.remove_file(link)?;
    }
    if let Some(parent) = link.parent() {
        exec.create_dir_all(parent)?;
    }
    exec.symlink(target, link)?;
    Ok(StepOutcome::Done)
}

/// Create every `(link, target)` pair, continuing past failures.
pub fn create_links<I>(pairs: I, force: bool, exec: &mut Executor) -> BatchReport
where
    I: IntoIterator<Item = (PathBuf, PathBuf)>,
{
    let mut report = BatchReport::new();
    for (link, target) in pairs {
        let outcome = match create_link(&link, &target, force, exec) {
            Ok(o) => o,
            Err(e) => {
                error!(link = %link.display(), error = %e, "link creation failed");
                StepOutcome::Failed(e.to_string())
            }
        };
        report.record(link, outcome);
    }
    report
}

/// Remove `link` only if it is a symlink; real files and directories stay.
pub fn delete_link(link: &Path, exec: &mut Executor) -> Result<StepOutcome> {
    let kind = exec.probe(link)?;
    if kind.is_symlink() {
        exec.remove_file(link)?;
        return Ok(StepOutcome::Done);
    }
    if kind == EntryKind::Missing {
        debug!(link = %link.display(), "no link to remove");
        return Ok(StepOutcome::Skipped("missing".into()));
    }
    info!(path = %link.display(), "not a symlink; left untouched");
    Ok(StepOutcome::Skipped("not a symlink".into()))
}

/// Remove every link in `links`, continuing past failures.
pub fn delete_links<I>(links: I, exec: &mut Executor) -> BatchReport
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut report = BatchReport::new();
    for link in links {
        let outcome = match delete_link(&link, exec) {
            Ok(o) => o,
            Err(e) => {
                warn!(link = %link.display(), error = %e, "link removal failed");
                StepOutcome::Failed(e.to_string())
            }
        };
        report.record(link, outcome);
    }
    report
}
