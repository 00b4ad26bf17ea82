//! Mutation executor shared by every engine.
//!
//! All filesystem writes go through [`Executor`]. In a real run it performs the
//! write; in a dry run it only logs it. Either way the action is appended to an
//! ordered log, so a dry run yields the same action sequence a real run would.
//!
//! Dry runs keep a small overlay of planned changes so later existence checks
//! see the state the real run would have reached (a planned directory counts
//! as present, a planned removal as gone).

use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::helpers::io_error_with_help;
use crate::platform;

/// One filesystem mutation, attempted or planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    CreateDir(PathBuf),
    CopyFile { from: PathBuf, to: PathBuf },
    RemoveFile(PathBuf),
    RemoveTree(PathBuf),
    Symlink { link: PathBuf, target: PathBuf },
}

/// What currently sits at a path, without following a final symlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Missing,
    File,
    Dir,
    SymlinkToFile,
    SymlinkToDir,
    DanglingSymlink,
}

impl EntryKind {
    pub fn is_symlink(self) -> bool {
        matches!(
            self,
            EntryKind::SymlinkToFile | EntryKind::SymlinkToDir | EntryKind::DanglingSymlink
        )
    }

    /// Directory, or a link resolving to one.
    pub fn is_dir_like(self) -> bool {
        matches!(self, EntryKind::Dir | EntryKind::SymlinkToDir)
    }
}

#[derive(Debug, Clone)]
enum Planned {
    Dir,
    File,
    Gone,
    Link(PathBuf),
}

#[derive(Debug, Default)]
pub struct Executor {
    dry_run: bool,
    actions: Vec<Action>,
    overlay: HashMap<PathBuf, Planned>,
}

impl Executor {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Actions attempted (or planned) so far, in order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Inspect `path` without following a final symlink.
    pub fn probe(&self, path: &Path) -> io::Result<EntryKind> {
        if self.dry_run {
            if let Some(planned) = self.overlay.get(path) {
                return Ok(match planned {
                    Planned::Dir => EntryKind::Dir,
                    Planned::File => EntryKind::File,
                    Planned::Gone => EntryKind::Missing,
                    Planned::Link(_) => EntryKind::SymlinkToFile,
                });
            }
            let under_removed_tree = path
                .ancestors()
                .skip(1)
                .any(|a| matches!(self.overlay.get(a), Some(Planned::Gone)));
            if under_removed_tree {
                return Ok(EntryKind::Missing);
            }
        }
        probe_fs(path)
    }

    /// Target of the symlink at `path`, if it is one.
    pub fn link_target(&self, path: &Path) -> Option<PathBuf> {
        if self.dry_run {
            match self.overlay.get(path) {
                Some(Planned::Link(t)) => return Some(t.clone()),
                Some(_) => return None,
                None => {}
            }
        }
        fs::read_link(path).ok()
    }

    /// Ensure `dir` (and its ancestors) exist. Logs and records only when something is missing.
    pub fn create_dir_all(&mut self, dir: &Path) -> Result<()> {
        if self.probe(dir)?.is_dir_like() {
            return Ok(());
        }
        self.actions.push(Action::CreateDir(dir.to_path_buf()));
        if self.dry_run {
            info!(action = "mkdir -p", path = %dir.display(), "dry-run");
            for anc in dir.ancestors() {
                if matches!(self.overlay.get(anc), Some(Planned::Dir)) {
                    break;
                }
                self.overlay.insert(anc.to_path_buf(), Planned::Dir);
            }
            return Ok(());
        }
        fs::create_dir_all(dir).map_err(io_error_with_help("create directory", dir))?;
        debug!(path = %dir.display(), "created directory");
        Ok(())
    }

    /// Copy `from` to `to`, carrying over access and modification times.
    pub fn copy_file(&mut self, from: &Path, to: &Path) -> Result<()> {
        self.actions.push(Action::CopyFile {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
        if self.dry_run {
            info!(action = "copy", src = %from.display(), dest = %to.display(), "dry-run");
            self.overlay.insert(to.to_path_buf(), Planned::File);
            return Ok(());
        }
        fs::copy(from, to).map_err(io_error_with_help("copy file", to))?;
        let meta = fs::metadata(from).map_err(io_error_with_help("stat", from))?;
        let atime = filetime::FileTime::from_last_access_time(&meta);
        let mtime = filetime::FileTime::from_last_modification_time(&meta);
        filetime::set_file_times(to, atime, mtime)
            .map_err(io_error_with_help("set file times", to))?;
        debug!(src = %from.display(), dest = %to.display(), "copied file");
        Ok(())
    }

    /// Remove a file or a symlink (never follows the link).
    pub fn remove_file(&mut self, path: &Path) -> Result<()> {
        self.actions.push(Action::RemoveFile(path.to_path_buf()));
        if self.dry_run {
            info!(action = "rm", path = %path.display(), "dry-run");
            self.overlay.insert(path.to_path_buf(), Planned::Gone);
            return Ok(());
        }
        fs::remove_file(path).map_err(io_error_with_help("remove file", path))?;
        debug!(path = %path.display(), "removed file");
        Ok(())
    }

    /// Remove a directory and everything below it.
    pub fn remove_tree(&mut self, dir: &Path) -> Result<()> {
        self.actions.push(Action::RemoveTree(dir.to_path_buf()));
        if self.dry_run {
            info!(action = "rm -r", path = %dir.display(), "dry-run");
            self.overlay.retain(|p, _| !p.starts_with(dir));
            self.overlay.insert(dir.to_path_buf(), Planned::Gone);
            return Ok(());
        }
        fs::remove_dir_all(dir).map_err(io_error_with_help("remove directory tree", dir))?;
        debug!(path = %dir.display(), "removed directory tree");
        Ok(())
    }

    /// Create a symlink at `link` whose content is exactly `target`.
    pub fn symlink(&mut self, target: &Path, link: &Path) -> Result<()> {
        self.actions.push(Action::Symlink {
            link: link.to_path_buf(),
            target: target.to_path_buf(),
        });
        if self.dry_run {
            info!(action = "ln -s", link = %link.display(), target = %target.display(), "dry-run");
            self.overlay
                .insert(link.to_path_buf(), Planned::Link(target.to_path_buf()));
            return Ok(());
        }
        platform::symlink_file(target, link).map_err(io_error_with_help("create link", link))?;
        debug!(link = %link.display(), target = %target.display(), "created link");
        Ok(())
    }
}

fn probe_fs(path: &Path) -> io::Result<EntryKind> {
    let meta = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(EntryKind::Missing),
        Err(e) => return Err(e),
    };
    let ft = meta.file_type();
    if ft.is_symlink() {
        return Ok(match fs::metadata(path) {
            Ok(m) if m.is_dir() => EntryKind::SymlinkToDir,
            Ok(_) => EntryKind::SymlinkToFile,
            Err(_) => EntryKind::DanglingSymlink,
        });
    }
    Ok(if ft.is_dir() {
        EntryKind::Dir
    } else {
        EntryKind::File
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn dry_run_touches_nothing_but_records_everything() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.txt");
        fs::write(&src, "a").unwrap();
        let dest_dir = td.path().join("store").join("sub");
        let dest = dest_dir.join("a.txt");

        let mut exec = Executor::new(true);
        exec.create_dir_all(&dest_dir).unwrap();
        exec.copy_file(&src, &dest).unwrap();
        exec.remove_file(&src).unwrap();

        assert!(!td.path().join("store").exists());
        assert!(src.exists());
        assert_eq!(exec.actions().len(), 3);
        assert_eq!(exec.probe(&dest).unwrap(), EntryKind::File);
        assert_eq!(exec.probe(&src).unwrap(), EntryKind::Missing);
        // Ancestors of a planned directory count as present.
        assert!(exec.probe(&td.path().join("store")).unwrap().is_dir_like());
    }

    #[test]
    fn create_dir_all_is_silent_when_present() {
        let td = tempdir().unwrap();
        let mut exec = Executor::new(false);
        exec.create_dir_all(td.path()).unwrap();
        assert!(exec.actions().is_empty());
    }

    #[test]
    fn planned_tree_removal_hides_children() {
        let td = tempdir().unwrap();
        let tree = td.path().join("t");
        fs::create_dir_all(tree.join("x")).unwrap();
        fs::write(tree.join("x").join("f"), "f").unwrap();
        let mut exec = Executor::new(true);
        exec.remove_tree(&tree).unwrap();
        assert_eq!(exec.probe(&tree.join("x").join("f")).unwrap(), EntryKind::Missing);
        assert!(tree.join("x").join("f").exists());
    }

    #[test]
    fn real_copy_keeps_mtime() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.txt");
        fs::write(&src, "a").unwrap();
        let old = filetime::FileTime::from_unix_time(1_000_000_000, 0);
        filetime::set_file_mtime(&src, old).unwrap();
        let dest = td.path().join("b.txt");
        let mut exec = Executor::new(false);
        exec.copy_file(&src, &dest).unwrap();
        let m = fs::metadata(&dest).unwrap();
        assert_eq!(filetime::FileTime::from_last_modification_time(&m), old);
        assert_eq!(fs::read_to_string(&dest).unwrap(), "a");
    }

    #[cfg(unix)]
    #[test]
    fn probe_distinguishes_link_kinds() {
        let td = tempdir().unwrap();
        let dir = td.path().join("d");
        let file = td.path().join("f");
        fs::create_dir(&dir).unwrap();
        fs::write(&file, "x").unwrap();
        std::os::unix::fs::symlink(&dir, td.path().join("ld")).unwrap();
        std::os::unix::fs::symlink(&file, td.path().join("lf")).unwrap();
        std::os::unix::fs::symlink(td.path().join("nope"), td.path().join("ln")).unwrap();
        let exec = Executor::new(false);
        assert_eq!(exec.probe(&td.path().join("ld")).unwrap(), EntryKind::SymlinkToDir);
        assert_eq!(exec.probe(&td.path().join("lf")).unwrap(), EntryKind::SymlinkToFile);
        assert_eq!(exec.probe(&td.path().join("ln")).unwrap(), EntryKind::DanglingSymlink);
        assert_eq!(exec.probe(&td.path().join("zz")).unwrap(), EntryKind::Missing);
    }
}
