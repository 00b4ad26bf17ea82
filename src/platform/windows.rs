//! Windows implementations of platform helpers (best-effort, no ACL awareness).
//!
//! Notes:
//! - Creating symlinks requires Developer Mode or the SeCreateSymbolicLink privilege.
//! - Catalog writes are done via temp + rename to be atomic.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use super::temp::tmp_sibling_name;

/// Open log file for appending (best-effort; no symlink defense available via std on Windows).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Replace `path` with `contents` using a temp sibling + rename.
pub fn atomic_replace(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp = tmp_sibling_name(path);
    let mut f = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp)
        .with_context(|| format!("create temp '{}'", tmp.display()))?;
    if let Err(e) = f.write_all(contents).and_then(|_| f.sync_all()) {
        drop(f);
        let _ = fs::remove_file(&tmp);
        return Err(e).with_context(|| format!("write temp '{}'", tmp.display()));
    }
    drop(f);
    // std's rename maps to MoveFileExW(MOVEFILE_REPLACE_EXISTING).
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e)
            .with_context(|| format!("rename '{}' -> '{}'", tmp.display(), path.display()));
    }
    Ok(())
}

/// Create a file symlink at `link` whose content is `target`, verbatim.
pub fn symlink_file(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
