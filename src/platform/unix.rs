//! Unix implementations of platform helpers.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::Path;

use super::temp::tmp_sibling_name;

/// Open log file for appending; set 0600 only when creating a new file.
/// If the file already exists, we preserve its existing permissions to avoid
/// clobbering administrator adjustments (e.g. group-readable for log shipping).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let existed = path.exists();
    let f = OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600) // applies on create
        .open(path)?;
    if !existed {
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(f)
}

/// Replace `path` with `contents` atomically.
///
/// Steps:
/// - Create a unique hidden temp sibling with O_EXCL semantics
/// - Write contents, fsync temp, rename over the destination, fsync parent dir
/// - On failure, remove the temp file best-effort and return the error
pub fn atomic_replace(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no parent"))?;

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

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e)
            .with_context(|| format!("rename '{}' -> '{}'", tmp.display(), path.display()));
    }

    // Persist the rename; a failed directory fsync does not undo a successful write.
    if let Ok(dir) = File::open(parent) {
        let _ = dir.sync_all();
    }
    Ok(())
}

/// Create a symlink at `link` whose content is `target`, verbatim.
pub fn symlink_file(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn log_file_created_with_0600() {
        let td = tempdir().unwrap();
        let p = td.path().join("logs").join("take_over.log");
        let _f = open_log_file_secure_append(&p).unwrap();
        let mode = fs::metadata(&p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn atomic_replace_overwrites_and_leaves_no_temp() {
        let td = tempdir().unwrap();
        let p = td.path().join("takeover_db.json");
        fs::write(&p, "old").unwrap();
        atomic_replace(&p, b"{}").unwrap();
        assert_eq!(fs::read_to_string(&p).unwrap(), "{}");
        let leftovers: Vec<_> = fs::read_dir(td.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".take_over.tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn symlink_keeps_unresolved_target_text() {
        let td = tempdir().unwrap();
        let link = td.path().join("cfg.ini");
        symlink_file(Path::new("$STORE_ROOT/20240101_cfg/cfg.ini"), &link).unwrap();
        assert_eq!(
            fs::read_link(&link).unwrap(),
            Path::new("$STORE_ROOT/20240101_cfg/cfg.ini")
        );
    }
}
