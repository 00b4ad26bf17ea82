//! Default path helpers and symlink checks.
//! Determines the config file location and detects symlinked ancestors for safety.

use anyhow::{Result, anyhow};
use dirs::config_dir;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::CONFIG_ENV;

/// Config file location: `$TAKE_OVER_CONFIG` if set, otherwise the OS config dir.
pub fn default_config_path() -> Result<PathBuf> {
    if let Some(p) = env::var_os(CONFIG_ENV) {
        let p = PathBuf::from(p);
        // A directory means "config.xml inside it".
        if p.is_dir() {
            return Ok(p.join("config.xml"));
        }
        return Ok(p);
    }
    if let Some(mut base) = config_dir() {
        base.push("take_over");
        base.push("config.xml");
        return Ok(base);
    }
    env::var_os("HOME")
        .map(|h| {
            PathBuf::from(h)
                .join(".config")
                .join("take_over")
                .join("config.xml")
        })
        .ok_or_else(|| anyhow!("cannot determine a config directory (no HOME)"))
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.exists() {
            let meta = fs::symlink_metadata(anc)?;
            if meta.file_type().is_symlink() {
                return Ok(true);
            }
        }
        p = anc.parent();
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn plain_tree_has_no_symlink_ancestor() {
        let td = tempdir().unwrap();
        let base = dunce::canonicalize(td.path()).unwrap();
        let nested = base.join("a").join("b.log");
        fs::create_dir_all(nested.parent().unwrap()).unwrap();
        assert!(!path_has_symlink_ancestor(&nested).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_parent_is_detected() {
        let td = tempdir().unwrap();
        let base = dunce::canonicalize(td.path()).unwrap();
        let real = base.join("real");
        fs::create_dir_all(&real).unwrap();
        std::os::unix::fs::symlink(&real, base.join("link")).unwrap();
        assert!(path_has_symlink_ancestor(&base.join("link").join("x.log")).unwrap());
    }
}
