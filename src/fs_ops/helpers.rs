//! I/O helper utilities.
//!
//! Enriches io::Error with the operation, the path and an actionable hint.
//!
//! Usage:
//!   fs::create_dir_all(dir).map_err(io_error_with_help("create directory", dir))?;

use anyhow::anyhow;
use std::io;
use std::path::Path;

/// Hint keyed by raw OS error code.
#[cfg(unix)]
fn os_hint(code: i32) -> Option<&'static str> {
    let hint = match code {
        libc::EACCES | libc::EPERM => "permission denied; check ownership and write permissions",
        libc::ENOENT => "path not found; verify it exists",
        libc::EEXIST => "already exists; use --force to replace it",
        libc::EISDIR => "a directory is in the way",
        libc::ENOTDIR => "a file is in the way of a directory component",
        libc::ENOTEMPTY => "directory not empty",
        libc::ENOSPC => "insufficient space on device",
        libc::EROFS => "read-only filesystem; cannot write here",
        libc::ELOOP => "too many symbolic link levels; possible symlink cycle",
        libc::ENAMETOOLONG => "filename or path too long; shorten path segments",
        libc::EMFILE => "process file descriptor limit reached",
        _ => return None,
    };
    Some(hint)
}

#[cfg(windows)]
fn os_hint(code: i32) -> Option<&'static str> {
    let hint = match code {
        5 => "access denied; check permissions",           // ERROR_ACCESS_DENIED
        2 | 3 => "path not found; verify it exists",       // FILE / PATH NOT FOUND
        32 => "sharing violation; file is in use",         // ERROR_SHARING_VIOLATION
        80 | 183 => "already exists; use --force to replace it", // FILE_EXISTS / ALREADY_EXISTS
        112 => "insufficient disk space",                  // ERROR_DISK_FULL
        206 => "filename or path too long",                // ERROR_FILENAME_EXCED_RANGE
        1314 => "creating symlinks needs Developer Mode or an elevated shell", // PRIVILEGE_NOT_HELD
        _ => return None,
    };
    Some(hint)
}

#[cfg(not(any(unix, windows)))]
fn os_hint(_code: i32) -> Option<&'static str> {
    None
}

fn kind_hint(kind: io::ErrorKind) -> Option<&'static str> {
    match kind {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and write permissions"),
        io::ErrorKind::NotFound => Some("path not found; verify it exists"),
        io::ErrorKind::AlreadyExists => Some("already exists; use --force to replace it"),
        _ => None,
    }
}

/// Format a human-friendly message with op/path plus platform-aware hints.
fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    let hint = match e.raw_os_error() {
        Some(code) => os_hint(code),
        None => kind_hint(e.kind()),
    };
    if let Some(hint) = hint {
        msg.push_str(" (");
        msg.push_str(hint);
        msg.push(')');
    }
    if let Some(code) = e.raw_os_error() {
        msg.push_str(&format!(" [os code: {code}]"));
    }
    msg
}

/// Adapter for anyhow::Result code.
/// Returns a closure suitable for `.map_err(...)` that converts io::Error -> anyhow::Error.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| anyhow!(build_message(op, path, &e))
}
