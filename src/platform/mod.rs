//! Platform-specific helpers.
//! This module hides OS differences (Unix/Windows) behind a uniform API so
//! the rest of the codebase can remain platform-agnostic.

mod temp;
#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

pub use temp::tmp_sibling_name;

#[cfg(unix)]
pub use unix::{atomic_replace, open_log_file_secure_append, symlink_file};

#[cfg(not(unix))]
pub use windows::{atomic_replace, open_log_file_secure_append, symlink_file};

/// Whether file name comparisons should ignore case on this platform.
/// Extension filters are case-folded when this is true.
pub const CASE_INSENSITIVE_PATHS: bool = cfg!(windows);

/// Fold `s` the way the host filesystem compares names.
pub fn os_case(s: &str) -> String {
    if CASE_INSENSITIVE_PATHS {
        s.to_lowercase()
    } else {
        s.to_owned()
    }
}
