//! Shared temporary name helpers for platform modules.
//! Provides unique sibling filenames for atomic write operations.
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a unique hidden sibling temp name for catalog/config atomic writes.
/// Pattern: .take_over.tmp.<pid>.<nanos>.<seq>
pub fn tmp_sibling_name(target: &Path) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    let name = format!(".take_over.tmp.{pid}.{nanos}.{seq}");
    target.parent().unwrap_or_else(|| Path::new(".")).join(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sibling_names_are_unique_and_hidden() {
        let target = Path::new("/srv/catalog/takeover_db.json");
        let mut set = HashSet::new();
        for _ in 0..16 {
            let p = tmp_sibling_name(target);
            assert_eq!(p.parent(), Some(Path::new("/srv/catalog")));
            assert!(p.file_name().unwrap().to_string_lossy().starts_with(".take_over.tmp."));
            assert!(set.insert(p));
        }
    }
}
