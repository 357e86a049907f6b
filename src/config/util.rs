//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find `name` in `start` or one of its ancestors.
///
/// An absolute `name` is returned as-is when it exists.
///
/// # Example
/// ```text
/// /home/user/app/src/lib/   ← start
/// /home/user/app/moonlit.toml ← found!
/// ```
pub fn find_upward(start: &Path, name: &Path) -> Option<PathBuf> {
    if name.is_absolute() {
        return name.exists().then(|| name.to_path_buf());
    }

    start
        .ancestors()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.exists())
}
