//! Main package selection.

use super::{PackageDescriptor, ProjectError};
use crate::log;

/// Pick the package the build is driven from.
///
/// Only packages marked `is-main` are candidates. A `hint` selects the first
/// candidate whose `relative_path` ends with it. Without a hint, or when the
/// hint matches nothing, the candidate with the smallest `relative_path` wins.
pub fn select_main<'a>(
    packages: &'a [PackageDescriptor],
    hint: Option<&str>,
) -> Result<&'a PackageDescriptor, ProjectError> {
    let mut mains: Vec<_> = packages.iter().filter(|p| p.is_main).collect();
    mains.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    let Some(&fallback) = mains.first() else {
        return Err(ProjectError::NoMainPackage);
    };

    if let Some(hint) = hint {
        if let Some(found) = mains.iter().find(|p| p.relative_path.ends_with(hint)) {
            return Ok(*found);
        }
        log!("main"; "no main package matches `{}`", hint);
    }

    if mains.len() > 1 {
        let names: Vec<_> = mains.iter().map(|p| p.package_path.as_str()).collect();
        log!(
            "main";
            "{} main packages ({}), using `{}`; pass --main to choose",
            mains.len(),
            names.join(", "),
            fallback.package_path
        );
    }

    Ok(fallback)
}
