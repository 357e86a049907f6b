//! Shared fixtures for unit tests.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::module::{PackageDescriptor, Project, discover_module};
use crate::utils::path::normalize_path;

/// Write `content` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Module `demo` with source root `src`, main package `a` and plain package `b`.
pub fn demo_project() -> (TempDir, Project) {
    let temp = TempDir::new().unwrap();
    let root = normalize_path(temp.path());

    write_file(&root, "moon.mod.json", r#"{ "name": "demo", "source": "src" }"#);
    write_file(&root, "src/a/moon.pkg.json", r#"{ "is-main": true }"#);
    write_file(&root, "src/b/moon.pkg.json", r#"{ "is-main": false }"#);

    let project = discover_module(&root).unwrap();
    (temp, project)
}

pub fn main_of(project: &Project) -> &PackageDescriptor {
    crate::module::select_main(&project.packages, None).unwrap()
}

/// A compiler command running `script` through `sh -c`.
///
/// The build arguments arrive as `$1..$4` (`build --target js --debug|--release`).
pub fn fake_compiler(script: &str) -> Vec<String> {
    ["sh", "-c", script, "sh"]
        .into_iter()
        .map(String::from)
        .collect()
}
