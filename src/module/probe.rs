//! Module discovery.
//!
//! Reads `moon.mod.json` from the project root, then walks the source root
//! with an explicit worklist, collecting one [`PackageDescriptor`] per
//! `moon.pkg.json`. The dependency cache (`.mooncakes`) is never entered.

use std::fs::{self, DirEntry};
use std::path::{Component, Path};

use serde::Deserialize;

use super::{ModuleDescriptor, PackageDescriptor, PackageParseError, Project, ProjectError};
use crate::{debug, log};

pub const MODULE_FILE: &str = "moon.mod.json";
pub const PACKAGE_FILE: &str = "moon.pkg.json";
/// Downloaded dependencies; their packages are not part of the project.
pub const DEPENDENCY_DIR: &str = ".mooncakes";

/// Fields of `moon.mod.json` the probe consumes.
#[derive(Debug, Deserialize)]
struct ModuleFile {
    name: String,
    #[serde(default)]
    source: Option<String>,
}

/// Load the module rooted at `root` and all of its packages.
pub fn discover_module(root: &Path) -> Result<Project, ProjectError> {
    let module = read_module(root)?;
    let source_dir = super::source_dir(root, &module);
    let packages = probe_packages(&source_dir, &module);

    debug!("probe"; "{} package(s) under {}", packages.len(), source_dir.display());

    Ok(Project {
        root: root.to_path_buf(),
        module,
        packages,
    })
}

fn read_module(root: &Path) -> Result<ModuleDescriptor, ProjectError> {
    let path = root.join(MODULE_FILE);
    if !path.is_file() {
        return Err(ProjectError::ConfigNotFound(root.to_path_buf()));
    }

    let parse_error = |message: String| ProjectError::ModuleParse {
        path: path.clone(),
        message,
    };
    let content = fs::read_to_string(&path).map_err(|e| parse_error(e.to_string()))?;
    let file: ModuleFile = serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?;

    let source_root = file
        .source
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| ".".to_string());

    Ok(ModuleDescriptor {
        source_root: source_root.into(),
        module_path: file.name,
    })
}

/// Walk `source_dir` depth-first and collect every package.
///
/// Unreadable directories and malformed package files are logged and skipped.
/// Symlinked directories are not followed. The result is sorted by `relative_path`.
pub fn probe_packages(source_dir: &Path, module: &ModuleDescriptor) -> Vec<PackageDescriptor> {
    let mut packages = Vec::new();
    let mut worklist = vec![source_dir.to_path_buf()];

    while let Some(dir) = worklist.pop() {
        let entries = match read_dir_sorted(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                log!("probe"; "cannot read {}: {}", dir.display(), e);
                continue;
            }
        };

        for entry in entries {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let name = entry.file_name();

            if file_type.is_dir() {
                if name != DEPENDENCY_DIR {
                    worklist.push(entry.path());
                }
            } else if name == PACKAGE_FILE {
                match read_package(&entry.path(), source_dir, module) {
                    Ok(package) => packages.push(package),
                    Err(e) => log!("probe"; "skipping package: {}", e),
                }
            }
        }
    }

    packages.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    packages
}

fn read_dir_sorted(dir: &Path) -> std::io::Result<Vec<DirEntry>> {
    let mut entries = fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(DirEntry::file_name);
    Ok(entries)
}

fn read_package(
    file: &Path,
    source_dir: &Path,
    module: &ModuleDescriptor,
) -> Result<PackageDescriptor, PackageParseError> {
    let content =
        fs::read_to_string(file).map_err(|e| PackageParseError::Io(file.to_path_buf(), e))?;
    let json: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| PackageParseError::Json(file.to_path_buf(), e))?;

    let is_main = json
        .get("is-main")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false);

    Ok(PackageDescriptor::new(
        &module.module_path,
        relative_dir(file, source_dir),
        is_main,
    ))
}

/// Containing directory of `file` relative to `source_dir`, `/`-separated.
fn relative_dir(file: &Path, source_dir: &Path) -> String {
    let Some(rel) = file.parent().and_then(|p| p.strip_prefix(source_dir).ok()) else {
        return String::new();
    };

    rel.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
