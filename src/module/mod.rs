//! MoonBit module layout.
//!
//! - `probe` - read `moon.mod.json` and find every `moon.pkg.json` under the source root
//! - `resolve` - pick the main package the build is driven from

mod probe;
mod resolve;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use probe::{DEPENDENCY_DIR, MODULE_FILE, discover_module};
pub use resolve::select_main;

/// Contents of `moon.mod.json` that drive discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    /// Source directory relative to the project root (`"."` when unset).
    pub source_root: PathBuf,
    /// Logical namespace root, e.g. `username/app`.
    pub module_path: String,
}

/// One directory holding a `moon.pkg.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    /// `module_path` joined with `relative_path`.
    pub package_path: String,
    /// Directory relative to the source root, `/`-separated. Empty for the source root itself.
    pub relative_path: String,
    pub is_main: bool,
    /// Final segment of `package_path`; the compiler names its output after it.
    pub last_path: String,
}

impl PackageDescriptor {
    pub fn new(module_path: &str, relative_path: impl Into<String>, is_main: bool) -> Self {
        let relative_path = relative_path.into();
        let package_path = join_package_path(module_path, &relative_path);
        let last_path = package_path
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();

        Self {
            package_path,
            relative_path,
            is_main,
            last_path,
        }
    }
}

fn join_package_path(module_path: &str, relative_path: &str) -> String {
    match (
        module_path.trim_end_matches('/'),
        relative_path.trim_matches('/'),
    ) {
        (module, "") => module.to_string(),
        ("", relative) => relative.to_string(),
        (module, relative) => format!("{module}/{relative}"),
    }
}

/// A discovered module: its descriptor plus every package under the source root.
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory holding `moon.mod.json`; the compiler runs here.
    pub root: PathBuf,
    pub module: ModuleDescriptor,
    /// Sorted by `relative_path`.
    pub packages: Vec<PackageDescriptor>,
}

impl Project {
    /// Absolute source directory (`root` joined with `source_root`, without `.` segments).
    pub fn source_dir(&self) -> PathBuf {
        source_dir(&self.root, &self.module)
    }
}

pub(crate) fn source_dir(root: &Path, module: &ModuleDescriptor) -> PathBuf {
    root.join(&module.source_root).components().collect()
}

/// Fatal discovery and selection errors.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("cannot find MoonBit module (moon.mod.json) in `{}`", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("invalid module descriptor `{}`: {}", .path.display(), .message)]
    ModuleParse { path: PathBuf, message: String },

    #[error("no main package found (mark one with `\"is-main\": true` in its moon.pkg.json)")]
    NoMainPackage,
}

/// A `moon.pkg.json` that could not be read. Recovered by skipping the package.
#[derive(Debug, Error)]
pub enum PackageParseError {
    #[error("cannot read `{}`: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid JSON in `{}`: {}", .0.display(), .1)]
    Json(PathBuf, #[source] serde_json::Error),
}
