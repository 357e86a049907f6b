//! Compiler output and staging locations.

use std::path::{Path, PathBuf};

use crate::core::BuildMode;
use crate::module::PackageDescriptor;

/// Staged entry script, relative to the source root.
pub const STAGED_SCRIPT: &str = "main.js";
/// Staged source map, relative to the source root.
pub const STAGED_SOURCE_MAP: &str = "main.js.map";

/// Where the compiler writes the main package and where it gets staged.
///
/// Derived on demand from the mode and the selected package; never stored
/// across mode changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// `<root>/<mode root>/<relative_path>/<last_path>.js`
    pub output_js: PathBuf,
    /// `output_js` + `.map`; absent for most release builds.
    pub output_map: PathBuf,
    /// `<source dir>/main.js`
    pub staged_js: PathBuf,
    /// `<source dir>/main.js.map`
    pub staged_map: PathBuf,
}

impl ArtifactPaths {
    pub fn new(
        project_root: &Path,
        source_dir: &Path,
        mode: BuildMode,
        main: &PackageDescriptor,
    ) -> Self {
        let output_dir = project_root
            .join(mode.output_root())
            .join(&main.relative_path);

        Self {
            output_js: output_dir.join(format!("{}.js", main.last_path)),
            output_map: output_dir.join(format!("{}.js.map", main.last_path)),
            staged_js: source_dir.join(STAGED_SCRIPT),
            staged_map: source_dir.join(STAGED_SOURCE_MAP),
        }
    }
}
