//! Build orchestration.
//!
//! Runs the external compiler as a blocking subprocess and stages the main
//! package's output at fixed paths under the source root:
//!
//! ```text
//! moon build --target js --debug
//!   target/js/debug/build/<pkg>/<last>.js      -> <source>/main.js
//!   target/js/debug/build/<pkg>/<last>.js.map  -> <source>/main.js.map  (if present)
//! ```

mod artifact;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::{Duration, Instant};

use thiserror::Error;

pub use artifact::ArtifactPaths;

use crate::core::{BuildContext, BuildMode};
use crate::module::{PackageDescriptor, Project};
use crate::utils::exec::{Cmd, FilterRule};

/// Progress lines the compiler prints on every successful run.
const COMPILER_FILTER: FilterRule = FilterRule::new(&["Finished.", "moon: no work to do"]);

/// Build failures. The caller decides whether they are fatal.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The compiler ran and exited non-zero. `output` is stdout followed by stderr.
    #[error("compiler exited with {status}")]
    Failed { status: ExitStatus, output: String },

    #[error("failed to execute `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to stage `{}` as `{}`: {}", .from.display(), .to.display(), .source)]
    Stage {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BuildError {
    /// Diagnostic text for terminals and overlays: the compiler's own output
    /// when it ran, otherwise the error message.
    pub fn detail(&self) -> String {
        match self {
            Self::Failed { output, .. } => output.clone(),
            other => other.to_string(),
        }
    }
}

/// Outcome of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub elapsed: Duration,
    /// Whether a source map was staged alongside the script.
    pub source_map: bool,
}

/// Drives the compiler for one selected main package.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    /// Command prefix, e.g. `["moon"]`.
    compiler: Vec<String>,
    project_root: PathBuf,
    source_dir: PathBuf,
    main: PackageDescriptor,
}

impl Orchestrator {
    pub fn new(project: &Project, main: &PackageDescriptor, compiler: Vec<String>) -> Self {
        Self {
            compiler,
            project_root: project.root.clone(),
            source_dir: project.source_dir(),
            main: main.clone(),
        }
    }

    pub fn main_package(&self) -> &PackageDescriptor {
        &self.main
    }

    pub fn artifacts(&self, mode: BuildMode) -> ArtifactPaths {
        ArtifactPaths::new(&self.project_root, &self.source_dir, mode, &self.main)
    }

    /// Compile in `ctx.mode` and stage the output.
    ///
    /// `ctx.has_error` reflects the result afterwards.
    pub fn run_build(&self, ctx: &mut BuildContext) -> Result<BuildReport, BuildError> {
        let result = self.compile_and_stage(ctx.mode);
        ctx.has_error = result.is_err();
        result
    }

    fn compile_and_stage(&self, mode: BuildMode) -> Result<BuildReport, BuildError> {
        let started = Instant::now();

        let cmd = Cmd::from_slice(&self.compiler)
            .args(["build", "--target", "js", mode.flag()])
            .cwd(&self.project_root);
        let program = cmd.program_name();
        crate::debug!("build"; "running {} ({})", program, mode);

        let output = cmd
            .output()
            .map_err(|source| BuildError::Spawn { program, source })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            return Err(BuildError::Failed {
                status: output.status,
                output: format!("{stdout}{stderr}"),
            });
        }

        COMPILER_FILTER.log("moon", &format!("{stdout}{stderr}"));

        let paths = self.artifacts(mode);
        stage(&paths.output_js, &paths.staged_js)?;

        // Release builds usually emit no source map; leave any staged one alone.
        let source_map = paths.output_map.is_file();
        if source_map {
            stage(&paths.output_map, &paths.staged_map)?;
        }

        Ok(BuildReport {
            elapsed: started.elapsed(),
            source_map,
        })
    }
}

fn stage(from: &Path, to: &Path) -> Result<(), BuildError> {
    fs::copy(from, to)
        .map(|_| ())
        .map_err(|source| BuildError::Stage {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        })
}
