//! Rebuild decision for file-change batches.
//!
//! Pure decision plus one blocking build; no threads, no queue. A batch made
//! only of the staged artifacts (written by the previous build) is dropped,
//! which keeps each rebuild from triggering the next one.

use std::path::{Path, PathBuf};

use super::message::HotPayload;
use crate::build::{ArtifactPaths, BuildError, Orchestrator};
use crate::core::BuildContext;
use crate::logger::{status_error, status_success};
use crate::utils::path::normalize_path;

/// Outgoing notification channel to the clients of a dev session.
pub trait HotChannel {
    fn send(&mut self, payload: HotPayload);
}

/// Collects payloads in memory.
impl HotChannel for Vec<HotPayload> {
    fn send(&mut self, payload: HotPayload) {
        self.push(payload);
    }
}

/// What a change batch led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotOutcome {
    /// Only staged artifacts changed; nothing built, nothing sent.
    Ignored,
    /// Rebuilt; one full reload sent.
    Reloaded,
    /// Rebuild failed; one error overlay sent.
    Failed,
}

/// Hot-update coordinator for one dev session.
#[derive(Debug, Clone)]
pub struct HotUpdate {
    staged_js: PathBuf,
    staged_map: PathBuf,
    /// Leading lines dropped from compiler output before it reaches the overlay.
    skip_lines: usize,
}

impl HotUpdate {
    pub fn new(artifacts: &ArtifactPaths, skip_lines: usize) -> Self {
        Self {
            staged_js: artifacts.staged_js.clone(),
            staged_map: artifacts.staged_map.clone(),
            skip_lines,
        }
    }

    /// Whether `path` is one of the files the orchestrator writes.
    pub fn is_staged_artifact(&self, path: &Path) -> bool {
        let path = normalize_path(path);
        path == normalize_path(&self.staged_js) || path == normalize_path(&self.staged_map)
    }

    /// Handle one batch of changed files.
    pub fn on_files_changed<C: HotChannel + ?Sized>(
        &self,
        orchestrator: &Orchestrator,
        ctx: &mut BuildContext,
        changed: &[PathBuf],
        channel: &mut C,
    ) -> HotOutcome {
        let relevant: Vec<_> = changed
            .iter()
            .filter(|path| !self.is_staged_artifact(path))
            .collect();

        let Some(first) = relevant.first() else {
            crate::debug!("hot"; "only staged artifacts changed, skipping");
            return HotOutcome::Ignored;
        };

        crate::debug!("hot"; "{} changed ({} file(s)), rebuilding", first.display(), relevant.len());

        match orchestrator.run_build(ctx) {
            Ok(report) => {
                status_success(&format!(
                    "rebuilt {} in {}ms",
                    orchestrator.main_package().package_path,
                    report.elapsed.as_millis()
                ));
                channel.send(HotPayload::full_reload());
                HotOutcome::Reloaded
            }
            Err(err) => {
                let message = self.overlay_message(&err);
                status_error("build failed", &err.detail());
                channel.send(HotPayload::error(message));
                HotOutcome::Failed
            }
        }
    }

    /// Overlay text for a failed build.
    ///
    /// Compiler output loses its first `skip_lines` lines; errors raised
    /// before the compiler produced output are shown whole.
    pub fn overlay_message(&self, err: &BuildError) -> String {
        match err {
            BuildError::Failed { output, .. } => drop_leading_lines(output, self.skip_lines),
            other => other.to_string(),
        }
    }
}

/// Remove the first `n` `\n`-separated lines, keeping the rest verbatim.
pub fn drop_leading_lines(text: &str, n: usize) -> String {
    text.split('\n').skip(n).collect::<Vec<_>>().join("\n")
}
