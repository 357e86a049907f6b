//! Development loop: initial build, then rebuild on change.
//!
//! The watcher is attached before the first build so edits made while it
//! runs land in the first batch. Builds run on this thread; the WebSocket
//! acceptor is the only helper thread.

use anyhow::{Context, Result};

use super::common::Session;
use crate::config::ProjectConfig;
use crate::core::{BuildContext, BuildMode, set_watching};
use crate::log;
use crate::logger::{status_error, status_success};
use crate::reload::{HotPayload, HotUpdate, WsBroadcaster};
use crate::watch::SourceWatcher;

pub fn run_dev(config: &ProjectConfig, mode: BuildMode) -> Result<()> {
    let session = Session::open(config)?;
    let orchestrator = &session.orchestrator;
    let source_dir = session.project.source_dir();

    let ignored = [session.project.root.join("target")];
    let mut watcher = SourceWatcher::new(&source_dir, &ignored)
        .with_context(|| format!("failed to watch {}", source_dir.display()))?;

    let mut broadcaster = WsBroadcaster::bind(config.dev.interface, config.dev.port)?;
    log!(
        "dev"; "{} ({}), notifications on ws://{}:{}",
        orchestrator.main_package().package_path,
        mode,
        config.dev.interface,
        broadcaster.port()
    );

    let hot = HotUpdate::new(&orchestrator.artifacts(mode), config.dev.overlay_skip_lines);
    let mut ctx = BuildContext::new(mode);

    // A broken initial build is not fatal; the overlay waits for the first client.
    match orchestrator.run_build(&mut ctx) {
        Ok(report) => status_success(&format!(
            "built {} in {}ms",
            orchestrator.main_package().package_path,
            report.elapsed.as_millis()
        )),
        Err(err) => {
            status_error("initial build failed", &err.detail());
            broadcaster.remember_error(HotPayload::error(hot.overlay_message(&err)));
        }
    }

    set_watching(true);
    while let Some(batch) = watcher.next_batch() {
        let outcome = hot.on_files_changed(orchestrator, &mut ctx, &batch, &mut broadcaster);
        crate::debug!("dev"; "{:?} ({} client(s))", outcome, broadcaster.client_count());
    }
    set_watching(false);

    Ok(())
}
