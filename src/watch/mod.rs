//! Source Watcher
//!
//! Recursive notify watcher over the source root, debounced into batches of
//! changed paths. The watcher starts before the initial build, so edits made
//! while it runs are picked up by the first batch.
//!
//! ```text
//! notify → Debouncer (dedup, ignore rules, 300 ms window) → Vec<PathBuf>
//! ```

mod debouncer;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use debouncer::Debouncer;

/// Upper bound on one blocking wait, so shutdown is noticed promptly.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

pub struct SourceWatcher {
    /// Channel to receive notify events
    rx: Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    _watcher: RecommendedWatcher,
    debouncer: Debouncer,
}

impl SourceWatcher {
    /// Watch `root` recursively, dropping events under any of `ignored_roots`.
    pub fn new(root: &Path, ignored_roots: &[PathBuf]) -> notify::Result<Self> {
        let (tx, rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(root, RecursiveMode::Recursive)?;

        crate::debug!("watch"; "watching {}", root.display());

        Ok(Self {
            rx,
            _watcher: watcher,
            debouncer: Debouncer::new(ignored_roots),
        })
    }

    /// Block until the next debounced batch.
    ///
    /// Returns `None` on shutdown or when the watcher is gone.
    pub fn next_batch(&mut self) -> Option<Vec<PathBuf>> {
        loop {
            if crate::core::is_shutdown() {
                return None;
            }

            if let Some(batch) = self.debouncer.take_if_ready() {
                return Some(batch);
            }

            let timeout = self.debouncer.sleep_duration().min(POLL_INTERVAL);
            match self.rx.recv_timeout(timeout) {
                Ok(Ok(event)) => self.debouncer.add_event(&event),
                Ok(Err(e)) => crate::log!("watch"; "notify error: {}", e),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return None,
            }
        }
    }
}
