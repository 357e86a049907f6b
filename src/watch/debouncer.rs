use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

use crate::module::DEPENDENCY_DIR;
use crate::utils::path::normalize_path;

pub(super) const DEBOUNCE_MS: u64 = 300;

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub(super) fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// Collects notify events into one batch per quiet window.
pub(super) struct Debouncer {
    /// Path → ChangeKind (dedup is free via HashMap key uniqueness)
    pub(super) changes: FxHashMap<PathBuf, ChangeKind>,
    pub(super) last_event: Option<Instant>,
    /// Normalized roots whose events are dropped (compiler output).
    ignored_roots: Vec<PathBuf>,
}

impl Debouncer {
    pub(super) fn new(ignored_roots: &[PathBuf]) -> Self {
        Self {
            changes: FxHashMap::default(),
            last_event: None,
            ignored_roots: ignored_roots.iter().map(|p| normalize_path(p)).collect(),
        }
    }

    /// Add a notify event, applying dedup rules:
    /// - Remove + Create/Modify → Create/Modify (file was restored)
    /// - Modify + Remove → Remove (file was deleted)
    /// - Create + Remove → nothing
    /// - otherwise the first event wins
    pub(super) fn add_event(&mut self, event: &notify::Event) {
        use notify::EventKind;

        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Remove(_) => ChangeKind::Removed,
            EventKind::Modify(modify) => {
                // mtime/atime/chmod noise
                if matches!(modify, notify::event::ModifyKind::Metadata(_)) {
                    return;
                }
                ChangeKind::Modified
            }
            _ => return,
        };

        crate::debug!("watch"; "raw notify: {:?} {:?}", event.kind, event.paths);

        for path in &event.paths {
            if is_temp_file(path) || in_dependency_dir(path) {
                continue;
            }

            let path = normalize_path(path);
            if self.ignored_roots.iter().any(|root| path.starts_with(root)) {
                continue;
            }

            if let Some(&existing) = self.changes.get(&path) {
                match (existing, kind) {
                    (ChangeKind::Removed, ChangeKind::Created | ChangeKind::Modified) => {
                        crate::debug!("watch"; "restore {}->{}: {}", existing.label(), kind.label(), path.display());
                        self.changes.insert(path, kind);
                    }
                    (ChangeKind::Modified, ChangeKind::Removed) => {
                        crate::debug!("watch"; "upgrade modified->removed: {}", path.display());
                        self.changes.insert(path, ChangeKind::Removed);
                    }
                    (ChangeKind::Created, ChangeKind::Removed) => {
                        crate::debug!("watch"; "discard created+removed: {}", path.display());
                        self.changes.remove(&path);
                    }
                    _ => continue,
                }
                self.last_event = Some(Instant::now());
                continue;
            }

            crate::debug!("watch"; "event {}: {}", kind.label(), path.display());
            self.changes.insert(path, kind);
            self.last_event = Some(Instant::now());
        }
    }

    /// Take the pending batch once the quiet window has elapsed.
    ///
    /// A window whose events all cancelled out is closed without a batch.
    pub(super) fn take_if_ready(&mut self) -> Option<Vec<PathBuf>> {
        if self.changes.is_empty() && self.window_elapsed() {
            self.last_event = None;
            return None;
        }

        if !self.is_ready() {
            return None;
        }

        let changes = std::mem::take(&mut self.changes);
        self.last_event = None;

        let mut paths: Vec<_> = changes.into_keys().collect();
        paths.sort();
        Some(paths)
    }

    pub(super) fn is_ready(&self) -> bool {
        self.window_elapsed() && !self.changes.is_empty()
    }

    fn window_elapsed(&self) -> bool {
        self.last_event
            .is_some_and(|t| t.elapsed() >= Duration::from_millis(DEBOUNCE_MS))
    }

    /// Time left until the current window closes.
    pub(super) fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            return Duration::from_secs(86400);
        };

        Duration::from_millis(DEBOUNCE_MS)
            .saturating_sub(last_event.elapsed())
            .max(Duration::from_millis(1))
    }
}

/// Check if path is a temp/backup file (editor artifacts) or hidden.
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

fn in_dependency_dir(path: &Path) -> bool {
    path.components().any(|c| c.as_os_str() == DEPENDENCY_DIR)
}
