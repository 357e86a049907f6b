//! Process-wide shutdown tracking.
//!
//! Two flags:
//! - `WATCHING`: the dev loop is running and can stop gracefully
//! - `SHUTDOWN`: Ctrl+C was received

use std::sync::atomic::{AtomicBool, Ordering};

static WATCHING: AtomicBool = AtomicBool::new(false);

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Setup the global Ctrl+C handler. Call once at program start
///
/// - Before `set_watching(true)`: exit immediately (nothing to drain)
/// - After: set the SHUTDOWN flag, the watch loop returns on its next poll
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        if WATCHING.load(Ordering::SeqCst) {
            crate::log!("dev"; "shutting down...");
        } else {
            std::process::exit(130);
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Mark whether the watch loop is running
pub fn set_watching(watching: bool) {
    WATCHING.store(watching, Ordering::SeqCst);
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watching_flag() {
        set_watching(true);
        assert!(WATCHING.load(Ordering::SeqCst));

        set_watching(false);
        assert!(!WATCHING.load(Ordering::SeqCst));
    }

    #[test]
    fn test_not_shutdown_by_default() {
        assert!(!is_shutdown());
    }
}
