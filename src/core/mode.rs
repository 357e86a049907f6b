//! Build mode and per-session build state.

use std::fmt;

/// Compiler optimization mode, selected once per process from the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Unoptimized output with source maps (`dev`).
    #[default]
    Debug,
    /// Optimized output, source maps may be absent (`build`).
    Release,
}

impl BuildMode {
    /// Mode flag passed to the compiler.
    pub const fn flag(self) -> &'static str {
        match self {
            Self::Debug => "--debug",
            Self::Release => "--release",
        }
    }

    /// Directory (relative to the project root) the compiler writes JS packages into.
    pub const fn output_root(self) -> &'static str {
        match self {
            Self::Debug => "target/js/debug/build",
            Self::Release => "target/js/release/build",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Debug => "debug",
            Self::Release => "release",
        })
    }
}

/// Mutable state of one build session.
///
/// Owned by the caller and passed into every build, so independent sessions
/// never share flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildContext {
    pub mode: BuildMode,
    /// Whether the most recent build attempt failed.
    pub has_error: bool,
}

impl BuildContext {
    pub const fn new(mode: BuildMode) -> Self {
        Self {
            mode,
            has_error: false,
        }
    }
}
