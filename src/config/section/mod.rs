//! Configuration section definitions.
//!
//! Each module corresponds to a section in `moonlit.toml`:
//!
//! | Module  | TOML Section | Purpose                               |
//! |---------|--------------|---------------------------------------|
//! | `build` | `[build]`    | Compiler command, main-package hint   |
//! | `dev`   | `[dev]`      | Notification server, error overlay    |

pub mod build;
pub mod dev;

pub use build::BuildConfig;
pub use dev::DevConfig;
