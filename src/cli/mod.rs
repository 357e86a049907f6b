//! Command-line interface module.

mod args;
pub mod build;
pub mod common;
pub mod dev;
pub mod packages;

pub use args::{Cli, Commands};
