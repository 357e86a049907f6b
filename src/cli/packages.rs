//! `packages` command: list what discovery found.

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::config::ProjectConfig;
use crate::module::{PackageDescriptor, discover_module, select_main};

/// Print every discovered package, marking main packages and the selected one.
pub fn list_packages(config: &ProjectConfig) -> Result<()> {
    let project = discover_module(&config.root)?;
    let selected = select_main(&project.packages, config.build.main.as_deref())
        .ok()
        .map(|p| p.package_path.clone());

    println!(
        "{} {}",
        project.module.module_path.bold(),
        project.source_dir().display().dimmed()
    );
    for pkg in &project.packages {
        println!("{}", render_line(pkg, selected.as_deref()));
    }

    if selected.is_none() {
        crate::log!("warning"; "no main package");
    }
    Ok(())
}

fn render_line(pkg: &PackageDescriptor, selected: Option<&str>) -> String {
    let marker = match (selected == Some(pkg.package_path.as_str()), pkg.is_main) {
        (true, _) => "*",
        (false, true) => "+",
        (false, false) => " ",
    };
    let dir = if pkg.relative_path.is_empty() {
        "."
    } else {
        pkg.relative_path.as_str()
    };
    format!("{marker} {:<32} {dir}", pkg.package_path)
}
