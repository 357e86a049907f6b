//! Project setup shared across CLI commands.

use anyhow::{Context, Result};

use crate::build::Orchestrator;
use crate::config::ProjectConfig;
use crate::module::{PackageDescriptor, Project, discover_module, select_main};

/// A discovered project with its main package resolved.
pub struct Session {
    pub project: Project,
    pub orchestrator: Orchestrator,
}

impl Session {
    /// Discover the module under the config root and select its main package.
    pub fn open(config: &ProjectConfig) -> Result<Self> {
        let project = discover_module(&config.root)
            .with_context(|| format!("failed to load project at {}", config.root.display()))?;

        crate::debug!(
            "module";
            "{} ({} package(s)) in {}",
            project.module.module_path,
            project.packages.len(),
            project.source_dir().display()
        );

        let main = select_main(&project.packages, config.build.main.as_deref())?.clone();
        let orchestrator = Orchestrator::new(&project, &main, config.build.compiler.clone());

        Ok(Self {
            project,
            orchestrator,
        })
    }

    pub fn main_package(&self) -> &PackageDescriptor {
        self.orchestrator.main_package()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::ProjectError;
    use crate::testutil::{demo_project, write_file};

    fn config_for(project: &Project) -> ProjectConfig {
        ProjectConfig {
            root: project.root.clone(),
            ..ProjectConfig::default()
        }
    }

    #[test]
    fn test_open_selects_main() {
        let (_temp, project) = demo_project();
        let session = Session::open(&config_for(&project)).unwrap();

        assert_eq!(session.main_package().package_path, "demo/a");
        assert_eq!(session.project.packages.len(), 2);
    }

    #[test]
    fn test_open_honors_hint() {
        let (temp, project) = demo_project();
        write_file(temp.path(), "src/c/moon.pkg.json", r#"{"is-main": true}"#);

        let mut config = config_for(&project);
        config.build.main = Some("c".into());
        let session = Session::open(&config).unwrap();

        assert_eq!(session.main_package().relative_path, "c");
    }

    #[test]
    fn test_open_without_main_fails() {
        let (temp, project) = demo_project();
        write_file(temp.path(), "src/a/moon.pkg.json", "{}");

        let err = Session::open(&config_for(&project)).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<ProjectError>(),
            Some(ProjectError::NoMainPackage)
        ));
    }

    #[test]
    fn test_open_missing_module_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = ProjectConfig {
            root: temp.path().to_path_buf(),
            ..ProjectConfig::default()
        };

        let err = Session::open(&config).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<ProjectError>(),
            Some(ProjectError::ConfigNotFound(_))
        ));
    }
}
