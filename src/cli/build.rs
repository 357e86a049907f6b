//! One-shot release build.

use anyhow::{Result, bail};

use super::common::Session;
use crate::config::ProjectConfig;
use crate::core::{BuildContext, BuildMode};
use crate::log;

/// Build the main package once and stage its output.
///
/// A failed build is reported with the compiler output and returned as an
/// error, so the process exits non-zero.
pub fn build_project(config: &ProjectConfig, mode: BuildMode) -> Result<()> {
    let session = Session::open(config)?;
    let main = session.main_package();
    let mut ctx = BuildContext::new(mode);

    log!("build"; "{} ({})", main.package_path, mode);

    match session.orchestrator.run_build(&mut ctx) {
        Ok(report) => {
            let artifacts = session.orchestrator.artifacts(mode);
            log!(
                "build"; "staged {}{} in {}ms",
                artifacts.staged_js.display(),
                if report.source_map { " (+map)" } else { "" },
                report.elapsed.as_millis()
            );
            Ok(())
        }
        Err(err) => {
            log!("error"; "{}", err);
            let detail = err.detail();
            if !detail.trim().is_empty() && detail != err.to_string() {
                eprintln!("{}", detail.trim_end());
            }
            bail!("build of {} failed", main.package_path)
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::testutil::{demo_project, fake_compiler, write_file};

    fn config_with(root: &std::path::Path, script: &str) -> ProjectConfig {
        let mut config = ProjectConfig {
            root: root.to_path_buf(),
            ..ProjectConfig::default()
        };
        config.build.compiler = fake_compiler(script);
        config
    }

    #[test]
    fn test_build_stages_release_output() {
        let (temp, project) = demo_project();
        write_file(temp.path(), "target/js/release/build/a/a.js", "console.log(1)");
        let config = config_with(&project.root, r#"test "$4" = --release"#);

        build_project(&config, BuildMode::Release).unwrap();
        let staged = std::fs::read_to_string(project.source_dir().join("main.js")).unwrap();
        assert_eq!(staged, "console.log(1)");
    }

    #[test]
    fn test_build_failure_is_error() {
        let (_temp, project) = demo_project();
        let config = config_with(&project.root, "echo 'error: boom' >&2; exit 1");

        let err = build_project(&config, BuildMode::Release).unwrap_err();
        assert!(err.to_string().contains("demo/a"));
        assert!(!project.source_dir().join("main.js").exists());
    }
}
