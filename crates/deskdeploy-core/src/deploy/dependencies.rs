//! Dependency provisioning.
//!
//! Reads the shipped `requirements.txt` and hands it to the package manager
//! for a per-user install/upgrade.

use crate::config::ToolConfig;
use crate::error::{DeployError, Result};
use crate::platform::process::run_checked;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::LazyLock;
use tracing::{debug, info};

/// One line of the dependency list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Distribution name as written.
    pub name: String,
    /// Extras, version specifiers and markers following the name, if any.
    pub constraint: Option<String>,
    /// A path, archive or URL rather than a registry name; `name` holds it as written.
    pub direct: bool,
}

/// Installs a dependency list for the current user.
pub trait PackageInstaller {
    /// Install or upgrade everything listed in `requirements_file`.
    fn install_requirements(&self, requirements_file: &Path) -> Result<()>;
}

/// `pip install --user --upgrade -r <file>`.
#[derive(Debug, Clone)]
pub struct Pip {
    program: String,
}

impl Pip {
    pub fn new() -> Self {
        Self::with_program(ToolConfig::PIP)
    }

    /// Use a specific pip executable (`pip`, `python3 -m pip` wrappers, venv pips).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn install_command(&self, requirements_file: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(["install", "--user", "--upgrade", "-r"])
            .arg(requirements_file);
        cmd
    }
}

impl Default for Pip {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageInstaller for Pip {
    fn install_requirements(&self, requirements_file: &Path) -> Result<()> {
        run_checked(&mut self.install_command(requirements_file)).map_err(|e| {
            DeployError::DependencyInstallFailed {
                message: e.to_string(),
            }
        })?;
        Ok(())
    }
}

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)\s*(.*)$").unwrap()
});

/// Parse requirements file content.
///
/// Blank lines, comments and pip option lines (`-r`, `--index-url`, ...) are
/// skipped. Paths, archives and VCS or URL references are kept verbatim as
/// direct references and left for pip to resolve. Any other line must start
/// with a valid distribution name.
pub fn parse_requirements(content: &str) -> Result<Vec<Requirement>> {
    let mut requirements = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let line = strip_comment(raw).trim();

        if line.is_empty() || line.starts_with('-') {
            continue;
        }

        if is_direct_reference(line) {
            debug!("Direct reference on line {}: {}", index + 1, line);
            requirements.push(Requirement {
                name: line.to_string(),
                constraint: None,
                direct: true,
            });
            continue;
        }

        let invalid = || DeployError::InvalidRequirement {
            line: index + 1,
            content: raw.to_string(),
        };
        let caps = NAME_RE.captures(line).ok_or_else(invalid)?;

        let rest = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
        // Whatever follows the name has to be extras, a specifier, a marker or a direct reference
        if !rest.is_empty() && !rest.starts_with(['[', '<', '>', '=', '!', '~', ';', '@']) {
            return Err(invalid());
        }

        requirements.push(Requirement {
            name: caps[1].to_string(),
            constraint: (!rest.is_empty()).then(|| rest.to_string()),
            direct: false,
        });
    }

    Ok(requirements)
}

/// Drop a `#` comment: at line start, or preceded by whitespace.
fn strip_comment(line: &str) -> &str {
    let mut prev_is_space = true;
    for (pos, c) in line.char_indices() {
        if c == '#' && prev_is_space {
            return &line[..pos];
        }
        prev_is_space = c.is_whitespace();
    }
    line
}

/// Local paths, archives and URLs pip installs without a registry lookup.
fn is_direct_reference(line: &str) -> bool {
    line.starts_with(['.', '/', '~'])
        || line.contains("://")
        || line.starts_with("file:")
        || [".whl", ".tar.gz", ".zip"]
            .iter()
            .any(|ext| line.ends_with(ext))
}

/// Ensure the dependencies listed in `requirements_file` are installed.
///
/// A missing file or a list without packages leaves the environment alone.
/// Returns the number of requirements handed to the package manager.
pub fn provision_dependencies(
    requirements_file: &Path,
    installer: &dyn PackageInstaller,
) -> Result<usize> {
    if !requirements_file.exists() {
        info!(
            "No {} found, skipping dependency installation",
            requirements_file.display()
        );
        return Ok(0);
    }

    let content = fs::read_to_string(requirements_file)
        .map_err(|e| DeployError::io("read requirements", requirements_file, e))?;
    let requirements = parse_requirements(&content)?;

    if requirements.is_empty() {
        info!("{} lists no packages", requirements_file.display());
        return Ok(0);
    }

    for requirement in &requirements {
        debug!(
            "Requirement: {} {}",
            requirement.name,
            requirement.constraint.as_deref().unwrap_or("")
        );
    }

    info!("Installing {} packages for the current user", requirements.len());
    installer.install_requirements(requirements_file)?;

    Ok(requirements.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::process::describe;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingInstaller {
        calls: RefCell<Vec<PathBuf>>,
    }

    impl PackageInstaller for RecordingInstaller {
        fn install_requirements(&self, requirements_file: &Path) -> Result<()> {
            self.calls.borrow_mut().push(requirements_file.to_path_buf());
            Ok(())
        }
    }

    #[test]
    fn test_parse_requirements() {
        let content = r#"
# Runtime dependencies
ffpyplayer>=4.3
pygame==2.5.2  # pinned for the mixer fix
pillow[png]
requests ; python_version >= "3.8"
--index-url https://pypi.org/simple
-r extra.txt
"#;

        let requirements = parse_requirements(content).unwrap();
        let names: Vec<_> = requirements.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["ffpyplayer", "pygame", "pillow", "requests"]);
        assert_eq!(requirements[0].constraint.as_deref(), Some(">=4.3"));
        assert_eq!(requirements[1].constraint.as_deref(), Some("==2.5.2"));
        assert_eq!(requirements[2].constraint.as_deref(), Some("[png]"));
    }

    #[test]
    fn test_parse_requirements_rejects_garbage() {
        let err = parse_requirements("pygame\n!!! not a package\n").unwrap_err();
        match err {
            DeployError::InvalidRequirement { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(parse_requirements("pygame 2.5\n").is_err());
    }

    #[test]
    fn test_parse_requirements_keeps_direct_references() {
        let content = "./vendor/ffpyplayer-4.5.1-cp311-linux_x86_64.whl\n\
git+https://github.com/pygame/pygame.git#egg=pygame\n\
https://example.org/pkgs/pygame-2.5.2.tar.gz\n\
/srv/wheels/mutagen-1.47.0-py3-none-any.whl\n\
vendor/tinytag-1.10.1.tar.gz\n";

        let requirements = parse_requirements(content).unwrap();

        assert_eq!(requirements.len(), 5);
        assert!(requirements.iter().all(|r| r.direct && r.constraint.is_none()));
        assert_eq!(
            requirements[1].name,
            "git+https://github.com/pygame/pygame.git#egg=pygame"
        );
    }

    #[test]
    fn test_parse_requirements_strips_tab_comments() {
        let requirements = parse_requirements("pygame>=2\t# mixer\nmutagen #tags\n").unwrap();
        assert_eq!(requirements[0].constraint.as_deref(), Some(">=2"));
        assert_eq!(requirements[1].name, "mutagen");
        assert!(requirements[1].constraint.is_none());
    }

    #[test]
    fn test_provision_direct_references_only_runs_pip() {
        let temp_dir = TempDir::new().unwrap();
        let requirements = temp_dir.path().join("requirements.txt");
        fs::write(
            &requirements,
            "# vendored build\n./vendor/ffpyplayer-4.5.1-cp311-linux_x86_64.whl\n",
        )
        .unwrap();
        let installer = RecordingInstaller::default();

        assert_eq!(provision_dependencies(&requirements, &installer).unwrap(), 1);
        assert_eq!(*installer.calls.borrow(), vec![requirements]);
    }

    #[test]
    fn test_pip_command_line() {
        let pip = Pip::new();
        let cmd = pip.install_command(Path::new("/opt/videoke/requirements.txt"));
        assert_eq!(
            describe(&cmd),
            "pip3 install --user --upgrade -r /opt/videoke/requirements.txt"
        );
    }

    #[test]
    fn test_pip_failure_is_dependency_error() {
        let temp_dir = TempDir::new().unwrap();
        let requirements = temp_dir.path().join("requirements.txt");
        fs::write(&requirements, "pygame\n").unwrap();

        let err = Pip::with_program("false")
            .install_requirements(&requirements)
            .unwrap_err();
        assert!(matches!(err, DeployError::DependencyInstallFailed { .. }));
        assert!(err.to_string().contains("false install --user --upgrade -r"));
    }

    #[test]
    fn test_provision_missing_file_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let installer = RecordingInstaller::default();

        let count =
            provision_dependencies(&temp_dir.path().join("requirements.txt"), &installer).unwrap();

        assert_eq!(count, 0);
        assert!(installer.calls.borrow().is_empty());
    }

    #[test]
    fn test_provision_comment_only_file_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let requirements = temp_dir.path().join("requirements.txt");
        fs::write(&requirements, "# nothing yet\n\n").unwrap();
        let installer = RecordingInstaller::default();

        assert_eq!(provision_dependencies(&requirements, &installer).unwrap(), 0);
        assert!(installer.calls.borrow().is_empty());
    }

    #[test]
    fn test_provision_installs_once() {
        let temp_dir = TempDir::new().unwrap();
        let requirements = temp_dir.path().join("requirements.txt");
        fs::write(&requirements, "ffpyplayer\npygame>=2\n").unwrap();
        let installer = RecordingInstaller::default();

        assert_eq!(provision_dependencies(&requirements, &installer).unwrap(), 2);
        assert_eq!(*installer.calls.borrow(), vec![requirements]);
    }
}
