//! Blocking external command execution.

use crate::error::{DeployError, Result};
use std::process::{Command, Output};
use tracing::debug;

/// Render a command line for logs and error messages.
pub fn describe(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|part| part.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run `command` to completion, failing unless it exits successfully.
///
/// Stdout and stderr are captured; stderr is carried in the error.
pub fn run_checked(command: &mut Command) -> Result<Output> {
    let line = describe(command);
    debug!("Running {}", line);

    let output = command.output().map_err(|e| DeployError::CommandSpawn {
        command: line.clone(),
        source: e,
    })?;

    if !output.status.success() {
        return Err(DeployError::CommandFailed {
            command: line,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(output)
}

/// Check if a command exists in the system PATH.
pub fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let mut cmd = Command::new("xdg-icon-resource");
        cmd.args(["install", "--novendor", "--size", "48"]);
        assert_eq!(describe(&cmd), "xdg-icon-resource install --novendor --size 48");
    }

    #[test]
    fn test_run_checked_success() {
        let output = run_checked(Command::new("sh").args(["-c", "echo hi"])).unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "hi");
    }

    #[test]
    fn test_run_checked_nonzero_exit() {
        let err = run_checked(Command::new("sh").args(["-c", "echo boom >&2; exit 3"])).unwrap_err();
        match err {
            DeployError::CommandFailed {
                command,
                status,
                stderr,
            } => {
                assert_eq!(command, "sh -c echo boom >&2; exit 3");
                assert!(status.contains('3'));
                assert_eq!(stderr.trim(), "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_run_checked_missing_program() {
        let err = run_checked(&mut Command::new("deskdeploy-no-such-program")).unwrap_err();
        assert!(matches!(err, DeployError::CommandSpawn { .. }));
    }
}
