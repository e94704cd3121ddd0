//! Error types for deskdeploy.
//!
//! Every step returns a [`DeployError`] on failure. The variants follow the
//! installer's failure taxonomy (dependency, filesystem, external tool,
//! configuration), which [`DeployError::category`] exposes and
//! [`DeployError::exit_code`] maps to a process exit status.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for deployment operations.
#[derive(Debug, Error)]
pub enum DeployError {
    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Path exists but is not a regular file: {0}")]
    NotAFile(PathBuf),

    #[error("Failed to create symlink from {src} to {dest}: {reason}")]
    SymlinkFailed {
        src: PathBuf,
        dest: PathBuf,
        reason: String,
    },

    // External tool errors
    #[error("Failed to run `{command}`")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}{}", stderr_suffix(.stderr))]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Could not read image size of {path}: {message}")]
    ImageProbe { path: PathBuf, message: String },

    // Dependency errors
    #[error("Dependency installation failed: {message}")]
    DependencyInstallFailed { message: String },

    #[error("Invalid requirement on line {line}: {content}")]
    InvalidRequirement { line: usize, content: String },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },
}

/// Result type alias for deployment operations.
pub type Result<T> = std::result::Result<T, DeployError>;

/// Failure classes an operator can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Package manager rejected or failed an install/upgrade.
    Dependency,
    /// Directory creation, copy, link or removal failed.
    Filesystem,
    /// A desktop integration tool could not be run or returned non-zero.
    ExternalTool,
    /// Bad slug, paths or installer contents.
    Configuration,
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

impl From<std::io::Error> for DeployError {
    fn from(err: std::io::Error) -> Self {
        DeployError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl DeployError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        DeployError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Create an IO error with an operation description and path.
    pub fn io(message: impl Into<String>, path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        DeployError::Io {
            message: message.into(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Classify the error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            DeployError::Io { .. }
            | DeployError::FileNotFound(_)
            | DeployError::NotAFile(_)
            | DeployError::SymlinkFailed { .. } => ErrorCategory::Filesystem,

            DeployError::CommandSpawn { .. }
            | DeployError::CommandFailed { .. }
            | DeployError::ImageProbe { .. } => ErrorCategory::ExternalTool,

            DeployError::DependencyInstallFailed { .. }
            | DeployError::InvalidRequirement { .. } => ErrorCategory::Dependency,

            DeployError::Config { .. } | DeployError::Validation { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    /// Process exit status for this error.
    ///
    /// - 2: configuration (slug, paths)
    /// - 3: dependency provisioning
    /// - 4: filesystem
    /// - 5: external tool
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::Configuration => 2,
            ErrorCategory::Dependency => 3,
            ErrorCategory::Filesystem => 4,
            ErrorCategory::ExternalTool => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DeployError::FileNotFound(PathBuf::from("/opt/app/app.ini.template"));
        assert_eq!(err.to_string(), "File not found: /opt/app/app.ini.template");
    }

    #[test]
    fn test_command_failed_display_includes_stderr() {
        let err = DeployError::CommandFailed {
            command: "xdg-desktop-menu install --novendor app.desktop".into(),
            status: "exit status: 3".into(),
            stderr: "xdg-desktop-menu: file not found\n".into(),
        };
        assert_eq!(
            err.to_string(),
            "`xdg-desktop-menu install --novendor app.desktop` exited with exit status: 3: xdg-desktop-menu: file not found"
        );

        let quiet = DeployError::CommandFailed {
            command: "xdg-icon-resource forceupdate".into(),
            status: "exit status: 1".into(),
            stderr: "  ".into(),
        };
        assert_eq!(
            quiet.to_string(),
            "`xdg-icon-resource forceupdate` exited with exit status: 1"
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            DeployError::Validation {
                field: "slug".into(),
                message: "empty".into()
            }
            .exit_code(),
            2
        );
        assert_eq!(
            DeployError::DependencyInstallFailed {
                message: "pip".into()
            }
            .exit_code(),
            3
        );
        assert_eq!(DeployError::NotAFile(PathBuf::from("/x")).exit_code(), 4);
        assert_eq!(
            DeployError::CommandFailed {
                command: "x".into(),
                status: "exit status: 1".into(),
                stderr: String::new()
            }
            .exit_code(),
            5
        );
    }

    #[test]
    fn test_io_conversion_is_filesystem() {
        let err: DeployError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope").into();
        assert_eq!(err.category(), ErrorCategory::Filesystem);
    }
}
