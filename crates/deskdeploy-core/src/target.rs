//! Installation target: the slug and every path derived from it.

use crate::config::InstallerConfig;
use crate::error::{DeployError, Result};
use crate::platform::XdgDirs;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Stable short name of the installed application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Validate and wrap a slug.
    ///
    /// Accepts ASCII alphanumerics, `-`, `_` and `.`, up to 64 characters,
    /// not starting with `.` or `-`.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let invalid = |message: &str| DeployError::Validation {
            field: "slug".to_string(),
            message: format!("{} ({:?})", message, value),
        };

        if value.is_empty() {
            return Err(invalid("must not be empty"));
        }
        if value.len() > InstallerConfig::MAX_SLUG_LEN {
            return Err(invalid("too long"));
        }
        if value.starts_with('.') || value.starts_with('-') {
            return Err(invalid("must not start with '.' or '-'"));
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(invalid("contains characters outside [A-Za-z0-9._-]"));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// All paths an installation run reads or writes.
///
/// Resolved once at startup and handed to each step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallTarget {
    pub slug: Slug,
    /// Directory holding the installer and the files it ships.
    pub installer_dir: PathBuf,
    /// `<installer-dir>/S.sh`, the launcher's target.
    pub executable_path: PathBuf,
    /// `<installer-dir>/S.desktop`
    pub desktop_file: PathBuf,
    /// `<installer-dir>/S.ini.template`
    pub config_template: PathBuf,
    /// `<installer-dir>/requirements.txt`
    pub requirements_file: PathBuf,
    /// `$XDG_CONFIG_HOME/S`
    pub config_dir: PathBuf,
    /// `$XDG_CONFIG_HOME/S/S.ini`
    pub config_file: PathBuf,
    /// `$XDG_BIN_HOME`
    pub bin_dir: PathBuf,
    /// `$XDG_BIN_HOME/S`
    pub launcher_path: PathBuf,
}

impl InstallTarget {
    pub fn new(slug: Slug, installer_dir: impl AsRef<Path>, xdg: &XdgDirs) -> Self {
        let installer_dir = installer_dir.as_ref().to_path_buf();
        let s = slug.as_str();

        let config_name = format!("{}{}", s, InstallerConfig::CONFIG_SUFFIX);
        let config_dir = xdg.config_dir().join(s);
        let bin_dir = xdg.bin_dir();

        Self {
            executable_path: installer_dir.join(format!("{}{}", s, InstallerConfig::EXECUTABLE_SUFFIX)),
            desktop_file: installer_dir.join(format!("{}{}", s, InstallerConfig::DESKTOP_SUFFIX)),
            config_template: installer_dir
                .join(format!("{}{}", config_name, InstallerConfig::TEMPLATE_SUFFIX)),
            requirements_file: installer_dir.join(InstallerConfig::REQUIREMENTS_FILE_NAME),
            config_file: config_dir.join(&config_name),
            config_dir,
            launcher_path: bin_dir.join(s),
            bin_dir,
            installer_dir,
            slug,
        }
    }

    /// Whether `file_name` matches the icon pattern `S*.png`.
    pub fn is_icon_name(&self, file_name: &str) -> bool {
        // Prefix and suffix must not overlap, as with a glob
        file_name.len() >= self.slug.as_str().len() + InstallerConfig::ICON_SUFFIX.len()
            && file_name.starts_with(self.slug.as_str())
            && file_name.ends_with(InstallerConfig::ICON_SUFFIX)
    }
}
