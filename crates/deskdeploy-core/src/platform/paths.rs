//! XDG base-directory resolution.
//!
//! Environment lookups happen once, in [`XdgDirs::from_env`]. Everything
//! downstream receives the resolved [`XdgDirs`] so it can be built by hand
//! in tests.

use crate::error::{DeployError, Result};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Resolved per-user base directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XdgDirs {
    /// The user's home directory.
    pub home: PathBuf,
    /// `XDG_BIN_HOME` when set to a usable value.
    pub bin_home: Option<PathBuf>,
    /// `XDG_CONFIG_HOME` when set to a usable value.
    pub config_home: Option<PathBuf>,
}

impl XdgDirs {
    /// Read `HOME`, `XDG_BIN_HOME` and `XDG_CONFIG_HOME` from the process environment.
    pub fn from_env() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| DeployError::Config {
            message: "Could not determine home directory".to_string(),
        })?;

        let bin_home = std::env::var("XDG_BIN_HOME").ok();
        let config_home = std::env::var("XDG_CONFIG_HOME").ok();

        Ok(Self::from_values(home, bin_home.as_deref(), config_home.as_deref()))
    }

    /// Build from raw variable values.
    ///
    /// Empty values count as unset. Relative values are ignored, as the XDG
    /// base-directory rules require. A leading `~/` expands to `home`.
    pub fn from_values(home: PathBuf, bin_home: Option<&str>, config_home: Option<&str>) -> Self {
        let bin_home = bin_home.and_then(|v| normalize("XDG_BIN_HOME", v, &home));
        let config_home = config_home.and_then(|v| normalize("XDG_CONFIG_HOME", v, &home));
        Self {
            home,
            bin_home,
            config_home,
        }
    }

    /// User binary directory: `$XDG_BIN_HOME` or `~/.local/bin`.
    pub fn bin_dir(&self) -> PathBuf {
        self.bin_home
            .clone()
            .unwrap_or_else(|| self.home.join(".local").join("bin"))
    }

    /// User configuration root: `$XDG_CONFIG_HOME` or `~/.config`.
    pub fn config_dir(&self) -> PathBuf {
        self.config_home
            .clone()
            .unwrap_or_else(|| self.home.join(".config"))
    }
}

fn normalize(var: &str, value: &str, home: &Path) -> Option<PathBuf> {
    if value.is_empty() {
        return None;
    }

    let path = expand_tilde(value, home);
    if path.is_relative() {
        warn!("Ignoring relative {}={}", var, value);
        return None;
    }
    Some(path)
}

/// Expand a leading `~` or `~/` against `home`.
pub fn expand_tilde(value: &str, home: &Path) -> PathBuf {
    if value == "~" {
        home.to_path_buf()
    } else if let Some(rest) = value.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(value)
    }
}
