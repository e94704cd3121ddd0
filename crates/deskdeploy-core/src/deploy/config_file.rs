//! Configuration bootstrap.
//!
//! The per-user config file is seeded from the shipped template exactly once.
//! After that it belongs to the application and is never rewritten here.

use crate::config::InstallerConfig;
use crate::error::{DeployError, Result};
use crate::platform::permissions::create_dir_all_with_mode;
use serde::Serialize;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// What [`ensure_config`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigOutcome {
    /// A config file was already present and left untouched.
    Preserved,
    /// The template was copied into place.
    Created,
}

/// Create `config_path` from `template_path` unless a regular file is
/// already there.
///
/// The config directory (and any missing ancestors) is created owner-only.
/// The copy is staged in the config directory and linked into place without
/// clobbering, so the target is either absent or complete.
pub fn ensure_config(config_path: &Path, template_path: &Path) -> Result<ConfigOutcome> {
    match fs::metadata(config_path) {
        Ok(meta) if meta.is_file() => {
            debug!("Keeping existing config {}", config_path.display());
            return Ok(ConfigOutcome::Preserved);
        }
        Ok(_) => return Err(DeployError::NotAFile(config_path.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(DeployError::io("inspect config file", config_path, e)),
    }

    if !template_path.is_file() {
        return Err(DeployError::FileNotFound(template_path.to_path_buf()));
    }

    let config_dir = config_path.parent().ok_or_else(|| DeployError::Config {
        message: format!("config path {} has no parent", config_path.display()),
    })?;
    create_dir_all_with_mode(config_dir, InstallerConfig::CONFIG_DIR_MODE)?;

    let mut template =
        File::open(template_path).map_err(|e| DeployError::io("open template", template_path, e))?;
    let mut staged = NamedTempFile::new_in(config_dir)
        .map_err(|e| DeployError::io("create staging file", config_dir, e))?;

    io::copy(&mut template, staged.as_file_mut())
        .map_err(|e| DeployError::io("copy template", staged.path(), e))?;
    staged
        .as_file()
        .sync_all()
        .map_err(|e| DeployError::io("sync staging file", staged.path(), e))?;

    staged
        .persist_noclobber(config_path)
        .map_err(|e| DeployError::io("install config file", config_path, e.error))?;

    info!(
        "Created {} from {}",
        config_path.display(),
        template_path.display()
    );
    Ok(ConfigOutcome::Created)
}
