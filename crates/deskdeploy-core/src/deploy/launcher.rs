//! Entry-point linking.
//!
//! The launcher in the user's bin directory is owned by the installer and is
//! always reset to point at the current executable.

use crate::error::{DeployError, Result};
use serde::Serialize;
use std::fs;
use std::io;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// State of the launcher entry as found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "target")]
pub enum LauncherStatus {
    /// Nothing at the launcher path.
    Missing,
    /// A symlink to the expected executable.
    Ok,
    /// A symlink to something else.
    Stale(PathBuf),
    /// A regular file or directory occupies the path.
    NotALink,
}

/// Point `launcher_path` at `executable_path`.
///
/// `bin_dir` is created if needed. Whatever occupied `launcher_path` before
/// (link, broken link, file or directory) is replaced. The new link is staged
/// next to the launcher and renamed over it, so the path never holds a
/// partial state.
pub fn publish_launcher(bin_dir: &Path, launcher_path: &Path, executable_path: &Path) -> Result<()> {
    fs::create_dir_all(bin_dir).map_err(|e| DeployError::io("create bin directory", bin_dir, e))?;

    if !executable_path.exists() {
        warn!(
            "Launcher target {} does not exist yet",
            executable_path.display()
        );
    }

    // rename() cannot replace a directory
    match fs::symlink_metadata(launcher_path) {
        Ok(meta) if meta.is_dir() => {
            fs::remove_dir_all(launcher_path)
                .map_err(|e| DeployError::io("remove directory at launcher path", launcher_path, e))?;
            debug!("Removed directory at {}", launcher_path.display());
        }
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(DeployError::io("inspect launcher", launcher_path, e)),
    }

    let staged = staging_path(launcher_path)?;
    remove_if_present(&staged)?;

    symlink(executable_path, &staged).map_err(|e| DeployError::SymlinkFailed {
        src: executable_path.to_path_buf(),
        dest: staged.clone(),
        reason: e.to_string(),
    })?;

    if let Err(e) = fs::rename(&staged, launcher_path) {
        let _ = fs::remove_file(&staged);
        return Err(DeployError::io("replace launcher", launcher_path, e));
    }

    info!(
        "Linked {} -> {}",
        launcher_path.display(),
        executable_path.display()
    );
    Ok(())
}

/// Inspect the launcher without changing it.
pub fn launcher_status(launcher_path: &Path, executable_path: &Path) -> Result<LauncherStatus> {
    let meta = match fs::symlink_metadata(launcher_path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LauncherStatus::Missing),
        Err(e) => return Err(DeployError::io("inspect launcher", launcher_path, e)),
    };

    if !meta.file_type().is_symlink() {
        return Ok(LauncherStatus::NotALink);
    }

    let target = fs::read_link(launcher_path)
        .map_err(|e| DeployError::io("read launcher link", launcher_path, e))?;
    if target == executable_path {
        Ok(LauncherStatus::Ok)
    } else {
        Ok(LauncherStatus::Stale(target))
    }
}

fn staging_path(launcher_path: &Path) -> Result<PathBuf> {
    let name = launcher_path.file_name().ok_or_else(|| DeployError::Config {
        message: format!("launcher path {} has no file name", launcher_path.display()),
    })?;
    let mut staged_name = std::ffi::OsString::from(".");
    staged_name.push(name);
    staged_name.push(".deskdeploy-tmp");
    Ok(launcher_path.with_file_name(staged_name))
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(DeployError::io("remove stale staging link", path, e)),
    }
}
