//! Directory permission handling.

use crate::error::{DeployError, Result};
use std::fs;
use std::os::unix::fs::{DirBuilderExt, PermissionsExt};
use std::path::Path;
use tracing::debug;

/// Create `path` and any missing ancestors with `mode`, then force `mode`
/// onto `path` itself.
///
/// Newly created ancestors get `mode` as well (subject to the umask).
/// Ancestors that already exist are left untouched.
pub fn create_dir_all_with_mode(path: &Path, mode: u32) -> Result<()> {
    fs::DirBuilder::new()
        .recursive(true)
        .mode(mode)
        .create(path)
        .map_err(|e| DeployError::io("create directory", path, e))?;

    set_mode(path, mode)
}

/// Set the permission bits of `path`.
pub fn set_mode(path: &Path, mode: u32) -> Result<()> {
    let mut permissions = fs::metadata(path)
        .map_err(|e| DeployError::io("read metadata", path, e))?
        .permissions();
    permissions.set_mode(mode);
    fs::set_permissions(path, permissions)
        .map_err(|e| DeployError::io("set permissions", path, e))?;
    debug!("Set mode {:o} on {}", mode, path.display());
    Ok(())
}

/// Check that neither group nor others have any access to `path`.
pub fn is_owner_only(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o077 == 0)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn mode_of(path: &Path) -> u32 {
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[test]
    fn test_create_dir_all_with_mode_creates_ancestors() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b").join("app");

        create_dir_all_with_mode(&nested, 0o700).unwrap();

        assert!(nested.is_dir());
        assert_eq!(mode_of(&nested), 0o700);
        assert!(is_owner_only(&nested));
    }

    #[test]
    fn test_existing_directory_is_tightened() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("app");
        fs::create_dir(&dir).unwrap();
        set_mode(&dir, 0o755).unwrap();
        assert!(!is_owner_only(&dir));

        create_dir_all_with_mode(&dir, 0o700).unwrap();

        assert_eq!(mode_of(&dir), 0o700);
    }

    #[test]
    fn test_is_owner_only_missing_path() {
        let temp_dir = TempDir::new().unwrap();
        assert!(!is_owner_only(&temp_dir.path().join("missing")));
    }
}
