//! Menu registration.

use crate::desktop::{DesktopEntry, MenuRegistry};
use crate::error::{DeployError, Result};
use crate::target::InstallTarget;
use std::path::Path;
use tracing::info;

/// Install `desktop_file` into the desktop menu.
pub fn register_menu_entry(desktop_file: &Path, registry: &dyn MenuRegistry) -> Result<()> {
    if !desktop_file.is_file() {
        return Err(DeployError::FileNotFound(desktop_file.to_path_buf()));
    }

    registry.install_menu_entry(desktop_file)?;

    info!("Registered menu entry {}", desktop_file.display());
    Ok(())
}

/// Ways the shipped descriptor disagrees with what the installer publishes.
///
/// The menu entry still gets registered; these are reported, not enforced.
pub fn descriptor_warnings(entry: &DesktopEntry, target: &InstallTarget) -> Vec<String> {
    let mut warnings = Vec::new();

    match entry.icon.as_deref() {
        Some(icon) if icon == target.slug.as_str() => {}
        Some(icon) => warnings.push(format!(
            "Icon={} does not match the registered icon name {}",
            icon, target.slug
        )),
        None => warnings.push("descriptor has no Icon key".to_string()),
    }

    if let Some(entry_type) = entry.entry_type.as_deref() {
        if entry_type != "Application" {
            warnings.push(format!("Type={} is not Application", entry_type));
        }
    }

    if entry.exec.is_none() {
        warnings.push("descriptor has no Exec key".to_string());
    } else if !entry.launches(&target.launcher_path) {
        warnings.push(format!(
            "Exec={} does not start the launcher {}",
            entry.exec.as_deref().unwrap_or_default(),
            target.launcher_path.display()
        ));
    }

    warnings
}
