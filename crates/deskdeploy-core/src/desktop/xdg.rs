//! `xdg-utils` backed registries.

use super::{IconRegistry, MenuRegistry};
use crate::config::ToolConfig;
use crate::error::Result;
use crate::platform::process::run_checked;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Registers icons and menu entries through `xdg-icon-resource` and
/// `xdg-desktop-menu`.
#[derive(Debug, Clone)]
pub struct XdgUtils {
    icon_resource: String,
    desktop_menu: String,
}

impl XdgUtils {
    pub fn new() -> Self {
        Self {
            icon_resource: ToolConfig::ICON_RESOURCE.to_string(),
            desktop_menu: ToolConfig::DESKTOP_MENU.to_string(),
        }
    }

    /// Use different programs (wrappers, absolute paths).
    pub fn with_programs(icon_resource: impl Into<String>, desktop_menu: impl Into<String>) -> Self {
        Self {
            icon_resource: icon_resource.into(),
            desktop_menu: desktop_menu.into(),
        }
    }

    fn icon_install_command(&self, icon: &Path, name: &str, size: u32) -> Command {
        let mut cmd = Command::new(&self.icon_resource);
        cmd.args(["install", "--noupdate", "--novendor", "--size"])
            .arg(size.to_string())
            .arg(icon)
            .arg(name);
        cmd
    }

    fn force_update_command(&self) -> Command {
        let mut cmd = Command::new(&self.icon_resource);
        cmd.arg("forceupdate");
        cmd
    }

    fn menu_install_command(&self, desktop_file: &Path) -> Command {
        let mut cmd = Command::new(&self.desktop_menu);
        cmd.args(["install", "--novendor"]).arg(desktop_file);
        cmd
    }
}

impl Default for XdgUtils {
    fn default() -> Self {
        Self::new()
    }
}

impl IconRegistry for XdgUtils {
    fn install_icon(&self, icon: &Path, name: &str, size: u32) -> Result<()> {
        run_checked(&mut self.icon_install_command(icon, name, size))?;
        debug!("Registered icon {} at {}px from {}", name, size, icon.display());
        Ok(())
    }

    fn force_update(&self) -> Result<()> {
        run_checked(&mut self.force_update_command())?;
        Ok(())
    }
}

impl MenuRegistry for XdgUtils {
    fn install_menu_entry(&self, desktop_file: &Path) -> Result<()> {
        run_checked(&mut self.menu_install_command(desktop_file))?;
        debug!("Installed menu entry {}", desktop_file.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeployError;
    use crate::platform::process::describe;

    #[test]
    fn test_icon_install_command_line() {
        let xdg = XdgUtils::new();
        let cmd = xdg.icon_install_command(Path::new("/opt/videoke/videoke-48.png"), "videoke", 48);
        assert_eq!(
            describe(&cmd),
            "xdg-icon-resource install --noupdate --novendor --size 48 /opt/videoke/videoke-48.png videoke"
        );
    }

    #[test]
    fn test_force_update_command_line() {
        let xdg = XdgUtils::new();
        assert_eq!(describe(&xdg.force_update_command()), "xdg-icon-resource forceupdate");
    }

    #[test]
    fn test_menu_install_command_line() {
        let xdg = XdgUtils::new();
        let cmd = xdg.menu_install_command(Path::new("/opt/videoke/videoke.desktop"));
        assert_eq!(
            describe(&cmd),
            "xdg-desktop-menu install --novendor /opt/videoke/videoke.desktop"
        );
    }

    #[test]
    fn test_failing_tool_surfaces_command() {
        let xdg = XdgUtils::with_programs("false", "false");
        let err = xdg.force_update().unwrap_err();
        match err {
            DeployError::CommandFailed { command, .. } => assert_eq!(command, "false forceupdate"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(xdg
            .install_menu_entry(Path::new("videoke.desktop"))
            .is_err());
    }

    #[test]
    fn test_succeeding_tool() {
        let xdg = XdgUtils::with_programs("true", "true");
        xdg.install_icon(Path::new("videoke.png"), "videoke", 16).unwrap();
        xdg.force_update().unwrap();
        xdg.install_menu_entry(Path::new("videoke.desktop")).unwrap();
    }
}
