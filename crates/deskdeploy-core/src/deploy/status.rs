//! Read-only inspection of an installation.

use super::icons::discover_icons;
use super::launcher::{launcher_status, LauncherStatus};
use super::menu::descriptor_warnings;
use crate::config::ToolConfig;
use crate::desktop::DesktopEntry;
use crate::error::Result;
use crate::platform::permissions::is_owner_only;
use crate::platform::process::command_exists;
use crate::target::{InstallTarget, Slug};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Snapshot of what an installation run would find.
#[derive(Debug, Clone, Serialize)]
pub struct InstallStatus {
    pub slug: Slug,
    pub config_file: PathBuf,
    pub config_present: bool,
    pub config_dir_private: bool,
    pub launcher_path: PathBuf,
    pub launcher: LauncherStatus,
    pub icons: Vec<PathBuf>,
    pub desktop_file: PathBuf,
    pub desktop_file_present: bool,
    /// Parsed menu descriptor, when present.
    pub descriptor: Option<DesktopEntry>,
    pub descriptor_warnings: Vec<String>,
    pub requirements_present: bool,
    pub missing_tools: Vec<String>,
}

impl InstallStatus {
    /// Whether the user-visible effects of a full run are in place.
    ///
    /// Icon and menu registrations live in the desktop's own stores and are
    /// not checked.
    pub fn is_complete(&self) -> bool {
        self.config_present && self.launcher == LauncherStatus::Ok
    }
}

/// Programs an install run needs on `PATH`.
pub fn required_tools(pip: &str) -> Vec<String> {
    vec![
        pip.to_string(),
        ToolConfig::ICON_RESOURCE.to_string(),
        ToolConfig::DESKTOP_MENU.to_string(),
    ]
}

/// Inspect `target` without modifying anything.
///
/// `tools` are looked up on `PATH`; the ones not found are listed in
/// [`InstallStatus::missing_tools`].
pub fn inspect(target: &InstallTarget, tools: &[String]) -> Result<InstallStatus> {
    let desktop_file_present = target.desktop_file.is_file();
    let descriptor = if desktop_file_present {
        Some(DesktopEntry::read(&target.desktop_file)?)
    } else {
        None
    };
    let descriptor_warnings = descriptor
        .as_ref()
        .map(|entry| descriptor_warnings(entry, target))
        .unwrap_or_default();

    Ok(InstallStatus {
        slug: target.slug.clone(),
        config_file: target.config_file.clone(),
        config_present: target.config_file.is_file(),
        config_dir_private: is_owner_only(&target.config_dir),
        launcher_path: target.launcher_path.clone(),
        launcher: launcher_status(&target.launcher_path, &target.executable_path)?,
        icons: discover_icons(target)?,
        desktop_file: target.desktop_file.clone(),
        desktop_file_present,
        descriptor,
        descriptor_warnings,
        requirements_present: target.requirements_file.is_file(),
        missing_tools: tools
            .iter()
            .filter(|tool| !command_exists(tool))
            .cloned()
            .collect(),
    })
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

impl fmt::Display for InstallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "slug:          {}", self.slug)?;
        writeln!(
            f,
            "config:        {} (present: {}, private dir: {})",
            self.config_file.display(),
            yes_no(self.config_present),
            yes_no(self.config_dir_private)
        )?;
        let launcher = match &self.launcher {
            LauncherStatus::Missing => "missing".to_string(),
            LauncherStatus::Ok => "ok".to_string(),
            LauncherStatus::Stale(target) => format!("stale -> {}", target.display()),
            LauncherStatus::NotALink => "not a symlink".to_string(),
        };
        writeln!(f, "launcher:      {} ({})", self.launcher_path.display(), launcher)?;
        writeln!(f, "icons:         {}", self.icons.len())?;
        for icon in &self.icons {
            writeln!(f, "  {}", icon.display())?;
        }
        writeln!(
            f,
            "menu entry:    {} (present: {})",
            self.desktop_file.display(),
            yes_no(self.desktop_file_present)
        )?;
        if let Some(entry) = &self.descriptor {
            writeln!(
                f,
                "  {} ({}{}){}",
                entry.name.as_deref().unwrap_or("unnamed"),
                entry.entry_type.as_deref().unwrap_or("no type"),
                if entry.terminal { ", terminal" } else { "" },
                if entry.categories.is_empty() {
                    String::new()
                } else {
                    format!(" in {}", entry.categories.join(", "))
                }
            )?;
        }
        for warning in &self.descriptor_warnings {
            writeln!(f, "  warning: {}", warning)?;
        }
        writeln!(f, "requirements:  {}", yes_no(self.requirements_present))?;
        if self.missing_tools.is_empty() {
            write!(f, "tools:         all found")
        } else {
            write!(f, "tools:         missing {}", self.missing_tools.join(", "))
        }
    }
}
