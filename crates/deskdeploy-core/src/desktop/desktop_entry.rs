//! Desktop entry (.desktop file) inspection.
//!
//! Reads the `[Desktop Entry]` group of a shipped descriptor so the installer
//! can check that it points at the launcher and icon it is about to publish.

use crate::error::{DeployError, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

const MAIN_GROUP: &str = "[Desktop Entry]";

/// The keys of a desktop entry the installer cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DesktopEntry {
    /// Entry name (shown in menus).
    pub name: Option<String>,
    /// Executable command line.
    pub exec: Option<String>,
    /// Icon name or path.
    pub icon: Option<String>,
    /// Entry type (usually "Application").
    pub entry_type: Option<String>,
    /// Whether to run in a terminal.
    pub terminal: bool,
    /// Categories.
    pub categories: Vec<String>,
}

impl DesktopEntry {
    /// Parse descriptor text.
    ///
    /// Keys outside `[Desktop Entry]`, comments and localized keys
    /// (`Name[de]=`) are skipped.
    pub fn parse(content: &str) -> Self {
        let mut entry = DesktopEntry::default();
        let mut in_main_group = false;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.starts_with('[') {
                in_main_group = line == MAIN_GROUP;
                continue;
            }
            if !in_main_group {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().to_string();

            match key.trim() {
                "Name" => entry.name = Some(value),
                "Exec" => entry.exec = Some(value),
                "Icon" => entry.icon = Some(value),
                "Type" => entry.entry_type = Some(value),
                "Terminal" => entry.terminal = value == "true",
                "Categories" => {
                    entry.categories = value
                        .split(';')
                        .filter(|c| !c.is_empty())
                        .map(str::to_string)
                        .collect()
                }
                _ => {}
            }
        }

        entry
    }

    /// Read and parse a descriptor file.
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DeployError::FileNotFound(path.to_path_buf()));
        }
        let content =
            fs::read_to_string(path).map_err(|e| DeployError::io("read desktop file", path, e))?;
        Ok(Self::parse(&content))
    }

    /// The program part of `Exec`, unquoted.
    pub fn exec_program(&self) -> Option<&str> {
        let exec = self.exec.as_deref()?.trim_start();
        let program = if let Some(rest) = exec.strip_prefix('"') {
            rest.split('"').next()?
        } else {
            exec.split_whitespace().next()?
        };
        (!program.is_empty()).then_some(program)
    }

    /// Whether `Exec` launches `launcher`, either by absolute path or by its
    /// file name (resolved through `PATH`).
    pub fn launches(&self, launcher: &Path) -> bool {
        let Some(program) = self.exec_program() else {
            return false;
        };
        if Path::new(program) == launcher {
            return true;
        }
        launcher
            .file_name()
            .map(|name| name.to_string_lossy() == program)
            .unwrap_or(false)
    }
}
