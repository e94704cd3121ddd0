//! Deployment steps and the driver that sequences them.
//!
//! A run walks five steps in a fixed order:
//!
//! 1. [`Step::Dependencies`] - install the shipped `requirements.txt` for the user
//! 2. [`Step::Config`] - seed the per-user config file from its template, once
//! 3. [`Step::Launcher`] - point `$XDG_BIN_HOME/S` at `S.sh`
//! 4. [`Step::Icons`] - register every `S*.png` and refresh the icon cache once
//! 5. [`Step::Menu`] - install `S.desktop` into the application menu
//!
//! Each step is idempotent on its own, so a failed run can simply be repeated.
//! The driver stops at the first failure and leaves completed steps in place.

mod config_file;
mod dependencies;
mod icons;
mod launcher;
mod menu;
mod status;

pub use config_file::{ensure_config, ConfigOutcome};
pub use dependencies::{parse_requirements, provision_dependencies, PackageInstaller, Pip, Requirement};
pub use icons::{discover_icons, register_icons, IconRegistration};
pub use launcher::{launcher_status, publish_launcher, LauncherStatus};
pub use menu::{descriptor_warnings, register_menu_entry};
pub use status::{inspect, required_tools, InstallStatus};

use crate::desktop::{DesktopEntry, IconRegistry, IconSizeProbe, MenuRegistry};
use crate::error::{DeployError, Result};
use crate::target::InstallTarget;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{error, info, warn};

/// One installation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Dependencies,
    Config,
    Launcher,
    Icons,
    Menu,
}

impl Step {
    /// All steps in execution order.
    pub const ALL: [Step; 5] = [
        Step::Dependencies,
        Step::Config,
        Step::Launcher,
        Step::Icons,
        Step::Menu,
    ];

    /// State reached once this step succeeds.
    pub fn completes(self) -> InstallState {
        match self {
            Step::Dependencies => InstallState::DependenciesProvisioned,
            Step::Config => InstallState::ConfigEnsured,
            Step::Launcher => InstallState::LauncherPublished,
            Step::Icons => InstallState::IconsRegistered,
            Step::Menu => InstallState::MenuRegistered,
        }
    }

    fn position(self) -> usize {
        Step::ALL.iter().position(|s| *s == self).unwrap_or(0) + 1
    }

    fn description(self) -> &'static str {
        match self {
            Step::Dependencies => "Provisioning dependencies",
            Step::Config => "Ensuring configuration",
            Step::Launcher => "Publishing launcher",
            Step::Icons => "Registering icons",
            Step::Menu => "Registering menu entry",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Dependencies => "dependencies",
            Step::Config => "config",
            Step::Launcher => "launcher",
            Step::Icons => "icons",
            Step::Menu => "menu",
        };
        f.write_str(name)
    }
}

/// Installer progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallState {
    Start,
    DependenciesProvisioned,
    ConfigEnsured,
    LauncherPublished,
    IconsRegistered,
    MenuRegistered,
}

/// A step failed; nothing after it ran.
#[derive(Debug, Error)]
#[error("{step} step failed")]
pub struct StepFailed {
    /// The step that failed.
    pub step: Step,
    /// State the installation was left in.
    pub reached: InstallState,
    /// Steps that completed before the failure.
    pub completed: Vec<Step>,
    #[source]
    pub source: DeployError,
}

impl StepFailed {
    pub fn exit_code(&self) -> u8 {
        self.source.exit_code()
    }
}

/// What a successful run did.
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    pub state: InstallState,
    pub completed: Vec<Step>,
    /// Requirements handed to the package manager.
    pub packages: usize,
    pub config: ConfigOutcome,
    pub icons: Vec<IconRegistration>,
}

/// Runs the five steps against one target with injected desktop capabilities.
pub struct Installer<'a> {
    target: &'a InstallTarget,
    packages: &'a dyn PackageInstaller,
    icons: &'a dyn IconRegistry,
    menu: &'a dyn MenuRegistry,
    probe: &'a dyn IconSizeProbe,
}

impl<'a> Installer<'a> {
    pub fn new(
        target: &'a InstallTarget,
        packages: &'a dyn PackageInstaller,
        icons: &'a dyn IconRegistry,
        menu: &'a dyn MenuRegistry,
        probe: &'a dyn IconSizeProbe,
    ) -> Self {
        Self {
            target,
            packages,
            icons,
            menu,
            probe,
        }
    }

    /// Run every step in order, stopping at the first failure.
    pub fn run(&self) -> std::result::Result<InstallReport, StepFailed> {
        let target = self.target;
        let mut completed = Vec::with_capacity(Step::ALL.len());

        info!("Installing {} from {}", target.slug, target.installer_dir.display());

        let packages = run_step(&mut completed, Step::Dependencies, || {
            provision_dependencies(&target.requirements_file, self.packages)
        })?;

        let config = run_step(&mut completed, Step::Config, || {
            ensure_config(&target.config_file, &target.config_template)
        })?;

        run_step(&mut completed, Step::Launcher, || {
            publish_launcher(&target.bin_dir, &target.launcher_path, &target.executable_path)
        })?;

        let icons = run_step(&mut completed, Step::Icons, || {
            let files = discover_icons(target)?;
            register_icons(&files, &target.slug, self.icons, self.probe)
        })?;

        run_step(&mut completed, Step::Menu, || {
            if let Ok(entry) = DesktopEntry::read(&target.desktop_file) {
                for warning in descriptor_warnings(&entry, target) {
                    warn!("{}: {}", target.desktop_file.display(), warning);
                }
            }
            register_menu_entry(&target.desktop_file, self.menu)
        })?;

        info!("Installed {}", target.slug);

        Ok(InstallReport {
            state: InstallState::MenuRegistered,
            completed,
            packages,
            config,
            icons,
        })
    }
}

fn run_step<T>(
    completed: &mut Vec<Step>,
    step: Step,
    op: impl FnOnce() -> Result<T>,
) -> std::result::Result<T, StepFailed> {
    info!("[{}/{}] {}", step.position(), Step::ALL.len(), step.description());

    match op() {
        Ok(value) => {
            completed.push(step);
            Ok(value)
        }
        Err(source) => {
            error!("{} step failed: {}", step, source);
            Err(StepFailed {
                step,
                reached: completed
                    .last()
                    .map(|s| s.completes())
                    .unwrap_or(InstallState::Start),
                completed: completed.clone(),
                source,
            })
        }
    }
}
