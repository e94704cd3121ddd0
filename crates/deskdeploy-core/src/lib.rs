//! deskdeploy core - per-user deployment of a desktop application.
//!
//! Prepares everything a desktop application needs to start from the menu of
//! a freedesktop.org compliant desktop: Python dependencies, a seeded config
//! file, a launcher on `PATH`, themed icons and a menu entry. Every step is
//! idempotent, so running the installer again repairs a partial install.
//!
//! # Example
//!
//! ```rust,ignore
//! use deskdeploy_core::deploy::{Installer, Pip};
//! use deskdeploy_core::desktop::{HeaderProbe, XdgUtils};
//! use deskdeploy_core::{InstallTarget, Slug, XdgDirs};
//!
//! let xdg = XdgDirs::from_env()?;
//! let target = InstallTarget::new(Slug::new("videoke")?, "/opt/videoke", &xdg);
//!
//! let desktop = XdgUtils::new();
//! let report = Installer::new(&target, &Pip::new(), &desktop, &desktop, &HeaderProbe).run()?;
//! println!("Registered {} icons", report.icons.len());
//! ```

pub mod config;
pub mod deploy;
pub mod desktop;
pub mod error;
pub mod platform;
pub mod target;

// Re-export commonly used types
pub use deploy::{InstallReport, InstallState, InstallStatus, Installer, Step, StepFailed};
pub use error::{DeployError, ErrorCategory, Result};
pub use platform::XdgDirs;
pub use target::{InstallTarget, Slug};
