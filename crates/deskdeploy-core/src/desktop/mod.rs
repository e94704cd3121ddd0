//! Desktop environment integration.
//!
//! The deployment steps talk to the desktop through three small traits so the
//! sequencing logic can run against fakes:
//!
//! - [`IconRegistry`] - icon theme registration and cache refresh
//! - [`MenuRegistry`] - application menu registration
//! - [`IconSizeProbe`] - pixel width of an icon image
//!
//! [`XdgUtils`] implements both registries on top of `xdg-icon-resource` and
//! `xdg-desktop-menu`. [`HeaderProbe`] and [`IdentifyProbe`] implement the
//! size query.
//!
//! # Example
//!
//! ```rust,ignore
//! use deskdeploy_core::desktop::{IconRegistry, XdgUtils};
//!
//! let xdg = XdgUtils::new();
//! xdg.install_icon(Path::new("videoke-48.png"), "videoke", 48)?;
//! xdg.force_update()?;
//! ```

mod desktop_entry;
mod probe;
mod xdg;

pub use desktop_entry::DesktopEntry;
pub use probe::{HeaderProbe, IdentifyProbe};
pub use xdg::XdgUtils;

use crate::error::Result;
use std::path::Path;

/// Desktop icon theme store.
pub trait IconRegistry {
    /// Register `icon` under `name` at `size` pixels.
    ///
    /// Must not use a vendor prefix and must not refresh the theme cache;
    /// callers batch the refresh through [`IconRegistry::force_update`].
    fn install_icon(&self, icon: &Path, name: &str, size: u32) -> Result<()>;

    /// Rebuild the icon theme cache.
    fn force_update(&self) -> Result<()>;
}

/// Desktop application menu.
pub trait MenuRegistry {
    /// Install `desktop_file` into the menu without a vendor prefix,
    /// replacing any previous entry of the same name.
    fn install_menu_entry(&self, desktop_file: &Path) -> Result<()>;
}

/// Image metadata query.
pub trait IconSizeProbe {
    /// Pixel width of the image at `path`.
    fn width(&self, path: &Path) -> Result<u32>;
}
