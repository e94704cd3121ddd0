//! Centralized configuration for deskdeploy.
//!
//! File naming conventions, permission modes and external tool names used by
//! the deployment steps.

/// Installer layout and policy constants.
pub struct InstallerConfig;

impl InstallerConfig {
    /// Icon size used when an image's width cannot be determined.
    pub const DEFAULT_ICON_SIZE: u32 = 16;
    /// Mode applied to the per-user configuration directory.
    pub const CONFIG_DIR_MODE: u32 = 0o700;
    /// Dependency list consumed by the provisioner.
    pub const REQUIREMENTS_FILE_NAME: &'static str = "requirements.txt";
    /// Suffix of the executable the launcher points at.
    pub const EXECUTABLE_SUFFIX: &'static str = ".sh";
    /// Suffix of the per-user configuration file.
    pub const CONFIG_SUFFIX: &'static str = ".ini";
    /// Suffix appended to the config file name for the shipped template.
    pub const TEMPLATE_SUFFIX: &'static str = ".template";
    /// Suffix of the desktop menu descriptor.
    pub const DESKTOP_SUFFIX: &'static str = ".desktop";
    /// Suffix of icon images.
    pub const ICON_SUFFIX: &'static str = ".png";
    /// Longest accepted slug.
    pub const MAX_SLUG_LEN: usize = 64;
    /// Environment variable overriding the installer directory.
    pub const ROOT_ENV_VAR: &'static str = "DESKDEPLOY_ROOT";
}

/// External programs the deployment shells out to.
pub struct ToolConfig;

impl ToolConfig {
    pub const PIP: &'static str = "pip3";
    pub const ICON_RESOURCE: &'static str = "xdg-icon-resource";
    pub const DESKTOP_MENU: &'static str = "xdg-desktop-menu";
    pub const IDENTIFY: &'static str = "identify";
}
