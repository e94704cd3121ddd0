//! Icon registration.

use crate::config::InstallerConfig;
use crate::desktop::{IconRegistry, IconSizeProbe};
use crate::error::{DeployError, Result};
use crate::target::{InstallTarget, Slug};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// One registered icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconRegistration {
    pub path: PathBuf,
    pub size: u32,
    /// False when the size query failed and the default size was used.
    pub probed: bool,
}

/// Icon images shipped next to the installer: regular files named `S*.png`,
/// in file name order.
pub fn discover_icons(target: &InstallTarget) -> Result<Vec<PathBuf>> {
    let mut icons = Vec::new();

    for entry in WalkDir::new(&target.installer_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| DeployError::Io {
            message: format!("scan installer directory: {}", e),
            path: e.path().map(Path::to_path_buf),
            source: e.into_io_error(),
        })?;

        // is_file() follows symlinks, the shell glob would too
        let is_icon =
            target.is_icon_name(&entry.file_name().to_string_lossy()) && entry.path().is_file();
        if is_icon {
            icons.push(entry.into_path());
        }
    }

    debug!("Found {} icon(s) for {}", icons.len(), target.slug);
    Ok(icons)
}

/// Register every icon under `slug`, then refresh the icon cache once.
///
/// Each icon is registered at the width reported by `probe`, or at
/// [`InstallerConfig::DEFAULT_ICON_SIZE`] when the query fails. Registration
/// and cache refresh failures are fatal. An empty `icon_files` still
/// refreshes the cache.
pub fn register_icons(
    icon_files: &[PathBuf],
    slug: &Slug,
    registry: &dyn IconRegistry,
    probe: &dyn IconSizeProbe,
) -> Result<Vec<IconRegistration>> {
    let mut registered = Vec::with_capacity(icon_files.len());

    for icon in icon_files {
        let (size, probed) = match probe.width(icon) {
            Ok(width) => (width, true),
            Err(e) => {
                warn!(
                    "{}; registering at {}px",
                    e,
                    InstallerConfig::DEFAULT_ICON_SIZE
                );
                (InstallerConfig::DEFAULT_ICON_SIZE, false)
            }
        };

        registry.install_icon(icon, slug.as_str(), size)?;
        registered.push(IconRegistration {
            path: icon.clone(),
            size,
            probed,
        });
    }

    registry.force_update()?;

    info!("Registered {} icon(s) as {}", registered.len(), slug);
    Ok(registered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::XdgDirs;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq)]
    enum Call {
        Install(PathBuf, String, u32),
        ForceUpdate,
    }

    #[derive(Default)]
    struct RecordingRegistry {
        calls: RefCell<Vec<Call>>,
        fail_install: bool,
    }

    impl IconRegistry for RecordingRegistry {
        fn install_icon(&self, icon: &Path, name: &str, size: u32) -> Result<()> {
            if self.fail_install {
                return Err(DeployError::CommandFailed {
                    command: "xdg-icon-resource install".into(),
                    status: "exit status: 2".into(),
                    stderr: String::new(),
                });
            }
            self.calls
                .borrow_mut()
                .push(Call::Install(icon.to_path_buf(), name.to_string(), size));
            Ok(())
        }

        fn force_update(&self) -> Result<()> {
            self.calls.borrow_mut().push(Call::ForceUpdate);
            Ok(())
        }
    }

    /// Reads the width from a `WxH` suffix in the file name.
    struct NameProbe;

    impl IconSizeProbe for NameProbe {
        fn width(&self, path: &Path) -> Result<u32> {
            let stem = path.file_stem().unwrap().to_string_lossy();
            stem.rsplit('-')
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| DeployError::ImageProbe {
                    path: path.to_path_buf(),
                    message: "no size in name".into(),
                })
        }
    }

    fn target_in(dir: &Path) -> InstallTarget {
        let xdg = XdgDirs::from_values(dir.join("home"), None, None);
        InstallTarget::new(Slug::new("videoke").unwrap(), dir, &xdg)
    }

    #[test]
    fn test_discover_icons_matches_pattern_in_order() {
        let temp_dir = TempDir::new().unwrap();
        for name in [
            "videoke-64.png",
            "videoke-16.png",
            "videoke.png",
            "videoke.desktop",
            "other-48.png",
            "videoke.PNG",
        ] {
            fs::write(temp_dir.path().join(name), "").unwrap();
        }
        fs::create_dir(temp_dir.path().join("videoke-dir.png")).unwrap();
        fs::create_dir(temp_dir.path().join("sub")).unwrap();
        fs::write(temp_dir.path().join("sub").join("videoke-32.png"), "").unwrap();

        let target = target_in(temp_dir.path());
        let icons = discover_icons(&target).unwrap();

        let names: Vec<_> = icons
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["videoke-16.png", "videoke-64.png", "videoke.png"]);
    }

    #[test]
    fn test_register_uses_probe_and_fallback() {
        let registry = RecordingRegistry::default();
        let slug = Slug::new("videoke").unwrap();
        let icons = vec![PathBuf::from("videoke-48.png"), PathBuf::from("videoke.png")];

        let registered = register_icons(&icons, &slug, &registry, &NameProbe).unwrap();

        assert_eq!(
            *registry.calls.borrow(),
            vec![
                Call::Install(PathBuf::from("videoke-48.png"), "videoke".into(), 48),
                Call::Install(PathBuf::from("videoke.png"), "videoke".into(), 16),
                Call::ForceUpdate,
            ]
        );
        assert!(registered[0].probed);
        assert!(!registered[1].probed);
    }

    #[test]
    fn test_register_nothing_still_updates_cache() {
        let registry = RecordingRegistry::default();
        let slug = Slug::new("videoke").unwrap();

        let registered = register_icons(&[], &slug, &registry, &NameProbe).unwrap();

        assert!(registered.is_empty());
        assert_eq!(*registry.calls.borrow(), vec![Call::ForceUpdate]);
    }

    #[test]
    fn test_install_failure_is_fatal_and_skips_update() {
        let registry = RecordingRegistry {
            fail_install: true,
            ..Default::default()
        };
        let slug = Slug::new("videoke").unwrap();

        let err = register_icons(&[PathBuf::from("videoke-48.png")], &slug, &registry, &NameProbe)
            .unwrap_err();

        assert!(matches!(err, DeployError::CommandFailed { .. }));
        assert!(registry.calls.borrow().is_empty());
    }
}
