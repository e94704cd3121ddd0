//! Icon size probes.

use super::IconSizeProbe;
use crate::config::ToolConfig;
use crate::error::{DeployError, Result};
use crate::platform::process::run_checked;
use std::path::Path;
use std::process::Command;

/// Reads the width from the image header with the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderProbe;

impl IconSizeProbe for HeaderProbe {
    fn width(&self, path: &Path) -> Result<u32> {
        let (width, _height) = image::image_dimensions(path).map_err(|e| DeployError::ImageProbe {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(width)
    }
}

/// Asks ImageMagick: `identify -format %w <file>[0]`.
#[derive(Debug, Clone)]
pub struct IdentifyProbe {
    program: String,
}

impl IdentifyProbe {
    pub fn new() -> Self {
        Self {
            program: ToolConfig::IDENTIFY.to_string(),
        }
    }
}

impl Default for IdentifyProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl IconSizeProbe for IdentifyProbe {
    fn width(&self, path: &Path) -> Result<u32> {
        // First frame only, otherwise multi-image files print concatenated widths
        let mut frame = path.as_os_str().to_owned();
        frame.push("[0]");

        let output = run_checked(Command::new(&self.program).args(["-format", "%w"]).arg(frame))?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        stdout.trim().parse::<u32>().map_err(|e| DeployError::ImageProbe {
            path: path.to_path_buf(),
            message: format!("unexpected identify output {:?}: {}", stdout.trim(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_header_probe_reads_width() {
        let temp_dir = TempDir::new().unwrap();
        let icon = temp_dir.path().join("videoke-48.png");
        image::RgbaImage::new(48, 32).save(&icon).unwrap();

        assert_eq!(HeaderProbe.width(&icon).unwrap(), 48);
    }

    #[test]
    fn test_header_probe_rejects_garbage() {
        let temp_dir = TempDir::new().unwrap();
        let icon = temp_dir.path().join("videoke.png");
        fs::write(&icon, "not a png").unwrap();

        let err = HeaderProbe.width(&icon).unwrap_err();
        assert!(matches!(err, DeployError::ImageProbe { .. }));
    }

    #[test]
    fn test_header_probe_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(HeaderProbe.width(&temp_dir.path().join("missing.png")).is_err());
    }

    #[test]
    fn test_identify_probe_missing_program() {
        let probe = IdentifyProbe {
            program: "deskdeploy-no-such-identify".to_string(),
        };
        let err = probe.width(Path::new("videoke.png")).unwrap_err();
        assert!(matches!(err, DeployError::CommandSpawn { .. }));
    }

    #[test]
    fn test_identify_probe_rejects_non_numeric_output() {
        // `echo` prints its arguments back instead of a width
        let probe = IdentifyProbe {
            program: "echo".to_string(),
        };
        let err = probe.width(Path::new("videoke.png")).unwrap_err();
        assert!(matches!(err, DeployError::ImageProbe { .. }));
    }
}
