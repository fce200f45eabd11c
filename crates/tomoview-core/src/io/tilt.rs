//! Tilt angle files (`.tlt`, `.rawtlt`): one angle in degrees per line.

use std::fmt::Write as _;
use std::path::Path;

use crate::error::{Result, TomoviewError};

pub fn read_tilt_angles(path: &Path) -> Result<Vec<f64>> {
    let text = std::fs::read_to_string(path)?;
    parse_tilt_angles(&text, path)
}

/// Parse tilt file contents. Blank lines and `#` comments are skipped.
/// `path` only labels errors.
pub fn parse_tilt_angles(text: &str, path: &Path) -> Result<Vec<f64>> {
    let mut angles = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let angle = trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| TomoviewError::InvalidTiltAngle {
                path: path.to_path_buf(),
                line: index + 1,
                text: trimmed.to_string(),
            })?;
        angles.push(angle);
    }
    Ok(angles)
}

pub fn write_tilt_angles(path: &Path, angles: &[f64]) -> Result<()> {
    let mut out = String::with_capacity(angles.len() * 8);
    for angle in angles {
        let _ = writeln!(out, "{angle}");
    }
    std::fs::write(path, out)?;
    Ok(())
}
