//! Viewer configuration.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::FolioError;
use crate::text::FontSpec;
use crate::view::layout::Alignment;

/// User-tunable layout and interaction constants. Loaded from the
/// platform config directory when present, otherwise defaults apply.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Margin applied on every side of a page.
    pub margin: f64,
    /// Extra distance between consecutive page footprints; negative
    /// values pull the doubled margins together.
    pub spacing: f64,
    pub alignment: Alignment,
    /// Zoom delta per wheel step.
    pub zoom_step: f64,
    /// Scroll delta per wheel step, as a content fraction.
    pub scroll_step: f64,
    pub header_font: FontSpec,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            margin: 5.0,
            spacing: -5.0,
            alignment: Alignment::AlignLeft,
            zoom_step: 0.1,
            scroll_step: 0.05,
            header_font: FontSpec::default(),
        }
    }
}

impl ViewerConfig {
    /// Platform config file location, when a config directory exists.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("folio").join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self, FolioError> {
        let raw = fs::read_to_string(path).map_err(|source| FolioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| FolioError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the platform config if it exists, falling back to defaults
    /// (with a warning) when it is missing or malformed.
    #[must_use]
    pub fn load_or_default() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => config,
            Err(err) => {
                warn!("ignoring config: {err}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_toml() {
        let config = ViewerConfig::default();
        let raw = toml::to_string(&config).expect("serialize");
        let back: ViewerConfig = toml::from_str(&raw).expect("parse");

        assert_eq!(back.margin, config.margin);
        assert_eq!(back.alignment, config.alignment);
        assert_eq!(back.header_font, config.header_font);
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let config: ViewerConfig =
            toml::from_str("alignment = \"horizontal-flow\"\nmargin = 12.0").expect("parse");

        assert_eq!(config.alignment, Alignment::HorizontalFlow);
        assert_eq!(config.margin, 12.0);
        assert_eq!(config.spacing, -5.0);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "margin = \"wide\"").expect("write");

        assert!(matches!(
            ViewerConfig::load(&path),
            Err(FolioError::Config { .. })
        ));
    }
}
