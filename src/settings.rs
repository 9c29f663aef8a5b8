//! Optional TOML settings
//!
//! A settings file can override the layout engine defaults and a few table
//! display options. Every key is optional; anything absent falls back to
//! the built-in defaults.
//!
//! ```toml
//! [layout]
//! component_size = [60.0, 60.0]
//! snap_tolerance = 8.0
//! check_violations = false
//!
//! [table]
//! currency = "$"
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::layout::LayoutConfig;

/// Errors that can occur when loading or parsing a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level settings file structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub layout: LayoutSettings,
    pub table: TableSettings,
}

/// Overrides for [`LayoutConfig`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub component_size: Option<(f64, f64)>,
    pub enclosure_size: Option<(f64, f64)>,
    pub snap_tolerance: Option<f64>,
    pub check_violations: Option<bool>,
}

/// Table display options
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    /// Symbol prefixed to cost and total cells
    pub currency: String,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            currency: "$".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load settings from a TOML string
    pub fn from_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply the layout overrides on top of the defaults
    pub fn layout_config(&self) -> LayoutConfig {
        let mut config = LayoutConfig::default();
        if let Some((w, h)) = self.layout.component_size {
            config = config.with_component_size(w, h);
        }
        if let Some((w, h)) = self.layout.enclosure_size {
            config = config.with_enclosure_size(w, h);
        }
        if let Some(tolerance) = self.layout.snap_tolerance {
            config = config.with_snap_tolerance(tolerance);
        }
        if let Some(enabled) = self.layout.check_violations {
            config = config.with_checking(enabled);
        }
        config
    }
}
