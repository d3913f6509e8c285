//! Debugger configuration.
//!
//! Loaded from TOML; every field has a default, so an empty file (or no file
//! at all) yields a working setup.
//!
//! ```toml
//! deadzone = 0.1
//! precision = 3
//!
//! [export]
//! json_file = "gamepad-recording.json"
//! csv_file = "gamepad-recording.csv"
//! pretty_json = true
//!
//! [[hid.layouts]]
//! vendor_id = 0x045e
//! product_id = 0x028e
//! mapping = "standard"
//! axes = [{ offset = 5, format = "i16le" }]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::backends::layout::ReportLayout;
use crate::error::{Error, Result};
use crate::sampler::DEFAULT_PRECISION;

pub const DEFAULT_DEADZONE: f32 = 0.1;
pub const DEFAULT_JSON_FILE: &str = "gamepad-recording.json";
pub const DEFAULT_CSV_FILE: &str = "gamepad-recording.csv";

/// Largest rounding precision we accept; beyond this f32 has nothing left to keep.
const MAX_PRECISION: u32 = 9;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebuggerConfig {
    /// Initial stick deadzone, `[0, 1)`. Values `>= 1` zero every stick.
    pub deadzone: f32,
    /// Decimal places kept when sampling frames.
    pub precision: u32,
    pub export: ExportConfig,
    pub hid: HidConfig,
}

impl Default for DebuggerConfig {
    fn default() -> Self {
        Self {
            deadzone: DEFAULT_DEADZONE,
            precision: DEFAULT_PRECISION,
            export: ExportConfig::default(),
            hid: HidConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub json_file: String,
    pub csv_file: String,
    /// Two-space indented JSON instead of a single line.
    pub pretty_json: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            json_file: DEFAULT_JSON_FILE.to_string(),
            csv_file: DEFAULT_CSV_FILE.to_string(),
            pretty_json: true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HidConfig {
    pub layouts: Vec<ReportLayout>,
}

impl HidConfig {
    pub fn layout_for(&self, vendor_id: u16, product_id: u16) -> Option<&ReportLayout> {
        self.layouts
            .iter()
            .find(|l| l.matches(vendor_id, product_id))
    }
}

impl DebuggerConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let config: Self = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&src)?;
        tracing::debug!(path = %path.display(), layouts = config.hid.layouts.len(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_deadzone(self.deadzone)?;
        if self.precision > MAX_PRECISION {
            return Err(Error::InvalidConfig(format!(
                "precision must be at most {MAX_PRECISION}, got {}",
                self.precision
            )));
        }
        if self.export.json_file.trim().is_empty() || self.export.csv_file.trim().is_empty() {
            return Err(Error::InvalidConfig("export file names must not be empty".into()));
        }
        Ok(())
    }
}

/// A deadzone must be a finite, non-negative number.
pub fn validate_deadzone(deadzone: f32) -> Result<()> {
    if !deadzone.is_finite() || deadzone < 0.0 {
        return Err(Error::InvalidConfig(format!(
            "deadzone must be a finite value >= 0, got {deadzone}"
        )));
    }
    Ok(())
}
