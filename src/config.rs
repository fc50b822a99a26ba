//! Persistable device settings
//!
//! Everything a caller can set on a device apart from its pixels, palette
//! and buffer. Stored as pretty-printed JSON.

use crate::error::DrawError;
use crate::format::DisplayMode;
use crate::geometry::Point;
use crate::mapper::{Orientation, Scaling};
use crate::shadow::ShadowFade;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn config_err(e: impl ToString) -> DrawError {
    DrawError::Config(e.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub orientation: Orientation,
    pub scaling: Scaling,
    pub dither_origin: Point,
    pub user_display_mode: Option<DisplayMode>,
    pub shadow: ShadowFade,
}

impl DeviceConfig {
    pub fn to_json(&self) -> Result<String, DrawError> {
        serde_json::to_string_pretty(self).map_err(config_err)
    }

    pub fn from_json(json: &str) -> Result<Self, DrawError> {
        serde_json::from_str(json).map_err(config_err)
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DrawError> {
        fs::write(path, self.to_json()?).map_err(config_err)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DrawError> {
        let json = fs::read_to_string(path).map_err(config_err)?;
        Self::from_json(&json)
    }
}
