//! Editor settings, deserialised from the host's camelCase JSON.

use crate::error::LoadError;
use serde::{Deserialize, Serialize};

/// Feature switches of the unified editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Capabilities {
    /// Layer reordering and visibility toggling.
    pub layers: bool,
    /// Interactive resize/rotate of a single field.
    pub transform: bool,
    /// Modifier-click toggles membership instead of replacing the selection.
    pub multi_select: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            layers: true,
            transform: true,
            multi_select: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorSettings {
    /// Grid lines are drawn and offered as snap candidates.
    pub grid_enabled: bool,
    /// Master switch for snapping.
    pub snap_to_grid: bool,
    /// Grid cell size in image pixels.
    pub grid_size: f64,
    /// Snap distance in image pixels (exclusive).
    pub snap_threshold: f64,
    /// Maximum number of undo steps kept.
    pub history_depth: usize,
    pub capabilities: Capabilities,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            grid_enabled: true,
            snap_to_grid: true,
            grid_size: 50.0,
            snap_threshold: 10.0,
            history_depth: 200,
            capabilities: Capabilities::default(),
        }
    }
}

impl EditorSettings {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }
}
