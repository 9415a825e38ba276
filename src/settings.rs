use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::stroke::BrushMode;

pub const DEFAULT_BRUSH_WIDTH: f32 = 1.0;
pub const DEFAULT_BRUSH_COLOR: Color32 = Color32::BLACK;

/// Attributes applied to the next stroke that begins
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct BrushSettings {
    pub width: f32,
    pub color: Color32,
    pub mode: BrushMode,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_BRUSH_WIDTH,
            color: DEFAULT_BRUSH_COLOR,
            mode: BrushMode::Paint,
        }
    }
}

impl BrushSettings {
    /// Widths must be finite and strictly positive
    pub fn is_valid_width(width: f32) -> bool {
        width.is_finite() && width > 0.0
    }
}
