//! Canvas-space geometry.

use serde::{Deserialize, Serialize};

use super::CanvasConfig;

/// Axis-aligned rectangle in canvas pixels (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Width of the liquid column drawn inside the beaker.
pub const BEAKER_WIDTH: f32 = 96.0;
/// Height of a full liquid column.
pub const BEAKER_FILL_HEIGHT: f32 = 100.0;
/// Distance from the canvas bottom to the top of the liquid column.
pub const BEAKER_TOP_OFFSET: f32 = 130.0;

impl CanvasConfig {
    /// Region occupied by the beaker contents.
    pub fn beaker_rect(&self) -> Rect {
        Rect::new(
            self.width / 2.0 - BEAKER_WIDTH / 2.0,
            self.height - BEAKER_TOP_OFFSET,
            BEAKER_WIDTH,
            BEAKER_FILL_HEIGHT,
        )
    }
}
