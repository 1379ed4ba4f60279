//! Display scaling for the fixed-size playfield

use crate::consts::BASE_WIDTH;

/// Tracks the window size and the uniform scale applied to the canvas
///
/// The playfield is laid out at `base_width` units; the host scales the
/// canvas element so it fits the smaller window dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub base_width: f32,
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(BASE_WIDTH)
    }
}

impl Viewport {
    pub fn new(base_width: f32) -> Self {
        Self {
            base_width,
            width: base_width,
            height: base_width,
            scale: 1.0,
        }
    }

    /// Record a new window size and return the canvas scale
    ///
    /// Degenerate sizes keep the previous scale.
    pub fn on_viewport_resize(&mut self, width: f32, height: f32) -> f32 {
        if width > 0.0 && height > 0.0 {
            self.width = width;
            self.height = height;
            self.scale = width.min(height) / self.base_width;
            log::debug!("Viewport {}x{} -> scale {:.3}", width, height, self.scale);
        }
        self.scale
    }

    /// CSS transform value for the canvas element
    pub fn css_transform(&self) -> String {
        format!("scale({})", self.scale)
    }
}
