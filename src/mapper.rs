use macroquad::prelude::*;

use crate::config;

/// Map a normalized world coordinate onto the logical drawing region.
/// Inputs are not clamped; anything outside [0, 1] lands off-surface.
#[inline]
pub fn to_device(x: f32, y: f32, logical_width: f32, logical_height: f32) -> Vec2 {
    vec2(x * logical_width, y * logical_height)
}

/// Render surface state: logical size plus the device pixel ratio the
/// backing buffer is scaled by. Fixed for the lifetime of the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub logical_width: f32,
    pub logical_height: f32,
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(logical_width: f32, logical_height: f32, pixel_ratio: f32) -> Self {
        let pixel_ratio = if pixel_ratio.is_finite() {
            pixel_ratio.max(1.0)
        } else {
            1.0
        };

        Self {
            logical_width,
            logical_height,
            pixel_ratio,
        }
    }

    /// Backing buffer size in physical pixels (logical size times ratio).
    pub fn physical_size(&self) -> (u32, u32) {
        (
            (self.logical_width * self.pixel_ratio).round() as u32,
            (self.logical_height * self.pixel_ratio).round() as u32,
        )
    }

    pub fn map(&self, x: f32, y: f32) -> Vec2 {
        to_device(x, y, self.logical_width, self.logical_height)
    }

    pub fn food_radius(&self) -> f32 {
        config::FOOD_RADIUS_FACTOR * self.logical_width
    }

    pub fn bird_size(&self) -> f32 {
        config::BIRD_SIZE_FACTOR * self.logical_width
    }
}
