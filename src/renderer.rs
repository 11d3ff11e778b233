use std::f32::consts::PI;

use macroquad::prelude::*;

use crate::config;
use crate::surface::DrawSurface;

/// Vertex at `angle` from vertical, `distance` away from `center`.
#[inline]
fn polar(center: Vec2, angle: f32, distance: f32) -> Vec2 {
    center + vec2(angle.sin() * distance, angle.cos() * distance)
}

/// Vertices of the agent arrow: nose first, then the two tail corners.
pub fn agent_vertices(center: Vec2, size: f32, rotation: f32) -> [Vec2; 3] {
    [
        polar(center, -rotation, size * 1.5),
        polar(center, -rotation + 2.0 / 3.0 * PI, size),
        polar(center, -rotation + 4.0 / 3.0 * PI, size),
    ]
}

/// Filled isosceles triangle whose nose tracks `rotation`.
pub fn draw_agent(
    surface: &mut impl DrawSurface,
    center: Vec2,
    size: f32,
    rotation: f32,
    color: Color,
) {
    let [nose, left, right] = agent_vertices(center, size, rotation);

    surface.begin_path();
    surface.move_to(nose);
    surface.line_to(left);
    surface.line_to(right);
    surface.line_to(nose);
    surface.fill(color);
}

pub fn draw_food(surface: &mut impl DrawSurface, center: Vec2, radius: f32) {
    surface.begin_path();
    surface.arc(center, radius, 0.0, 2.0 * PI);
    surface.fill(config::FOOD_COLOR);
}

/// Index 0 is the designated lead bird.
pub fn bird_color(index: usize) -> Color {
    if index == 0 {
        config::LEAD_BIRD_COLOR
    } else {
        config::BIRD_COLOR
    }
}
