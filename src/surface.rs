//! 2D drawing surface with a canvas-style path API.
//!
//! Renderers only talk to [`DrawSurface`]; the window-backed implementation
//! draws into an offscreen render target so the last frame survives while
//! the loop is idle.

use std::f32::consts::TAU;

use macroquad::prelude::*;

use crate::config;
use crate::error::ViewerError;
use crate::mapper::Viewport;

/// Segments used to approximate a partial arc.
const ARC_SEGMENTS: usize = 32;

pub trait DrawSurface {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn begin_path(&mut self);
    fn move_to(&mut self, p: Vec2);
    fn line_to(&mut self, p: Vec2);
    fn arc(&mut self, center: Vec2, radius: f32, start_angle: f32, end_angle: f32);
    fn fill(&mut self, color: Color);
}

#[derive(Clone, Debug, PartialEq)]
pub enum SubPath {
    Polygon(Vec<Vec2>),
    Circle { center: Vec2, radius: f32 },
}

/// Path under construction between `begin_path` and `fill`.
#[derive(Clone, Debug, Default)]
pub struct Path {
    subpaths: Vec<SubPath>,
}

impl Path {
    pub fn clear(&mut self) {
        self.subpaths.clear();
    }

    pub fn move_to(&mut self, p: Vec2) {
        self.subpaths.push(SubPath::Polygon(vec![p]));
    }

    pub fn line_to(&mut self, p: Vec2) {
        match self.subpaths.last_mut() {
            Some(SubPath::Polygon(points)) => points.push(p),
            _ => self.move_to(p),
        }
    }

    /// A full sweep with no open polygon becomes a circle; anything else is
    /// sampled into the current polygon.
    pub fn arc(&mut self, center: Vec2, radius: f32, start_angle: f32, end_angle: f32) {
        let sweep = end_angle - start_angle;
        let open_polygon = matches!(self.subpaths.last(), Some(SubPath::Polygon(_)));
        if sweep.abs() >= TAU - 1e-4 && !open_polygon {
            self.subpaths.push(SubPath::Circle { center, radius });
            return;
        }

        for i in 0..=ARC_SEGMENTS {
            let angle = start_angle + sweep * i as f32 / ARC_SEGMENTS as f32;
            self.line_to(center + vec2(angle.cos(), angle.sin()) * radius);
        }
    }

    pub fn subpaths(&self) -> &[SubPath] {
        &self.subpaths
    }
}

/// Window-backed surface. The backing render target is sized in physical
/// pixels while the camera maps logical units onto it, so draw calls never
/// see the pixel ratio.
pub struct CanvasSurface {
    target: RenderTarget,
    camera: Camera2D,
    viewport: Viewport,
    path: Path,
}

impl CanvasSurface {
    pub fn new(viewport: Viewport) -> Result<Self, ViewerError> {
        let (width, height) = viewport.physical_size();
        if width == 0 || height == 0 {
            return Err(ViewerError::SurfaceUnavailable(format!(
                "backing buffer would be {width}x{height} pixels"
            )));
        }

        let target = render_target(width, height);
        target.texture.set_filter(FilterMode::Linear);

        let camera = Camera2D {
            render_target: Some(target.clone()),
            ..Camera2D::from_display_rect(Rect::new(
                0.0,
                0.0,
                viewport.logical_width,
                viewport.logical_height,
            ))
        };

        Ok(Self {
            target,
            camera,
            viewport,
            path: Path::default(),
        })
    }

    /// Redirect drawing into the backing buffer.
    pub fn bind(&self) {
        set_camera(&self.camera);
    }

    pub fn unbind(&self) {
        set_default_camera();
    }

    /// Blit the last completed frame to the screen at logical size.
    pub fn present(&self, x: f32, y: f32) {
        draw_texture_ex(
            &self.target.texture,
            x,
            y,
            WHITE,
            blit_params(&self.viewport),
        );
    }

    fn fill_polygon(points: &[Vec2], color: Color) {
        // Triangle fan; agents and arcs are convex.
        if points.len() < 3 {
            return;
        }
        let origin = points[0];
        for pair in points[1..].windows(2) {
            draw_triangle(origin, pair[0], pair[1], color);
        }
    }
}

impl DrawSurface for CanvasSurface {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let full = x <= 0.0
            && y <= 0.0
            && width >= self.viewport.logical_width
            && height >= self.viewport.logical_height;
        if full {
            clear_background(config::BG_COLOR);
        } else {
            draw_rectangle(x, y, width, height, config::BG_COLOR);
        }
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, p: Vec2) {
        self.path.move_to(p);
    }

    fn line_to(&mut self, p: Vec2) {
        self.path.line_to(p);
    }

    fn arc(&mut self, center: Vec2, radius: f32, start_angle: f32, end_angle: f32) {
        self.path.arc(center, radius, start_angle, end_angle);
    }

    fn fill(&mut self, color: Color) {
        for subpath in self.path.subpaths() {
            match subpath {
                SubPath::Polygon(points) => Self::fill_polygon(points, color),
                SubPath::Circle { center, radius } => {
                    draw_circle(center.x, center.y, *radius, color)
                }
            }
        }
    }
}

/// The render target is written through a y-inverted camera, so the blit
/// flips it back to top-left origin.
fn blit_params(viewport: &Viewport) -> DrawTextureParams {
    DrawTextureParams {
        dest_size: Some(vec2(viewport.logical_width, viewport.logical_height)),
        flip_y: true,
        ..Default::default()
    }
}

/// Surface that only counts what would have been drawn. Used by headless
/// runs.
#[derive(Debug, Default)]
pub struct CountingSurface {
    pub clears: u64,
    pub fills: u64,
    path: Path,
}

impl DrawSurface for CountingSurface {
    fn clear_rect(&mut self, _x: f32, _y: f32, _width: f32, _height: f32) {
        self.clears += 1;
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, p: Vec2) {
        self.path.move_to(p);
    }

    fn line_to(&mut self, p: Vec2) {
        self.path.line_to(p);
    }

    fn arc(&mut self, center: Vec2, radius: f32, start_angle: f32, end_angle: f32) {
        self.path.arc(center, radius, start_angle, end_angle);
    }

    fn fill(&mut self, _color: Color) {
        if !self.path.subpaths().is_empty() {
            self.fills += 1;
        }
    }
}
