// All tunable viewer and stand-in engine constants in one place.

use std::path::Path;

use macroquad::color::Color;
use serde::Deserialize;
use thiserror::Error;

// Render loop
pub const DEFAULT_STEPS_PER_FRAME: usize = 1;

// Viewport (logical units)
pub const DEFAULT_VIEWPORT_WIDTH: f32 = 800.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 600.0;
pub const CONTROL_PANEL_WIDTH: f32 = 240.0;

// Primitive sizes, as fractions of the viewport width
pub const FOOD_RADIUS_FACTOR: f32 = 0.01 / 2.0;
pub const BIRD_SIZE_FACTOR: f32 = 0.01;

// Colors
pub const BG_COLOR: Color = Color::new(0.0, 0.0, 0.0, 1.0);
pub const FOOD_COLOR: Color = Color::new(0.0, 1.0, 128.0 / 255.0, 1.0);
pub const LEAD_BIRD_COLOR: Color = Color::new(1.0, 0.0, 0.0, 1.0);
pub const BIRD_COLOR: Color = Color::new(1.0, 1.0, 1.0, 1.0);

// Stand-in engine
pub const DEFAULT_BIRD_COUNT: usize = 40;
pub const DEFAULT_FOOD_COUNT: usize = 60;
pub const DEFAULT_GENERATION_LENGTH: usize = 2500;
pub const BIRD_SPEED_MIN: f32 = 0.001;
pub const BIRD_SPEED_MAX: f32 = 0.005;
pub const BIRD_INITIAL_SPEED: f32 = 0.002;
pub const BIRD_SPEED_JITTER: f32 = 0.0002;
pub const BIRD_TURN_JITTER: f32 = std::f32::consts::FRAC_PI_8;
pub const EAT_RADIUS: f32 = 0.01;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("steps_per_frame must be at least 1")]
    ZeroStepsPerFrame,
    #[error("viewport size must be positive, got {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
    #[error("population must contain at least one bird")]
    NoBirds,
    #[error("generation_length must be at least 1")]
    ZeroGenerationLength,
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Runtime configuration, loaded from an optional JSON file and then
/// overridden from the command line.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub steps_per_frame: usize,
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub seed: Option<u64>,
    pub start_paused: bool,
    pub birds: usize,
    pub foods: usize,
    pub generation_length: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            steps_per_frame: DEFAULT_STEPS_PER_FRAME,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            seed: None,
            start_paused: false,
            birds: DEFAULT_BIRD_COUNT,
            foods: DEFAULT_FOOD_COUNT,
            generation_length: DEFAULT_GENERATION_LENGTH,
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(text: &str, origin: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text, &path.display().to_string())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps_per_frame == 0 {
            return Err(ConfigError::ZeroStepsPerFrame);
        }
        // pixel ratio is at least 1, so a side of 1 keeps the buffer non-empty
        let valid_size = |v: f32| v.is_finite() && v >= 1.0;
        if !valid_size(self.viewport_width) || !valid_size(self.viewport_height) {
            return Err(ConfigError::InvalidViewport {
                width: self.viewport_width,
                height: self.viewport_height,
            });
        }
        if self.birds == 0 {
            return Err(ConfigError::NoBirds);
        }
        if self.generation_length == 0 {
            return Err(ConfigError::ZeroGenerationLength);
        }
        Ok(())
    }
}
