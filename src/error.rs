use thiserror::Error;

use crate::config::ConfigError;
use crate::engine::EngineError;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("simulation engine fault: {0}")]
    Engine(#[from] EngineError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("report serialization error: {0}")]
    Report(#[from] serde_json::Error),
}
