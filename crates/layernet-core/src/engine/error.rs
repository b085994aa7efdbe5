use super::config::ConfigError;
use crate::core::models::network::NetworkError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("Invalid viewport {width} x {height}: both dimensions must be finite and positive")]
    InvalidViewport { width: f64, height: f64 },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
