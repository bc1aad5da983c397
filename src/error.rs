use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollisionError {
    #[error("collision space is not initialized, call init() first")]
    NotInitialized,
    #[error("collision space is already initialized, call reset() before init()")]
    AlreadyInitialized,
    #[error("collision space has no dimensions, call set_dimensions() before init()")]
    MissingDimensions,
    #[error("invalid dimensions {width} x {height}: both must be finite and positive")]
    InvalidDimensions { width: f64, height: f64 },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("invalid geometry for object '{id}': {reason}")]
    InvalidGeometry { id: String, reason: String },
}

pub type Result<T> = std::result::Result<T, CollisionError>;
