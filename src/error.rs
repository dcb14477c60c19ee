use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerrainError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Coordinates ({x}, {y}) out of bounds for {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TerrainError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        TerrainError::InvalidConfiguration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, TerrainError>;
