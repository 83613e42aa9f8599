//! Error types for the simulation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Position ({x}, {y}) is outside a grid of size {size}")]
    OutOfBounds { x: i32, y: i32, size: i32 },

    #[error("Invalid grid size: {0}")]
    InvalidSize(i32),

    #[error("Cannot plant at ({x}, {y}): {reason}")]
    InvalidPlacement { x: i32, y: i32, reason: String },

    #[error("Unknown species: {0}")]
    UnknownSpecies(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
