//! Error types for terrain grid generation.
use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, TerrainError>;

/// Fatal failures of a pipeline call.
/// Malformed input lines are not errors; see [`crate::xyz::LineDiagnostic`].
#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error on stream: {0}")]
    Stream(#[from] std::io::Error),

    #[error("{stage} requires at least one point, got none")]
    EmptySet { stage: &'static str },

    #[error("grid spacing must be a finite value greater than 0, got {0}")]
    InvalidSpacing(f64),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("interpolation attempted without source points")]
    NoData,

    #[error("could not parse config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("JSON serialisation failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl TerrainError {
    /// Wrap an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TerrainError::Io {
            path: path.into(),
            source,
        }
    }
}
