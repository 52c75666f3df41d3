//! Error types shared across the generator.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised when building a grid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    EmptyDimensions { width: usize, height: usize },
}

/// Errors raised while writing a rendered field.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("pixel buffer has {actual} entries, expected {expected}")]
    PixelCount { expected: usize, actual: usize },
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to save image {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Errors raised while loading run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid parameter: {0}")]
    Invalid(String),
}

/// Any failure surfaced by the library's fallible entry points.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
