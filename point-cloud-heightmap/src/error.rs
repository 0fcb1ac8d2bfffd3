/// Error and warning types for loading, processing and writing height maps
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn a point file into a point sequence. Fatal to the load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read point data: {0}")]
    Read(#[from] std::io::Error),

    /// Malformed line; `line` is 1-based.
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Axis {
    X,
    Y,
}

/// Degenerate input that makes the grid resolution undefined
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidInput {
    #[error("point cloud is empty")]
    NoPoints,

    #[error("point cloud has zero extent along {axis:?}")]
    ZeroExtent { axis: Axis },

    #[error("density multiplier must be positive, got {0}")]
    NonPositiveMultiplier(f64),

    #[error("point {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    #[error("grid resolution is not a positive finite number ({0})")]
    DegenerateResolution(f64),

    #[error("grid of {rows}x{cols} cells exceeds the allocation limit")]
    GridTooLarge { rows: usize, cols: usize },

    #[error("gap-fill radius {radius} is outside 0..={max}")]
    FillRadiusOutOfRange { radius: u32, max: u32 },

    #[error("high-pass sigma {sigma} is outside 0..={max}")]
    SigmaOutOfRange { sigma: f64, max: f64 },
}

/// Failure of a single pipeline run. The caller may adjust parameters and retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
}

/// Non-fatal conditions reported with a successful run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum PipelineWarning {
    #[error("lower clamp is not below upper clamp, image left empty")]
    DegenerateClampWindow,

    #[error("depth values have zero spread, samples drawn mid-grey")]
    ZeroDepthVariance,

    #[error("gap fill requested on an image with no samples, left unchanged")]
    EmptyImage,
}

/// Failure to write results to disk
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to encode image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialise manifest: {0}")]
    Json(#[from] serde_json::Error),
}

/// Any failure of an end-to-end conversion
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Output(#[from] OutputError),
}
