//! Custom error types for clip operations

use std::fmt;
use std::io;

use crate::coordinate::BoundingRectangle;

/// Errors raised while planning or executing a clip
#[derive(Debug)]
pub enum ClipError {
    /// Raster or vector source cannot be opened
    InputNotFound { path: String, reason: String },
    /// The feature selection produced no usable features
    EmptySelection,
    /// The resolved bounding rectangle has zero or negative area
    DegenerateExtent(BoundingRectangle),
    /// Unrecognized pixel type token
    InvalidOutputType(String),
    /// The delegated rasterize/warp call failed
    EngineFailure {
        program: String,
        status: Option<i32>,
        stderr: String,
    },
    /// A feature without usable geometry was skipped (recoverable)
    PartialGeometry { feature: usize },
    /// Raster and feature coordinate systems disagree
    CrsMismatch { expected: String, found: String },
    /// Malformed attribute predicate or query
    InvalidSelection(String),
    /// The raster opened but carries no usable georeferencing
    InvalidRaster(String),
    /// Conflicting or malformed options
    InvalidArgument(String),
    /// Configuration file error
    Config(String),
    /// I/O error
    IoError(io::Error),
}

impl fmt::Display for ClipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipError::InputNotFound { path, reason } => write!(f, "Could not open {}: {}", path, reason),
            ClipError::EmptySelection => write!(f, "No features selected"),
            ClipError::DegenerateExtent(r) => write!(
                f,
                "Degenerate extent ({}, {}) - ({}, {}): raster and shape extents do not overlap",
                r.ulx, r.lry, r.lrx, r.uly
            ),
            ClipError::InvalidOutputType(t) => write!(f, "Invalid output type: {}", t),
            ClipError::EngineFailure { program, status, stderr } => match status {
                Some(code) => write!(f, "{} exited with status {}: {}", program, code, stderr.trim()),
                None => write!(f, "{} failed: {}", program, stderr.trim()),
            },
            ClipError::PartialGeometry { feature } => {
                write!(f, "Feature {} has no polygonal geometry and was skipped", feature)
            }
            ClipError::CrsMismatch { expected, found } => {
                write!(f, "Coordinate system mismatch: expected {}, found {}", expected, found)
            }
            ClipError::InvalidSelection(msg) => write!(f, "Invalid feature selection: {}", msg),
            ClipError::InvalidRaster(msg) => write!(f, "Invalid raster: {}", msg),
            ClipError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            ClipError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ClipError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ClipError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClipError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ClipError {
    fn from(error: io::Error) -> Self {
        ClipError::IoError(error)
    }
}

impl From<String> for ClipError {
    fn from(msg: String) -> Self {
        ClipError::InvalidArgument(msg)
    }
}

/// Result type for clip operations
pub type ClipResult<T> = Result<T, ClipError>;
