//! Requests handed to a raster engine
//!
//! Burning and masking are separate request types: a request is exactly one
//! of them, never a mix of their options.

use std::path::{Path, PathBuf};

use crate::coordinate::{BoundingRectangle, PixelSize};
use crate::engine::output_type::OutputType;
use crate::vector::FeatureSelection;

/// What gets burned into the blank raster
#[derive(Debug, Clone, PartialEq)]
pub enum BurnSource {
    /// A fixed value
    Value(f64),
    /// The value of a feature attribute
    Attribute(String),
}

/// Rasterize vector geometry into a freshly initialized raster
#[derive(Debug, Clone, PartialEq)]
pub struct BurnRequest {
    pub extent: BoundingRectangle,
    pub pixel_size: PixelSize,
    pub output_type: Option<OutputType>,
    pub source: BurnSource,
    /// Filter the engine applies itself; `None` when `vector` is pre-filtered
    pub selection: Option<FeatureSelection>,
    /// Value of pixels not covered by any feature
    pub init_value: f64,
    pub vector: PathBuf,
    pub output: PathBuf,
}

/// Warp the input raster using the vector geometry as a cutline
#[derive(Debug, Clone, PartialEq)]
pub struct MaskRequest {
    pub extent: BoundingRectangle,
    pub pixel_size: PixelSize,
    pub output_type: Option<OutputType>,
    /// Add an alpha band marking pixels outside the cutline
    pub alpha: bool,
    /// Value written to pixels outside the cutline
    pub nodata: Option<f64>,
    pub cutline: PathBuf,
    /// Filter the engine applies itself; `None` when `cutline` is pre-filtered
    pub selection: Option<FeatureSelection>,
    /// Tolerate invalid cutline geometry
    pub ignore_bad_cutline: bool,
    pub input: PathBuf,
    pub output: PathBuf,
}

/// A fully determined engine call
#[derive(Debug, Clone, PartialEq)]
pub enum ClipRequest {
    Burn(BurnRequest),
    Mask(MaskRequest),
}

impl ClipRequest {
    pub fn extent(&self) -> &BoundingRectangle {
        match self {
            ClipRequest::Burn(r) => &r.extent,
            ClipRequest::Mask(r) => &r.extent,
        }
    }

    pub fn output(&self) -> &Path {
        match self {
            ClipRequest::Burn(r) => &r.output,
            ClipRequest::Mask(r) => &r.output,
        }
    }

    /// Vector dataset the engine reads
    pub fn vector(&self) -> &Path {
        match self {
            ClipRequest::Burn(r) => &r.vector,
            ClipRequest::Mask(r) => &r.cutline,
        }
    }

    /// Same request writing to another path
    pub fn with_output(&self, output: &Path) -> ClipRequest {
        let mut request = self.clone();
        match &mut request {
            ClipRequest::Burn(r) => r.output = output.to_path_buf(),
            ClipRequest::Mask(r) => r.output = output.to_path_buf(),
        }
        request
    }

    pub fn mode_name(&self) -> &'static str {
        match self {
            ClipRequest::Burn(_) => "burn",
            ClipRequest::Mask(_) => "mask",
        }
    }
}
