//! Description of one clip run

use std::path::PathBuf;

use crate::engine::{BurnSource, OutputType};
use crate::vector::FeatureSelection;

/// Options controlling how the cutline is applied
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipOptions {
    /// Burn into a blank raster instead of masking the input
    pub burn: Option<BurnSource>,
    pub dst_alpha: bool,
    pub dst_nodata: Option<f64>,
    /// Restrict the output extent to the selected features
    pub crop_to_cutline: bool,
    /// Clip to everything outside the selected features
    pub invert: bool,
    pub selection: FeatureSelection,
    pub output_type: Option<OutputType>,
    /// Replace an existing output without asking
    pub overwrite: bool,
}

impl ClipOptions {
    pub fn is_burn(&self) -> bool {
        self.burn.is_some()
    }
}

/// Input raster, cutline source and output raster of a run
#[derive(Debug, Clone, PartialEq)]
pub struct ClipJob {
    pub input: PathBuf,
    pub cutline: PathBuf,
    pub output: PathBuf,
    pub options: ClipOptions,
}

impl ClipJob {
    pub fn new<P: Into<PathBuf>>(input: P, cutline: P, output: P, options: ClipOptions) -> Self {
        ClipJob {
            input: input.into(),
            cutline: cutline.into(),
            output: output.into(),
            options,
        }
    }
}
