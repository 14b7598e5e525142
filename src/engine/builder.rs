//! Assembles engine requests from resolved geometry and raster metadata

use log::{debug, warn};
use std::path::Path;

use crate::clip::ClipOptions;
use crate::coordinate::{BoundingRectangle, RasterMetadata};
use crate::engine::request::{BurnRequest, BurnSource, ClipRequest, MaskRequest};
use crate::errors::{ClipError, ClipResult};

/// Value pixels outside every burned feature start with
const BURN_INIT_VALUE: f64 = 0.0;

/// Where the engine reads its vector geometry from
#[derive(Debug, Clone, Copy)]
pub struct CutlineSource<'p> {
    pub path: &'p Path,
    /// The dataset is the unfiltered source, so the engine must apply the selection
    pub needs_selection: bool,
}

/// Builds a `ClipRequest` in burn or mask mode
pub struct ClipRequestBuilder<'a> {
    options: &'a ClipOptions,
    ignore_bad_cutline: bool,
}

impl<'a> ClipRequestBuilder<'a> {
    pub fn new(options: &'a ClipOptions) -> Self {
        ClipRequestBuilder {
            options,
            ignore_bad_cutline: true,
        }
    }

    pub fn ignore_bad_cutline(mut self, ignore: bool) -> Self {
        self.ignore_bad_cutline = ignore;
        self
    }

    /// Check option combinations before any input is opened
    ///
    /// # Returns
    /// Warnings about options that will have no effect
    pub fn validate(&self) -> ClipResult<Vec<String>> {
        let options = self.options;
        let mut warnings = Vec::new();

        match &options.burn {
            Some(BurnSource::Attribute(name)) => {
                if name.trim().is_empty() {
                    return Err(ClipError::InvalidArgument("Burn attribute name is empty".to_string()));
                }
                if options.invert {
                    return Err(ClipError::InvalidArgument(format!(
                        "Cannot burn attribute '{}' with invert: the inverted cutline has no attributes",
                        name
                    )));
                }
            },
            Some(BurnSource::Value(value)) if value.is_nan() => {
                return Err(ClipError::InvalidArgument("Burn value must be a number".to_string()));
            },
            _ => {},
        }

        if options.is_burn() {
            if options.dst_alpha {
                warnings.push("dstalpha is ignored when burning".to_string());
            }
            if options.dst_nodata.is_some() {
                warnings.push("dstnodata is ignored when burning".to_string());
            }
        }

        for message in &warnings {
            warn!("{}", message);
        }
        Ok(warnings)
    }

    /// Build the request
    ///
    /// # Arguments
    /// * `extent` - Resolved clip extent
    /// * `raster` - Input raster georeferencing, source of the pixel size
    /// * `cutline` - Vector dataset the engine reads
    /// * `input` - Input raster, read in mask mode only
    /// * `output` - Raster the engine writes
    pub fn build(
        &self,
        extent: BoundingRectangle,
        raster: &RasterMetadata,
        cutline: CutlineSource<'_>,
        input: &Path,
        output: &Path,
    ) -> ClipRequest {
        let options = self.options;
        let selection = if cutline.needs_selection && !options.selection.is_empty() {
            Some(options.selection.clone())
        } else {
            None
        };

        let request = match &options.burn {
            Some(source) => ClipRequest::Burn(BurnRequest {
                extent,
                pixel_size: raster.pixel_size(),
                output_type: options.output_type,
                source: source.clone(),
                selection,
                init_value: BURN_INIT_VALUE,
                vector: cutline.path.to_path_buf(),
                output: output.to_path_buf(),
            }),
            None => ClipRequest::Mask(MaskRequest {
                extent,
                pixel_size: raster.pixel_size(),
                output_type: options.output_type,
                alpha: options.dst_alpha,
                nodata: options.dst_nodata,
                cutline: cutline.path.to_path_buf(),
                selection,
                ignore_bad_cutline: self.ignore_bad_cutline,
                input: input.to_path_buf(),
                output: output.to_path_buf(),
            }),
        };

        debug!("Built {} request over {}", request.mode_name(), extent);
        request
    }
}
