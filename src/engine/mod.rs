//! Engine requests and the raster engines that execute them

pub mod builder;
pub mod gdal;
pub mod output_type;
pub mod request;

pub use builder::{ClipRequestBuilder, CutlineSource};
pub use gdal::GdalCommandEngine;
pub use output_type::OutputType;
pub use request::{BurnRequest, BurnSource, ClipRequest, MaskRequest};

use crate::errors::ClipResult;

/// Executes rasterize and warp requests
pub trait RasterEngine {
    /// Produce the output raster of a request
    fn execute(&self, request: &ClipRequest) -> ClipResult<()>;

    /// Human-readable form of what `execute` would run
    fn describe(&self, request: &ClipRequest) -> String;
}
