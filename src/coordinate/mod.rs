//! Coordinate handling for raster and vector data
//!
//! Bounding rectangles, raster georeferencing and coordinate system
//! identifiers shared by the geometry and engine layers.

mod bbox;
mod crs;
mod raster;

pub use self::bbox::BoundingRectangle;
pub use self::crs::{CoordinateSystem, CoordinateSystemFactory};
pub use self::raster::{PixelSize, RasterMetadata};
