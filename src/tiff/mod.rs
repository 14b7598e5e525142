//! GeoTIFF header parsing
//!
//! Reads the georeferencing of TIFF and BigTIFF rasters without decoding
//! pixel data.

pub(crate) mod constants;
pub mod ifd;
pub mod reader;
pub mod georef;
#[cfg(test)]
mod tests;

pub use georef::{read_metadata, read_raster_metadata, GeoKeyEntry};
pub use ifd::{Ifd, IfdEntry};
pub use reader::TiffHeaderReader;
