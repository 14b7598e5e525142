//! I/O helpers for reading raster headers
//!
//! Byte order strategies and the seekable reader abstraction used by the
//! GeoTIFF header reader.

pub mod seekable;
pub mod byte_order;
