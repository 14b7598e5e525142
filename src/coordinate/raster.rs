//! Georeferencing of a raster source

use super::bbox::BoundingRectangle;
use super::crs::CoordinateSystem;

/// Pixel size in raster units
///
/// `height` is conventionally negative for north-up rasters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSize {
    pub width: f64,
    pub height: f64,
}

/// Georeferencing metadata read from a raster
#[derive(Debug, Clone, PartialEq)]
pub struct RasterMetadata {
    /// X of the upper-left pixel corner
    pub origin_x: f64,
    /// Y of the upper-left pixel corner
    pub origin_y: f64,
    pub pixel_width: f64,
    pub pixel_height: f64,
    /// Number of columns
    pub cols: u64,
    /// Number of rows
    pub rows: u64,
    /// Coordinate system, `None` when the raster does not declare one
    pub crs: Option<CoordinateSystem>,
}

impl RasterMetadata {
    /// Build metadata from a GDAL-style geotransform
    ///
    /// # Arguments
    /// * `geotransform` - `[origin_x, pixel_width, 0, origin_y, 0, pixel_height]`
    pub fn from_geotransform(geotransform: [f64; 6], cols: u64, rows: u64, crs: Option<CoordinateSystem>) -> Self {
        RasterMetadata {
            origin_x: geotransform[0],
            origin_y: geotransform[3],
            pixel_width: geotransform[1],
            pixel_height: geotransform[5],
            cols,
            rows,
            crs,
        }
    }

    pub fn pixel_size(&self) -> PixelSize {
        PixelSize {
            width: self.pixel_width,
            height: self.pixel_height,
        }
    }

    /// Native extent of the raster, normalized
    pub fn extent(&self) -> BoundingRectangle {
        let lrx = self.origin_x + self.cols as f64 * self.pixel_width;
        let lry = self.origin_y + self.rows as f64 * self.pixel_height;
        BoundingRectangle::new(self.origin_x, self.origin_y, lrx, lry).normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_north_up_extent() {
        let raster = RasterMetadata::from_geotransform([0.0, 1.0, 0.0, 10.0, 0.0, -1.0], 10, 10, None);
        assert_eq!(raster.extent(), BoundingRectangle::from_bounds(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_south_up_extent_is_normalized() {
        let raster = RasterMetadata::from_geotransform([100.0, 0.5, 0.0, -20.0, 0.0, 0.25], 40, 80, None);
        let extent = raster.extent();
        assert_eq!(extent, BoundingRectangle::from_bounds(100.0, -20.0, 120.0, 0.0));
        assert!(!extent.is_degenerate());
    }
}
