//! TIFF and GeoTIFF constants
//!
//! Only the header values, field types, tags and GeoKeys needed to recover
//! a raster's georeferencing.

/// TIFF header constants
pub mod header {
    /// Standard TIFF version number (42)
    pub const TIFF_VERSION: u16 = 42;

    /// BigTIFF version number (43)
    pub const BIG_TIFF_VERSION: u16 = 43;

    /// BigTIFF offset size (8 bytes)
    pub const BIGTIFF_OFFSET_SIZE: u16 = 8;
}

/// Field types as defined by TIFF 6.0 and BigTIFF
pub mod field_types {
    pub const BYTE: u16 = 1;
    pub const ASCII: u16 = 2;
    pub const SHORT: u16 = 3;
    pub const LONG: u16 = 4;
    pub const RATIONAL: u16 = 5;
    pub const SBYTE: u16 = 6;
    pub const UNDEFINED: u16 = 7;
    pub const SSHORT: u16 = 8;
    pub const SLONG: u16 = 9;
    pub const SRATIONAL: u16 = 10;
    pub const FLOAT: u16 = 11;
    pub const DOUBLE: u16 = 12;
    pub const LONG8: u16 = 16;
    pub const SLONG8: u16 = 17;
    pub const IFD8: u16 = 18;
}

/// Tags read from the first IFD
pub mod tags {
    pub const IMAGE_WIDTH: u16 = 256;
    pub const IMAGE_LENGTH: u16 = 257;

    pub const MODEL_PIXEL_SCALE_TAG: u16 = 33550;
    pub const MODEL_TIEPOINT_TAG: u16 = 33922;
    pub const MODEL_TRANSFORMATION_TAG: u16 = 34264;
    pub const GEO_KEY_DIRECTORY_TAG: u16 = 34735;
}

/// GeoKey identifiers
pub mod geo_keys {
    pub const GT_RASTER_TYPE_GEO_KEY: u16 = 1025;
    pub const GEOGRAPHIC_TYPE_GEO_KEY: u16 = 2048;
    pub const PROJECTED_CS_TYPE_GEO_KEY: u16 = 3072;

    /// `GTRasterTypeGeoKey` value for point-sampled rasters
    pub const RASTER_PIXEL_IS_POINT: u16 = 2;

    /// Code meaning "user-defined" in CRS keys
    pub const USER_DEFINED: u16 = 32767;
}
