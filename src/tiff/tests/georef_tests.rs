//! Tests for GeoTIFF georeferencing

use std::io::{Cursor, Write};
use std::path::Path;

use crate::coordinate::{BoundingRectangle, CoordinateSystem};
use crate::errors::ClipError;
use crate::io::byte_order::ByteOrder;
use crate::tiff::georef::{read_metadata, read_raster_metadata};
use crate::tiff::tests::test_utils::{build_tiff, geo_key_directory, simple_geotiff, TestValue};

#[test]
fn test_little_endian_tiepoint_raster() {
    let bytes = simple_geotiff(ByteOrder::LittleEndian, false, 32633);
    let metadata = read_metadata(&mut Cursor::new(bytes)).unwrap();

    assert_eq!(metadata.cols, 10);
    assert_eq!(metadata.rows, 10);
    assert_eq!(metadata.pixel_width, 1.0);
    assert_eq!(metadata.pixel_height, -1.0);
    assert_eq!(metadata.crs, Some(CoordinateSystem::UTM(33, true)));
    assert_eq!(metadata.extent(), BoundingRectangle::from_bounds(0.0, 0.0, 10.0, 10.0));
}

#[test]
fn test_big_endian_and_bigtiff_agree() {
    let classic = read_metadata(&mut Cursor::new(simple_geotiff(ByteOrder::BigEndian, false, 4326))).unwrap();
    let big = read_metadata(&mut Cursor::new(simple_geotiff(ByteOrder::LittleEndian, true, 4326))).unwrap();

    assert_eq!(classic, big);
    assert_eq!(classic.crs, Some(CoordinateSystem::WGS84));
}

#[test]
fn test_short_dimensions_and_geographic_key() {
    let bytes = build_tiff(ByteOrder::BigEndian, false, &[
        (256, TestValue::Short(200)),
        (257, TestValue::Short(100)),
        (33550, TestValue::Doubles(vec![0.5, 0.25, 0.0])),
        (33922, TestValue::Doubles(vec![0.0, 0.0, 0.0, -10.0, 50.0, 0.0])),
        (34735, geo_key_directory(2048, 4326)),
    ]);
    let metadata = read_metadata(&mut Cursor::new(bytes)).unwrap();

    assert_eq!((metadata.cols, metadata.rows), (200, 100));
    assert_eq!(metadata.extent(), BoundingRectangle::from_bounds(-10.0, 25.0, 90.0, 50.0));
    assert_eq!(metadata.crs, Some(CoordinateSystem::WGS84));
}

#[test]
fn test_model_transformation() {
    let mut matrix = vec![0.0; 16];
    matrix[0] = 2.0;
    matrix[3] = 100.0;
    matrix[5] = -2.0;
    matrix[7] = 200.0;
    matrix[15] = 1.0;
    let bytes = build_tiff(ByteOrder::LittleEndian, false, &[
        (256, TestValue::Long(5)),
        (257, TestValue::Long(5)),
        (34264, TestValue::Doubles(matrix)),
    ]);
    let metadata = read_metadata(&mut Cursor::new(bytes)).unwrap();

    assert_eq!(metadata.extent(), BoundingRectangle::from_bounds(100.0, 190.0, 110.0, 200.0));
    assert_eq!(metadata.crs, None);
}

#[test]
fn test_rotated_transformation_is_rejected() {
    let mut matrix = vec![0.0; 16];
    matrix[0] = 1.0;
    matrix[1] = 0.1;
    matrix[5] = -1.0;
    let bytes = build_tiff(ByteOrder::LittleEndian, false, &[
        (256, TestValue::Long(5)),
        (257, TestValue::Long(5)),
        (34264, TestValue::Doubles(matrix)),
    ]);
    assert!(matches!(read_metadata(&mut Cursor::new(bytes)), Err(ClipError::InvalidRaster(_))));
}

#[test]
fn test_pixel_is_point_shifts_origin() {
    let bytes = build_tiff(ByteOrder::LittleEndian, false, &[
        (256, TestValue::Long(10)),
        (257, TestValue::Long(10)),
        (33550, TestValue::Doubles(vec![1.0, 1.0, 0.0])),
        (33922, TestValue::Doubles(vec![0.0, 0.0, 0.0, 0.5, 9.5, 0.0])),
        (34735, TestValue::Shorts(vec![1, 1, 0, 2, 1025, 0, 1, 2, 3072, 0, 1, 32632])),
    ]);
    let metadata = read_metadata(&mut Cursor::new(bytes)).unwrap();

    assert_eq!(metadata.extent(), BoundingRectangle::from_bounds(0.0, 0.0, 10.0, 10.0));
    assert_eq!(metadata.crs, Some(CoordinateSystem::UTM(32, true)));
}

#[test]
fn test_user_defined_crs_is_unknown() {
    let bytes = build_tiff(ByteOrder::LittleEndian, false, &[
        (256, TestValue::Long(10)),
        (257, TestValue::Long(10)),
        (33550, TestValue::Doubles(vec![1.0, 1.0, 0.0])),
        (33922, TestValue::Doubles(vec![0.0, 0.0, 0.0, 0.0, 10.0, 0.0])),
        (34735, geo_key_directory(3072, 32767)),
    ]);
    assert_eq!(read_metadata(&mut Cursor::new(bytes)).unwrap().crs, None);
}

#[test]
fn test_missing_georeferencing() {
    let bytes = build_tiff(ByteOrder::LittleEndian, false, &[
        (256, TestValue::Long(10)),
        (257, TestValue::Long(10)),
    ]);
    assert!(matches!(read_metadata(&mut Cursor::new(bytes)), Err(ClipError::InvalidRaster(_))));
}

#[test]
fn test_missing_file_is_input_not_found() {
    let result = read_raster_metadata(Path::new("/nonexistent/raster.tif"));
    assert!(matches!(result, Err(ClipError::InputNotFound { .. })));
}

#[test]
fn test_truncated_file_is_invalid_raster() {
    let bytes = simple_geotiff(ByteOrder::LittleEndian, false, 4326);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&bytes[..20]).unwrap();

    let result = read_raster_metadata(file.path());
    assert!(matches!(result, Err(ClipError::InvalidRaster(_))));
}
