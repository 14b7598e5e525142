//! GeoTIFF georeferencing
//!
//! Recovers a raster's geotransform, dimensions and coordinate system from
//! the GeoTIFF tags of its first image directory.

use log::{debug, info, warn};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;

use crate::coordinate::{CoordinateSystem, CoordinateSystemFactory, RasterMetadata};
use crate::errors::{ClipError, ClipResult};
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{geo_keys, tags};
use crate::tiff::ifd::Ifd;
use crate::tiff::reader::TiffHeaderReader;

/// A GeoKey directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoKeyEntry {
    pub key_id: u16,
    pub tiff_tag_location: u16,
    pub count: u16,
    pub value_offset: u16,
}

/// Read raster metadata from a GeoTIFF on disk
///
/// # Returns
/// The raster's metadata, `InputNotFound` when the file cannot be opened,
/// or `InvalidRaster` when it is not a georeferenced TIFF
pub fn read_raster_metadata(path: &Path) -> ClipResult<RasterMetadata> {
    info!("Reading raster metadata from {}", path.display());
    let file = File::open(path).map_err(|e| ClipError::InputNotFound {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let mut reader = BufReader::new(file);

    read_metadata(&mut reader).map_err(|e| match e {
        ClipError::IoError(io) if io.kind() == ErrorKind::UnexpectedEof => {
            ClipError::InvalidRaster(format!("{}: truncated TIFF structure", path.display()))
        },
        other => other,
    })
}

/// Read raster metadata from any seekable TIFF stream
pub fn read_metadata(reader: &mut dyn SeekableReader) -> ClipResult<RasterMetadata> {
    let (header, ifd) = TiffHeaderReader::open(reader)?;

    let cols = required_unsigned(&header, reader, &ifd, tags::IMAGE_WIDTH)?;
    let rows = required_unsigned(&header, reader, &ifd, tags::IMAGE_LENGTH)?;
    if cols == 0 || rows == 0 {
        return Err(ClipError::InvalidRaster(format!("empty raster {}x{}", cols, rows)));
    }

    let geo_keys = read_geo_keys(&header, reader, &ifd)?;
    let mut geotransform = read_geotransform(&header, reader, &ifd)?;

    let pixel_is_point = geo_keys
        .get(&geo_keys::GT_RASTER_TYPE_GEO_KEY)
        .map(|key| key.tiff_tag_location == 0 && key.value_offset == geo_keys::RASTER_PIXEL_IS_POINT)
        .unwrap_or(false);
    if pixel_is_point {
        debug!("Raster is PixelIsPoint, shifting origin by half a pixel");
        geotransform[0] -= geotransform[1] * 0.5;
        geotransform[3] -= geotransform[5] * 0.5;
    }

    let crs = coordinate_system(&geo_keys);
    match &crs {
        Some(crs) => info!("Raster coordinate system: {}", crs),
        None => warn!("Raster does not declare a coordinate system"),
    }

    let metadata = RasterMetadata::from_geotransform(geotransform, cols, rows, crs);
    info!("Raster {}x{} pixels, extent {}", cols, rows, metadata.extent());
    Ok(metadata)
}

fn required_unsigned(
    header: &TiffHeaderReader,
    reader: &mut dyn SeekableReader,
    ifd: &Ifd,
    tag: u16,
) -> ClipResult<u64> {
    let entry = ifd
        .get_entry(tag)
        .ok_or_else(|| ClipError::InvalidRaster(format!("missing tag {}", tag)))?;
    header.read_unsigned(reader, entry)
}

/// Build a `[origin_x, pixel_width, 0, origin_y, 0, pixel_height]` geotransform
fn read_geotransform(
    header: &TiffHeaderReader,
    reader: &mut dyn SeekableReader,
    ifd: &Ifd,
) -> ClipResult<[f64; 6]> {
    if let Some(entry) = ifd.get_entry(tags::MODEL_TRANSFORMATION_TAG) {
        let m = header.read_doubles(reader, entry)?;
        if m.len() < 16 {
            return Err(ClipError::InvalidRaster("ModelTransformationTag needs 16 values".to_string()));
        }
        if m[1] != 0.0 || m[4] != 0.0 {
            return Err(ClipError::InvalidRaster("rotated or sheared rasters are not supported".to_string()));
        }
        return Ok([m[3], m[0], 0.0, m[7], 0.0, m[5]]);
    }

    let (Some(scale_entry), Some(tiepoint_entry)) = (
        ifd.get_entry(tags::MODEL_PIXEL_SCALE_TAG),
        ifd.get_entry(tags::MODEL_TIEPOINT_TAG),
    ) else {
        return Err(ClipError::InvalidRaster("no GeoTIFF georeferencing tags".to_string()));
    };

    let scale = header.read_doubles(reader, scale_entry)?;
    let tiepoint = header.read_doubles(reader, tiepoint_entry)?;
    if scale.len() < 2 || tiepoint.len() < 6 {
        return Err(ClipError::InvalidRaster("incomplete pixel scale or tiepoint".to_string()));
    }

    let (i, j, x, y) = (tiepoint[0], tiepoint[1], tiepoint[3], tiepoint[4]);
    let (scale_x, scale_y) = (scale[0], scale[1]);
    debug!("Tiepoint ({}, {}) -> ({}, {}), scale {} x {}", i, j, x, y, scale_x, scale_y);

    Ok([x - i * scale_x, scale_x, 0.0, y + j * scale_y, 0.0, -scale_y])
}

fn read_geo_keys(
    header: &TiffHeaderReader,
    reader: &mut dyn SeekableReader,
    ifd: &Ifd,
) -> ClipResult<HashMap<u16, GeoKeyEntry>> {
    let Some(entry) = ifd.get_entry(tags::GEO_KEY_DIRECTORY_TAG) else {
        return Ok(HashMap::new());
    };

    let values = header.read_shorts(reader, entry)?;
    if values.len() < 4 {
        return Err(ClipError::InvalidRaster("invalid GeoKey directory header".to_string()));
    }

    let num_keys = values[3] as usize;
    let keys = values[4..]
        .chunks_exact(4)
        .take(num_keys)
        .map(|chunk| GeoKeyEntry {
            key_id: chunk[0],
            tiff_tag_location: chunk[1],
            count: chunk[2],
            value_offset: chunk[3],
        })
        .map(|key| (key.key_id, key))
        .collect::<HashMap<_, _>>();

    debug!("GeoKey directory with {} keys", keys.len());
    Ok(keys)
}

/// Projected CRS wins over geographic; user-defined codes count as unknown
fn coordinate_system(keys: &HashMap<u16, GeoKeyEntry>) -> Option<CoordinateSystem> {
    [geo_keys::PROJECTED_CS_TYPE_GEO_KEY, geo_keys::GEOGRAPHIC_TYPE_GEO_KEY]
        .iter()
        .filter_map(|id| keys.get(id))
        .find(|key| key.tiff_tag_location == 0 && key.value_offset != 0 && key.value_offset != geo_keys::USER_DEFINED)
        .map(|key| CoordinateSystemFactory::from_epsg(key.value_offset as u32))
}
