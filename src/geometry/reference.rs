//! Coordinate system agreement between raster and cutline

use log::warn;

use crate::coordinate::CoordinateSystem;
use crate::errors::{ClipError, ClipResult};
use crate::vector::Feature;

/// Check that the features share one coordinate system matching the raster
///
/// Unknown systems on either side are accepted with a warning; no
/// reprojection is attempted.
///
/// # Returns
/// The features' common coordinate system, falling back to the raster's
pub fn common_crs(raster: Option<&CoordinateSystem>, features: &[Feature]) -> ClipResult<Option<CoordinateSystem>> {
    let mut declared = features.iter().filter_map(|feature| feature.crs.as_ref());

    let features_crs = match declared.next() {
        Some(first) => {
            if let Some(other) = declared.find(|crs| *crs != first) {
                return Err(ClipError::CrsMismatch {
                    expected: first.to_crs_name(),
                    found: other.to_crs_name(),
                });
            }
            if features.iter().any(|feature| feature.crs.is_none()) {
                warn!("Some features do not declare a coordinate system, assuming {}", first);
            }
            Some(first.clone())
        },
        None => None,
    };

    match (raster, features_crs.as_ref()) {
        (Some(raster), Some(features)) if raster != features => Err(ClipError::CrsMismatch {
            expected: raster.to_crs_name(),
            found: features.to_crs_name(),
        }),
        (Some(raster), None) => {
            warn!("Cutline features do not declare a coordinate system, assuming raster's {}", raster);
            Ok(Some(raster.clone()))
        },
        (None, Some(features)) => {
            warn!("Raster does not declare a coordinate system, assuming cutline's {}", features);
            Ok(Some(features.clone()))
        },
        (None, None) => {
            warn!("Neither raster nor cutline declare a coordinate system");
            Ok(None)
        },
        (_, features) => Ok(features.cloned()),
    }
}
