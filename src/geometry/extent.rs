//! Bounding extent resolution
//!
//! The output extent is either the raster's native extent or, when
//! cropping to the cutline, the union of the selected features' envelopes
//! tightened to the raster's extent.

use log::{debug, info};

use crate::coordinate::{BoundingRectangle, RasterMetadata};
use crate::errors::{ClipError, ClipResult};
use crate::vector::Feature;

/// Union of the envelopes of all features with geometry
///
/// # Returns
/// `EmptySelection` when no feature carries a geometry
pub fn features_envelope(features: &[Feature]) -> ClipResult<BoundingRectangle> {
    let envelope = features
        .iter()
        .filter_map(Feature::envelope)
        .fold(BoundingRectangle::empty(), |acc, envelope| acc.expand(&envelope));

    if envelope == BoundingRectangle::empty() {
        return Err(ClipError::EmptySelection);
    }
    Ok(envelope)
}

/// Resolve the bounding rectangle of a clip
///
/// # Arguments
/// * `raster` - Georeferencing of the input raster
/// * `cutline` - Selected features when cropping to the cutline, `None` otherwise
///
/// # Returns
/// A rectangle never exceeding the raster's native extent, or
/// `DegenerateExtent` when it has no area
pub fn resolve_extent(raster: &RasterMetadata, cutline: Option<&[Feature]>) -> ClipResult<BoundingRectangle> {
    let native = raster.extent();

    let extent = match cutline {
        None => native,
        Some(features) => {
            if features.is_empty() {
                return Err(ClipError::EmptySelection);
            }
            let envelope = features_envelope(features)?;
            debug!("Cutline envelope {}", envelope);
            envelope.intersection(&native)
        },
    };

    if extent.is_degenerate() {
        return Err(ClipError::DegenerateExtent(extent));
    }

    info!("Resolved clip extent {}", extent);
    Ok(extent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{MultiPolygon, Rect};

    fn raster() -> RasterMetadata {
        RasterMetadata::from_geotransform([0.0, 1.0, 0.0, 10.0, 0.0, -1.0], 10, 10, None)
    }

    fn feature(index: usize, min: (f64, f64), max: (f64, f64)) -> Feature {
        let polygon = Rect::new(min, max).to_polygon();
        Feature::new(index, Some(MultiPolygon::new(vec![polygon])))
    }

    #[test]
    fn test_no_cutline_is_native_extent() {
        assert_eq!(resolve_extent(&raster(), None).unwrap(), raster().extent());
    }

    #[test]
    fn test_covering_features_keep_native_extent() {
        let features = vec![feature(0, (-5.0, -5.0), (5.0, 20.0)), feature(1, (4.0, -1.0), (15.0, 12.0))];
        assert_eq!(resolve_extent(&raster(), Some(&features)).unwrap(), raster().extent());
    }

    #[test]
    fn test_small_feature_gives_its_envelope() {
        let features = vec![feature(0, (2.0, 2.0), (4.0, 4.0))];
        assert_eq!(
            resolve_extent(&raster(), Some(&features)).unwrap(),
            BoundingRectangle::from_bounds(2.0, 2.0, 4.0, 4.0)
        );
    }

    #[test]
    fn test_envelopes_combine_and_clip_to_raster() {
        let features = vec![
            feature(0, (2.0, 2.0), (4.0, 4.0)),
            Feature::new(1, None),
            feature(2, (6.0, 8.0), (12.0, 9.0)),
        ];
        assert_eq!(
            resolve_extent(&raster(), Some(&features)).unwrap(),
            BoundingRectangle::from_bounds(2.0, 2.0, 10.0, 9.0)
        );
    }

    #[test]
    fn test_projected_coordinates_are_not_clamped() {
        let raster = RasterMetadata::from_geotransform([500000.0, 10.0, 0.0, 4000000.0, 0.0, -10.0], 100, 100, None);
        let features = vec![feature(0, (500200.0, 3999200.0), (500400.0, 3999400.0))];
        assert_eq!(
            resolve_extent(&raster, Some(&features)).unwrap(),
            BoundingRectangle::from_bounds(500200.0, 3999200.0, 500400.0, 3999400.0)
        );
    }

    #[test]
    fn test_empty_selection() {
        assert!(matches!(resolve_extent(&raster(), Some(&[])), Err(ClipError::EmptySelection)));
        let nulls = vec![Feature::new(0, None)];
        assert!(matches!(resolve_extent(&raster(), Some(&nulls)), Err(ClipError::EmptySelection)));
    }

    #[test]
    fn test_disjoint_feature_is_degenerate() {
        let features = vec![feature(0, (20.0, 20.0), (30.0, 30.0))];
        assert!(matches!(resolve_extent(&raster(), Some(&features)), Err(ClipError::DegenerateExtent(_))));
    }
}
