//! Merging a feature collection into one geometry

use geo::{BooleanOps, MultiPolygon};
use log::{debug, warn};

use crate::errors::{ClipError, ClipResult};
use crate::vector::Feature;

/// Union of all selected feature geometries
#[derive(Debug, Clone, PartialEq)]
pub struct MergedGeometry {
    pub geometry: MultiPolygon<f64>,
    /// Indices of features skipped for lacking a geometry
    pub skipped: Vec<usize>,
}

/// Fold features into a single topologically valid geometry
///
/// Null geometries are the identity of the fold: they are skipped with a
/// warning. Overlapping and touching features dissolve into one region.
///
/// # Returns
/// `EmptySelection` when there is no feature with geometry
pub fn union_features(features: &[Feature]) -> ClipResult<MergedGeometry> {
    let (geometry, skipped, merged) = features.iter().fold(
        (MultiPolygon::new(Vec::new()), Vec::new(), 0usize),
        |(acc, mut skipped, merged), feature| match &feature.geometry {
            Some(geometry) => (acc.union(geometry), skipped, merged + 1),
            None => {
                warn!("{}", ClipError::PartialGeometry { feature: feature.index });
                skipped.push(feature.index);
                (acc, skipped, merged)
            },
        },
    );

    if merged == 0 {
        return Err(ClipError::EmptySelection);
    }

    debug!("Merged {} features into {} polygons", merged, geometry.0.len());
    Ok(MergedGeometry { geometry, skipped })
}
