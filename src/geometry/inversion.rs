//! Inverting a merged geometry against the clip rectangle
//!
//! "Outside the selected features" becomes an ordinary polygon so the rest
//! of the pipeline can clip to it like any other cutline.

use geo::{BooleanOps, MultiPolygon};
use log::debug;

use crate::coordinate::{BoundingRectangle, CoordinateSystem};

/// The rectangle with the merged geometry removed
#[derive(Debug, Clone, PartialEq)]
pub struct InvertedGeometry {
    pub geometry: MultiPolygon<f64>,
    /// Coordinate system taken from the features
    pub crs: Option<CoordinateSystem>,
}

/// Symmetric difference between the rectangle and the merged geometry
///
/// Parts of `merged` outside the rectangle survive in the result; the clip
/// extent bounds them downstream.
pub fn invert(rect: &BoundingRectangle, merged: &MultiPolygon<f64>, crs: Option<CoordinateSystem>) -> InvertedGeometry {
    let frame = MultiPolygon::new(vec![rect.to_polygon()]);
    let geometry = frame.xor(merged);
    debug!("Inverted geometry has {} polygons", geometry.0.len());
    InvertedGeometry { geometry, crs }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{Area, BooleanOps, Contains, Point, Rect};

    fn rect() -> BoundingRectangle {
        BoundingRectangle::from_bounds(0.0, 0.0, 10.0, 10.0)
    }

    fn squares(corners: &[(f64, f64)], size: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(
            corners
                .iter()
                .map(|&(x, y)| Rect::new((x, y), (x + size, y + size)).to_polygon())
                .collect(),
        )
    }

    #[test]
    fn test_single_square_becomes_hole() {
        let inverted = invert(&rect(), &squares(&[(2.0, 2.0)], 2.0), Some(CoordinateSystem::WGS84));

        assert_eq!(inverted.geometry.0.len(), 1);
        assert_eq!(inverted.geometry.0[0].interiors().len(), 1);
        assert_eq!(inverted.crs, Some(CoordinateSystem::WGS84));
        assert!(!inverted.geometry.contains(&Point::new(3.0, 3.0)));
        assert!(inverted.geometry.contains(&Point::new(8.0, 8.0)));
    }

    #[test]
    fn test_area_additivity() {
        let merged = squares(&[(1.0, 1.0), (6.0, 6.0)], 2.5);
        let inverted = invert(&rect(), &merged, None);

        assert_relative_eq!(
            merged.unsigned_area() + inverted.geometry.unsigned_area(),
            rect().area(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_disjoint_squares_leave_two_holes() {
        let inverted = invert(&rect(), &squares(&[(1.0, 1.0), (6.0, 6.0)], 2.0), None);
        let holes: usize = inverted.geometry.0.iter().map(|p| p.interiors().len()).sum();

        assert_eq!(holes, 2);
        assert_relative_eq!(inverted.geometry.unsigned_area(), 92.0, epsilon = 1e-9);
    }

    #[test]
    fn test_inversion_is_self_inverse() {
        let merged = squares(&[(2.0, 3.0)], 4.0);
        let once = invert(&rect(), &merged, None);
        let twice = invert(&rect(), &once.geometry, None);

        assert_relative_eq!(twice.geometry.xor(&merged).unsigned_area(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_overhanging_part_is_kept() {
        let merged = squares(&[(8.0, 8.0)], 4.0);
        let inverted = invert(&rect(), &merged, None);

        assert!(inverted.geometry.contains(&Point::new(11.0, 11.0)));
        assert_relative_eq!(inverted.geometry.unsigned_area(), 100.0 - 4.0 + 12.0, epsilon = 1e-9);
    }
}
