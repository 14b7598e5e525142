//! Bounding rectangle in raster coordinates

use std::fmt;

use geo::{Coord, LineString, Polygon};

/// An axis-aligned rectangle in the raster's coordinate system
///
/// Corners follow the north-up convention: `(ulx, uly)` is the upper-left
/// corner and `(lrx, lry)` the lower-right, so a normalized rectangle has
/// `ulx <= lrx` and `lry <= uly`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingRectangle {
    /// Upper-left X (minimum X)
    pub ulx: f64,
    /// Upper-left Y (maximum Y)
    pub uly: f64,
    /// Lower-right X (maximum X)
    pub lrx: f64,
    /// Lower-right Y (minimum Y)
    pub lry: f64,
}

impl BoundingRectangle {
    pub fn new(ulx: f64, uly: f64, lrx: f64, lry: f64) -> Self {
        BoundingRectangle { ulx, uly, lrx, lry }
    }

    /// Create a rectangle from `(min_x, min_y, max_x, max_y)` bounds
    pub fn from_bounds(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        BoundingRectangle::new(min_x, max_y, max_x, min_y)
    }

    /// The "impossible" rectangle that any envelope expands
    ///
    /// Its upper-left lies at positive infinity and its lower-right at
    /// negative infinity, so the first call to [`expand`](Self::expand)
    /// replaces it entirely.
    pub fn empty() -> Self {
        BoundingRectangle::new(f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY, f64::INFINITY)
    }

    /// Swap corners so that `ulx <= lrx` and `lry <= uly`
    pub fn normalized(&self) -> Self {
        BoundingRectangle::new(
            self.ulx.min(self.lrx),
            self.uly.max(self.lry),
            self.ulx.max(self.lrx),
            self.uly.min(self.lry),
        )
    }

    /// Grow this rectangle so it also covers `other`
    pub fn expand(&self, other: &BoundingRectangle) -> Self {
        BoundingRectangle::new(
            self.ulx.min(other.ulx),
            self.uly.max(other.uly),
            self.lrx.max(other.lrx),
            self.lry.min(other.lry),
        )
    }

    /// Tighten this rectangle to the part also covered by `other`
    ///
    /// The result may be degenerate when the two do not overlap.
    pub fn intersection(&self, other: &BoundingRectangle) -> Self {
        BoundingRectangle::new(
            self.ulx.max(other.ulx),
            self.uly.min(other.uly),
            self.lrx.min(other.lrx),
            self.lry.max(other.lry),
        )
    }

    pub fn width(&self) -> f64 {
        self.lrx - self.ulx
    }

    pub fn height(&self) -> f64 {
        self.uly - self.lry
    }

    /// Area of the rectangle, negative when corners are inverted
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// True when the rectangle has zero or negative area, or is not finite
    pub fn is_degenerate(&self) -> bool {
        let finite = self.ulx.is_finite() && self.uly.is_finite()
            && self.lrx.is_finite() && self.lry.is_finite();
        !finite || self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Target extent in `xmin ymin xmax ymax` order
    pub fn target_extent(&self) -> [f64; 4] {
        [self.ulx, self.lry, self.lrx, self.uly]
    }

    /// Closed polygon ring through the four corners
    ///
    /// The ring starts at the upper-left corner, runs clockwise and repeats
    /// the start point, giving five vertices.
    pub fn to_polygon(&self) -> Polygon<f64> {
        let ring = LineString::from(vec![
            Coord { x: self.ulx, y: self.uly },
            Coord { x: self.lrx, y: self.uly },
            Coord { x: self.lrx, y: self.lry },
            Coord { x: self.ulx, y: self.lry },
            Coord { x: self.ulx, y: self.uly },
        ]);
        Polygon::new(ring, vec![])
    }
}

impl From<geo::Rect<f64>> for BoundingRectangle {
    fn from(rect: geo::Rect<f64>) -> Self {
        BoundingRectangle::from_bounds(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }
}

impl fmt::Display for BoundingRectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) - ({}, {})", self.ulx, self.lry, self.lrx, self.uly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;

    #[test]
    fn test_normalized_swaps_south_up_corners() {
        let rect = BoundingRectangle::new(0.0, 0.0, 10.0, 10.0).normalized();
        assert_eq!(rect, BoundingRectangle::new(0.0, 10.0, 10.0, 0.0));
        assert!(!rect.is_degenerate());
    }

    #[test]
    fn test_empty_is_replaced_by_first_expand() {
        let envelope = BoundingRectangle::from_bounds(2.0, 2.0, 4.0, 4.0);
        assert!(BoundingRectangle::empty().is_degenerate());
        assert_eq!(BoundingRectangle::empty().expand(&envelope), envelope);
    }

    #[test]
    fn test_disjoint_intersection_is_degenerate() {
        let a = BoundingRectangle::from_bounds(0.0, 0.0, 1.0, 1.0);
        let b = BoundingRectangle::from_bounds(5.0, 5.0, 6.0, 6.0);
        assert!(a.intersection(&b).is_degenerate());
    }

    #[test]
    fn test_polygon_ring_has_five_vertices() {
        let rect = BoundingRectangle::from_bounds(0.0, 0.0, 10.0, 5.0);
        let polygon = rect.to_polygon();
        assert_eq!(polygon.exterior().0.len(), 5);
        assert_eq!(polygon.exterior().0.first(), polygon.exterior().0.last());
        assert_eq!(polygon.unsigned_area(), 50.0);
    }

    #[test]
    fn test_target_extent_order() {
        let rect = BoundingRectangle::from_bounds(1.0, 2.0, 3.0, 4.0);
        assert_eq!(rect.target_extent(), [1.0, 2.0, 3.0, 4.0]);
    }
}
