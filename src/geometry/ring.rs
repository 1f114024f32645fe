use crate::core::math::Vector2;
use crate::core::traits::Real;

/// A closed ordered loop of coordinates with the first position repeated as the last.
///
/// Represents one boundary loop (exterior shell or interior hole) of a buffer polygon. Segment
/// `i` runs from point `i` to point `i + 1`; there are `point_count() - 1` segments.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ring<T = f64> {
    pts: Vec<Vector2<T>>,
}

impl<T> Ring<T>
where
    T: Real,
{
    /// Create a ring from a point sequence, appending the closing point if it is not already
    /// present.
    pub fn new(mut pts: Vec<Vector2<T>>) -> Self {
        if let (Some(&first), Some(&last)) = (pts.first(), pts.last()) {
            if !(first == last) {
                pts.push(first);
            }
        }
        Ring { pts }
    }

    /// All ring points including the closing repeat of the first point.
    pub fn pts(&self) -> &[Vector2<T>] {
        &self.pts
    }

    /// Number of points including the closing repeat.
    pub fn point_count(&self) -> usize {
        self.pts.len()
    }

    /// Number of segments (`point_count() - 1`).
    pub fn segment_count(&self) -> usize {
        self.pts.len().saturating_sub(1)
    }

    /// Endpoints of segment `index`.
    pub fn segment(&self, index: usize) -> (Vector2<T>, Vector2<T>) {
        (self.pts[index], self.pts[index + 1])
    }

    /// Signed area by the shoelace formula: positive for counter clockwise traversal.
    pub fn signed_area(&self) -> T {
        let mut sum = T::zero();
        for w in self.pts.windows(2) {
            sum = sum + w[0].perp_dot(w[1]);
        }
        sum * T::half()
    }

    /// Unsigned enclosed area.
    pub fn area(&self) -> T {
        self.signed_area().abs()
    }

    /// Returns `true` if the ring is traversed counter clockwise.
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > T::zero()
    }

    /// Returns a copy traversed in the opposite direction.
    pub fn reversed(&self) -> Self {
        let mut pts = self.pts.clone();
        pts.reverse();
        Ring { pts }
    }

    /// Tests if `point` lies strictly inside the ring using even-odd ray casting.
    ///
    /// Points on the boundary may report either side; callers needing boundary awareness must
    /// test distance separately.
    pub fn contains_point(&self, point: Vector2<T>) -> bool {
        let mut inside = false;
        for w in self.pts.windows(2) {
            let (p0, p1) = (w[0], w[1]);
            if (p0.y > point.y) != (p1.y > point.y) {
                let x_cross = p0.x + (point.y - p0.y) / (p1.y - p0.y) * (p1.x - p0.x);
                if point.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }
}
