use super::{Polyline, Ring};
use crate::core::math::Vector2;
use crate::core::traits::Real;

/// A polygon with one exterior shell and zero or more interior holes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon<T = f64> {
    shell: Ring<T>,
    holes: Vec<Ring<T>>,
}

impl<T> Polygon<T>
where
    T: Real,
{
    /// Create a polygon, normalizing ring orientations: shell counter clockwise, holes clockwise.
    pub fn new(shell: Ring<T>, holes: Vec<Ring<T>>) -> Self {
        let shell = if shell.is_ccw() {
            shell
        } else {
            shell.reversed()
        };
        let holes = holes
            .into_iter()
            .map(|h| if h.is_ccw() { h.reversed() } else { h })
            .collect();
        Polygon { shell, holes }
    }

    /// Exterior ring.
    pub fn shell(&self) -> &Ring<T> {
        &self.shell
    }

    /// Interior rings.
    pub fn holes(&self) -> &[Ring<T>] {
        &self.holes
    }

    /// Enclosed area (shell area minus hole areas).
    pub fn area(&self) -> T {
        self.holes
            .iter()
            .fold(self.shell.area(), |acc, h| acc - h.area())
    }
}

/// Single-shape input geometry accepted by the offset curve operations.
///
/// Mixed or multi-part collections must be reduced to one of these shapes by the caller before
/// invoking the offset curve.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Geometry<T = f64> {
    /// A single point; a curve has no parallel for a zero dimensional shape.
    Point(Vector2<T>),
    /// A single open line.
    Line(Polyline<T>),
    /// A single polygon.
    Polygon(Polygon<T>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::vec2;
    use crate::core::traits::FuzzyEq;

    #[test]
    fn polygon_normalizes_orientation_and_area() {
        let shell = Ring::new(vec![
            vec2(0.0, 0.0),
            vec2(0.0, 10.0),
            vec2(10.0, 10.0),
            vec2(10.0, 0.0),
        ]);
        assert!(!shell.is_ccw());
        let hole = Ring::new(vec![
            vec2(2.0, 2.0),
            vec2(4.0, 2.0),
            vec2(4.0, 4.0),
            vec2(2.0, 4.0),
        ]);
        let poly = Polygon::new(shell, vec![hole]);
        assert!(poly.shell().is_ccw());
        assert!(!poly.holes()[0].is_ccw());
        assert!(poly.area().fuzzy_eq(96.0));
    }
}
