use crate::core::math::Vector2;
use crate::core::traits::Real;

/// An open chain of coordinates. Used both for input lines and for offset curve results.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polyline<T = f64> {
    vertexes: Vec<Vector2<T>>,
}

impl<T> Polyline<T>
where
    T: Real,
{
    /// Create a new empty polyline.
    pub fn new() -> Self {
        Polyline {
            vertexes: Vec::new(),
        }
    }

    /// Create a new empty polyline with `capacity` vertexes reserved.
    pub fn with_capacity(capacity: usize) -> Self {
        Polyline {
            vertexes: Vec::with_capacity(capacity),
        }
    }

    /// Create a polyline from a vec of coordinates.
    pub fn from_vec(vertexes: Vec<Vector2<T>>) -> Self {
        Polyline { vertexes }
    }

    /// Add a vertex to the end of the polyline.
    pub fn add(&mut self, x: T, y: T) {
        self.vertexes.push(Vector2::new(x, y));
    }

    /// Add a vertex to the end of the polyline from a vector.
    pub fn add_vertex(&mut self, v: Vector2<T>) {
        self.vertexes.push(v);
    }

    /// Vertex at `index` position.
    pub fn at(&self, index: usize) -> Vector2<T> {
        self.vertexes[index]
    }

    /// Access all vertexes as a slice.
    pub fn vertexes(&self) -> &[Vector2<T>] {
        &self.vertexes
    }

    /// Number of vertexes.
    pub fn vertex_count(&self) -> usize {
        self.vertexes.len()
    }

    /// Returns `true` if the polyline has no vertexes.
    pub fn is_empty(&self) -> bool {
        self.vertexes.is_empty()
    }

    /// Last vertex, or `None` if the polyline is empty.
    pub fn last(&self) -> Option<Vector2<T>> {
        self.vertexes.last().copied()
    }

    /// Total geometric path length (sum of segment lengths).
    pub fn path_length(&self) -> T {
        self.vertexes
            .windows(2)
            .fold(T::zero(), |acc, w| acc + w[0].distance_to(w[1]))
    }

    /// Returns a copy with consecutive repeat position vertexes removed (fuzzy compare with
    /// `pos_equal_eps`).
    pub fn remove_repeat_pos(&self, pos_equal_eps: T) -> Self {
        let mut result = Polyline::with_capacity(self.vertex_count());
        for &v in &self.vertexes {
            match result.last() {
                Some(prev) if prev.fuzzy_eq_eps(v, pos_equal_eps) => {}
                _ => result.add_vertex(v),
            }
        }
        result
    }

    /// Returns a copy with vertex order reversed.
    pub fn reversed(&self) -> Self {
        let mut vertexes = self.vertexes.clone();
        vertexes.reverse();
        Polyline { vertexes }
    }
}

impl<T> std::ops::Index<usize> for Polyline<T> {
    type Output = Vector2<T>;
    fn index(&self, index: usize) -> &Self::Output {
        &self.vertexes[index]
    }
}

impl<T> FromIterator<Vector2<T>> for Polyline<T> {
    fn from_iter<I: IntoIterator<Item = Vector2<T>>>(iter: I) -> Self {
        Polyline {
            vertexes: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::vec2;
    use crate::core::traits::FuzzyEq;

    #[test]
    fn path_length_sums_segments() {
        let pline = Polyline::from_vec(vec![vec2(0.0, 0.0), vec2(3.0, 4.0), vec2(3.0, 14.0)]);
        assert!(pline.path_length().fuzzy_eq(15.0));
        assert!(Polyline::<f64>::new().path_length().fuzzy_eq(0.0));
    }

    #[test]
    fn remove_repeat_pos_removes_consecutive_only() {
        let pline = Polyline::from_vec(vec![
            vec2(0.0, 0.0),
            vec2(0.0, 0.0),
            vec2(1.0, 0.0),
            vec2(0.0, 0.0),
        ]);
        let cleaned = pline.remove_repeat_pos(1e-8);
        assert_eq!(cleaned.vertex_count(), 3);
        assert!(cleaned.at(1).fuzzy_eq(vec2(1.0, 0.0)));
        assert!(cleaned.at(2).fuzzy_eq(vec2(0.0, 0.0)));
    }
}
