use crate::core::math::Vector2;
use crate::core::traits::Real;
use crate::geometry::Polyline;
use std::cmp::Ordering;

/// A section of the raw offset curve, carried as the buffer ring points it matched against.
///
/// `location` parametrizes the section start along the raw curve: the integer part is the raw
/// segment index, the fractional part the fraction along that segment. `loc_last` is the location
/// of the start of the section's last segment, kept so joining can detect sections that meet
/// inside one raw segment.
#[derive(Debug, Clone)]
pub struct OffsetCurveSection<T = f64> {
    pts: Vec<Vector2<T>>,
    location: T,
    loc_last: T,
}

impl<T> OffsetCurveSection<T>
where
    T: Real,
{
    /// Create a section from a closed ring's points spanning `start..=end` (segment start
    /// indexes), wrapping past the ring closing point when `end <= start`.
    pub fn create(ring_pts: &[Vector2<T>], start: usize, end: usize, location: T, loc_last: T) -> Self {
        let len = if end > start {
            end - start + 1
        } else {
            ring_pts.len() - start + end
        };
        let mut pts = Vec::with_capacity(len);
        for i in 0..len {
            // modulo over the unique points, skipping the duplicated closing point
            let index = (start + i) % (ring_pts.len() - 1);
            pts.push(ring_pts[index]);
        }
        OffsetCurveSection {
            pts,
            location,
            loc_last,
        }
    }

    pub fn pts(&self) -> &[Vector2<T>] {
        &self.pts
    }

    pub fn location(&self) -> T {
        self.location
    }

    fn is_end_in_same_segment(&self, next_loc: T) -> bool {
        self.loc_last.floor() == next_loc.floor()
    }

    fn compare_locations(a: &Self, b: &Self) -> Ordering {
        a.location
            .partial_cmp(&b.location)
            .unwrap_or(Ordering::Equal)
    }

    /// Convert sections into separate lines ordered by their location along the raw offset
    /// curve.
    pub fn to_lines(mut sections: Vec<Self>) -> Vec<Polyline<T>> {
        sections.sort_by(Self::compare_locations);
        sections
            .into_iter()
            .map(|s| s.pts.into_iter().collect())
            .collect()
    }

    /// Join sections into a single line ordered by location. Joint vertices lying in the same
    /// raw curve segment are removed to simplify the result linework.
    pub fn to_joined_line(mut sections: Vec<Self>) -> Polyline<T> {
        if sections.is_empty() {
            return Polyline::new();
        }
        if sections.len() == 1 {
            return sections.remove(0).pts.into_iter().collect();
        }

        sections.sort_by(Self::compare_locations);

        let mut result = Polyline::new();
        let mut remove_start_pt = false;
        for i in 0..sections.len() {
            let section = &sections[i];
            let remove_end_pt = if i < sections.len() - 1 {
                section.is_end_in_same_segment(sections[i + 1].location)
            } else {
                false
            };
            for (j, &pt) in section.pts.iter().enumerate() {
                if (remove_start_pt && j == 0) || (remove_end_pt && j == section.pts.len() - 1) {
                    continue;
                }
                // guard against exactly repeated joint points between adjacent sections
                if let Some(last) = result.last() {
                    if last.fuzzy_eq(pt) {
                        continue;
                    }
                }
                result.add_vertex(pt);
            }
            remove_start_pt = remove_end_pt;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::vec2;

    fn ring_pts() -> Vec<Vector2<f64>> {
        // closed square ring, 4 unique points plus closing point
        vec![
            vec2(0.0, 0.0),
            vec2(10.0, 0.0),
            vec2(10.0, 10.0),
            vec2(0.0, 10.0),
            vec2(0.0, 0.0),
        ]
    }

    #[test]
    fn create_simple_range() {
        let s = OffsetCurveSection::create(&ring_pts(), 1, 3, 0.5, 2.0);
        assert_eq!(s.pts().len(), 3);
        assert_eq!(s.pts()[0], vec2(10.0, 0.0));
        assert_eq!(s.pts()[2], vec2(0.0, 10.0));
    }

    #[test]
    fn create_wraps_past_closing_point() {
        let pts = ring_pts();
        let s = OffsetCurveSection::create(&pts, 3, 1, 1.0, 3.0);
        // spans 3, 0, 1 via modulo over the 4 unique points
        assert_eq!(s.pts().len(), 3);
        assert_eq!(s.pts()[0], vec2(0.0, 10.0));
        assert_eq!(s.pts()[1], vec2(0.0, 0.0));
        assert_eq!(s.pts()[2], vec2(10.0, 0.0));
    }

    #[test]
    fn to_lines_sorts_by_location() {
        let pts = ring_pts();
        let s1 = OffsetCurveSection::create(&pts, 2, 3, 5.0, 5.0);
        let s2 = OffsetCurveSection::create(&pts, 0, 1, 0.25, 0.25);
        let lines = OffsetCurveSection::to_lines(vec![s1, s2]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].at(0), vec2(0.0, 0.0));
        assert_eq!(lines[1].at(0), vec2(10.0, 10.0));
    }

    #[test]
    fn joined_line_drops_joint_in_same_raw_segment() {
        let pts = ring_pts();
        // first section ends in raw segment 2, next starts in raw segment 2
        let s1 = OffsetCurveSection::create(&pts, 0, 1, 0.0, 2.25);
        let s2 = OffsetCurveSection::create(&pts, 2, 3, 2.75, 3.0);
        let joined = OffsetCurveSection::to_joined_line(vec![s1, s2]);
        // both joint vertexes fall in raw segment 2 and are dropped, the line runs directly
        // between the surviving neighbors
        assert_eq!(joined.vertex_count(), 2);
        assert_eq!(joined.at(0), vec2(0.0, 0.0));
        assert_eq!(joined.at(1), vec2(0.0, 10.0));
    }

    #[test]
    fn joined_line_keeps_joint_across_raw_segments() {
        let pts = ring_pts();
        let s1 = OffsetCurveSection::create(&pts, 0, 1, 0.0, 1.25);
        let s2 = OffsetCurveSection::create(&pts, 2, 3, 4.75, 5.0);
        let joined = OffsetCurveSection::to_joined_line(vec![s1, s2]);
        assert_eq!(joined.vertex_count(), 4);
    }

    #[test]
    fn joined_line_has_no_consecutive_duplicates() {
        let pts = ring_pts();
        let s1 = OffsetCurveSection::create(&pts, 0, 2, 0.0, 1.5);
        // starts exactly where the previous section ended but in another raw segment
        let s2 = OffsetCurveSection::create(&pts, 2, 3, 4.0, 5.0);
        let joined = OffsetCurveSection::to_joined_line(vec![s1, s2]);
        for w in joined.vertexes().windows(2) {
            assert!(!w[0].fuzzy_eq(w[1]));
        }
    }
}
