use crate::core::math::{min_max, Vector2};
use crate::core::traits::Real;
use static_aabb2d_index::{Control, IndexableNum, StaticAABB2DIndex, StaticAABB2DIndexBuilder};

/// Spatial index over the segments of a point chain (open path or closed ring) answering
/// envelope range queries with a visitor callback.
///
/// The index is purely a performance accelerant: candidates may include false positives bounded
/// by the spatial partitioning granularity, so callers re-check the geometric condition. No
/// ordering is guaranteed among visited candidates.
#[derive(Debug)]
pub struct SegmentRangeIndex<T = f64>
where
    T: IndexableNum,
{
    index: StaticAABB2DIndex<T>,
}

impl<T> SegmentRangeIndex<T>
where
    T: Real,
{
    /// Build the index over the segments of the chain `pts` (segment `i` spans `pts[i]` to
    /// `pts[i + 1]`). For a closed ring pass its points including the closing point.
    pub fn new(pts: &[Vector2<T>]) -> Self {
        let seg_count = pts.len().saturating_sub(1);
        let mut builder = StaticAABB2DIndexBuilder::new(seg_count);
        for w in pts.windows(2) {
            let (min_x, max_x) = min_max(w[0].x, w[1].x);
            let (min_y, max_y) = min_max(w[0].y, w[1].y);
            builder.add(min_x, min_y, max_x, max_y);
        }
        SegmentRangeIndex {
            index: builder
                .build()
                .expect("failed to build segment spatial index"),
        }
    }

    /// Visit the segment index of every candidate whose bounding box intersects the query
    /// envelope. The visitor may return [Control::Break] to stop visiting early.
    pub fn visit_query<F>(&self, min_x: T, min_y: T, max_x: T, max_y: T, visitor: &mut F)
    where
        F: FnMut(usize) -> Control<()>,
    {
        self.index.visit_query(min_x, min_y, max_x, max_y, visitor);
    }

    /// Collect all candidate segment indexes whose bounding box intersects the query envelope.
    pub fn query(&self, min_x: T, min_y: T, max_x: T, max_y: T) -> Vec<usize> {
        self.index.query(min_x, min_y, max_x, max_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::vec2;
    use crate::ring;

    #[test]
    fn visits_only_overlapping_candidates() {
        let r = ring![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
        let index = SegmentRangeIndex::new(r.pts());

        let mut visited = Vec::new();
        index.visit_query(4.0, -1.0, 6.0, 1.0, &mut |i| {
            visited.push(i);
            Control::Continue
        });
        // only the bottom segment boxes overlap the query envelope
        assert_eq!(visited, vec![0]);

        let all = index.query(-1.0, -1.0, 11.0, 11.0);
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn builds_over_f32_chains() {
        let pts = [vec2(0.0f32, 0.0), vec2(1.0, 0.0), vec2(1.0, 1.0)];
        let index = SegmentRangeIndex::new(&pts);
        assert_eq!(index.query(-0.5, -0.5, 1.5, 1.5).len(), 2);
    }

    #[test]
    fn break_stops_visiting() {
        let r = ring![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
        let index = SegmentRangeIndex::new(r.pts());
        let mut count = 0;
        index.visit_query(-1.0, -1.0, 11.0, 11.0, &mut |_| {
            count += 1;
            Control::Break(())
        });
        assert_eq!(count, 1);
    }
}
