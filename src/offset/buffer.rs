use super::raw_offset::{add_arc_points, close_outline, raw_offset, raw_offset_ring};
use super::segment_index::SegmentRangeIndex;
use super::{OffsetCurveOptions, MATCH_DISTANCE_FACTOR};
use crate::core::math::{
    angle, line_line_intr, min_max, parametric_from_point, point_from_parametric, point_seg_dist,
    seg_midpoint, LineLineIntr, Vector2,
};
use crate::core::traits::Real;
use crate::geometry::{Polygon, Polyline, Ring};
use static_aabb2d_index::{Control, IndexableNum};

/// One connected component of a buffer region: an exterior shell and its holes.
///
/// Rings are held with the buffer orientation convention: shell clockwise, holes counter
/// clockwise. With that convention, traversing the shell keeps the buffered region on the left,
/// which aligns shell direction with the left side raw offset of the source for positive offset
/// distances.
#[derive(Debug, Clone)]
pub struct BufferPolygon<T = f64> {
    shell: Ring<T>,
    holes: Vec<Ring<T>>,
}

impl<T> BufferPolygon<T>
where
    T: Real,
{
    /// Create a component, normalizing ring orientations to the buffer convention (shell
    /// clockwise, holes counter clockwise).
    pub fn new(shell: Ring<T>, holes: Vec<Ring<T>>) -> Self {
        let shell = if shell.is_ccw() { shell.reversed() } else { shell };
        let holes = holes
            .into_iter()
            .map(|h| if h.is_ccw() { h } else { h.reversed() })
            .collect();
        BufferPolygon { shell, holes }
    }

    pub fn shell(&self) -> &Ring<T> {
        &self.shell
    }

    pub fn holes(&self) -> &[Ring<T>] {
        &self.holes
    }

    /// Enclosed area (shell area minus hole areas).
    pub fn area(&self) -> T {
        self.holes
            .iter()
            .fold(self.shell.area(), |acc, h| acc - h.area())
    }

    /// All boundary rings, shell first.
    pub fn rings(&self) -> impl Iterator<Item = &Ring<T>> {
        std::iter::once(&self.shell).chain(self.holes.iter())
    }

    /// Returns a component with every ring traversed in the opposite direction.
    pub fn reversed(&self) -> Self {
        BufferPolygon {
            shell: self.shell.reversed(),
            holes: self.holes.iter().map(|h| h.reversed()).collect(),
        }
    }
}

/// Provider of buffer regions for the offset curve construction.
///
/// The offset curve only relies on the contract that the returned components are valid polygons
/// whose boundaries lie at the buffer distance from the source (away from corner regions the
/// boundary coincides with the raw offset within the match tolerance). Any robust buffer
/// implementation honoring that contract can be substituted.
pub trait BufferSource<T>
where
    T: Real,
{
    /// Buffer region of an open line at `distance.abs()` with round end caps.
    fn buffer_line(
        &self,
        pts: &[Vector2<T>],
        distance: T,
        options: &OffsetCurveOptions<T>,
    ) -> Vec<BufferPolygon<T>>;

    /// Buffer region of a polygon at signed `distance`: positive dilates, negative erodes. An
    /// eroded polygon may vanish entirely, yielding no components.
    fn buffer_polygon(
        &self,
        polygon: &Polygon<T>,
        distance: T,
        options: &OffsetCurveOptions<T>,
    ) -> Vec<BufferPolygon<T>>;
}

/// Default [BufferSource]: builds a closed raw offset outline and trims it down to the valid
/// buffer boundary.
///
/// Pipeline per outline: find all outline self-intersections with a spatial index, split the
/// outline into slices at them, discard slices that come closer to the source than the buffer
/// distance allows (or cross the source), then stitch the surviving slices back into closed
/// loops and classify the loops into shells and holes.
#[derive(Debug, Default, Clone, Copy)]
pub struct OutlineBuffer;

/// Buffer region of an open line using the default [OutlineBuffer].
pub fn buffer_line<T>(
    pts: &[Vector2<T>],
    distance: T,
    options: &OffsetCurveOptions<T>,
) -> Vec<BufferPolygon<T>>
where
    T: Real,
{
    BufferSource::buffer_line(&OutlineBuffer, pts, distance, options)
}

/// Buffer region of a polygon using the default [OutlineBuffer].
pub fn buffer_polygon<T>(
    polygon: &Polygon<T>,
    distance: T,
    options: &OffsetCurveOptions<T>,
) -> Vec<BufferPolygon<T>>
where
    T: Real,
{
    BufferSource::buffer_polygon(&OutlineBuffer, polygon, distance, options)
}

impl<T> BufferSource<T> for OutlineBuffer
where
    T: Real,
{
    fn buffer_line(
        &self,
        pts: &[Vector2<T>],
        distance: T,
        options: &OffsetCurveOptions<T>,
    ) -> Vec<BufferPolygon<T>> {
        let distance = distance.abs();
        let cleaned = remove_repeat_pts(pts);
        if cleaned.len() < 2 || distance.fuzzy_eq_zero() {
            return Vec::new();
        }

        let outline = line_outline(&cleaned, distance, options);
        let loops = trim_closed_outline(&outline, &cleaned, distance, options);
        // the outline traverses the region boundary clockwise, so shells come out clockwise
        assemble_polygons(loops, false)
    }

    fn buffer_polygon(
        &self,
        polygon: &Polygon<T>,
        distance: T,
        options: &OffsetCurveOptions<T>,
    ) -> Vec<BufferPolygon<T>> {
        if distance.fuzzy_eq_zero() {
            return vec![BufferPolygon::new(
                polygon.shell().clone(),
                polygon.holes().to_vec(),
            )];
        }

        // shell is counter clockwise and holes clockwise, so a right side (negative) offset
        // moves every ring the dilation direction for positive distance
        let shells = offset_ring_loops(polygon.shell(), distance, options);
        if shells.is_empty() {
            // polygon eroded away entirely
            return Vec::new();
        }
        let mut holes = Vec::new();
        for hole in polygon.holes() {
            holes.extend(offset_ring_loops(hole, distance, options));
        }

        let mut result = Vec::with_capacity(shells.len());
        for shell in shells {
            let contained = holes
                .iter()
                .filter(|h| shell.contains_point(h.pts()[0]))
                .cloned()
                .collect();
            result.push(BufferPolygon::new(shell, contained));
        }
        result
    }
}

fn remove_repeat_pts<T>(pts: &[Vector2<T>]) -> Vec<Vector2<T>>
where
    T: Real,
{
    let mut cleaned: Vec<Vector2<T>> = Vec::with_capacity(pts.len());
    for &p in pts {
        if cleaned.last().map_or(true, |last| !last.fuzzy_eq(p)) {
            cleaned.push(p);
        }
    }
    cleaned
}

/// Closed raw outline of the buffer region of an open line: left offset along the path, a round
/// cap around the far end, left offset back along the reversed path, and a round cap around the
/// start. Traverses the region boundary clockwise.
fn line_outline<T>(pts: &[Vector2<T>], distance: T, options: &OffsetCurveOptions<T>) -> Ring<T>
where
    T: Real,
{
    let forward = raw_offset(pts, distance, options);
    let rev_pts: Vec<Vector2<T>> = pts.iter().rev().copied().collect();
    let back = raw_offset(&rev_pts, distance, options);
    if forward.is_empty() || back.is_empty() {
        return Ring::new(Vec::new());
    }

    let quantum = options.fillet_quantum();
    let half_turn = -T::pi();
    let mut outline = Polyline::with_capacity(forward.vertex_count() + back.vertex_count());
    for &v in forward.vertexes() {
        outline.add_vertex(v);
    }

    let far_end = pts[pts.len() - 1];
    let cap_start = angle(far_end, forward.at(forward.vertex_count() - 1));
    add_arc_points(&mut outline, far_end, distance, cap_start, half_turn, quantum);

    for &v in back.vertexes() {
        outline.add_vertex(v);
    }

    let near_end = pts[0];
    let cap_start = angle(near_end, back.at(back.vertex_count() - 1));
    add_arc_points(&mut outline, near_end, distance, cap_start, half_turn, quantum);

    close_outline(outline.remove_repeat_pos(T::fuzzy_epsilon()))
}

/// Offset one ring of a polygon, keeping only the trimmed loops that retain the source ring's
/// traversal direction (opposite direction loops are artifacts of corner trimming).
fn offset_ring_loops<T>(
    ring: &Ring<T>,
    distance: T,
    options: &OffsetCurveOptions<T>,
) -> Vec<Ring<T>>
where
    T: Real,
{
    let outline = raw_offset_ring(ring, -distance, options);
    let loops = trim_closed_outline(&outline, ring.pts(), distance.abs(), options);
    loops
        .into_iter()
        .filter(|l| l.is_ccw() == ring.is_ccw())
        .collect()
}

/// Split a closed raw outline at its self-intersections, discard the pieces that dip inside the
/// buffer distance to the source chain, and stitch the rest back into closed loops.
fn trim_closed_outline<T>(
    outline: &Ring<T>,
    source_pts: &[Vector2<T>],
    distance: T,
    options: &OffsetCurveOptions<T>,
) -> Vec<Ring<T>>
where
    T: Real,
{
    if outline.segment_count() < 3 {
        return Vec::new();
    }

    let splits = outline_split_points(outline);
    let slices = build_slices(outline, &splits);
    let validator = SliceValidator::new(source_pts, distance, options);
    let valid: Vec<Vec<Vector2<T>>> = slices
        .into_iter()
        .filter(|s| validator.is_valid(s))
        .collect();
    stitch_slices(valid)
}

#[derive(Debug, Copy, Clone)]
struct SplitPoint<T> {
    t: T,
    pos: Vector2<T>,
}

/// Self-intersection points of the outline, collected per segment with the parametric position
/// along the segment. Intersections at the shared vertex of adjacent segments are not splits.
fn outline_split_points<T>(outline: &Ring<T>) -> Vec<Vec<SplitPoint<T>>>
where
    T: Real,
{
    let n = outline.segment_count();
    let index = SegmentRangeIndex::new(outline.pts());
    let mut splits: Vec<Vec<SplitPoint<T>>> = vec![Vec::new(); n];
    let eps = T::fuzzy_epsilon();

    for i in 0..n {
        let (p0, p1) = outline.segment(i);
        let (min_x, max_x) = min_max(p0.x, p1.x);
        let (min_y, max_y) = min_max(p0.y, p1.y);
        for j in index.query(min_x, min_y, max_x, max_y) {
            if j <= i {
                continue;
            }
            let adjacent_forward = j == i + 1;
            let adjacent_wrap = i == 0 && j == n - 1;
            let (q0, q1) = outline.segment(j);
            match line_line_intr(p0, p1, q0, q1, eps) {
                LineLineIntr::TrueIntersect { seg1_t, seg2_t } => {
                    let pos = point_from_parametric(p0, p1, seg1_t);
                    if (adjacent_forward && pos.fuzzy_eq(p1))
                        || (adjacent_wrap && pos.fuzzy_eq(p0))
                    {
                        continue;
                    }
                    splits[i].push(SplitPoint { t: seg1_t, pos });
                    splits[j].push(SplitPoint { t: seg2_t, pos });
                }
                LineLineIntr::Overlapping { seg2_t0, seg2_t1 } => {
                    for t in [seg2_t0, seg2_t1] {
                        let pos = point_from_parametric(q0, q1, t);
                        if (adjacent_forward && pos.fuzzy_eq(p1))
                            || (adjacent_wrap && pos.fuzzy_eq(p0))
                        {
                            continue;
                        }
                        splits[j].push(SplitPoint { t, pos });
                        let t1 = parametric_from_point(p0, p1, pos, eps);
                        splits[i].push(SplitPoint { t: t1, pos });
                    }
                }
                LineLineIntr::FalseIntersect { .. } | LineLineIntr::NoIntersect => {}
            }
        }
    }

    for seg_splits in splits.iter_mut() {
        seg_splits.sort_by(|a, b| a.t.partial_cmp(&b.t).unwrap_or(std::cmp::Ordering::Equal));
        seg_splits.dedup_by(|a, b| a.pos.fuzzy_eq(b.pos));
    }
    splits
}

/// Cut the outline into open slices running from one split point to the next (in traversal
/// order), carrying the outline vertices in between. Without any split the entire outline is a
/// single closed slice.
fn build_slices<T>(outline: &Ring<T>, splits: &[Vec<SplitPoint<T>>]) -> Vec<Vec<Vector2<T>>>
where
    T: Real,
{
    let n = outline.segment_count();
    let mut ordered: Vec<(usize, SplitPoint<T>)> = Vec::new();
    for (i, seg_splits) in splits.iter().enumerate() {
        for &sp in seg_splits {
            ordered.push((i, sp));
        }
    }
    if ordered.is_empty() {
        return vec![outline.pts().to_vec()];
    }

    let m = ordered.len();
    let mut slices = Vec::with_capacity(m);
    for k in 0..m {
        let (start_seg, start_split) = ordered[k];
        let (end_seg, end_split) = ordered[(k + 1) % m];

        let mut span = (end_seg + n - start_seg) % n;
        if span == 0 && k + 1 == m {
            // wrap pair on one segment goes all the way around
            span = n;
        }

        let mut pts = vec![start_split.pos];
        for step in 1..=span {
            let v = outline.pts()[(start_seg + step) % n];
            if !pts[pts.len() - 1].fuzzy_eq(v) {
                pts.push(v);
            }
        }
        if !pts[pts.len() - 1].fuzzy_eq(end_split.pos) {
            pts.push(end_split.pos);
        }
        if pts.len() >= 2 {
            slices.push(pts);
        }
    }
    slices
}

/// Validates outline slices against the source chain.
///
/// A slice survives when every vertex, and the midpoints of its first and last segments, stay at
/// least the buffer distance from the source (less the fillet tessellation chord height and the
/// match tolerance), and no slice segment crosses the source. Only the outer endpoint midpoints
/// are tested so that mitre and bevel corner chords, which legitimately cut inside the exact
/// offset arc, are not rejected.
struct SliceValidator<'a, T>
where
    T: IndexableNum,
{
    source_pts: &'a [Vector2<T>],
    index: SegmentRangeIndex<T>,
    min_dist: T,
}

impl<'a, T> SliceValidator<'a, T>
where
    T: Real,
{
    fn new(source_pts: &'a [Vector2<T>], distance: T, options: &OffsetCurveOptions<T>) -> Self {
        let quantum = options.fillet_quantum();
        let chord_height = distance * (T::one() - (quantum * T::half()).cos());
        let match_slack = distance / T::from_usize(MATCH_DISTANCE_FACTOR);
        SliceValidator {
            source_pts,
            index: SegmentRangeIndex::new(source_pts),
            min_dist: distance - chord_height - match_slack,
        }
    }

    fn point_valid(&self, p: Vector2<T>) -> bool {
        let mut valid = true;
        self.index.visit_query(
            p.x - self.min_dist,
            p.y - self.min_dist,
            p.x + self.min_dist,
            p.y + self.min_dist,
            &mut |i| {
                let (s0, s1) = (self.source_pts[i], self.source_pts[i + 1]);
                if point_seg_dist(p, s0, s1) < self.min_dist {
                    valid = false;
                    Control::Break(())
                } else {
                    Control::Continue
                }
            },
        );
        valid
    }

    fn seg_crosses_source(&self, p0: Vector2<T>, p1: Vector2<T>) -> bool {
        let (min_x, max_x) = min_max(p0.x, p1.x);
        let (min_y, max_y) = min_max(p0.y, p1.y);
        let mut crosses = false;
        self.index
            .visit_query(min_x, min_y, max_x, max_y, &mut |i| {
                let (s0, s1) = (self.source_pts[i], self.source_pts[i + 1]);
                match line_line_intr(p0, p1, s0, s1, T::fuzzy_epsilon()) {
                    LineLineIntr::TrueIntersect { .. } | LineLineIntr::Overlapping { .. } => {
                        crosses = true;
                        Control::Break(())
                    }
                    _ => Control::Continue,
                }
            });
        crosses
    }

    fn is_valid(&self, slice: &[Vector2<T>]) -> bool {
        for &p in slice {
            if !self.point_valid(p) {
                return false;
            }
        }
        if !self.point_valid(seg_midpoint(slice[0], slice[1])) {
            return false;
        }
        if !self.point_valid(seg_midpoint(slice[slice.len() - 2], slice[slice.len() - 1])) {
            return false;
        }
        for w in slice.windows(2) {
            if self.seg_crosses_source(w[0], w[1]) {
                return false;
            }
        }
        true
    }
}

/// Chain slices end to start into closed loops. Chains that fail to close (all continuations were
/// trimmed away) are dropped.
fn stitch_slices<T>(slices: Vec<Vec<Vector2<T>>>) -> Vec<Ring<T>>
where
    T: Real,
{
    let mut used = vec![false; slices.len()];
    let mut loops = Vec::new();

    for start in 0..slices.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let mut loop_pts = slices[start].clone();

        loop {
            let end = loop_pts[loop_pts.len() - 1];
            if end.fuzzy_eq(loop_pts[0]) {
                loop_pts.pop();
                if loop_pts.len() >= 3 {
                    loops.push(Ring::new(loop_pts));
                }
                break;
            }

            let next = (0..slices.len())
                .find(|&k| !used[k] && slices[k][0].fuzzy_eq(end));
            match next {
                Some(k) => {
                    used[k] = true;
                    loop_pts.extend_from_slice(&slices[k][1..]);
                }
                None => break,
            }
        }
    }
    loops
}

/// Group loops into polygons: loops with the shell traversal direction become shells, the rest
/// become holes of the smallest shell containing them. Holes outside every shell are artifacts
/// and get dropped.
fn assemble_polygons<T>(loops: Vec<Ring<T>>, shells_ccw: bool) -> Vec<BufferPolygon<T>>
where
    T: Real,
{
    let mut shells = Vec::new();
    let mut holes = Vec::new();
    for l in loops {
        if l.is_ccw() == shells_ccw {
            shells.push(l);
        } else {
            holes.push(l);
        }
    }

    let mut shell_holes: Vec<Vec<Ring<T>>> = (0..shells.len()).map(|_| Vec::new()).collect();
    for hole in holes {
        let p = hole.pts()[0];
        let owner = shells
            .iter()
            .enumerate()
            .filter(|(_, s)| s.contains_point(p))
            .min_by(|(_, a), (_, b)| {
                a.area()
                    .partial_cmp(&b.area())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i);
        if let Some(i) = owner {
            shell_holes[i].push(hole);
        }
    }

    shells
        .into_iter()
        .zip(shell_holes)
        .map(|(shell, holes)| BufferPolygon::new(shell, holes))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::vec2;
    use crate::{polyline, ring};
    use std::f64::consts::PI;

    fn opts() -> OffsetCurveOptions<f64> {
        OffsetCurveOptions::default()
    }

    #[test]
    fn straight_line_buffers_to_a_capsule() {
        let line = polyline![(0.0, 0.0), (10.0, 0.0)];
        let result = buffer_line(line.vertexes(), 1.0, &opts());
        assert_eq!(result.len(), 1);
        let poly = &result[0];
        assert!(poly.holes().is_empty());
        assert!(!poly.shell().is_ccw());
        // rectangle plus the tessellated circle (slightly under PI)
        assert!((poly.area() - (20.0 + PI)).abs() < 0.05);
    }

    #[test]
    fn negative_distance_buffers_the_same_region() {
        let line = polyline![(0.0, 0.0), (10.0, 0.0)];
        let pos = buffer_line(line.vertexes(), 1.0, &opts());
        let neg = buffer_line(line.vertexes(), -1.0, &opts());
        assert_eq!(pos.len(), 1);
        assert_eq!(neg.len(), 1);
        assert!((pos[0].area() - neg[0].area()).abs() < 1e-9);
    }

    #[test]
    fn l_shaped_line_buffers_to_single_component() {
        let line = polyline![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)];
        let result = buffer_line(line.vertexes(), 1.0, &opts());
        assert_eq!(result.len(), 1);
        let poly = &result[0];
        assert!(poly.holes().is_empty());
        // union of the two 2x10 arm rectangles (overlap 1), two end cap half discs and the
        // outer corner quarter disc
        let expected = 39.0 + 1.25 * PI;
        assert!((poly.area() - expected).abs() < 0.05);
    }

    #[test]
    fn closed_path_line_buffers_to_an_annulus() {
        let line = polyline![
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
            (0.0, 0.0)
        ];
        let result = buffer_line(line.vertexes(), 1.0, &opts());
        assert_eq!(result.len(), 1);
        let poly = &result[0];
        assert_eq!(poly.holes().len(), 1);
        assert!(!poly.shell().is_ccw());
        assert!(poly.holes()[0].is_ccw());
        // the inner boundary is the sharp cornered 8x8 square
        assert!((poly.holes()[0].area() - 64.0).abs() < 1e-6);
        // the outer boundary is the 12x12 square with rounded corners
        assert!((poly.shell().area() - (144.0 - 4.0 + PI)).abs() < 0.05);
    }

    #[test]
    fn polygon_dilation_grows_rounded() {
        let square = Polygon::new(
            ring![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
            Vec::new(),
        );
        let result = buffer_polygon(&square, 1.0, &opts());
        assert_eq!(result.len(), 1);
        let poly = &result[0];
        assert!(poly.holes().is_empty());
        assert!((poly.area() - (144.0 - 4.0 + PI)).abs() < 0.05);
    }

    #[test]
    fn polygon_erosion_shrinks_sharp() {
        let square = Polygon::new(
            ring![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
            Vec::new(),
        );
        let result = buffer_polygon(&square, -1.0, &opts());
        assert_eq!(result.len(), 1);
        let poly = &result[0];
        assert!(poly.holes().is_empty());
        assert!((poly.area() - 64.0).abs() < 1e-6);
        // eroded corners stay sharp
        let has_corner = poly
            .shell()
            .pts()
            .iter()
            .any(|p| p.fuzzy_eq(vec2(1.0, 1.0)));
        assert!(has_corner);
    }

    #[test]
    fn polygon_erodes_away_at_large_distance() {
        let square = Polygon::new(
            ring![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
            Vec::new(),
        );
        let result = buffer_polygon(&square, -6.0, &opts());
        assert!(result.is_empty());
    }

    #[test]
    fn polygon_hole_shrinks_under_dilation() {
        let poly = Polygon::new(
            ring![(0.0, 0.0), (20.0, 0.0), (20.0, 20.0), (0.0, 20.0)],
            vec![ring![(8.0, 8.0), (12.0, 8.0), (12.0, 12.0), (8.0, 12.0)]],
        );
        let result = buffer_polygon(&poly, 1.0, &opts());
        assert_eq!(result.len(), 1);
        let buffered = &result[0];
        assert_eq!(buffered.holes().len(), 1);
        // hole interior offset keeps sharp corners, 4x4 shrinks to 2x2
        assert!((buffered.holes()[0].area() - 4.0).abs() < 1e-6);
    }
}
