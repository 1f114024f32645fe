use super::buffer::{BufferPolygon, BufferSource, OutlineBuffer};
use super::section::OffsetCurveSection;
use super::segment_index::SegmentRangeIndex;
use crate::core::math::{min_max, point_seg_dist, seg_fraction, Vector2};
use crate::core::traits::Real;
use crate::geometry::{Geometry, Polyline, Ring};
use static_aabb2d_index::Control;
use thiserror::Error;

/// The tolerance for matching raw curve segments against buffer ring segments is the offset
/// distance divided by this factor.
pub const MATCH_DISTANCE_FACTOR: usize = 10_000;

/// Lower bound on fillet tessellation: fewer quadrant segments make the buffer boundary deviate
/// too far from the raw curve for matching to hold.
pub const MIN_QUADRANT_SEGMENTS: usize = 8;

/// Corner treatment for outside turns of the raw offset and the buffer outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JoinStyle {
    /// Circular fillet arc tessellated by the quadrant segment count.
    Round,
    /// Extend the offset lines to their intersection, falling back to a bevel past the mitre
    /// limit.
    Mitre,
    /// Straight chord between the offset segment endpoints.
    Bevel,
}

/// Options controlling offset curve construction.
#[derive(Debug, Clone, Copy)]
pub struct OffsetCurveOptions<T = f64> {
    /// Number of segments used to tessellate a quarter circle fillet.
    pub quadrant_segments: usize,
    /// Corner treatment on outside turns.
    pub join_style: JoinStyle,
    /// Maximum mitre point distance from the corner, as a multiple of the offset distance.
    pub mitre_limit: T,
}

impl<T> Default for OffsetCurveOptions<T>
where
    T: Real,
{
    fn default() -> Self {
        OffsetCurveOptions {
            quadrant_segments: MIN_QUADRANT_SEGMENTS,
            join_style: JoinStyle::Round,
            mitre_limit: T::from_usize(5),
        }
    }
}

impl<T> OffsetCurveOptions<T>
where
    T: Real,
{
    /// Maximum angle step in radians when tessellating fillet arcs.
    pub(crate) fn fillet_quantum(&self) -> T {
        T::pi() / (T::two() * T::from_usize(self.quadrant_segments.max(1)))
    }

    fn clamped(&self) -> Self {
        OffsetCurveOptions {
            quadrant_segments: self.quadrant_segments.max(MIN_QUADRANT_SEGMENTS),
            ..*self
        }
    }
}

/// Error from offset curve construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OffsetCurveError {
    /// More sections were extracted from one buffer ring than the ring has points. Extraction
    /// is capped there since each section consumes at least one ring segment; exceeding the cap
    /// means the matched locations are inconsistent.
    #[error("extracted more sections than buffer ring points ({ring_point_count}); section extraction failed to terminate")]
    SectionLimitExceeded { ring_point_count: usize },
}

/// Sentinel location for a buffer ring segment not matched by any raw curve segment. All real
/// locations are non negative.
fn not_in_curve<T>() -> T
where
    T: Real,
{
    -T::one()
}

/// Computes the offset curve of a geometry at a signed distance with default options.
///
/// For a line the offset curve is on the left for positive distance and on the right for
/// negative distance, and may come out in several disjoint arcs where the line curves back
/// within the offset distance of itself. For a polygon the result is the boundary of the
/// polygon buffered by the distance (positive grows, negative shrinks); for a point it is
/// empty.
pub fn offset_curve<T>(
    geom: &Geometry<T>,
    distance: T,
) -> Result<Vec<Polyline<T>>, OffsetCurveError>
where
    T: Real,
{
    offset_curve_opt(geom, distance, &OffsetCurveOptions::default())
}

/// Same as [offset_curve] with explicit options. Quadrant segments below
/// [MIN_QUADRANT_SEGMENTS] are raised to it.
pub fn offset_curve_opt<T>(
    geom: &Geometry<T>,
    distance: T,
    options: &OffsetCurveOptions<T>,
) -> Result<Vec<Polyline<T>>, OffsetCurveError>
where
    T: Real,
{
    offset_curve_with_buffer(geom, distance, options, false, &OutlineBuffer)
}

/// Computes the offset curve with all arcs joined into a single line (at most one result entry
/// for line inputs). The joint connections between arcs do not lie at the offset distance; use
/// the disjoint form when that matters.
pub fn offset_curve_joined<T>(
    geom: &Geometry<T>,
    distance: T,
) -> Result<Vec<Polyline<T>>, OffsetCurveError>
where
    T: Real,
{
    offset_curve_joined_opt(geom, distance, &OffsetCurveOptions::default())
}

/// Same as [offset_curve_joined] with explicit options.
pub fn offset_curve_joined_opt<T>(
    geom: &Geometry<T>,
    distance: T,
    options: &OffsetCurveOptions<T>,
) -> Result<Vec<Polyline<T>>, OffsetCurveError>
where
    T: Real,
{
    offset_curve_with_buffer(geom, distance, options, true, &OutlineBuffer)
}

/// Computes the offset curve over a caller supplied [BufferSource] instead of the default
/// outline buffer.
pub fn offset_curve_with_buffer<T, B>(
    geom: &Geometry<T>,
    distance: T,
    options: &OffsetCurveOptions<T>,
    joined: bool,
    source: &B,
) -> Result<Vec<Polyline<T>>, OffsetCurveError>
where
    T: Real,
    B: BufferSource<T>,
{
    let options = options.clamped();
    match geom {
        Geometry::Point(_) => Ok(Vec::new()),
        Geometry::Polygon(polygon) => {
            let components = source.buffer_polygon(polygon, distance, &options);
            Ok(components
                .iter()
                .flat_map(|c| c.rings())
                .map(|r| r.pts().iter().copied().collect())
                .collect())
        }
        Geometry::Line(line) => compute_line_curve(line, distance, &options, joined, source),
    }
}

fn compute_line_curve<T, B>(
    line: &Polyline<T>,
    distance: T,
    options: &OffsetCurveOptions<T>,
    joined: bool,
    source: &B,
) -> Result<Vec<Polyline<T>>, OffsetCurveError>
where
    T: Real,
    B: BufferSource<T>,
{
    if line.vertex_count() < 2 || line.path_length() == T::zero() {
        return Ok(Vec::new());
    }
    if distance == T::zero() {
        return Ok(vec![line.clone()]);
    }
    if line.vertex_count() == 2 {
        return Ok(vec![offset_segment(line.at(0), line.at(1), distance)]);
    }

    let sections = compute_sections(line, distance, options, joined, source)?;
    if joined {
        let joined_line = OffsetCurveSection::to_joined_line(sections);
        if joined_line.is_empty() {
            return Ok(Vec::new());
        }
        return Ok(vec![joined_line]);
    }
    Ok(OffsetCurveSection::to_lines(sections))
}

fn offset_segment<T>(p0: Vector2<T>, p1: Vector2<T>, distance: T) -> Polyline<T>
where
    T: Real,
{
    let offset_v = (p1 - p0).normalize().perp().scale(distance);
    let mut result = Polyline::with_capacity(2);
    result.add_vertex(p0 + offset_v);
    result.add_vertex(p1 + offset_v);
    result
}

/// Matches the raw offset curve of the line against the buffer boundary and returns the buffer
/// ring sections corresponding to positions along the raw curve, unordered.
pub fn compute_sections<T, B>(
    line: &Polyline<T>,
    distance: T,
    options: &OffsetCurveOptions<T>,
    joined: bool,
    source: &B,
) -> Result<Vec<OffsetCurveSection<T>>, OffsetCurveError>
where
    T: Real,
    B: BufferSource<T>,
{
    let cleaned = line.remove_repeat_pos(T::fuzzy_epsilon());
    let raw_curve = super::raw_offset(cleaned.vertexes(), distance, options);
    let mut sections = Vec::new();
    if raw_curve.is_empty() {
        return Ok(sections);
    }

    let buffer_poly = match oriented_buffer(cleaned.vertexes(), distance, options, source) {
        Some(b) => b,
        None => return Ok(sections),
    };

    let match_distance = distance.abs() / T::from_usize(MATCH_DISTANCE_FACTOR);
    compute_ring_sections(
        buffer_poly.shell(),
        &raw_curve,
        match_distance,
        joined,
        &mut sections,
    )?;
    for hole in buffer_poly.holes() {
        compute_ring_sections(hole, &raw_curve, match_distance, joined, &mut sections)?;
    }
    Ok(sections)
}

/// Largest area component of the line buffer, with all rings reversed for negative distance so
/// that ring traversal runs the same way as the raw curve.
fn oriented_buffer<T, B>(
    pts: &[Vector2<T>],
    distance: T,
    options: &OffsetCurveOptions<T>,
    source: &B,
) -> Option<BufferPolygon<T>>
where
    T: Real,
    B: BufferSource<T>,
{
    let components = source.buffer_line(pts, distance.abs(), options);
    // ties keep the first component encountered
    let mut max: Option<BufferPolygon<T>> = None;
    let mut max_area = T::zero();
    for c in components {
        let area = c.area();
        if max.is_none() || area > max_area {
            max_area = area;
            max = Some(c);
        }
    }
    let max = max?;
    if distance < T::zero() {
        Some(max.reversed())
    } else {
        Some(max)
    }
}

fn compute_ring_sections<T>(
    ring: &Ring<T>,
    raw_curve: &Polyline<T>,
    match_distance: T,
    joined: bool,
    sections: &mut Vec<OffsetCurveSection<T>>,
) -> Result<(), OffsetCurveError>
where
    T: Real,
{
    if ring.segment_count() == 0 {
        return Ok(());
    }
    let ring_pts = ring.pts();
    let mut raw_position: Vec<T> = vec![not_in_curve(); ring.segment_count()];
    let index = SegmentRangeIndex::new(ring_pts);

    let mut buffer_first_index: Option<usize> = None;
    let mut min_raw_position = not_in_curve();
    for i in 0..raw_curve.vertex_count() - 1 {
        let min_for_seg = match_segments(
            raw_curve.at(i),
            raw_curve.at(i + 1),
            i,
            match_distance,
            &index,
            ring_pts,
            &mut raw_position,
        );
        if let Some(seg) = min_for_seg {
            let pos = raw_position[seg];
            if buffer_first_index.is_none() || pos < min_raw_position {
                min_raw_position = pos;
                buffer_first_index = Some(seg);
            }
        }
    }
    match buffer_first_index {
        Some(first) => extract_sections(ring_pts, &raw_position, first, joined, sections),
        None => Ok(()),
    }
}

/// Labels every buffer ring segment lying within the match tolerance of the raw curve segment
/// with its location along the raw curve. A buffer segment matched by several raw segments
/// keeps the last written location; the ambiguity only arises where the curve bends back on
/// itself within the match tolerance, and either label produces a position in the overlap.
///
/// Returns the matched buffer segment with the lowest location, if any.
fn match_segments<T>(
    raw0: Vector2<T>,
    raw1: Vector2<T>,
    raw_index: usize,
    match_distance: T,
    index: &SegmentRangeIndex<T>,
    ring_pts: &[Vector2<T>],
    raw_position: &mut [T],
) -> Option<usize>
where
    T: Real,
{
    let (min_x, max_x) = min_max(raw0.x, raw1.x);
    let (min_y, max_y) = min_max(raw0.y, raw1.y);
    let raw_len = raw0.distance_to(raw1);

    let mut min_location = not_in_curve::<T>();
    let mut min_index: Option<usize> = None;
    index.visit_query(
        min_x - match_distance,
        min_y - match_distance,
        max_x + match_distance,
        max_y + match_distance,
        &mut |seg| {
            let (buf0, buf1) = (ring_pts[seg], ring_pts[seg + 1]);
            if segments_match(buf0, buf1, raw0, raw1, raw_len, match_distance) {
                let location = T::from_usize(raw_index) + seg_fraction(raw0, raw1, buf0);
                raw_position[seg] = location;
                if min_index.is_none() || location < min_location {
                    min_location = location;
                    min_index = Some(seg);
                }
            }
            Control::Continue
        },
    );
    min_index
}

/// The shorter segment's endpoints must both lie within the match tolerance of the longer one.
fn segments_match<T>(
    buf0: Vector2<T>,
    buf1: Vector2<T>,
    raw0: Vector2<T>,
    raw1: Vector2<T>,
    raw_len: T,
    match_distance: T,
) -> bool
where
    T: Real,
{
    let buf_len = buf0.distance_to(buf1);
    if raw_len <= buf_len {
        point_seg_dist(raw0, buf0, buf1) <= match_distance
            && point_seg_dist(raw1, buf0, buf1) <= match_distance
    } else {
        point_seg_dist(buf0, raw0, raw1) <= match_distance
            && point_seg_dist(buf1, raw0, raw1) <= match_distance
    }
}

/// Walks the labeled ring from the matched segment with minimum location, cutting it into
/// maximal runs of matched segments. In joined mode runs are additionally cut where the
/// location jumps by more than one raw segment, so that arcs from different parts of the curve
/// are not fused.
fn extract_sections<T>(
    ring_pts: &[Vector2<T>],
    raw_loc: &[T],
    start_index: usize,
    joined: bool,
    sections: &mut Vec<OffsetCurveSection<T>>,
) -> Result<(), OffsetCurveError>
where
    T: Real,
{
    let size = raw_loc.len();
    let mut section_start = start_index;
    let mut section_count = 0usize;

    loop {
        let section_end = find_section_end(raw_loc, section_start, start_index, joined);
        let location = raw_loc[section_start];
        let last_loc = raw_loc[prev_index(section_end, size)];
        sections.push(OffsetCurveSection::create(
            ring_pts,
            section_start,
            section_end,
            location,
            last_loc,
        ));
        section_start = find_section_start(raw_loc, section_end, joined);

        if section_count > ring_pts.len() {
            return Err(OffsetCurveError::SectionLimitExceeded {
                ring_point_count: ring_pts.len(),
            });
        }
        section_count += 1;

        if section_start == start_index || section_end == start_index {
            return Ok(());
        }
    }
}

fn find_section_start<T>(loc: &[T], end: usize, joined: bool) -> usize
where
    T: Real,
{
    let size = loc.len();
    let mut start = end;
    loop {
        let next = next_index(start, size);
        if loc[start] < T::zero() {
            start = next;
            if start == end {
                return start;
            }
            continue;
        }
        let prev = prev_index(start, size);
        if loc[prev] < T::zero() {
            return start;
        }
        if joined && (loc[start] - loc[prev]).abs() > T::one() {
            return start;
        }
        start = next;
        if start == end {
            return start;
        }
    }
}

fn find_section_end<T>(loc: &[T], start: usize, first_start: usize, joined: bool) -> usize
where
    T: Real,
{
    let size = loc.len();
    let mut end = start;
    loop {
        let next = next_index(end, size);
        if loc[next] < T::zero() {
            return next;
        }
        if joined && (loc[next] - loc[end]).abs() > T::one() {
            return next;
        }
        end = next;
        if end == start || end == first_start {
            return end;
        }
    }
}

fn next_index(i: usize, size: usize) -> usize {
    if i + 1 < size {
        i + 1
    } else {
        0
    }
}

fn prev_index(i: usize, size: usize) -> usize {
    if i == 0 {
        size - 1
    } else {
        i - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::vec2;

    fn square_ring_pts() -> Vec<Vector2<f64>> {
        vec![
            vec2(0.0, 0.0),
            vec2(10.0, 0.0),
            vec2(10.0, 10.0),
            vec2(0.0, 10.0),
            vec2(0.0, 0.0),
        ]
    }

    #[test]
    fn index_helpers_wrap() {
        assert_eq!(next_index(0, 4), 1);
        assert_eq!(next_index(3, 4), 0);
        assert_eq!(prev_index(0, 4), 3);
        assert_eq!(prev_index(3, 4), 2);
    }

    #[test]
    fn extracts_runs_separated_by_unmatched_segments() {
        let loc = [0.0, 1.0, -1.0, 3.0];
        let mut sections = Vec::new();
        extract_sections(&square_ring_pts(), &loc, 0, false, &mut sections).unwrap();
        assert_eq!(sections.len(), 2);
        // first run covers segments 0..1, ending at the unmatched segment start
        assert_eq!(sections[0].pts().len(), 3);
        assert_eq!(sections[0].location(), 0.0);
        // second run wraps from segment 3 back to the start point
        assert_eq!(sections[1].pts().len(), 2);
        assert_eq!(sections[1].location(), 3.0);
    }

    #[test]
    fn fully_matched_ring_extracts_one_closed_section() {
        let loc = [0.25, 1.0, 2.0, 3.0];
        let mut sections = Vec::new();
        extract_sections(&square_ring_pts(), &loc, 0, false, &mut sections).unwrap();
        assert_eq!(sections.len(), 1);
        let pts = sections[0].pts();
        // covers the whole ring and closes back onto its first point
        assert_eq!(pts.len(), 5);
        assert_eq!(pts[0], pts[4]);
    }

    #[test]
    fn joined_mode_splits_on_location_jump() {
        // contiguous matched segments but the location jumps by more than one raw segment
        let loc = [0.0, 0.5, 4.5, 5.0];
        let mut sections = Vec::new();
        extract_sections(&square_ring_pts(), &loc, 0, true, &mut sections).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].location(), 0.0);
        assert_eq!(sections[1].location(), 4.5);

        // without joined mode the run stays whole
        let mut plain = Vec::new();
        extract_sections(&square_ring_pts(), &loc, 0, false, &mut plain).unwrap();
        assert_eq!(plain.len(), 1);
    }

    #[test]
    fn section_limit_stops_extraction_from_inconsistent_start() {
        // matching always starts extraction on a matched segment; starting on an unmatched
        // segment that is preceded by another unmatched one makes the walk cycle between the
        // matched run and the unmatched segment after it without ever returning to the start
        let loc = [-1.0, -1.0, 2.0, -1.0];
        let mut sections = Vec::new();
        let err = extract_sections(&square_ring_pts(), &loc, 1, false, &mut sections).unwrap_err();
        assert_eq!(
            err,
            OffsetCurveError::SectionLimitExceeded {
                ring_point_count: 5
            }
        );
    }

    #[test]
    fn section_limit_error_is_matchable() {
        let err = OffsetCurveError::SectionLimitExceeded {
            ring_point_count: 12,
        };
        assert!(matches!(
            err,
            OffsetCurveError::SectionLimitExceeded {
                ring_point_count: 12
            }
        ));
        assert!(err.to_string().contains("12"));
    }

    #[test]
    fn segments_match_uses_shorter_segment_endpoints() {
        let raw0 = vec2(0.0, 0.0);
        let raw1 = vec2(10.0, 0.0);
        let raw_len = 10.0;
        // short buffer segment right on top of the raw segment
        assert!(segments_match(
            vec2(2.0, 0.00001),
            vec2(3.0, 0.00001),
            raw0,
            raw1,
            raw_len,
            0.001
        ));
        // parallel but too far away
        assert!(!segments_match(
            vec2(2.0, 0.1),
            vec2(3.0, 0.1),
            raw0,
            raw1,
            raw_len,
            0.001
        ));
        // long buffer segment matched by the raw segment's endpoints
        assert!(segments_match(
            vec2(-5.0, 0.0),
            vec2(15.0, 0.0),
            raw0,
            raw1,
            raw_len,
            0.001
        ));
    }
}
