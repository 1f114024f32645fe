use super::{JoinStyle, OffsetCurveOptions};
use crate::core::math::{angle, delta_angle, vec2, Vector2};
use crate::core::traits::Real;
use crate::geometry::{Polyline, Ring};

/// A single parallel offset segment along with the original segment end position it came from.
#[derive(Debug, Copy, Clone)]
struct RawOffsetSeg<T> {
    s0: Vector2<T>,
    s1: Vector2<T>,
    dir: Vector2<T>,
    orig_end: Vector2<T>,
}

fn offset_segs<T>(pts: &[Vector2<T>], distance: T) -> Vec<RawOffsetSeg<T>>
where
    T: Real,
{
    let mut result = Vec::with_capacity(pts.len().saturating_sub(1));
    for w in pts.windows(2) {
        let (p0, p1) = (w[0], w[1]);
        let v = p1 - p0;
        if v.length_squared().fuzzy_eq_zero() {
            continue;
        }
        let dir = v.normalize();
        let offset_v = dir.perp().scale(distance);
        result.push(RawOffsetSeg {
            s0: p0 + offset_v,
            s1: p1 + offset_v,
            dir,
            orig_end: p1,
        });
    }
    result
}

/// Append the interior points of a tessellated arc around `center` from `start_angle` sweeping
/// `sweep` radians (endpoints are added by the caller). The angle step is bounded by `quantum`.
pub(crate) fn add_arc_points<T>(
    result: &mut Polyline<T>,
    center: Vector2<T>,
    radius: T,
    start_angle: T,
    sweep: T,
    quantum: T,
) where
    T: Real,
{
    let steps = (sweep.abs() / quantum).ceil().to_usize().unwrap_or(1).max(1);
    let steps_t = T::from_usize(steps);
    for j in 1..steps {
        let a = start_angle + sweep * T::from_usize(j) / steps_t;
        result.add_vertex(center + vec2(a.cos(), a.sin()).scale(radius));
    }
}

/// Close an outline polyline into a ring. A final vertex fuzzy equal (but not bit equal) to the
/// first would leave a degenerate closing segment, so it is dropped before closing.
pub(crate) fn close_outline<T>(outline: Polyline<T>) -> Ring<T>
where
    T: Real,
{
    let mut pts = outline.vertexes().to_vec();
    if pts.len() > 2 && pts[pts.len() - 1].fuzzy_eq(pts[0]) {
        pts.pop();
    }
    Ring::new(pts)
}

/// Join two adjacent offset segments at the input `corner` they share, applying the configured
/// corner treatment on outside turns. Inside turns connect directly, deliberately producing the
/// small crossing loop that later trimming or matching resolves.
fn add_join<T>(
    result: &mut Polyline<T>,
    corner: Vector2<T>,
    prev: &RawOffsetSeg<T>,
    next: &RawOffsetSeg<T>,
    distance: T,
    options: &OffsetCurveOptions<T>,
) where
    T: Real,
{
    let turn = prev.dir.perp_dot(next.dir);
    let outside = turn * distance < T::zero();

    if !outside {
        result.add_vertex(prev.s1);
        result.add_vertex(next.s0);
        return;
    }

    match options.join_style {
        JoinStyle::Round => {
            let radius = distance.abs();
            let a1 = angle(corner, prev.s1);
            let a2 = angle(corner, next.s0);
            let mut sweep = delta_angle(a1, a2);
            // sign may flip when the turn is a full reversal (sweep of PI)
            if (sweep > T::zero()) != (turn > T::zero()) {
                sweep = -sweep;
            }
            result.add_vertex(prev.s1);
            add_arc_points(result, corner, radius, a1, sweep, options.fillet_quantum());
            result.add_vertex(next.s0);
        }
        JoinStyle::Mitre => {
            if turn.fuzzy_eq_zero() {
                result.add_vertex(prev.s1);
                result.add_vertex(next.s0);
                return;
            }
            let t = (next.s0 - prev.s1).perp_dot(next.dir) / turn;
            let intr = prev.s1 + prev.dir.scale(t);
            if intr.distance_to(corner) > options.mitre_limit * distance.abs() {
                // over the mitre limit, fall back to a bevel
                result.add_vertex(prev.s1);
                result.add_vertex(next.s0);
            } else {
                result.add_vertex(intr);
            }
        }
        JoinStyle::Bevel => {
            result.add_vertex(prev.s1);
            result.add_vertex(next.s0);
        }
    }
}

/// Create the raw (untrimmed) offset polyline of an open path at the signed perpendicular
/// `distance`. Positive distance offsets to the left of travel direction (the side reached by
/// rotating the direction vector +90 degrees).
///
/// The result may self-intersect around sharp turns and loops; it is reference linework for
/// position parametrization, not a finished offset curve.
pub fn raw_offset<T>(pts: &[Vector2<T>], distance: T, options: &OffsetCurveOptions<T>) -> Polyline<T>
where
    T: Real,
{
    if pts.len() < 2 || distance == T::zero() {
        return Polyline::new();
    }

    let segs = offset_segs(pts, distance);
    if segs.is_empty() {
        return Polyline::new();
    }

    let mut result = Polyline::with_capacity(pts.len());
    result.add_vertex(segs[0].s0);
    for pair in segs.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        add_join(&mut result, prev.orig_end, prev, next, distance, options);
    }
    result.add_vertex(segs[segs.len() - 1].s1);

    result.remove_repeat_pos(T::fuzzy_epsilon())
}

/// Create the raw (untrimmed) closed offset outline of a ring at the signed perpendicular
/// `distance`, joining around every vertex including the closing one. Returns an empty ring for
/// degenerate input.
pub fn raw_offset_ring<T>(ring: &Ring<T>, distance: T, options: &OffsetCurveOptions<T>) -> Ring<T>
where
    T: Real,
{
    if ring.segment_count() < 3 || distance == T::zero() {
        return Ring::new(Vec::new());
    }

    let segs = offset_segs(ring.pts(), distance);
    if segs.len() < 2 {
        return Ring::new(Vec::new());
    }

    let n = segs.len();
    let mut result = Polyline::with_capacity(ring.point_count());
    for k in 0..n {
        let prev = &segs[(k + n - 1) % n];
        let next = &segs[k];
        add_join(&mut result, prev.orig_end, prev, next, distance, options);
    }

    close_outline(result.remove_repeat_pos(T::fuzzy_epsilon()))
}
