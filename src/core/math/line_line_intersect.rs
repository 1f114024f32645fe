use super::{base_math::parametric_from_point, Vector2};
use crate::core::traits::Real;

/// Holds the result of finding the intersect between two line segments.
#[derive(Debug, Copy, Clone)]
pub enum LineLineIntr<T>
where
    T: Real,
{
    /// No intersect, segments are parallel and not collinear (or distinct points).
    NoIntersect,
    /// True intersect between the two segments.
    TrueIntersect {
        /// Parametric value for intersect on first segment.
        seg1_t: T,
        /// Parametric value for intersect on second segment.
        seg2_t: T,
    },
    /// Segments are collinear and overlap by some amount.
    Overlapping {
        /// Parametric value for start of coincidence along second segment.
        seg2_t0: T,
        /// Parametric value for end of coincidence along second segment.
        seg2_t1: T,
    },
    /// The lines intersect but one or both segments must be extended to reach the point.
    FalseIntersect {
        /// Parametric value for intersect on first segment.
        seg1_t: T,
        /// Parametric value for intersect on second segment.
        seg2_t: T,
    },
}

/// Finds the intersects between the line segments `v1->v2` and `u1->u2`.
///
/// Segments are processed in parametric form (`P(t) = p0 + t * (p1 - p0)`) using perpendicular
/// products. Parametric values are scaled by segment length before fuzzy comparing so the epsilon
/// is applied at position scale rather than parameter scale.
pub fn line_line_intr<T>(
    v1: Vector2<T>,
    v2: Vector2<T>,
    u1: Vector2<T>,
    u2: Vector2<T>,
    epsilon: T,
) -> LineLineIntr<T>
where
    T: Real,
{
    use LineLineIntr::*;

    let v = v2 - v1;
    let u = u2 - u1;
    let v_pdot_u = v.perp_dot(u);
    let w = v1 - u1;
    let eps = epsilon;

    let seg1_length = v.length();
    let seg2_length = u.length();

    if !v_pdot_u.fuzzy_eq_zero_eps(eps) {
        // segments not parallel or collinear
        let seg1_t = u.perp_dot(w) / v_pdot_u;
        let seg2_t = v.perp_dot(w) / v_pdot_u;
        if !(seg1_t * seg1_length).fuzzy_in_range_eps(T::zero(), seg1_length, eps)
            || !(seg2_t * seg2_length).fuzzy_in_range_eps(T::zero(), seg2_length, eps)
        {
            return FalseIntersect { seg1_t, seg2_t };
        }
        return TrueIntersect { seg1_t, seg2_t };
    }

    // segments are parallel and possibly collinear
    let v_pdot_w = v.perp_dot(w);
    let u_pdot_w = u.perp_dot(w);
    if !v_pdot_w.fuzzy_eq_zero_eps(eps) || !u_pdot_w.fuzzy_eq_zero_eps(eps) {
        // parallel and not collinear so no intersect
        return NoIntersect;
    }

    let v_is_point = v1.fuzzy_eq_eps(v2, eps);
    let u_is_point = u1.fuzzy_eq_eps(u2, eps);

    if v_is_point && u_is_point {
        if v1.fuzzy_eq_eps(u1, eps) {
            return TrueIntersect {
                seg1_t: T::zero(),
                seg2_t: T::zero(),
            };
        }
        return NoIntersect;
    }

    if v_is_point {
        let seg2_t = parametric_from_point(u1, u2, v1, eps);
        if (seg2_t * seg2_length).fuzzy_in_range_eps(T::zero(), seg2_length, eps) {
            return TrueIntersect {
                seg1_t: T::zero(),
                seg2_t,
            };
        }
        return NoIntersect;
    }

    if u_is_point {
        let seg1_t = parametric_from_point(v1, v2, u1, eps);
        if (seg1_t * seg1_length).fuzzy_in_range_eps(T::zero(), seg1_length, eps) {
            return TrueIntersect {
                seg1_t,
                seg2_t: T::zero(),
            };
        }
        return NoIntersect;
    }

    // neither segment is a point, check if they overlap
    let w2 = v2 - u1;
    let (mut seg2_t0, mut seg2_t1) = if u.x.fuzzy_eq_zero_eps(eps) {
        (w.y / u.y, w2.y / u.y)
    } else {
        (w.x / u.x, w2.x / u.x)
    };

    if seg2_t0 > seg2_t1 {
        std::mem::swap(&mut seg2_t0, &mut seg2_t1);
    }

    if !(seg2_t0 * seg2_length).fuzzy_lt_eps(seg2_length, eps)
        || !(seg2_t1 * seg2_length).fuzzy_gt_eps(T::zero(), eps)
    {
        return NoIntersect;
    }

    seg2_t0 = num_traits::real::Real::max(seg2_t0, T::zero());
    seg2_t1 = num_traits::real::Real::min(seg2_t1, T::one());

    if ((seg2_t1 - seg2_t0) * seg2_length).fuzzy_eq_zero_eps(eps) {
        // intersect is a single point (segments line up end to end)
        let seg1_t = if v1.fuzzy_eq_eps(u1, eps) || v1.fuzzy_eq_eps(u2, eps) {
            T::zero()
        } else {
            T::one()
        };

        return TrueIntersect {
            seg1_t,
            seg2_t: seg2_t0,
        };
    }

    Overlapping { seg2_t0, seg2_t1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::vec2;
    use crate::core::traits::FuzzyEq;

    #[test]
    fn crossing_segments() {
        let r = line_line_intr(
            vec2(0.0, 0.0),
            vec2(1.0, 0.0),
            vec2(0.5, -1.0),
            vec2(0.5, 1.0),
            1e-8,
        );
        match r {
            LineLineIntr::TrueIntersect { seg1_t, seg2_t } => {
                assert!(seg1_t.fuzzy_eq(0.5));
                assert!(seg2_t.fuzzy_eq(0.5));
            }
            _ => panic!("expected true intersect, got {:?}", r),
        }
    }

    #[test]
    fn disjoint_parallel_segments() {
        let r = line_line_intr(
            vec2(0.0, 0.0),
            vec2(1.0, 0.0),
            vec2(0.0, 1.0),
            vec2(1.0, 1.0),
            1e-8,
        );
        assert!(matches!(r, LineLineIntr::NoIntersect));
    }

    #[test]
    fn non_parallel_but_apart() {
        let r = line_line_intr(
            vec2(0.0, 0.0),
            vec2(1.0, 0.0),
            vec2(5.0, -1.0),
            vec2(5.0, 1.0),
            1e-8,
        );
        assert!(matches!(r, LineLineIntr::FalseIntersect { .. }));
    }

    #[test]
    fn collinear_overlap() {
        let r = line_line_intr(
            vec2(0.0, 0.0),
            vec2(2.0, 0.0),
            vec2(1.0, 0.0),
            vec2(3.0, 0.0),
            1e-8,
        );
        match r {
            LineLineIntr::Overlapping { seg2_t0, seg2_t1 } => {
                assert!(seg2_t0.fuzzy_eq(0.0));
                assert!(seg2_t1.fuzzy_eq(0.5));
            }
            _ => panic!("expected overlapping, got {:?}", r),
        }
    }
}
