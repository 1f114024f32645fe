use super::Vector2;
use crate::core::traits::Real;

/// Returns the (min, max) values from `v1` and `v2`.
#[inline]
pub fn min_max<T>(v1: T, v2: T) -> (T, T)
where
    T: PartialOrd,
{
    if v1 < v2 {
        (v1, v2)
    } else {
        (v2, v1)
    }
}

/// Normalize radians to be between `0` and `2PI`, e.g. `-PI/4` becomes `7PI/4` and `5PI` becomes
/// `PI`.
#[inline]
pub fn normalize_radians<T>(angle: T) -> T
where
    T: Real,
{
    if angle >= T::zero() && angle <= T::tau() {
        return angle;
    }

    angle - (angle / T::tau()).floor() * T::tau()
}

/// Returns the smaller difference between two angles.
///
/// Result is negative if `normalize_radians(angle2 - angle1) > PI`.
#[inline]
pub fn delta_angle<T>(angle1: T, angle2: T) -> T
where
    T: Real,
{
    let mut diff = normalize_radians(angle2 - angle1);
    if diff > T::pi() {
        diff = diff - T::tau();
    }

    diff
}

/// Angle of the direction vector from `p0` to `p1` in radians.
#[inline]
pub fn angle<T>(p0: Vector2<T>, p1: Vector2<T>) -> T
where
    T: Real,
{
    (p1.y - p0.y).atan2(p1.x - p0.x)
}

/// Squared distance between `p0` and `p1`.
#[inline]
pub fn dist_squared<T>(p0: Vector2<T>, p1: Vector2<T>) -> T
where
    T: Real,
{
    let d = p1 - p0;
    d.dot(d)
}

/// Midpoint of the segment from `p0` to `p1`.
#[inline]
pub fn seg_midpoint<T>(p0: Vector2<T>, p1: Vector2<T>) -> Vector2<T>
where
    T: Real,
{
    (p0 + p1).scale(T::half())
}

/// Point on the segment from `p0` to `p1` at parametric value `t` (`P(t) = p0 + t * (p1 - p0)`).
#[inline]
pub fn point_from_parametric<T>(p0: Vector2<T>, p1: Vector2<T>, t: T) -> Vector2<T>
where
    T: Real,
{
    p0 + (p1 - p0).scale(t)
}

/// Parametric value on the segment from `p0` to `p1` for the point given (assumed to lie on the
/// segment's line). Uses the dominant component to avoid division blowup.
#[inline]
pub fn parametric_from_point<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>, eps: T) -> T
where
    T: Real,
{
    let d = p1 - p0;
    if d.x.abs() > d.y.abs() {
        if d.x.fuzzy_eq_zero_eps(eps) {
            return T::zero();
        }
        (point.x - p0.x) / d.x
    } else {
        if d.y.fuzzy_eq_zero_eps(eps) {
            return T::zero();
        }
        (point.y - p0.y) / d.y
    }
}

/// Fraction along the segment from `seg_start` to `seg_end` of the perpendicular projection of
/// `point`, clamped to `[0, 1]`. A degenerate (zero length) segment yields `0`.
#[inline]
pub fn seg_fraction<T>(seg_start: Vector2<T>, seg_end: Vector2<T>, point: Vector2<T>) -> T
where
    T: Real,
{
    let d = seg_end - seg_start;
    let len_squared = d.dot(d);
    if len_squared <= T::zero() {
        return T::zero();
    }

    let t = (point - seg_start).dot(d) / len_squared;
    num_traits::clamp(t, T::zero(), T::one())
}

/// Closest point on the closed segment from `seg_start` to `seg_end` to the `point` given.
#[inline]
pub fn seg_closest_point<T>(
    seg_start: Vector2<T>,
    seg_end: Vector2<T>,
    point: Vector2<T>,
) -> Vector2<T>
where
    T: Real,
{
    point_from_parametric(seg_start, seg_end, seg_fraction(seg_start, seg_end, point))
}

/// Perpendicular distance from `point` to the closed segment from `seg_start` to `seg_end`.
#[inline]
pub fn point_seg_dist<T>(point: Vector2<T>, seg_start: Vector2<T>, seg_end: Vector2<T>) -> T
where
    T: Real,
{
    point.distance_to(seg_closest_point(seg_start, seg_end, point))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::vec2;
    use crate::core::traits::FuzzyEq;

    #[test]
    fn seg_fraction_projects_and_clamps() {
        let s = vec2(0.0, 0.0);
        let e = vec2(10.0, 0.0);
        assert!(seg_fraction(s, e, vec2(2.5, 3.0)).fuzzy_eq(0.25));
        assert!(seg_fraction(s, e, vec2(-5.0, 1.0)).fuzzy_eq(0.0));
        assert!(seg_fraction(s, e, vec2(15.0, 1.0)).fuzzy_eq(1.0));
        // degenerate segment
        assert!(seg_fraction(s, s, vec2(1.0, 1.0)).fuzzy_eq(0.0));
    }

    #[test]
    fn point_seg_dist_interior_and_endpoints() {
        let s = vec2(0.0, 0.0);
        let e = vec2(10.0, 0.0);
        assert!(point_seg_dist(vec2(5.0, 2.0), s, e).fuzzy_eq(2.0));
        // beyond the end the distance is to the endpoint
        assert!(point_seg_dist(vec2(13.0, 4.0), s, e).fuzzy_eq(5.0));
    }

    #[test]
    fn delta_angle_wraps() {
        use std::f64::consts::PI;
        assert!(delta_angle(0.5 * PI, 0.25 * PI).fuzzy_eq(-0.25 * PI));
        assert!(delta_angle(0.25 * PI, 0.5 * PI).fuzzy_eq(0.25 * PI));
        assert!(delta_angle(5.0 * PI, 5.0 * PI).fuzzy_eq(0.0));
    }
}
