/// Macro used for test assertions with fuzzy compared values.
#[doc(hidden)]
#[macro_export]
macro_rules! assert_fuzzy_eq {
    ($left:expr, $right:expr) => {{
        match (&$left, &$right) {
            (left_val, right_val) => {
                if !(left_val.fuzzy_eq(*right_val)) {
                    panic!(
                        r#"assertion failed: `left.fuzzy_eq(right)`
  left: `{:?}`,
 right: `{:?}`"#,
                        &*left_val, &*right_val
                    )
                }
            }
        }
    }};
    ($left:expr, $right:expr, $eps:expr) => {{
        match (&$left, &$right, &$eps) {
            (left_val, right_val, eps_val) => {
                if !(left_val.fuzzy_eq_eps(*right_val, *eps_val)) {
                    panic!(
                        r#"assertion failed: `left.fuzzy_eq_eps(right, eps)`
  left: `{:?}`,
 right: `{:?}`
 eps: `{:?}`"#,
                        &*left_val, &*right_val, &*eps_val
                    )
                }
            }
        }
    }};
}

/// Construct an open [Polyline](crate::geometry::Polyline) from a list of (x, y) tuples.
///
/// # Examples
///
/// ```
/// # use offset_curve::polyline;
/// let pline = polyline![(0.0, 0.0), (5.0, 5.0)];
/// assert_eq!(pline.vertex_count(), 2);
/// ```
#[macro_export]
macro_rules! polyline {
    ($( ($x:expr, $y:expr) ),* $(,)?) => {
        {
            #[allow(unused_mut)]
            let mut pl = $crate::geometry::Polyline::new();
            $(
                pl.add($x, $y);
            )*
            pl
        }
    };
}

/// Construct a closed [Ring](crate::geometry::Ring) from a list of (x, y) tuples. The closing
/// point is appended automatically when missing.
///
/// # Examples
///
/// ```
/// # use offset_curve::ring;
/// let r = ring![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)];
/// assert_eq!(r.segment_count(), 3);
/// ```
#[macro_export]
macro_rules! ring {
    ($( ($x:expr, $y:expr) ),* $(,)?) => {
        $crate::geometry::Ring::new(vec![
            $(
                $crate::core::math::Vector2::new($x, $y),
            )*
        ])
    };
}
