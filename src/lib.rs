//! 2D offset curve construction.
//!
//! An offset curve is a line parallel to an input line (or polygon boundary) at a signed
//! perpendicular distance. Computing one naively by translating each segment produces a polyline
//! that self-intersects around sharp corners and loops; this crate reconciles that cheap "raw"
//! offset polyline against the robust buffer polygon of the input, extracting the maximal arcs of
//! the buffer boundary that correspond to positions along the raw curve and stitching them into
//! the final result.
//!
//! The top level entry points are [offset_curve], [offset_curve_opt], [offset_curve_joined], and
//! [offset_curve_joined_opt] in the [offset] module (re-exported at the crate root).
//!
//! # Examples
//!
//! ```
//! use offset_curve::{offset_curve, Geometry};
//! use offset_curve::polyline;
//!
//! let line = Geometry::Line(polyline![(0.0, 0.0), (9.0, 9.0)]);
//! let result = offset_curve(&line, 1.0).unwrap();
//! assert_eq!(result.len(), 1);
//! ```
pub mod core;
pub mod geometry;
pub mod offset;

mod macros;

pub use crate::core::math::Vector2;
pub use crate::core::traits::{FuzzyEq, FuzzyOrd, Real};
pub use crate::geometry::{Geometry, Polygon, Polyline, Ring};
pub use crate::offset::{
    offset_curve, offset_curve_joined, offset_curve_joined_opt, offset_curve_opt,
    offset_curve_with_buffer, JoinStyle, OffsetCurveError, OffsetCurveOptions,
};
