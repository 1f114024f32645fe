//! Shared 2D math primitives: vectors, angles, and segment operations.
mod base_math;
mod line_line_intersect;
mod vector2;

pub use base_math::*;
pub use line_line_intersect::*;
pub use vector2::*;
