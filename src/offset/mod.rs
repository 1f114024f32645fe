//! Offset curve construction: raw offset building, buffering, segment matching, and section
//! assembly.
//!
//! Entry points are [offset_curve], [offset_curve_opt], [offset_curve_joined], and
//! [offset_curve_joined_opt]. The submodule items are public for testing and visualization
//! purposes.
mod buffer;
mod curve;
mod raw_offset;
mod section;
mod segment_index;

pub use buffer::*;
pub use curve::*;
pub use raw_offset::*;
pub use section::*;
pub use segment_index::*;
