//! Geometry value types: open polylines, closed rings, polygons, and the input geometry enum.
mod polygon;
mod polyline;
mod ring;

pub use polygon::*;
pub use polyline::*;
pub use ring::*;
