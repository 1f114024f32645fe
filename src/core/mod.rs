//! Common/shared math and trait modules.
pub mod math;
pub mod traits;
