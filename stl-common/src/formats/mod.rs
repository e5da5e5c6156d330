//! Binary container and surface formats
//!
//! All headers are little-endian POD layouts with a fixed `SIZE`, a
//! `to_bytes()` writer and an `Option`-returning `from_bytes()` reader.

pub mod glb;
pub mod stl;

pub use glb::*;
pub use stl::*;
