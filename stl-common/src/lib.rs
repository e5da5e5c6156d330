//! Shared binary layouts for the glb2stl converter
//!
//! POD headers for the binary glTF container (input side) and the STL
//! surface format (output side). Both the converter library and its tests
//! read and write these layouts, so they live in their own crate.

pub mod formats;

pub use formats::*;
