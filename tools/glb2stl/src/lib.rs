//! glb2stl library
//!
//! Decodes binary glTF (GLB) containers and re-encodes the first triangle
//! mesh as STL. The CLI in `main.rs` is a thin layer over these functions.

pub mod accessor;
pub mod batch;
pub mod config;
pub mod container;
pub mod convert;
pub mod document;
pub mod error;
pub mod mesh;
pub mod stl;

#[cfg(test)]
mod testing;

pub use container::{decode, decode_with, DecodeOptions, GlbContainer};
pub use convert::{convert_glb, convert_glb_to_memory, inspect_glb, ConvertOptions, ConvertSummary};
pub use error::ConvertError;
pub use mesh::{extract, extract_with, CanonicalMesh, MeshSelection};
pub use stl::{encode_stl, write_stl, StlEncoding, StlOptions};
