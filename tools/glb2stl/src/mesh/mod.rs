//! Mesh extraction (scene document -> triangle list)

mod extract;
mod types;

// Re-export public API
pub use extract::{extract, extract_with, MeshSelection};
pub use types::{Bounds, CanonicalMesh, Triangle, Vertex};
