//! Programmatic GLB generation for integration tests.
//!
//! Generates an indexed cube with interleaved POSITION/NORMAL data, in each
//! of the three index widths, plus a few deliberately broken containers.

#![allow(dead_code)]

mod glb_assembly;
mod mesh_data;

pub use glb_assembly::assemble_glb;
pub use mesh_data::{CUBE_INDICES, CUBE_POSITIONS};

use mesh_data::{cube_document, interleave_cube, IndexWidth};

/// Cube with u8 indices
pub fn cube_glb_u8() -> Vec<u8> {
    cube_glb(IndexWidth::U8)
}

/// Cube with u16 indices
pub fn cube_glb_u16() -> Vec<u8> {
    cube_glb(IndexWidth::U16)
}

/// Cube with u32 indices
pub fn cube_glb_u32() -> Vec<u8> {
    cube_glb(IndexWidth::U32)
}

fn cube_glb(width: IndexWidth) -> Vec<u8> {
    let (bin, vertex_bytes) = interleave_cube(width);
    let json = cube_document(width, vertex_bytes, bin.len());
    assemble_glb(&json, Some(&bin))
}

/// Cube with the magic bytes replaced
pub fn corrupt_magic_glb() -> Vec<u8> {
    let mut glb = cube_glb_u16();
    glb[0..4].copy_from_slice(b"GLTF");
    glb
}

/// Cube whose index buffer refers past the last vertex
pub fn out_of_range_index_glb() -> Vec<u8> {
    let (mut bin, vertex_bytes) = interleave_cube(IndexWidth::U16);
    // First index of the first triangle
    bin[vertex_bytes..vertex_bytes + 2].copy_from_slice(&200u16.to_le_bytes());
    let json = cube_document(IndexWidth::U16, vertex_bytes, bin.len());
    assemble_glb(&json, Some(&bin))
}
