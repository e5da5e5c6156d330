//! Cube geometry and its glTF document.

use serde_json::json;

/// Corner `i` has x/y/z bits 0, 1 and 2 of `i` set for +1
pub const CUBE_POSITIONS: [[f32; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
];

/// Counter-clockwise seen from outside, two triangles per face
pub const CUBE_INDICES: [u32; 36] = [
    0, 2, 1, 1, 2, 3, // -Z
    4, 5, 6, 5, 7, 6, // +Z
    0, 1, 4, 1, 5, 4, // -Y
    2, 6, 3, 3, 6, 7, // +Y
    0, 4, 2, 2, 4, 6, // -X
    1, 3, 5, 3, 7, 5, // +X
];

/// POSITION (12 bytes) + NORMAL (12 bytes)
const VERTEX_STRIDE: usize = 24;

#[derive(Debug, Clone, Copy)]
pub enum IndexWidth {
    U8,
    U16,
    U32,
}

impl IndexWidth {
    fn component_type(self) -> u32 {
        match self {
            IndexWidth::U8 => 5121,
            IndexWidth::U16 => 5123,
            IndexWidth::U32 => 5125,
        }
    }

    fn size(self) -> usize {
        match self {
            IndexWidth::U8 => 1,
            IndexWidth::U16 => 2,
            IndexWidth::U32 => 4,
        }
    }
}

/// Pack interleaved vertices followed by indices
///
/// Returns the buffer and the byte length of the vertex block.
pub fn interleave_cube(width: IndexWidth) -> (Vec<u8>, usize) {
    let mut data = Vec::new();
    for p in CUBE_POSITIONS {
        let len = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
        for c in p {
            data.extend_from_slice(&c.to_le_bytes());
        }
        for c in p {
            data.extend_from_slice(&(c / len).to_le_bytes());
        }
    }
    let vertex_bytes = data.len();
    assert_eq!(vertex_bytes, CUBE_POSITIONS.len() * VERTEX_STRIDE);

    for i in CUBE_INDICES {
        match width {
            IndexWidth::U8 => data.push(i as u8),
            IndexWidth::U16 => data.extend_from_slice(&(i as u16).to_le_bytes()),
            IndexWidth::U32 => data.extend_from_slice(&i.to_le_bytes()),
        }
    }
    (data, vertex_bytes)
}

/// glTF JSON for the buffer produced by [`interleave_cube`]
pub fn cube_document(
    width: IndexWidth,
    vertex_bytes: usize,
    buffer_len: usize,
) -> serde_json::Value {
    json!({
        "asset": {"version": "2.0", "generator": "glb2stl tests"},
        "scene": 0,
        "scenes": [{"nodes": [0]}],
        "nodes": [{"mesh": 0, "name": "cube"}],
        "meshes": [{
            "name": "cube",
            "primitives": [{
                "attributes": {"POSITION": 0, "NORMAL": 1},
                "indices": 2,
                "mode": 4
            }]
        }],
        "accessors": [
            {
                "bufferView": 0,
                "byteOffset": 0,
                "componentType": 5126,
                "count": CUBE_POSITIONS.len(),
                "type": "VEC3",
                "min": [-1.0, -1.0, -1.0],
                "max": [1.0, 1.0, 1.0]
            },
            {
                "bufferView": 0,
                "byteOffset": 12,
                "componentType": 5126,
                "count": CUBE_POSITIONS.len(),
                "type": "VEC3"
            },
            {
                "bufferView": 1,
                "byteOffset": 0,
                "componentType": width.component_type(),
                "count": CUBE_INDICES.len(),
                "type": "SCALAR"
            }
        ],
        "bufferViews": [
            {
                "buffer": 0,
                "byteOffset": 0,
                "byteLength": vertex_bytes,
                "byteStride": VERTEX_STRIDE,
                "target": 34962
            },
            {
                "buffer": 0,
                "byteOffset": vertex_bytes,
                "byteLength": CUBE_INDICES.len() * width.size(),
                "target": 34963
            }
        ],
        "buffers": [{"byteLength": buffer_len}]
    })
}
