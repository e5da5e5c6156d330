//! Binary STL layout (.stl)
//!
//! # Layout
//! ```text
//! 0x00: header [u8; 80]     (free text, zero padded)
//! 0x50: triangle_count u32
//! 0x54: facets              (triangle_count * 50 bytes)
//! ```
//!
//! Each facet is a normal (3 × f32), three vertices (9 × f32) and a u16
//! attribute byte count that is always written as 0.

use glam::Vec3;

/// Length of the free-text header
pub const STL_HEADER_LEN: usize = 80;

/// A single vertex position
pub type StlVertex = [f32; 3];

/// Binary STL header (84 bytes: text + triangle count)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct StlHeader {
    pub text: [u8; STL_HEADER_LEN],
    pub triangle_count: u32,
}

impl StlHeader {
    pub const SIZE: usize = STL_HEADER_LEN + 4;

    /// Build a header from free text
    ///
    /// Text longer than 80 bytes is truncated; shorter text is zero padded.
    pub fn new(text: &str, triangle_count: u32) -> Self {
        let mut buf = [0u8; STL_HEADER_LEN];
        let src = text.as_bytes();
        let len = src.len().min(STL_HEADER_LEN);
        buf[..len].copy_from_slice(&src[..len]);
        Self {
            text: buf,
            triangle_count,
        }
    }

    /// Header text up to the first NUL byte
    pub fn text_lossy(&self) -> String {
        let end = self
            .text
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(STL_HEADER_LEN);
        String::from_utf8_lossy(&self.text[..end]).into_owned()
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[..STL_HEADER_LEN].copy_from_slice(&self.text);
        bytes[STL_HEADER_LEN..].copy_from_slice(&self.triangle_count.to_le_bytes());
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let mut text = [0u8; STL_HEADER_LEN];
        text.copy_from_slice(&bytes[..STL_HEADER_LEN]);
        Some(Self {
            text,
            triangle_count: u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]),
        })
    }
}

/// One binary STL facet record (50 bytes)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StlFacet {
    pub normal: StlVertex,
    pub vertices: [StlVertex; 3],
    pub attribute: u16,
}

impl StlFacet {
    pub const SIZE: usize = 50;

    /// Build a facet with its normal derived from the winding order
    pub fn from_triangle(vertices: [StlVertex; 3]) -> Self {
        Self {
            normal: facet_normal(&vertices),
            vertices,
            attribute: 0,
        }
    }

    /// Write facet to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        let floats = std::iter::once(&self.normal)
            .chain(self.vertices.iter())
            .flatten();
        for (i, value) in floats.enumerate() {
            bytes[i * 4..i * 4 + 4].copy_from_slice(&value.to_le_bytes());
        }
        bytes[48..50].copy_from_slice(&self.attribute.to_le_bytes());
        bytes
    }

    /// Read facet from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let float_at = |i: usize| {
            let o = i * 4;
            f32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]])
        };
        let vec_at = |i: usize| [float_at(i), float_at(i + 1), float_at(i + 2)];
        Some(Self {
            normal: vec_at(0),
            vertices: [vec_at(3), vec_at(6), vec_at(9)],
            attribute: u16::from_le_bytes([bytes[48], bytes[49]]),
        })
    }
}

/// Unit facet normal from counter-clockwise winding
///
/// `normalize((v1 - v0) x (v2 - v0))`. Degenerate triangles get a zero normal.
pub fn facet_normal(vertices: &[StlVertex; 3]) -> StlVertex {
    let v0 = Vec3::from_array(vertices[0]);
    let v1 = Vec3::from_array(vertices[1]);
    let v2 = Vec3::from_array(vertices[2]);
    (v1 - v0).cross(v2 - v0).normalize_or_zero().to_array()
}
