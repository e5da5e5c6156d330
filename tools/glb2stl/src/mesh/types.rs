//! Canonical triangle mesh

/// A vertex position
pub type Vertex = [f32; 3];

/// Three vertices in winding order
pub type Triangle = [Vertex; 3];

/// Extraction result: an ordered triangle list with no shared topology
///
/// Owns its data; nothing borrows from the source container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalMesh {
    pub triangles: Vec<Triangle>,
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vertex,
    pub max: Vertex,
}

impl CanonicalMesh {
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Always `3 * triangle_count()`
    pub fn vertex_count(&self) -> usize {
        self.triangles.len() * 3
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.triangles.iter().flatten()
    }

    /// Bounding box of all vertices, `None` for an empty mesh
    pub fn bounds(&self) -> Option<Bounds> {
        let mut vertices = self.vertices();
        let first = *vertices.next()?;
        let bounds = vertices.fold(
            Bounds {
                min: first,
                max: first,
            },
            |mut b, v| {
                for axis in 0..3 {
                    b.min[axis] = b.min[axis].min(v[axis]);
                    b.max[axis] = b.max[axis].max(v[axis]);
                }
                b
            },
        );
        Some(bounds)
    }
}
