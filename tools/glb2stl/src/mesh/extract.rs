//! Mesh extraction: scene document + BIN chunk -> CanonicalMesh

use super::types::{CanonicalMesh, Triangle, Vertex};
use crate::accessor::{AccessorRole, AccessorView};
use crate::document::{Primitive, SceneDocument, MODE_TRIANGLES};
use crate::error::ConvertError;

/// Which mesh primitive to convert
///
/// The converter only ever uses [`MeshSelection::FIRST`]; additional meshes
/// and primitives in the file are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshSelection {
    pub mesh: usize,
    pub primitive: usize,
}

impl MeshSelection {
    /// First primitive of the first mesh
    pub const FIRST: Self = Self {
        mesh: 0,
        primitive: 0,
    };

    /// Look up the selected primitive
    pub fn select(self, document: &SceneDocument) -> Result<&Primitive, ConvertError> {
        let mesh = document.mesh(self.mesh)?;
        if mesh.primitives.is_empty() {
            return Err(ConvertError::NoPrimitiveFound { mesh: self.mesh });
        }

        let ignored_meshes = document.meshes.len() - 1;
        let ignored_primitives = mesh.primitives.len() - 1;
        if ignored_meshes > 0 || ignored_primitives > 0 {
            tracing::debug!(
                "Using mesh {} primitive {}; ignoring {} other mesh(es) and {} other primitive(s)",
                self.mesh,
                self.primitive,
                ignored_meshes,
                ignored_primitives
            );
        }

        mesh.primitives.get(self.primitive).ok_or_else(|| {
            ConvertError::malformed(format!(
                "mesh {} has no primitive {}",
                self.mesh, self.primitive
            ))
        })
    }
}

/// Extract the first mesh's first primitive
pub fn extract(
    document: &SceneDocument,
    binary: Option<&[u8]>,
) -> Result<CanonicalMesh, ConvertError> {
    extract_with(document, binary, MeshSelection::FIRST)
}

/// Extract the selected primitive as a triangle list
pub fn extract_with(
    document: &SceneDocument,
    binary: Option<&[u8]>,
    selection: MeshSelection,
) -> Result<CanonicalMesh, ConvertError> {
    document.check_required_extensions()?;

    let primitive = selection.select(document)?;
    if primitive.mode() != MODE_TRIANGLES {
        return Err(ConvertError::UnsupportedPrimitiveMode(primitive.mode()));
    }

    let position_index = primitive
        .position_accessor()
        .ok_or(ConvertError::MissingPositions)?;
    let positions =
        AccessorView::resolve(document, binary, position_index, AccessorRole::Positions)?
            .read_vec3_f32();

    let triangles = match primitive.indices {
        Some(index_accessor) => {
            let view =
                AccessorView::resolve(document, binary, index_accessor, AccessorRole::Indices)?;
            if view.count % 3 != 0 {
                return Err(ConvertError::NonTriangularIndexCount(view.count));
            }
            indexed_triangles(&positions, &view.read_u32())?
        }
        None => sequential_triangles(&positions)?,
    };

    tracing::debug!(
        "Extracted {} vertices, {} triangles",
        positions.len(),
        triangles.len()
    );

    Ok(CanonicalMesh::new(triangles))
}

/// Triangle k = (V[i[3k]], V[i[3k+1]], V[i[3k+2]])
fn indexed_triangles(
    positions: &[Vertex],
    indices: &[u32],
) -> Result<Vec<Triangle>, ConvertError> {
    let vertex = |index: u32| {
        positions
            .get(index as usize)
            .copied()
            .ok_or(ConvertError::IndexOutOfRange {
                index,
                vertex_count: positions.len(),
            })
    };

    indices
        .chunks_exact(3)
        .map(|tri| -> Result<Triangle, ConvertError> {
            Ok([vertex(tri[0])?, vertex(tri[1])?, vertex(tri[2])?])
        })
        .collect()
}

/// Vertices 3k, 3k+1, 3k+2 form triangle k
fn sequential_triangles(positions: &[Vertex]) -> Result<Vec<Triangle>, ConvertError> {
    if positions.len() % 3 != 0 {
        return Err(ConvertError::NonTriangularVertexCount(positions.len()));
    }
    Ok(positions
        .chunks_exact(3)
        .map(|tri| [tri[0], tri[1], tri[2]])
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::decode;
    use crate::testing::{assemble_glb, f32_bytes, minimal_triangle_glb};
    use serde_json::json;

    /// Unit quad as two triangles, 4 shared vertices
    const QUAD: [f32; 12] = [
        0.0, 0.0, 0.0, //
        1.0, 0.0, 0.0, //
        1.0, 1.0, 0.0, //
        0.0, 1.0, 0.0,
    ];

    fn extract_glb(glb: &[u8]) -> Result<CanonicalMesh, ConvertError> {
        let container = decode(glb)?;
        extract(&container.document, container.binary)
    }

    /// Positions followed by indices in one buffer, two views
    fn indexed_glb(
        positions: &[f32],
        index_bytes: &[u8],
        component_type: u32,
        count: usize,
    ) -> Vec<u8> {
        let mut bin = f32_bytes(positions);
        let index_offset = bin.len();
        bin.extend_from_slice(index_bytes);

        let json = json!({
            "meshes": [{"primitives": [{"attributes": {"POSITION": 0}, "indices": 1, "mode": 4}]}],
            "accessors": [
                {"bufferView": 0, "componentType": 5126, "count": positions.len() / 3, "type": "VEC3"},
                {"bufferView": 1, "componentType": component_type, "count": count, "type": "SCALAR"}
            ],
            "bufferViews": [
                {"buffer": 0, "byteOffset": 0, "byteLength": index_offset},
                {"buffer": 0, "byteOffset": index_offset, "byteLength": index_bytes.len()}
            ],
            "buffers": [{"byteLength": bin.len()}]
        });
        assemble_glb(&json, Some(&bin))
    }

    fn non_indexed_glb(positions: &[f32]) -> Vec<u8> {
        let bin = f32_bytes(positions);
        let json = json!({
            "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
            "accessors": [
                {"bufferView": 0, "componentType": 5126, "count": positions.len() / 3, "type": "VEC3"}
            ],
            "bufferViews": [{"buffer": 0, "byteLength": bin.len()}],
            "buffers": [{"byteLength": bin.len()}]
        });
        assemble_glb(&json, Some(&bin))
    }

    #[test]
    fn test_minimal_end_to_end() {
        let mesh = extract_glb(&minimal_triangle_glb()).unwrap();
        assert_eq!(
            mesh.triangles,
            vec![[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]]
        );
    }

    #[test]
    fn test_non_indexed_triangle_count() {
        for triangles in [1usize, 2, 5, 17] {
            let positions: Vec<f32> = (0..triangles * 9).map(|i| i as f32).collect();
            let mesh = extract_glb(&non_indexed_glb(&positions)).unwrap();
            assert_eq!(mesh.triangle_count(), triangles);
            assert_eq!(mesh.triangles[triangles - 1][2][2], (triangles * 9 - 1) as f32);
        }
    }

    #[test]
    fn test_non_triangular_vertex_count() {
        let positions = [0.0f32; 12]; // 4 vertices
        assert_eq!(
            extract_glb(&non_indexed_glb(&positions)).unwrap_err(),
            ConvertError::NonTriangularVertexCount(4)
        );
    }

    #[test]
    fn test_indexed_quad() {
        let indices: Vec<u8> = [0u16, 1, 2, 0, 2, 3]
            .iter()
            .flat_map(|i| i.to_le_bytes())
            .collect();
        let mesh = extract_glb(&indexed_glb(&QUAD, &indices, 5123, 6)).unwrap();

        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(
            mesh.triangles[1],
            [[0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]
        );
    }

    #[test]
    fn test_sequential_indices_match_non_indexed() {
        let positions: Vec<f32> = (0..18).map(|i| i as f32 * 0.5).collect();
        let indices: Vec<u8> = (0u32..6).flat_map(|i| i.to_le_bytes()).collect();

        let indexed = extract_glb(&indexed_glb(&positions, &indices, 5125, 6)).unwrap();
        let plain = extract_glb(&non_indexed_glb(&positions)).unwrap();
        assert_eq!(indexed, plain);
    }

    #[test]
    fn test_index_widths_decode_identically() {
        let triangle = [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let u8_mesh = extract_glb(&indexed_glb(&triangle, &[0, 1, 2], 5121, 3)).unwrap();
        let u16_mesh =
            extract_glb(&indexed_glb(&triangle, &[0, 0, 1, 0, 2, 0], 5123, 3)).unwrap();
        let u32_mesh = extract_glb(&indexed_glb(
            &triangle,
            &[0, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0],
            5125,
            3,
        ))
        .unwrap();

        assert_eq!(u8_mesh, u16_mesh);
        assert_eq!(u16_mesh, u32_mesh);
        assert_eq!(
            u8_mesh.triangles,
            vec![[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]]
        );
    }

    #[test]
    fn test_non_triangular_index_count() {
        let err = extract_glb(&indexed_glb(&QUAD, &[0, 1, 2, 3], 5121, 4)).unwrap_err();
        assert_eq!(err, ConvertError::NonTriangularIndexCount(4));
    }

    #[test]
    fn test_index_past_vertex_array() {
        let err = extract_glb(&indexed_glb(&QUAD, &[0, 1, 9], 5121, 3)).unwrap_err();
        assert_eq!(
            err,
            ConvertError::IndexOutOfRange {
                index: 9,
                vertex_count: 4
            }
        );
    }

    #[test]
    fn test_positions_out_of_range() {
        let bin = f32_bytes(&[0.0; 9]);
        let json = json!({
            "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
            "accessors": [{"bufferView": 0, "byteOffset": 12, "componentType": 5126, "count": 3, "type": "VEC3"}],
            "bufferViews": [{"buffer": 0, "byteLength": 36}]
        });
        let err = extract_glb(&assemble_glb(&json, Some(&bin))).unwrap_err();
        assert_eq!(
            err,
            ConvertError::BufferOutOfRange {
                accessor: 0,
                needed: 48,
                available: 36
            }
        );
    }

    #[test]
    fn test_indices_out_of_range() {
        // Six u8 indices declared, only three bytes in the index view
        let err = extract_glb(&indexed_glb(&QUAD, &[0, 1, 2], 5121, 6)).unwrap_err();
        assert_eq!(
            err,
            ConvertError::BufferOutOfRange {
                accessor: 1,
                needed: 6,
                available: 3
            }
        );
    }

    #[test]
    fn test_no_mesh() {
        let glb = assemble_glb(&json!({"asset": {"version": "2.0"}}), None);
        assert_eq!(extract_glb(&glb).unwrap_err(), ConvertError::NoMeshFound);
    }

    #[test]
    fn test_mesh_without_primitives() {
        let glb = assemble_glb(&json!({"meshes": [{"primitives": []}]}), None);
        assert_eq!(
            extract_glb(&glb).unwrap_err(),
            ConvertError::NoPrimitiveFound { mesh: 0 }
        );
    }

    #[test]
    fn test_unsupported_mode() {
        let glb = assemble_glb(
            &json!({"meshes": [{"primitives": [{"attributes": {"POSITION": 0}, "mode": 1}]}]}),
            None,
        );
        assert_eq!(
            extract_glb(&glb).unwrap_err(),
            ConvertError::UnsupportedPrimitiveMode(1)
        );
    }

    #[test]
    fn test_missing_position_attribute() {
        let glb = assemble_glb(
            &json!({"meshes": [{"primitives": [{"attributes": {"NORMAL": 0}}]}]}),
            None,
        );
        assert_eq!(extract_glb(&glb).unwrap_err(), ConvertError::MissingPositions);
    }

    #[test]
    fn test_quantized_positions_rejected() {
        let bin = vec![0u8; 18];
        let json = json!({
            "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
            "accessors": [{"bufferView": 0, "componentType": 5123, "count": 3, "type": "VEC3"}],
            "bufferViews": [{"buffer": 0, "byteLength": 18}]
        });
        let err = extract_glb(&assemble_glb(&json, Some(&bin))).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedVertexFormat { accessor: 0, .. }));
    }

    #[test]
    fn test_json_only_container_needs_binary() {
        let json = json!({
            "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
            "accessors": [{"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"}],
            "bufferViews": [{"buffer": 0, "byteLength": 36}]
        });
        let err = extract_glb(&assemble_glb(&json, None)).unwrap_err();
        assert_eq!(err, ConvertError::MissingBinaryBuffer { accessor: 0 });
    }

    #[test]
    fn test_draco_rejected() {
        let json = json!({
            "extensionsUsed": ["KHR_draco_mesh_compression"],
            "extensionsRequired": ["KHR_draco_mesh_compression"],
            "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}]
        });
        let err = extract_glb(&assemble_glb(&json, None)).unwrap_err();
        assert_eq!(
            err,
            ConvertError::UnsupportedExtension("KHR_draco_mesh_compression".to_string())
        );
    }

    #[test]
    fn test_only_first_mesh_used() {
        let bin = f32_bytes(&[
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, //
            5.0, 5.0, 5.0, 6.0, 5.0, 5.0, 5.0, 6.0, 5.0,
        ]);
        let json = json!({
            "meshes": [
                {"primitives": [{"attributes": {"POSITION": 0}}, {"attributes": {"POSITION": 1}}]},
                {"primitives": [{"attributes": {"POSITION": 1}}]}
            ],
            "accessors": [
                {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"},
                {"bufferView": 0, "byteOffset": 36, "componentType": 5126, "count": 3, "type": "VEC3"}
            ],
            "bufferViews": [{"buffer": 0, "byteLength": 72}]
        });
        let mesh = extract_glb(&assemble_glb(&json, Some(&bin))).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.triangles[0][0], [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let glb = indexed_glb(&QUAD, &[0, 1, 2, 0, 2, 3], 5121, 6);
        let a = extract_glb(&glb).unwrap();
        let b = extract_glb(&glb).unwrap();

        let bits = |m: &CanonicalMesh| -> Vec<u32> {
            m.vertices().flatten().map(|f| f.to_bits()).collect()
        };
        assert_eq!(bits(&a), bits(&b));
    }
}
