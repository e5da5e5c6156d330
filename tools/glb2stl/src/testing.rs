//! In-crate GLB builders for unit tests.

use stl_common::{chunk_padding, GlbChunkHeader, GlbHeader, CHUNK_BIN, CHUNK_JSON};

/// Little-endian f32 bytes
pub(crate) fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Assemble a container from raw `(chunk type, data)` pairs, unpadded
pub(crate) fn raw_glb(version: u32, chunks: &[(u32, Vec<u8>)]) -> Vec<u8> {
    let body: usize = chunks
        .iter()
        .map(|(_, data)| GlbChunkHeader::SIZE + data.len())
        .sum();
    let mut header = GlbHeader::new((GlbHeader::SIZE + body) as u32);
    header.version = version;

    let mut glb = header.to_bytes().to_vec();
    for (kind, data) in chunks {
        let chunk = GlbChunkHeader {
            length: data.len() as u32,
            kind: *kind,
        };
        glb.extend_from_slice(&chunk.to_bytes());
        glb.extend_from_slice(data);
    }
    glb
}

/// Assemble a well-formed container: JSON padded with spaces, BIN with zeros
pub(crate) fn assemble_glb(json: &serde_json::Value, bin: Option<&[u8]>) -> Vec<u8> {
    let mut json_bytes = serde_json::to_vec(json).expect("serialize JSON");
    json_bytes.extend(std::iter::repeat_n(b' ', chunk_padding(json_bytes.len())));

    let mut chunks = vec![(CHUNK_JSON, json_bytes)];
    if let Some(bin) = bin {
        let mut bin_bytes = bin.to_vec();
        bin_bytes.extend(std::iter::repeat_n(0u8, chunk_padding(bin.len())));
        chunks.push((CHUNK_BIN, bin_bytes));
    }
    raw_glb(2, &chunks)
}

/// The one-triangle container: (0,0,0), (1,0,0), (0,1,0), no indices
pub(crate) fn minimal_triangle_glb() -> Vec<u8> {
    let json = serde_json::json!({
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
        "accessors": [{"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"}],
        "bufferViews": [{"buffer": 0, "byteOffset": 0, "byteLength": 36}],
        "buffers": [{"byteLength": 36}]
    });
    let bin = f32_bytes(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    assemble_glb(&json, Some(&bin))
}
