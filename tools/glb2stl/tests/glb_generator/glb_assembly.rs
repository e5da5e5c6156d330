//! GLB file assembly.

use stl_common::{chunk_padding, ChunkKind, GlbChunkHeader, GlbHeader};

/// Assemble the final GLB binary
pub fn assemble_glb(json: &serde_json::Value, buffer_data: Option<&[u8]>) -> Vec<u8> {
    let json_bytes = serde_json::to_vec(json).expect("Failed to serialize JSON");
    let json_padding = chunk_padding(json_bytes.len());
    let json_chunk_length = json_bytes.len() + json_padding;

    let buffer_chunk_length = buffer_data.map(|b| b.len() + chunk_padding(b.len()));

    let total_length = GlbHeader::SIZE
        + GlbChunkHeader::SIZE
        + json_chunk_length
        + buffer_chunk_length.map_or(0, |len| GlbChunkHeader::SIZE + len);

    let mut glb = Vec::with_capacity(total_length);
    glb.extend_from_slice(&GlbHeader::new(total_length as u32).to_bytes());

    // JSON chunk, padded with spaces
    glb.extend_from_slice(
        &GlbChunkHeader::new(json_chunk_length as u32, ChunkKind::Json).to_bytes(),
    );
    glb.extend_from_slice(&json_bytes);
    glb.extend(std::iter::repeat_n(b' ', json_padding));

    // BIN chunk, padded with zeros
    if let (Some(data), Some(chunk_length)) = (buffer_data, buffer_chunk_length) {
        glb.extend_from_slice(&GlbChunkHeader::new(chunk_length as u32, ChunkKind::Bin).to_bytes());
        glb.extend_from_slice(data);
        glb.extend(std::iter::repeat_n(0u8, chunk_length - data.len()));
    }

    assert_eq!(glb.len(), total_length);
    glb
}
