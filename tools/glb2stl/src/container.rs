//! GLB container decoding
//!
//! Validates the 12-byte header, walks the chunk table and hands back the
//! parsed JSON document plus a borrowed slice of the BIN chunk.

use stl_common::{chunk_padding, ChunkKind, GlbChunkHeader, GlbHeader, GLB_MAGIC, GLB_VERSION};

use crate::document::SceneDocument;
use crate::error::ConvertError;

/// Decoder policy knobs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Fail on container versions other than 2 instead of warning
    pub strict_version: bool,
}

/// Size and type of one chunk as found in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkInfo {
    pub kind: ChunkKind,
    /// Byte offset of the chunk data within the file
    pub offset: usize,
    pub length: usize,
}

/// A decoded container, borrowing its BIN chunk from the input bytes
#[derive(Debug, Clone)]
pub struct GlbContainer<'a> {
    pub header: GlbHeader,
    pub document: SceneDocument,
    /// `None` when the file carries no BIN chunk
    pub binary: Option<&'a [u8]>,
    /// Chunks that were read (JSON, and BIN if present)
    pub chunks: Vec<ChunkInfo>,
}

/// Decode with default (tolerant) options
pub fn decode(bytes: &[u8]) -> Result<GlbContainer<'_>, ConvertError> {
    decode_with(bytes, &DecodeOptions::default())
}

/// Decode a GLB container
pub fn decode_with<'a>(
    bytes: &'a [u8],
    options: &DecodeOptions,
) -> Result<GlbContainer<'a>, ConvertError> {
    if !bytes.starts_with(&GLB_MAGIC) {
        return Err(ConvertError::InvalidMagic);
    }
    let header = GlbHeader::from_bytes(bytes).ok_or(ConvertError::TruncatedContainer {
        what: "container header",
        needed: GlbHeader::SIZE,
        available: bytes.len(),
    })?;

    if header.version != GLB_VERSION {
        if options.strict_version {
            return Err(ConvertError::UnsupportedVersion(header.version));
        }
        tracing::warn!(
            "Container version {} (expected {}), decoding anyway",
            header.version,
            GLB_VERSION
        );
    }
    if header.length as usize != bytes.len() {
        tracing::warn!(
            "Container declares {} bytes but {} are present",
            header.length,
            bytes.len()
        );
    }
    tracing::debug!(
        "glTF version: {}, total length: {} bytes",
        header.version,
        header.length
    );

    let mut reader = ChunkReader {
        bytes,
        offset: GlbHeader::SIZE,
    };

    let json = reader
        .next_chunk()?
        .ok_or(ConvertError::TruncatedContainer {
            what: "JSON chunk header",
            needed: GlbHeader::SIZE + GlbChunkHeader::SIZE,
            available: bytes.len(),
        })?;
    if json.info.kind != ChunkKind::Json {
        return Err(ConvertError::UnexpectedChunkOrder {
            position: 0,
            expected: ChunkKind::Json,
            found: json.info.kind,
        });
    }
    tracing::debug!("JSON chunk: {} bytes", json.info.length);
    let document = SceneDocument::from_slice(json.data)?;
    let mut chunks = vec![json.info];

    let binary = match reader.next_chunk()? {
        Some(bin) if bin.info.kind == ChunkKind::Bin => {
            tracing::debug!("BIN chunk: {} bytes", bin.info.length);
            chunks.push(bin.info);
            Some(bin.data)
        }
        Some(other) => {
            return Err(ConvertError::UnexpectedChunkOrder {
                position: 1,
                expected: ChunkKind::Bin,
                found: other.info.kind,
            });
        }
        None => {
            tracing::debug!("No BIN chunk");
            None
        }
    };

    if reader.remaining() > 0 {
        tracing::debug!("Ignoring {} trailing bytes after the BIN chunk", reader.remaining());
    }

    Ok(GlbContainer {
        header,
        document,
        binary,
        chunks,
    })
}

struct Chunk<'a> {
    info: ChunkInfo,
    data: &'a [u8],
}

/// Sequential reader over the chunk table
struct ChunkReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ChunkReader<'a> {
    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    /// Next chunk, or `None` when the input is exhausted
    fn next_chunk(&mut self) -> Result<Option<Chunk<'a>>, ConvertError> {
        let rest = &self.bytes[self.offset..];
        if rest.is_empty() {
            return Ok(None);
        }
        let header = GlbChunkHeader::from_bytes(rest).ok_or(ConvertError::TruncatedContainer {
            what: "chunk header",
            needed: GlbChunkHeader::SIZE,
            available: rest.len(),
        })?;

        let length = header.length as usize;
        let data_start = self.offset + GlbChunkHeader::SIZE;
        let available = self.bytes.len() - data_start;
        if length > available {
            return Err(ConvertError::TruncatedContainer {
                what: "chunk data",
                needed: length,
                available,
            });
        }

        // Unaligned chunks are tolerated; the next header is read where this data ends
        if chunk_padding(length) != 0 {
            tracing::debug!(
                "{} chunk length {} is not 4-byte aligned",
                header.chunk_kind(),
                length
            );
        }

        self.offset = data_start + length;
        Ok(Some(Chunk {
            info: ChunkInfo {
                kind: header.chunk_kind(),
                offset: data_start,
                length,
            },
            data: &self.bytes[data_start..data_start + length],
        }))
    }
}
