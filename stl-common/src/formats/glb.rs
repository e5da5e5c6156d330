//! Binary glTF container layout (.glb)
//!
//! # Layout
//! ```text
//! 0x00: magic u32     ("glTF")
//! 0x04: version u32   (2)
//! 0x08: length u32    (total file length, header included)
//! 0x0C: chunk table   (repeated: length u32, type u32, data[length])
//! ```
//!
//! The first chunk is always JSON. The second, when present, is the single
//! embedded BIN buffer. Chunk data is padded to 4-byte alignment by writers;
//! the chunk length already includes that padding.

/// Container magic ("glTF" read as little-endian u32)
pub const GLB_MAGIC: [u8; 4] = *b"glTF";

/// Container version this crate targets
pub const GLB_VERSION: u32 = 2;

/// Chunk type tag for the JSON metadata chunk ("JSON")
pub const CHUNK_JSON: u32 = 0x4E4F_534A;

/// Chunk type tag for the binary buffer chunk ("BIN\0")
pub const CHUNK_BIN: u32 = 0x004E_4942;

/// Chunk data alignment
pub const CHUNK_ALIGNMENT: usize = 4;

/// Known chunk kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    Json,
    Bin,
    Unknown(u32),
}

impl ChunkKind {
    pub fn from_tag(tag: u32) -> Self {
        match tag {
            CHUNK_JSON => Self::Json,
            CHUNK_BIN => Self::Bin,
            other => Self::Unknown(other),
        }
    }

    pub fn tag(self) -> u32 {
        match self {
            Self::Json => CHUNK_JSON,
            Self::Bin => CHUNK_BIN,
            Self::Unknown(tag) => tag,
        }
    }
}

impl std::fmt::Display for ChunkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => f.write_str("JSON"),
            Self::Bin => f.write_str("BIN"),
            Self::Unknown(tag) => write!(f, "unknown (0x{tag:08X})"),
        }
    }
}

/// GLB file header (12 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct GlbHeader {
    pub magic: [u8; 4],
    pub version: u32,
    pub length: u32,
}

impl GlbHeader {
    pub const SIZE: usize = 12;

    pub fn new(length: u32) -> Self {
        Self {
            magic: GLB_MAGIC,
            version: GLB_VERSION,
            length,
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..8].copy_from_slice(&self.version.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.length.to_le_bytes());
        bytes
    }

    /// Read header from bytes
    ///
    /// Does not check the magic; callers decide how to report a mismatch.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            magic: [bytes[0], bytes[1], bytes[2], bytes[3]],
            version: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            length: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
        })
    }
}

/// GLB chunk header (8 bytes), followed by `length` bytes of chunk data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct GlbChunkHeader {
    pub length: u32,
    pub kind: u32,
}

impl GlbChunkHeader {
    pub const SIZE: usize = 8;

    pub fn new(length: u32, kind: ChunkKind) -> Self {
        Self {
            length,
            kind: kind.tag(),
        }
    }

    pub fn chunk_kind(&self) -> ChunkKind {
        ChunkKind::from_tag(self.kind)
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.length.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.kind.to_le_bytes());
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            length: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            kind: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        })
    }
}

/// Number of padding bytes needed to bring `len` up to chunk alignment
pub fn chunk_padding(len: usize) -> usize {
    (CHUNK_ALIGNMENT - (len % CHUNK_ALIGNMENT)) % CHUNK_ALIGNMENT
}
