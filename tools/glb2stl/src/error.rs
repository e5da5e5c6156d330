//! Conversion error taxonomy
//!
//! Every variant aborts the conversion of one file. Nothing is written for a
//! file that fails.

use stl_common::ChunkKind;

use crate::accessor::{ComponentType, ElementType};

/// Failure while decoding a GLB container or extracting its mesh
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConvertError {
    /// First four bytes are not "glTF"
    #[error("invalid magic: not a binary glTF container")]
    InvalidMagic,

    /// A declared length runs past the end of the input
    #[error("truncated container: {what} needs {needed} bytes, {available} available")]
    TruncatedContainer {
        what: &'static str,
        needed: usize,
        available: usize,
    },

    /// Container version other than 2 (strict mode only)
    #[error("unsupported container version {0} (expected 2)")]
    UnsupportedVersion(u32),

    /// Chunk at `position` has the wrong type
    #[error("unexpected chunk order: chunk {position} is {found}, expected {expected}")]
    UnexpectedChunkOrder {
        position: usize,
        expected: ChunkKind,
        found: ChunkKind,
    },

    /// JSON chunk is not valid, or references something that does not exist
    #[error("malformed metadata: {0}")]
    MalformedMetadata(String),

    /// An accessor needs buffer bytes but the container has no BIN chunk
    #[error("accessor {accessor} needs binary data but the container has no BIN chunk")]
    MissingBinaryBuffer { accessor: usize },

    /// Buffer view points at a buffer other than the embedded BIN chunk
    #[error("buffer view {view} references buffer {buffer}; only the embedded buffer 0 is supported")]
    UnsupportedBuffer { view: usize, buffer: usize },

    /// File requires an extension this converter cannot decode
    #[error("required extension {0} is not supported")]
    UnsupportedExtension(String),

    #[error("no mesh found")]
    NoMeshFound,

    #[error("mesh {mesh} has no primitives")]
    NoPrimitiveFound { mesh: usize },

    #[error("unsupported primitive mode {0} (only triangles, mode 4, are supported)")]
    UnsupportedPrimitiveMode(u32),

    #[error("primitive has no POSITION attribute")]
    MissingPositions,

    #[error("unsupported vertex format: accessor {accessor} is {element_type}/{component_type}, expected VEC3/FLOAT")]
    UnsupportedVertexFormat {
        accessor: usize,
        component_type: ComponentType,
        element_type: ElementType,
    },

    #[error("unsupported index format: accessor {accessor} is {element_type}/{component_type}, expected unsigned SCALAR")]
    UnsupportedIndexFormat {
        accessor: usize,
        component_type: ComponentType,
        element_type: ElementType,
    },

    #[error("index count {0} is not a multiple of 3")]
    NonTriangularIndexCount(usize),

    #[error("vertex count {0} is not a multiple of 3")]
    NonTriangularVertexCount(usize),

    /// Accessor byte span exceeds its buffer view or the BIN chunk
    #[error("accessor {accessor} out of range: needs {needed} bytes, {available} available")]
    BufferOutOfRange {
        accessor: usize,
        needed: usize,
        available: usize,
    },

    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
}

impl ConvertError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedMetadata(message.into())
    }
}

impl From<serde_json::Error> for ConvertError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedMetadata(err.to_string())
    }
}
