//! Scene metadata (the JSON chunk)
//!
//! Only the entities mesh extraction needs are modelled. Unknown fields
//! (materials, nodes, animations, ...) are ignored by serde. Every field
//! with a glTF default is `#[serde(default)]`; type mismatches surface as
//! `ConvertError::MalformedMetadata`.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::accessor::{ComponentType, ElementType};
use crate::error::ConvertError;

/// glTF primitive mode for triangle lists
pub const MODE_TRIANGLES: u32 = 4;

/// Required extensions that change how geometry is stored
///
/// Files requiring these cannot be decoded from plain accessors.
pub const UNSUPPORTED_GEOMETRY_EXTENSIONS: &[&str] = &[
    "KHR_draco_mesh_compression",
    "EXT_meshopt_compression",
    "KHR_meshopt_compression",
];

/// Parsed JSON chunk
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDocument {
    #[serde(default)]
    pub asset: Option<Asset>,
    #[serde(default)]
    pub buffers: Vec<Buffer>,
    #[serde(default)]
    pub buffer_views: Vec<BufferView>,
    #[serde(default)]
    pub accessors: Vec<Accessor>,
    #[serde(default)]
    pub meshes: Vec<Mesh>,
    #[serde(default)]
    pub extensions_used: Vec<String>,
    #[serde(default)]
    pub extensions_required: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub generator: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buffer {
    pub byte_length: usize,
    /// Set for external `.bin` files, absent for the embedded GLB buffer
    #[serde(default)]
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferView {
    pub buffer: usize,
    #[serde(default)]
    pub byte_offset: usize,
    pub byte_length: usize,
    /// Absent or 0 means tightly packed
    #[serde(default)]
    pub byte_stride: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessor {
    #[serde(default)]
    pub buffer_view: Option<usize>,
    #[serde(default)]
    pub byte_offset: usize,
    pub component_type: ComponentType,
    pub count: usize,
    #[serde(rename = "type")]
    pub element_type: ElementType,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Mesh {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub primitives: Vec<Primitive>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Primitive {
    #[serde(default)]
    pub attributes: BTreeMap<String, usize>,
    #[serde(default)]
    pub indices: Option<usize>,
    #[serde(default)]
    pub mode: Option<u32>,
}

impl Primitive {
    /// Topology mode, defaulting to triangles
    pub fn mode(&self) -> u32 {
        self.mode.unwrap_or(MODE_TRIANGLES)
    }

    pub fn position_accessor(&self) -> Option<usize> {
        self.attributes.get("POSITION").copied()
    }
}

impl SceneDocument {
    /// Parse the JSON chunk payload
    ///
    /// Trailing space or NUL padding after the JSON object is ignored.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ConvertError> {
        let end = bytes
            .iter()
            .rposition(|&b| b != 0 && !b.is_ascii_whitespace())
            .map_or(0, |i| i + 1);
        let text = std::str::from_utf8(&bytes[..end])
            .map_err(|e| ConvertError::malformed(format!("JSON chunk is not UTF-8: {e}")))?;
        Ok(serde_json::from_str(text)?)
    }

    pub fn accessor(&self, index: usize) -> Result<&Accessor, ConvertError> {
        self.accessors.get(index).ok_or_else(|| {
            ConvertError::malformed(format!(
                "accessor {index} does not exist ({} defined)",
                self.accessors.len()
            ))
        })
    }

    pub fn buffer_view(&self, index: usize) -> Result<&BufferView, ConvertError> {
        self.buffer_views.get(index).ok_or_else(|| {
            ConvertError::malformed(format!(
                "buffer view {index} does not exist ({} defined)",
                self.buffer_views.len()
            ))
        })
    }

    pub fn mesh(&self, index: usize) -> Result<&Mesh, ConvertError> {
        if self.meshes.is_empty() {
            return Err(ConvertError::NoMeshFound);
        }
        self.meshes.get(index).ok_or_else(|| {
            ConvertError::malformed(format!(
                "mesh {index} does not exist ({} defined)",
                self.meshes.len()
            ))
        })
    }

    /// Reject files whose geometry is stored through an unsupported extension
    pub fn check_required_extensions(&self) -> Result<(), ConvertError> {
        for ext in &self.extensions_required {
            if UNSUPPORTED_GEOMETRY_EXTENSIONS.contains(&ext.as_str()) {
                return Err(ConvertError::UnsupportedExtension(ext.clone()));
            }
            tracing::warn!("Ignoring required extension {} (geometry is read as-is)", ext);
        }
        Ok(())
    }
}
