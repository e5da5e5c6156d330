//! GLB -> STL conversion pipeline

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::container::{decode_with, ChunkInfo, DecodeOptions};
use crate::mesh::{extract, Bounds, CanonicalMesh};
use crate::stl::{encode_stl, StlEncoding, StlOptions};

/// Everything that controls one conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    pub decode: DecodeOptions,
    pub stl: StlOptions,
}

/// Result of a file conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub triangle_count: usize,
    pub bounds: Option<Bounds>,
    pub encoding: StlEncoding,
    pub bytes_written: usize,
}

/// Decode a GLB held in memory and extract its mesh
pub fn convert_glb_to_memory(bytes: &[u8], options: &DecodeOptions) -> Result<CanonicalMesh> {
    let container = decode_with(bytes, options)?;
    tracing::debug!("Scene has {} mesh(es)", container.document.meshes.len());
    let mesh = extract(&container.document, container.binary)?;
    Ok(mesh)
}

/// Convert a GLB file to an STL file
///
/// The STL is fully encoded before the output file is created, so a failed
/// conversion never leaves a partial file behind.
pub fn convert_glb(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
) -> Result<ConvertSummary> {
    let bytes =
        std::fs::read(input).with_context(|| format!("Failed to read input: {:?}", input))?;
    let mesh = convert_glb_to_memory(&bytes, &options.decode)
        .with_context(|| format!("Failed to convert {:?}", input))?;

    let encoded = encode_stl(&mesh, &options.stl)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
    }
    std::fs::write(output, &encoded)
        .with_context(|| format!("Failed to write output: {:?}", output))?;

    let bounds = mesh.bounds();
    if let Some(b) = bounds {
        tracing::debug!(
            "Vertex bounds: X({:.3} to {:.3}) Y({:.3} to {:.3}) Z({:.3} to {:.3})",
            b.min[0],
            b.max[0],
            b.min[1],
            b.max[1],
            b.min[2],
            b.max[2]
        );
    }
    tracing::info!(
        "Converted mesh: {} triangles, {:?} STL, {} bytes",
        mesh.triangle_count(),
        options.stl.encoding,
        encoded.len()
    );

    Ok(ConvertSummary {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        triangle_count: mesh.triangle_count(),
        bounds,
        encoding: options.stl.encoding,
        bytes_written: encoded.len(),
    })
}

/// Default output path: the input with an `.stl` extension
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("stl")
}

/// Container summary for the `inspect` command
#[derive(Debug, Clone, PartialEq)]
pub struct GlbReport {
    pub version: u32,
    pub declared_length: u32,
    pub actual_length: usize,
    pub chunks: Vec<ChunkInfo>,
    pub asset_version: Option<String>,
    pub generator: Option<String>,
    /// Declared byte length and uri of each buffer
    pub buffers: Vec<(usize, Option<String>)>,
    pub buffer_views: usize,
    pub accessors: usize,
    /// Primitive count per mesh
    pub meshes: Vec<(Option<String>, usize)>,
    pub extensions_used: Vec<String>,
    pub extensions_required: Vec<String>,
    /// Triangle count and bounds of the mesh that would be converted,
    /// or why extraction fails
    pub extraction: std::result::Result<(usize, Option<Bounds>), String>,
}

/// Decode a GLB file and summarize its structure
pub fn inspect_glb(input: &Path, options: &DecodeOptions) -> Result<GlbReport> {
    let bytes =
        std::fs::read(input).with_context(|| format!("Failed to read input: {:?}", input))?;
    let container =
        decode_with(&bytes, options).with_context(|| format!("Failed to decode {:?}", input))?;
    let document = &container.document;

    let extraction = extract(document, container.binary)
        .map(|mesh| (mesh.triangle_count(), mesh.bounds()))
        .map_err(|e| e.to_string());

    Ok(GlbReport {
        version: container.header.version,
        declared_length: container.header.length,
        actual_length: bytes.len(),
        chunks: container.chunks.clone(),
        asset_version: document.asset.as_ref().map(|a| a.version.clone()),
        generator: document.asset.as_ref().and_then(|a| a.generator.clone()),
        buffers: document
            .buffers
            .iter()
            .map(|b| (b.byte_length, b.uri.clone()))
            .collect(),
        buffer_views: document.buffer_views.len(),
        accessors: document.accessors.len(),
        meshes: document
            .meshes
            .iter()
            .map(|m| (m.name.clone(), m.primitives.len()))
            .collect(),
        extensions_used: document.extensions_used.clone(),
        extensions_required: document.extensions_required.clone(),
        extraction,
    })
}
