//! STL output (binary and ASCII)
//!
//! Facet normals are computed from the winding order of each triangle; no
//! normal data is taken from the source file.

use anyhow::Result;
use std::io::Write;

use stl_common::{facet_normal, StlFacet, StlHeader, STL_HEADER_LEN};

use crate::mesh::CanonicalMesh;

/// Default binary header text
pub const DEFAULT_HEADER: &str = "Converted from glTF/GLB format";

/// Default ASCII solid name
pub const DEFAULT_SOLID_NAME: &str = "glTF_converted";

/// Output encoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StlEncoding {
    #[default]
    Binary,
    Ascii,
}

/// Writer settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StlOptions {
    pub encoding: StlEncoding,
    /// Binary header text (truncated to 80 bytes)
    pub header: String,
    /// ASCII `solid` name
    pub solid_name: String,
}

impl Default for StlOptions {
    fn default() -> Self {
        Self {
            encoding: StlEncoding::Binary,
            header: DEFAULT_HEADER.to_string(),
            solid_name: DEFAULT_SOLID_NAME.to_string(),
        }
    }
}

impl StlOptions {
    /// Reject settings that would produce a malformed or silently altered file
    pub fn validate(&self) -> Result<()> {
        if self.header.len() > STL_HEADER_LEN {
            anyhow::bail!(
                "header is {} bytes (binary STL headers hold at most {})",
                self.header.len(),
                STL_HEADER_LEN
            );
        }
        if self.solid_name.is_empty()
            || self.solid_name.chars().any(|c| c.is_whitespace() || c.is_control())
        {
            anyhow::bail!(
                "solid name {:?} must be a single non-empty word",
                self.solid_name
            );
        }
        Ok(())
    }
}

/// Write a complete binary STL file
pub fn write_stl_binary<W: Write>(w: &mut W, mesh: &CanonicalMesh, header: &str) -> Result<()> {
    let triangle_count = u32::try_from(mesh.triangle_count()).map_err(|_| {
        anyhow::anyhow!(
            "{} triangles exceed the binary STL limit",
            mesh.triangle_count()
        )
    })?;

    w.write_all(&StlHeader::new(header, triangle_count).to_bytes())?;
    for triangle in &mesh.triangles {
        w.write_all(&StlFacet::from_triangle(*triangle).to_bytes())?;
    }
    Ok(())
}

/// Write a complete ASCII STL file
pub fn write_stl_ascii<W: Write>(w: &mut W, mesh: &CanonicalMesh, solid_name: &str) -> Result<()> {
    writeln!(w, "solid {solid_name}")?;
    for triangle in &mesh.triangles {
        let [nx, ny, nz] = facet_normal(triangle);
        writeln!(w, "facet normal {nx:.6} {ny:.6} {nz:.6}")?;
        writeln!(w, "  outer loop")?;
        for [x, y, z] in triangle {
            writeln!(w, "    vertex {x:.6} {y:.6} {z:.6}")?;
        }
        writeln!(w, "  endloop")?;
        writeln!(w, "endfacet")?;
    }
    writeln!(w, "endsolid {solid_name}")?;
    Ok(())
}

/// Write `mesh` in the encoding selected by `options`
pub fn write_stl<W: Write>(w: &mut W, mesh: &CanonicalMesh, options: &StlOptions) -> Result<()> {
    match options.encoding {
        StlEncoding::Binary => write_stl_binary(w, mesh, &options.header),
        StlEncoding::Ascii => write_stl_ascii(w, mesh, &options.solid_name),
    }
}

/// Encode `mesh` into an in-memory STL file
pub fn encode_stl(mesh: &CanonicalMesh, options: &StlOptions) -> Result<Vec<u8>> {
    let capacity = match options.encoding {
        StlEncoding::Binary => StlHeader::SIZE + mesh.triangle_count() * StlFacet::SIZE,
        StlEncoding::Ascii => 64 + mesh.triangle_count() * 256,
    };
    let mut out = Vec::with_capacity(capacity);
    write_stl(&mut out, mesh, options)?;
    Ok(out)
}
