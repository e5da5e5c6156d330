//! Accessor layout table and bounds-checked accessor views
//!
//! Both the position path and the index path go through the same
//! `(ComponentType, ElementType) -> ElementLayout` table and the same
//! `AccessorView::resolve` bounds checks.

use serde::Deserialize;
use std::fmt;

use crate::document::{Accessor, SceneDocument};
use crate::error::ConvertError;

/// glTF `componentType`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u32")]
pub enum ComponentType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    UnsignedInt,
    Float,
}

impl ComponentType {
    /// Size of one component in bytes
    pub const fn size(self) -> usize {
        match self {
            Self::Byte | Self::UnsignedByte => 1,
            Self::Short | Self::UnsignedShort => 2,
            Self::UnsignedInt | Self::Float => 4,
        }
    }

    pub const fn code(self) -> u32 {
        match self {
            Self::Byte => 5120,
            Self::UnsignedByte => 5121,
            Self::Short => 5122,
            Self::UnsignedShort => 5123,
            Self::UnsignedInt => 5125,
            Self::Float => 5126,
        }
    }

    /// Component types allowed for index accessors
    pub const fn is_index_type(self) -> bool {
        matches!(
            self,
            Self::UnsignedByte | Self::UnsignedShort | Self::UnsignedInt
        )
    }
}

impl TryFrom<u32> for ComponentType {
    type Error = String;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            5120 => Ok(Self::Byte),
            5121 => Ok(Self::UnsignedByte),
            5122 => Ok(Self::Short),
            5123 => Ok(Self::UnsignedShort),
            5125 => Ok(Self::UnsignedInt),
            5126 => Ok(Self::Float),
            other => Err(format!("unknown componentType {other}")),
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Byte => "BYTE",
            Self::UnsignedByte => "UNSIGNED_BYTE",
            Self::Short => "SHORT",
            Self::UnsignedShort => "UNSIGNED_SHORT",
            Self::UnsignedInt => "UNSIGNED_INT",
            Self::Float => "FLOAT",
        };
        write!(f, "{name} ({})", self.code())
    }
}

/// glTF accessor `type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ElementType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl ElementType {
    /// Number of components per element
    pub const fn component_count(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 | Self::Mat2 => 4,
            Self::Mat3 => 9,
            Self::Mat4 => 16,
        }
    }

    /// Matrix column count, `None` for scalars and vectors
    const fn matrix_columns(self) -> Option<usize> {
        match self {
            Self::Mat2 => Some(2),
            Self::Mat3 => Some(3),
            Self::Mat4 => Some(4),
            _ => None,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Scalar => "SCALAR",
            Self::Vec2 => "VEC2",
            Self::Vec3 => "VEC3",
            Self::Vec4 => "VEC4",
            Self::Mat2 => "MAT2",
            Self::Mat3 => "MAT3",
            Self::Mat4 => "MAT4",
        };
        f.write_str(name)
    }
}

/// Byte layout of one accessor element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementLayout {
    pub component_size: usize,
    pub component_count: usize,
    /// Element size including matrix column padding
    pub size: usize,
}

impl ElementLayout {
    /// Layout lookup for a component/element pair
    ///
    /// Matrix columns start on 4-byte boundaries, so MAT2/MAT3 of 1- or
    /// 2-byte components carry column padding.
    pub const fn of(component: ComponentType, element: ElementType) -> Self {
        let component_size = component.size();
        let component_count = element.component_count();
        let size = match element.matrix_columns() {
            Some(columns) => {
                let column = columns * component_size;
                columns * (column.div_ceil(4) * 4)
            }
            None => component_count * component_size,
        };
        Self {
            component_size,
            component_count,
            size,
        }
    }
}

/// What an accessor is about to be read as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorRole {
    /// VEC3 / FLOAT vertex positions
    Positions,
    /// Unsigned SCALAR triangle indices
    Indices,
}

impl AccessorRole {
    fn check(self, index: usize, accessor: &Accessor) -> Result<(), ConvertError> {
        let component_type = accessor.component_type;
        let element_type = accessor.element_type;
        match self {
            Self::Positions => {
                if element_type != ElementType::Vec3 || component_type != ComponentType::Float {
                    return Err(ConvertError::UnsupportedVertexFormat {
                        accessor: index,
                        component_type,
                        element_type,
                    });
                }
            }
            Self::Indices => {
                if element_type != ElementType::Scalar || !component_type.is_index_type() {
                    return Err(ConvertError::UnsupportedIndexFormat {
                        accessor: index,
                        component_type,
                        element_type,
                    });
                }
            }
        }
        Ok(())
    }
}

/// A validated, in-bounds view over one accessor's elements
#[derive(Debug, Clone, Copy)]
pub struct AccessorView<'a> {
    pub index: usize,
    pub component_type: ComponentType,
    pub count: usize,
    layout: ElementLayout,
    stride: usize,
    /// First byte of element 0 through the last byte of the last element
    data: &'a [u8],
}

impl<'a> AccessorView<'a> {
    /// Resolve accessor `index` against the BIN chunk
    ///
    /// Checks, in order: the format expected by `role`, the buffer view
    /// reference, presence of the BIN chunk, the view against the BIN chunk,
    /// and the element span against the view. All offsets use checked
    /// arithmetic so a hostile header cannot wrap around.
    pub fn resolve(
        document: &SceneDocument,
        binary: Option<&'a [u8]>,
        index: usize,
        role: AccessorRole,
    ) -> Result<Self, ConvertError> {
        let accessor = document.accessor(index)?;
        role.check(index, accessor)?;

        let view_index = accessor.buffer_view.ok_or_else(|| {
            ConvertError::malformed(format!(
                "accessor {index} has no bufferView (sparse or zero-filled accessors are not supported)"
            ))
        })?;
        let view = document.buffer_view(view_index)?;
        // Buffer 0 is the BIN chunk only when it has no uri
        let external = document
            .buffers
            .get(view.buffer)
            .is_some_and(|buffer| buffer.uri.is_some());
        if view.buffer != 0 || external {
            return Err(ConvertError::UnsupportedBuffer {
                view: view_index,
                buffer: view.buffer,
            });
        }

        let binary = binary.ok_or(ConvertError::MissingBinaryBuffer { accessor: index })?;

        let view_end = view
            .byte_offset
            .checked_add(view.byte_length)
            .unwrap_or(usize::MAX);
        if view_end > binary.len() {
            return Err(ConvertError::BufferOutOfRange {
                accessor: index,
                needed: view_end,
                available: binary.len(),
            });
        }
        let view_bytes = &binary[view.byte_offset..view_end];

        let layout = ElementLayout::of(accessor.component_type, accessor.element_type);
        let stride = match view.byte_stride {
            Some(stride) if stride != 0 => stride,
            _ => layout.size,
        };
        if stride < layout.size {
            return Err(ConvertError::malformed(format!(
                "buffer view {view_index} stride {stride} is smaller than accessor {index} element size {}",
                layout.size
            )));
        }

        let span = match accessor.count {
            0 => Some(0),
            count => (count - 1)
                .checked_mul(stride)
                .and_then(|n| n.checked_add(layout.size)),
        };
        let needed = span
            .and_then(|span| accessor.byte_offset.checked_add(span))
            .unwrap_or(usize::MAX);
        if needed > view_bytes.len() {
            return Err(ConvertError::BufferOutOfRange {
                accessor: index,
                needed,
                available: view_bytes.len(),
            });
        }

        Ok(Self {
            index,
            component_type: accessor.component_type,
            count: accessor.count,
            layout,
            stride,
            data: &view_bytes[accessor.byte_offset..needed],
        })
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Raw bytes of element `i`
    ///
    /// # Panics
    /// If `i >= count`.
    pub fn element(&self, i: usize) -> &'a [u8] {
        let start = i * self.stride;
        &self.data[start..start + self.layout.size]
    }

    pub fn elements(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        (0..self.count).map(move |i| self.element(i))
    }

    /// Decode VEC3 / FLOAT elements
    pub fn read_vec3_f32(&self) -> Vec<[f32; 3]> {
        self.elements()
            .map(|e| [read_f32(e, 0), read_f32(e, 4), read_f32(e, 8)])
            .collect()
    }

    /// Decode unsigned SCALAR elements, widened to u32
    ///
    /// The width comes from the layout table: 1, 2 or 4 bytes.
    pub fn read_u32(&self) -> Vec<u32> {
        let width = self.layout.component_size;
        self.elements()
            .map(|e| match width {
                1 => u32::from(e[0]),
                2 => u32::from(u16::from_le_bytes([e[0], e[1]])),
                _ => u32::from_le_bytes([e[0], e[1], e[2], e[3]]),
            })
            .collect()
    }
}

fn read_f32(bytes: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
