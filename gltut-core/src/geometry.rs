//! CPU-side geometry: validated mesh data, the inline tutorial triangles, and the vertex
//! attribute layouts that tie them to shader inputs.

use crate::error::MeshError;

const FLOAT_SIZE: i32 = std::mem::size_of::<f32>() as i32;

/// One named shader input and where it lives inside an interleaved `f32` vertex buffer.
///
/// `stride` and `offset` are in bytes; a stride of `0` means tightly packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub name: &'static str,
    pub components: i32,
    pub stride: i32,
    pub offset: i32,
}

impl VertexAttribute {
    pub const fn floats(name: &'static str, components: i32, stride: i32, offset: i32) -> Self {
        Self {
            name,
            components,
            stride: stride * FLOAT_SIZE,
            offset: offset * FLOAT_SIZE,
        }
    }
}

/// Layout of imported meshes: bare positions.
pub const MESH_LAYOUT: &[VertexAttribute] = &[VertexAttribute::floats("vertexPosition", 3, 0, 0)];

/// Layout of [`TUTORIAL_TRIANGLE`]: 2D position followed by an RGB color.
pub const TRIANGLE_LAYOUT: &[VertexAttribute] = &[
    VertexAttribute::floats("vertexPosition", 2, 5, 0),
    VertexAttribute::floats("vertexColor", 3, 5, 2),
];

/// Layout of [`FULLSCREEN_TRIANGLE`]: 2D position followed by a texture coordinate.
pub const FULLSCREEN_LAYOUT: &[VertexAttribute] = &[
    VertexAttribute::floats("vertexPosition", 2, 4, 0),
    VertexAttribute::floats("vertexTextureCoords", 2, 4, 2),
];

#[rustfmt::skip]
pub const TUTORIAL_TRIANGLE: [f32; 15] = [
    -0.5, -0.5,   1.0, 0.0, 0.0,
     0.5, -0.5,   0.0, 1.0, 0.0,
     0.0,  0.5,   0.0, 0.0, 1.0,
];

/// A single triangle that covers all of clip space.
///
/// Texture coordinates run past `1.0` outside the visible square so that inside it they
/// equal `(ndc + 1) / 2`. One triangle avoids the diagonal seam of a two-triangle quad.
#[rustfmt::skip]
pub const FULLSCREEN_TRIANGLE: [f32; 12] = [
    -1.0, -1.0,   0.0, 0.0,
     3.0, -1.0,   2.0, 0.0,
    -1.0,  3.0,   0.0, 2.0,
];

/// Number of floats per vertex described by `layout`.
pub fn floats_per_vertex(layout: &[VertexAttribute]) -> usize {
    layout
        .iter()
        .map(|attr| match attr.stride {
            0 => attr.components as usize,
            stride => (stride / FLOAT_SIZE) as usize,
        })
        .max()
        .unwrap_or(0)
}

/// A triangle mesh ready for upload: flat `xyz` positions and a `u32` index list.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    positions: Vec<f32>,
    indices: Vec<u32>,
}

impl MeshData {
    /// Validates and wraps raw buffers.
    pub fn new(positions: Vec<f32>, indices: Vec<u32>) -> Result<Self, MeshError> {
        if positions.len() % 3 != 0 {
            return Err(MeshError::RaggedPositions(positions.len()));
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::RaggedIndices(indices.len()));
        }
        if indices.is_empty() {
            return Err(MeshError::Empty);
        }
        let vertex_count = positions.len() / 3;
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }
        Ok(Self { positions, indices })
    }

    /// Builds a mesh from per-face index lists, flattening them in face order.
    pub fn from_faces<F: AsRef<[u32]>>(
        positions: Vec<f32>,
        faces: &[F],
    ) -> Result<Self, MeshError> {
        let indices = faces
            .iter()
            .flat_map(|face| face.as_ref().iter().copied())
            .collect();
        Self::new(positions, indices)
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}
