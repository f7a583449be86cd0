//! Geometry management module.
//!
//! This module defines the [`Geometry`] struct, which owns one vertex array object and the
//! vertex and index buffers it reads from. Attribute slots are resolved by name against a
//! [`ShaderProgram`] and described with [`VertexAttribute`] layouts.

use std::sync::Arc;

use glow::HasContext;
use gltut_core::geometry::{MESH_LAYOUT, MeshData, VertexAttribute};

use crate::abs::{
    ShaderProgram,
    handles::{Buffers, Handles, VertexArrays, unbind_geometry_on_exit},
};
use crate::error::GlError;

const VERTEX_BUFFER: usize = 0;
const INDEX_BUFFER: usize = 1;

/// Vertex data resident on the GPU, plus the vertex array describing it.
pub struct Geometry {
    gl: Arc<glow::Context>,
    vao: Handles<VertexArrays>,
    buffers: Handles<Buffers>,
    vertex_count: usize,
    index_count: usize,
}

impl Geometry {
    /// Creates an empty vertex array with a vertex and an index buffer.
    pub fn new(gl: &Arc<glow::Context>) -> Result<Self, GlError> {
        Ok(Self {
            gl: Arc::clone(gl),
            vao: Handles::new(gl, 1)?,
            buffers: Handles::new(gl, 2)?,
            vertex_count: 0,
            index_count: 0,
        })
    }

    /// Uploads an imported mesh and binds its positions to `program`.
    pub fn from_mesh(
        gl: &Arc<glow::Context>,
        program: &ShaderProgram,
        mesh: &MeshData,
    ) -> Result<Self, GlError> {
        let mut geometry = Self::new(gl)?;
        geometry.upload_vertices(mesh.positions(), 3);
        geometry.upload_indices(mesh.indices());
        geometry.describe_layout(program, MESH_LAYOUT);
        Ok(geometry)
    }

    /// Uploads inline, non-indexed vertices laid out as `layout`.
    pub fn from_vertices(
        gl: &Arc<glow::Context>,
        program: &ShaderProgram,
        vertices: &[f32],
        layout: &[VertexAttribute],
    ) -> Result<Self, GlError> {
        let floats_per_vertex = gltut_core::geometry::floats_per_vertex(layout);
        let mut geometry = Self::new(gl)?;
        geometry.upload_vertices(vertices, floats_per_vertex);
        geometry.describe_layout(program, layout);
        Ok(geometry)
    }

    /// Replaces the whole vertex buffer.
    pub fn upload_vertices(&mut self, data: &[f32], floats_per_vertex: usize) {
        let _unbind = unbind_geometry_on_exit(&self.gl);
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao.get(0)));
            self.gl
                .bind_buffer(glow::ARRAY_BUFFER, Some(self.buffers.get(VERTEX_BUFFER)));
            self.gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(data),
                glow::STATIC_DRAW,
            );
        }
        self.vertex_count = data.len() / floats_per_vertex.max(1);
    }

    /// Replaces the whole index buffer. The binding is recorded in the vertex array.
    pub fn upload_indices(&mut self, data: &[u32]) {
        let _unbind = unbind_geometry_on_exit(&self.gl);
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao.get(0)));
            self.gl.bind_buffer(
                glow::ELEMENT_ARRAY_BUFFER,
                Some(self.buffers.get(INDEX_BUFFER)),
            );
            self.gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(data),
                glow::STATIC_DRAW,
            );
        }
        self.index_count = data.len();
    }

    /// Points the program's `attribute.name` input at the vertex buffer.
    ///
    /// A name the program does not have (never declared, or optimized out) is not an error:
    /// it is logged and skipped, and `false` is returned.
    pub fn describe_attribute(&self, program: &ShaderProgram, attribute: &VertexAttribute) -> bool {
        let Some(location) = program.attrib_location(attribute.name) else {
            log::warn!(
                "attribute {} not found in program, skipping",
                attribute.name
            );
            return false;
        };

        let _unbind = unbind_geometry_on_exit(&self.gl);
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao.get(0)));
            self.gl
                .bind_buffer(glow::ARRAY_BUFFER, Some(self.buffers.get(VERTEX_BUFFER)));
            self.gl.enable_vertex_attrib_array(location);
            self.gl.vertex_attrib_pointer_f32(
                location,
                attribute.components,
                glow::FLOAT,
                false,
                attribute.stride,
                attribute.offset,
            );
        }
        true
    }

    /// Describes every attribute in `layout`. Returns how many were bound.
    pub fn describe_layout(&self, program: &ShaderProgram, layout: &[VertexAttribute]) -> usize {
        layout
            .iter()
            .filter(|attribute| self.describe_attribute(program, attribute))
            .count()
    }

    /// Binds the vertex array for drawing.
    pub fn bind(&self) {
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao.get(0)));
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Returns the amount of indices used in the geometry.
    pub fn index_count(&self) -> usize {
        self.index_count
    }
}
