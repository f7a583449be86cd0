//! OpenGL Shaders
//!
//! This module defines the [`Shader`] and [`ShaderProgram`] structs for managing OpenGL shaders.
//! This module also provides the [`Uniform`] trait for setting uniform variables in shader
//! programs.

use std::sync::Arc;

use glam::{Mat4, Vec2};
use glow::HasContext;
use gltut_core::{
    ShaderError,
    frame::UniformValue,
    shader_source::{ProgramSources, ShaderKind, ShaderSource},
};

fn gl_stage(kind: ShaderKind) -> u32 {
    match kind {
        ShaderKind::Vertex => glow::VERTEX_SHADER,
        ShaderKind::Fragment => glow::FRAGMENT_SHADER,
    }
}

/// Represents an individual compiled OpenGL shader stage.
pub struct Shader {
    gl: Arc<glow::Context>,
    id: glow::Shader,
}

impl Shader {
    /// Compiles a new shader from the given source.
    pub fn compile(gl: &Arc<glow::Context>, source: &ShaderSource) -> Result<Self, ShaderError> {
        unsafe {
            let id = gl
                .create_shader(gl_stage(source.kind))
                .map_err(|reason| ShaderError::Create {
                    what: "shader",
                    reason,
                })?;
            let shader = Self {
                gl: Arc::clone(gl),
                id,
            };

            gl.shader_source(id, &source.text);
            gl.compile_shader(id);

            if !gl.get_shader_compile_status(id) {
                return Err(ShaderError::Compile {
                    stage: source.kind.name(),
                    path: source.path.clone(),
                    log: gl.get_shader_info_log(id),
                });
            }

            log::debug!(
                "compiled {} shader {}",
                source.kind.name(),
                source.path.display()
            );
            Ok(shader)
        }
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_shader(self.id);
        }
    }
}

/// Represents a uniform variable in a shader program.
pub trait Uniform {
    /// Sets the value of the uniform at `location`.
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation);
}

impl Uniform for i32 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_1_i32(Some(location), *self);
        }
    }
}

impl Uniform for f32 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_1_f32(Some(location), *self);
        }
    }
}

impl Uniform for Vec2 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_2_f32(Some(location), self.x, self.y);
        }
    }
}

impl Uniform for Mat4 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_matrix_4_f32_slice(Some(location), false, self.as_ref());
        }
    }
}

impl Uniform for UniformValue {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        match self {
            UniformValue::Int(v) => v.set_uniform(gl, location),
            UniformValue::Vec2(v) => v.set_uniform(gl, location),
            UniformValue::Mat4(v) => v.set_uniform(gl, location),
        }
    }
}

impl<T: Uniform> Uniform for &T {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        (*self).set_uniform(gl, location);
    }
}

/// Represents a linked and validated OpenGL shader program.
pub struct ShaderProgram {
    gl: Arc<glow::Context>,
    id: glow::Program,
}

impl ShaderProgram {
    /// Compiles, links and validates a program. The stage objects live only for this call.
    pub fn build(gl: &Arc<glow::Context>, sources: &ProgramSources) -> Result<Self, ShaderError> {
        let vert = Shader::compile(gl, &sources.vertex)?;
        let frag = Shader::compile(gl, &sources.fragment)?;
        Self::link(gl, &[&vert, &frag])
    }

    /// Links a new shader program from the given shaders and validates it.
    pub fn link(gl: &Arc<glow::Context>, shaders: &[&Shader]) -> Result<Self, ShaderError> {
        unsafe {
            let id = gl.create_program().map_err(|reason| ShaderError::Create {
                what: "program",
                reason,
            })?;
            let program = Self {
                gl: Arc::clone(gl),
                id,
            };

            for shader in shaders {
                gl.attach_shader(id, shader.id);
            }

            gl.link_program(id);

            for shader in shaders {
                gl.detach_shader(id, shader.id);
            }

            if !gl.get_program_link_status(id) {
                return Err(ShaderError::Link {
                    log: gl.get_program_info_log(id),
                });
            }

            gl.validate_program(id);
            if !gl.get_program_validate_status(id) {
                return Err(ShaderError::Validate {
                    log: gl.get_program_info_log(id),
                });
            }

            Ok(program)
        }
    }

    /// Binds the shader program for use.
    pub fn use_program(&self) {
        unsafe {
            self.gl.use_program(Some(self.id));
        }
    }

    /// Slot of an active vertex attribute, or `None` if the program has no such input.
    pub fn attrib_location(&self, name: &str) -> Option<u32> {
        unsafe { self.gl.get_attrib_location(self.id, name) }
    }

    /// Location of an active uniform, or `None` if the program has no such uniform.
    pub fn uniform_location(&self, name: &str) -> Option<glow::UniformLocation> {
        unsafe { self.gl.get_uniform_location(self.id, name) }
    }

    /// Sets a uniform variable in the shader program. The program must be in use.
    ///
    /// Names the program does not declare (or that the compiler optimized away) are skipped.
    pub fn set_uniform<T: Uniform>(&self, name: &str, value: T) {
        match self.uniform_location(name) {
            Some(location) => value.set_uniform(&self.gl, &location),
            None => log::trace!("uniform {name} not active, skipped"),
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.id);
        }
    }
}
