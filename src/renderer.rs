//! Executes planned [`RenderCommand`]s against OpenGL.

use std::{path::Path, sync::Arc};

use glow::HasContext;
use gltut_core::{
    frame::{GeometrySlot, IndexType, ProgramSlot, RenderCommand, Target},
    geometry::{
        FULLSCREEN_LAYOUT, FULLSCREEN_TRIANGLE, MeshData, TRIANGLE_LAYOUT, TUTORIAL_TRIANGLE,
    },
    shader_source::ProgramSources,
    surface::SurfaceExtent,
};

use crate::{
    abs::{Geometry, OffscreenSurface, ShaderProgram},
    error::AppError,
};

pub fn gl_index_type(index_type: IndexType) -> u32 {
    match index_type {
        IndexType::U32 => glow::UNSIGNED_INT,
    }
}

/// Every GL resource a frame can reference, plus the program currently in use.
pub struct Renderer {
    gl: Arc<glow::Context>,
    basic: ShaderProgram,
    mesh_program: ShaderProgram,
    post: ShaderProgram,
    triangle: Geometry,
    mesh: Geometry,
    fullscreen: Geometry,
    surface: OffscreenSurface,
    current: Option<ProgramSlot>,
}

fn build_program(
    gl: &Arc<glow::Context>,
    shader_dir: &Path,
    slot: ProgramSlot,
) -> Result<ShaderProgram, AppError> {
    let sources = ProgramSources::load(shader_dir, slot.dir_name())?;
    let program = ShaderProgram::build(gl, &sources)?;
    log::debug!("built {} program", slot.dir_name());
    Ok(program)
}

impl Renderer {
    /// Builds all programs, uploads all geometry and allocates the offscreen surface.
    pub fn new(
        gl: &Arc<glow::Context>,
        shader_dir: impl AsRef<Path>,
        mesh: &MeshData,
        surface: SurfaceExtent,
    ) -> Result<Self, AppError> {
        let shader_dir = shader_dir.as_ref();
        let basic = build_program(gl, shader_dir, ProgramSlot::Basic)?;
        let mesh_program = build_program(gl, shader_dir, ProgramSlot::Mesh)?;
        let post = build_program(gl, shader_dir, ProgramSlot::Post)?;

        let triangle = Geometry::from_vertices(gl, &basic, &TUTORIAL_TRIANGLE, TRIANGLE_LAYOUT)?;
        let mesh = Geometry::from_mesh(gl, &mesh_program, mesh)?;
        log::debug!(
            "uploaded mesh: {} vertices, {} indices",
            mesh.vertex_count(),
            mesh.index_count()
        );
        let fullscreen =
            Geometry::from_vertices(gl, &post, &FULLSCREEN_TRIANGLE, FULLSCREEN_LAYOUT)?;
        let surface = OffscreenSurface::allocate(gl, surface)?;

        unsafe {
            gl.enable(glow::DEPTH_TEST);
        }

        Ok(Self {
            gl: Arc::clone(gl),
            basic,
            mesh_program,
            post,
            triangle,
            mesh,
            fullscreen,
            surface,
            current: None,
        })
    }

    /// The offscreen target. Its extent is the one every frame is planned against.
    pub fn surface(&self) -> &OffscreenSurface {
        &self.surface
    }

    fn program(&self, slot: ProgramSlot) -> &ShaderProgram {
        match slot {
            ProgramSlot::Basic => &self.basic,
            ProgramSlot::Mesh => &self.mesh_program,
            ProgramSlot::Post => &self.post,
        }
    }

    fn geometry(&self, slot: GeometrySlot) -> &Geometry {
        match slot {
            GeometrySlot::Triangle => &self.triangle,
            GeometrySlot::Mesh => &self.mesh,
            GeometrySlot::FullscreenTriangle => &self.fullscreen,
        }
    }

    /// Runs `commands` in order.
    pub fn submit(&mut self, commands: &[RenderCommand]) {
        for command in commands {
            self.execute(command);
        }
    }

    fn execute(&mut self, command: &RenderCommand) {
        let gl = &self.gl;
        match command {
            RenderCommand::BindTarget(Target::Window) => OffscreenSurface::bind_default(gl),
            RenderCommand::BindTarget(Target::Offscreen) => self.surface.bind_as_target(),
            RenderCommand::Viewport(extent) => unsafe {
                gl.viewport(0, 0, extent.width as i32, extent.height as i32);
            },
            RenderCommand::Clear {
                color: [r, g, b, a],
            } => unsafe {
                gl.clear_color(*r, *g, *b, *a);
                gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
            },
            RenderCommand::UseProgram(slot) => {
                self.program(*slot).use_program();
                self.current = Some(*slot);
            }
            RenderCommand::BindGeometry(slot) => self.geometry(*slot).bind(),
            RenderCommand::SetUniform { name, value } => match self.current {
                Some(slot) => self.program(slot).set_uniform(name, value),
                None => log::warn!("uniform {name} set with no program in use"),
            },
            RenderCommand::BindSurfaceTextures {
                color_unit,
                depth_unit,
            } => self.surface.bind_as_source(*color_unit, *depth_unit),
            RenderCommand::UnbindSurfaceTextures {
                color_unit,
                depth_unit,
            } => OffscreenSurface::unbind_sources(gl, *color_unit, *depth_unit),
            RenderCommand::DrawElements { count, index_type } => unsafe {
                gl.draw_elements(
                    glow::TRIANGLES,
                    *count as i32,
                    gl_index_type(*index_type),
                    0,
                );
            },
            RenderCommand::DrawArrays { first, count } => unsafe {
                gl.draw_arrays(glow::TRIANGLES, *first, *count);
            },
        }
    }
}
