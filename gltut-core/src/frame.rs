//! Per-frame planning.
//!
//! [`FrameLoop`] turns the current stage, the elapsed time and the window size into a flat
//! list of [`RenderCommand`]s. The list is renderer-agnostic: the binary executes it against
//! OpenGL, tests inspect it directly.

use glam::{Mat4, Vec2};
use serde::{Deserialize, Serialize};

use crate::{
    camera::{CameraMatrices, OrbitCamera},
    surface::{Extent, SurfaceExtent},
};

/// The tutorial stages, in teaching order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Clear the window, nothing else.
    Clear,
    /// Draw an inline vertex-colored triangle.
    Triangle,
    /// Draw the imported mesh straight to the window.
    Mesh,
    /// Draw the mesh offscreen, then show it through a post-process pass.
    PostProcess,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Clear,
        Stage::Triangle,
        Stage::Mesh,
        Stage::PostProcess,
    ];

    /// Stage bound to the number key `digit` (1-based).
    pub fn from_digit(digit: u8) -> Option<Stage> {
        Self::ALL.get((digit as usize).checked_sub(1)?).copied()
    }
}

/// Where draws land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Window,
    Offscreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramSlot {
    /// `assets/shaders/basic`: vertex-colored 2D triangle.
    Basic,
    /// `assets/shaders/mesh`: the 3D mesh with camera matrices.
    Mesh,
    /// `assets/shaders/post`: samples the offscreen surface.
    Post,
}

impl ProgramSlot {
    pub const ALL: [ProgramSlot; 3] = [ProgramSlot::Basic, ProgramSlot::Mesh, ProgramSlot::Post];

    /// Directory name under the shader root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            ProgramSlot::Basic => "basic",
            ProgramSlot::Mesh => "mesh",
            ProgramSlot::Post => "post",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometrySlot {
    Triangle,
    Mesh,
    FullscreenTriangle,
}

/// Element type of an index buffer. Imported meshes always use 32-bit indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    U32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Vec2(Vec2),
    Mat4(Mat4),
}

/// One step of a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    BindTarget(Target),
    Viewport(Extent),
    /// Clears color and depth of the bound target.
    Clear { color: [f32; 4] },
    UseProgram(ProgramSlot),
    BindGeometry(GeometrySlot),
    /// Sets a uniform on the program bound by the last `UseProgram`.
    SetUniform {
        name: &'static str,
        value: UniformValue,
    },
    BindSurfaceTextures { color_unit: u32, depth_unit: u32 },
    UnbindSurfaceTextures { color_unit: u32, depth_unit: u32 },
    /// Indexed triangle draw from the bound geometry.
    DrawElements {
        count: u32,
        index_type: IndexType,
    },
    /// Non-indexed triangle draw from the bound geometry.
    DrawArrays { first: i32, count: i32 },
}

/// Inputs the loop cares about, already translated from the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyPressed(Key),
    CloseRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Digit(u8),
    Other,
}

/// Per-frame values sampled at the top of an iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Seconds since the loop started.
    pub elapsed: f32,
    /// Live window framebuffer size.
    pub framebuffer: Extent,
}

pub const COLOR_UNIT: u32 = 0;
pub const DEPTH_UNIT: u32 = 1;

/// Drives the tutorial: owns the stage and close flag, and plans each frame.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    stage: Stage,
    camera: OrbitCamera,
    surface: SurfaceExtent,
    mesh_index_count: u32,
    clear_color: [f32; 4],
    close_requested: bool,
}

impl FrameLoop {
    pub fn new(
        stage: Stage,
        camera: OrbitCamera,
        surface: SurfaceExtent,
        mesh_index_count: u32,
        clear_color: [f32; 4],
    ) -> Self {
        Self {
            stage,
            camera,
            surface,
            mesh_index_count,
            clear_color,
            close_requested: false,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Checked at the top of every iteration.
    pub fn should_close(&self) -> bool {
        self.close_requested
    }

    /// Applies one input event. Returns `true` when the stage changed.
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::CloseRequested | InputEvent::KeyPressed(Key::Escape) => {
                self.close_requested = true;
                false
            }
            InputEvent::KeyPressed(Key::Digit(digit)) => match Stage::from_digit(digit) {
                Some(stage) if stage != self.stage => {
                    log::info!("switching to stage {stage:?}");
                    self.stage = stage;
                    true
                }
                _ => false,
            },
            InputEvent::KeyPressed(Key::Other) => false,
        }
    }

    /// Commands issued once after all resources exist.
    pub fn setup(&self) -> Vec<RenderCommand> {
        vec![
            RenderCommand::UseProgram(ProgramSlot::Post),
            RenderCommand::SetUniform {
                name: "renderTexture",
                value: UniformValue::Int(COLOR_UNIT as i32),
            },
            RenderCommand::SetUniform {
                name: "depthTexture",
                value: UniformValue::Int(DEPTH_UNIT as i32),
            },
            RenderCommand::SetUniform {
                name: "reverseMaxSize",
                value: UniformValue::Vec2(self.surface.texel_size()),
            },
        ]
    }

    /// Plans one frame. Empty once a close was requested.
    pub fn plan(&self, input: &FrameInput) -> Vec<RenderCommand> {
        let mut commands = Vec::new();
        if self.close_requested {
            return commands;
        }
        match self.stage {
            Stage::Clear => {
                self.begin_window_pass(input.framebuffer, &mut commands);
            }
            Stage::Triangle => {
                self.begin_window_pass(input.framebuffer, &mut commands);
                commands.push(RenderCommand::UseProgram(ProgramSlot::Basic));
                commands.push(RenderCommand::BindGeometry(GeometrySlot::Triangle));
                commands.push(RenderCommand::DrawArrays { first: 0, count: 3 });
            }
            Stage::Mesh => {
                self.begin_window_pass(input.framebuffer, &mut commands);
                self.draw_mesh(input.elapsed, input.framebuffer, &mut commands);
            }
            Stage::PostProcess => {
                self.geometry_pass(input, &mut commands);
                self.post_process_pass(input, &mut commands);
            }
        }
        commands
    }

    /// Pass 1: the mesh into the live region of the offscreen surface.
    ///
    /// The viewport is clamped to capacity; the projection always uses the window's aspect.
    fn geometry_pass(&self, input: &FrameInput, commands: &mut Vec<RenderCommand>) {
        let region = self.surface.live_region(input.framebuffer);
        commands.push(RenderCommand::BindTarget(Target::Offscreen));
        commands.push(RenderCommand::Viewport(region.viewport));
        commands.push(RenderCommand::Clear {
            color: self.clear_color,
        });
        self.draw_mesh(input.elapsed, input.framebuffer, commands);
    }

    /// Pass 2: the surface onto the window through the post program.
    fn post_process_pass(&self, input: &FrameInput, commands: &mut Vec<RenderCommand>) {
        let region = self.surface.live_region(input.framebuffer);
        self.begin_window_pass(input.framebuffer, commands);
        commands.extend([
            RenderCommand::UseProgram(ProgramSlot::Post),
            RenderCommand::BindGeometry(GeometrySlot::FullscreenTriangle),
            RenderCommand::BindSurfaceTextures {
                color_unit: COLOR_UNIT,
                depth_unit: DEPTH_UNIT,
            },
            RenderCommand::SetUniform {
                name: "textureScale",
                value: UniformValue::Vec2(region.scale),
            },
            RenderCommand::DrawArrays { first: 0, count: 3 },
            RenderCommand::UnbindSurfaceTextures {
                color_unit: COLOR_UNIT,
                depth_unit: DEPTH_UNIT,
            },
        ]);
    }

    fn begin_window_pass(&self, framebuffer: Extent, commands: &mut Vec<RenderCommand>) {
        commands.push(RenderCommand::BindTarget(Target::Window));
        commands.push(RenderCommand::Viewport(framebuffer));
        commands.push(RenderCommand::Clear {
            color: self.clear_color,
        });
    }

    fn draw_mesh(&self, elapsed: f32, framebuffer: Extent, commands: &mut Vec<RenderCommand>) {
        let CameraMatrices {
            model,
            view,
            projection,
        } = self.camera.matrices(elapsed, framebuffer);
        commands.extend([
            RenderCommand::UseProgram(ProgramSlot::Mesh),
            RenderCommand::BindGeometry(GeometrySlot::Mesh),
            RenderCommand::SetUniform {
                name: "matModel",
                value: UniformValue::Mat4(model),
            },
            RenderCommand::SetUniform {
                name: "matView",
                value: UniformValue::Mat4(view),
            },
            RenderCommand::SetUniform {
                name: "matProjection",
                value: UniformValue::Mat4(projection),
            },
            RenderCommand::DrawElements {
                count: self.mesh_index_count,
                index_type: IndexType::U32,
            },
        ]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::MeshData;

    fn one_triangle_loop(stage: Stage) -> FrameLoop {
        let mesh = MeshData::from_faces(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            &[[0u32, 1, 2]],
        )
        .unwrap();
        FrameLoop::new(
            stage,
            OrbitCamera::default(),
            SurfaceExtent::default(),
            mesh.index_count() as u32,
            [0.75, 0.75, 0.75, 0.0],
        )
    }

    fn input(width: u32, height: u32) -> FrameInput {
        FrameInput {
            elapsed: 1.5,
            framebuffer: Extent::new(width, height),
        }
    }

    fn planned_projection(commands: &[RenderCommand]) -> Option<Mat4> {
        commands.iter().find_map(|cmd| match cmd {
            RenderCommand::SetUniform {
                name: "matProjection",
                value: UniformValue::Mat4(m),
            } => Some(*m),
            _ => None,
        })
    }

    fn is_draw(cmd: &RenderCommand) -> bool {
        matches!(
            cmd,
            RenderCommand::DrawElements { .. } | RenderCommand::DrawArrays { .. }
        )
    }

    #[test]
    fn geometry_pass_issues_one_indexed_draw_of_three_u32_indices() {
        let commands = one_triangle_loop(Stage::PostProcess).plan(&input(1200, 630));
        let indexed: Vec<_> = commands
            .iter()
            .filter(|cmd| matches!(cmd, RenderCommand::DrawElements { .. }))
            .collect();
        assert_eq!(
            indexed,
            vec![&RenderCommand::DrawElements {
                count: 3,
                index_type: IndexType::U32
            }]
        );
    }

    #[test]
    fn geometry_pass_precedes_post_process_pass() {
        let commands = one_triangle_loop(Stage::PostProcess).plan(&input(1200, 630));
        let targets: Vec<_> = commands
            .iter()
            .enumerate()
            .filter_map(|(i, cmd)| match cmd {
                RenderCommand::BindTarget(target) => Some((i, *target)),
                _ => None,
            })
            .collect();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].1, Target::Offscreen);
        assert_eq!(targets[1].1, Target::Window);

        let indexed = commands
            .iter()
            .position(|cmd| matches!(cmd, RenderCommand::DrawElements { .. }))
            .unwrap();
        let fullscreen = commands
            .iter()
            .position(|cmd| matches!(cmd, RenderCommand::DrawArrays { .. }))
            .unwrap();
        assert!(
            targets[0].0 < indexed && indexed < targets[1].0 && targets[1].0 < fullscreen
        );
    }

    #[test]
    fn offscreen_viewport_is_the_live_region() {
        let commands = one_triangle_loop(Stage::PostProcess).plan(&input(1200, 630));
        assert_eq!(commands[0], RenderCommand::BindTarget(Target::Offscreen));
        assert_eq!(commands[1], RenderCommand::Viewport(Extent::new(1200, 630)));
    }

    #[test]
    fn post_pass_uploads_live_scale() {
        let commands = one_triangle_loop(Stage::PostProcess).plan(&input(1024, 512));
        let scale = commands.iter().find_map(|cmd| match cmd {
            RenderCommand::SetUniform {
                name: "textureScale",
                value: UniformValue::Vec2(scale),
            } => Some(*scale),
            _ => None,
        });
        assert_eq!(scale, Some(Vec2::new(0.25, 0.125)));
    }

    #[test]
    fn post_pass_binds_and_unbinds_surface_around_its_draw() {
        let commands = one_triangle_loop(Stage::PostProcess).plan(&input(800, 600));
        let tail = &commands[commands.len() - 3..];
        let RenderCommand::SetUniform { name, .. } = &tail[0] else {
            panic!("expected a uniform, got {:?}", tail[0]);
        };
        assert_eq!(*name, "textureScale");
        assert_eq!(tail[1], RenderCommand::DrawArrays { first: 0, count: 3 });
        assert_eq!(
            tail[2],
            RenderCommand::UnbindSurfaceTextures {
                color_unit: COLOR_UNIT,
                depth_unit: DEPTH_UNIT
            }
        );
        assert!(commands.contains(&RenderCommand::BindSurfaceTextures {
            color_unit: COLOR_UNIT,
            depth_unit: DEPTH_UNIT
        }));
    }

    #[test]
    fn projection_is_rebuilt_for_each_frame_size() {
        let frame_loop = one_triangle_loop(Stage::Mesh);
        let wide = planned_projection(&frame_loop.plan(&input(1600, 800))).unwrap();
        let square = planned_projection(&frame_loop.plan(&input(800, 800))).unwrap();
        assert_eq!(wide.x_axis.x, 0.5);
        assert_eq!(square.x_axis.x, 1.0);
    }

    #[test]
    fn oversized_window_keeps_its_aspect_in_the_geometry_pass() {
        let commands = one_triangle_loop(Stage::PostProcess).plan(&input(5000, 2000));
        assert_eq!(
            commands[1],
            RenderCommand::Viewport(Extent::new(4096, 2000))
        );
        let projection = planned_projection(&commands).unwrap();
        assert_eq!(projection.x_axis.x, 2000.0 / 5000.0);
    }

    #[test]
    fn planning_follows_the_surface_it_was_given() {
        let surface = SurfaceExtent::new(Extent::new(1024, 512)).unwrap();
        let frame_loop = FrameLoop::new(
            Stage::PostProcess,
            OrbitCamera::default(),
            surface,
            3,
            [0.0; 4],
        );
        assert!(frame_loop.setup().contains(&RenderCommand::SetUniform {
            name: "reverseMaxSize",
            value: UniformValue::Vec2(Vec2::new(1.0 / 1024.0, 1.0 / 512.0)),
        }));
        for (width, height) in [(256, 128), (1024, 512), (2000, 300), (640, 900)] {
            let commands = frame_loop.plan(&input(width, height));
            let live = Extent::new(width.min(1024), height.min(512));
            assert_eq!(commands[1], RenderCommand::Viewport(live));
            assert!(commands.contains(&RenderCommand::SetUniform {
                name: "textureScale",
                value: UniformValue::Vec2(live.as_vec2() / Vec2::new(1024.0, 512.0)),
            }));
        }
        assert_eq!(surface.capacity(), Extent::new(1024, 512));
    }

    #[test]
    fn escape_stops_all_further_draws() {
        let mut frame_loop = one_triangle_loop(Stage::PostProcess);
        assert!(!frame_loop.should_close());
        assert!(frame_loop.plan(&input(1200, 630)).iter().any(is_draw));

        frame_loop.handle_event(InputEvent::KeyPressed(Key::Escape));
        assert!(frame_loop.should_close());
        assert!(frame_loop.plan(&input(1200, 630)).is_empty());
    }

    #[test]
    fn window_close_also_stops_the_loop() {
        let mut frame_loop = one_triangle_loop(Stage::Clear);
        frame_loop.handle_event(InputEvent::CloseRequested);
        assert!(frame_loop.should_close());
    }

    #[test]
    fn digits_switch_stages() {
        let mut frame_loop = one_triangle_loop(Stage::PostProcess);
        assert!(frame_loop.handle_event(InputEvent::KeyPressed(Key::Digit(2))));
        assert_eq!(frame_loop.stage(), Stage::Triangle);
        assert!(!frame_loop.handle_event(InputEvent::KeyPressed(Key::Digit(2))));
        assert!(!frame_loop.handle_event(InputEvent::KeyPressed(Key::Digit(9))));
        assert!(!frame_loop.handle_event(InputEvent::KeyPressed(Key::Digit(0))));
        assert_eq!(frame_loop.stage(), Stage::Triangle);
        assert!(!frame_loop.should_close());
    }

    #[test]
    fn clear_stage_draws_nothing() {
        let commands = one_triangle_loop(Stage::Clear).plan(&input(640, 480));
        assert!(!commands.iter().any(is_draw));
        assert_eq!(commands.len(), 3);
    }

    #[test]
    fn triangle_stage_draws_three_vertices_with_basic_program() {
        let commands = one_triangle_loop(Stage::Triangle).plan(&input(640, 480));
        assert!(commands.contains(&RenderCommand::UseProgram(ProgramSlot::Basic)));
        assert!(commands.contains(&RenderCommand::BindGeometry(GeometrySlot::Triangle)));
        assert_eq!(
            commands.last(),
            Some(&RenderCommand::DrawArrays { first: 0, count: 3 })
        );
    }

    #[test]
    fn mesh_stage_renders_straight_to_window() {
        let commands = one_triangle_loop(Stage::Mesh).plan(&input(640, 480));
        assert!(!commands.contains(&RenderCommand::BindTarget(Target::Offscreen)));
        assert_eq!(commands.iter().filter(|c| is_draw(c)).count(), 1);
    }

    #[test]
    fn setup_wires_samplers_and_texel_size() {
        let commands = one_triangle_loop(Stage::PostProcess).setup();
        assert_eq!(commands[0], RenderCommand::UseProgram(ProgramSlot::Post));
        assert!(commands.contains(&RenderCommand::SetUniform {
            name: "reverseMaxSize",
            value: UniformValue::Vec2(Vec2::splat(1.0 / 4096.0)),
        }));
    }

    #[test]
    fn stage_digits_are_one_based() {
        assert_eq!(Stage::from_digit(1), Some(Stage::Clear));
        assert_eq!(Stage::from_digit(4), Some(Stage::PostProcess));
        assert_eq!(Stage::from_digit(0), None);
        assert_eq!(Stage::from_digit(5), None);
    }
}
