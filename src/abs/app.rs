//! SDL2 and OpenGL application management.
//!
//! This module defines the [`App`] struct which encapsulates the SDL2
//! and OpenGL context necessary for creating a windowed application.

use std::sync::Arc;

use glow::HasContext;
use gltut_core::{config::WindowConfig, surface::Extent};

use crate::{abs::debug, error::InitError};

/// The [`App`] struct encapsulates the SDL2 and OpenGL context.
pub struct App {
    pub sdl: sdl2::Sdl,
    pub video_subsystem: sdl2::VideoSubsystem,
    pub window: sdl2::video::Window,
    pub gl_context: sdl2::video::GLContext,
    pub gl: Arc<glow::Context>,
    pub event_pump: sdl2::EventPump,
}

impl App {
    /// Creates a fixed-size window with a GL 3.3 core debug context.
    pub fn new(config: &WindowConfig) -> Result<Self, InitError> {
        let sdl = sdl2::init().map_err(InitError::Sdl)?;
        let video_subsystem = sdl.video().map_err(InitError::Video)?;
        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(3, 3);
        gl_attr.set_context_flags().debug().set();
        gl_attr.set_depth_size(24);
        gl_attr.set_double_buffer(true);

        let window = video_subsystem
            .window(&config.title, config.width, config.height)
            .opengl()
            .build()?;
        let gl_context = window.gl_create_context().map_err(InitError::Context)?;
        window
            .gl_make_current(&gl_context)
            .map_err(InitError::MakeCurrent)?;

        let interval = if config.vsync {
            sdl2::video::SwapInterval::VSync
        } else {
            sdl2::video::SwapInterval::Immediate
        };
        if let Err(err) = video_subsystem.gl_set_swap_interval(interval) {
            log::warn!("could not set swap interval: {err}");
        }

        let mut gl = unsafe {
            glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            })
        };
        log::info!(
            "GL {:?} on a {}x{} window",
            gl.version(),
            config.width,
            config.height
        );
        debug::install(&mut gl);

        let event_pump = sdl.event_pump().map_err(InitError::EventPump)?;
        let gl = Arc::new(gl);

        Ok(Self {
            sdl,
            video_subsystem,
            window,
            gl_context,
            gl,
            event_pump,
        })
    }

    /// Size of the window's drawable surface in pixels.
    pub fn framebuffer_size(&self) -> Extent {
        self.window.drawable_size().into()
    }

    /// Presents the back buffer. Blocks on vsync when enabled.
    pub fn present(&self) {
        self.window.gl_swap_window();
    }
}
