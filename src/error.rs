//! Errors raised by the binary, and the process exit status each maps to.

use gltut_core::{ConfigError, MeshError, ShaderError, SurfaceError};
use thiserror::Error;

/// Failures while bringing up the window and GL context. Each site has its own exit status.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("could not initialize SDL: {0}")]
    Sdl(String),
    #[error("could not initialize the SDL video subsystem: {0}")]
    Video(String),
    #[error("could not create window: {0}")]
    Window(#[from] sdl2::video::WindowBuildError),
    #[error("could not create GL context: {0}")]
    Context(String),
    #[error("could not make GL context current: {0}")]
    MakeCurrent(String),
    #[error("could not create event pump: {0}")]
    EventPump(String),
}

impl InitError {
    pub fn exit_code(&self) -> i32 {
        match self {
            InitError::Sdl(_) => 1,
            InitError::Video(_) => 2,
            InitError::Window(_) => 3,
            InitError::Context(_) => 4,
            InitError::MakeCurrent(_) => 5,
            InitError::EventPump(_) => 6,
        }
    }
}

/// Failures creating or completing GL objects other than shaders.
#[derive(Debug, Error, PartialEq)]
pub enum GlError {
    #[error("could not create {kind}: {reason}")]
    Create { kind: &'static str, reason: String },
    #[error("offscreen surface {width}x{height} exceeds GL_MAX_TEXTURE_SIZE {max}")]
    TooLarge { width: u32, height: u32, max: i32 },
    #[error("offscreen framebuffer is incomplete (status 0x{0:X})")]
    IncompleteFramebuffer(u32),
}

/// Everything that can end the program early.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Init(#[from] InitError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not install logger: {0}")]
    Logging(String),
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error(transparent)]
    Gl(#[from] GlError),
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Init(err) => err.exit_code(),
            AppError::Config(_) => 10,
            AppError::Logging(_) => 11,
            AppError::Shader(_) => 12,
            AppError::Mesh(_) => 13,
            AppError::Surface(_) => 14,
            AppError::Gl(_) => 15,
        }
    }
}
