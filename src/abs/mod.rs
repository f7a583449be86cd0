//! Thin owners of SDL2 and OpenGL state.
//!
//! Everything here holds a GL object or the window. Frame logic lives in `gltut_core`.

pub mod app;
pub mod debug;
pub mod framebuffer;
pub mod handles;
pub mod mesh;
pub mod shader;

pub use app::*;
pub use framebuffer::*;
pub use mesh::*;
pub use shader::*;
