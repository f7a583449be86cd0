//! The GL-free core of the tutorial renderer. This crate holds everything that can be
//! reasoned about without a live OpenGL driver: the orbit camera, the offscreen surface
//! extent math, mesh and vertex layout data, the per-frame command planner, shader source
//! loading and the configuration file.

pub mod camera;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod shader_source;
pub mod surface;

pub use error::*;
