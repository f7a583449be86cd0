//! Error types shared by the core and the renderer binary.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading, compiling, linking or validating a shader program.
#[derive(Debug, Error)]
pub enum ShaderError {
    /// A shader source file could not be read.
    #[error("could not open shader source {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A shader stage failed to compile.
    #[error("{stage} shader {} failed to compile:\n{log}", path.display())]
    Compile {
        stage: &'static str,
        path: PathBuf,
        log: String,
    },

    /// The program failed to link.
    #[error("shader program failed to link:\n{log}")]
    Link { log: String },

    /// The program linked but did not pass validation.
    #[error("shader program failed validation:\n{log}")]
    Validate { log: String },

    /// The backend refused to hand out a shader or program object.
    #[error("could not create {what}: {reason}")]
    Create { what: &'static str, reason: String },
}

/// Errors produced while importing or validating mesh data.
#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    /// The importer rejected the asset.
    #[error("could not import mesh {path}: {reason}")]
    Import { path: String, reason: String },

    /// The asset contains no mesh, or the mesh contains no triangles.
    #[error("mesh has no triangles")]
    Empty,

    /// The flat position list is not made of whole 3-component vertices.
    #[error("position buffer length {0} is not a multiple of 3")]
    RaggedPositions(usize),

    /// The index list is not made of whole triangles.
    #[error("index buffer length {0} is not a multiple of 3")]
    RaggedIndices(usize),

    /// An index refers past the end of the vertex list.
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
}

/// Errors produced when describing an offscreen surface.
#[derive(Debug, Error, PartialEq)]
pub enum SurfaceError {
    #[error("offscreen surface capacity must be non-zero, got {width}x{height}")]
    ZeroCapacity { width: u32, height: u32 },
}

/// Errors produced while reading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_the_missing_file() {
        let err = ShaderError::Io {
            path: PathBuf::from("shaders/post/vert.glsl"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let msg = err.to_string();
        assert!(msg.contains("shaders/post/vert.glsl"), "got: {msg}");
    }

    #[test]
    fn compile_error_keeps_the_full_log() {
        let log = "0:1(1): error: ".repeat(400);
        let err = ShaderError::Compile {
            stage: "fragment",
            path: PathBuf::from("frag.glsl"),
            log: log.clone(),
        };
        assert!(err.to_string().ends_with(&log));
    }

    #[test]
    fn index_out_of_range_reports_both_numbers() {
        let msg = MeshError::IndexOutOfRange {
            index: 7,
            vertex_count: 3,
        }
        .to_string();
        assert!(msg.contains('7') && msg.contains('3'), "got: {msg}");
    }

    #[test]
    fn errors_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ShaderError>();
        assert_send_sync::<MeshError>();
        assert_send_sync::<ConfigError>();
    }
}
