//! Loading of GLSL source files.
//!
//! Sources are read completely before any GL object exists, so a missing file can never
//! leave a half-built program behind.

use std::path::{Path, PathBuf};

use crate::error::ShaderError;

/// The pipeline stage a source file is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    Vertex,
    Fragment,
}

impl ShaderKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShaderKind::Vertex => "vertex",
            ShaderKind::Fragment => "fragment",
        }
    }

    /// File name used inside a program directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            ShaderKind::Vertex => "vert.glsl",
            ShaderKind::Fragment => "frag.glsl",
        }
    }
}

/// The full text of one shader stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub kind: ShaderKind,
    pub path: PathBuf,
    pub text: String,
}

impl ShaderSource {
    /// Reads the whole file at `path`.
    pub fn load(kind: ShaderKind, path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let path = path.as_ref().to_path_buf();
        let text = std::fs::read_to_string(&path).map_err(|source| ShaderError::Io {
            path: path.clone(),
            source,
        })?;
        log::debug!(
            "loaded {} shader {} ({} bytes)",
            kind.name(),
            path.display(),
            text.len()
        );
        Ok(Self { kind, path, text })
    }
}

/// Both stages of one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSources {
    pub vertex: ShaderSource,
    pub fragment: ShaderSource,
}

impl ProgramSources {
    pub fn from_files(
        vertex: impl AsRef<Path>,
        fragment: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        Ok(Self {
            vertex: ShaderSource::load(ShaderKind::Vertex, vertex)?,
            fragment: ShaderSource::load(ShaderKind::Fragment, fragment)?,
        })
    }

    /// Loads `<dir>/<name>/vert.glsl` and `<dir>/<name>/frag.glsl`.
    pub fn load(dir: impl AsRef<Path>, name: &str) -> Result<Self, ShaderError> {
        let program_dir = dir.as_ref().join(name);
        Self::from_files(
            program_dir.join(ShaderKind::Vertex.file_name()),
            program_dir.join(ShaderKind::Fragment.file_name()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ShaderSource::load(ShaderKind::Vertex, "does/not/exist.glsl").unwrap_err();
        match err {
            ShaderError::Io { path, source } => {
                assert_eq!(path, PathBuf::from("does/not/exist.glsl"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn reads_the_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("long.glsl");
        let text = format!("#version 330 core\n{}", "// padding\n".repeat(1000));
        std::fs::write(&path, &text).unwrap();

        let source = ShaderSource::load(ShaderKind::Fragment, &path).unwrap();
        assert_eq!(source.text, text);
        assert_eq!(source.kind, ShaderKind::Fragment);
    }

    #[test]
    fn program_directory_layout() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("post")).unwrap();
        std::fs::write(dir.path().join("post/vert.glsl"), "vertex").unwrap();
        std::fs::write(dir.path().join("post/frag.glsl"), "fragment").unwrap();

        let sources = ProgramSources::load(dir.path(), "post").unwrap();
        assert_eq!(sources.vertex.text, "vertex");
        assert_eq!(sources.fragment.text, "fragment");
    }

    #[test]
    fn missing_fragment_stage_fails_the_pair() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("mesh")).unwrap();
        std::fs::write(dir.path().join("mesh/vert.glsl"), "vertex").unwrap();

        let err = ProgramSources::load(dir.path(), "mesh").unwrap_err();
        assert!(matches!(err, ShaderError::Io { ref path, .. } if path.ends_with("frag.glsl")));
    }

    #[test]
    fn scratch_sources_are_removed_after_a_failed_check() {
        let mut scratch = None;
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("vert.glsl");
            std::fs::write(&path, "vertex").unwrap();
            scratch = Some(dir.path().to_path_buf());
            let source = ShaderSource::load(ShaderKind::Vertex, &path).unwrap();
            assert_eq!(source.text, "fragment");
        }));
        assert!(outcome.is_err());
        let scratch = scratch.unwrap();
        assert!(!scratch.exists(), "{} left behind", scratch.display());
    }
}
