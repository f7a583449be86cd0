//! Configuration file.
//!
//! Every section has defaults, so an empty object (or no file at all) gives the stock
//! tutorial: a 1200x630 window running the post-process stage over `assets/scene.obj`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    camera::OrbitCamera,
    error::{ConfigError, SurfaceError},
    frame::Stage,
    surface::{DEFAULT_CAPACITY, Extent, SurfaceExtent},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub surface: SurfaceConfig,
    pub camera: CameraConfig,
    pub stage: Stage,
    pub clear_color: [f32; 4],
    pub assets: AssetConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            surface: SurfaceConfig::default(),
            camera: CameraConfig::default(),
            stage: Stage::PostProcess,
            clear_color: [0.75, 0.75, 0.75, 0.0],
            assets: AssetConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "OpenGL Tutorial".to_string(),
            width: 1200,
            height: 630,
            vsync: true,
        }
    }
}

/// Capacity of the offscreen render target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CAPACITY.width,
            height: DEFAULT_CAPACITY.height,
        }
    }
}

impl SurfaceConfig {
    pub fn extent(&self) -> Result<SurfaceExtent, SurfaceError> {
        SurfaceExtent::new(Extent::new(self.width, self.height))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub radius: f32,
    pub height: f32,
    pub angular_speed: f32,
    pub frozen_angle: Option<f32>,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        OrbitCamera::default().into()
    }
}

impl From<OrbitCamera> for CameraConfig {
    fn from(camera: OrbitCamera) -> Self {
        Self {
            radius: camera.radius,
            height: camera.height,
            angular_speed: camera.angular_speed,
            frozen_angle: camera.frozen_angle,
            z_near: camera.z_near,
            z_far: camera.z_far,
        }
    }
}

impl From<CameraConfig> for OrbitCamera {
    fn from(config: CameraConfig) -> Self {
        Self {
            radius: config.radius,
            height: config.height,
            angular_speed: config.angular_speed,
            frozen_angle: config.frozen_angle,
            z_near: config.z_near,
            z_far: config.z_far,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// OBJ file; only its first mesh is drawn.
    pub scene: PathBuf,
    /// Directory holding one sub-directory per program with `vert.glsl` and `frag.glsl`.
    pub shader_dir: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            scene: PathBuf::from("assets/scene.obj"),
            shader_dir: PathBuf::from("assets/shaders"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// A `log::LevelFilter` name such as `"info"` or `"debug"`.
    pub level: String,
    /// Optional file that receives a copy of every log line.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Loads the first candidate that exists, or returns the defaults when none do.
    ///
    /// Returns the path that was used, if any.
    pub fn load_first<P: AsRef<Path>>(
        candidates: &[P],
    ) -> Result<(Self, Option<PathBuf>), ConfigError> {
        for candidate in candidates {
            let path = candidate.as_ref();
            if path.is_file() {
                return Ok((Self::load(path)?, Some(path.to_path_buf())));
            }
        }
        Ok((Self::default(), None))
    }
}
