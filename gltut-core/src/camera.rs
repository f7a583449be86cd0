//! The orbiting camera used by the mesh stages.
//!
//! The camera circles the origin at a fixed radius and height in a Z-up world. Its view basis
//! is rebuilt from scratch every frame by Gram-Schmidt, and the projection is rebuilt from the
//! live aspect ratio, so nothing here is cached between frames.

use glam::{Mat4, Vec3, Vec4};

use crate::surface::Extent;

/// World up axis.
pub const WORLD_UP: Vec3 = Vec3::Z;

/// Parameters of a camera orbiting the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    /// Distance from the Z axis.
    pub radius: f32,
    /// Height above the XY plane.
    pub height: f32,
    /// Orbit speed in radians per second.
    pub angular_speed: f32,
    /// When set, the orbit angle ignores elapsed time.
    pub frozen_angle: Option<f32>,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            radius: 2.0,
            height: 0.125,
            angular_speed: 0.125,
            frozen_angle: None,
            z_near: 0.0625,
            z_far: 32.0,
        }
    }
}

/// Orthonormal camera axes. `forward` points from the eye toward the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBasis {
    pub right: Vec3,
    pub up: Vec3,
    pub forward: Vec3,
}

impl ViewBasis {
    /// Builds the basis looking from `position` toward the origin.
    ///
    /// When `position` is parallel to [`WORLD_UP`] the cross product vanishes; +X is used as
    /// the right vector in that case so the basis stays orthonormal.
    pub fn looking_at_origin(position: Vec3) -> Self {
        let forward = (-position).try_normalize().unwrap_or(Vec3::Y);
        let right = forward
            .cross(WORLD_UP)
            .try_normalize()
            .unwrap_or_else(|| forward.any_orthonormal_vector());
        let up = right.cross(forward).normalize();
        Self { right, up, forward }
    }
}

/// The three matrices uploaded to the mesh program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMatrices {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

impl OrbitCamera {
    /// Orbit angle in radians after `elapsed` seconds.
    pub fn angle(&self, elapsed: f32) -> f32 {
        self.frozen_angle.unwrap_or(self.angular_speed * elapsed)
    }

    /// Eye position for a given orbit angle.
    pub fn position(&self, angle: f32) -> Vec3 {
        let (sin, cos) = angle.sin_cos();
        Vec3::new(self.radius * sin, self.radius * cos, self.height)
    }

    /// View matrix: rotate into the (right, up, forward) basis after moving the eye to the origin.
    pub fn view(&self, angle: f32) -> Mat4 {
        let position = self.position(angle);
        let ViewBasis { right, up, forward } = ViewBasis::looking_at_origin(position);
        let rotation = Mat4::from_cols(
            Vec4::new(right.x, up.x, forward.x, 0.0),
            Vec4::new(right.y, up.y, forward.y, 0.0),
            Vec4::new(right.z, up.z, forward.z, 0.0),
            Vec4::W,
        );
        rotation * Mat4::from_translation(-position)
    }

    /// Perspective projection for the given framebuffer size.
    ///
    /// View space looks down +Z, so `w` takes `z` unchanged and the near and far planes land
    /// on -1 and +1 in NDC.
    pub fn projection(&self, framebuffer: Extent) -> Mat4 {
        let aspect = framebuffer.aspect_ratio();
        let (n, f) = (self.z_near, self.z_far);
        Mat4::from_cols(
            Vec4::new(1.0 / aspect, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, (f + n) / (f - n), 1.0),
            Vec4::new(0.0, 0.0, -2.0 * f * n / (f - n), 0.0),
        )
    }

    /// All matrices for one frame.
    pub fn matrices(&self, elapsed: f32, framebuffer: Extent) -> CameraMatrices {
        let angle = self.angle(elapsed);
        CameraMatrices {
            model: Mat4::IDENTITY,
            view: self.view(angle),
            projection: self.projection(framebuffer),
        }
    }
}
