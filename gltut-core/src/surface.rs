//! Sizing of the offscreen render target.
//!
//! The offscreen color and depth textures are allocated once at a fixed capacity. Each frame
//! only the sub-rectangle matching the window's framebuffer is drawn to, and the post-process
//! shader is told which fraction of the texture holds live pixels.

use glam::Vec2;

use crate::error::SurfaceError;

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height, or `1.0` when either side is zero.
    pub fn aspect_ratio(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Component-wise minimum.
    pub fn min(self, other: Extent) -> Extent {
        Extent::new(self.width.min(other.width), self.height.min(other.height))
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

impl From<(u32, u32)> for Extent {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Default offscreen capacity.
pub const DEFAULT_CAPACITY: Extent = Extent::new(4096, 4096);

/// The fixed capacity of an offscreen surface.
///
/// Capacity cannot change after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceExtent {
    capacity: Extent,
}

/// The part of the surface written during one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveRegion {
    /// Viewport for the offscreen pass, anchored at the origin.
    pub viewport: Extent,
    /// `viewport / capacity`, uploaded as `textureScale`.
    pub scale: Vec2,
    /// Size of one texel in texture coordinates.
    pub texel: Vec2,
}

impl SurfaceExtent {
    pub fn new(capacity: Extent) -> Result<Self, SurfaceError> {
        if capacity.width == 0 || capacity.height == 0 {
            return Err(SurfaceError::ZeroCapacity {
                width: capacity.width,
                height: capacity.height,
            });
        }
        Ok(Self { capacity })
    }

    pub fn capacity(&self) -> Extent {
        self.capacity
    }

    /// Reciprocal of the capacity, i.e. the size of one texel (`reverseMaxSize`).
    pub fn texel_size(&self) -> Vec2 {
        Vec2::ONE / self.capacity.as_vec2()
    }

    /// Live region for a window framebuffer of the given size.
    ///
    /// A framebuffer larger than the capacity is clamped to it; the excess is simply not
    /// rendered offscreen and the post pass stretches what was.
    pub fn live_region(&self, framebuffer: Extent) -> LiveRegion {
        let viewport = framebuffer.min(self.capacity);
        LiveRegion {
            viewport,
            scale: viewport.as_vec2() / self.capacity.as_vec2(),
            texel: self.texel_size(),
        }
    }
}

impl Default for SurfaceExtent {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl LiveRegion {
    /// Texture coordinate sampled for a screen coordinate `uv` in `[0, 1]`.
    ///
    /// Must match `assets/shaders/post/frag.glsl`: the coordinate is scaled into the live
    /// region and clamped half a texel short of its far edge, so nearest filtering never
    /// picks a texel outside `[0, scale)`.
    pub fn sample_coord(&self, uv: Vec2) -> Vec2 {
        (uv * self.scale)
            .min(self.scale - self.texel * 0.5)
            .max(Vec2::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_is_rejected() {
        assert_eq!(
            SurfaceExtent::new(Extent::new(0, 16)),
            Err(SurfaceError::ZeroCapacity {
                width: 0,
                height: 16
            })
        );
    }

    #[test]
    fn scale_is_live_size_over_capacity() {
        let surface = SurfaceExtent::default();
        let region = surface.live_region(Extent::new(1200, 630));
        assert_eq!(region.viewport, Extent::new(1200, 630));
        assert_eq!(region.scale, Vec2::new(1200.0 / 4096.0, 630.0 / 4096.0));
    }

    #[test]
    fn framebuffer_larger_than_capacity_is_clamped() {
        let surface = SurfaceExtent::new(Extent::new(1024, 512)).unwrap();
        let region = surface.live_region(Extent::new(1920, 300));
        assert_eq!(region.viewport, Extent::new(1024, 300));
        assert_eq!(region.scale.x, 1.0);
        assert!(region.scale.y < 1.0);
    }

    #[test]
    fn capacity_survives_many_viewport_changes() {
        let surface = SurfaceExtent::new(Extent::new(2048, 1024)).unwrap();
        for size in [(1, 1), (800, 600), (4000, 4000), (0, 0), (1200, 630)] {
            let _ = surface.live_region(size.into());
            assert_eq!(surface.capacity(), Extent::new(2048, 1024));
        }
    }

    #[test]
    fn sampling_stays_inside_the_live_region() {
        let surface = SurfaceExtent::default();
        let region = surface.live_region(Extent::new(1200, 630));
        for i in 0..=64 {
            for j in 0..=64 {
                let uv = Vec2::new(i as f32 / 64.0, j as f32 / 64.0);
                let st = region.sample_coord(uv);
                assert!(st.cmpge(Vec2::ZERO).all(), "{uv:?} -> {st:?}");
                assert!(st.cmplt(region.scale).all(), "{uv:?} -> {st:?}");
            }
        }
    }

    #[test]
    fn last_sample_lands_on_last_live_texel() {
        let surface = SurfaceExtent::new(Extent::new(16, 16)).unwrap();
        let region = surface.live_region(Extent::new(4, 8));
        let st = region.sample_coord(Vec2::ONE);
        let texel = (st * surface.capacity().as_vec2()).floor();
        assert_eq!(texel, Vec2::new(3.0, 7.0));
    }

    #[test]
    fn degenerate_extent_has_unit_aspect() {
        assert_eq!(Extent::new(640, 0).aspect_ratio(), 1.0);
        assert_eq!(Extent::new(0, 630).aspect_ratio(), 1.0);
        assert_eq!(Extent::new(0, 0).aspect_ratio(), 1.0);
        assert_eq!(Extent::new(640, 320).aspect_ratio(), 2.0);
    }
}
