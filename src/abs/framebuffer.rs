//! Module to work with the offscreen render target.
//!
//! [`OffscreenSurface`] owns a color texture, a depth texture and the framebuffer that
//! attaches them. It is allocated once at a fixed capacity; each frame draws into the live
//! sub-rectangle described by [`gltut_core::surface::LiveRegion`].

use std::sync::Arc;

use glow::HasContext;
use gltut_core::surface::{Extent, SurfaceExtent};

use crate::abs::handles::{Defer, Framebuffers, Handles, Textures};
use crate::error::GlError;

const COLOR: usize = 0;
const DEPTH: usize = 1;

/// Color + depth textures behind one framebuffer.
pub struct OffscreenSurface {
    gl: Arc<glow::Context>,
    extent: SurfaceExtent,
    textures: Handles<Textures>,
    framebuffer: Handles<Framebuffers>,
}

/// Allocates storage for the currently bound 2D texture with pixel-exact sampling.
unsafe fn allocate_texture(
    gl: &glow::Context,
    extent: &SurfaceExtent,
    internal_format: u32,
    format: u32,
    ty: u32,
) {
    let capacity = extent.capacity();
    unsafe {
        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            internal_format as i32,
            capacity.width as i32,
            capacity.height as i32,
            0,
            format,
            ty,
            glow::PixelUnpackData::Slice(None),
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_S,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_T,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MIN_FILTER,
            glow::NEAREST as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MAG_FILTER,
            glow::NEAREST as i32,
        );
    }
}

/// Rejects a capacity the driver cannot allocate as a single texture.
fn check_capacity(capacity: Extent, max: i32) -> Result<(), GlError> {
    if i64::from(capacity.width) > i64::from(max) || i64::from(capacity.height) > i64::from(max) {
        return Err(GlError::TooLarge {
            width: capacity.width,
            height: capacity.height,
            max,
        });
    }
    Ok(())
}

impl OffscreenSurface {
    /// Allocates both textures at the extent's capacity and attaches them to a new framebuffer.
    pub fn allocate(gl: &Arc<glow::Context>, extent: SurfaceExtent) -> Result<Self, GlError> {
        let capacity = extent.capacity();
        let max = unsafe { gl.get_parameter_i32(glow::MAX_TEXTURE_SIZE) };
        check_capacity(capacity, max)?;

        let textures = Handles::<Textures>::new(gl, 2)?;
        let framebuffer = Handles::<Framebuffers>::new(gl, 1)?;

        let _restore = Defer::new(|| unsafe {
            gl.bind_texture(glow::TEXTURE_2D, None);
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        });

        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(textures.get(COLOR)));
            allocate_texture(gl, &extent, glow::RGB8, glow::RGB, glow::UNSIGNED_BYTE);

            gl.bind_texture(glow::TEXTURE_2D, Some(textures.get(DEPTH)));
            allocate_texture(
                gl,
                &extent,
                glow::DEPTH_COMPONENT32F,
                glow::DEPTH_COMPONENT,
                glow::FLOAT,
            );
            gl.bind_texture(glow::TEXTURE_2D, None);

            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(framebuffer.get(0)));
            gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(textures.get(COLOR)),
                0,
            );
            gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::DEPTH_ATTACHMENT,
                glow::TEXTURE_2D,
                Some(textures.get(DEPTH)),
                0,
            );
            gl.draw_buffers(&[glow::COLOR_ATTACHMENT0]);

            let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
            if status != glow::FRAMEBUFFER_COMPLETE {
                return Err(GlError::IncompleteFramebuffer(status));
            }
        }

        log::info!(
            "allocated offscreen surface {}x{}",
            capacity.width,
            capacity.height
        );

        Ok(Self {
            gl: Arc::clone(gl),
            extent,
            textures,
            framebuffer,
        })
    }

    /// The capacity fixed at allocation. Frames are planned against this same value.
    pub fn extent(&self) -> SurfaceExtent {
        self.extent
    }

    /// Makes the surface the draw target.
    pub fn bind_as_target(&self) {
        unsafe {
            self.gl
                .bind_framebuffer(glow::FRAMEBUFFER, Some(self.framebuffer.get(0)));
        }
    }

    /// Reverts to the window's default framebuffer.
    pub fn bind_default(gl: &glow::Context) {
        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        }
    }

    /// Binds the color and depth textures to two texture units for sampling.
    pub fn bind_as_source(&self, color_unit: u32, depth_unit: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + color_unit);
            self.gl
                .bind_texture(glow::TEXTURE_2D, Some(self.textures.get(COLOR)));
            self.gl.active_texture(glow::TEXTURE0 + depth_unit);
            self.gl
                .bind_texture(glow::TEXTURE_2D, Some(self.textures.get(DEPTH)));
            self.gl.active_texture(glow::TEXTURE0);
        }
    }

    /// Clears both texture units and leaves unit 0 active.
    pub fn unbind_sources(gl: &glow::Context, color_unit: u32, depth_unit: u32) {
        unsafe {
            for unit in [depth_unit, color_unit] {
                gl.active_texture(glow::TEXTURE0 + unit);
                gl.bind_texture(glow::TEXTURE_2D, None);
            }
            gl.active_texture(glow::TEXTURE0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_up_to_the_driver_limit_is_accepted() {
        assert_eq!(check_capacity(Extent::new(4096, 4096), 4096), Ok(()));
        assert_eq!(check_capacity(Extent::new(1, 4096), 8192), Ok(()));
    }

    #[test]
    fn capacity_beyond_the_driver_limit_is_too_large() {
        assert_eq!(
            check_capacity(Extent::new(4096, 8192), 4096),
            Err(GlError::TooLarge {
                width: 4096,
                height: 8192,
                max: 4096
            })
        );
    }
}
