//! Scoped ownership of GL object names.
//!
//! [`Handles`] owns a fixed number of GL objects of one kind and deletes exactly those when
//! dropped. [`Defer`] runs a closure once when it goes out of scope, and is used to restore
//! GL binding state on every exit path.

use std::sync::Arc;

use glow::HasContext;

use crate::error::GlError;

/// A kind of GL object that is created and deleted one name at a time.
///
/// `G` is the context type; the real renderer uses [`glow::Context`].
pub trait HandleKind<G> {
    type Raw: Copy;

    /// Human-readable name for errors and logs.
    const NAME: &'static str;

    /// # Safety
    /// `gl` must be current on this thread.
    unsafe fn create(gl: &G) -> Result<Self::Raw, String>;

    /// # Safety
    /// `gl` must be current on this thread and `raw` must have come from [`Self::create`].
    unsafe fn delete(gl: &G, raw: Self::Raw);
}

macro_rules! gl_handle_kind {
    ($kind:ident, $raw:ty, $name:literal, $create:ident, $delete:ident) => {
        pub struct $kind;

        impl HandleKind<glow::Context> for $kind {
            type Raw = $raw;
            const NAME: &'static str = $name;

            unsafe fn create(gl: &glow::Context) -> Result<Self::Raw, String> {
                unsafe { gl.$create() }
            }

            unsafe fn delete(gl: &glow::Context, raw: Self::Raw) {
                unsafe { gl.$delete(raw) }
            }
        }
    };
}

gl_handle_kind!(
    Buffers,
    glow::Buffer,
    "buffer",
    create_buffer,
    delete_buffer
);
gl_handle_kind!(
    VertexArrays,
    glow::VertexArray,
    "vertex array",
    create_vertex_array,
    delete_vertex_array
);
gl_handle_kind!(
    Textures,
    glow::Texture,
    "texture",
    create_texture,
    delete_texture
);
gl_handle_kind!(
    Framebuffers,
    glow::Framebuffer,
    "framebuffer",
    create_framebuffer,
    delete_framebuffer
);

/// `N` GL objects of kind `K`, deleted together on drop.
pub struct Handles<K, G = glow::Context>
where
    K: HandleKind<G>,
{
    gl: Arc<G>,
    raw: Vec<K::Raw>,
}

impl<K, G> Handles<K, G>
where
    K: HandleKind<G>,
{
    /// Creates `count` objects. If one fails, the ones already created are deleted before
    /// the error is returned.
    pub fn new(gl: &Arc<G>, count: usize) -> Result<Self, GlError> {
        let mut handles = Self {
            gl: Arc::clone(gl),
            raw: Vec::with_capacity(count),
        };
        for _ in 0..count {
            let raw = unsafe { K::create(&handles.gl) }.map_err(|reason| GlError::Create {
                kind: K::NAME,
                reason,
            })?;
            handles.raw.push(raw);
        }
        Ok(handles)
    }

    /// The `index`-th object. Panics when out of range, like slice indexing.
    pub fn get(&self, index: usize) -> K::Raw {
        self.raw[index]
    }
}

impl<K, G> Drop for Handles<K, G>
where
    K: HandleKind<G>,
{
    fn drop(&mut self) {
        for raw in self.raw.drain(..) {
            unsafe { K::delete(&self.gl, raw) };
        }
    }
}

/// Runs a closure exactly once when dropped.
pub struct Defer<F: FnOnce()> {
    action: Option<F>,
}

impl<F: FnOnce()> Defer<F> {
    pub fn new(action: F) -> Self {
        Self {
            action: Some(action),
        }
    }
}

impl<F: FnOnce()> Drop for Defer<F> {
    fn drop(&mut self) {
        if let Some(action) = self.action.take() {
            action();
        }
    }
}

/// Unbinds the vertex array and both buffer targets when dropped.
pub fn unbind_geometry_on_exit(gl: &glow::Context) -> Defer<impl FnOnce() + '_> {
    Defer::new(move || unsafe {
        gl.bind_vertex_array(None);
        gl.bind_buffer(glow::ARRAY_BUFFER, None);
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
    })
}
