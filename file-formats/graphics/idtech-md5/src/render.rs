//! Seams between the animation runtime and a rendering backend.
//!
//! The runtime never talks to a graphics API. Backends implement these
//! traits and the model pushes its per-tick state through them: texture
//! handles for mesh shaders, a joint matrix palette for GPU skinning,
//! and plain named uniforms for everything else.

/// Resolves mesh shader names to backend texture handles.
///
/// Called once per mesh when textures are (re)bound; implementations are
/// free to load lazily and cache.
pub trait TextureLookup {
    /// Backend texture handle
    type Handle;

    /// Returns the handle for a diffuse map name, or `None` when the
    /// backend has no such texture
    fn texture(&mut self, name: &str) -> Option<Self::Handle>;
}

/// Receives the joint matrix palette once per tick
pub trait MatrixSink {
    /// Replaces the palette, 16 column-major floats per joint
    fn write_matrices(&mut self, matrices: &[f32]);
}

/// A plain float buffer works as a palette destination
impl MatrixSink for Vec<f32> {
    fn write_matrices(&mut self, matrices: &[f32]) {
        self.clear();
        self.extend_from_slice(matrices);
    }
}

/// Receives named shader uniform values
pub trait UniformSink {
    /// Sets a float-vector uniform by name
    fn set_uniform(&mut self, name: &str, value: &[f32]);
}
