//! Narrow contract between the resource/render core and a graphics backend.
//!
//! Object creation is fallible and checked at upload time. Per-frame calls
//! (uniform pushes, state toggles, draws) are fire-and-forget.

#[cfg(feature = "gl")]
mod gl;
mod recording;

#[cfg(feature = "gl")]
pub use gl::*;
pub use recording::*;

use crate::{DeviceError, ImageTarget, PixelFormat, TextureTarget, VertexAttribute};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    Vertex,
    Index,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// Location of a uniform in a linked program; `-1` when the program has no such uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub i32);

impl UniformLocation {
    pub const NOT_FOUND: Self = UniformLocation(-1);

    pub fn is_found(&self) -> bool {
        self.0 >= 0
    }
}

impl Default for UniformLocation {
    fn default() -> Self {
        Self::NOT_FOUND
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    /// Column-major.
    Mat4([f32; 16]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthFunc {
    Less,
    LessEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Front,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonMode {
    Fill,
    Line,
}

/// Render-state toggles. Blending, when enabled, is standard source-alpha blending.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderState {
    DepthTest(bool),
    DepthMask(bool),
    DepthFunc(DepthFunc),
    CullFace(bool),
    CullMode(Face),
    Blend(bool),
    PolygonMode(PolygonMode),
    ClearColour([f32; 4]),
}

/// Graphics backend used by handlers (upload/unload) and renderers (bind/draw).
///
/// All methods take `&self`: a device is driven from the single thread owning its context.
/// Id `0` never names a live object.
pub trait GraphicsDevice {
    /// Creates a vertex array and binds it.
    fn create_vertex_array(&self) -> Result<u32, DeviceError>;
    fn bind_vertex_array(&self, id: u32);
    /// Creates a buffer, binds it to `target` and fills it with `data`.
    fn create_buffer(&self, target: BufferTarget, data: &[u8]) -> Result<u32, DeviceError>;
    /// Describes the bound vertex buffer's layout to the bound vertex array.
    fn set_vertex_layout(&self, stride: usize, attributes: &[VertexAttribute]);
    fn is_vertex_array(&self, id: u32) -> bool;
    fn is_buffer(&self, id: u32) -> bool;
    fn delete_vertex_array(&self, id: u32);
    fn delete_buffer(&self, id: u32);

    /// Creates a texture and binds it to `target`.
    fn create_texture(&self, target: TextureTarget) -> Result<u32, DeviceError>;
    /// Uploads pixels into the texture bound for `target`.
    fn upload_image(
        &self,
        target: ImageTarget,
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: &[u8],
    ) -> Result<(), DeviceError>;
    /// Applies filtering/wrapping to the bound texture, generating mipmaps when asked.
    fn configure_texture(&self, target: TextureTarget, mipmaps: bool);
    /// Binds `id` on texture unit `unit`; `0` unbinds.
    fn bind_texture(&self, unit: u32, target: TextureTarget, id: u32);
    fn is_texture(&self, id: u32) -> bool;
    fn delete_texture(&self, id: u32);

    /// Compiles one stage. On failure the stage object is already released.
    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<u32, DeviceError>;
    /// Links two compiled stages. On failure the program object is already released.
    fn link_program(&self, vertex_shader: u32, fragment_shader: u32) -> Result<u32, DeviceError>;
    fn use_program(&self, program: u32);
    fn is_shader(&self, id: u32) -> bool;
    fn is_program(&self, id: u32) -> bool;
    fn delete_shader(&self, id: u32);
    fn delete_program(&self, id: u32);

    fn uniform_location(&self, program: u32, name: &str) -> UniformLocation;
    /// Writes to a found location of the current program.
    fn write_uniform(&self, location: UniformLocation, value: UniformValue);

    /// Skips locations the program does not have.
    fn set_uniform(&self, location: UniformLocation, value: UniformValue) {
        if location.is_found() {
            self.write_uniform(location, value);
        }
    }

    fn set_state(&self, state: RenderState);
    fn clear(&self, colour: bool, depth: bool);
    /// Draws `index_count` indices as triangles from `vertex_array`.
    fn draw_indexed(&self, vertex_array: u32, index_count: u32);

    /// Reports (and clears) a pending device error.
    fn check_error(&self) -> Result<(), DeviceError>;
}
