use std::cell::RefCell;
use std::collections::HashSet;
use std::num::NonZeroU32;
use std::sync::Arc;

use glow::HasContext;
use log::warn;

use super::{
    BufferTarget, DepthFunc, Face, GraphicsDevice, PolygonMode, RenderState, ShaderStage,
    UniformLocation, UniformValue,
};
use crate::{CubeFace, DeviceError, ImageTarget, PixelFormat, TextureTarget, VertexAttribute};

/// OpenGL backend over a `glow` context.
///
/// Ids handed out are the raw GL names. Live names are tracked here so `is_*`
/// answers without a round trip to the driver.
pub struct GlowDevice {
    gl: Arc<glow::Context>,
    live: RefCell<HashSet<(GlObject, u32)>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum GlObject {
    VertexArray,
    Buffer,
    Texture,
    Shader,
    Program,
}

fn name(id: u32) -> Option<NonZeroU32> {
    NonZeroU32::new(id)
}

fn texture_target(target: TextureTarget) -> u32 {
    match target {
        TextureTarget::Texture2D => glow::TEXTURE_2D,
        TextureTarget::CubeMap => glow::TEXTURE_CUBE_MAP,
    }
}

fn image_target(target: ImageTarget) -> u32 {
    match target {
        ImageTarget::Texture2D => glow::TEXTURE_2D,
        ImageTarget::CubeFace(face) => match face {
            CubeFace::PositiveX => glow::TEXTURE_CUBE_MAP_POSITIVE_X,
            CubeFace::NegativeX => glow::TEXTURE_CUBE_MAP_NEGATIVE_X,
            CubeFace::PositiveY => glow::TEXTURE_CUBE_MAP_POSITIVE_Y,
            CubeFace::NegativeY => glow::TEXTURE_CUBE_MAP_NEGATIVE_Y,
            CubeFace::PositiveZ => glow::TEXTURE_CUBE_MAP_POSITIVE_Z,
            CubeFace::NegativeZ => glow::TEXTURE_CUBE_MAP_NEGATIVE_Z,
        },
    }
}

fn location(location: UniformLocation) -> glow::NativeUniformLocation {
    glow::NativeUniformLocation(location.0 as u32)
}

impl GlowDevice {
    pub fn new(gl: Arc<glow::Context>) -> Self {
        Self {
            gl,
            live: RefCell::new(HashSet::new()),
        }
    }

    pub fn context(&self) -> &glow::Context {
        &self.gl
    }

    fn track(&self, object: GlObject, id: NonZeroU32) -> u32 {
        self.live.borrow_mut().insert((object, id.get()));
        id.get()
    }

    fn untrack(&self, object: GlObject, id: u32) -> Option<NonZeroU32> {
        if self.live.borrow_mut().remove(&(object, id)) {
            name(id)
        } else {
            None
        }
    }

    fn is_live(&self, object: GlObject, id: u32) -> bool {
        self.live.borrow().contains(&(object, id))
    }

    fn toggle(&self, capability: u32, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(capability);
            } else {
                self.gl.disable(capability);
            }
        }
    }
}

impl GraphicsDevice for GlowDevice {
    fn create_vertex_array(&self) -> Result<u32, DeviceError> {
        unsafe {
            let vao = self.gl.create_vertex_array().map_err(DeviceError::new)?;
            self.gl.bind_vertex_array(Some(vao));
            Ok(self.track(GlObject::VertexArray, vao.0))
        }
    }

    fn bind_vertex_array(&self, id: u32) {
        unsafe { self.gl.bind_vertex_array(name(id).map(glow::NativeVertexArray)) }
    }

    fn create_buffer(&self, target: BufferTarget, data: &[u8]) -> Result<u32, DeviceError> {
        let target = match target {
            BufferTarget::Vertex => glow::ARRAY_BUFFER,
            BufferTarget::Index => glow::ELEMENT_ARRAY_BUFFER,
        };
        unsafe {
            let buffer = self.gl.create_buffer().map_err(DeviceError::new)?;
            self.gl.bind_buffer(target, Some(buffer));
            self.gl.buffer_data_u8_slice(target, data, glow::STATIC_DRAW);
            Ok(self.track(GlObject::Buffer, buffer.0))
        }
    }

    fn set_vertex_layout(&self, stride: usize, attributes: &[VertexAttribute]) {
        unsafe {
            for attribute in attributes {
                self.gl.vertex_attrib_pointer_f32(
                    attribute.location,
                    attribute.components,
                    glow::FLOAT,
                    false,
                    stride as i32,
                    attribute.offset as i32,
                );
                self.gl.enable_vertex_attrib_array(attribute.location);
            }
        }
    }

    fn is_vertex_array(&self, id: u32) -> bool {
        self.is_live(GlObject::VertexArray, id)
    }

    fn is_buffer(&self, id: u32) -> bool {
        self.is_live(GlObject::Buffer, id)
    }

    fn delete_vertex_array(&self, id: u32) {
        if let Some(id) = self.untrack(GlObject::VertexArray, id) {
            unsafe { self.gl.delete_vertex_array(glow::NativeVertexArray(id)) }
        }
    }

    fn delete_buffer(&self, id: u32) {
        if let Some(id) = self.untrack(GlObject::Buffer, id) {
            unsafe { self.gl.delete_buffer(glow::NativeBuffer(id)) }
        }
    }

    fn create_texture(&self, target: TextureTarget) -> Result<u32, DeviceError> {
        unsafe {
            let texture = self.gl.create_texture().map_err(DeviceError::new)?;
            self.gl.bind_texture(texture_target(target), Some(texture));
            Ok(self.track(GlObject::Texture, texture.0))
        }
    }

    fn upload_image(
        &self,
        target: ImageTarget,
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: &[u8],
    ) -> Result<(), DeviceError> {
        let format = match format {
            PixelFormat::Rgb8 => glow::RGB,
            PixelFormat::Rgba8 => glow::RGBA,
        };
        unsafe {
            self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            self.gl.tex_image_2d(
                image_target(target),
                0,
                format as i32,
                width as i32,
                height as i32,
                0,
                format,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(pixels)),
            );
        }
        self.check_error()
    }

    fn configure_texture(&self, target: TextureTarget, mipmaps: bool) {
        let target = texture_target(target);
        let wrap = if target == glow::TEXTURE_CUBE_MAP {
            glow::CLAMP_TO_EDGE
        } else {
            glow::REPEAT
        };
        let min_filter = if mipmaps {
            glow::LINEAR_MIPMAP_LINEAR
        } else {
            glow::LINEAR
        };
        unsafe {
            self.gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_S, wrap as i32);
            self.gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_T, wrap as i32);
            if target == glow::TEXTURE_CUBE_MAP {
                self.gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_R, wrap as i32);
            }
            self.gl.tex_parameter_i32(target, glow::TEXTURE_MIN_FILTER, min_filter as i32);
            self.gl.tex_parameter_i32(target, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            if mipmaps {
                self.gl.generate_mipmap(target);
            }
        }
    }

    fn bind_texture(&self, unit: u32, target: TextureTarget, id: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl
                .bind_texture(texture_target(target), name(id).map(glow::NativeTexture));
        }
    }

    fn is_texture(&self, id: u32) -> bool {
        self.is_live(GlObject::Texture, id)
    }

    fn delete_texture(&self, id: u32) {
        if let Some(id) = self.untrack(GlObject::Texture, id) {
            unsafe { self.gl.delete_texture(glow::NativeTexture(id)) }
        }
    }

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<u32, DeviceError> {
        let kind = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe {
            let shader = self.gl.create_shader(kind).map_err(DeviceError::new)?;
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            if !self.gl.get_shader_compile_status(shader) {
                let log = self.gl.get_shader_info_log(shader);
                self.gl.delete_shader(shader);
                return Err(DeviceError::new(log));
            }
            Ok(self.track(GlObject::Shader, shader.0))
        }
    }

    fn link_program(&self, vertex_shader: u32, fragment_shader: u32) -> Result<u32, DeviceError> {
        let (Some(vertex), Some(fragment)) = (name(vertex_shader), name(fragment_shader)) else {
            return Err(DeviceError::new("cannot link a zero shader id"));
        };
        unsafe {
            let program = self.gl.create_program().map_err(DeviceError::new)?;
            self.gl.attach_shader(program, glow::NativeShader(vertex));
            self.gl.attach_shader(program, glow::NativeShader(fragment));
            self.gl.link_program(program);
            if !self.gl.get_program_link_status(program) {
                let log = self.gl.get_program_info_log(program);
                self.gl.delete_program(program);
                return Err(DeviceError::new(log));
            }
            Ok(self.track(GlObject::Program, program.0))
        }
    }

    fn use_program(&self, program: u32) {
        unsafe { self.gl.use_program(name(program).map(glow::NativeProgram)) }
    }

    fn is_shader(&self, id: u32) -> bool {
        self.is_live(GlObject::Shader, id)
    }

    fn is_program(&self, id: u32) -> bool {
        self.is_live(GlObject::Program, id)
    }

    fn delete_shader(&self, id: u32) {
        if let Some(id) = self.untrack(GlObject::Shader, id) {
            unsafe { self.gl.delete_shader(glow::NativeShader(id)) }
        }
    }

    fn delete_program(&self, id: u32) {
        if let Some(id) = self.untrack(GlObject::Program, id) {
            unsafe { self.gl.delete_program(glow::NativeProgram(id)) }
        }
    }

    fn uniform_location(&self, program: u32, uniform: &str) -> UniformLocation {
        let Some(program) = name(program) else {
            return UniformLocation::NOT_FOUND;
        };
        unsafe {
            self.gl
                .get_uniform_location(glow::NativeProgram(program), uniform)
                .map(|location| UniformLocation(location.0 as i32))
                .unwrap_or(UniformLocation::NOT_FOUND)
        }
    }

    fn write_uniform(&self, at: UniformLocation, value: UniformValue) {
        let native = location(at);
        let at = Some(&native);
        unsafe {
            match value {
                UniformValue::Int(x) => self.gl.uniform_1_i32(at, x),
                UniformValue::Float(x) => self.gl.uniform_1_f32(at, x),
                UniformValue::Vec2([x, y]) => self.gl.uniform_2_f32(at, x, y),
                UniformValue::Vec3([x, y, z]) => self.gl.uniform_3_f32(at, x, y, z),
                UniformValue::Vec4([x, y, z, w]) => self.gl.uniform_4_f32(at, x, y, z, w),
                UniformValue::Mat4(columns) => self.gl.uniform_matrix_4_f32_slice(at, false, &columns),
            }
        }
    }

    fn set_state(&self, state: RenderState) {
        unsafe {
            match state {
                RenderState::DepthTest(enabled) => self.toggle(glow::DEPTH_TEST, enabled),
                RenderState::DepthMask(enabled) => self.gl.depth_mask(enabled),
                RenderState::DepthFunc(func) => self.gl.depth_func(match func {
                    DepthFunc::Less => glow::LESS,
                    DepthFunc::LessEqual => glow::LEQUAL,
                }),
                RenderState::CullFace(enabled) => self.toggle(glow::CULL_FACE, enabled),
                RenderState::CullMode(face) => self.gl.cull_face(match face {
                    Face::Front => glow::FRONT,
                    Face::Back => glow::BACK,
                }),
                RenderState::Blend(enabled) => {
                    self.toggle(glow::BLEND, enabled);
                    if enabled {
                        self.gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
                    }
                }
                RenderState::PolygonMode(mode) => self.gl.polygon_mode(
                    glow::FRONT_AND_BACK,
                    match mode {
                        PolygonMode::Fill => glow::FILL,
                        PolygonMode::Line => glow::LINE,
                    },
                ),
                RenderState::ClearColour([r, g, b, a]) => self.gl.clear_color(r, g, b, a),
            }
        }
    }

    fn clear(&self, colour: bool, depth: bool) {
        let mut mask = 0;
        if colour {
            mask |= glow::COLOR_BUFFER_BIT;
        }
        if depth {
            mask |= glow::DEPTH_BUFFER_BIT;
        }
        if mask != 0 {
            unsafe { self.gl.clear(mask) }
        }
    }

    fn draw_indexed(&self, vertex_array: u32, index_count: u32) {
        unsafe {
            self.gl
                .bind_vertex_array(name(vertex_array).map(glow::NativeVertexArray));
            self.gl
                .draw_elements(glow::TRIANGLES, index_count as i32, glow::UNSIGNED_INT, 0);
        }
    }

    fn check_error(&self) -> Result<(), DeviceError> {
        let code = unsafe { self.gl.get_error() };
        if code == glow::NO_ERROR {
            return Ok(());
        }
        warn!("OpenGL error 0x{code:04X}");
        Err(DeviceError::new(format!("OpenGL error 0x{code:04X}")))
    }
}
