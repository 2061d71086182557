//! Headless backend. Allocates ids, tracks live objects and records every call.
//!
//! Backend headless : alloue des ids, suit les objets vivants et enregistre chaque appel.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use log::trace;

use super::{BufferTarget, GraphicsDevice, RenderState, ShaderStage, UniformLocation, UniformValue};
use crate::{DeviceError, ImageTarget, PixelFormat, TextureTarget, VertexAttribute};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    VertexArray,
    Buffer,
    Texture,
    Shader,
    Program,
}

/// Operations that can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    CreateVertexArray,
    CreateBuffer,
    CreateTexture,
    UploadImage,
    Compile(ShaderStage),
    Link,
    CheckError,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    Create { kind: ObjectKind, id: u32 },
    Delete { kind: ObjectKind, id: u32 },
    BindVertexArray(u32),
    SetVertexLayout { stride: usize, attributes: usize },
    UploadImage { target: ImageTarget, width: u32, height: u32, format: PixelFormat },
    ConfigureTexture { target: TextureTarget, mipmaps: bool },
    BindTexture { unit: u32, target: TextureTarget, id: u32 },
    UseProgram(u32),
    QueryUniform(String),
    SetUniform { name: String, value: UniformValue },
    SetState(RenderState),
    Clear { colour: bool, depth: bool },
    DrawIndexed { vertex_array: u32, index_count: u32 },
}

#[derive(Default)]
pub struct RecordingDevice {
    next_id: Cell<u32>,
    live: RefCell<HashMap<u32, ObjectKind>>,
    calls: RefCell<Vec<DeviceCall>>,
    failures: RefCell<HashSet<FailPoint>>,
    missing_uniforms: RefCell<HashSet<String>>,
    locations: RefCell<Vec<String>>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later call of `point` fail until [`RecordingDevice::clear_failures`].
    pub fn fail_on(&self, point: FailPoint) {
        self.failures.borrow_mut().insert(point);
    }

    pub fn clear_failures(&self) {
        self.failures.borrow_mut().clear();
    }

    /// Pretends linked programs have no uniform called `name`.
    pub fn hide_uniform(&self, name: &str) {
        self.missing_uniforms.borrow_mut().insert(name.to_string());
    }

    pub fn calls(&self) -> Vec<DeviceCall> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Vertex arrays drawn so far, in submission order.
    pub fn draws(&self) -> Vec<u32> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                DeviceCall::DrawIndexed { vertex_array, .. } => Some(*vertex_array),
                _ => None,
            })
            .collect()
    }

    /// Last value written to the uniform `name`.
    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.calls.borrow().iter().rev().find_map(|call| match call {
            DeviceCall::SetUniform { name: written, value } if written == name => Some(*value),
            _ => None,
        })
    }

    pub fn live_count(&self) -> usize {
        self.live.borrow().len()
    }

    pub fn live_count_of(&self, kind: ObjectKind) -> usize {
        self.live.borrow().values().filter(|live| **live == kind).count()
    }

    fn record(&self, call: DeviceCall) {
        trace!("device: {call:?}");
        self.calls.borrow_mut().push(call);
    }

    fn fails(&self, point: FailPoint) -> bool {
        self.failures.borrow().contains(&point)
    }

    fn allocate(&self, kind: ObjectKind) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.live.borrow_mut().insert(id, kind);
        self.record(DeviceCall::Create { kind, id });
        id
    }

    fn is_live(&self, id: u32, kind: ObjectKind) -> bool {
        self.live.borrow().get(&id) == Some(&kind)
    }

    fn release(&self, id: u32, kind: ObjectKind) {
        if self.live.borrow_mut().remove(&id).is_some() {
            self.record(DeviceCall::Delete { kind, id });
        }
    }
}

impl GraphicsDevice for RecordingDevice {
    fn create_vertex_array(&self) -> Result<u32, DeviceError> {
        if self.fails(FailPoint::CreateVertexArray) {
            return Err(DeviceError::new("vertex array allocation failed"));
        }
        let id = self.allocate(ObjectKind::VertexArray);
        self.record(DeviceCall::BindVertexArray(id));
        Ok(id)
    }

    fn bind_vertex_array(&self, id: u32) {
        self.record(DeviceCall::BindVertexArray(id));
    }

    fn create_buffer(&self, _target: BufferTarget, data: &[u8]) -> Result<u32, DeviceError> {
        if self.fails(FailPoint::CreateBuffer) || data.is_empty() {
            return Err(DeviceError::new("buffer allocation failed"));
        }
        Ok(self.allocate(ObjectKind::Buffer))
    }

    fn set_vertex_layout(&self, stride: usize, attributes: &[VertexAttribute]) {
        self.record(DeviceCall::SetVertexLayout {
            stride,
            attributes: attributes.len(),
        });
    }

    fn is_vertex_array(&self, id: u32) -> bool {
        self.is_live(id, ObjectKind::VertexArray)
    }

    fn is_buffer(&self, id: u32) -> bool {
        self.is_live(id, ObjectKind::Buffer)
    }

    fn delete_vertex_array(&self, id: u32) {
        self.release(id, ObjectKind::VertexArray);
    }

    fn delete_buffer(&self, id: u32) {
        self.release(id, ObjectKind::Buffer);
    }

    fn create_texture(&self, target: TextureTarget) -> Result<u32, DeviceError> {
        if self.fails(FailPoint::CreateTexture) {
            return Err(DeviceError::new("texture allocation failed"));
        }
        let id = self.allocate(ObjectKind::Texture);
        self.record(DeviceCall::BindTexture { unit: 0, target, id });
        Ok(id)
    }

    fn upload_image(
        &self,
        target: ImageTarget,
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: &[u8],
    ) -> Result<(), DeviceError> {
        let expected = width as usize * height as usize * format.bytes_per_pixel() as usize;
        if self.fails(FailPoint::UploadImage) || pixels.len() < expected {
            return Err(DeviceError::new("image upload rejected"));
        }
        self.record(DeviceCall::UploadImage {
            target,
            width,
            height,
            format,
        });
        Ok(())
    }

    fn configure_texture(&self, target: TextureTarget, mipmaps: bool) {
        self.record(DeviceCall::ConfigureTexture { target, mipmaps });
    }

    fn bind_texture(&self, unit: u32, target: TextureTarget, id: u32) {
        self.record(DeviceCall::BindTexture { unit, target, id });
    }

    fn is_texture(&self, id: u32) -> bool {
        self.is_live(id, ObjectKind::Texture)
    }

    fn delete_texture(&self, id: u32) {
        self.release(id, ObjectKind::Texture);
    }

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<u32, DeviceError> {
        if self.fails(FailPoint::Compile(stage)) || source.trim().is_empty() {
            return Err(DeviceError::new(format!("{stage:?} stage failed to compile")));
        }
        Ok(self.allocate(ObjectKind::Shader))
    }

    fn link_program(&self, vertex_shader: u32, fragment_shader: u32) -> Result<u32, DeviceError> {
        if self.fails(FailPoint::Link) {
            return Err(DeviceError::new("program failed to link"));
        }
        if !self.is_shader(vertex_shader) || !self.is_shader(fragment_shader) {
            return Err(DeviceError::new("link with a stage that is not a shader"));
        }
        Ok(self.allocate(ObjectKind::Program))
    }

    fn use_program(&self, program: u32) {
        self.record(DeviceCall::UseProgram(program));
    }

    fn is_shader(&self, id: u32) -> bool {
        self.is_live(id, ObjectKind::Shader)
    }

    fn is_program(&self, id: u32) -> bool {
        self.is_live(id, ObjectKind::Program)
    }

    fn delete_shader(&self, id: u32) {
        self.release(id, ObjectKind::Shader);
    }

    fn delete_program(&self, id: u32) {
        self.release(id, ObjectKind::Program);
    }

    fn uniform_location(&self, program: u32, name: &str) -> UniformLocation {
        self.record(DeviceCall::QueryUniform(name.to_string()));
        if !self.is_program(program) || self.missing_uniforms.borrow().contains(name) {
            return UniformLocation::NOT_FOUND;
        }

        let mut locations = self.locations.borrow_mut();
        let index = match locations.iter().position(|known| known == name) {
            Some(index) => index,
            None => {
                locations.push(name.to_string());
                locations.len() - 1
            }
        };
        UniformLocation(index as i32)
    }

    fn write_uniform(&self, location: UniformLocation, value: UniformValue) {
        let name = self
            .locations
            .borrow()
            .get(location.0 as usize)
            .cloned()
            .unwrap_or_default();
        self.record(DeviceCall::SetUniform { name, value });
    }

    fn set_state(&self, state: RenderState) {
        self.record(DeviceCall::SetState(state));
    }

    fn clear(&self, colour: bool, depth: bool) {
        self.record(DeviceCall::Clear { colour, depth });
    }

    fn draw_indexed(&self, vertex_array: u32, index_count: u32) {
        self.record(DeviceCall::DrawIndexed {
            vertex_array,
            index_count,
        });
    }

    fn check_error(&self) -> Result<(), DeviceError> {
        if self.fails(FailPoint::CheckError) {
            return Err(DeviceError::new("GL_INVALID_OPERATION"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one_and_deletion_is_tracked() {
        let device = RecordingDevice::new();
        let vao = device.create_vertex_array().unwrap();
        assert_eq!(vao, 1);
        assert!(device.is_vertex_array(vao));
        assert!(!device.is_buffer(vao));

        device.delete_vertex_array(vao);
        device.delete_vertex_array(vao);
        assert_eq!(device.live_count(), 0);
        let deletes = device
            .calls()
            .into_iter()
            .filter(|call| matches!(call, DeviceCall::Delete { .. }))
            .count();
        assert_eq!(deletes, 1);
    }

    #[test]
    fn injected_failures_allocate_nothing() {
        let device = RecordingDevice::new();
        device.fail_on(FailPoint::CreateTexture);
        assert!(device.create_texture(TextureTarget::Texture2D).is_err());
        assert_eq!(device.live_count(), 0);

        device.clear_failures();
        assert!(device.create_texture(TextureTarget::Texture2D).is_ok());
    }

    #[test]
    fn uniform_locations_are_stable_per_name() {
        let device = RecordingDevice::new();
        let vertex = device.compile_shader(ShaderStage::Vertex, "void main() {}").unwrap();
        let fragment = device.compile_shader(ShaderStage::Fragment, "void main() {}").unwrap();
        let program = device.link_program(vertex, fragment).unwrap();
        device.hide_uniform("seed");

        let first = device.uniform_location(program, "mModel");
        assert_eq!(device.uniform_location(program, "mModel"), first);
        assert!(!device.uniform_location(program, "seed").is_found());
        assert!(!device.uniform_location(0, "mModel").is_found());

        device.set_uniform(first, UniformValue::Int(3));
        device.set_uniform(UniformLocation::NOT_FOUND, UniformValue::Int(4));
        assert_eq!(device.uniform("mModel"), Some(UniformValue::Int(3)));
        let writes = device
            .calls()
            .into_iter()
            .filter(|call| matches!(call, DeviceCall::SetUniform { .. }))
            .count();
        assert_eq!(writes, 1);
    }
}
