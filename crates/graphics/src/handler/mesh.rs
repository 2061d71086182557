use bytemuck::cast_slice;
use log::trace;

use super::ResourceHandler;
use crate::{
    BufferTarget, GraphicsDevice, GraphicsError, MeshCpu, MeshGpu, ResourceKind, Result, Vertex,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct MeshHandler;

impl MeshHandler {
    fn fill(&self, device: &dyn GraphicsDevice, name: &str, cpu: &MeshCpu, gpu: &mut MeshGpu) -> Result<()> {
        let upload = |err| GraphicsError::upload(ResourceKind::Mesh, name, err);

        gpu.vertex_array = device.create_vertex_array().map_err(upload)?;
        gpu.vertex_buffer = device
            .create_buffer(BufferTarget::Vertex, cast_slice(&cpu.vertices))
            .map_err(upload)?;
        device.set_vertex_layout(Vertex::stride(), &Vertex::layout());
        gpu.index_buffer = device
            .create_buffer(BufferTarget::Index, cast_slice(&cpu.indices))
            .map_err(upload)?;
        device.bind_vertex_array(0);

        gpu.vertex_count = cpu.vertex_count() as u32;
        gpu.index_count = cpu.index_count() as u32;
        Ok(())
    }
}

impl ResourceHandler for MeshHandler {
    type Cpu = MeshCpu;
    type Gpu = MeshGpu;

    fn upload(&self, device: &dyn GraphicsDevice, name: &str, cpu: &MeshCpu) -> Result<MeshGpu> {
        if cpu.empty() {
            return Err(GraphicsError::empty(ResourceKind::Mesh, name));
        }

        let mut gpu = MeshGpu::default();
        if let Err(err) = self.fill(device, name, cpu, &mut gpu) {
            device.bind_vertex_array(0);
            self.unload(device, &mut gpu);
            return Err(err);
        }

        trace!(
            "mesh '{name}' uploaded (vao {}, {} indices)",
            gpu.vertex_array, gpu.index_count
        );
        Ok(gpu)
    }

    fn unload(&self, device: &dyn GraphicsDevice, gpu: &mut MeshGpu) {
        let gpu = gpu.take();
        if device.is_buffer(gpu.index_buffer) {
            device.delete_buffer(gpu.index_buffer);
        }
        if device.is_buffer(gpu.vertex_buffer) {
            device.delete_buffer(gpu.vertex_buffer);
        }
        if device.is_vertex_array(gpu.vertex_array) {
            device.delete_vertex_array(gpu.vertex_array);
        }
    }
}
