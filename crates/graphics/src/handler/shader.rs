use log::{error, trace};

use super::ResourceHandler;
use crate::{GraphicsDevice, GraphicsError, ResourceKind, Result, ShaderCpu, ShaderGpu, ShaderStage};

/// Compiles both stages and links them. Nothing stays alive on failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShaderHandler;

impl ResourceHandler for ShaderHandler {
    type Cpu = ShaderCpu;
    type Gpu = ShaderGpu;

    fn upload(&self, device: &dyn GraphicsDevice, name: &str, cpu: &ShaderCpu) -> Result<ShaderGpu> {
        if cpu.empty() {
            return Err(GraphicsError::empty(ResourceKind::Shader, name));
        }
        let fail = |stage: &str, err| {
            error!("shader '{name}': {stage} failed: {err}");
            GraphicsError::upload(ResourceKind::Shader, name, err)
        };

        let vertex_shader = device
            .compile_shader(ShaderStage::Vertex, &cpu.vertex_source)
            .map_err(|err| fail("vertex compile", err))?;

        let fragment_shader = match device.compile_shader(ShaderStage::Fragment, &cpu.fragment_source) {
            Ok(id) => id,
            Err(err) => {
                device.delete_shader(vertex_shader);
                return Err(fail("fragment compile", err));
            }
        };

        let program = match device.link_program(vertex_shader, fragment_shader) {
            Ok(id) => id,
            Err(err) => {
                device.delete_shader(vertex_shader);
                device.delete_shader(fragment_shader);
                return Err(fail("link", err));
            }
        };

        trace!("shader '{name}' linked as program {program}");
        Ok(ShaderGpu {
            program,
            vertex_shader,
            fragment_shader,
            linked: true,
        })
    }

    fn unload(&self, device: &dyn GraphicsDevice, gpu: &mut ShaderGpu) {
        let gpu = gpu.take();
        if device.is_program(gpu.program) {
            device.delete_program(gpu.program);
        }
        if device.is_shader(gpu.vertex_shader) {
            device.delete_shader(gpu.vertex_shader);
        }
        if device.is_shader(gpu.fragment_shader) {
            device.delete_shader(gpu.fragment_shader);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FailPoint, ObjectKind, RecordingDevice};

    fn sources() -> ShaderCpu {
        ShaderCpu {
            vertex_source: "void main() { gl_Position = vec4(0.0); }".to_string(),
            fragment_source: "void main() {}".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn linked_program_keeps_both_stages() {
        let device = RecordingDevice::new();
        let mut gpu = ShaderHandler.upload(&device, "main", &sources()).unwrap();
        assert!(!gpu.empty());
        assert_eq!(device.live_count_of(ObjectKind::Shader), 2);
        assert_eq!(device.live_count_of(ObjectKind::Program), 1);

        ShaderHandler.unload(&device, &mut gpu);
        ShaderHandler.unload(&device, &mut gpu);
        assert!(gpu.is_zeroed());
        assert_eq!(device.live_count(), 0);
    }

    #[test]
    fn fragment_failure_releases_vertex_stage() {
        let device = RecordingDevice::new();
        device.fail_on(FailPoint::Compile(ShaderStage::Fragment));
        assert!(ShaderHandler.upload(&device, "main", &sources()).is_err());
        assert_eq!(device.live_count(), 0);
    }

    #[test]
    fn link_failure_releases_both_stages() {
        let device = RecordingDevice::new();
        device.fail_on(FailPoint::Link);
        let err = ShaderHandler.upload(&device, "main", &sources()).unwrap_err();
        assert!(matches!(err, GraphicsError::Upload { kind: ResourceKind::Shader, .. }));
        assert_eq!(device.live_count(), 0);
    }

    #[test]
    fn empty_source_is_rejected() {
        let device = RecordingDevice::new();
        let err = ShaderHandler.upload(&device, "main", &ShaderCpu::default()).unwrap_err();
        assert!(matches!(err, GraphicsError::EmptyResource { .. }));
    }
}
