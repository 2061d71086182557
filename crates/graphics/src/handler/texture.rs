use log::trace;

use super::ResourceHandler;
use crate::{
    CubeFace, GraphicsDevice, GraphicsError, ImageTarget, PixelFormat, ResourceKind, Result,
    TextureCpu, TextureGpu, TextureTarget,
};

/// Uploads 2D textures and cube maps.
#[derive(Debug, Clone, Copy)]
pub struct TextureHandler {
    pub generate_mipmaps: bool,
}

impl Default for TextureHandler {
    fn default() -> Self {
        Self {
            generate_mipmaps: true,
        }
    }
}

fn format_of(cpu: &TextureCpu) -> Result<PixelFormat> {
    cpu.format().ok_or(GraphicsError::UnsupportedFormat {
        channels: cpu.channels,
    })
}

impl TextureHandler {
    pub fn new(generate_mipmaps: bool) -> Self {
        Self { generate_mipmaps }
    }

    pub fn upload_2d(
        &self,
        device: &dyn GraphicsDevice,
        name: &str,
        cpu: &TextureCpu,
        mipmaps: bool,
    ) -> Result<TextureGpu> {
        if cpu.empty() {
            return Err(GraphicsError::empty(ResourceKind::Texture, name));
        }
        let format = format_of(cpu)?;

        self.build(device, name, TextureTarget::Texture2D, mipmaps, |device| {
            device.upload_image(ImageTarget::Texture2D, cpu.width, cpu.height, format, &cpu.pixels)
        })
    }

    /// Faces in [`CubeFace::ALL`] order. Every face must share width, height and channels.
    pub fn upload_cube(
        &self,
        device: &dyn GraphicsDevice,
        name: &str,
        faces: &[TextureCpu; 6],
        mipmaps: bool,
    ) -> Result<TextureGpu> {
        if faces.iter().any(TextureCpu::empty) {
            return Err(GraphicsError::empty(ResourceKind::Texture, name));
        }
        if !faces.iter().all(|face| face.matches(&faces[0])) {
            return Err(GraphicsError::InconsistentCubeFaces {
                name: name.to_string(),
            });
        }
        let format = format_of(&faces[0])?;

        self.build(device, name, TextureTarget::CubeMap, mipmaps, |device| {
            for (face, cpu) in CubeFace::ALL.into_iter().zip(faces) {
                device.upload_image(ImageTarget::CubeFace(face), cpu.width, cpu.height, format, &cpu.pixels)?;
            }
            Ok(())
        })
    }

    fn build(
        &self,
        device: &dyn GraphicsDevice,
        name: &str,
        target: TextureTarget,
        mipmaps: bool,
        upload: impl FnOnce(&dyn GraphicsDevice) -> std::result::Result<(), crate::DeviceError>,
    ) -> Result<TextureGpu> {
        let id = device
            .create_texture(target)
            .map_err(|err| GraphicsError::upload(ResourceKind::Texture, name, err))?;
        let mut gpu = TextureGpu { id, target };

        let uploaded = upload(device).and_then(|()| {
            device.configure_texture(target, mipmaps);
            device.check_error()
        });
        device.bind_texture(0, target, 0);

        if let Err(err) = uploaded {
            self.unload(device, &mut gpu);
            return Err(GraphicsError::upload(ResourceKind::Texture, name, err));
        }

        trace!("texture '{name}' uploaded as {target:?} id {id}");
        Ok(gpu)
    }
}

impl ResourceHandler for TextureHandler {
    type Cpu = TextureCpu;
    type Gpu = TextureGpu;

    fn upload(&self, device: &dyn GraphicsDevice, name: &str, cpu: &TextureCpu) -> Result<TextureGpu> {
        self.upload_2d(device, name, cpu, self.generate_mipmaps)
    }

    fn unload(&self, device: &dyn GraphicsDevice, gpu: &mut TextureGpu) {
        let gpu = gpu.take();
        if device.is_texture(gpu.id) {
            device.delete_texture(gpu.id);
        }
    }
}
