use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{debug, error, info};

use crate::{
    AssetParser, CpuRetention, GraphicsDevice, ResourceHandler, Result, TextureCpu, TextureGpu,
    TextureHandler,
};

/// Where a texture's pixels came from; decides whether re-registration replaces.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TextureSource {
    Memory,
    File(String),
    Cube([String; 6]),
}

struct TextureRecord {
    source: TextureSource,
    /// One entry for 2D textures, six for cube maps.
    faces: Vec<TextureCpu>,
    gpu: TextureGpu,
}

/// Owns 2D and cube textures by logical name.
///
/// Registering a name again with the same source is a no-op; with a different
/// source the new texture is uploaded first, then the old one is released and
/// replaced in place, so slots (and the handles pointing at them) stay valid.
pub struct TextureManager {
    device: Rc<dyn GraphicsDevice>,
    parser: Rc<dyn AssetParser>,
    handler: TextureHandler,
    base_path: PathBuf,
    retention: CpuRetention,
    records: Vec<TextureRecord>,
    by_name: HashMap<String, usize>,
}

impl TextureManager {
    pub fn new(
        device: Rc<dyn GraphicsDevice>,
        parser: Rc<dyn AssetParser>,
        retention: CpuRetention,
        generate_mipmaps: bool,
    ) -> Self {
        Self {
            device,
            parser,
            handler: TextureHandler::new(generate_mipmaps),
            base_path: PathBuf::new(),
            retention,
            records: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn set_base_path(&mut self, path: impl Into<PathBuf>) {
        self.base_path = path.into();
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn exists(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn slot(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Decodes `base_path/file_path` as a 2D texture named `name`.
    pub fn add_texture(&mut self, name: &str, file_path: &str) -> Result<usize> {
        let source = TextureSource::File(file_path.to_string());
        if let Some(slot) = self.unchanged(name, &source) {
            return Ok(slot);
        }

        let full_path = self.base_path.join(file_path);
        let cpu = self
            .parser
            .parse_image(&full_path)
            .inspect_err(|err| error!("failed to load texture {}: {err}", full_path.display()))?;
        let gpu = self
            .handler
            .upload(self.device.as_ref(), name, &cpu)
            .inspect_err(|err| error!("failed to upload texture {name}: {err}"))?;

        Ok(self.install(name, source, vec![cpu], gpu))
    }

    /// Decodes six face images (`+x -x +y -y +z -z`) into a cube map named `name`.
    pub fn add_texture_cube(&mut self, name: &str, face_paths: &[String; 6]) -> Result<usize> {
        let source = TextureSource::Cube(face_paths.clone());
        if let Some(slot) = self.unchanged(name, &source) {
            return Ok(slot);
        }

        let mut faces: [TextureCpu; 6] = Default::default();
        for (index, (face, face_path)) in faces.iter_mut().zip(face_paths).enumerate() {
            let full_path = self.base_path.join(face_path);
            *face = self.parser.parse_image(&full_path).inspect_err(|err| {
                error!("failed cube face [{index}] {}: {err}", full_path.display());
            })?;
        }
        let gpu = self
            .handler
            .upload_cube(self.device.as_ref(), name, &faces, self.handler.generate_mipmaps)
            .inspect_err(|err| error!("failed to upload cube texture {name}: {err}"))?;

        Ok(self.install(name, source, Vec::from(faces), gpu))
    }

    /// Uploads already-decoded pixels. No-op when `name` is registered.
    pub fn add_texture_data(&mut self, name: &str, cpu: TextureCpu) -> Result<usize> {
        if let Some(slot) = self.slot(name) {
            return Ok(slot);
        }
        self.replace_texture_data(name, cpu)
    }

    /// Uploads already-decoded pixels, replacing any texture called `name`.
    pub fn replace_texture_data(&mut self, name: &str, cpu: TextureCpu) -> Result<usize> {
        let gpu = self
            .handler
            .upload(self.device.as_ref(), name, &cpu)
            .inspect_err(|err| error!("failed to upload texture {name}: {err}"))?;
        Ok(self.install(name, TextureSource::Memory, vec![cpu], gpu))
    }

    fn unchanged(&self, name: &str, source: &TextureSource) -> Option<usize> {
        let slot = self.slot(name)?;
        (self.records[slot].source == *source).then(|| {
            debug!("texture already exists: {name}");
            slot
        })
    }

    /// Stores a freshly uploaded texture. An existing slot is swapped first and
    /// its old GPU texture released after, so a failed upload never loses it.
    fn install(&mut self, name: &str, source: TextureSource, mut faces: Vec<TextureCpu>, gpu: TextureGpu) -> usize {
        if self.retention == CpuRetention::Free {
            faces.iter_mut().for_each(TextureCpu::free_pixels);
        }
        let record = TextureRecord { source, faces, gpu };

        match self.slot(name) {
            Some(slot) => {
                let mut old = std::mem::replace(&mut self.records[slot], record);
                self.handler.unload(self.device.as_ref(), &mut old.gpu);
                info!("replaced texture: {name}");
                slot
            }
            None => {
                let slot = self.records.len();
                self.records.push(record);
                self.by_name.insert(name.to_string(), slot);
                debug!("added texture: {name}");
                slot
            }
        }
    }

    /// First (or only) face.
    pub fn cpu(&self, slot: usize) -> Option<&TextureCpu> {
        self.records.get(slot).and_then(|record| record.faces.first())
    }

    pub fn gpu(&self, slot: usize) -> Option<&TextureGpu> {
        self.records.get(slot).map(|record| &record.gpu)
    }

    /// Device id of `name`, or 0.
    pub fn texture_id(&self, name: &str) -> u32 {
        self.slot(name)
            .and_then(|slot| self.gpu(slot))
            .map_or(0, |gpu| gpu.id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Drop for TextureManager {
    fn drop(&mut self) {
        for record in &mut self.records {
            self.handler.unload(self.device.as_ref(), &mut record.gpu);
        }
        debug!("texture manager released {} textures", self.records.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GraphicsError, MemoryParser, RecordingDevice, TextureTarget};

    fn setup() -> (Rc<RecordingDevice>, Rc<MemoryParser>, TextureManager) {
        let device = Rc::new(RecordingDevice::new());
        let parser = Rc::new(MemoryParser::new());
        for name in ["grass.bmp", "rock.bmp", "right.bmp", "left.bmp", "top.bmp", "bottom.bmp", "front.bmp", "back.bmp"] {
            parser.insert_solid_image(name, 2, [20, 120, 20, 255]);
        }
        parser.insert_solid_image("big.bmp", 4, [0, 0, 0, 255]);
        let manager = TextureManager::new(device.clone(), parser.clone(), CpuRetention::Free, true);
        (device, parser, manager)
    }

    fn cube_faces() -> [String; 6] {
        ["right.bmp", "left.bmp", "top.bmp", "bottom.bmp", "front.bmp", "back.bmp"].map(String::from)
    }

    #[test]
    fn same_source_is_idempotent() {
        let (device, parser, mut manager) = setup();
        let slot = manager.add_texture("grass", "grass.bmp").unwrap();
        assert_eq!(manager.add_texture("grass", "grass.bmp").unwrap(), slot);
        assert_eq!(parser.decodes(), 1);
        assert_eq!(device.live_count(), 1);
        assert_ne!(manager.texture_id("grass"), 0);
        assert_eq!(manager.texture_id("unknown"), 0);
    }

    #[test]
    fn new_source_replaces_in_place() {
        let (device, _parser, mut manager) = setup();
        let slot = manager.add_texture("ground", "grass.bmp").unwrap();
        let old_id = manager.texture_id("ground");

        assert_eq!(manager.add_texture("ground", "rock.bmp").unwrap(), slot);
        let new_id = manager.texture_id("ground");
        assert_ne!(new_id, old_id);
        assert!(!device.is_texture(old_id));
        assert!(device.is_texture(new_id));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn cube_map_from_six_faces() {
        let (_device, _parser, mut manager) = setup();
        let slot = manager.add_texture_cube("skybox", &cube_faces()).unwrap();
        assert_eq!(manager.gpu(slot).unwrap().target, TextureTarget::CubeMap);
        assert!(manager.cpu(slot).unwrap().empty());
    }

    #[test]
    fn inconsistent_cube_is_not_registered() {
        let (device, _parser, mut manager) = setup();
        let mut faces = cube_faces();
        faces[2] = "big.bmp".to_string();
        let err = manager.add_texture_cube("skybox", &faces).unwrap_err();
        assert!(matches!(err, GraphicsError::InconsistentCubeFaces { .. }));
        assert!(!manager.exists("skybox"));
        assert_eq!(device.live_count(), 0);
    }

    #[test]
    fn failed_replacement_keeps_the_old_texture() {
        let (device, _parser, mut manager) = setup();
        manager.add_texture("ground", "grass.bmp").unwrap();
        let old_id = manager.texture_id("ground");

        assert!(manager.add_texture("ground", "missing.bmp").is_err());
        assert_eq!(manager.texture_id("ground"), old_id);
        assert!(device.is_texture(old_id));
    }

    #[test]
    fn drop_releases_every_texture() {
        let (device, _parser, mut manager) = setup();
        manager.add_texture("grass", "grass.bmp").unwrap();
        manager.add_texture_cube("skybox", &cube_faces()).unwrap();
        manager
            .add_texture_data("white", TextureCpu::new(1, 1, 4, vec![255; 4]))
            .unwrap();
        assert_eq!(device.live_count(), 3);
        drop(manager);
        assert_eq!(device.live_count(), 0);
    }
}
