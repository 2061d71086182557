//! Handle layer over the mesh and texture managers.
//!
//! Couche de handles : les consommateurs (scène, renderer) ne voient jamais les
//! clés de stockage. Un handle résout directement vers le slot du manager.

use std::path::Path;
use std::rc::Rc;

use log::debug;

use crate::config::{models_dir, textures_dir};
use crate::{
    AssetParser, GraphicsConfig, GraphicsDevice, GraphicsError, HandleTable, MeshCpu, MeshGpu,
    MeshHandle, MeshKind, MeshManager, ResourceKind, Result, TextureCpu, TextureGpu,
    TextureHandle, TextureKind, TextureManager,
};

pub struct ResourceManager {
    meshes: MeshManager,
    textures: TextureManager,
    mesh_handles: HandleTable<MeshKind>,
    texture_handles: HandleTable<TextureKind>,
}

impl ResourceManager {
    pub fn new(device: Rc<dyn GraphicsDevice>, parser: Rc<dyn AssetParser>, config: &GraphicsConfig) -> Self {
        let mut meshes = MeshManager::new(device.clone(), parser.clone(), config.cpu_retention);
        let mut textures = TextureManager::new(device, parser, config.cpu_retention, config.generate_mipmaps);
        meshes.set_base_path(config.models_dir());
        textures.set_base_path(config.textures_dir());

        Self {
            meshes,
            textures,
            mesh_handles: HandleTable::new(),
            texture_handles: HandleTable::new(),
        }
    }

    /// Meshes resolve under `base/models`, textures under `base/textures`.
    pub fn set_base_path(&mut self, base: &Path) {
        self.meshes.set_base_path(models_dir(base));
        self.textures.set_base_path(textures_dir(base));
    }

    pub fn mesh_manager(&self) -> &MeshManager {
        &self.meshes
    }

    pub fn texture_manager(&self) -> &TextureManager {
        &self.textures
    }

    /// Loads the mesh at `path` once and returns its handle; later calls return the same handle.
    pub fn add_mesh(&mut self, path: &str) -> Result<MeshHandle> {
        if self.mesh_handles.contains_key(path) {
            return Ok(self.mesh_handles.get(path));
        }
        let slot = self.meshes.load_and_add(path)?;
        Ok(self.issue_mesh(path, slot))
    }

    /// Registers a generated mesh under `name`.
    pub fn add_mesh_data(&mut self, name: &str, cpu: MeshCpu) -> Result<MeshHandle> {
        if self.mesh_handles.contains_key(name) {
            return Ok(self.mesh_handles.get(name));
        }
        let slot = self.meshes.add_mesh(name, cpu)?;
        Ok(self.issue_mesh(name, slot))
    }

    fn issue_mesh(&mut self, key: &str, slot: usize) -> MeshHandle {
        let handle = self.mesh_handles.insert(key, slot);
        debug!("mesh {key} -> {handle:?}");
        handle
    }

    pub fn has_mesh(&self, path: &str) -> bool {
        self.mesh_handles.contains_key(path)
    }

    pub fn has_mesh_handle(&self, handle: MeshHandle) -> bool {
        self.mesh_handles.contains(handle)
    }

    /// Handle registered for `path`, or [`MeshHandle::INVALID`].
    pub fn get_mesh_handle(&self, path: &str) -> MeshHandle {
        self.mesh_handles.get(path)
    }

    pub fn get_mesh_cpu(&self, handle: MeshHandle) -> Option<&MeshCpu> {
        self.mesh_handles.slot(handle).and_then(|slot| self.meshes.cpu(slot))
    }

    pub fn get_mesh_gpu(&self, handle: MeshHandle) -> Option<&MeshGpu> {
        self.mesh_handles.slot(handle).and_then(|slot| self.meshes.gpu(slot))
    }

    /// Both records of a mesh, as needed for a draw.
    pub fn resolve_mesh(&self, handle: MeshHandle) -> Result<(&MeshCpu, &MeshGpu)> {
        self.get_mesh_cpu(handle)
            .zip(self.get_mesh_gpu(handle))
            .ok_or(GraphicsError::UnresolvedHandle {
                kind: ResourceKind::Mesh,
                id: handle.id(),
            })
    }

    /// Loads a 2D texture. A new `file_path` for a known `name` replaces the
    /// texture behind the same handle.
    pub fn add_texture(&mut self, name: &str, file_path: &str) -> Result<TextureHandle> {
        let slot = self.textures.add_texture(name, file_path)?;
        Ok(self.issue_texture(name, slot))
    }

    pub fn add_texture_cube(&mut self, name: &str, face_paths: &[String; 6]) -> Result<TextureHandle> {
        let slot = self.textures.add_texture_cube(name, face_paths)?;
        Ok(self.issue_texture(name, slot))
    }

    pub fn add_texture_data(&mut self, name: &str, cpu: TextureCpu) -> Result<TextureHandle> {
        let slot = self.textures.add_texture_data(name, cpu)?;
        Ok(self.issue_texture(name, slot))
    }

    fn issue_texture(&mut self, name: &str, slot: usize) -> TextureHandle {
        let handle = self.texture_handles.insert(name, slot);
        debug!("texture {name} -> {handle:?}");
        handle
    }

    pub fn has_texture(&self, name: &str) -> bool {
        self.texture_handles.contains_key(name)
    }

    pub fn has_texture_handle(&self, handle: TextureHandle) -> bool {
        self.texture_handles.contains(handle)
    }

    pub fn get_texture_handle(&self, name: &str) -> TextureHandle {
        self.texture_handles.get(name)
    }

    pub fn get_texture_cpu(&self, handle: TextureHandle) -> Option<&TextureCpu> {
        self.texture_handles.slot(handle).and_then(|slot| self.textures.cpu(slot))
    }

    pub fn get_texture_gpu(&self, handle: TextureHandle) -> Option<&TextureGpu> {
        self.texture_handles.slot(handle).and_then(|slot| self.textures.gpu(slot))
    }

    /// Device id behind `handle`, or 0.
    pub fn get_texture_id(&self, handle: TextureHandle) -> u32 {
        self.get_texture_gpu(handle).map_or(0, |gpu| gpu.id)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::{MemoryParser, RecordingDevice, Vertex};

    fn setup() -> (Rc<RecordingDevice>, Rc<MemoryParser>, ResourceManager) {
        let device = Rc::new(RecordingDevice::new());
        let parser = Rc::new(MemoryParser::new());
        parser.insert_mesh(
            "tri.ply",
            vec![
                Vertex::new([0.0, 0.0, 0.0], [1.0; 4]),
                Vertex::new([1.0, 0.0, 0.0], [1.0; 4]),
                Vertex::new([0.0, 1.0, 0.0], [1.0; 4]),
            ],
            vec![0, 1, 2],
        );
        parser.insert_mesh("quad.ply", vec![Vertex::new([0.0; 3], [1.0; 4]); 4], vec![0, 1, 2, 0, 2, 3]);
        parser.insert_solid_image("grass.bmp", 2, [0, 255, 0, 255]);
        parser.insert_solid_image("rock.bmp", 2, [90, 90, 90, 255]);
        let manager = ResourceManager::new(device.clone(), parser.clone(), &GraphicsConfig::default());
        (device, parser, manager)
    }

    #[test]
    fn handles_start_at_one_and_are_idempotent() {
        let (_device, parser, mut resources) = setup();
        let tri = resources.add_mesh("tri.ply").unwrap();
        let quad = resources.add_mesh("quad.ply").unwrap();
        assert_eq!(tri.id(), 1);
        assert_eq!(quad.id(), 2);

        assert_eq!(resources.add_mesh("tri.ply").unwrap(), tri);
        assert_eq!(parser.decodes(), 2);
        assert_eq!(resources.mesh_manager().len(), 2);
        assert_eq!(resources.get_mesh_handle("tri.ply"), tri);
    }

    #[test]
    fn handle_resolution_is_soft() {
        let (_device, _parser, mut resources) = setup();
        let tri = resources.add_mesh("tri.ply").unwrap();
        assert!(resources.has_mesh("tri.ply"));
        assert!(resources.has_mesh_handle(tri));
        assert!(resources.get_mesh_gpu(tri).is_some());

        assert!(!MeshHandle::INVALID.is_valid());
        assert!(!resources.has_mesh_handle(MeshHandle::INVALID));
        assert!(resources.get_mesh_cpu(MeshHandle::INVALID).is_none());
        assert!(resources.get_mesh_gpu(MeshHandle::from_raw(42)).is_none());
        assert!(!resources.get_mesh_handle("nope.ply").is_valid());
        assert!(matches!(
            resources.resolve_mesh(MeshHandle::from_raw(7)),
            Err(GraphicsError::UnresolvedHandle { id: 7, .. })
        ));
    }

    #[test]
    fn failed_registration_issues_no_handle() {
        let (_device, _parser, mut resources) = setup();
        assert!(resources.add_mesh("missing.ply").is_err());
        assert!(!resources.has_mesh("missing.ply"));
        assert!(resources.add_mesh_data("empty", MeshCpu::default()).is_err());
        assert_eq!(resources.add_mesh("tri.ply").unwrap().id(), 1);
    }

    #[test]
    fn texture_handles_survive_replacement() {
        let (_device, _parser, mut resources) = setup();
        let handle = resources.add_texture("ground", "grass.bmp").unwrap();
        let old_id = resources.get_texture_id(handle);
        assert_ne!(old_id, 0);

        assert_eq!(resources.add_texture("ground", "rock.bmp").unwrap(), handle);
        assert_ne!(resources.get_texture_id(handle), old_id);
        assert_eq!(resources.get_texture_id(TextureHandle::INVALID), 0);
        assert!(resources.has_texture("ground"));
        assert!(resources.has_texture_handle(handle));
    }

    #[test]
    fn base_path_is_split_per_kind() {
        let (_device, _parser, mut resources) = setup();
        resources.set_base_path(Path::new("game"));
        assert_eq!(resources.mesh_manager().base_path(), PathBuf::from("game/models"));
        assert_eq!(resources.texture_manager().base_path(), PathBuf::from("game/textures"));
    }
}
