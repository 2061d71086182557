use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{debug, error};

use crate::{
    AssetParser, CpuRetention, GraphicsDevice, MeshCpu, MeshGpu, MeshHandler, ResourceHandler,
    Result,
};

struct MeshRecord {
    cpu: MeshCpu,
    gpu: MeshGpu,
}

/// Owns every mesh's CPU and GPU record, keyed by path (or factory name).
///
/// Records live in dense slots that never move; the slot of a name is stable
/// for the manager's lifetime. Dropping the manager unloads every GPU record.
pub struct MeshManager {
    device: Rc<dyn GraphicsDevice>,
    parser: Rc<dyn AssetParser>,
    handler: MeshHandler,
    base_path: PathBuf,
    retention: CpuRetention,
    records: Vec<MeshRecord>,
    by_path: HashMap<String, usize>,
}

impl MeshManager {
    pub fn new(device: Rc<dyn GraphicsDevice>, parser: Rc<dyn AssetParser>, retention: CpuRetention) -> Self {
        Self {
            device,
            parser,
            handler: MeshHandler,
            base_path: PathBuf::new(),
            retention,
            records: Vec::new(),
            by_path: HashMap::new(),
        }
    }

    /// Directory relative mesh paths are resolved against.
    pub fn set_base_path(&mut self, path: impl Into<PathBuf>) {
        self.base_path = path.into();
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn exists(&self, path: &str) -> bool {
        self.by_path.contains_key(path)
    }

    pub fn slot(&self, path: &str) -> Option<usize> {
        self.by_path.get(path).copied()
    }

    /// Decodes `base_path/path` and uploads it. No-op when `path` is already registered.
    pub fn load_and_add(&mut self, path: &str) -> Result<usize> {
        if let Some(slot) = self.slot(path) {
            debug!("mesh already exists: {path}");
            return Ok(slot);
        }

        let full_path = self.base_path.join(path);
        let cpu = self.parser.parse_mesh(&full_path).inspect_err(|err| {
            error!("could not load mesh from {}: {err}", full_path.display());
        })?;
        self.install(path, cpu)
    }

    /// Uploads an already-built mesh (e.g. a generated primitive) under `path`.
    pub fn add_mesh(&mut self, path: &str, cpu: MeshCpu) -> Result<usize> {
        if let Some(slot) = self.slot(path) {
            return Ok(slot);
        }
        self.install(path, cpu)
    }

    fn install(&mut self, path: &str, mut cpu: MeshCpu) -> Result<usize> {
        let gpu = self
            .handler
            .upload(self.device.as_ref(), path, &cpu)
            .inspect_err(|err| error!("could not add mesh {path}: {err}"))?;

        if self.retention == CpuRetention::Free {
            cpu.free_data();
        }

        let slot = self.records.len();
        self.records.push(MeshRecord { cpu, gpu });
        self.by_path.insert(path.to_string(), slot);
        debug!("added mesh: {path}");
        Ok(slot)
    }

    pub fn cpu(&self, slot: usize) -> Option<&MeshCpu> {
        self.records.get(slot).map(|record| &record.cpu)
    }

    pub fn gpu(&self, slot: usize) -> Option<&MeshGpu> {
        self.records.get(slot).map(|record| &record.gpu)
    }

    pub fn get_mesh_cpu(&self, path: &str) -> Option<&MeshCpu> {
        self.slot(path).and_then(|slot| self.cpu(slot))
    }

    pub fn get_mesh_gpu(&self, path: &str) -> Option<&MeshGpu> {
        self.slot(path).and_then(|slot| self.gpu(slot))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Drop for MeshManager {
    fn drop(&mut self) {
        for record in &mut self.records {
            self.handler.unload(self.device.as_ref(), &mut record.gpu);
        }
        debug!("mesh manager released {} meshes", self.records.len());
    }
}
