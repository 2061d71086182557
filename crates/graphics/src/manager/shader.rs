use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{debug, error, info};

use crate::{
    AssetParser, GraphicsDevice, GraphicsError, ResourceHandler, Result, ShaderCpu, ShaderGpu,
    ShaderHandler,
};

struct ShaderRecord {
    cpu: ShaderCpu,
    gpu: ShaderGpu,
}

/// Programs by name. Sources are kept so a program can be rebuilt from its paths.
pub struct ShaderManager {
    device: Rc<dyn GraphicsDevice>,
    parser: Rc<dyn AssetParser>,
    handler: ShaderHandler,
    base_path: PathBuf,
    programs: HashMap<String, ShaderRecord>,
}

impl ShaderManager {
    pub fn new(device: Rc<dyn GraphicsDevice>, parser: Rc<dyn AssetParser>) -> Self {
        Self {
            device,
            parser,
            handler: ShaderHandler,
            base_path: PathBuf::new(),
            programs: HashMap::new(),
        }
    }

    pub fn set_base_path(&mut self, path: impl Into<PathBuf>) {
        self.base_path = path.into();
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn exists(&self, name: &str) -> bool {
        self.programs.contains_key(name)
    }

    /// Builds `name` from two source files, replacing any program already called `name`.
    ///
    /// The previous program is only released once the new one has linked; a
    /// failed rebuild keeps it in use.
    pub fn create_program_from_paths(&mut self, name: &str, vertex_path: &str, fragment_path: &str) -> Result<u32> {
        let cpu = ShaderCpu {
            vertex_source: self.read(vertex_path)?,
            fragment_source: self.read(fragment_path)?,
            vertex_path: vertex_path.to_string(),
            fragment_path: fragment_path.to_string(),
        };
        let gpu = self
            .handler
            .upload(self.device.as_ref(), name, &cpu)
            .inspect_err(|err| error!("failed to build shader {name}: {err}"))?;
        let program = gpu.program;

        if let Some(mut old) = self.programs.insert(name.to_string(), ShaderRecord { cpu, gpu }) {
            self.handler.unload(self.device.as_ref(), &mut old.gpu);
            info!("reloaded shader {name} as program {program}");
        } else {
            debug!("created shader {name} as program {program}");
        }
        Ok(program)
    }

    /// Rebuilds `name` from the paths it was created with.
    pub fn reload(&mut self, name: &str) -> Result<u32> {
        let (vertex_path, fragment_path) = match self.programs.get(name) {
            Some(record) => (record.cpu.vertex_path.clone(), record.cpu.fragment_path.clone()),
            None => return Err(GraphicsError::UnknownShader { name: name.to_string() }),
        };
        self.create_program_from_paths(name, &vertex_path, &fragment_path)
    }

    pub fn use_program(&self, name: &str) -> Result<u32> {
        let gpu = self.get_shader(name).filter(|gpu| !gpu.empty()).ok_or_else(|| {
            error!("shader not found or not linked: {name}");
            GraphicsError::UnknownShader { name: name.to_string() }
        })?;
        self.device.use_program(gpu.program);
        Ok(gpu.program)
    }

    /// Program id of `name`, or 0.
    pub fn program_id(&self, name: &str) -> u32 {
        self.get_shader(name).map_or(0, |gpu| gpu.program)
    }

    pub fn get_shader(&self, name: &str) -> Option<&ShaderGpu> {
        self.programs.get(name).map(|record| &record.gpu)
    }

    pub fn get_sources(&self, name: &str) -> Option<&ShaderCpu> {
        self.programs.get(name).map(|record| &record.cpu)
    }

    fn read(&self, path: &str) -> Result<String> {
        let full_path = self.base_path.join(path);
        self.parser
            .load_file(&full_path)
            .inspect_err(|err| error!("failed to load shader source {}: {err}", full_path.display()))
    }
}

impl Drop for ShaderManager {
    fn drop(&mut self) {
        for record in self.programs.values_mut() {
            self.handler.unload(self.device.as_ref(), &mut record.gpu);
        }
    }
}
