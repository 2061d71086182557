use std::path::{Path, PathBuf};

/// Whether decoded vertex/pixel data is kept on the host after upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CpuRetention {
    #[default]
    Free,
    Keep,
}

/// Default program built by [`crate::DeviceState::init`]. Paths are relative to `shaders/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub name: String,
    pub vertex: String,
    pub fragment: String,
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self {
            name: "shader1".to_string(),
            vertex: "vertex_shader.glsl".to_string(),
            fragment: "fragment_shader.glsl".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsConfig {
    pub base_path: PathBuf,
    pub cpu_retention: CpuRetention,
    pub generate_mipmaps: bool,
    pub clear_colour: [f32; 4],
    pub shader: ShaderSources,
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("assets"),
            cpu_retention: CpuRetention::default(),
            generate_mipmaps: true,
            clear_colour: [0.2, 0.2, 0.2, 1.0],
            shader: ShaderSources::default(),
        }
    }
}

impl GraphicsConfig {
    pub fn models_dir(&self) -> PathBuf {
        models_dir(&self.base_path)
    }

    pub fn textures_dir(&self) -> PathBuf {
        textures_dir(&self.base_path)
    }

    pub fn shaders_dir(&self) -> PathBuf {
        shaders_dir(&self.base_path)
    }
}

pub(crate) fn models_dir(base: &Path) -> PathBuf {
    base.join("models")
}

pub(crate) fn textures_dir(base: &Path) -> PathBuf {
    base.join("textures")
}

pub(crate) fn shaders_dir(base: &Path) -> PathBuf {
    base.join("shaders")
}
