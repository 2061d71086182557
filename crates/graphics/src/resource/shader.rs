/// Shader sources plus the paths they were read from.
///
/// The paths are kept after upload so a program can be rebuilt from disk.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ShaderCpu {
    pub vertex_source: String,
    pub fragment_source: String,
    pub vertex_path: String,
    pub fragment_path: String,
}

impl ShaderCpu {
    pub fn empty(&self) -> bool {
        self.vertex_source.is_empty() || self.fragment_source.is_empty()
    }

    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

/// Linked program and the two stage objects it was built from.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ShaderGpu {
    pub program: u32,
    pub vertex_shader: u32,
    pub fragment_shader: u32,
    pub linked: bool,
}

impl ShaderGpu {
    pub fn empty(&self) -> bool {
        self.program == 0 || !self.linked
    }

    pub fn is_zeroed(&self) -> bool {
        self.program == 0 && self.vertex_shader == 0 && self.fragment_shader == 0
    }

    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}
