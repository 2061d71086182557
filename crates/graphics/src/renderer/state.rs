use std::rc::Rc;

use log::{debug, info};

use crate::config::shaders_dir;
use crate::{
    AssetParser, DepthFunc, Face, GraphicsConfig, GraphicsDevice, GraphicsError, PolygonMode,
    RenderState, Result, ShaderManager, ShaderSources,
};

/// Program courant et état fixe du device (profondeur, culling, blending, wireframe).
pub struct DeviceState {
    device: Rc<dyn GraphicsDevice>,
    shaders: ShaderManager,
    program: u32,
    wireframe: bool,
    clear_colour: [f32; 4],
}

impl DeviceState {
    pub fn new(device: Rc<dyn GraphicsDevice>, parser: Rc<dyn AssetParser>, config: &GraphicsConfig) -> Self {
        let mut shaders = ShaderManager::new(device.clone(), parser);
        shaders.set_base_path(shaders_dir(&config.base_path));
        Self {
            device,
            shaders,
            program: 0,
            wireframe: false,
            clear_colour: config.clear_colour,
        }
    }

    /// Builds the default program, makes it current and applies the default state.
    pub fn init(&mut self, sources: &ShaderSources) -> Result<u32> {
        let program = self
            .shaders
            .create_program_from_paths(&sources.name, &sources.vertex, &sources.fragment)?;
        self.set_program(program)?;
        self.apply_defaults();
        info!("device state ready with program {} ({program})", sources.name);
        Ok(program)
    }

    pub fn apply_defaults(&self) {
        for state in [
            RenderState::DepthTest(true),
            RenderState::DepthFunc(DepthFunc::LessEqual),
            RenderState::CullFace(true),
            RenderState::CullMode(Face::Back),
            RenderState::Blend(true),
            RenderState::ClearColour(self.clear_colour),
        ] {
            self.device.set_state(state);
        }
    }

    pub fn set_program(&mut self, program: u32) -> Result<()> {
        if program == 0 {
            return Err(GraphicsError::InvalidProgram);
        }
        self.device.use_program(program);
        self.program = program;
        Ok(())
    }

    pub fn program(&self) -> u32 {
        self.program
    }

    /// Flips between filled and line polygons. Returns whether wireframe is now on.
    pub fn toggle_wireframe(&mut self) -> bool {
        self.wireframe = !self.wireframe;
        let mode = if self.wireframe { PolygonMode::Line } else { PolygonMode::Fill };
        self.device.set_state(RenderState::PolygonMode(mode));
        debug!("wireframe {}", if self.wireframe { "on" } else { "off" });
        self.wireframe
    }

    pub fn is_wireframe(&self) -> bool {
        self.wireframe
    }

    pub fn shaders(&self) -> &ShaderManager {
        &self.shaders
    }

    pub fn shaders_mut(&mut self) -> &mut ShaderManager {
        &mut self.shaders
    }
}
