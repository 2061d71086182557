//! Composants de scène lus par le renderer et par le chargeur de ressources.

use crate::{MeshHandle, TextureHandle, Vec4};

/// Number of 2D texture slots a model can blend.
pub const NUM_TEXTURES: usize = 4;

/// Name of the model (and of the cube texture) drawn as the skybox.
pub const SKYBOX_NAME: &str = "skybox";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColourMode {
    #[default]
    Solid = 0,
    VertexColour = 1,
    Random = 2,
    Height = 3,
}

/// Renderable instance of a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub name: String,
    pub mesh_path: String,
    pub mesh_handle: MeshHandle,
    pub texture_names: [String; NUM_TEXTURES],
    pub texture_handles: [TextureHandle; NUM_TEXTURES],
    pub texture_mix_ratio: [f32; NUM_TEXTURES],
    pub use_textures: bool,
    pub is_visible: bool,
    pub is_lit: bool,
    pub colour_mode: ColourMode,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            name: String::new(),
            mesh_path: String::new(),
            mesh_handle: MeshHandle::INVALID,
            texture_names: Default::default(),
            texture_handles: [TextureHandle::INVALID; NUM_TEXTURES],
            texture_mix_ratio: [0.0; NUM_TEXTURES],
            use_textures: false,
            is_visible: true,
            is_lit: true,
            colour_mode: ColourMode::default(),
        }
    }
}

impl Model {
    pub fn new(name: impl Into<String>, mesh_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mesh_path: mesh_path.into(),
            ..Default::default()
        }
    }

    pub fn is_skybox(&self) -> bool {
        self.name == SKYBOX_NAME
    }

    /// Adds a named texture in the first free slot. Ignored once all slots are taken.
    pub fn with_texture(mut self, name: impl Into<String>, mix_ratio: f32) -> Self {
        if let Some(slot) = self.texture_names.iter().position(String::is_empty) {
            self.texture_names[slot] = name.into();
            self.texture_mix_ratio[slot] = mix_ratio;
            self.use_textures = true;
        }
        self
    }
}

/// Colour override (rgba) and specular (rgb + power).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colour {
    pub colour: Vec4,
    pub specular: Vec4,
}

impl Default for Colour {
    fn default() -> Self {
        Self {
            colour: Vec4::new(1.0, 1.0, 1.0, 1.0),
            specular: Vec4::new(1.0, 1.0, 1.0, 1.0),
        }
    }
}

impl Colour {
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            colour: Vec4::new(r, g, b, a),
            ..Default::default()
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.colour.w >= 1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightType {
    #[default]
    Point = 0,
    Spot = 1,
    Directional = 2,
}

/// Light source. Position and direction come from the entity's transform,
/// the diffuse colour from its [`Colour`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub enabled: bool,
    pub light_type: LightType,
    /// Constant, linear, quadratic, cutoff distance.
    pub attenuation: Vec4,
    /// Spot inner/outer angles.
    pub param1: [f32; 2],
}

impl Default for Light {
    fn default() -> Self {
        Self {
            enabled: true,
            light_type: LightType::default(),
            attenuation: Vec4::new(1.0, 0.1, 0.01, 100.0),
            param1: [0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    Triangle,
    Square,
    Cube,
}

/// Procedural mesh attached to an entity; sized by the entity's transform scale.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub name: String,
    pub primitive_type: PrimitiveType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridType {
    Square,
    Cube,
}

/// `count` instances of one shared mesh laid out on a square grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub name: String,
    pub grid_type: GridType,
    pub count: u32,
    pub spacing: f32,
}

impl Grid {
    pub fn shared_mesh_name(&self) -> String {
        let suffix = match self.grid_type {
            GridType::Square => "_sharedSquare",
            GridType::Cube => "_sharedCube",
        };
        format!("{}{}", self.name, suffix)
    }
}

/// Texture declaration: a 2D texture uses `faces[0]`, a cube map all six.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextureData {
    pub name: String,
    pub is_cube: bool,
    pub faces: [String; 6],
}

impl TextureData {
    pub fn texture_2d(name: impl Into<String>, path: impl Into<String>) -> Self {
        let mut faces: [String; 6] = Default::default();
        faces[0] = path.into();
        Self {
            name: name.into(),
            is_cube: false,
            faces,
        }
    }

    pub fn cube(name: impl Into<String>, faces: [String; 6]) -> Self {
        Self {
            name: name.into(),
            is_cube: true,
            faces,
        }
    }
}
