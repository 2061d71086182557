//! The shader contract: every uniform this engine pushes, in one table.

use std::fmt;

/// Texture unit the skybox cube map is bound to.
pub const SKYBOX_TEXTURE_UNIT: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformGroup {
    Camera,
    Model,
    Light,
}

impl UniformGroup {
    pub const ALL: [UniformGroup; 3] = [UniformGroup::Camera, UniformGroup::Model, UniformGroup::Light];
}

impl fmt::Display for UniformGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UniformGroup::Camera => "camera",
            UniformGroup::Model => "model",
            UniformGroup::Light => "light",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformType {
    Bool,
    Int,
    Vec2,
    Vec3,
    Vec4,
    Mat4,
    /// Sampler bound once to a fixed texture unit.
    Sampler(u32),
}

/// Index of a uniform in [`UNIFORMS`] and in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformSlot {
    EyePosition,
    View,
    Projection,

    IsSkybox,
    Model,
    ModelInverseTranspose,
    ColourMode,
    HasVertexColour,
    ColourOverride,
    Specular,
    YMinMax,
    Seed,
    IsLit,
    UseTextures,
    TextureMixRatios,
    Sampler0,
    Sampler1,
    Sampler2,
    Sampler3,
    SkyboxSampler,

    LightCount,
    AmbientLight,
    FirstLightPosition,
    FirstLightDiffuse,
    FirstLightAttenuation,
    FirstLightDirection,
    FirstLightParam1,
    FirstLightParam2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformSpec {
    pub slot: UniformSlot,
    pub name: &'static str,
    pub group: UniformGroup,
    pub ty: UniformType,
}

const fn spec(slot: UniformSlot, name: &'static str, group: UniformGroup, ty: UniformType) -> UniformSpec {
    UniformSpec { slot, name, group, ty }
}

use UniformGroup::{Camera, Light, Model};
use UniformType::*;

pub const UNIFORM_COUNT: usize = 28;

/// Ordered like [`UniformSlot`].
pub const UNIFORMS: [UniformSpec; UNIFORM_COUNT] = [
    spec(UniformSlot::EyePosition, "eyePos", Camera, Vec3),
    spec(UniformSlot::View, "mView", Camera, Mat4),
    spec(UniformSlot::Projection, "mProj", Camera, Mat4),
    spec(UniformSlot::IsSkybox, "bIsSkybox", Model, Bool),
    spec(UniformSlot::Model, "mModel", Model, Mat4),
    spec(UniformSlot::ModelInverseTranspose, "mModel_InverseTranspose", Model, Mat4),
    spec(UniformSlot::ColourMode, "colourMode", Model, Int),
    spec(UniformSlot::HasVertexColour, "hasVertexColour", Model, Bool),
    spec(UniformSlot::ColourOverride, "colourOverride", Model, Vec4),
    spec(UniformSlot::Specular, "vertSpecular", Model, Vec4),
    spec(UniformSlot::YMinMax, "yMin_yMax", Model, Vec2),
    spec(UniformSlot::Seed, "seed", Model, Vec3),
    spec(UniformSlot::IsLit, "bIsLit", Model, Bool),
    spec(UniformSlot::UseTextures, "bUseTextures", Model, Bool),
    spec(UniformSlot::TextureMixRatios, "texMixRatios", Model, Vec4),
    spec(UniformSlot::Sampler0, "textSampler2D_00", Model, Sampler(0)),
    spec(UniformSlot::Sampler1, "textSampler2D_01", Model, Sampler(1)),
    spec(UniformSlot::Sampler2, "textSampler2D_02", Model, Sampler(2)),
    spec(UniformSlot::Sampler3, "textSampler2D_03", Model, Sampler(3)),
    spec(UniformSlot::SkyboxSampler, "skyboxCubeTexture", Model, Sampler(SKYBOX_TEXTURE_UNIT)),
    spec(UniformSlot::LightCount, "lightCount", Light, Int),
    spec(UniformSlot::AmbientLight, "ambientLight", Light, Vec4),
    spec(UniformSlot::FirstLightPosition, "theLights[0].position", Light, Vec4),
    spec(UniformSlot::FirstLightDiffuse, "theLights[0].diffuse", Light, Vec4),
    spec(UniformSlot::FirstLightAttenuation, "theLights[0].attenuation", Light, Vec4),
    spec(UniformSlot::FirstLightDirection, "theLights[0].direction", Light, Vec4),
    spec(UniformSlot::FirstLightParam1, "theLights[0].param1", Light, Vec4),
    spec(UniformSlot::FirstLightParam2, "theLights[0].param2", Light, Vec4),
];

impl UniformSlot {
    pub fn spec(self) -> &'static UniformSpec {
        &UNIFORMS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }
}

/// Fields of one entry of the `theLights` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightField {
    Position,
    Diffuse,
    Attenuation,
    Direction,
    Param1,
    Param2,
}

impl LightField {
    pub const ALL: [LightField; 6] = [
        LightField::Position,
        LightField::Diffuse,
        LightField::Attenuation,
        LightField::Direction,
        LightField::Param1,
        LightField::Param2,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LightField::Position => "position",
            LightField::Diffuse => "diffuse",
            LightField::Attenuation => "attenuation",
            LightField::Direction => "direction",
            LightField::Param1 => "param1",
            LightField::Param2 => "param2",
        }
    }
}

/// `theLights[index].field`
pub fn light_uniform_name(index: usize, field: LightField) -> String {
    format!("theLights[{index}].{}", field.name())
}
