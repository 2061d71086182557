use log::warn;

use crate::{
    Colour, Face, GraphicsDevice, GraphicsError, MeshCpu, Model, NUM_TEXTURES, RenderState,
    ResourceManager, Result, SKYBOX_NAME, SKYBOX_TEXTURE_UNIT, Scene, TextureTarget, Transform,
    UniformCache, UniformSlot, UniformValue, Vec3, distance_squared, to_columns,
};

/// Deterministic per-name colour: name bytes summed round-robin into r, g, b,
/// each scaled by 1/255 and wrapped into `[0, 1)`.
pub fn name_seed(name: &str) -> [f32; 3] {
    let mut sums = [0.0f32; 3];
    for (index, byte) in name.bytes().enumerate() {
        sums[index % 3] += byte as f32;
    }
    sums.map(|sum| (sum / 255.0) % 1.0)
}

/// Draw counts of one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawCounts {
    pub drawn: usize,
    pub skipped: usize,
}

impl DrawCounts {
    fn record(&mut self, name: &str, outcome: Result<bool>) {
        match outcome {
            Ok(true) => self.drawn += 1,
            Ok(false) => {}
            Err(err) => {
                warn!("skipped draw of {name}: {err}");
                self.skipped += 1;
            }
        }
    }
}

/// Pushes per-instance uniforms and issues draws.
pub struct ModelRenderer<'a> {
    device: &'a dyn GraphicsDevice,
    uniforms: &'a UniformCache,
    resources: &'a ResourceManager,
}

impl<'a> ModelRenderer<'a> {
    pub fn new(device: &'a dyn GraphicsDevice, uniforms: &'a UniformCache, resources: &'a ResourceManager) -> Self {
        Self {
            device,
            uniforms,
            resources,
        }
    }

    fn set(&self, slot: UniformSlot, value: UniformValue) {
        self.device.set_uniform(self.uniforms.get(slot), value);
    }

    fn flag(&self, slot: UniformSlot, value: bool) {
        self.set(slot, UniformValue::Int(value as i32));
    }

    fn update_model_uniforms(&self, model: &Model, mesh: &MeshCpu, transform: &Transform, colour: &Colour) {
        self.set(UniformSlot::Model, UniformValue::Mat4(to_columns(&transform.matrix())));
        self.set(
            UniformSlot::ModelInverseTranspose,
            UniformValue::Mat4(to_columns(&transform.normal_matrix())),
        );
        self.set(UniformSlot::ColourOverride, UniformValue::Vec4(colour.colour.into()));
        self.set(UniformSlot::Specular, UniformValue::Vec4(colour.specular.into()));
        self.flag(UniformSlot::HasVertexColour, mesh.has_colours);
        self.set(UniformSlot::YMinMax, UniformValue::Vec2([mesh.min_y, mesh.max_y]));
        self.flag(UniformSlot::UseTextures, model.use_textures);
        self.set(UniformSlot::ColourMode, UniformValue::Int(model.colour_mode as i32));
        self.set(UniformSlot::Seed, UniformValue::Vec3(name_seed(&model.name)));
    }

    fn bind_textures(&self, model: &Model) -> Result<()> {
        self.set(UniformSlot::TextureMixRatios, UniformValue::Vec4(model.texture_mix_ratio));
        for slot in 0..NUM_TEXTURES {
            let name = &model.texture_names[slot];
            if name.is_empty() {
                continue;
            }
            let id = self.resources.get_texture_id(model.texture_handles[slot]);
            if id == 0 {
                return Err(GraphicsError::MissingTexture { name: name.clone() });
            }
            self.device.bind_texture(slot as u32, TextureTarget::Texture2D, id);
        }
        Ok(())
    }

    /// Draws one instance. `Ok(false)` when the model is hidden.
    ///
    /// Translucent instances are drawn with depth writes off.
    pub fn draw_model(&self, model: &Model, transform: &Transform, colour: &Colour) -> Result<bool> {
        if !model.is_visible {
            return Ok(false);
        }
        let (mesh, gpu) = self.resources.resolve_mesh(model.mesh_handle)?;

        self.update_model_uniforms(model, mesh, transform, colour);
        if model.use_textures {
            self.bind_textures(model)?;
        }
        self.flag(UniformSlot::IsLit, model.is_lit);

        let translucent = !colour.is_opaque();
        if translucent {
            self.device.set_state(RenderState::DepthMask(false));
        }
        self.device.draw_indexed(gpu.vertex_array, gpu.index_count);
        self.device.bind_vertex_array(0);
        if translucent {
            self.device.set_state(RenderState::DepthMask(true));
        }
        Ok(true)
    }

    /// Every non-skybox model with a transform and an opaque (or no) colour.
    pub fn draw_opaque_models(&self, scene: &Scene) -> DrawCounts {
        let mut counts = DrawCounts::default();
        for entity in scene.entities_with::<Model>() {
            let (Some(model), Some(transform)) = (scene.get::<Model>(entity), scene.get::<Transform>(entity)) else {
                continue;
            };
            if model.is_skybox() {
                continue;
            }
            let colour = scene.get::<Colour>(entity).map(|colour| *colour).unwrap_or_default();
            if !colour.is_opaque() {
                continue;
            }
            counts.record(&model.name, self.draw_model(&model, &transform, &colour));
        }
        counts
    }

    /// Models whose colour has alpha below 1, farthest from `eye` first.
    pub fn draw_transparent_models(&self, scene: &Scene, eye: &Vec3) -> DrawCounts {
        let mut instances: Vec<_> = scene
            .entities_with::<Model>()
            .into_iter()
            .filter_map(|entity| {
                let model = scene.get::<Model>(entity)?;
                let transform = *scene.get::<Transform>(entity)?;
                let colour = *scene.get::<Colour>(entity)?;
                (!model.is_skybox() && !colour.is_opaque()).then(|| {
                    let distance = distance_squared(&transform.position, eye);
                    (entity, transform, colour, distance)
                })
            })
            .collect();
        instances.sort_by(|a, b| b.3.total_cmp(&a.3));

        let mut counts = DrawCounts::default();
        for (entity, transform, colour, _) in instances {
            let Some(model) = scene.get::<Model>(entity) else {
                continue;
            };
            counts.record(&model.name, self.draw_model(&model, &transform, &colour));
        }
        counts
    }

    /// Draws the `skybox` model around `eye` with front-face culling and depth
    /// writes off. `Ok(false)` when the scene has no skybox with a transform.
    pub fn draw_skybox(&self, scene: &Scene, eye: &Vec3) -> Result<bool> {
        let Some(entity) = scene.find_model(SKYBOX_NAME) else {
            return Ok(false);
        };
        let (Some(model), Some(transform)) = (scene.get::<Model>(entity), scene.get::<Transform>(entity)) else {
            return Ok(false);
        };

        let texture = self.resources.get_texture_id(model.texture_handles[0]);
        if texture == 0 {
            return Err(GraphicsError::MissingTexture {
                name: SKYBOX_NAME.to_string(),
            });
        }

        self.device.set_state(RenderState::CullFace(true));
        self.device.set_state(RenderState::CullMode(Face::Front));
        self.device.set_state(RenderState::DepthMask(false));
        self.flag(UniformSlot::IsSkybox, true);
        self.device.bind_texture(SKYBOX_TEXTURE_UNIT, TextureTarget::CubeMap, texture);

        let mut sky = (*model).clone();
        sky.is_visible = true;
        let around_eye = Transform::from_position(*eye).with_scale(transform.scale);
        let drawn = self.draw_model(&sky, &around_eye, &Colour::default());

        self.flag(UniformSlot::IsSkybox, false);
        self.device.set_state(RenderState::DepthMask(true));
        self.device.set_state(RenderState::CullMode(Face::Back));
        drawn
    }
}
