use std::rc::Rc;

use log::{debug, info};

use crate::{
    AssetParser, CacheReport, Camera, CameraRenderer, CameraView, DeviceState, GraphicsConfig,
    GraphicsDevice, LightRenderer, ModelRenderer, PassContext, PassManager, ResourceManager,
    Result, Scene, ShaderSources, Transform, UniformCache, world_up,
};

/// What one call to [`Renderer::render_frame`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub camera_found: bool,
    pub models_drawn: usize,
    pub draws_skipped: usize,
    pub skybox_drawn: bool,
    pub lights: usize,
}

pub struct Renderer {
    device: Rc<dyn GraphicsDevice>,
    state: DeviceState,
    uniforms: UniformCache,
    passes: PassManager,
    shader: ShaderSources,
}

impl Renderer {
    pub fn new(device: Rc<dyn GraphicsDevice>, parser: Rc<dyn AssetParser>, config: &GraphicsConfig) -> Self {
        Self {
            state: DeviceState::new(device.clone(), parser, config),
            device,
            uniforms: UniformCache::new(),
            passes: PassManager::standard(),
            shader: config.shader.clone(),
        }
    }

    /// Builds the default program and caches its uniform locations.
    pub fn init(&mut self) -> Result<CacheReport> {
        let program = self.state.init(&self.shader)?;
        self.bind_program(program)
    }

    /// Rebuilds the default program from disk. The current program stays
    /// in use if the rebuild fails.
    pub fn reload_shaders(&mut self) -> Result<CacheReport> {
        let program = self.state.shaders_mut().reload(&self.shader.name)?;
        self.state.set_program(program)?;
        info!("shader {} reloaded", self.shader.name);
        self.bind_program(program)
    }

    fn bind_program(&mut self, program: u32) -> Result<CacheReport> {
        self.uniforms.set_program(program)?;
        self.uniforms.cache_all_locations(self.device.as_ref())
    }

    pub fn toggle_wireframe(&mut self) -> bool {
        self.state.toggle_wireframe()
    }

    pub fn uniforms(&self) -> &UniformCache {
        &self.uniforms
    }

    pub fn device_state(&self) -> &DeviceState {
        &self.state
    }

    pub fn passes(&self) -> &PassManager {
        &self.passes
    }

    /// First enabled camera with a transform, in spawn order.
    fn find_camera(scene: &Scene) -> Option<(Camera, Transform)> {
        let cameras: Vec<(Camera, Transform)> = scene
            .entities_with::<Camera>()
            .into_iter()
            .filter_map(|entity| {
                let camera = *scene.get::<Camera>(entity)?;
                let transform = *scene.get::<Transform>(entity)?;
                camera.enabled.then_some((camera, transform))
            })
            .collect();
        if cameras.len() > 1 {
            debug!("{} enabled cameras, using the first one", cameras.len());
        }
        cameras.into_iter().next()
    }

    /// Clears, pushes camera and light uniforms, then runs the passes.
    /// Without an enabled camera the frame is only cleared.
    pub fn render_frame(&self, scene: &Scene, resources: &ResourceManager, aspect: f32) -> FrameStats {
        let mut stats = FrameStats::default();
        let device = self.device.as_ref();
        device.clear(true, true);

        let Some((camera, transform)) = Self::find_camera(scene) else {
            return stats;
        };
        stats.camera_found = true;

        let view = CameraView::from_transform(transform.position, transform.rotation, world_up());
        CameraRenderer::new(device, &self.uniforms).update_camera_uniforms(
            &view.eye,
            &view.view_matrix(),
            &camera.projection_matrix(aspect),
        );
        stats.lights = LightRenderer::new(device, &self.uniforms).update_light_uniforms(self.state.program(), scene);

        let models = ModelRenderer::new(device, &self.uniforms, resources);
        let mut ctx = PassContext {
            scene,
            models: &models,
            eye: view.eye,
            stats: &mut stats,
        };
        self.passes.execute_all(&mut ctx);

        device.bind_vertex_array(0);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::testing::Fixture;
    use crate::{Colour, DeviceCall, FailPoint, MeshHandle, Model, Vec3};

    const ASPECT: f32 = 16.0 / 9.0;

    #[test]
    fn init_reports_the_whole_contract() {
        let fixture = Fixture::new();
        assert_ne!(fixture.renderer.uniforms().program(), 0);
        assert_eq!(fixture.renderer.device_state().program(), fixture.renderer.uniforms().program());
    }

    #[test]
    fn frame_draws_opaque_then_skybox_then_transparent() {
        let mut fixture = Fixture::new();
        fixture.add_camera(Vec3::zeros());
        let glass = fixture.model("glass");
        let glass_vao = fixture.vao(glass.mesh_handle);
        fixture.scene.spawn((
            glass,
            Transform::from_position(Vec3::new(2.0, 0.0, 0.0)),
            Colour::rgba(1.0, 0.0, 0.0, 0.5),
        ));
        let solid = fixture.model("solid");
        let solid_vao = fixture.vao(solid.mesh_handle);
        fixture.scene.spawn((solid, Transform::default()));
        let sky_vao = fixture.add_skybox();
        fixture.device.clear_calls();

        let stats = fixture.renderer.render_frame(&fixture.scene, &fixture.resources, ASPECT);
        assert_eq!(fixture.device.draws(), vec![solid_vao, sky_vao, glass_vao]);
        assert!(stats.camera_found);
        assert!(stats.skybox_drawn);
        assert_eq!(stats.models_drawn, 2);
        assert_eq!(stats.draws_skipped, 0);

        let calls = fixture.device.calls();
        assert_eq!(calls.first(), Some(&DeviceCall::Clear { colour: true, depth: true }));
        assert_eq!(calls.last(), Some(&DeviceCall::BindVertexArray(0)));
    }

    #[test]
    fn frame_without_camera_only_clears() {
        let mut fixture = Fixture::new();
        let model = fixture.model("solid");
        fixture.scene.spawn((model, Transform::default()));
        fixture.scene.spawn((
            Camera {
                enabled: false,
                ..Default::default()
            },
            Transform::default(),
        ));
        fixture.device.clear_calls();

        let stats = fixture.renderer.render_frame(&fixture.scene, &fixture.resources, ASPECT);
        assert_eq!(stats, FrameStats::default());
        assert_eq!(fixture.device.calls(), vec![DeviceCall::Clear { colour: true, depth: true }]);
    }

    #[test]
    fn unresolved_models_are_skipped_and_the_frame_continues() {
        let mut fixture = Fixture::new();
        fixture.add_camera(Vec3::zeros());
        let mut ghost = Model::new("ghost", "ghost.ply");
        ghost.mesh_handle = MeshHandle::from_raw(42);
        fixture.scene.spawn((ghost, Transform::default()));
        let solid = fixture.model("solid");
        let solid_vao = fixture.vao(solid.mesh_handle);
        fixture.scene.spawn((solid, Transform::default()));

        let stats = fixture.renderer.render_frame(&fixture.scene, &fixture.resources, ASPECT);
        assert_eq!(stats.models_drawn, 1);
        assert_eq!(stats.draws_skipped, 1);
        assert_eq!(fixture.device.draws(), vec![solid_vao]);
    }

    #[test]
    fn transparent_models_composite_back_to_front() {
        let mut fixture = Fixture::new();
        fixture.add_camera(Vec3::zeros());
        let mut vaos = Vec::new();
        for (name, x) in [("one", 1.0), ("five", 5.0), ("three", 3.0)] {
            let model = fixture.model(name);
            vaos.push(fixture.vao(model.mesh_handle));
            fixture.scene.spawn((
                model,
                Transform::from_position(Vec3::new(x, 0.0, 0.0)),
                Colour::rgba(1.0, 1.0, 1.0, 0.25),
            ));
        }
        fixture.device.clear_calls();

        fixture.renderer.render_frame(&fixture.scene, &fixture.resources, ASPECT);
        assert_eq!(fixture.device.draws(), vec![vaos[1], vaos[2], vaos[0]]);
    }

    #[test]
    fn equally_distant_transparent_models_keep_spawn_order() {
        let mut fixture = Fixture::new();
        fixture.add_camera(Vec3::zeros());
        let mut vaos = Vec::new();
        for (name, position) in [
            ("east", Vec3::new(4.0, 0.0, 0.0)),
            ("north", Vec3::new(0.0, 0.0, 4.0)),
            ("up", Vec3::new(0.0, 4.0, 0.0)),
        ] {
            let model = fixture.model(name);
            vaos.push(fixture.vao(model.mesh_handle));
            fixture.scene.spawn((
                model,
                Transform::from_position(position),
                Colour::rgba(1.0, 1.0, 1.0, 0.5),
            ));
        }
        fixture.device.clear_calls();

        fixture.renderer.render_frame(&fixture.scene, &fixture.resources, ASPECT);
        assert_eq!(fixture.device.draws(), vaos);
    }

    #[test]
    fn first_enabled_camera_wins() {
        let mut fixture = Fixture::new();
        fixture.scene.spawn((
            Camera {
                enabled: false,
                ..Default::default()
            },
            Transform::from_position(Vec3::new(9.0, 9.0, 9.0)),
        ));
        fixture.add_camera(Vec3::new(1.0, 2.0, 3.0));
        fixture.add_camera(Vec3::new(4.0, 5.0, 6.0));

        fixture.renderer.render_frame(&fixture.scene, &fixture.resources, ASPECT);
        assert_eq!(
            fixture.device.uniform("eyePos"),
            Some(crate::UniformValue::Vec3([1.0, 2.0, 3.0]))
        );
    }

    #[test]
    fn failed_reload_keeps_the_current_program() {
        let mut fixture = Fixture::new();
        let program = fixture.renderer.uniforms().program();
        fixture.device.fail_on(FailPoint::Link);
        assert!(fixture.renderer.reload_shaders().is_err());
        assert_eq!(fixture.renderer.uniforms().program(), program);
        assert!(fixture.device.is_program(program));

        fixture.device.clear_failures();
        fixture.renderer.reload_shaders().unwrap();
        let reloaded = fixture.renderer.uniforms().program();
        assert_ne!(reloaded, program);
        assert!(!fixture.device.is_program(program));
    }
}
