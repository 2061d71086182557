//! Shared setup for renderer tests.

use std::rc::Rc;

use crate::{
    Camera, GraphicsConfig, GraphicsDevice, MemoryParser, MeshFactory, MeshHandle, Model,
    ModelRenderer, RecordingDevice, Renderer, ResourceManager, SKYBOX_NAME, Scene, Transform,
    Vec3, Vec4,
};

pub(crate) struct Fixture {
    pub device: Rc<RecordingDevice>,
    pub parser: Rc<MemoryParser>,
    pub resources: ResourceManager,
    pub renderer: Renderer,
    pub scene: Scene,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_hidden_uniforms(&[])
    }

    /// Renderer initialised against a program that lacks `hidden` uniforms.
    pub fn with_hidden_uniforms(hidden: &[&str]) -> Self {
        let device = Rc::new(RecordingDevice::new());
        for name in hidden {
            device.hide_uniform(name);
        }
        let parser = Rc::new(MemoryParser::new());
        parser.insert_text("vertex_shader.glsl", "void main() {}");
        parser.insert_text("fragment_shader.glsl", "void main() {}");

        let config = GraphicsConfig::default();
        let resources = ResourceManager::new(device.clone(), parser.clone(), &config);
        let mut renderer = Renderer::new(device.clone(), parser.clone(), &config);
        renderer.init().unwrap();

        Self {
            device,
            parser,
            resources,
            renderer,
            scene: Scene::new("fixture"),
        }
    }

    /// A model named `name` backed by its own cube mesh.
    pub fn model(&mut self, name: &str) -> Model {
        let path = format!("{name}.mesh");
        let mesh = MeshFactory::cube(Vec3::new(1.0, 1.0, 1.0), Vec4::new(1.0, 1.0, 1.0, 1.0));
        let mut model = Model::new(name, path.clone());
        model.mesh_handle = self.resources.add_mesh_data(&path, mesh).unwrap();
        model
    }

    pub fn vao(&self, handle: MeshHandle) -> u32 {
        self.resources.get_mesh_gpu(handle).unwrap().vertex_array
    }

    pub fn model_renderer(&self) -> ModelRenderer<'_> {
        ModelRenderer::new(self.device.as_ref() as &dyn GraphicsDevice, self.renderer.uniforms(), &self.resources)
    }

    /// Spawns the skybox model with its cube texture. Returns the skybox vertex array.
    pub fn add_skybox(&mut self) -> u32 {
        let faces = ["right", "left", "top", "bottom", "front", "back"].map(|face| {
            let file = format!("sky_{face}.png");
            self.parser.insert_solid_image(&file, 2, [40, 80, 200, 255]);
            file
        });
        let texture = self.resources.add_texture_cube(SKYBOX_NAME, &faces).unwrap();

        let mut model = self.model(SKYBOX_NAME);
        model.texture_names[0] = SKYBOX_NAME.to_string();
        model.texture_handles[0] = texture;
        let vao = self.vao(model.mesh_handle);
        self.scene
            .spawn((model, Transform::default().with_scale(Vec3::new(100.0, 100.0, 100.0))));
        vao
    }

    pub fn add_camera(&mut self, position: Vec3) {
        self.scene.spawn((Camera::default(), Transform::from_position(position)));
    }
}
