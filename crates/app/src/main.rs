use std::rc::Rc;

use anyhow::{Context, Result};
use log::info;
use starlet_graphics::{
    Camera, Colour, ColourMode, DeviceCall, GraphicsConfig, Grid, GridType, Light, LightType,
    MemoryParser, Model, ObjectKind, Primitive, PrimitiveType, RecordingDevice, Renderer,
    ResourceLoader, ResourceManager, SKYBOX_NAME, Scene, TextureData, Transform, Vec3, Vec4,
    Vertex,
};

const SKY_FACES: [&str; 6] = ["right", "left", "top", "bottom", "front", "back"];

/// Fills the in-memory asset store with everything the demo scene references.
fn seed_assets(parser: &MemoryParser) {
    parser.insert_text("vertex_shader.glsl", "#version 330 core\nvoid main() {}\n");
    parser.insert_text("fragment_shader.glsl", "#version 330 core\nvoid main() {}\n");

    let white = [1.0, 1.0, 1.0, 1.0];
    let pyramid = vec![
        Vertex::new([-1.0, 0.0, -1.0], white),
        Vertex::new([1.0, 0.0, -1.0], white),
        Vertex::new([1.0, 0.0, 1.0], white),
        Vertex::new([-1.0, 0.0, 1.0], white),
        Vertex::new([0.0, 1.5, 0.0], white),
    ];
    let indices = vec![0, 1, 4, 1, 2, 4, 2, 3, 4, 3, 0, 4, 0, 2, 1, 0, 3, 2];
    parser.insert_mesh("pyramid.obj", pyramid.clone(), indices.clone());
    parser.insert_mesh("sky_sphere.obj", pyramid, indices);

    parser.insert_solid_image("marble.png", 4, [220, 220, 210, 255]);
    for face in SKY_FACES {
        parser.insert_solid_image(&format!("sky_{face}.png"), 4, [70, 130, 200, 255]);
    }
}

fn build_scene() -> Scene {
    let mut scene = Scene::new("demo");

    scene.spawn((
        Camera::default(),
        Transform::from_position(Vec3::new(-8.0, 3.0, 0.0)).with_rotation(Vec3::new(-10.0, 0.0, 0.0)),
    ));

    scene.spawn((
        Light::default(),
        Transform::from_position(Vec3::new(0.0, 10.0, 0.0)),
        Colour::rgba(1.0, 0.95, 0.8, 1.0),
    ));
    scene.spawn((
        Light {
            light_type: LightType::Spot,
            param1: [15.0, 25.0],
            ..Default::default()
        },
        Transform::from_position(Vec3::new(5.0, 5.0, 5.0)).with_rotation(Vec3::new(0.0, -1.0, 0.0)),
    ));
    scene.spawn((
        Light {
            enabled: false,
            ..Default::default()
        },
        Transform::default(),
    ));

    let mut statue = Model::new("statue", "pyramid.obj").with_texture("marble", 1.0);
    statue.colour_mode = ColourMode::VertexColour;
    scene.spawn((statue, Transform::default().with_scale(Vec3::new(2.0, 2.0, 2.0))));

    let mut sky = Model::new(SKYBOX_NAME, "sky_sphere.obj");
    sky.is_lit = false;
    scene.spawn((sky, Transform::default().with_scale(Vec3::new(500.0, 500.0, 500.0))));

    scene.spawn((
        Primitive {
            name: "glass_pane".to_string(),
            primitive_type: PrimitiveType::Square,
        },
        Transform::from_position(Vec3::new(2.0, 1.0, 0.0)),
        Colour::rgba(0.4, 0.7, 1.0, 0.35),
    ));
    scene.spawn((
        Primitive {
            name: "crate".to_string(),
            primitive_type: PrimitiveType::Cube,
        },
        Transform::from_position(Vec3::new(0.0, 0.5, 3.0)),
    ));

    scene.spawn((
        Grid {
            name: "floor".to_string(),
            grid_type: GridType::Cube,
            count: 16,
            spacing: 1.1,
        },
        Transform::from_position(Vec3::new(-2.0, -0.5, -2.0)).with_scale(Vec3::new(1.0, 0.1, 1.0)),
        Colour {
            colour: Vec4::new(0.3, 0.3, 0.3, 1.0),
            ..Default::default()
        },
    ));

    scene
}

fn textures() -> Vec<TextureData> {
    let faces = SKY_FACES.map(|face| format!("sky_{face}.png"));
    vec![
        TextureData::texture_2d("marble", "marble.png"),
        TextureData::cube(SKYBOX_NAME, faces),
    ]
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GraphicsConfig::default();
    let device = Rc::new(RecordingDevice::new());
    let parser = Rc::new(MemoryParser::new());
    seed_assets(&parser);

    let mut renderer = Renderer::new(device.clone(), parser.clone(), &config);
    let report = renderer.init().context("failed to initialise the renderer")?;
    info!("uniform contract: {} found, {} missing", report.found, report.missing.len());

    let mut resources = ResourceManager::new(device.clone(), parser.clone(), &config);
    let mut scene = build_scene();
    {
        let mut loader = ResourceLoader::new(&mut resources);
        loader.set_base_path(config.base_path.clone());
        loader.process_primitives(&mut scene)?;
        loader.process_grids(&mut scene)?;
        loader.load_meshes(&scene)?;
        loader.load_textures(&textures())?;
        loader.process_texture_connections(&scene)?;
    }
    info!(
        "scene {} ready: {} entities, {} meshes, {} textures",
        scene.name,
        scene.entity_count(),
        resources.mesh_manager().len(),
        resources.texture_manager().len()
    );

    let stats = renderer.render_frame(&scene, &resources, 16.0 / 9.0);
    info!(
        "frame: camera {}, {} models drawn, {} skipped, skybox {}, {} lights",
        stats.camera_found, stats.models_drawn, stats.draws_skipped, stats.skybox_drawn, stats.lights
    );

    let calls = device.calls();
    let creates = calls
        .iter()
        .filter(|call| matches!(call, DeviceCall::Create { .. }))
        .count();
    let uniforms = calls
        .iter()
        .filter(|call| matches!(call, DeviceCall::SetUniform { .. }))
        .count();
    info!(
        "device: {} calls, {creates} objects created, {} draws, {uniforms} uniform writes, {} live textures",
        calls.len(),
        device.draws().len(),
        device.live_count_of(ObjectKind::Texture)
    );
    Ok(())
}
