use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::{
    Colour, Grid, GraphicsError, GridType, MeshFactory, Model, Primitive, ResourceManager, Result,
    SKYBOX_NAME, Scene, TextureData, Transform, Vec3,
};

/// Registers a scene's resources and writes the resulting handles back into its models.
pub struct ResourceLoader<'a> {
    resources: &'a mut ResourceManager,
    base_path: PathBuf,
}

fn missing(entity: &str, component: &'static str) -> GraphicsError {
    GraphicsError::MissingComponent {
        entity: entity.to_string(),
        component,
    }
}

impl<'a> ResourceLoader<'a> {
    pub fn new(resources: &'a mut ResourceManager) -> Self {
        Self {
            resources,
            base_path: PathBuf::new(),
        }
    }

    /// Meshes then load from `path/models`, textures from `path/textures`.
    pub fn set_base_path(&mut self, path: impl Into<PathBuf>) {
        self.base_path = path.into();
        self.resources.set_base_path(&self.base_path);
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Gives every [`Model`] the handle of its `mesh_path`, loading meshes as needed.
    pub fn load_meshes(&mut self, scene: &Scene) -> Result<usize> {
        let entities = scene.entities_with::<Model>();
        for &entity in &entities {
            let Some(mut model) = scene.get_mut::<Model>(entity) else {
                continue;
            };
            model.mesh_handle = self.resources.add_mesh(&model.mesh_path)?;
        }
        debug!("loaded and registered {} meshes", entities.len());
        Ok(entities.len())
    }

    pub fn load_textures(&mut self, textures: &[TextureData]) -> Result<usize> {
        for texture in textures {
            let handle = if texture.is_cube {
                self.resources.add_texture_cube(&texture.name, &texture.faces)?
            } else {
                self.resources.add_texture(&texture.name, &texture.faces[0])?
            };
            if self.resources.get_texture_id(handle) == 0 {
                return Err(GraphicsError::MissingTexture {
                    name: texture.name.clone(),
                });
            }
        }
        debug!("loaded and added {} textures", textures.len());
        Ok(textures.len())
    }

    /// Resolves model texture names to handles. The skybox model always samples
    /// the `skybox` texture from slot 0.
    pub fn process_texture_connections(&mut self, scene: &Scene) -> Result<()> {
        for entity in scene.entities_with::<Model>() {
            let Some(mut model) = scene.get_mut::<Model>(entity) else {
                continue;
            };

            if model.is_skybox() {
                let handle = self.resources.get_texture_handle(SKYBOX_NAME);
                if !handle.is_valid() {
                    return Err(GraphicsError::MissingTexture {
                        name: SKYBOX_NAME.to_string(),
                    });
                }
                model.texture_handles[0] = handle;
                continue;
            }

            if !model.use_textures {
                continue;
            }

            let model = &mut *model;
            for (name, handle) in model.texture_names.iter().zip(model.texture_handles.iter_mut()) {
                if name.is_empty() {
                    continue;
                }
                *handle = self.resources.get_texture_handle(name);
                if !handle.is_valid() {
                    return Err(GraphicsError::MissingTexture { name: name.clone() });
                }
            }
        }
        Ok(())
    }

    /// Builds a mesh for each [`Primitive`] (sized by its transform scale) and attaches a [`Model`].
    pub fn process_primitives(&mut self, scene: &mut Scene) -> Result<usize> {
        let entities = scene.entities_with::<Primitive>();
        for &entity in &entities {
            let Some(primitive) = scene.get::<Primitive>(entity).map(|primitive| (*primitive).clone()) else {
                continue;
            };
            let size = scene
                .get::<Transform>(entity)
                .map(|transform| transform.scale)
                .ok_or_else(|| missing(&primitive.name, "Transform"))?;
            let colour = scene.get::<Colour>(entity).map(|colour| *colour).unwrap_or_default();

            let mesh = MeshFactory::primitive(primitive.primitive_type, size, colour.colour);
            let handle = self.resources.add_mesh_data(&primitive.name, mesh)?;

            let mut model = Model::new(primitive.name.clone(), primitive.name.clone());
            model.mesh_handle = handle;
            scene.insert(entity, model);
            debug!("primitive {} -> {handle:?}", primitive.name);
        }
        Ok(entities.len())
    }

    /// Spawns `count` instances per [`Grid`], all sharing one generated mesh.
    pub fn process_grids(&mut self, scene: &mut Scene) -> Result<usize> {
        let mut spawned = 0;
        for entity in scene.entities_with::<Grid>() {
            let Some(grid) = scene.get::<Grid>(entity).map(|grid| (*grid).clone()) else {
                continue;
            };
            let shared_name = grid.shared_mesh_name();
            let size = scene
                .get::<Transform>(entity)
                .map(|transform| transform.scale)
                .ok_or_else(|| missing(&grid.name, "Transform"))?;
            let colour = scene.get::<Colour>(entity).map(|colour| *colour).unwrap_or_default();

            let mesh = MeshFactory::grid_cell(grid.grid_type, size, colour.colour);
            let handle = self.resources.add_mesh_data(&shared_name, mesh)?;

            for (index, position) in grid_positions(&grid).into_iter().enumerate() {
                let mut model = Model::new(format!("{}_instance_{index}", grid.name), shared_name.clone());
                model.mesh_handle = handle;
                scene.spawn((Transform::from_position(position), model));
            }
            spawned += grid.count as usize;
            info!("grid {} spawned {} instances of {shared_name}", grid.name, grid.count);
        }
        Ok(spawned)
    }
}

/// Row-major layout on a `ceil(sqrt(count))` wide square. Square grids stand in
/// the XY plane, cube grids lie on the XZ plane.
fn grid_positions(grid: &Grid) -> Vec<Vec3> {
    let side = (grid.count as f32).sqrt().ceil() as u32;
    (0..grid.count)
        .map(|index| {
            let (row, col) = (index / side, index % side);
            let (x, along) = (grid.spacing * col as f32, grid.spacing * row as f32);
            match grid.grid_type {
                GridType::Square => Vec3::new(x, along, 0.0),
                GridType::Cube => Vec3::new(x, 0.0, along),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::{
        GraphicsConfig, MemoryParser, PrimitiveType, RecordingDevice, TextureHandle, Vertex,
    };

    fn resources() -> (Rc<MemoryParser>, ResourceManager) {
        let device = Rc::new(RecordingDevice::new());
        let parser = Rc::new(MemoryParser::new());
        parser.insert_mesh(
            "tri.ply",
            vec![
                Vertex::new([0.0, 0.0, 0.0], [1.0; 4]),
                Vertex::new([1.0, 0.0, 0.0], [1.0; 4]),
                Vertex::new([0.0, 1.0, 0.0], [1.0; 4]),
            ],
            vec![0, 1, 2],
        );
        for face in ["px.bmp", "nx.bmp", "py.bmp", "ny.bmp", "pz.bmp", "nz.bmp", "brick.bmp"] {
            parser.insert_solid_image(face, 2, [200, 200, 200, 255]);
        }
        let resources = ResourceManager::new(device, parser.clone(), &GraphicsConfig::default());
        (parser, resources)
    }

    fn cube_faces() -> [String; 6] {
        ["px.bmp", "nx.bmp", "py.bmp", "ny.bmp", "pz.bmp", "nz.bmp"].map(String::from)
    }

    #[test]
    fn models_sharing_a_path_share_a_handle() {
        let (parser, mut resources) = resources();
        let mut scene = Scene::new("test");
        let a = scene.spawn((Model::new("a", "tri.ply"), Transform::default()));
        let b = scene.spawn((Model::new("b", "tri.ply"), Transform::default()));

        let mut loader = ResourceLoader::new(&mut resources);
        assert_eq!(loader.load_meshes(&scene).unwrap(), 2);

        let handle_a = scene.get::<Model>(a).unwrap().mesh_handle;
        assert!(handle_a.is_valid());
        assert_eq!(scene.get::<Model>(b).unwrap().mesh_handle, handle_a);
        assert_eq!(parser.decodes(), 1);
    }

    #[test]
    fn missing_mesh_aborts_loading() {
        let (_parser, mut resources) = resources();
        let mut scene = Scene::new("test");
        scene.spawn((Model::new("a", "missing.ply"),));
        let mut loader = ResourceLoader::new(&mut resources);
        assert!(matches!(loader.load_meshes(&scene), Err(GraphicsError::Decode { .. })));
    }

    #[test]
    fn texture_connections() {
        let (_parser, mut resources) = resources();
        let mut scene = Scene::new("test");
        let sky = scene.spawn((Model::new(SKYBOX_NAME, "tri.ply"),));
        let wall = scene.spawn((Model::new("wall", "tri.ply").with_texture("brick", 1.0),));
        let plain = scene.spawn((Model::new("plain", "tri.ply"),));

        let mut loader = ResourceLoader::new(&mut resources);
        loader
            .load_textures(&[
                TextureData::cube(SKYBOX_NAME, cube_faces()),
                TextureData::texture_2d("brick", "brick.bmp"),
            ])
            .unwrap();
        loader.process_texture_connections(&scene).unwrap();

        assert_eq!(
            scene.get::<Model>(sky).unwrap().texture_handles[0],
            resources.get_texture_handle(SKYBOX_NAME)
        );
        assert_eq!(
            scene.get::<Model>(wall).unwrap().texture_handles[0],
            resources.get_texture_handle("brick")
        );
        assert_eq!(scene.get::<Model>(plain).unwrap().texture_handles[0], TextureHandle::INVALID);
    }

    #[test]
    fn unknown_texture_name_is_an_error() {
        let (_parser, mut resources) = resources();
        let mut scene = Scene::new("test");
        scene.spawn((Model::new("wall", "tri.ply").with_texture("marble", 1.0),));
        let mut loader = ResourceLoader::new(&mut resources);
        let err = loader.process_texture_connections(&scene).unwrap_err();
        assert!(matches!(err, GraphicsError::MissingTexture { name } if name == "marble"));
    }

    #[test]
    fn primitives_get_a_model() {
        let (_parser, mut resources) = resources();
        let mut scene = Scene::new("test");
        let entity = scene.spawn((
            Primitive {
                name: "floor".to_string(),
                primitive_type: PrimitiveType::Square,
            },
            Transform::default().with_scale(Vec3::new(10.0, 10.0, 1.0)),
        ));

        let mut loader = ResourceLoader::new(&mut resources);
        assert_eq!(loader.process_primitives(&mut scene).unwrap(), 1);

        let model = scene.get::<Model>(entity).unwrap();
        assert_eq!(model.name, "floor");
        assert!(!model.use_textures);
        assert_eq!(resources.get_mesh_handle("floor"), model.mesh_handle);
    }

    #[test]
    fn primitive_without_transform_fails() {
        let (_parser, mut resources) = resources();
        let mut scene = Scene::new("test");
        scene.spawn((Primitive {
            name: "lonely".to_string(),
            primitive_type: PrimitiveType::Cube,
        },));
        let mut loader = ResourceLoader::new(&mut resources);
        let err = loader.process_primitives(&mut scene).unwrap_err();
        assert!(matches!(err, GraphicsError::MissingComponent { component: "Transform", .. }));
    }

    #[test]
    fn grid_instances_share_one_mesh() {
        let (_parser, mut resources) = resources();
        let mut scene = Scene::new("test");
        scene.spawn((
            Grid {
                name: "crates".to_string(),
                grid_type: GridType::Cube,
                count: 5,
                spacing: 2.0,
            },
            Transform::default(),
        ));

        let mut loader = ResourceLoader::new(&mut resources);
        assert_eq!(loader.process_grids(&mut scene).unwrap(), 5);

        let shared = resources.get_mesh_handle("crates_sharedCube");
        assert!(shared.is_valid());
        assert_eq!(resources.mesh_manager().len(), 1);

        let last = scene.find_model("crates_instance_4").unwrap();
        assert_eq!(scene.get::<Model>(last).unwrap().mesh_handle, shared);
        // 5 instances on a 3-wide grid: index 4 is row 1, column 1.
        assert_eq!(scene.get::<Transform>(last).unwrap().position, Vec3::new(2.0, 0.0, 2.0));
    }

    #[test]
    fn square_grids_stand_upright() {
        let grid = Grid {
            name: "wall".to_string(),
            grid_type: GridType::Square,
            count: 4,
            spacing: 1.5,
        };
        let positions = grid_positions(&grid);
        assert_eq!(positions[3], Vec3::new(1.5, 1.5, 0.0));
        assert!(grid_positions(&Grid { count: 0, ..grid }).is_empty());
    }

    #[test]
    fn base_path_reaches_the_managers() {
        let (_parser, mut resources) = resources();
        let mut loader = ResourceLoader::new(&mut resources);
        loader.set_base_path("game");
        assert_eq!(loader.base_path(), Path::new("game"));
        assert_eq!(resources.mesh_manager().base_path(), Path::new("game/models"));
    }
}
