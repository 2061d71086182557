use hecs::{Component, DynamicBundle, Entity, World};

use crate::{Model, Vec4};

/// Scène : un `hecs::World` plus quelques helpers utilisés par le chargeur et le renderer.
///
/// Les requêtes "toutes les entités de type T" sont rendues dans l'ordre de création
/// (id d'entité croissant), pour que le rendu ne dépende pas de l'ordre des archétypes.
pub struct Scene {
    pub name: String,
    pub ambient_light: Vec4,
    world: World,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("scene")
    }
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient_light: Vec4::new(0.1, 0.1, 0.1, 1.0),
            world: World::new(),
        }
    }

    pub fn spawn(&mut self, components: impl DynamicBundle) -> Entity {
        self.world.spawn(components)
    }

    pub fn insert<T: Component>(&mut self, entity: Entity, component: T) -> bool {
        self.world.insert_one(entity, component).is_ok()
    }

    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.world
            .entity(entity)
            .map(|entity| entity.has::<T>())
            .unwrap_or(false)
    }

    pub fn get<T: Component>(&self, entity: Entity) -> Option<hecs::Ref<'_, T>> {
        self.world.get::<&T>(entity).ok()
    }

    pub fn get_mut<T: Component>(&self, entity: Entity) -> Option<hecs::RefMut<'_, T>> {
        self.world.get::<&mut T>(entity).ok()
    }

    /// Every entity carrying a `T`, in creation order.
    pub fn entities_with<T: Component>(&self) -> Vec<Entity> {
        let mut entities: Vec<Entity> = self
            .world
            .query::<&T>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();
        entities.sort_by_key(|entity| entity.id());
        entities
    }

    /// First entity whose [`Model`] is called `name`.
    pub fn find_model(&self, name: &str) -> Option<Entity> {
        self.entities_with::<Model>().into_iter().find(|entity| {
            self.get::<Model>(*entity)
                .map(|model| model.name == name)
                .unwrap_or(false)
        })
    }

    pub fn entity_count(&self) -> usize {
        self.world.len() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Camera, Transform};

    #[test]
    fn entities_come_back_in_creation_order() {
        let mut scene = Scene::new("test");
        let a = scene.spawn((Model::new("a", "a.obj"), Transform::default()));
        let b = scene.spawn((Model::new("b", "b.obj"),));
        let c = scene.spawn((Model::new("c", "c.obj"), Camera::default()));

        assert_eq!(scene.entities_with::<Model>(), vec![a, b, c]);
        assert_eq!(scene.entities_with::<Camera>(), vec![c]);
    }

    #[test]
    fn component_access() {
        let mut scene = Scene::default();
        let entity = scene.spawn((Model::new("rock", "rock.obj"),));
        assert!(!scene.has::<Transform>(entity));
        assert!(scene.insert(entity, Transform::default()));
        assert!(scene.has::<Transform>(entity));

        scene.get_mut::<Model>(entity).unwrap().is_visible = false;
        assert!(!scene.get::<Model>(entity).unwrap().is_visible);
    }

    #[test]
    fn find_model_by_name() {
        let mut scene = Scene::default();
        scene.spawn((Model::new("rock", "rock.obj"),));
        let sky = scene.spawn((Model::new("skybox", "sphere.obj"),));
        assert_eq!(scene.find_model("skybox"), Some(sky));
        assert_eq!(scene.find_model("tree"), None);
    }
}
