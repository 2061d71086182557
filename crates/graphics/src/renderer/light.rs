use crate::{
    Colour, GraphicsDevice, Light, LightField, Scene, Transform, UniformCache, UniformLocation,
    UniformSlot, UniformValue, light_uniform_name,
};

/// Pushes the scene's lights. Per-light locations are queried each frame since
/// the number of lights is only known from the scene.
pub struct LightRenderer<'a> {
    device: &'a dyn GraphicsDevice,
    uniforms: &'a UniformCache,
}

impl<'a> LightRenderer<'a> {
    pub fn new(device: &'a dyn GraphicsDevice, uniforms: &'a UniformCache) -> Self {
        Self { device, uniforms }
    }

    pub fn update_light_count(&self, count: usize) {
        self.device
            .set_uniform(self.uniforms.get(UniformSlot::LightCount), UniformValue::Int(count as i32));
    }

    /// Returns how many lights were pushed as enabled. Disabled lights, and
    /// lights without a transform, only get a zeroed `param2`.
    pub fn update_light_uniforms(&self, program: u32, scene: &Scene) -> usize {
        let lights = scene.entities_with::<Light>();
        self.update_light_count(lights.len());
        self.device.set_uniform(
            self.uniforms.get(UniformSlot::AmbientLight),
            UniformValue::Vec4(scene.ambient_light.into()),
        );

        let mut enabled = 0;
        for (index, &entity) in lights.iter().enumerate() {
            let locations: [UniformLocation; 6] = LightField::ALL
                .map(|field| self.device.uniform_location(program, &light_uniform_name(index, field)));
            let [position, diffuse, attenuation, direction, param1, param2] = locations;

            let Some(light) = scene.get::<Light>(entity) else {
                continue;
            };
            let transform = scene.get::<Transform>(entity).map(|transform| *transform);
            let Some(transform) = transform.filter(|_| light.enabled) else {
                self.device.set_uniform(param2, UniformValue::Vec4([0.0; 4]));
                continue;
            };
            let colour = scene.get::<Colour>(entity).map(|colour| *colour).unwrap_or_default();

            let p = transform.position;
            let r = transform.rotation;
            self.device.set_uniform(position, UniformValue::Vec4([p.x, p.y, p.z, 1.0]));
            self.device.set_uniform(diffuse, UniformValue::Vec4(colour.colour.into()));
            self.device.set_uniform(attenuation, UniformValue::Vec4(light.attenuation.into()));
            self.device.set_uniform(direction, UniformValue::Vec4([r.x, r.y, r.z, 1.0]));
            self.device.set_uniform(
                param1,
                UniformValue::Vec4([light.light_type as i32 as f32, light.param1[0], light.param1[1], 0.0]),
            );
            self.device.set_uniform(param2, UniformValue::Vec4([1.0, 0.0, 0.0, 0.0]));
            enabled += 1;
        }
        enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::testing::Fixture;
    use crate::{DeviceCall, LightType, Vec3};

    #[test]
    fn count_is_pushed_before_any_light() {
        let mut fixture = Fixture::new();
        fixture.scene.spawn((
            Light::default(),
            Transform::from_position(Vec3::new(0.0, 5.0, 0.0)),
        ));
        fixture.device.clear_calls();

        let lights = LightRenderer::new(fixture.device.as_ref(), fixture.renderer.uniforms());
        let enabled = lights.update_light_uniforms(fixture.renderer.uniforms().program(), &fixture.scene);
        assert_eq!(enabled, 1);

        let calls = fixture.device.calls();
        assert_eq!(
            calls[0],
            DeviceCall::SetUniform {
                name: "lightCount".to_string(),
                value: UniformValue::Int(1),
            }
        );
        assert_eq!(
            fixture.device.uniform("theLights[0].position"),
            Some(UniformValue::Vec4([0.0, 5.0, 0.0, 1.0]))
        );
        assert_eq!(
            fixture.device.uniform("theLights[0].param2"),
            Some(UniformValue::Vec4([1.0, 0.0, 0.0, 0.0]))
        );
    }

    #[test]
    fn disabled_and_unplaced_lights_only_clear_param2() {
        let mut fixture = Fixture::new();
        fixture.scene.spawn((
            Light {
                enabled: false,
                ..Default::default()
            },
            Transform::default(),
        ));
        fixture.scene.spawn((Light::default(),));
        fixture.scene.spawn((
            Light {
                light_type: LightType::Spot,
                param1: [15.0, 30.0],
                ..Default::default()
            },
            Transform::default(),
        ));

        let lights = LightRenderer::new(fixture.device.as_ref(), fixture.renderer.uniforms());
        let enabled = lights.update_light_uniforms(fixture.renderer.uniforms().program(), &fixture.scene);
        assert_eq!(enabled, 1);
        assert_eq!(fixture.device.uniform("lightCount"), Some(UniformValue::Int(3)));
        assert_eq!(fixture.device.uniform("theLights[0].param2"), Some(UniformValue::Vec4([0.0; 4])));
        assert_eq!(fixture.device.uniform("theLights[1].param2"), Some(UniformValue::Vec4([0.0; 4])));
        assert_eq!(fixture.device.uniform("theLights[1].position"), None);
        assert_eq!(
            fixture.device.uniform("theLights[2].param1"),
            Some(UniformValue::Vec4([1.0, 15.0, 30.0, 0.0]))
        );
    }
}
