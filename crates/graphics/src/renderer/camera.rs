use crate::{GraphicsDevice, Mat4, UniformCache, UniformSlot, UniformValue, Vec3, to_columns};

pub struct CameraRenderer<'a> {
    device: &'a dyn GraphicsDevice,
    uniforms: &'a UniformCache,
}

impl<'a> CameraRenderer<'a> {
    pub fn new(device: &'a dyn GraphicsDevice, uniforms: &'a UniformCache) -> Self {
        Self { device, uniforms }
    }

    pub fn update_camera_uniforms(&self, eye: &Vec3, view: &Mat4, projection: &Mat4) {
        let set = |slot, value| self.device.set_uniform(self.uniforms.get(slot), value);
        set(UniformSlot::EyePosition, UniformValue::Vec3([eye.x, eye.y, eye.z]));
        set(UniformSlot::View, UniformValue::Mat4(to_columns(view)));
        set(UniformSlot::Projection, UniformValue::Mat4(to_columns(projection)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::testing::Fixture;

    #[test]
    fn pushes_eye_and_matrices() {
        let fixture = Fixture::new();
        let camera = CameraRenderer::new(fixture.device.as_ref(), fixture.renderer.uniforms());
        let projection = Mat4::new_scaling(2.0);
        camera.update_camera_uniforms(&Vec3::new(1.0, 2.0, 3.0), &Mat4::identity(), &projection);

        assert_eq!(fixture.device.uniform("eyePos"), Some(UniformValue::Vec3([1.0, 2.0, 3.0])));
        assert_eq!(
            fixture.device.uniform("mProj"),
            Some(UniformValue::Mat4(to_columns(&projection)))
        );
    }

    #[test]
    fn missing_camera_uniforms_are_skipped() {
        let fixture = Fixture::with_hidden_uniforms(&["mView"]);
        fixture.device.clear_calls();
        let camera = CameraRenderer::new(fixture.device.as_ref(), fixture.renderer.uniforms());
        camera.update_camera_uniforms(&Vec3::zeros(), &Mat4::identity(), &Mat4::identity());
        assert_eq!(fixture.device.calls().len(), 2);
        assert_eq!(fixture.device.uniform("mView"), None);
    }
}
