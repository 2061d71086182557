use crate::{Mat4, Vec3, degrees_to_radians};

/// Position, rotation (Euler angles in degrees) and scale of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn matrix(&self) -> Mat4 {
        let translation = Mat4::new_translation(&self.position);
        let rotation_x = Mat4::from_euler_angles(degrees_to_radians(self.rotation.x), 0.0, 0.0);
        let rotation_y = Mat4::from_euler_angles(0.0, degrees_to_radians(self.rotation.y), 0.0);
        let rotation_z = Mat4::from_euler_angles(0.0, 0.0, degrees_to_radians(self.rotation.z));
        let scale = Mat4::new_nonuniform_scaling(&self.scale);

        translation * rotation_y * rotation_x * rotation_z * scale
    }

    /// Inverse-transpose of the model matrix, used to transform normals.
    /// Falls back to identity for a degenerate (zero-scale) transform.
    pub fn normal_matrix(&self) -> Mat4 {
        self.matrix()
            .try_inverse()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Mat4::identity)
    }
}
