use crate::{Mat4, Vec3, degrees_to_radians, look_at, perspective};

/// Camera component. Only enabled cameras are considered by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub enabled: bool,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near_plane: f32,
    pub far_plane: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            enabled: true,
            fov: 60.0,
            near_plane: 0.1,
            far_plane: 1000.0,
        }
    }
}

impl Camera {
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        perspective(self.fov, aspect, self.near_plane, self.far_plane)
    }
}

/// Orthonormal camera basis derived from a transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub eye: Vec3,
    pub front: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl CameraView {
    /// `rotation.y` is the yaw and `rotation.x` the pitch, both in degrees.
    pub fn from_transform(position: Vec3, rotation: Vec3, world_up: Vec3) -> Self {
        let yaw = degrees_to_radians(rotation.y);
        let pitch = degrees_to_radians(rotation.x);

        let front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        let right = front.cross(&world_up).normalize();
        let up = right.cross(&front).normalize();

        Self {
            eye: position,
            front,
            right,
            up,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        look_at(&self.eye, &self.front, &self.up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world_up;

    fn approx(a: &Vec3, b: &Vec3) -> bool {
        (a - b).norm() < 1e-5
    }

    #[test]
    fn zero_rotation_looks_down_positive_x() {
        let view = CameraView::from_transform(Vec3::zeros(), Vec3::zeros(), world_up());
        assert!(approx(&view.front, &Vec3::new(1.0, 0.0, 0.0)));
        assert!(approx(&view.right, &Vec3::new(0.0, 0.0, 1.0)));
        assert!(approx(&view.up, &Vec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn yaw_of_minus_ninety_looks_down_negative_z() {
        let view = CameraView::from_transform(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(0.0, -90.0, 0.0),
            world_up(),
        );
        assert!(approx(&view.front, &Vec3::new(0.0, 0.0, -1.0)));
        assert!(approx(&view.eye, &Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn basis_is_orthonormal() {
        let view =
            CameraView::from_transform(Vec3::zeros(), Vec3::new(30.0, 45.0, 0.0), world_up());
        assert!(view.front.dot(&view.right).abs() < 1e-5);
        assert!(view.front.dot(&view.up).abs() < 1e-5);
        assert!((view.up.norm() - 1.0).abs() < 1e-5);
    }
}
