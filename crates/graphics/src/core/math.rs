use nalgebra::Point3;

pub type Vec2 = nalgebra::Vector2<f32>;
pub type Vec3 = nalgebra::Vector3<f32>;
pub type Vec4 = nalgebra::Vector4<f32>;
pub type Mat4 = nalgebra::Matrix4<f32>;

/// World up axis used to derive the camera basis.
pub fn world_up() -> Vec3 {
    Vec3::y()
}

pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

pub fn radians_to_degrees(radians: f32) -> f32 {
    radians * 180.0 / std::f32::consts::PI
}

/// Right-handed view matrix looking from `eye` along `front`.
pub fn look_at(eye: &Vec3, front: &Vec3, up: &Vec3) -> Mat4 {
    let eye_point = Point3::from(*eye);
    let target = Point3::from(eye + front);
    Mat4::look_at_rh(&eye_point, &target, up)
}

/// Perspective projection, `fov_degrees` being the vertical field of view.
pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::new_perspective(aspect, degrees_to_radians(fov_degrees), near, far)
}

/// Column-major copy of a matrix, the layout uniform uploads expect.
pub fn to_columns(matrix: &Mat4) -> [f32; 16] {
    let mut columns = [0.0; 16];
    columns.copy_from_slice(matrix.as_slice());
    columns
}

pub fn distance_squared(a: &Vec3, b: &Vec3) -> f32 {
    (a - b).norm_squared()
}
