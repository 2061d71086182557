mod camera;
mod components;
mod math;
mod scene;
mod transform;

pub use camera::*;
pub use components::*;
pub use math::*;
pub use scene::*;
pub use transform::*;
