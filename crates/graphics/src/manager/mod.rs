mod factory;
mod loader;
mod mesh;
mod resource;
mod shader;
mod texture;

pub use factory::*;
pub use loader::*;
pub use mesh::*;
pub use resource::*;
pub use shader::*;
pub use texture::*;
