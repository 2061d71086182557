mod handle;
mod mesh;
mod shader;
mod texture;

pub use handle::*;
pub use mesh::*;
pub use shader::*;
pub use texture::*;
