//! Stateless upload/unload per resource kind.
//!
//! A handler never touches a manager's maps: it turns a CPU record into a GPU
//! record through the device, and releases a GPU record's device objects.
//! An upload either returns a complete GPU record or leaves nothing alive.

mod mesh;
mod shader;
mod texture;

pub use mesh::*;
pub use shader::*;
pub use texture::*;

use crate::{GraphicsDevice, Result};

pub trait ResourceHandler {
    type Cpu;
    type Gpu;

    fn upload(&self, device: &dyn GraphicsDevice, name: &str, cpu: &Self::Cpu) -> Result<Self::Gpu>;

    /// Releases every live id in `gpu` and zeroes it. Safe on zeroed or partial records.
    fn unload(&self, device: &dyn GraphicsDevice, gpu: &mut Self::Gpu);
}
