mod camera;
mod frame;
mod light;
mod model;
mod passes;
mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use camera::*;
pub use frame::*;
pub use light::*;
pub use model::*;
pub use passes::*;
pub use state::*;
