mod config;
mod core;
mod decode;
mod device;
mod error;
mod handler;
mod manager;
mod renderer;
mod resource;
mod uniform;

pub use self::core::*;
pub use config::*;
pub use decode::*;
pub use device::*;
pub use error::*;
pub use handler::*;
pub use manager::*;
pub use renderer::*;
pub use resource::*;
pub use uniform::*;
