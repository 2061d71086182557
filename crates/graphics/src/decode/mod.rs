//! Asset decoding. The core only depends on [`AssetParser`]; [`FileParser`]
//! reads real files and [`MemoryParser`] serves assets registered in memory.

mod file;
mod memory;

pub use file::*;
pub use memory::*;

use std::path::Path;

use crate::{MeshCpu, Result, TextureCpu};

pub trait AssetParser {
    fn parse_mesh(&self, path: &Path) -> Result<MeshCpu>;
    fn parse_image(&self, path: &Path) -> Result<TextureCpu>;
    fn load_file(&self, path: &Path) -> Result<String>;
}
