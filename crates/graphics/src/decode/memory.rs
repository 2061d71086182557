use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::Path;

use super::AssetParser;
use crate::{GraphicsError, MeshCpu, Result, TextureCpu, Vertex};

enum MemoryAsset {
    Mesh { vertices: Vec<Vertex>, indices: Vec<u32> },
    Image { width: u32, height: u32, channels: u8, pixels: Vec<u8> },
    Text(String),
}

/// Parser serving assets registered in memory, keyed by file name.
///
/// Used by headless runs and tests; counts decodes so callers can check caching.
#[derive(Default)]
pub struct MemoryParser {
    assets: RefCell<HashMap<String, MemoryAsset>>,
    decodes: Cell<usize>,
}

fn key(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl MemoryParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_mesh(&self, file_name: &str, vertices: Vec<Vertex>, indices: Vec<u32>) {
        self.assets
            .borrow_mut()
            .insert(file_name.to_string(), MemoryAsset::Mesh { vertices, indices });
    }

    pub fn insert_image(&self, file_name: &str, width: u32, height: u32, channels: u8, pixels: Vec<u8>) {
        self.assets.borrow_mut().insert(
            file_name.to_string(),
            MemoryAsset::Image {
                width,
                height,
                channels,
                pixels,
            },
        );
    }

    /// Solid-colour RGBA image of `size` x `size`.
    pub fn insert_solid_image(&self, file_name: &str, size: u32, rgba: [u8; 4]) {
        let pixels = rgba.repeat((size * size) as usize);
        self.insert_image(file_name, size, size, 4, pixels);
    }

    pub fn insert_text(&self, file_name: &str, text: &str) {
        self.assets
            .borrow_mut()
            .insert(file_name.to_string(), MemoryAsset::Text(text.to_string()));
    }

    /// Successful decodes so far.
    pub fn decodes(&self) -> usize {
        self.decodes.get()
    }

    fn missing(path: &Path, what: &str) -> GraphicsError {
        GraphicsError::Decode {
            path: path.display().to_string(),
            reason: format!("no in-memory {what} registered"),
        }
    }

    fn hit(&self) {
        self.decodes.set(self.decodes.get() + 1);
    }
}

impl AssetParser for MemoryParser {
    fn parse_mesh(&self, path: &Path) -> Result<MeshCpu> {
        match self.assets.borrow().get(&key(path)) {
            Some(MemoryAsset::Mesh { vertices, indices }) => {
                self.hit();
                let mut mesh = MeshCpu::new(vertices.clone(), indices.clone());
                mesh.has_colours = true;
                Ok(mesh)
            }
            _ => Err(Self::missing(path, "mesh")),
        }
    }

    fn parse_image(&self, path: &Path) -> Result<TextureCpu> {
        match self.assets.borrow().get(&key(path)) {
            Some(MemoryAsset::Image {
                width,
                height,
                channels,
                pixels,
            }) => {
                self.hit();
                Ok(TextureCpu::new(*width, *height, *channels, pixels.clone()))
            }
            _ => Err(Self::missing(path, "image")),
        }
    }

    fn load_file(&self, path: &Path) -> Result<String> {
        match self.assets.borrow().get(&key(path)) {
            Some(MemoryAsset::Text(text)) => {
                self.hit();
                Ok(text.clone())
            }
            _ => Err(Self::missing(path, "text file")),
        }
    }
}
