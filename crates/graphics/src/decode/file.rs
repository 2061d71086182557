use std::path::Path;

use anyhow::{Context, anyhow};
use log::debug;

use super::AssetParser;
use crate::{GraphicsError, MeshCpu, Result, TextureCpu, Vertex};

/// Décode les fichiers du disque : OBJ via `tobj`, images via `image`, texte via `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileParser;

impl FileParser {
    pub fn new() -> Self {
        Self
    }
}

fn decode_error(path: &Path, err: anyhow::Error) -> GraphicsError {
    GraphicsError::Decode {
        path: path.display().to_string(),
        reason: format!("{err:#}"),
    }
}

fn read_obj(path: &Path) -> anyhow::Result<MeshCpu> {
    let (models, _materials) = tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS)
        .with_context(|| format!("failed to parse OBJ {}", path.display()))?;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let (mut has_normals, mut has_colours, mut has_tex_coords) = (false, false, false);

    for model in models {
        let mesh = &model.mesh;
        let base = vertices.len() as u32;
        has_normals |= !mesh.normals.is_empty();
        has_colours |= !mesh.vertex_color.is_empty();
        has_tex_coords |= !mesh.texcoords.is_empty();

        for i in 0..mesh.positions.len() / 3 {
            let mut vertex = Vertex::new(
                [mesh.positions[i * 3], mesh.positions[i * 3 + 1], mesh.positions[i * 3 + 2]],
                [1.0; 4],
            );
            if let Some(normal) = mesh.normals.get(i * 3..i * 3 + 3) {
                vertex.normal = [normal[0], normal[1], normal[2]];
            }
            if let Some(colour) = mesh.vertex_color.get(i * 3..i * 3 + 3) {
                vertex.colour = [colour[0], colour[1], colour[2], 1.0];
            }
            if let Some(uv) = mesh.texcoords.get(i * 2..i * 2 + 2) {
                vertex.tex_coord = [uv[0], uv[1]];
            }
            vertices.push(vertex);
        }
        indices.extend(mesh.indices.iter().map(|index| base + index));
    }

    if vertices.is_empty() {
        return Err(anyhow!("OBJ {} has no vertices", path.display()));
    }

    let mut mesh = MeshCpu::new(vertices, indices);
    mesh.has_normals = has_normals;
    mesh.has_colours = has_colours;
    mesh.has_tex_coords = has_tex_coords;
    Ok(mesh)
}

fn read_image(path: &Path) -> anyhow::Result<TextureCpu> {
    let image = image::open(path).with_context(|| format!("failed to open image {}", path.display()))?;
    let (width, height) = (image.width(), image.height());
    let texture = if image.color().has_alpha() {
        TextureCpu::new(width, height, 4, image.to_rgba8().into_raw())
    } else {
        TextureCpu::new(width, height, 3, image.to_rgb8().into_raw())
    };
    Ok(texture)
}

impl AssetParser for FileParser {
    fn parse_mesh(&self, path: &Path) -> Result<MeshCpu> {
        let mesh = read_obj(path).map_err(|err| decode_error(path, err))?;
        debug!(
            "decoded mesh {} ({} vertices, {} triangles)",
            path.display(),
            mesh.vertex_count(),
            mesh.triangle_count
        );
        Ok(mesh)
    }

    fn parse_image(&self, path: &Path) -> Result<TextureCpu> {
        let texture = read_image(path).map_err(|err| decode_error(path, err))?;
        debug!(
            "decoded image {} ({}x{}, {} channels)",
            path.display(),
            texture.width,
            texture.height,
            texture.channels
        );
        Ok(texture)
    }

    fn load_file(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))
            .map_err(|err| decode_error(path, err))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    const QUAD_OBJ: &str = "\
v -1.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 2.0 0.0
v -1.0 2.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
f 1/1 2/2 3/3 4/4
";

    #[test]
    fn obj_is_triangulated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quad.obj");
        std::fs::write(&path, QUAD_OBJ).unwrap();

        let mesh = FileParser.parse_mesh(&path).unwrap();
        assert_eq!(mesh.triangle_count, 2);
        assert_eq!(mesh.index_count(), 6);
        assert!(mesh.has_tex_coords);
        assert!(!mesh.has_normals);
        assert_eq!((mesh.min_y, mesh.max_y), (0.0, 2.0));
    }

    #[test]
    fn image_keeps_channel_count() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        image::RgbImage::from_pixel(2, 3, image::Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();

        let texture = FileParser.parse_image(&path).unwrap();
        assert_eq!((texture.width, texture.height, texture.channels), (2, 3, 3));
        assert_eq!(&texture.pixels[..3], &[10, 20, 30]);
    }

    #[test]
    fn missing_files_are_decode_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.glsl");
        let err = FileParser.load_file(&path).unwrap_err();
        assert!(matches!(err, GraphicsError::Decode { .. }));

        let err = FileParser.parse_mesh(&dir.path().join("nope.obj")).unwrap_err();
        assert!(matches!(err, GraphicsError::Decode { .. }));
    }

    #[test]
    fn text_files_are_read_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shader.glsl");
        std::fs::write(&path, "void main() {}\n").unwrap();
        assert_eq!(FileParser.load_file(&path).unwrap(), "void main() {}\n");
    }
}
