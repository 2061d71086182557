use crate::{GridType, MeshCpu, PrimitiveType, Vec2, Vec3, Vec4, Vertex};

/// Corner indices per face, two triangles each. Corners 0..4 are the back face.
const CUBE_FACES: [[usize; 6]; 6] = [
    [4, 5, 6, 4, 6, 7], // front
    [1, 0, 3, 1, 3, 2], // back
    [0, 4, 7, 0, 7, 3], // left
    [5, 1, 2, 5, 2, 6], // right
    [3, 7, 6, 3, 6, 2], // top
    [0, 1, 5, 0, 5, 4], // bottom
];

/// Procedural meshes, centred on the origin and coloured per vertex.
pub struct MeshFactory;

impl MeshFactory {
    /// `size` is the entity's transform scale; 2D shapes only use x and y.
    pub fn primitive(primitive_type: PrimitiveType, size: Vec3, colour: Vec4) -> MeshCpu {
        match primitive_type {
            PrimitiveType::Triangle => Self::triangle(size.xy(), colour),
            PrimitiveType::Square => Self::square(size.xy(), colour),
            PrimitiveType::Cube => Self::cube(size, colour),
        }
    }

    pub fn grid_cell(grid_type: GridType, size: Vec3, colour: Vec4) -> MeshCpu {
        match grid_type {
            GridType::Square => Self::square(size.xy(), colour),
            GridType::Cube => Self::cube(size, colour),
        }
    }

    pub fn triangle(size: Vec2, colour: Vec4) -> MeshCpu {
        let (x, y) = (0.5 * size.x, 0.5 * size.y);
        Self::build(&[[-x, -y, 0.0], [x, -y, 0.0], [0.0, y, 0.0]], colour)
    }

    /// Two triangles, six unshared vertices.
    pub fn square(size: Vec2, colour: Vec4) -> MeshCpu {
        let (x, y) = (0.5 * size.x, 0.5 * size.y);
        Self::build(
            &[
                [-x, -y, 0.0],
                [x, -y, 0.0],
                [x, y, 0.0],
                [-x, -y, 0.0],
                [x, y, 0.0],
                [-x, y, 0.0],
            ],
            colour,
        )
    }

    /// Twelve triangles, 36 unshared vertices.
    pub fn cube(size: Vec3, colour: Vec4) -> MeshCpu {
        let (x, y, z) = (0.5 * size.x, 0.5 * size.y, 0.5 * size.z);
        let corners = [
            [-x, -y, -z],
            [x, -y, -z],
            [x, y, -z],
            [-x, y, -z],
            [-x, -y, z],
            [x, -y, z],
            [x, y, z],
            [-x, y, z],
        ];
        let positions: Vec<[f32; 3]> = CUBE_FACES
            .iter()
            .flatten()
            .map(|&corner| corners[corner])
            .collect();
        Self::build(&positions, colour)
    }

    fn build(positions: &[[f32; 3]], colour: Vec4) -> MeshCpu {
        let colour = [colour.x, colour.y, colour.z, colour.w];
        let vertices = positions
            .iter()
            .map(|&position| Vertex::new(position, colour))
            .collect();
        let indices = (0..positions.len() as u32).collect();

        let mut mesh = MeshCpu::new(vertices, indices);
        mesh.has_colours = true;
        mesh
    }
}
