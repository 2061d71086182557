use bytemuck::{Pod, Zeroable};

/// Interleaved vertex as uploaded to the device.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub colour: [f32; 4],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    pub fn new(position: [f32; 3], colour: [f32; 4]) -> Self {
        Self {
            position,
            normal: [0.0; 3],
            colour,
            tex_coord: [0.0; 2],
        }
    }

    /// Attribute layout matching the field order above.
    pub fn layout() -> [VertexAttribute; 4] {
        let float = std::mem::size_of::<f32>();
        [
            VertexAttribute::new(0, 3, 0),
            VertexAttribute::new(1, 3, 3 * float),
            VertexAttribute::new(2, 4, 6 * float),
            VertexAttribute::new(3, 2, 10 * float),
        ]
    }

    pub fn stride() -> usize {
        std::mem::size_of::<Vertex>()
    }
}

/// One float vertex attribute: shader location, component count, byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: i32,
    pub offset: usize,
}

impl VertexAttribute {
    pub const fn new(location: u32, components: i32, offset: usize) -> Self {
        Self {
            location,
            components,
            offset,
        }
    }
}

/// Decoded mesh in host memory.
///
/// Not `Clone`: vertex buffers can be large and are only ever moved, see [`MeshCpu::take`].
#[derive(Debug, Default, PartialEq)]
pub struct MeshCpu {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub triangle_count: u32,
    pub has_normals: bool,
    pub has_colours: bool,
    pub has_tex_coords: bool,
    pub min_y: f32,
    pub max_y: f32,
}

impl MeshCpu {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        let mut mesh = Self {
            triangle_count: (indices.len() / 3) as u32,
            vertices,
            indices,
            ..Default::default()
        };
        mesh.update_bounds();
        mesh
    }

    pub fn empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Recomputes `min_y`/`max_y` from the vertex positions.
    pub fn update_bounds(&mut self) {
        let mut ys = self.vertices.iter().map(|vertex| vertex.position[1]);
        if let Some(first) = ys.next() {
            let (min_y, max_y) = ys.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));
            self.min_y = min_y;
            self.max_y = max_y;
        }
    }

    /// Releases vertex and index storage. Metadata (flags, bounds) is kept.
    pub fn free_data(&mut self) {
        self.vertices = Vec::new();
        self.indices = Vec::new();
    }

    /// Moves the record out, leaving `self` empty.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

/// Device-side mesh: vertex array, vertex buffer and index buffer ids.
///
/// Ids are owned by exactly one record; [`MeshGpu::take`] zeroes the source so
/// releasing a moved-from record touches nothing.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MeshGpu {
    pub vertex_array: u32,
    pub vertex_buffer: u32,
    pub index_buffer: u32,
    pub vertex_count: u32,
    pub index_count: u32,
}

impl MeshGpu {
    pub fn is_zeroed(&self) -> bool {
        self.vertex_array == 0 && self.vertex_buffer == 0 && self.index_buffer == 0
    }

    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}
