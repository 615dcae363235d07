use cubist_core::constants::{FLOATS_PER_VERTEX, INDICES_PER_QUAD, VERTICES_PER_QUAD};

/// One float attribute of the chunk vertex layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader input location.
    pub location: u32,
    /// Number of f32 components.
    pub components: u32,
    /// Byte offset within one vertex.
    pub offset: u32,
}

/// Byte stride of one chunk vertex.
pub const VERTEX_STRIDE: u32 = (FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as u32;

/// Chunk vertex layout: position (vec3, chunk-local), uv (vec2), face id (float).
pub const VERTEX_LAYOUT: [VertexAttribute; 3] = [
    VertexAttribute {
        location: 0,
        components: 3,
        offset: 0,
    },
    VertexAttribute {
        location: 1,
        components: 2,
        offset: 12,
    },
    VertexAttribute {
        location: 2,
        components: 1,
        offset: 20,
    },
];

/// CPU-side vertex/index buffers for one chunk.
///
/// Indices are u32 offsets into `vertices / FLOATS_PER_VERTEX`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / FLOATS_PER_VERTEX
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn quad_count(&self) -> usize {
        self.indices.len() / INDICES_PER_QUAD
    }

    /// Vertex data as raw bytes for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index data as raw bytes for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Append one quad: 4 vertices of `FLOATS_PER_VERTEX` floats each and
    /// the two triangles (0,1,2) (0,2,3), offset by the current vertex count.
    pub fn push_quad(&mut self, quad: &[[f32; FLOATS_PER_VERTEX]; VERTICES_PER_QUAD]) {
        let base = self.vertex_count() as u32;
        for vertex in quad {
            self.vertices.extend_from_slice(vertex);
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}
