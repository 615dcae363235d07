pub mod gpu;
pub mod headless;
pub mod mesh;

pub use gpu::{GpuBackend, MeshHandle, UniformValue};
pub use headless::{DrawCall, HeadlessBackend};
pub use mesh::{MeshData, VertexAttribute, VERTEX_LAYOUT, VERTEX_STRIDE};
