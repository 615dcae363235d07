use glam::{Mat4, Vec3};

/// Opaque handle to one chunk's GPU-resident vertex + index buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(pub u64);

/// Values the core hands to `set_uniform`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Vec3(Vec3),
    Mat4(Mat4),
}

/// GPU primitives consumed by the chunk pipeline.
///
/// Implementations own the graphics context. Every method is called from the
/// thread that owns that context; nothing here is `Send`-bound.
pub trait GpuBackend {
    /// Allocate an empty vertex/index buffer pair.
    fn create_mesh_buffers(&mut self) -> MeshHandle;

    /// Replace the contents of both buffers.
    fn upload(&mut self, handle: MeshHandle, vertices: &[u8], indices: &[u8]);

    fn set_uniform(&mut self, name: &str, value: UniformValue);

    /// Indexed triangle-list draw from the handle's buffers.
    fn draw_indexed(&mut self, handle: MeshHandle, index_count: u32);

    /// Release both buffers. The handle is invalid afterwards.
    fn destroy(&mut self, handle: MeshHandle);
}
