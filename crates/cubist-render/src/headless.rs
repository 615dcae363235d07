use std::collections::{HashMap, HashSet};

use crate::gpu::{GpuBackend, MeshHandle, UniformValue};

/// One recorded `draw_indexed` call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub handle: MeshHandle,
    pub index_count: u32,
    /// Value of the chunk-offset uniform when the draw was issued.
    pub offset: Option<UniformValue>,
}

/// GPU backend that keeps no device state and records every call.
///
/// Misuse of handles (upload/draw after destroy, double destroy) is counted
/// in `invalid_calls` and logged at warn, so tests can assert it never happens.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_handle: u64,
    live: HashSet<MeshHandle>,
    uploads: HashMap<MeshHandle, usize>,
    uploaded_bytes: HashMap<MeshHandle, (usize, usize)>,
    uniforms: HashMap<String, UniformValue>,
    draws: Vec<DrawCall>,
    created: usize,
    destroyed: Vec<MeshHandle>,
    invalid_calls: usize,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_handles(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, handle: MeshHandle) -> bool {
        self.live.contains(&handle)
    }

    pub fn created_count(&self) -> usize {
        self.created
    }

    pub fn destroyed(&self) -> &[MeshHandle] {
        &self.destroyed
    }

    /// Uploads issued against `handle` over its lifetime.
    pub fn upload_count(&self, handle: MeshHandle) -> usize {
        self.uploads.get(&handle).copied().unwrap_or(0)
    }

    pub fn total_uploads(&self) -> usize {
        self.uploads.values().sum()
    }

    /// (vertex bytes, index bytes) of the last upload to `handle`.
    pub fn last_upload_size(&self, handle: MeshHandle) -> Option<(usize, usize)> {
        self.uploaded_bytes.get(&handle).copied()
    }

    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniforms.get(name).copied()
    }

    pub fn draws(&self) -> &[DrawCall] {
        &self.draws
    }

    /// Forget recorded draws, keeping handle and upload bookkeeping.
    pub fn clear_draws(&mut self) {
        self.draws.clear();
    }

    pub fn invalid_calls(&self) -> usize {
        self.invalid_calls
    }

    fn check_live(&mut self, handle: MeshHandle, op: &str) -> bool {
        if self.live.contains(&handle) {
            true
        } else {
            log::warn!("{op} on dead mesh handle {}", handle.0);
            self.invalid_calls += 1;
            false
        }
    }
}

impl GpuBackend for HeadlessBackend {
    fn create_mesh_buffers(&mut self) -> MeshHandle {
        self.next_handle += 1;
        let handle = MeshHandle(self.next_handle);
        self.live.insert(handle);
        self.created += 1;
        handle
    }

    fn upload(&mut self, handle: MeshHandle, vertices: &[u8], indices: &[u8]) {
        if !self.check_live(handle, "upload") {
            return;
        }
        *self.uploads.entry(handle).or_insert(0) += 1;
        self.uploaded_bytes
            .insert(handle, (vertices.len(), indices.len()));
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.uniforms.insert(name.to_string(), value);
    }

    fn draw_indexed(&mut self, handle: MeshHandle, index_count: u32) {
        if !self.check_live(handle, "draw") {
            return;
        }
        let offset = self
            .uniforms
            .get(cubist_core::constants::CHUNK_OFFSET_UNIFORM)
            .copied();
        self.draws.push(DrawCall {
            handle,
            index_count,
            offset,
        });
    }

    fn destroy(&mut self, handle: MeshHandle) {
        if !self.live.remove(&handle) {
            log::warn!("destroy on dead mesh handle {}", handle.0);
            self.invalid_calls += 1;
            return;
        }
        self.destroyed.push(handle);
    }
}
