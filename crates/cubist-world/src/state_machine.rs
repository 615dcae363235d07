/// Chunk lifecycle stage. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkState {
    /// Blocks not populated yet; waiting for the generation pass.
    ToGenerate,
    /// Blocks populated; waiting for the meshing pass.
    ToMesh,
    /// Mesh built on the CPU; uploaded on the next draw that reaches it.
    ToUpload,
    /// GPU buffers current; drawable.
    Active,
    /// Being removed. Terminal.
    Unloading,
}

impl ChunkState {
    /// Forward step of the Generate -> Mesh -> Upload -> Active cycle.
    pub fn next(self) -> Option<ChunkState> {
        match self {
            ChunkState::ToGenerate => Some(ChunkState::ToMesh),
            ChunkState::ToMesh => Some(ChunkState::ToUpload),
            ChunkState::ToUpload => Some(ChunkState::Active),
            ChunkState::Active | ChunkState::Unloading => None,
        }
    }

    /// Whether block content has been populated.
    pub fn is_generated(self) -> bool {
        matches!(
            self,
            ChunkState::ToMesh | ChunkState::ToUpload | ChunkState::Active
        )
    }

    /// Whether the mesh buffers may be read or drawn.
    pub fn is_drawable(self) -> bool {
        self == ChunkState::Active
    }
}

/// Legal lifecycle edges: one forward step, a dirty re-entry into `ToMesh`
/// from any generated state, or `Unloading` from anywhere but itself.
pub fn can_transition(from: ChunkState, to: ChunkState) -> bool {
    if from == ChunkState::Unloading {
        return false;
    }
    if to == ChunkState::Unloading {
        return true;
    }
    if from.next() == Some(to) {
        return true;
    }
    to == ChunkState::ToMesh && from.is_generated()
}
