use glam::IVec3;
use thiserror::Error;

/// Errors raised by block storage and coordinate helpers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A local coordinate fell outside [0, CHUNK_SIDE) on some axis.
    /// Callers at chunk boundaries must go through the world index instead.
    #[error("local coordinate {local} is outside the chunk")]
    OutOfRange { local: IVec3 },
}
