use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use cubist_core::types::ChunkCoord;

#[derive(Debug, Default)]
struct QueueInner {
    order: VecDeque<ChunkCoord>,
    members: HashSet<ChunkCoord>,
}

/// FIFO of chunk coordinates, safe to push from several threads through a
/// shared reference.
///
/// Every operation holds the queue lock for its whole duration. A coordinate
/// is queued at most once; pushing it again is a no-op until it is popped.
#[derive(Debug, Default)]
pub struct ChunkQueue {
    inner: Mutex<QueueInner>,
}

impl ChunkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, QueueInner> {
        // Entries are plain coordinates, so a panicked holder cannot leave
        // them half-written.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns false if `coord` was already queued.
    pub fn push(&self, coord: ChunkCoord) -> bool {
        let mut inner = self.lock();
        if !inner.members.insert(coord) {
            return false;
        }
        inner.order.push_back(coord);
        true
    }

    /// Pop up to `max` coordinates in FIFO order under a single lock.
    pub fn pop_batch(&self, max: usize) -> Vec<ChunkCoord> {
        let mut inner = self.lock();
        let n = max.min(inner.order.len());
        let batch: Vec<ChunkCoord> = inner.order.drain(..n).collect();
        for coord in &batch {
            inner.members.remove(coord);
        }
        batch
    }

    /// Drop `coord` from the queue. Returns whether it was queued.
    pub fn remove(&self, coord: &ChunkCoord) -> bool {
        let mut inner = self.lock();
        if !inner.members.remove(coord) {
            return false;
        }
        inner.order.retain(|c| c != coord);
        true
    }

    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().order.is_empty()
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.order.clear();
        inner.members.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;

    #[test]
    fn test_push_dedups_until_popped() {
        let queue = ChunkQueue::new();
        assert!(queue.push(IVec3::ZERO));
        assert!(!queue.push(IVec3::ZERO));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop_batch(1), vec![IVec3::ZERO]);
        assert!(queue.push(IVec3::ZERO));
    }

    #[test]
    fn test_pop_batch_is_fifo_and_bounded() {
        let queue = ChunkQueue::new();
        for x in 0..5 {
            queue.push(IVec3::new(x, 0, 0));
        }
        let batch = queue.pop_batch(3);
        assert_eq!(
            batch,
            vec![IVec3::new(0, 0, 0), IVec3::new(1, 0, 0), IVec3::new(2, 0, 0)]
        );
        assert_eq!(queue.len(), 2);
        assert!(queue.push(IVec3::new(1, 0, 0)));
        assert_eq!(queue.pop_batch(10).len(), 3);
        assert!(queue.is_empty());
        assert!(queue.pop_batch(1).is_empty());
    }

    #[test]
    fn test_remove() {
        let queue = ChunkQueue::new();
        queue.push(IVec3::X);
        queue.push(IVec3::Y);
        assert!(queue.remove(&IVec3::X));
        assert!(!queue.remove(&IVec3::X));
        assert_eq!(queue.pop_batch(2), vec![IVec3::Y]);
    }

    #[test]
    fn test_concurrent_pushes_are_deduplicated() {
        let queue = ChunkQueue::new();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for x in 0..100 {
                        queue.push(IVec3::new(x, 0, 0));
                    }
                });
            }
        });
        assert_eq!(queue.len(), 100);
        let mut xs: Vec<i32> = queue.pop_batch(usize::MAX).iter().map(|c| c.x).collect();
        xs.sort_unstable();
        assert_eq!(xs, (0..100).collect::<Vec<_>>());
    }
}
