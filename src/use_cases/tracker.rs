// Per-tick state diffing for whatever ships world changes to clients.
// The loop only needs reset/record/deregister; consumption is external.

use std::sync::{Mutex, PoisonError};

use crate::domain::blob::BlobId;
use crate::interface_adapters::snapshot::BlobSnapshot;

/// Accumulates what changed during one tick.
pub trait StateTracker: Send + Sync {
    /// Clears the diff buffer; called at the top of every tick.
    fn reset(&self);
    /// Records the post-tick state of a ready blob.
    fn record(&self, snapshot: BlobSnapshot);
    /// Deregisters a blob that left the world.
    fn remove_blob(&self, id: BlobId);
}

/// A tick's worth of accumulated changes.
#[derive(Debug, Default, Clone)]
pub struct TickDiff {
    pub updated: Vec<BlobSnapshot>,
    pub removed: Vec<BlobId>,
}

/// Default tracker: buffers one tick of changes for a consumer to drain.
#[derive(Debug, Default)]
pub struct DiffTracker {
    diff: Mutex<TickDiff>,
}

impl DiffTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the accumulated diff, leaving an empty buffer behind.
    pub fn drain(&self) -> TickDiff {
        let mut diff = self.diff.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut diff)
    }
}

impl StateTracker for DiffTracker {
    fn reset(&self) {
        let mut diff = self.diff.lock().unwrap_or_else(PoisonError::into_inner);
        *diff = TickDiff::default();
    }

    fn record(&self, snapshot: BlobSnapshot) {
        let mut diff = self.diff.lock().unwrap_or_else(PoisonError::into_inner);
        diff.updated.push(snapshot);
    }

    fn remove_blob(&self, id: BlobId) {
        let mut diff = self.diff.lock().unwrap_or_else(PoisonError::into_inner);
        diff.updated.retain(|s| s.id != id.0);
        diff.removed.push(id);
    }
}
