//! Delete deferral queue
//!
//! A rename removes content at the old path and recreates it at a new one.
//! Because the source and destination passes are independent sweeps, the
//! destination pass could observe the old path as orphaned before the move
//! has been registered. Deferring deletion by one full cycle guarantees the
//! move has either completed or the path is a genuine, lasting orphan.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// In-memory set of destination paths awaiting a second orphan confirmation.
#[derive(Debug, Default)]
pub struct DeferralQueue {
    pending: HashSet<PathBuf>,
}

impl DeferralQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an orphan sighting.
    ///
    /// Returns false on the first sighting (the path is queued) and true on
    /// a repeat sighting (the path is dequeued and may be deleted now).
    pub fn confirm(&mut self, path: &Path) -> bool {
        if self.pending.remove(path) {
            true
        } else {
            self.pending.insert(path.to_path_buf());
            false
        }
    }

    /// A queued path was sighted as a non-orphan; drop it.
    pub fn evict(&mut self, path: &Path) {
        self.pending.remove(path);
    }

    /// Drop every queued path under `root`, including `root` itself.
    ///
    /// Called after a confirmed directory delete so queued children of the
    /// removed subtree do not outlive it.
    pub fn evict_subtree(&mut self, root: &Path) {
        self.pending.retain(|p| !p.starts_with(root));
    }

    pub fn is_pending(&self, path: &Path) -> bool {
        self.pending.contains(path)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
