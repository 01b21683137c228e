//! Typed records persisted by the location store

use std::path::Path;

use chrono::{DateTime, Utc};
use mirror_fs::EntryId;
use serde::{Deserialize, Serialize};

/// One mirrored (source, destination) relationship.
///
/// Roots are stored as normalized absolute path strings so that records
/// written on one platform remain comparable on another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyncPair {
    /// Absolute source root
    pub source: String,
    /// Absolute destination root
    pub dest: String,
}

impl SyncPair {
    pub fn new(source: impl AsRef<Path>, dest: impl AsRef<Path>) -> Self {
        Self {
            source: normalize(source.as_ref()),
            dest: normalize(dest.as_ref()),
        }
    }
}

/// Last observed source location of one entry inside one sync pair.
///
/// Lookups are keyed by (pair, identity); moves rewrite `path` in place
/// rather than appending a second record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Source root of the owning pair
    pub source: String,
    /// Destination root of the owning pair
    pub dest: String,
    /// Source-relative path, forward slashes
    pub path: String,
    /// OS identity token; may be unknown
    pub identity: EntryId,
    /// When this record was created or last rewritten
    pub updated: DateTime<Utc>,
}

impl LocationRecord {
    pub fn new(pair: &SyncPair, path: impl Into<String>, identity: EntryId) -> Self {
        Self {
            source: pair.source.clone(),
            dest: pair.dest.clone(),
            path: path.into(),
            identity,
            updated: Utc::now(),
        }
    }

    pub fn pair_matches(&self, pair: &SyncPair) -> bool {
        self.source == pair.source && self.dest == pair.dest
    }
}

fn normalize(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
