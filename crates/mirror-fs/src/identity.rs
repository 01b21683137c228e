//! Stable entry identity
//!
//! An entry's identity token survives renames and moves on the same volume,
//! which is what lets the engine recognize a rename instead of treating it as
//! a delete plus a create. The empty token means "unknown": callers make no
//! move judgment and fall back to create plus orphan cleanup.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Opaque identity token for one filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The unknown token: no stable identity could be derived.
    pub fn unknown() -> Self {
        Self(String::new())
    }

    pub fn is_unknown(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Derives identity tokens for filesystem entries.
pub trait IdentityResolver {
    /// Resolve the identity of the entry at `path`, or the unknown token if
    /// the OS cannot produce one.
    fn resolve(&self, path: &Path) -> EntryId;
}

/// Default resolver backed by the operating system.
///
/// Unix encodes `(device, inode)`; Windows shells out to
/// `fsutil file queryfileid`. Elsewhere every entry is unknown.
pub struct OsIdentity;

impl IdentityResolver for OsIdentity {
    fn resolve(&self, path: &Path) -> EntryId {
        os_identity(path)
    }
}

/// Resolver for filesystems without stable identities; every entry is
/// unknown, so move detection degrades to create plus orphan cleanup.
pub struct NullIdentity;

impl IdentityResolver for NullIdentity {
    fn resolve(&self, _path: &Path) -> EntryId {
        EntryId::unknown()
    }
}

#[cfg(unix)]
fn os_identity(path: &Path) -> EntryId {
    use std::os::unix::fs::MetadataExt;

    match std::fs::symlink_metadata(path) {
        Ok(meta) => EntryId::new(format!("{}:{}", meta.dev(), meta.ino())),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no stable identity");
            EntryId::unknown()
        }
    }
}

#[cfg(windows)]
fn os_identity(path: &Path) -> EntryId {
    use std::process::Command;

    let output = match Command::new("fsutil")
        .args(["file", "queryfileid"])
        .arg(path)
        .output()
    {
        Ok(output) if output.status.success() => output,
        Ok(_) | Err(_) => {
            tracing::debug!(path = %path.display(), "no stable identity");
            return EntryId::unknown();
        }
    };
    // "File ID is 0x00000000000000000001000000000002"
    let stdout = String::from_utf8_lossy(&output.stdout);
    match stdout.split_whitespace().last() {
        Some(token) if token.starts_with("0x") => EntryId::new(token),
        _ => EntryId::unknown(),
    }
}

#[cfg(not(any(unix, windows)))]
fn os_identity(_path: &Path) -> EntryId {
    EntryId::unknown()
}
