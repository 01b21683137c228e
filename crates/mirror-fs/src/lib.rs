//! Filesystem primitives for Folder Mirror
//!
//! Provides the leaf-level operations the reconciliation engine consumes:
//! path rebasing between mirrored roots, copy/move/delete primitives that
//! preserve modification times, and stable entry identity lookup.

pub mod error;
pub mod identity;
pub mod io;
pub mod path;

pub use error::{Error, Result};
pub use identity::{EntryId, IdentityResolver, NullIdentity, OsIdentity};
