//! Core reconciliation layer for Folder Mirror
//!
//! This crate implements one-directional folder mirroring: a destination
//! tree is periodically reconciled to match a source tree.
//!
//! - **Location store**: persisted mapping from (sync pair, entry identity)
//!   to the entry's last known source-relative path, used to recognize
//!   renames without re-copying content
//! - **Reconciliation engine**: the per-cycle create/update/move/delete
//!   decisions, with per-entry error isolation
//! - **Delete deferral**: destructive actions wait one extra cycle so a
//!   rename in flight is never torn down
//! - **Poll loop**: fixed-interval cycles, or a single shot for
//!   deterministic testing
//!
//! # Architecture
//!
//! ```text
//!        CLI
//!         |
//!    mirror-core
//!         |
//!     mirror-fs
//! ```
//!
//! # Example
//!
//! ```ignore
//! use mirror_core::{LocationStore, MirrorEngine, MirrorOptions, poll};
//!
//! fn example() -> mirror_core::Result<()> {
//!     let store = LocationStore::open("state/locations.toml")?;
//!     let mut engine = MirrorEngine::new("in", "out", store, MirrorOptions::default())?;
//!     let report = poll::run(&mut engine, None);
//!     println!("{} actions", report.actions.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod poll;
pub mod store;
pub mod sync;

pub use error::{Error, Result};
pub use store::{LocationRecord, LocationStore, SyncPair};
pub use sync::{CycleReport, DeferralQueue, MirrorEngine, MirrorOptions};
