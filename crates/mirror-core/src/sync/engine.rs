//! Reconciliation engine
//!
//! One cycle is a full source-side pass (create, update, move) followed by a
//! full destination-side pass (orphan cleanup). The two passes are
//! independent sweeps over two independent snapshots; the deferral queue
//! bridges them across cycles so a rename is never torn down mid-move.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use mirror_fs::path as fspath;
use mirror_fs::{EntryId, IdentityResolver, OsIdentity, io};

use super::deferral::DeferralQueue;
use super::report::CycleReport;
use crate::store::{LocationStore, SyncPair};
use crate::{Error, Result};

/// Options for reconciliation cycles
#[derive(Debug, Clone)]
pub struct MirrorOptions {
    /// Defer orphan deletion by one cycle
    pub defer_deletes: bool,
    /// Compute decisions without modifying the destination or the store.
    /// Actions are prefixed with "[dry-run] Would ..."
    pub dry_run: bool,
}

impl Default for MirrorOptions {
    fn default() -> Self {
        Self {
            defer_deletes: true,
            dry_run: false,
        }
    }
}

/// Engine reconciling one destination tree against one source tree.
///
/// Owns all mutable cycle state: the store handle, the deferral queue, and
/// the identity resolver. Fully sequential; one entry is handled to
/// completion before the next is looked at.
pub struct MirrorEngine {
    pair: SyncPair,
    source_root: PathBuf,
    dest_root: PathBuf,
    store: LocationStore,
    deferral: DeferralQueue,
    options: MirrorOptions,
    resolver: Box<dyn IdentityResolver>,
}

impl MirrorEngine {
    /// Create an engine and idempotently register its sync pair.
    pub fn new(
        source_root: impl AsRef<Path>,
        dest_root: impl AsRef<Path>,
        mut store: LocationStore,
        options: MirrorOptions,
    ) -> Result<Self> {
        let source_root = source_root.as_ref().to_path_buf();
        let dest_root = dest_root.as_ref().to_path_buf();
        let pair = SyncPair::new(&source_root, &dest_root);
        store.upsert_pair(&pair)?;
        Ok(Self {
            pair,
            source_root,
            dest_root,
            store,
            deferral: DeferralQueue::new(),
            options,
            resolver: Box::new(OsIdentity),
        })
    }

    /// Replace the identity resolver, e.g. with [`mirror_fs::NullIdentity`]
    /// on filesystems without stable identities.
    pub fn with_resolver(mut self, resolver: Box<dyn IdentityResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn dest_root(&self) -> &Path {
        &self.dest_root
    }

    pub fn store(&self) -> &LocationStore {
        &self.store
    }

    /// Run one reconciliation cycle.
    ///
    /// Per-entry failures are logged, collected into the report, and do not
    /// abort the remaining traversal.
    pub fn run_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::new();

        if !self.options.dry_run
            && let Err(e) = fs::create_dir_all(&self.dest_root)
        {
            note_error(&mut report, &self.dest_root, &e);
            report.success = false;
            return report;
        }

        self.source_pass(&mut report);
        self.dest_pass(&mut report);

        report.success = report.errors.is_empty();
        report
    }

    fn source_pass(&mut self, report: &mut CycleReport) {
        for entry in WalkDir::new(&self.source_root).min_depth(1) {
            let path = match entry {
                Ok(entry) => entry.into_path(),
                Err(e) => {
                    let path = e.path().unwrap_or(Path::new("?")).to_path_buf();
                    note_error(report, &path, &e);
                    continue;
                }
            };
            if let Err(e) = self.sync_source_entry(&path, report) {
                note_error(report, &path, &e);
            }
        }
    }

    fn dest_pass(&mut self, report: &mut CycleReport) {
        if !self.dest_root.exists() {
            // nothing mirrored yet (dry-run against a fresh destination)
            return;
        }
        // snapshot first: subtree deletes must not disturb the traversal
        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.dest_root).min_depth(1) {
            match entry {
                Ok(entry) => entries.push(entry.into_path()),
                Err(e) => {
                    let path = e.path().unwrap_or(Path::new("?")).to_path_buf();
                    note_error(report, &path, &e);
                }
            }
        }
        for dest_path in entries {
            if let Err(e) = self.sweep_dest_entry(&dest_path, report) {
                note_error(report, &dest_path, &e);
            }
        }
    }

    /// Source-side handler: create, update, or move one entry.
    fn sync_source_entry(&mut self, src_path: &Path, report: &mut CycleReport) -> Result<()> {
        let rel = fspath::relative_to(src_path, &self.source_root).map_err(Error::Fs)?;
        let dest_path = self.dest_root.join(&rel);

        if dest_path.exists() {
            if src_path.exists() {
                self.refresh_entry(src_path, &dest_path, &rel, report)?;
            }
            // source vanished mid-walk: the destination pass of a later
            // cycle picks the leftover up as an orphan
        } else {
            self.place_entry(src_path, &dest_path, &rel, report)?;
        }
        Ok(())
    }

    /// Both sides exist: overwrite the destination on any mtime mismatch.
    ///
    /// This is a snapshot diff, not last-writer-wins: an external edit made
    /// directly to the destination is clobbered here.
    fn refresh_entry(
        &mut self,
        src: &Path,
        dest: &Path,
        rel: &str,
        report: &mut CycleReport,
    ) -> Result<()> {
        let src_mtime = io::modified(src)?;
        let dest_mtime = io::modified(dest)?;
        if src_mtime == dest_mtime {
            return Ok(());
        }

        if self.options.dry_run {
            report.actions.push(format!("[dry-run] Would update {rel}"));
            return Ok(());
        }
        if src.is_dir() {
            io::copy_metadata(src, dest)?;
        } else {
            io::copy_file(src, dest)?;
        }
        debug!(path = rel, "updated");
        report.actions.push(format!("Updated {rel}"));
        Ok(())
    }

    /// Destination missing: detect a move via the location store, else
    /// create.
    fn place_entry(
        &mut self,
        src: &Path,
        dest: &Path,
        rel: &str,
        report: &mut CycleReport,
    ) -> Result<()> {
        let identity = self.resolver.resolve(src);

        if let Some(prior) = self.store.read_location(&self.pair, &identity) {
            let old_rel = prior.path.clone();
            let old_dest = self.dest_root.join(&old_rel);
            if old_dest.exists() {
                return self.relocate_entry(src, dest, &old_rel, rel, report);
            }
            // the old destination is already gone; fall through to create
        }
        self.create_entry(src, dest, rel, identity, report)
    }

    /// Move the previously mirrored content to its new destination path and
    /// rewrite the affected records.
    fn relocate_entry(
        &mut self,
        src: &Path,
        dest: &Path,
        old_rel: &str,
        new_rel: &str,
        report: &mut CycleReport,
    ) -> Result<()> {
        if self.options.dry_run {
            report
                .actions
                .push(format!("[dry-run] Would move {old_rel} -> {new_rel}"));
            return Ok(());
        }

        let old_dest = self.dest_root.join(old_rel);
        io::move_entry(&old_dest, dest)?;
        self.store
            .update_location_path(&self.pair, old_rel, new_rel)?;

        if src.is_dir() {
            // remap every record that lived under the moved subtree
            for descendant in self.store.locations_under(&self.pair, old_rel) {
                let remapped = fspath::reprefix(&descendant, old_rel, new_rel);
                self.store
                    .update_location_path(&self.pair, &descendant, &remapped)?;
            }
        }
        debug!(from = old_rel, to = new_rel, "moved");
        report.actions.push(format!("Moved {old_rel} -> {new_rel}"));
        Ok(())
    }

    /// Copy the entry into the destination and register its records.
    fn create_entry(
        &mut self,
        src: &Path,
        dest: &Path,
        rel: &str,
        identity: EntryId,
        report: &mut CycleReport,
    ) -> Result<()> {
        if self.options.dry_run {
            report.actions.push(format!("[dry-run] Would create {rel}"));
            return Ok(());
        }

        io::ensure_parent(dest)?;
        if src.is_dir() {
            io::copy_tree(src, dest)?;
            self.store.create_location(&self.pair, rel, identity)?;
            // one record per descendant, identities taken from the source
            // side (the copies have fresh identities of their own)
            for entry in WalkDir::new(src).min_depth(1) {
                let entry = entry.map_err(mirror_fs::Error::walk)?;
                let child_rel =
                    fspath::relative_to(entry.path(), &self.source_root).map_err(Error::Fs)?;
                let child_id = self.resolver.resolve(entry.path());
                self.store.create_location(&self.pair, &child_rel, child_id)?;
            }
        } else {
            io::copy_file(src, dest)?;
            self.store.create_location(&self.pair, rel, identity)?;
        }
        debug!(path = rel, "created");
        report.actions.push(format!("Created {rel}"));
        Ok(())
    }

    /// Destination-side handler: queue or delete one orphan.
    fn sweep_dest_entry(&mut self, dest_path: &Path, report: &mut CycleReport) -> Result<()> {
        let rel = fspath::relative_to(dest_path, &self.dest_root).map_err(Error::Fs)?;
        let src_path = self.source_root.join(&rel);

        if !dest_path.exists() {
            // already removed as part of an earlier subtree delete
            return Ok(());
        }
        if src_path.exists() {
            self.deferral.evict(dest_path);
            return Ok(());
        }

        if self.options.dry_run {
            let verb = if !self.options.defer_deletes || self.deferral.is_pending(dest_path) {
                "delete"
            } else {
                "defer deletion of"
            };
            report.actions.push(format!("[dry-run] Would {verb} {rel}"));
            return Ok(());
        }

        if self.options.defer_deletes && !self.deferral.confirm(dest_path) {
            debug!(path = rel, "orphan queued for deletion");
            report.actions.push(format!("Deferred deletion of {rel}"));
            return Ok(());
        }

        self.delete_entry(dest_path, &rel, report)
    }

    fn delete_entry(
        &mut self,
        dest_path: &Path,
        rel: &str,
        report: &mut CycleReport,
    ) -> Result<()> {
        if dest_path.is_dir() {
            io::remove_tree(dest_path)?;
            self.store.remove_subtree(&self.pair, rel)?;
            self.deferral.evict_subtree(dest_path);
        } else {
            io::remove_file(dest_path)?;
            self.store.remove_location(&self.pair, rel)?;
        }
        debug!(path = rel, "deleted orphan");
        report.actions.push(format!("Deleted {rel}"));
        Ok(())
    }
}

fn note_error(report: &mut CycleReport, path: &Path, err: &dyn std::fmt::Display) {
    warn!(path = %path.display(), error = %err, "entry failed, continuing");
    report.errors.push(format!("{}: {}", path.display(), err));
}
