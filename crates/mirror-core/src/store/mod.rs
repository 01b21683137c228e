//! Persisted location store
//!
//! Maps (sync pair, entry identity) to the entry's last known source-relative
//! path. The store is a single TOML document holding two record kinds: sync
//! pair declarations and per-entry location records. Every mutating operation
//! persists immediately; the engine is the only reader and writer.

mod record;

pub use record::{LocationRecord, SyncPair};

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::Utc;
use fs2::FileExt;
use mirror_fs::EntryId;
use mirror_fs::path as fspath;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreData {
    /// Store format version for forward compatibility
    version: String,
    #[serde(default)]
    pairs: Vec<SyncPair>,
    #[serde(default)]
    locations: Vec<LocationRecord>,
}

impl StoreData {
    fn new() -> Self {
        Self {
            version: "1.0".to_string(),
            pairs: Vec::new(),
            locations: Vec::new(),
        }
    }
}

/// TOML-backed store of sync pairs and location records.
#[derive(Debug)]
pub struct LocationStore {
    path: PathBuf,
    data: StoreData,
}

impl LocationStore {
    /// Open the store file, initializing an empty document if absent.
    ///
    /// This is the schema initialization step and is fatal on failure:
    /// callers are expected to abort startup on an error here.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        Self::init(&path).map_err(|e| Error::StoreOpen {
            path: path.clone(),
            message: e.to_string(),
        })
    }

    fn init(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }
        if path.exists() {
            let data = Self::load(path)?;
            Ok(Self {
                path: path.to_path_buf(),
                data,
            })
        } else {
            let store = Self {
                path: path.to_path_buf(),
                data: StoreData::new(),
            };
            store.save()?;
            Ok(store)
        }
    }

    /// Load the store document with a shared lock.
    fn load(path: &Path) -> Result<StoreData> {
        let file = File::open(path)?;
        file.lock_shared()?;

        // Read through the locked file handle to avoid TOCTOU race
        let mut content = String::new();
        use std::io::Read;
        (&file).read_to_string(&mut content)?;
        let data: StoreData = toml::from_str(&content)?;

        // Lock released when file is dropped
        Ok(data)
    }

    /// Save the store document atomically with an exclusive lock.
    ///
    /// Uses write-to-temp-then-rename to prevent corruption.
    fn save(&self) -> Result<()> {
        let content = toml::to_string_pretty(&self.data)?;

        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;
        lock_file.lock_exclusive()?;

        let temp_path = self.path.with_extension("toml.tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, &self.path)?;

        // Lock released when lock_file is dropped
        Ok(())
    }

    /// Path of the backing store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Idempotent registration of a sync pair.
    pub fn upsert_pair(&mut self, pair: &SyncPair) -> Result<()> {
        if !self.data.pairs.contains(pair) {
            self.data.pairs.push(pair.clone());
            self.save()?;
        }
        Ok(())
    }

    /// Register the current source location of an entry.
    ///
    /// Appends; an identity observed again after create appears twice and
    /// reads resolve to the most recent record.
    pub fn create_location(&mut self, pair: &SyncPair, path: &str, identity: EntryId) -> Result<()> {
        self.data
            .locations
            .push(LocationRecord::new(pair, path, identity));
        self.save()
    }

    /// Most recent record for an identity, or none.
    ///
    /// Unknown identities never match: no move is detectable for them.
    pub fn read_location(&self, pair: &SyncPair, identity: &EntryId) -> Option<&LocationRecord> {
        if identity.is_unknown() {
            return None;
        }
        self.data
            .locations
            .iter()
            .rev()
            .find(|r| r.pair_matches(pair) && &r.identity == identity)
    }

    /// Rewrite the record keyed by (pair, old_path) in place; no-op when
    /// absent.
    pub fn update_location_path(
        &mut self,
        pair: &SyncPair,
        old_path: &str,
        new_path: &str,
    ) -> Result<()> {
        let mut changed = false;
        for record in self
            .data
            .locations
            .iter_mut()
            .filter(|r| r.pair_matches(pair) && r.path == old_path)
        {
            record.path = new_path.to_string();
            record.updated = Utc::now();
            changed = true;
        }
        if changed {
            self.save()?;
        }
        Ok(())
    }

    /// Remove the record for one source-relative path.
    pub fn remove_location(&mut self, pair: &SyncPair, path: &str) -> Result<()> {
        let before = self.data.locations.len();
        self.data
            .locations
            .retain(|r| !(r.pair_matches(pair) && r.path == path));
        if self.data.locations.len() != before {
            self.save()?;
        }
        Ok(())
    }

    /// Source-relative paths of records strictly under a subtree.
    pub fn locations_under(&self, pair: &SyncPair, prefix: &str) -> Vec<String> {
        self.data
            .locations
            .iter()
            .filter(|r| r.pair_matches(pair) && fspath::is_under(&r.path, prefix))
            .map(|r| r.path.clone())
            .collect()
    }

    /// Remove a record and every record under it.
    pub fn remove_subtree(&mut self, pair: &SyncPair, prefix: &str) -> Result<()> {
        let before = self.data.locations.len();
        self.data.locations.retain(|r| {
            !(r.pair_matches(pair) && (r.path == prefix || fspath::is_under(&r.path, prefix)))
        });
        if self.data.locations.len() != before {
            self.save()?;
        }
        Ok(())
    }

    /// All registered sync pairs.
    pub fn pairs(&self) -> &[SyncPair] {
        &self.data.pairs
    }

    /// All location records.
    pub fn locations(&self) -> &[LocationRecord] {
        &self.data.locations
    }
}
