//! File-based deck storage
//!
//! One JSON file per deck id under a base directory:
//!
//! ```text
//! data/
//! └── {escaped deck id}.json    # DeckEntry: doc + rev + lease
//! ```
//!
//! Persistent across restarts. A per-deck mutex serializes the
//! read-modify-write cycle so the revision compare-and-write stays atomic
//! per deck id while different decks proceed concurrently.

use crate::{
    acquire_entry_lease, put_entry, DeckEntry, DeckRecord, DeckStorage, Lease, Result, Revision,
};
use chrono::Duration;
use deck_model::Deck;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

/// Map a deck id to its file stem. Deck ids come from URLs; characters
/// outside the filesystem-safe set are escaped as `%XX` per byte (with
/// `%` itself escaped), so the mapping is injective: distinct ids never
/// share a file.
fn file_stem(deck_id: &str) -> String {
    let mut stem = String::with_capacity(deck_id.len());
    for byte in deck_id.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' | b'-' => stem.push(byte as char),
            other => {
                stem.push('%');
                stem.push_str(&format!("{:02X}", other));
            }
        }
    }
    if stem.is_empty() {
        // Only the empty id reaches here; "%" cannot be produced above
        stem.push('%');
    }
    stem
}

/// File-based implementation of `DeckStorage`.
pub struct FileStore {
    base_path: PathBuf,
    /// Per-deck write locks
    deck_locks: RwLock<HashMap<String, Arc<Mutex<()>>>>,
}

impl FileStore {
    /// Create a store rooted at `base_path`, creating the directory if
    /// needed.
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        Ok(Self {
            base_path,
            deck_locks: RwLock::new(HashMap::new()),
        })
    }

    fn lock_for(&self, deck_id: &str) -> Arc<Mutex<()>> {
        // Keyed by the file stem, the same granularity the files have
        let stem = file_stem(deck_id);
        if let Some(lock) = self.deck_locks.read().unwrap().get(&stem) {
            return lock.clone();
        }
        self.deck_locks
            .write()
            .unwrap()
            .entry(stem)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn deck_path(&self, deck_id: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", file_stem(deck_id)))
    }

    fn read_entry(&self, deck_id: &str) -> Result<DeckEntry> {
        let path = self.deck_path(deck_id);
        if !path.exists() {
            return Ok(DeckEntry::default());
        }
        let data = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn write_entry(&self, deck_id: &str, entry: &DeckEntry) -> Result<()> {
        let path = self.deck_path(deck_id);
        // Write-then-rename so a crash never leaves a torn file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string(entry)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

impl DeckStorage for FileStore {
    fn get(&self, deck_id: &str) -> Result<DeckRecord> {
        let entry = self.read_entry(deck_id)?;
        Ok(DeckRecord {
            id: deck_id.to_string(),
            doc: entry.doc,
            rev: entry.rev,
        })
    }

    fn put(
        &self,
        deck_id: &str,
        doc: Deck,
        rev: Revision,
        holder: Option<&str>,
    ) -> Result<DeckRecord> {
        let lock = self.lock_for(deck_id);
        let _guard = lock.lock().unwrap();

        let mut entry = self.read_entry(deck_id)?;
        let record = put_entry(&mut entry, deck_id, doc, rev, holder)?;
        self.write_entry(deck_id, &entry)?;
        tracing::debug!(deck_id, rev = record.rev.value(), "stored deck to disk");
        Ok(record)
    }

    fn acquire_lease(&self, deck_id: &str, holder: &str, ttl: Duration) -> Result<Lease> {
        let lock = self.lock_for(deck_id);
        let _guard = lock.lock().unwrap();

        let mut entry = self.read_entry(deck_id)?;
        let lease = acquire_entry_lease(&mut entry, holder, ttl)?;
        self.write_entry(deck_id, &entry)?;
        Ok(lease)
    }

    fn release_lease(&self, deck_id: &str, holder: &str) -> Result<()> {
        let lock = self.lock_for(deck_id);
        let _guard = lock.lock().unwrap();

        let mut entry = self.read_entry(deck_id)?;
        if entry.lease.as_ref().is_some_and(|l| l.holder == holder) {
            entry.lease = None;
            self.write_entry(deck_id, &entry)?;
        }
        Ok(())
    }
}
