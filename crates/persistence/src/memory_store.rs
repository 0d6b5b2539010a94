//! In-memory deck storage
//!
//! `HashMap` behind an `RwLock`; the whole compare-and-write runs inside
//! one write-lock section, which is what makes `put` atomic per deck id.
//! Suitable for tests and single-process deployments.

use crate::{
    acquire_entry_lease, put_entry, DeckEntry, DeckRecord, DeckStorage, Lease, Result, Revision,
};
use chrono::Duration;
use deck_model::Deck;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory implementation of `DeckStorage`.
pub struct MemoryStore {
    decks: RwLock<HashMap<String, DeckEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            decks: RwLock::new(HashMap::new()),
        }
    }

    /// Number of decks that have state (written or leased).
    pub fn len(&self) -> usize {
        self.decks.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all stored state (test helper).
    pub fn clear(&self) {
        self.decks.write().unwrap().clear();
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckStorage for MemoryStore {
    fn get(&self, deck_id: &str) -> Result<DeckRecord> {
        let decks = self.decks.read().unwrap();
        Ok(match decks.get(deck_id) {
            Some(entry) => DeckRecord {
                id: deck_id.to_string(),
                doc: entry.doc.clone(),
                rev: entry.rev,
            },
            None => DeckRecord::empty(deck_id),
        })
    }

    fn put(
        &self,
        deck_id: &str,
        doc: Deck,
        rev: Revision,
        holder: Option<&str>,
    ) -> Result<DeckRecord> {
        let mut decks = self.decks.write().unwrap();
        let entry = decks.entry(deck_id.to_string()).or_default();
        let record = put_entry(entry, deck_id, doc, rev, holder)?;
        tracing::debug!(deck_id, rev = record.rev.value(), "stored deck");
        Ok(record)
    }

    fn acquire_lease(&self, deck_id: &str, holder: &str, ttl: Duration) -> Result<Lease> {
        let mut decks = self.decks.write().unwrap();
        let entry = decks.entry(deck_id.to_string()).or_default();
        acquire_entry_lease(entry, holder, ttl)
    }

    fn release_lease(&self, deck_id: &str, holder: &str) -> Result<()> {
        let mut decks = self.decks.write().unwrap();
        if let Some(entry) = decks.get_mut(deck_id) {
            if entry.lease.as_ref().is_some_and(|l| l.holder == holder) {
                entry.lease = None;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PersistError;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn deck() -> Deck {
        Deck::new(1920.0, 1080.0)
    }

    #[test]
    fn test_get_unwritten_is_empty_not_error() {
        let store = MemoryStore::new();
        let record = store.get("never-seen").unwrap();
        assert_eq!(record.rev, Revision::initial());
        assert!(record.doc.is_none());
    }

    #[test]
    fn test_put_increments_by_exactly_one() {
        let store = MemoryStore::new();

        let first = store.put("d", deck(), Revision::new(0), None).unwrap();
        assert_eq!(first.rev, Revision::new(1));

        let second = store.put("d", deck(), first.rev, None).unwrap();
        assert_eq!(second.rev, Revision::new(2));
    }

    #[test]
    fn test_stale_put_conflicts_and_leaves_state_alone() {
        let store = MemoryStore::new();
        let mut current = deck();
        current.active = 0;
        store.put("d", current, Revision::new(0), None).unwrap();
        store.put("d", deck(), Revision::new(1), None).unwrap();

        let err = store.put("d", deck(), Revision::new(1), None).unwrap_err();
        assert!(matches!(err, PersistError::Conflict { caller: 1, stored: 2 }));

        // Stored state unchanged by the failed write
        let record = store.get("d").unwrap();
        assert_eq!(record.rev, Revision::new(2));
    }

    #[test]
    fn test_ahead_of_stored_is_accepted() {
        // The compare is only "caller behind stored fails"
        let store = MemoryStore::new();
        let record = store.put("d", deck(), Revision::new(9), None).unwrap();
        assert_eq!(record.rev, Revision::new(1));
    }

    #[test]
    fn test_racing_writers_one_winner() {
        let store = Arc::new(MemoryStore::new());
        store.put("d", deck(), Revision::new(0), None).unwrap();

        // All writers race on stored rev 1; exactly one may win.
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(std::thread::spawn(move || {
                store.put("d", deck(), Revision::new(1), None).is_ok()
            }));
        }

        let wins = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|&won| won)
            .count();
        assert_eq!(wins, 1);
        assert_eq!(store.get("d").unwrap().rev, Revision::new(2));
    }

    #[test]
    fn test_lease_blocks_other_holder() {
        let store = MemoryStore::new();
        store
            .acquire_lease("d", "alice", Duration::seconds(60))
            .unwrap();

        let err = store
            .acquire_lease("d", "bob", Duration::seconds(60))
            .unwrap_err();
        assert!(matches!(err, PersistError::LeaseHeld { .. }));

        // Renewal by the same holder is fine
        store
            .acquire_lease("d", "alice", Duration::seconds(60))
            .unwrap();
    }

    #[test]
    fn test_put_under_foreign_lease_fails() {
        let store = MemoryStore::new();
        store
            .acquire_lease("d", "alice", Duration::seconds(60))
            .unwrap();

        let err = store
            .put("d", deck(), Revision::new(0), Some("bob"))
            .unwrap_err();
        assert!(matches!(err, PersistError::LeaseHeld { .. }));

        let err = store.put("d", deck(), Revision::new(0), None).unwrap_err();
        assert!(matches!(err, PersistError::LeaseHeld { .. }));

        // The holder writes through
        store
            .put("d", deck(), Revision::new(0), Some("alice"))
            .unwrap();
    }

    #[test]
    fn test_release_then_reacquire() {
        let store = MemoryStore::new();
        store
            .acquire_lease("d", "alice", Duration::seconds(60))
            .unwrap();

        // A non-holder release is a no-op
        store.release_lease("d", "bob").unwrap();
        assert!(store
            .acquire_lease("d", "bob", Duration::seconds(60))
            .is_err());

        store.release_lease("d", "alice").unwrap();
        store
            .acquire_lease("d", "bob", Duration::seconds(60))
            .unwrap();
    }

    #[test]
    fn test_expired_lease_is_reclaimable() {
        let store = MemoryStore::new();
        store
            .acquire_lease("d", "alice", Duration::seconds(-1))
            .unwrap();

        store
            .acquire_lease("d", "bob", Duration::seconds(60))
            .unwrap();
        store.put("d", deck(), Revision::new(0), Some("bob")).unwrap();
    }

    proptest! {
        #[test]
        fn prop_in_order_puts_always_succeed(count in 1usize..20) {
            let store = MemoryStore::new();
            let mut rev = Revision::initial();
            for i in 0..count {
                let record = store.put("d", deck(), rev, None).unwrap();
                prop_assert_eq!(record.rev.value(), (i as u64) + 1);
                rev = record.rev;
            }
        }

        #[test]
        fn prop_stale_rev_never_mutates(stale in 0u64..5, writes in 6u64..12) {
            let store = MemoryStore::new();
            let mut rev = Revision::initial();
            for _ in 0..writes {
                rev = store.put("d", deck(), rev, None).unwrap().rev;
            }
            prop_assert!(store.put("d", deck(), Revision::new(stale), None).is_err());
            prop_assert_eq!(store.get("d").unwrap().rev, rev);
        }
    }
}
