//! The persistence seam the client session talks through
//!
//! `DeckBackend` is the async interface to the persistence service. In
//! production it is an HTTP client against the deck server; in-process it
//! adapts any `DeckStorage` directly, which is also what the tests use.

use crate::{BackendError, BackendResult};
use chrono::Duration;
use deck_model::Deck;
use persistence::{DeckRecord, DeckStorage, Lease, PersistError, Revision};
use std::sync::Arc;

/// Async revisioned deck persistence, as seen from the client session.
#[trait_variant::make(Send)]
pub trait DeckBackend: Send + Sync {
    /// Fetch the stored record; a never-written id comes back with
    /// `doc: None, rev: 0`.
    async fn get(&self, deck_id: &str) -> BackendResult<DeckRecord>;

    /// Optimistic whole-document write.
    async fn put(
        &self,
        deck_id: &str,
        doc: Deck,
        rev: Revision,
        holder: Option<&str>,
    ) -> BackendResult<DeckRecord>;

    /// Acquire or renew the advisory lease.
    async fn acquire_lease(
        &self,
        deck_id: &str,
        holder: &str,
        ttl: Duration,
    ) -> BackendResult<Lease>;

    /// Release the lease if held.
    async fn release_lease(&self, deck_id: &str, holder: &str) -> BackendResult<()>;
}

fn map_err(err: PersistError) -> BackendError {
    match err {
        PersistError::Conflict { .. } => BackendError::Conflict,
        PersistError::LeaseHeld { holder, .. } => BackendError::LeaseHeld(holder),
        other => BackendError::Unavailable(other.to_string()),
    }
}

/// Adapter running a `DeckStorage` in-process.
#[derive(Clone)]
pub struct LocalBackend {
    storage: Arc<dyn DeckStorage>,
}

impl LocalBackend {
    pub fn new(storage: Arc<dyn DeckStorage>) -> Self {
        Self { storage }
    }
}

impl DeckBackend for LocalBackend {
    async fn get(&self, deck_id: &str) -> BackendResult<DeckRecord> {
        self.storage.get(deck_id).map_err(map_err)
    }

    async fn put(
        &self,
        deck_id: &str,
        doc: Deck,
        rev: Revision,
        holder: Option<&str>,
    ) -> BackendResult<DeckRecord> {
        self.storage.put(deck_id, doc, rev, holder).map_err(map_err)
    }

    async fn acquire_lease(
        &self,
        deck_id: &str,
        holder: &str,
        ttl: Duration,
    ) -> BackendResult<Lease> {
        self.storage
            .acquire_lease(deck_id, holder, ttl)
            .map_err(map_err)
    }

    async fn release_lease(&self, deck_id: &str, holder: &str) -> BackendResult<()> {
        self.storage
            .release_lease(deck_id, holder)
            .map_err(map_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use persistence::MemoryStore;

    #[tokio::test]
    async fn test_local_backend_maps_conflict() {
        let backend = LocalBackend::new(Arc::new(MemoryStore::new()));
        let deck = Deck::new(100.0, 100.0);

        backend.put("d", deck.clone(), Revision::new(0), None).await.unwrap();
        backend.put("d", deck.clone(), Revision::new(1), None).await.unwrap();

        let err = backend
            .put("d", deck, Revision::new(0), None)
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Conflict));
    }

    #[tokio::test]
    async fn test_local_backend_maps_lease() {
        let backend = LocalBackend::new(Arc::new(MemoryStore::new()));
        backend
            .acquire_lease("d", "alice", Duration::seconds(60))
            .await
            .unwrap();

        let err = backend
            .acquire_lease("d", "bob", Duration::seconds(60))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::LeaseHeld(holder) if holder == "alice"));
    }
}
