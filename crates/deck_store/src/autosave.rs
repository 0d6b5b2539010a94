//! Autosave: debounced, coalesced, single-flight
//!
//! Every mutation signals the worker through a capacity-1 channel. The
//! worker waits out a debounce window after the last signal, then saves.
//! Because there is exactly one worker per session and at most one queued
//! trigger, a burst of mutations becomes one save, and a trigger landing
//! while a save is in flight becomes exactly one follow-up save rather
//! than a concurrent one.

use crate::{DeckBackend, DeckStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// Autosave configuration
#[derive(Debug, Clone)]
pub struct AutosaveConfig {
    /// Quiet period after the last mutation before a save fires
    pub debounce: Duration,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(600),
        }
    }
}

impl AutosaveConfig {
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

/// Handle to a running autosave worker. Dropping it (or calling `stop`)
/// ends the worker after any in-flight save completes.
pub struct AutosaveHandle {
    task: JoinHandle<()>,
}

impl AutosaveHandle {
    pub fn stop(self) {
        self.task.abort();
    }

    /// Wait for the worker to exit (it exits when the store drops its
    /// trigger channel, i.e. when the session ends).
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

/// Start the autosave worker for a session.
pub fn spawn_autosave<B>(
    store: Arc<DeckStore<B>>,
    deck_id: impl Into<String>,
    config: AutosaveConfig,
) -> AutosaveHandle
where
    B: DeckBackend + 'static,
{
    let deck_id = deck_id.into();
    // Capacity 1: a pending trigger coalesces everything behind it
    let (tx, mut rx) = mpsc::channel::<()>(1);
    store.set_autosave_sender(tx);

    let task = tokio::spawn(async move {
        while rx.recv().await.is_some() {
            // Debounce: keep extending the window while triggers arrive
            loop {
                match timeout(config.debounce, rx.recv()).await {
                    Ok(Some(())) => continue,
                    Ok(None) => return,
                    Err(_) => break,
                }
            }

            // Single worker, so this is the only save in flight. Triggers
            // arriving during the await queue (at most one) in the channel.
            if let Err(err) = store.save_to_server(&deck_id).await {
                tracing::warn!(deck_id = %deck_id, error = %err, "autosave failed");
            }
        }
    });

    AutosaveHandle { task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BackendError, BackendResult};
    use chrono::Duration as ChronoDuration;
    use deck_model::{Deck, RectShape, Shape, ShapeBase, Slide};
    use persistence::{DeckRecord, DeckStorage, Lease, MemoryStore, Revision};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend wrapper that counts puts and can slow them down, to observe
    /// coalescing and single-flight behavior.
    struct CountingBackend {
        inner: Arc<MemoryStore>,
        puts: AtomicUsize,
        put_delay: Duration,
    }

    impl CountingBackend {
        fn new(put_delay: Duration) -> Self {
            Self {
                inner: Arc::new(MemoryStore::new()),
                puts: AtomicUsize::new(0),
                put_delay,
            }
        }

        fn put_count(&self) -> usize {
            self.puts.load(Ordering::SeqCst)
        }
    }

    impl DeckBackend for Arc<CountingBackend> {
        async fn get(&self, deck_id: &str) -> BackendResult<DeckRecord> {
            self.inner
                .get(deck_id)
                .map_err(|e| BackendError::Unavailable(e.to_string()))
        }

        async fn put(
            &self,
            deck_id: &str,
            doc: Deck,
            rev: Revision,
            holder: Option<&str>,
        ) -> BackendResult<DeckRecord> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.put_delay).await;
            self.inner.put(deck_id, doc, rev, holder).map_err(|e| match e {
                persistence::PersistError::Conflict { .. } => BackendError::Conflict,
                other => BackendError::Unavailable(other.to_string()),
            })
        }

        async fn acquire_lease(
            &self,
            deck_id: &str,
            holder: &str,
            ttl: ChronoDuration,
        ) -> BackendResult<Lease> {
            self.inner
                .acquire_lease(deck_id, holder, ttl)
                .map_err(|e| BackendError::Unavailable(e.to_string()))
        }

        async fn release_lease(&self, deck_id: &str, holder: &str) -> BackendResult<()> {
            self.inner
                .release_lease(deck_id, holder)
                .map_err(|e| BackendError::Unavailable(e.to_string()))
        }
    }

    fn rect(id: &str, z: i64) -> Shape {
        Shape::Rect(RectShape {
            base: ShapeBase {
                id: id.to_string(),
                x: 0.0,
                y: 0.0,
                w: 10.0,
                h: 10.0,
                z,
                rotation: None,
            },
            corner_radius: None,
            fill: None,
            stroke: None,
            stroke_width: None,
        })
    }

    fn session(backend: Arc<CountingBackend>) -> Arc<DeckStore<Arc<CountingBackend>>> {
        let store = Arc::new(DeckStore::new(backend));
        let mut deck = Deck::new(1920.0, 1080.0);
        deck.slides.push(Slide::new());
        store.set_deck(deck);
        store
    }

    #[tokio::test]
    async fn test_burst_of_mutations_coalesces_into_one_save() {
        let backend = Arc::new(CountingBackend::new(Duration::ZERO));
        let store = session(backend.clone());
        let _handle = spawn_autosave(
            store.clone(),
            "d",
            AutosaveConfig::default().with_debounce(Duration::from_millis(50)),
        );

        for i in 0..10 {
            store.upsert_shape(rect(&format!("s{}", i), i));
        }

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(backend.put_count(), 1);
        assert_eq!(store.revision(), Revision::new(1));
    }

    #[tokio::test]
    async fn test_trigger_during_save_queues_exactly_one_followup() {
        // Saves take 200ms; mutations land mid-save
        let backend = Arc::new(CountingBackend::new(Duration::from_millis(200)));
        let store = session(backend.clone());
        let _handle = spawn_autosave(
            store.clone(),
            "d",
            AutosaveConfig::default().with_debounce(Duration::from_millis(20)),
        );

        store.upsert_shape(rect("first", 1));
        // Let the debounce elapse and the save start
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(backend.put_count(), 1);

        // Several triggers while the save is still in flight
        store.upsert_shape(rect("second", 2));
        store.upsert_shape(rect("third", 3));
        store.upsert_shape(rect("fourth", 4));

        tokio::time::sleep(Duration::from_millis(600)).await;
        // One original save plus exactly one queued follow-up
        assert_eq!(backend.put_count(), 2);
        assert_eq!(store.revision(), Revision::new(2));
    }

    #[tokio::test]
    async fn test_quiet_session_never_saves() {
        let backend = Arc::new(CountingBackend::new(Duration::ZERO));
        let store = Arc::new(DeckStore::new(backend.clone()));
        let _handle = spawn_autosave(
            store.clone(),
            "d",
            AutosaveConfig::default().with_debounce(Duration::from_millis(20)),
        );

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(backend.put_count(), 0);
    }
}
