//! The deck session store
//!
//! Holds the one authoritative in-memory deck for an editing session.
//! Mutations are synchronous and cheap (a short mutex section); loads and
//! saves are async backend calls. A write conflict means someone else won
//! the revision race: the session reloads server state and discards its
//! unsaved delta. That data loss is the documented tradeoff of
//! whole-document replace; there is no field-level merge.

use crate::{BackendError, DeckBackend, Result};
use chrono::Duration;
use deck_model::{Deck, Shape};
use persistence::Revision;
use std::sync::Mutex;
use tokio::sync::mpsc;

/// What a save attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Document stored; the session adopted the new revision.
    Saved(Revision),
    /// Someone else wrote first; server state was reloaded and the local
    /// delta discarded.
    Conflicted,
    /// A save was already in flight; a follow-up has been queued.
    AlreadyInFlight,
    /// Nothing loaded, nothing to save.
    NothingToSave,
}

struct SessionState {
    deck: Option<Deck>,
    rev: Revision,
    saving: bool,
    /// Lease holder id, once `try_lock` succeeds
    holder: Option<String>,
}

/// Client-side cache of one open deck plus its last-known revision.
pub struct DeckStore<B: DeckBackend> {
    backend: B,
    state: Mutex<SessionState>,
    /// Autosave trigger; capacity-1 channel so queued triggers coalesce
    autosave_tx: Mutex<Option<mpsc::Sender<()>>>,
}

impl<B: DeckBackend> DeckStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: Mutex::new(SessionState {
                deck: None,
                rev: Revision::initial(),
                saving: false,
                holder: None,
            }),
            autosave_tx: Mutex::new(None),
        }
    }

    /// Snapshot of the current deck, if one is loaded.
    pub fn deck(&self) -> Option<Deck> {
        self.state.lock().unwrap().deck.clone()
    }

    pub fn revision(&self) -> Revision {
        self.state.lock().unwrap().rev
    }

    pub fn is_saving(&self) -> bool {
        self.state.lock().unwrap().saving
    }

    /// Wire up the autosave trigger channel. Called by `spawn_autosave`.
    pub(crate) fn set_autosave_sender(&self, tx: mpsc::Sender<()>) {
        *self.autosave_tx.lock().unwrap() = Some(tx);
    }

    /// Signal the autosave worker. A full channel means a save trigger is
    /// already pending, which is exactly the coalescing we want.
    fn notify_dirty(&self) {
        if let Some(tx) = self.autosave_tx.lock().unwrap().as_ref() {
            let _ = tx.try_send(());
        }
    }

    /// Replace the in-memory deck wholesale.
    pub fn set_deck(&self, deck: Deck) {
        self.state.lock().unwrap().deck = Some(deck);
        self.notify_dirty();
    }

    /// Change which slide is current. Out-of-range indices are ignored.
    pub fn set_active(&self, index: usize) {
        {
            let mut state = self.state.lock().unwrap();
            let Some(deck) = state.deck.as_mut() else {
                return;
            };
            if index >= deck.slides.len() {
                tracing::warn!(index, slides = deck.slides.len(), "active index out of range");
                return;
            }
            deck.active = index;
        }
        self.notify_dirty();
    }

    /// Insert or replace a shape by id in the active slide, keeping the
    /// slide sorted by ascending `z`.
    pub fn upsert_shape(&self, shape: Shape) {
        {
            let mut state = self.state.lock().unwrap();
            let Some(deck) = state.deck.as_mut() else {
                return;
            };
            let Some(slide) = deck.active_slide_mut() else {
                return;
            };
            match slide.shapes.iter_mut().find(|s| s.id() == shape.id()) {
                Some(existing) => *existing = shape,
                None => slide.shapes.push(shape),
            }
            slide.sort_shapes_by_z();
        }
        self.notify_dirty();
    }

    /// Remove a shape by id from the active slide.
    pub fn delete_shape(&self, id: &str) {
        {
            let mut state = self.state.lock().unwrap();
            let Some(deck) = state.deck.as_mut() else {
                return;
            };
            let Some(slide) = deck.active_slide_mut() else {
                return;
            };
            slide.shapes.retain(|s| s.id() != id);
        }
        self.notify_dirty();
    }

    /// Fetch the stored document. An absent document leaves the local deck
    /// `None`; absence is not an error.
    pub async fn load_from_server(&self, deck_id: &str) -> Result<()> {
        let record = self.backend.get(deck_id).await?;
        let mut state = self.state.lock().unwrap();
        state.rev = record.rev;
        if let Some(doc) = record.doc {
            state.deck = Some(doc);
        }
        Ok(())
    }

    /// Push the local deck with its last-known revision.
    ///
    /// On conflict the session reloads and discards its delta. On storage
    /// failure the error propagates; the local deck is untouched.
    pub async fn save_to_server(&self, deck_id: &str) -> Result<SaveOutcome> {
        let (deck, rev, holder) = {
            let mut state = self.state.lock().unwrap();
            let Some(deck) = state.deck.clone() else {
                return Ok(SaveOutcome::NothingToSave);
            };
            if state.saving {
                drop(state);
                self.notify_dirty();
                return Ok(SaveOutcome::AlreadyInFlight);
            }
            state.saving = true;
            (deck, state.rev, state.holder.clone())
        };

        let result = self
            .backend
            .put(deck_id, deck, rev, holder.as_deref())
            .await;

        match result {
            Ok(record) => {
                let mut state = self.state.lock().unwrap();
                state.rev = record.rev;
                state.saving = false;
                tracing::debug!(deck_id, rev = record.rev.value(), "deck saved");
                Ok(SaveOutcome::Saved(record.rev))
            }
            Err(BackendError::Conflict) => {
                tracing::warn!(deck_id, "revision conflict, discarding unsaved local changes");
                let record = self.backend.get(deck_id).await;
                let mut state = self.state.lock().unwrap();
                state.saving = false;
                match record {
                    Ok(record) => {
                        state.rev = record.rev;
                        state.deck = record.doc;
                        Ok(SaveOutcome::Conflicted)
                    }
                    Err(err) => Err(err.into()),
                }
            }
            Err(err) => {
                self.state.lock().unwrap().saving = false;
                Err(err.into())
            }
        }
    }

    /// Try to become the sole intended editor of this deck.
    ///
    /// Returns `false` when someone else holds a live lease. The lease is
    /// advisory: nothing stops an editor that never calls this, but two
    /// callers racing here cannot both win.
    pub async fn try_lock(&self, deck_id: &str, holder: &str, ttl: Duration) -> Result<bool> {
        match self.backend.acquire_lease(deck_id, holder, ttl).await {
            Ok(_) => {
                self.state.lock().unwrap().holder = Some(holder.to_string());
                Ok(true)
            }
            Err(BackendError::LeaseHeld(by)) => {
                tracing::debug!(deck_id, held_by = %by, "lease unavailable");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Give the lease back.
    pub async fn release_lock(&self, deck_id: &str, holder: &str) -> Result<()> {
        self.backend.release_lease(deck_id, holder).await?;
        let mut state = self.state.lock().unwrap();
        if state.holder.as_deref() == Some(holder) {
            state.holder = None;
        }
        Ok(())
    }
}
