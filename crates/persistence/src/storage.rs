//! Deck storage abstraction
//!
//! The `DeckStorage` trait is the persistence service's seam: revisioned
//! get/put of a whole deck document plus lease acquisition and release.
//! Implementations must make the revision compare and the write atomic per
//! deck id, and validate leases inside the same critical section.

use chrono::{DateTime, Duration, Utc};
use deck_model::Deck;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Result;

/// Monotonically increasing revision guarding optimistic writes.
///
/// Serialized as a bare integer so the external `rev` contract stays
/// stable regardless of backend.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Revision(pub u64);

impl Revision {
    pub fn new(rev: u64) -> Self {
        Self(rev)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Revision of a never-written document.
    pub fn initial() -> Self {
        Self(0)
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rev {}", self.0)
    }
}

/// An advisory lease on a deck: who intends to be the sole editor, and
/// until when. Advisory at the product level, but acquisition and write
/// validation are atomic, so two racing callers cannot both win.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lease {
    pub holder: String,
    pub expires_at: DateTime<Utc>,
}

impl Lease {
    pub fn new(holder: impl Into<String>, ttl: Duration) -> Self {
        Self {
            holder: holder.into(),
            expires_at: Utc::now() + ttl,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// The stored state of one deck id.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DeckEntry {
    pub doc: Option<Deck>,
    pub rev: Revision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lease: Option<Lease>,
}

/// What `get`/`put` return: the external record shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeckRecord {
    pub id: String,
    pub doc: Option<Deck>,
    pub rev: Revision,
}

impl DeckRecord {
    /// The create-on-read placeholder for a never-written id.
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            doc: None,
            rev: Revision::initial(),
        }
    }
}

/// Trait for revisioned deck storage backends.
///
/// # Atomicity
///
/// `put` compares the caller's revision against the stored one and writes
/// in a single critical section per deck id; of several writers racing on
/// the same stored revision, exactly one succeeds and the rest get
/// `Conflict`. Lease checks happen inside the same section.
///
/// # Thread Safety
///
/// Methods take `&self`; implementations use internal locking and are
/// shared behind `Arc`.
pub trait DeckStorage: Send + Sync {
    /// Read the stored record. A never-written id returns
    /// `{doc: None, rev: 0}` — absence is a success case, not an error.
    fn get(&self, deck_id: &str) -> Result<DeckRecord>;

    /// Compare-and-write the whole document.
    ///
    /// `holder` identifies the writer for lease validation; a writer that
    /// does not participate in locking passes `None` and is fenced only
    /// while someone else holds a live lease.
    fn put(&self, deck_id: &str, doc: Deck, rev: Revision, holder: Option<&str>)
        -> Result<DeckRecord>;

    /// Atomically acquire (or renew) the lease on a deck.
    ///
    /// Succeeds when no lease exists, the existing one has expired, or the
    /// caller already holds it. Otherwise fails with `LeaseHeld`.
    fn acquire_lease(&self, deck_id: &str, holder: &str, ttl: Duration) -> Result<Lease>;

    /// Release the lease if held by `holder`; a no-op otherwise.
    fn release_lease(&self, deck_id: &str, holder: &str) -> Result<()>;
}

/// Shared compare-and-write logic applied to an entry under its backend's
/// critical section.
pub(crate) fn put_entry(
    entry: &mut DeckEntry,
    deck_id: &str,
    doc: Deck,
    rev: Revision,
    holder: Option<&str>,
) -> Result<DeckRecord> {
    if let Some(lease) = &entry.lease {
        if !lease.is_expired() && holder != Some(lease.holder.as_str()) {
            return Err(crate::PersistError::LeaseHeld {
                holder: lease.holder.clone(),
                expires_at: lease.expires_at,
            });
        }
    }

    if rev < entry.rev {
        return Err(crate::PersistError::Conflict {
            caller: rev.value(),
            stored: entry.rev.value(),
        });
    }

    entry.rev = entry.rev.next();
    entry.doc = Some(doc);

    Ok(DeckRecord {
        id: deck_id.to_string(),
        doc: entry.doc.clone(),
        rev: entry.rev,
    })
}

/// Shared lease-acquisition logic.
pub(crate) fn acquire_entry_lease(
    entry: &mut DeckEntry,
    holder: &str,
    ttl: Duration,
) -> Result<Lease> {
    if let Some(lease) = &entry.lease {
        if !lease.is_expired() && lease.holder != holder {
            return Err(crate::PersistError::LeaseHeld {
                holder: lease.holder.clone(),
                expires_at: lease.expires_at,
            });
        }
    }

    let lease = Lease::new(holder, ttl);
    entry.lease = Some(lease.clone());
    Ok(lease)
}
