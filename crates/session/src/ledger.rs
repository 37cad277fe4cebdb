//! Exposure ledger: what has already been put in front of the user.
//!
//! Two collections with different lifetimes. The shown-ring remembers the
//! most recent presentations and forgets the oldest past its capacity, so
//! a movie can come around again eventually. The seen-set holds movies the
//! user explicitly dismissed as already watched and never forgets them.
//! A candidate is excluded from presentation if it appears in either.

use std::collections::{HashSet, VecDeque};

use catalog::MovieId;
use store::{KvStore, keys, read_or_default, write};

/// Bounded record of shown movies plus unbounded record of seen ones
#[derive(Debug)]
pub struct ExposureLedger {
    shown: VecDeque<MovieId>,
    seen: HashSet<MovieId>,
    capacity: usize,
}

impl ExposureLedger {
    /// Create an empty ledger with the given shown-ring capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            shown: VecDeque::with_capacity(capacity),
            seen: HashSet::new(),
            capacity,
        }
    }

    /// Load the ledger from the store. Oversized persisted rings (from a
    /// capacity change) keep their newest entries.
    pub fn load(store: &dyn KvStore, capacity: usize) -> Self {
        let shown: Vec<MovieId> = read_or_default(store, keys::SHOWN_MOVIES);
        let seen: Vec<MovieId> = read_or_default(store, keys::SEEN_MOVIES);

        let skip = shown.len().saturating_sub(capacity);
        Self {
            shown: shown.into_iter().skip(skip).collect(),
            seen: seen.into_iter().collect(),
            capacity,
        }
    }

    /// Persist both collections
    pub fn save(&self, store: &dyn KvStore) -> store::Result<()> {
        let shown: Vec<MovieId> = self.shown.iter().copied().collect();
        let mut seen: Vec<MovieId> = self.seen.iter().copied().collect();
        seen.sort_unstable();

        write(store, keys::SHOWN_MOVIES, &shown)?;
        write(store, keys::SEEN_MOVIES, &seen)?;
        Ok(())
    }

    /// Record a presentation, evicting the oldest entry past capacity
    pub fn record_shown(&mut self, id: MovieId) {
        self.shown.push_back(id);
        while self.shown.len() > self.capacity {
            self.shown.pop_front();
        }
    }

    /// Record an explicit "already seen" dismissal
    pub fn mark_seen(&mut self, id: MovieId) {
        self.seen.insert(id);
    }

    /// Whether the movie is still in the shown-ring
    pub fn was_shown(&self, id: MovieId) -> bool {
        self.shown.contains(&id)
    }

    /// Whether the movie was ever dismissed as seen
    pub fn was_seen(&self, id: MovieId) -> bool {
        self.seen.contains(&id)
    }

    /// Whether the movie should be excluded from presentation
    pub fn contains(&self, id: MovieId) -> bool {
        self.was_shown(id) || self.was_seen(id)
    }

    /// Snapshot of every excluded id, for handing to a background task
    pub fn exposed_ids(&self) -> HashSet<MovieId> {
        self.shown.iter().chain(self.seen.iter()).copied().collect()
    }

    /// Number of entries in the shown-ring
    pub fn shown_len(&self) -> usize {
        self.shown.len()
    }

    /// Number of movies dismissed as seen
    pub fn seen_len(&self) -> usize {
        self.seen.len()
    }
}
