//! Persistent shortlist of movies kept after a swipe session.
//!
//! Right-swiped candidates land here once the user assigns each one a
//! disposition. Entries are keyed by movie id and committing an id that
//! is already present is a no-op, so replaying a hand-off never
//! duplicates or rewrites an entry.

use catalog::{Movie, MovieId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store::{KvStore, keys, read_or_default, write};
use tracing::debug;

use crate::error::Result;

// ===== Entry Types =====

/// When the user intends to watch a shortlisted movie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// Watch as soon as possible
    WatchNow,
    /// Keep around for a future movie night
    WatchLater,
}

/// A single shortlisted movie with its viewing intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortlistEntry {
    /// The shortlisted movie
    pub movie: Movie,
    /// Viewing intent chosen when the entry was committed
    pub disposition: Disposition,
    /// Whether the movie has been watched since shortlisting
    pub watched: bool,
    /// When the entry was committed
    pub added_at: DateTime<Utc>,
}

// ===== Shortlist =====

/// Ordered collection of shortlist entries, newest first
#[derive(Debug, Default)]
pub struct Shortlist {
    entries: Vec<ShortlistEntry>,
}

impl Shortlist {
    /// Creates an empty shortlist
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the persisted shortlist, starting empty if absent
    pub fn load(store: &dyn KvStore) -> Self {
        Self {
            entries: read_or_default(store, keys::SHORTLIST),
        }
    }

    /// Persists the shortlist
    pub fn save(&self, store: &dyn KvStore) -> Result<()> {
        write(store, keys::SHORTLIST, &self.entries)?;
        Ok(())
    }

    /// Commits a movie with the given disposition.
    ///
    /// Returns false without touching the existing entry when the movie
    /// is already shortlisted.
    pub fn commit(&mut self, movie: Movie, disposition: Disposition, now: DateTime<Utc>) -> bool {
        if self.entries.iter().any(|entry| entry.movie.id == movie.id) {
            debug!(movie_id = movie.id, "movie already shortlisted, keeping original entry");
            return false;
        }

        self.entries.insert(
            0,
            ShortlistEntry {
                movie,
                disposition,
                watched: false,
                added_at: now,
            },
        );
        true
    }

    /// Removes the entry for a movie, returning whether it was present
    pub fn remove(&mut self, movie_id: MovieId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.movie.id != movie_id);
        self.entries.len() != before
    }

    /// Marks a shortlisted movie as watched, returning whether it was found
    pub fn mark_watched(&mut self, movie_id: MovieId) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.movie.id == movie_id)
        {
            Some(entry) => {
                entry.watched = true;
                true
            }
            None => false,
        }
    }

    /// All entries, newest first
    pub fn entries(&self) -> &[ShortlistEntry] {
        &self.entries
    }

    /// Number of shortlisted movies
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the shortlist is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Takes the movies a finished session handed off, clearing the hand-off
/// slot so they are only offered for disposition once.
pub fn take_pending_picks(store: &dyn KvStore) -> Result<Vec<Movie>> {
    let picks: Vec<Movie> = read_or_default(store, keys::PENDING_PICKS);
    if !picks.is_empty() {
        store.remove(keys::PENDING_PICKS)?;
    }
    Ok(picks)
}
