//! Favorites: the upward-swipe collection.
//!
//! Distinct from the shortlist. Unbounded, newest first, one entry per
//! movie.

use catalog::{Movie, MovieId};
use store::{KvStore, keys, read_or_default, write};

/// Saved favorites, newest first
#[derive(Debug, Default)]
pub struct Favorites {
    movies: Vec<Movie>,
}

impl Favorites {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Load favorites from the store
    pub fn load(store: &dyn KvStore) -> Self {
        Self {
            movies: read_or_default(store, keys::FAVORITES),
        }
    }

    /// Persist the collection
    pub fn save(&self, store: &dyn KvStore) -> store::Result<()> {
        write(store, keys::FAVORITES, &self.movies)
    }

    /// Add a movie to the front. Returns false if it was already saved.
    pub fn add(&mut self, movie: Movie) -> bool {
        if self.movies.iter().any(|m| m.id == movie.id) {
            return false;
        }
        self.movies.insert(0, movie);
        true
    }

    /// Remove a movie by id. Returns false if it was not saved.
    pub fn remove(&mut self, id: MovieId) -> bool {
        let before = self.movies.len();
        self.movies.retain(|m| m.id != id);
        self.movies.len() != before
    }

    /// All favorites, newest first
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Number of favorites
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}
