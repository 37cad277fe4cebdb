//! Group vote sessions over a shared pool of movies.
//!
//! A session owner draws a pool once and shares a short session id.
//! Every participant identifies itself with a per-device voter token and
//! casts toggling votes against pool movies. All state lives in the
//! shared key/value store, so any client that can see the store can
//! join, vote, and tally.

use std::collections::HashMap;
use std::time::Duration;

use catalog::{Movie, MovieId, RandomSource, alphanumeric_token};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store::{KvStore, keys, read, read_or_default, write};
use tracing::{debug, info};

use crate::error::{Result, SelectionError};

/// Length of generated session ids and voter tokens
pub const TOKEN_LENGTH: usize = 7;

// ===== Configuration =====

/// Tunables for vote sessions
#[derive(Debug, Clone)]
pub struct VoteConfig {
    /// Maximum number of movies drawn into a session pool
    pub pool_size: usize,
    /// How often watchers re-read the store looking for new votes
    pub poll_interval: Duration,
}

impl Default for VoteConfig {
    fn default() -> Self {
        Self {
            pool_size: 10,
            poll_interval: Duration::from_secs(2),
        }
    }
}

impl VoteConfig {
    /// Sets the pool size
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Sets the poll interval
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

// ===== Records =====

/// One standing vote by one voter for one movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteRecord {
    /// Movie the vote is for
    pub movie_id: MovieId,
    /// Token of the voter who cast it
    pub voter: String,
    /// When the vote was cast
    pub cast_at: DateTime<Utc>,
}

/// Outcome of toggling a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteToggle {
    /// The vote was not standing and is now recorded
    Added,
    /// The vote was standing and is now withdrawn
    Removed,
}

// ===== Session =====

/// A vote session bound to its immutable movie pool
#[derive(Debug)]
pub struct VoteSession {
    id: String,
    pool: Vec<Movie>,
}

impl VoteSession {
    /// Creates a new session, drawing its pool once from the candidates.
    ///
    /// The pool is truncated to the configured size and persisted under
    /// the session id. Fails if the id is already taken.
    pub fn create(
        store: &dyn KvStore,
        id: &str,
        candidates: Vec<Movie>,
        config: &VoteConfig,
    ) -> Result<Self> {
        let pool_key = keys::vote_pool(id);
        if store.get_raw(&pool_key).is_some() {
            return Err(SelectionError::SessionExists { id: id.to_string() });
        }

        let mut pool = candidates;
        pool.truncate(config.pool_size);
        write(store, &pool_key, &pool)?;

        info!(session_id = %id, pool_size = pool.len(), "created vote session");
        Ok(Self {
            id: id.to_string(),
            pool,
        })
    }

    /// Opens an existing session by id
    pub fn load(store: &dyn KvStore, id: &str) -> Result<Self> {
        let pool: Vec<Movie> = read(store, &keys::vote_pool(id))
            .ok_or_else(|| SelectionError::UnknownSession { id: id.to_string() })?;
        Ok(Self {
            id: id.to_string(),
            pool,
        })
    }

    /// Session identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Movies that can be voted on
    pub fn pool(&self) -> &[Movie] {
        &self.pool
    }

    /// Current vote records for this session
    pub fn records(&self, store: &dyn KvStore) -> Vec<VoteRecord> {
        read_or_default(store, &keys::vote_records(&self.id))
    }

    /// Toggles a voter's vote on a movie.
    ///
    /// Casting on a movie the voter already voted for withdraws that
    /// vote, so toggling twice restores the records exactly.
    pub fn toggle_vote(
        &self,
        store: &dyn KvStore,
        movie_id: MovieId,
        voter: &str,
        now: DateTime<Utc>,
    ) -> Result<VoteToggle> {
        let records_key = keys::vote_records(&self.id);
        let mut records = self.records(store);

        let toggle = match records
            .iter()
            .position(|record| record.movie_id == movie_id && record.voter == voter)
        {
            Some(position) => {
                records.remove(position);
                VoteToggle::Removed
            }
            None => {
                records.push(VoteRecord {
                    movie_id,
                    voter: voter.to_string(),
                    cast_at: now,
                });
                VoteToggle::Added
            }
        };

        write(store, &records_key, &records)?;
        debug!(session_id = %self.id, movie_id, ?toggle, "vote toggled");
        Ok(toggle)
    }
}

// ===== Tallying =====

/// Counts standing votes per movie
pub fn tally(records: &[VoteRecord]) -> HashMap<MovieId, usize> {
    let mut counts = HashMap::new();
    for record in records {
        *counts.entry(record.movie_id).or_insert(0) += 1;
    }
    counts
}

/// Ranks the pool by descending vote count.
///
/// Movies with equal counts keep their pool order, so a fresh session
/// with no votes ranks exactly as the pool was drawn.
pub fn rank<'a>(pool: &'a [Movie], records: &[VoteRecord]) -> Vec<(&'a Movie, usize)> {
    let counts = tally(records);
    let mut ranked: Vec<(&Movie, usize)> = pool
        .iter()
        .map(|movie| (movie, counts.get(&movie.id).copied().unwrap_or(0)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

// ===== Identity =====

/// Generates a short shareable session id
pub fn new_session_id(rng: &mut dyn RandomSource) -> String {
    alphanumeric_token(rng, TOKEN_LENGTH)
}

/// This device's voter token for a session, generated once and reused
/// on every later call.
pub fn voter_token(
    store: &dyn KvStore,
    session_id: &str,
    rng: &mut dyn RandomSource,
) -> Result<String> {
    let key = keys::vote_token(session_id);
    if let Some(token) = read::<String>(store, &key) {
        return Ok(token);
    }

    let token = alphanumeric_token(rng, TOKEN_LENGTH);
    write(store, &key, &token)?;
    debug!(session_id = %session_id, "generated voter token");
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::SequenceRandom;
    use store::MemoryStore;

    fn create_test_movie(id: MovieId) -> Movie {
        Movie {
            id,
            title: format!("Movie {}", id),
            rating: 6.5,
            poster_path: None,
            overview: "A test synopsis.".to_string(),
            runtime: None,
        }
    }

    fn test_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_create_then_load_shares_pool() {
        let store = MemoryStore::new();
        let config = VoteConfig::default();
        let movies: Vec<Movie> = (1..=3).map(create_test_movie).collect();

        let created = VoteSession::create(&store, "abc1234", movies, &config).unwrap();
        let joined = VoteSession::load(&store, "abc1234").unwrap();

        assert_eq!(created.pool(), joined.pool());
        assert_eq!(joined.pool().len(), 3);
    }

    #[test]
    fn test_create_rejects_taken_id() {
        let store = MemoryStore::new();
        let config = VoteConfig::default();
        VoteSession::create(&store, "abc1234", vec![create_test_movie(1)], &config).unwrap();

        let result = VoteSession::create(&store, "abc1234", vec![create_test_movie(2)], &config);
        assert!(matches!(
            result,
            Err(SelectionError::SessionExists { id }) if id == "abc1234"
        ));
    }

    #[test]
    fn test_load_unknown_session_fails() {
        let store = MemoryStore::new();
        let result = VoteSession::load(&store, "nope123");
        assert!(matches!(
            result,
            Err(SelectionError::UnknownSession { id }) if id == "nope123"
        ));
    }

    #[test]
    fn test_pool_is_truncated_to_configured_size() {
        let store = MemoryStore::new();
        let config = VoteConfig::default().with_pool_size(2);
        let movies: Vec<Movie> = (1..=5).map(create_test_movie).collect();

        let session = VoteSession::create(&store, "abc1234", movies, &config).unwrap();
        assert_eq!(session.pool().len(), 2);
        assert_eq!(session.pool()[0].id, 1);
    }

    #[test]
    fn test_toggle_twice_restores_records() {
        let store = MemoryStore::new();
        let config = VoteConfig::default();
        let session =
            VoteSession::create(&store, "abc1234", vec![create_test_movie(1)], &config).unwrap();

        let before = session.records(&store);

        let first = session.toggle_vote(&store, 1, "voter-a", test_now()).unwrap();
        assert_eq!(first, VoteToggle::Added);
        assert_eq!(session.records(&store).len(), 1);

        let second = session.toggle_vote(&store, 1, "voter-a", test_now()).unwrap();
        assert_eq!(second, VoteToggle::Removed);
        assert_eq!(session.records(&store), before);
    }

    #[test]
    fn test_distinct_voters_stack_votes() {
        let store = MemoryStore::new();
        let config = VoteConfig::default();
        let session =
            VoteSession::create(&store, "abc1234", vec![create_test_movie(1)], &config).unwrap();

        session.toggle_vote(&store, 1, "voter-a", test_now()).unwrap();
        session.toggle_vote(&store, 1, "voter-b", test_now()).unwrap();

        let counts = tally(&session.records(&store));
        assert_eq!(counts.get(&1), Some(&2));
    }

    #[test]
    fn test_rank_sorts_by_votes_with_stable_ties() {
        let pool: Vec<Movie> = (1..=3).map(create_test_movie).collect();
        let records = vec![VoteRecord {
            movie_id: 3,
            voter: "voter-a".to_string(),
            cast_at: test_now(),
        }];

        let ranked = rank(&pool, &records);
        let ids: Vec<MovieId> = ranked.iter().map(|(movie, _)| movie.id).collect();

        // Movie 3 leads, and the tied 1 and 2 keep their pool order.
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(ranked[0].1, 1);
        assert_eq!(ranked[1].1, 0);
    }

    #[test]
    fn test_voter_token_is_stable_per_session() {
        let store = MemoryStore::new();
        let mut rng = SequenceRandom::new(vec![0, 1, 2, 3, 4, 5, 6]);

        let first = voter_token(&store, "abc1234", &mut rng).unwrap();
        let second = voter_token(&store, "abc1234", &mut rng).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), TOKEN_LENGTH);
    }

    #[test]
    fn test_new_session_id_uses_token_alphabet() {
        let mut rng = SequenceRandom::new(vec![0, 0, 0, 0, 0, 0, 0]);
        let id = new_session_id(&mut rng);
        assert_eq!(id, "aaaaaaa");
    }
}
