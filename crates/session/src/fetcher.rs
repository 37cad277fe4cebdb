//! The candidate-fetching port.
//!
//! The driver talks to the catalog through [`CandidateFetcher`] so tests
//! can script exact fetch outcomes. [`CatalogFetcher`] is the production
//! implementation; [`ScriptedFetcher`] replays a prepared queue and records
//! the filters it was called with.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use catalog::{CatalogClient, FetchOutcome, Movie, RandomSource, ThreadRandom};
use filters::FilterSpec;

/// Source of swipe candidates
#[async_trait]
pub trait CandidateFetcher: Send + Sync {
    /// Fetch one candidate for the filter
    async fn fetch_one(&self, filter: &FilterSpec) -> catalog::Result<FetchOutcome>;
}

/// Production fetcher: a catalog client plus its random sampler
pub struct CatalogFetcher {
    client: CatalogClient,
    rng: tokio::sync::Mutex<Box<dyn RandomSource>>,
}

impl CatalogFetcher {
    /// Wrap a client with the thread-local random source
    pub fn new(client: CatalogClient) -> Self {
        Self::with_random_source(client, Box::new(ThreadRandom))
    }

    /// Wrap a client with an explicit random source
    pub fn with_random_source(client: CatalogClient, rng: Box<dyn RandomSource>) -> Self {
        Self {
            client,
            rng: tokio::sync::Mutex::new(rng),
        }
    }
}

#[async_trait]
impl CandidateFetcher for CatalogFetcher {
    async fn fetch_one(&self, filter: &FilterSpec) -> catalog::Result<FetchOutcome> {
        let mut rng = self.rng.lock().await;
        self.client.fetch_candidate(filter, rng.as_mut()).await
    }
}

/// Deterministic fetcher for tests and demos.
///
/// Replays a queue of outcomes in order; an exhausted queue keeps yielding
/// [`FetchOutcome::NoResults`]. Every call's filter is recorded for
/// assertions on what was actually requested.
pub struct ScriptedFetcher {
    outcomes: Mutex<VecDeque<catalog::Result<FetchOutcome>>>,
    calls: Mutex<Vec<FilterSpec>>,
}

impl ScriptedFetcher {
    /// Script an exact sequence of outcomes
    pub fn new(outcomes: impl IntoIterator<Item = catalog::Result<FetchOutcome>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Script a sequence of found movies
    pub fn found(movies: impl IntoIterator<Item = Movie>) -> Self {
        Self::new(
            movies
                .into_iter()
                .map(|movie| Ok(FetchOutcome::Found(movie))),
        )
    }

    /// The filters passed to every call so far, in order
    pub fn calls(&self) -> Vec<FilterSpec> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of calls made so far
    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl CandidateFetcher for ScriptedFetcher {
    async fn fetch_one(&self, filter: &FilterSpec) -> catalog::Result<FetchOutcome> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(filter.clone());
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(Ok(FetchOutcome::NoResults))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_movie(id: u32) -> Movie {
        Movie {
            id,
            title: format!("Movie {id}"),
            rating: 7.0,
            poster_path: None,
            overview: "Synopsis.".to_string(),
            runtime: None,
        }
    }

    #[tokio::test]
    async fn test_scripted_fetcher_replays_in_order() {
        let fetcher = ScriptedFetcher::found([test_movie(1), test_movie(2)]);
        let filter = FilterSpec::unconstrained();

        match fetcher.fetch_one(&filter).await.unwrap() {
            FetchOutcome::Found(movie) => assert_eq!(movie.id, 1),
            other => panic!("expected a found movie, got {other:?}"),
        }
        match fetcher.fetch_one(&filter).await.unwrap() {
            FetchOutcome::Found(movie) => assert_eq!(movie.id, 2),
            other => panic!("expected a found movie, got {other:?}"),
        }
        // Exhausted scripts degrade to empty results
        assert!(matches!(
            fetcher.fetch_one(&filter).await.unwrap(),
            FetchOutcome::NoResults
        ));
    }

    #[tokio::test]
    async fn test_scripted_fetcher_records_call_filters() {
        let fetcher = ScriptedFetcher::new([Ok(FetchOutcome::NoResults)]);
        let filter = FilterSpec::unconstrained().with_genres(vec![99]);
        fetcher.fetch_one(&filter).await.unwrap();

        assert_eq!(fetcher.call_count(), 1);
        assert_eq!(fetcher.calls()[0], filter);
    }
}
