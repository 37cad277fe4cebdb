//! Change notification for vote records.
//!
//! The store offers no push channel, so watchers poll: re-read the
//! backing store on an interval and wake only when the serialized vote
//! records differ from the last snapshot seen. The trait seam keeps
//! tally views independent of how changes are detected, so a pushier
//! backend can slot in later.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use store::{KvStore, keys, read};
use tokio::time::sleep;
use tracing::debug;

use crate::error::Result;
use crate::votes::VoteRecord;

/// A stream of vote-record snapshots, one per observed change
#[async_trait]
pub trait VoteSubscription: Send {
    /// Waits until the session's votes change and returns the new records
    async fn next_change(&mut self) -> Result<Vec<VoteRecord>>;
}

/// Polling subscription over the shared key/value store
pub struct StorePoller {
    store: Arc<dyn KvStore>,
    session_id: String,
    interval: Duration,
    last: Option<String>,
}

impl StorePoller {
    /// Creates a poller for a session's votes.
    ///
    /// The records present at subscription time count as already seen,
    /// so the first wait only completes on a fresh change.
    pub fn new(store: Arc<dyn KvStore>, session_id: impl Into<String>, interval: Duration) -> Self {
        let session_id = session_id.into();
        let last = store.get_raw(&keys::vote_records(&session_id));
        Self {
            store,
            session_id,
            interval,
            last,
        }
    }
}

#[async_trait]
impl VoteSubscription for StorePoller {
    async fn next_change(&mut self) -> Result<Vec<VoteRecord>> {
        let records_key = keys::vote_records(&self.session_id);
        loop {
            sleep(self.interval).await;
            self.store.refresh();

            let raw = self.store.get_raw(&records_key);
            if raw == self.last {
                continue;
            }

            debug!(session_id = %self.session_id, "vote records changed");
            self.last = raw;
            let records: Vec<VoteRecord> =
                read(self.store.as_ref(), &records_key).unwrap_or_default();
            return Ok(records);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::votes::{VoteConfig, VoteSession};
    use catalog::Movie;
    use chrono::{DateTime, Utc};
    use store::MemoryStore;
    use tokio::time::timeout;

    fn create_test_movie(id: u32) -> Movie {
        Movie {
            id,
            title: format!("Movie {}", id),
            rating: 7.5,
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

    #[tokio::test(start_paused = true)]
    async fn test_poller_wakes_on_new_vote() {
        let store = Arc::new(MemoryStore::new());
        let session = VoteSession::create(
            store.as_ref(),
            "abc1234",
            vec![create_test_movie(1)],
            &VoteConfig::default(),
        )
        .unwrap();

        let mut poller = StorePoller::new(store.clone(), "abc1234", Duration::from_millis(10));
        session
            .toggle_vote(store.as_ref(), 1, "voter-a", test_now())
            .unwrap();

        let records = poller.next_change().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].movie_id, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_sleeps_while_records_are_unchanged() {
        let store = Arc::new(MemoryStore::new());
        let session = VoteSession::create(
            store.as_ref(),
            "abc1234",
            vec![create_test_movie(1)],
            &VoteConfig::default(),
        )
        .unwrap();
        session
            .toggle_vote(store.as_ref(), 1, "voter-a", test_now())
            .unwrap();

        // Votes standing at subscription time are already seen.
        let mut poller = StorePoller::new(store.clone(), "abc1234", Duration::from_millis(10));
        let waited = timeout(Duration::from_millis(100), poller.next_change()).await;
        assert!(waited.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_reports_withdrawn_votes() {
        let store = Arc::new(MemoryStore::new());
        let session = VoteSession::create(
            store.as_ref(),
            "abc1234",
            vec![create_test_movie(1)],
            &VoteConfig::default(),
        )
        .unwrap();
        session
            .toggle_vote(store.as_ref(), 1, "voter-a", test_now())
            .unwrap();

        let mut poller = StorePoller::new(store.clone(), "abc1234", Duration::from_millis(10));
        session
            .toggle_vote(store.as_ref(), 1, "voter-a", test_now())
            .unwrap();

        let records = poller.next_change().await.unwrap();
        assert!(records.is_empty());
    }
}
