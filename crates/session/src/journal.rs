//! Swipe journal: a bounded history of decisive gestures.
//!
//! Feeds the stats view. Entries past the capacity are dropped oldest
//! first, so the journal reflects recent behavior, not all time.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog::MovieId;
use store::{KvStore, keys, read_or_default, write};

use crate::gesture::SwipeDirection;

/// One decisive gesture, as recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwipeEvent {
    /// Movie the gesture applied to
    pub movie_id: MovieId,
    /// Direction of the swipe
    pub direction: SwipeDirection,
    /// When the swipe was recorded
    pub recorded_at: DateTime<Utc>,
}

/// Aggregated view over the journal
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeSummary {
    /// Total recorded swipes
    pub total: usize,
    /// Rightward swipes (shortlisted)
    pub liked: usize,
    /// Leftward swipes (skipped)
    pub passed: usize,
    /// Upward swipes (favorited)
    pub favorited: usize,
    /// Downward swipes (dismissed as seen)
    pub dismissed: usize,
    /// Fraction of swipes that were likes, 0.0 when empty
    pub like_rate: f32,
}

/// FIFO-bounded journal of swipe events
#[derive(Debug)]
pub struct SwipeJournal {
    events: VecDeque<SwipeEvent>,
    capacity: usize,
}

impl SwipeJournal {
    /// Create an empty journal
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity,
        }
    }

    /// Load the journal from the store, keeping the newest entries if the
    /// persisted history exceeds the capacity
    pub fn load(store: &dyn KvStore, capacity: usize) -> Self {
        let events: Vec<SwipeEvent> = read_or_default(store, keys::SWIPE_STATS);
        let skip = events.len().saturating_sub(capacity);
        Self {
            events: events.into_iter().skip(skip).collect(),
            capacity,
        }
    }

    /// Persist the journal
    pub fn save(&self, store: &dyn KvStore) -> store::Result<()> {
        let events: Vec<&SwipeEvent> = self.events.iter().collect();
        write(store, keys::SWIPE_STATS, &events)
    }

    /// Append one event, evicting the oldest past capacity
    pub fn record(&mut self, movie_id: MovieId, direction: SwipeDirection, now: DateTime<Utc>) {
        self.events.push_back(SwipeEvent {
            movie_id,
            direction,
            recorded_at: now,
        });
        while self.events.len() > self.capacity {
            self.events.pop_front();
        }
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the journal is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate events oldest first
    pub fn events(&self) -> impl Iterator<Item = &SwipeEvent> {
        self.events.iter()
    }

    /// Aggregate totals per direction and the like rate
    pub fn summary(&self) -> SwipeSummary {
        let mut summary = SwipeSummary {
            total: self.events.len(),
            liked: 0,
            passed: 0,
            favorited: 0,
            dismissed: 0,
            like_rate: 0.0,
        };
        for event in &self.events {
            match event.direction {
                SwipeDirection::Right => summary.liked += 1,
                SwipeDirection::Left => summary.passed += 1,
                SwipeDirection::Up => summary.favorited += 1,
                SwipeDirection::Down => summary.dismissed += 1,
            }
        }
        if summary.total > 0 {
            summary.like_rate = summary.liked as f32 / summary.total as f32;
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MemoryStore;

    fn record_n(journal: &mut SwipeJournal, n: u32, direction: SwipeDirection) {
        for id in 0..n {
            journal.record(id, direction, Utc::now());
        }
    }

    #[test]
    fn test_journal_evicts_oldest_past_capacity() {
        let mut journal = SwipeJournal::new(3);
        for id in 1..=5u32 {
            journal.record(id, SwipeDirection::Right, Utc::now());
        }

        assert_eq!(journal.len(), 3);
        let ids: Vec<MovieId> = journal.events().map(|e| e.movie_id).collect();
        assert_eq!(ids, vec![3, 4, 5]);
    }

    #[test]
    fn test_summary_counts_directions() {
        let mut journal = SwipeJournal::new(100);
        record_n(&mut journal, 3, SwipeDirection::Right);
        record_n(&mut journal, 2, SwipeDirection::Left);
        record_n(&mut journal, 1, SwipeDirection::Up);

        let summary = journal.summary();
        assert_eq!(summary.total, 6);
        assert_eq!(summary.liked, 3);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.favorited, 1);
        assert_eq!(summary.dismissed, 0);
        assert!((summary.like_rate - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_empty_journal_has_zero_like_rate() {
        let journal = SwipeJournal::new(10);
        assert_eq!(journal.summary().like_rate, 0.0);
        assert!(journal.is_empty());
    }

    #[test]
    fn test_roundtrip_through_store() {
        let store = MemoryStore::new();
        let mut journal = SwipeJournal::new(10);
        journal.record(42, SwipeDirection::Up, Utc::now());
        journal.save(&store).unwrap();

        let loaded = SwipeJournal::load(&store, 10);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.events().next().unwrap().movie_id, 42);
    }

    #[test]
    fn test_load_truncates_oversized_history() {
        let store = MemoryStore::new();
        let mut journal = SwipeJournal::new(10);
        for id in 1..=10u32 {
            journal.record(id, SwipeDirection::Left, Utc::now());
        }
        journal.save(&store).unwrap();

        let loaded = SwipeJournal::load(&store, 4);
        let ids: Vec<MovieId> = loaded.events().map(|e| e.movie_id).collect();
        assert_eq!(ids, vec![7, 8, 9, 10]);
    }
}
