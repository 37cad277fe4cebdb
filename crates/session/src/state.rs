//! Session states and tunable parameters.

use std::time::Duration;

use catalog::Movie;

use crate::gesture::{DragPoint, DragVector, SwipeDirection};

/// Default number of decisive swipes before the session completes
pub const DEFAULT_SWIPE_CAP: u32 = 20;
/// Default displacement a drag must reach to count as a swipe
pub const DEFAULT_GESTURE_THRESHOLD: f32 = 100.0;
/// Default capacity of the shown-movies ring
pub const DEFAULT_LEDGER_CAPACITY: usize = 100;
/// Default bound on refetches when a candidate was already exposed
pub const DEFAULT_MAX_REFETCH_ATTEMPTS: u32 = 10;
/// Default pause before the single filter-relaxation retry
pub const DEFAULT_RELAXATION_DELAY: Duration = Duration::from_secs(2);
/// Default capacity of the swipe journal
pub const DEFAULT_JOURNAL_CAPACITY: usize = 1000;

/// The full state of a swipe session, including per-state data
#[derive(Debug, Clone)]
pub enum SessionState {
    /// Nothing in flight; waiting for a start or a retry
    Idle,
    /// A candidate fetch is outstanding
    Loading,
    /// A candidate is on screen; `next` holds the prefetched follow-up
    Presenting { current: Movie, next: Option<Movie> },
    /// A gesture is in progress on the current candidate
    Dragging {
        current: Movie,
        next: Option<Movie>,
        origin: DragPoint,
        offset: DragVector,
    },
    /// A decisive gesture ended; its side effects are being applied
    Deciding {
        current: Movie,
        next: Option<Movie>,
        direction: SwipeDirection,
    },
    /// The swipe cap was reached and the shortlist handed off
    SessionComplete { shortlist: Vec<Movie> },
}

impl SessionState {
    /// The state's discriminant, for display and assertions
    pub fn phase(&self) -> Phase {
        match self {
            SessionState::Idle => Phase::Idle,
            SessionState::Loading => Phase::Loading,
            SessionState::Presenting { .. } => Phase::Presenting,
            SessionState::Dragging { .. } => Phase::Dragging,
            SessionState::Deciding { .. } => Phase::Deciding,
            SessionState::SessionComplete { .. } => Phase::SessionComplete,
        }
    }

    /// The movie currently on screen, if any
    pub fn current(&self) -> Option<&Movie> {
        match self {
            SessionState::Presenting { current, .. }
            | SessionState::Dragging { current, .. }
            | SessionState::Deciding { current, .. } => Some(current),
            _ => None,
        }
    }
}

/// Data-free view of [`SessionState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Presenting,
    Dragging,
    Deciding,
    SessionComplete,
}

/// Tunable parameters of a swipe session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Decisive swipes before the session completes
    pub swipe_cap: u32,
    /// Displacement a drag must reach to count as a swipe
    pub gesture_threshold: f32,
    /// Capacity of the shown-movies ring
    pub ledger_capacity: usize,
    /// Refetch bound when a candidate was already exposed
    pub max_refetch_attempts: u32,
    /// Pause before the single filter-relaxation retry
    pub relaxation_delay: Duration,
    /// Capacity of the swipe journal
    pub journal_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            swipe_cap: DEFAULT_SWIPE_CAP,
            gesture_threshold: DEFAULT_GESTURE_THRESHOLD,
            ledger_capacity: DEFAULT_LEDGER_CAPACITY,
            max_refetch_attempts: DEFAULT_MAX_REFETCH_ATTEMPTS,
            relaxation_delay: DEFAULT_RELAXATION_DELAY,
            journal_capacity: DEFAULT_JOURNAL_CAPACITY,
        }
    }
}

impl SessionConfig {
    /// Set the swipe cap
    pub fn with_swipe_cap(mut self, cap: u32) -> Self {
        self.swipe_cap = cap;
        self
    }

    /// Set the gesture threshold
    pub fn with_gesture_threshold(mut self, threshold: f32) -> Self {
        self.gesture_threshold = threshold;
        self
    }

    /// Set the shown-ring capacity
    pub fn with_ledger_capacity(mut self, capacity: usize) -> Self {
        self.ledger_capacity = capacity;
        self
    }

    /// Set the refetch bound
    pub fn with_max_refetch_attempts(mut self, attempts: u32) -> Self {
        self.max_refetch_attempts = attempts;
        self
    }

    /// Set the relaxation retry delay
    pub fn with_relaxation_delay(mut self, delay: Duration) -> Self {
        self.relaxation_delay = delay;
        self
    }

    /// Set the journal capacity
    pub fn with_journal_capacity(mut self, capacity: usize) -> Self {
        self.journal_capacity = capacity;
        self
    }
}
