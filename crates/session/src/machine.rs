//! The swipe-session state machine.
//!
//! [`SwipeMachine`] is a synchronous core: it holds the session state and
//! answers every [`SessionEvent`] with the follow-up [`Effect`]s the caller
//! must execute. It performs no I/O itself; the async driver owns the
//! catalog, the store and the clock, feeds events in, and carries effects
//! out. That split keeps every transition unit-testable without a runtime.
//!
//! ## Main Components
//!
//! - [`SessionEvent`]: everything that can happen to a session
//! - [`Effect`]: everything a transition can ask the driver to do
//! - [`SwipeMachine::handle`]: the transition function
//!
//! Stale async results are fenced by a generation counter: replacing the
//! filter bumps the generation, and any fetch or prefetch result carrying
//! an older generation is dropped on arrival.

use std::time::Duration;

use tracing::debug;

use catalog::{FetchOutcome, Movie, MovieId};
use filters::FilterSpec;

use crate::gesture::{self, DragPoint, DragVector, SwipeDirection};
use crate::state::{SessionConfig, SessionState};

/// Monotonic counter fencing stale fetch results
pub type Generation = u64;

/// An input to the state machine
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Begin a session from `Idle` or `SessionComplete`
    Started,
    /// Atomically swap the active filter
    FilterReplaced(FilterSpec),
    /// The main candidate fetch finished
    FetchArrived {
        generation: Generation,
        outcome: FetchOutcome,
    },
    /// The main candidate fetch failed in transport
    FetchFailed { generation: Generation },
    /// A background prefetch produced a candidate
    PrefetchArrived {
        generation: Generation,
        movie: Movie,
    },
    /// A gesture began at `origin`
    GestureStarted { origin: DragPoint },
    /// The pointer moved during a gesture
    GestureMoved { position: DragPoint },
    /// The gesture ended; classify the accumulated offset
    GestureEnded,
    /// The decisive gesture's side effects were applied; advance
    DecisionResolved,
}

impl SessionEvent {
    /// Short name for log fields
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::Started => "started",
            SessionEvent::FilterReplaced(_) => "filter_replaced",
            SessionEvent::FetchArrived { .. } => "fetch_arrived",
            SessionEvent::FetchFailed { .. } => "fetch_failed",
            SessionEvent::PrefetchArrived { .. } => "prefetch_arrived",
            SessionEvent::GestureStarted { .. } => "gesture_started",
            SessionEvent::GestureMoved { .. } => "gesture_moved",
            SessionEvent::GestureEnded => "gesture_ended",
            SessionEvent::DecisionResolved => "decision_resolved",
        }
    }
}

/// An instruction for the driver
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch a candidate for the active filter
    Fetch { generation: Generation },
    /// Opportunistically fetch the next candidate
    Prefetch { generation: Generation },
    /// Wait before executing the following effects
    Delay { duration: Duration },
    /// Add the movie to the ledger's shown-ring
    RecordShown { movie_id: MovieId },
    /// Add the movie to the ledger's seen-set
    MarkSeen { movie_id: MovieId },
    /// Add the movie to favorites
    SaveFavorite { movie: Movie },
    /// Append the swipe to the journal
    RecordSwipe {
        movie_id: MovieId,
        direction: SwipeDirection,
    },
    /// Persist the completed session's shortlist for the selection flow
    HandOffShortlist { movies: Vec<Movie> },
    /// Tell the user nothing matched, even unconstrained
    ReportNoResults,
}

/// The swipe-session state machine
#[derive(Debug)]
pub struct SwipeMachine {
    state: SessionState,
    filter: FilterSpec,
    swipe_count: u32,
    generation: Generation,
    relaxed: bool,
    shortlist: Vec<Movie>,
    config: SessionConfig,
}

impl SwipeMachine {
    /// Create a machine in `Idle` with the given starting filter
    pub fn new(filter: FilterSpec, config: SessionConfig) -> Self {
        Self {
            state: SessionState::Idle,
            filter,
            swipe_count: 0,
            generation: 0,
            relaxed: false,
            shortlist: Vec::new(),
            config,
        }
    }

    /// Current session state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Decisive swipes since the last session start
    pub fn swipe_count(&self) -> u32 {
        self.swipe_count
    }

    /// The active filter
    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    /// The current fetch generation
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The session parameters
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Shortlist accumulated so far this session
    pub fn shortlist(&self) -> &[Movie] {
        &self.shortlist
    }

    /// Apply one event and return the effects to execute, in order
    pub fn handle(&mut self, event: SessionEvent) -> Vec<Effect> {
        match event {
            SessionEvent::Started => self.on_started(),
            SessionEvent::FilterReplaced(filter) => self.on_filter_replaced(filter),
            SessionEvent::FetchArrived {
                generation,
                outcome,
            } => self.on_fetch_arrived(generation, outcome),
            SessionEvent::FetchFailed { generation } => self.on_fetch_failed(generation),
            SessionEvent::PrefetchArrived { generation, movie } => {
                self.on_prefetch_arrived(generation, movie)
            }
            SessionEvent::GestureStarted { origin } => self.on_gesture_started(origin),
            SessionEvent::GestureMoved { position } => self.on_gesture_moved(position),
            SessionEvent::GestureEnded => self.on_gesture_ended(),
            SessionEvent::DecisionResolved => self.on_decision_resolved(),
        }
    }

    fn on_started(&mut self) -> Vec<Effect> {
        match self.state {
            SessionState::Idle | SessionState::SessionComplete { .. } => {
                self.state = SessionState::Loading;
                self.swipe_count = 0;
                self.shortlist.clear();
                self.relaxed = false;
                vec![Effect::Fetch {
                    generation: self.generation,
                }]
            }
            _ => {
                debug!(phase = ?self.state.phase(), "session already running, ignoring start");
                vec![]
            }
        }
    }

    fn on_filter_replaced(&mut self, filter: FilterSpec) -> Vec<Effect> {
        self.generation += 1;
        self.filter = filter;
        self.relaxed = false;

        match self.state {
            SessionState::Idle | SessionState::SessionComplete { .. } => vec![],
            _ => {
                // Swipe counter is preserved; only the candidate pipeline restarts
                self.state = SessionState::Loading;
                vec![Effect::Fetch {
                    generation: self.generation,
                }]
            }
        }
    }

    fn on_fetch_arrived(&mut self, generation: Generation, outcome: FetchOutcome) -> Vec<Effect> {
        if generation != self.generation {
            debug!(generation, current = self.generation, "dropping stale fetch result");
            return vec![];
        }
        if !matches!(self.state, SessionState::Loading) {
            debug!(phase = ?self.state.phase(), "fetch arrived outside Loading, ignoring");
            return vec![];
        }

        match outcome {
            FetchOutcome::Found(movie) => self.present(movie),
            FetchOutcome::NoResults => {
                if self.relaxed {
                    // Already retried unconstrained once; give up and surface it
                    self.state = SessionState::Idle;
                    vec![Effect::ReportNoResults]
                } else {
                    self.relaxed = true;
                    self.filter = FilterSpec::unconstrained();
                    debug!("no results, relaxing filter for one retry");
                    vec![
                        Effect::Delay {
                            duration: self.config.relaxation_delay,
                        },
                        Effect::Fetch {
                            generation: self.generation,
                        },
                    ]
                }
            }
        }
    }

    fn on_fetch_failed(&mut self, generation: Generation) -> Vec<Effect> {
        if generation != self.generation {
            debug!(generation, current = self.generation, "dropping stale fetch failure");
            return vec![];
        }
        if matches!(self.state, SessionState::Loading) {
            // The driver surfaces the error; a manual retry re-enters Loading
            self.state = SessionState::Idle;
        }
        vec![]
    }

    fn on_prefetch_arrived(&mut self, generation: Generation, movie: Movie) -> Vec<Effect> {
        if generation != self.generation {
            debug!(generation, current = self.generation, "dropping stale prefetch");
            return vec![];
        }
        match &mut self.state {
            SessionState::Presenting { next, .. } | SessionState::Dragging { next, .. }
                if next.is_none() =>
            {
                *next = Some(movie);
            }
            _ => {
                debug!(movie_id = movie.id, "no empty slot for prefetched candidate, dropping");
            }
        }
        vec![]
    }

    fn on_gesture_started(&mut self, origin: DragPoint) -> Vec<Effect> {
        if let SessionState::Presenting { current, next } = &self.state {
            self.state = SessionState::Dragging {
                current: current.clone(),
                next: next.clone(),
                origin,
                offset: DragVector::default(),
            };
        }
        vec![]
    }

    fn on_gesture_moved(&mut self, position: DragPoint) -> Vec<Effect> {
        if let SessionState::Dragging { origin, offset, .. } = &mut self.state {
            *offset = DragVector::between(*origin, position);
        }
        vec![]
    }

    fn on_gesture_ended(&mut self) -> Vec<Effect> {
        let SessionState::Dragging {
            current,
            next,
            offset,
            ..
        } = &self.state
        else {
            return vec![];
        };

        match gesture::classify(*offset, self.config.gesture_threshold) {
            None => {
                // Below threshold on both axes: snap back, no counter change
                self.state = SessionState::Presenting {
                    current: current.clone(),
                    next: next.clone(),
                };
            }
            Some(direction) => {
                self.swipe_count += 1;
                self.state = SessionState::Deciding {
                    current: current.clone(),
                    next: next.clone(),
                    direction,
                };
            }
        }
        vec![]
    }

    fn on_decision_resolved(&mut self) -> Vec<Effect> {
        let SessionState::Deciding {
            current,
            next,
            direction,
        } = &self.state
        else {
            return vec![];
        };
        let current = current.clone();
        let next = next.clone();
        let direction = *direction;

        let mut effects = Vec::new();
        match direction {
            SwipeDirection::Right => {
                self.shortlist.push(current.clone());
            }
            SwipeDirection::Left => {}
            SwipeDirection::Down => {
                effects.push(Effect::MarkSeen {
                    movie_id: current.id,
                });
            }
            SwipeDirection::Up => {
                effects.push(Effect::SaveFavorite {
                    movie: current.clone(),
                });
            }
        }
        effects.push(Effect::RecordSwipe {
            movie_id: current.id,
            direction,
        });

        if self.swipe_count >= self.config.swipe_cap {
            let movies = std::mem::take(&mut self.shortlist);
            effects.push(Effect::HandOffShortlist {
                movies: movies.clone(),
            });
            self.state = SessionState::SessionComplete { shortlist: movies };
        } else if let Some(movie) = next {
            effects.extend(self.present(movie));
        } else {
            self.state = SessionState::Loading;
            effects.push(Effect::Fetch {
                generation: self.generation,
            });
        }
        effects
    }

    /// Enter `Presenting` with `movie` as current; shown-ring and prefetch
    /// bookkeeping happen at this moment, never earlier.
    fn present(&mut self, movie: Movie) -> Vec<Effect> {
        let movie_id = movie.id;
        self.state = SessionState::Presenting {
            current: movie,
            next: None,
        };
        vec![
            Effect::RecordShown { movie_id },
            Effect::Prefetch {
                generation: self.generation,
            },
        ]
    }
}
