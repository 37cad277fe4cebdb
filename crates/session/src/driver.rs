//! Async driver for the swipe machine.
//!
//! Owns everything the machine must not: the fetcher, the store, the
//! ledger, the journal, favorites, the prefetch task and the clock. Each
//! public method feeds one event into the machine and then executes the
//! returned effects in order, feeding any follow-up events (fetch results)
//! straight back in. All events are serialized through `&mut self`, so a
//! turn always finishes before the next one starts.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use catalog::{FetchOutcome, Movie, MovieId};
use filters::FilterSpec;
use store::{KvStore, keys};

use crate::error::{Result, SessionError};
use crate::favorites::Favorites;
use crate::fetcher::CandidateFetcher;
use crate::gesture::{DragPoint, SwipeDirection};
use crate::journal::SwipeJournal;
use crate::ledger::ExposureLedger;
use crate::machine::{Effect, Generation, SessionEvent, SwipeMachine};
use crate::state::{Phase, SessionConfig, SessionState};

/// Extra displacement past the threshold used by [`SessionDriver::swipe`]
const SYNTHETIC_SWIPE_MARGIN: f32 = 50.0;

/// Drives a [`SwipeMachine`] against a fetcher and a store
pub struct SessionDriver {
    machine: SwipeMachine,
    fetcher: Arc<dyn CandidateFetcher>,
    store: Arc<dyn KvStore>,
    ledger: ExposureLedger,
    journal: SwipeJournal,
    favorites: Favorites,
    prefetch: Option<JoinHandle<(Generation, catalog::Result<FetchOutcome>)>>,
    handoff: Option<Vec<Movie>>,
    pending_error: Option<SessionError>,
}

impl SessionDriver {
    /// Create a driver, loading ledger, journal and favorites from the store
    pub fn new(
        fetcher: Arc<dyn CandidateFetcher>,
        store: Arc<dyn KvStore>,
        filter: FilterSpec,
        config: SessionConfig,
    ) -> Self {
        let ledger = ExposureLedger::load(store.as_ref(), config.ledger_capacity);
        let journal = SwipeJournal::load(store.as_ref(), config.journal_capacity);
        let favorites = Favorites::load(store.as_ref());
        Self {
            machine: SwipeMachine::new(filter, config),
            fetcher,
            store,
            ledger,
            journal,
            favorites,
            prefetch: None,
            handoff: None,
            pending_error: None,
        }
    }

    /// Begin the session: fetch and present the first candidate
    pub async fn start(&mut self) -> Result<()> {
        self.dispatch(SessionEvent::Started).await
    }

    /// Swap the active filter and restart the candidate pipeline
    pub async fn replace_filter(&mut self, filter: FilterSpec) -> Result<()> {
        self.absorb_prefetch().await?;
        self.dispatch(SessionEvent::FilterReplaced(filter)).await
    }

    /// Report a gesture beginning at `origin`
    pub async fn gesture_started(&mut self, origin: DragPoint) -> Result<()> {
        self.dispatch(SessionEvent::GestureStarted { origin }).await
    }

    /// Report pointer movement during a gesture
    pub async fn gesture_moved(&mut self, position: DragPoint) -> Result<()> {
        self.dispatch(SessionEvent::GestureMoved { position }).await
    }

    /// Report the gesture ending; resolves a decisive swipe to completion
    pub async fn gesture_ended(&mut self) -> Result<()> {
        self.absorb_prefetch().await?;
        self.dispatch(SessionEvent::GestureEnded).await?;
        if matches!(self.machine.state(), SessionState::Deciding { .. }) {
            self.dispatch(SessionEvent::DecisionResolved).await?;
        }
        Ok(())
    }

    /// Perform a full decisive swipe in one call
    pub async fn swipe(&mut self, direction: SwipeDirection) -> Result<()> {
        let reach = self.machine.config().gesture_threshold + SYNTHETIC_SWIPE_MARGIN;
        let (dx, dy) = match direction {
            SwipeDirection::Right => (reach, 0.0),
            SwipeDirection::Left => (-reach, 0.0),
            SwipeDirection::Up => (0.0, -reach),
            SwipeDirection::Down => (0.0, reach),
        };
        self.gesture_started(DragPoint::new(0.0, 0.0)).await?;
        self.gesture_moved(DragPoint::new(dx, dy)).await?;
        self.gesture_ended().await
    }

    /// Wait for any outstanding prefetch and absorb its result. Useful for
    /// deterministic tests; interactive callers rely on the opportunistic
    /// absorption in [`SessionDriver::gesture_ended`] instead.
    pub async fn settle_prefetch(&mut self) -> Result<()> {
        let Some(handle) = self.prefetch.take() else {
            return Ok(());
        };
        self.consume_prefetch(handle).await
    }

    /// Current session state
    pub fn state(&self) -> &SessionState {
        self.machine.state()
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.machine.state().phase()
    }

    /// The movie currently on screen, if any
    pub fn current(&self) -> Option<&Movie> {
        self.machine.state().current()
    }

    /// Decisive swipes since the session started
    pub fn swipe_count(&self) -> u32 {
        self.machine.swipe_count()
    }

    /// The active filter
    pub fn filter(&self) -> &FilterSpec {
        self.machine.filter()
    }

    /// Shortlist accumulated so far this session
    pub fn shortlist(&self) -> &[Movie] {
        self.machine.shortlist()
    }

    /// The exposure ledger
    pub fn ledger(&self) -> &ExposureLedger {
        &self.ledger
    }

    /// The swipe journal
    pub fn journal(&self) -> &SwipeJournal {
        &self.journal
    }

    /// Saved favorites
    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    /// Take the shortlist handed off by a completed session, if any
    pub fn take_handoff(&mut self) -> Option<Vec<Movie>> {
        self.handoff.take()
    }

    /// Feed one event through the machine and execute the effects in order
    #[instrument(skip(self, event), fields(event = event.name()))]
    async fn dispatch(&mut self, event: SessionEvent) -> Result<()> {
        let mut queue: VecDeque<Effect> = self.machine.handle(event).into();
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::Fetch { generation } => {
                    let follow_up = match self.fetch_deduped().await {
                        Ok(outcome) => self.machine.handle(SessionEvent::FetchArrived {
                            generation,
                            outcome,
                        }),
                        Err(error) => {
                            warn!(%error, "candidate fetch failed");
                            if self.pending_error.is_none() {
                                self.pending_error = Some(error.into());
                            }
                            self.machine.handle(SessionEvent::FetchFailed { generation })
                        }
                    };
                    queue.extend(follow_up);
                }
                Effect::Prefetch { generation } => self.spawn_prefetch(generation),
                Effect::Delay { duration } => sleep(duration).await,
                Effect::RecordShown { movie_id } => {
                    self.ledger.record_shown(movie_id);
                    self.ledger.save(self.store.as_ref())?;
                }
                Effect::MarkSeen { movie_id } => {
                    self.ledger.mark_seen(movie_id);
                    self.ledger.save(self.store.as_ref())?;
                }
                Effect::SaveFavorite { movie } => {
                    if self.favorites.add(movie) {
                        self.favorites.save(self.store.as_ref())?;
                    }
                }
                Effect::RecordSwipe {
                    movie_id,
                    direction,
                } => {
                    self.journal.record(movie_id, direction, Utc::now());
                    self.journal.save(self.store.as_ref())?;
                }
                Effect::HandOffShortlist { movies } => {
                    info!(picks = movies.len(), "session complete, handing off shortlist");
                    store::write(self.store.as_ref(), keys::PENDING_PICKS, &movies)?;
                    self.handoff = Some(movies);
                }
                Effect::ReportNoResults => {
                    if self.pending_error.is_none() {
                        self.pending_error = Some(SessionError::ExhaustedResults);
                    }
                }
            }
        }
        match self.pending_error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Fetch a candidate, refetching past ledger hits up to the configured
    /// bound, then accepting the repeat
    async fn fetch_deduped(&mut self) -> catalog::Result<FetchOutcome> {
        let filter = self.machine.filter().clone();
        let max_attempts = self.machine.config().max_refetch_attempts;
        let mut attempts = 0;
        loop {
            let movie = match self.fetcher.fetch_one(&filter).await? {
                FetchOutcome::NoResults => return Ok(FetchOutcome::NoResults),
                FetchOutcome::Found(movie) => movie,
            };
            if !self.ledger.contains(movie.id) {
                return Ok(FetchOutcome::Found(movie));
            }
            if attempts >= max_attempts {
                debug!(
                    movie_id = movie.id,
                    attempts, "refetch budget exhausted, accepting repeat"
                );
                return Ok(FetchOutcome::Found(movie));
            }
            attempts += 1;
            debug!(movie_id = movie.id, attempts, "candidate already exposed, refetching");
        }
    }

    /// Spawn the background prefetch unless one is already outstanding
    fn spawn_prefetch(&mut self, generation: Generation) {
        if self.prefetch.is_some() {
            return;
        }
        let fetcher = Arc::clone(&self.fetcher);
        let filter = self.machine.filter().clone();
        let mut exclude = self.ledger.exposed_ids();
        if let Some(current) = self.machine.state().current() {
            exclude.insert(current.id);
        }
        let max_attempts = self.machine.config().max_refetch_attempts;

        self.prefetch = Some(tokio::spawn(async move {
            let outcome =
                prefetch_one(fetcher.as_ref(), &filter, &exclude, max_attempts).await;
            (generation, outcome)
        }));
    }

    /// Absorb the prefetch result if the task already finished; otherwise
    /// leave it running
    async fn absorb_prefetch(&mut self) -> Result<()> {
        let Some(handle) = self.prefetch.take() else {
            return Ok(());
        };
        if !handle.is_finished() {
            self.prefetch = Some(handle);
            return Ok(());
        }
        self.consume_prefetch(handle).await
    }

    async fn consume_prefetch(
        &mut self,
        handle: JoinHandle<(Generation, catalog::Result<FetchOutcome>)>,
    ) -> Result<()> {
        match handle.await {
            Ok((generation, Ok(FetchOutcome::Found(movie)))) => {
                self.dispatch(SessionEvent::PrefetchArrived { generation, movie })
                    .await
            }
            Ok((generation, Ok(FetchOutcome::NoResults))) => {
                debug!(generation, "prefetch found nothing");
                Ok(())
            }
            Ok((_, Err(error))) => {
                // Prefetch failures are not user-visible
                warn!(%error, "prefetch failed");
                Ok(())
            }
            Err(join_error) => {
                warn!(%join_error, "prefetch task did not complete");
                Ok(())
            }
        }
    }
}

/// One dedup-filtered fetch, run inside the prefetch task against a
/// snapshot of the exclusions
async fn prefetch_one(
    fetcher: &dyn CandidateFetcher,
    filter: &FilterSpec,
    exclude: &HashSet<MovieId>,
    max_attempts: u32,
) -> catalog::Result<FetchOutcome> {
    let mut attempts = 0;
    loop {
        let movie = match fetcher.fetch_one(filter).await? {
            FetchOutcome::NoResults => return Ok(FetchOutcome::NoResults),
            FetchOutcome::Found(movie) => movie,
        };
        if !exclude.contains(&movie.id) || attempts >= max_attempts {
            return Ok(FetchOutcome::Found(movie));
        }
        attempts += 1;
    }
}
