//! Shortlist management and group vote sessions.
//!
//! After a swipe session hands off its picks, this crate takes over:
//! committing picks to a persistent shortlist with a viewing intent,
//! and letting a group rank a shared pool of movies by toggling votes.
//!
//! ## Main Components
//!
//! - [`Shortlist`]: persistent, deduplicated list of kept movies
//! - [`VoteSession`]: shared movie pool with per-voter toggling votes
//! - [`StorePoller`]: polling subscription that wakes on vote changes
//!
//! ## Example Usage
//!
//! ```ignore
//! let store = JsonFileStore::open("reel-swipe.json");
//!
//! let mut shortlist = Shortlist::load(&store);
//! for movie in take_pending_picks(&store)? {
//!     shortlist.commit(movie, Disposition::WatchLater, Utc::now());
//! }
//! shortlist.save(&store)?;
//!
//! let session = VoteSession::create(&store, &id, shortlist_movies, &VoteConfig::default())?;
//! session.toggle_vote(&store, movie_id, &voter, Utc::now())?;
//! for (movie, votes) in rank(session.pool(), &session.records(&store)) {
//!     println!("{votes:>3}  {}", movie.title);
//! }
//! ```

pub mod error;
pub mod poll;
pub mod shortlist;
pub mod votes;

pub use error::{Result, SelectionError};
pub use poll::{StorePoller, VoteSubscription};
pub use shortlist::{Disposition, Shortlist, ShortlistEntry, take_pending_picks};
pub use votes::{
    TOKEN_LENGTH, VoteConfig, VoteRecord, VoteSession, VoteToggle, new_session_id, rank, tally,
    voter_token,
};
