//! The swipe session: state machine, gesture handling, exposure tracking,
//! and the async driver that ties them to the catalog and the store.
//!
//! ## Main Components
//!
//! - [`SwipeMachine`]: synchronous state machine, events in, effects out
//! - [`SessionDriver`]: async owner that executes effects against the
//!   catalog and the store
//! - [`ExposureLedger`]: shown-ring plus seen-set dedup record
//! - [`SwipeJournal`] / [`Favorites`]: side collections fed by swipes
//! - [`CandidateFetcher`]: the port tests script and production wires to
//!   the catalog
//!
//! ## Example Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use session::{CatalogFetcher, SessionConfig, SessionDriver, SwipeDirection};
//! use store::JsonFileStore;
//!
//! let client = catalog::CatalogClient::from_env()?;
//! let fetcher = Arc::new(CatalogFetcher::new(client));
//! let store = Arc::new(JsonFileStore::open("reel-swipe.json"));
//!
//! let mut driver = SessionDriver::new(
//!     fetcher,
//!     store,
//!     filters::FilterSpec::unconstrained(),
//!     SessionConfig::default(),
//! );
//! driver.start().await?;
//! driver.swipe(SwipeDirection::Right).await?;
//! ```

pub mod driver;
pub mod error;
pub mod favorites;
pub mod fetcher;
pub mod gesture;
pub mod journal;
pub mod ledger;
pub mod machine;
pub mod state;

pub use driver::SessionDriver;
pub use error::{Result, SessionError};
pub use favorites::Favorites;
pub use fetcher::{CandidateFetcher, CatalogFetcher, ScriptedFetcher};
pub use gesture::{DragPoint, DragVector, SwipeDirection, classify};
pub use journal::{SwipeEvent, SwipeJournal, SwipeSummary};
pub use ledger::ExposureLedger;
pub use machine::{Effect, Generation, SessionEvent, SwipeMachine};
pub use state::{Phase, SessionConfig, SessionState};
