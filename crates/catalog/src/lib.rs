//! Movie catalog access for the swipe app.
//!
//! This crate owns everything that touches the catalog API: configuration,
//! the HTTP client, response decoding, and the localization chain that
//! turns patchy wire records into presentable movie cards.
//!
//! ## Main Components
//!
//! - [`CatalogClient`]: async client over every endpoint the app uses
//! - [`CatalogConfig`]: environment-driven settings with builder overrides
//! - [`Movie`] / [`MovieDetails`]: canonical records consumed downstream
//! - [`normalize`]: the title and synopsis fallback chain
//! - [`RandomSource`]: injectable randomness for page and record sampling
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{CatalogClient, FetchOutcome, ThreadRandom};
//! use filters::FilterSpec;
//!
//! let client = CatalogClient::from_env()?;
//! let mut rng = ThreadRandom;
//!
//! let outcome = client
//!     .fetch_candidate(&FilterSpec::unconstrained(), &mut rng)
//!     .await?;
//! if let FetchOutcome::Found(movie) = outcome {
//!     let details = client.enrich(movie.id).await?;
//!     println!("{} ({:?})", details.movie.title, details.release_year);
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod random;
pub mod types;

pub use client::CatalogClient;
pub use config::CatalogConfig;
pub use error::{CatalogError, Result};
pub use random::{RandomSource, SequenceRandom, ThreadRandom, alphanumeric_token};
pub use types::{
    FetchOutcome, GenreEntry, Movie, MovieDetails, MovieId, ProviderEntry, RegionProviders,
};
