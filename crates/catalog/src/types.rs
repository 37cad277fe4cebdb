//! Core data types for the catalog client.
//!
//! Raw types mirror the wire format of the catalog API and are only used
//! at the decode boundary. The canonical [`Movie`] is what the rest of the
//! workspace sees: every text field is already localized and backfilled,
//! so downstream code never has to reason about missing titles.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Type alias for movie IDs
pub type MovieId = u32;

// ============================================================================
// Canonical types (what the rest of the workspace consumes)
// ============================================================================

/// A fully resolved movie card.
///
/// Produced by the localization chain in [`crate::normalize`]; `title` and
/// `overview` are guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Catalog identifier
    pub id: MovieId,
    /// Display title (never empty)
    pub title: String,
    /// Average audience rating on a 0-10 scale
    pub rating: f32,
    /// Poster image path, when the catalog has one
    pub poster_path: Option<String>,
    /// Synopsis text (never empty)
    pub overview: String,
    /// Runtime in minutes, when known
    pub runtime: Option<u32>,
}

/// Extended information about a single movie, assembled by
/// [`crate::CatalogClient::enrich`]
#[derive(Debug, Clone)]
pub struct MovieDetails {
    /// The movie card itself
    pub movie: Movie,
    /// Year of first release, when the catalog supplies a release date
    pub release_year: Option<u16>,
    /// Names of everyone credited as director
    pub directors: Vec<String>,
    /// Names of the top-billed cast, in billing order
    pub top_cast: Vec<String>,
    /// Streaming availability for the configured region
    pub providers: Option<RegionProviders>,
}

/// Result of a single candidate fetch against the catalog
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// A candidate was found and fully localized
    Found(Movie),
    /// The sampled page had no results for the active filter
    NoResults,
}

/// A selectable genre
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreEntry {
    /// Catalog identifier used in filter queries
    pub id: u32,
    /// Human-readable genre name
    pub name: String,
}

/// A streaming service that can appear in filters and availability lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEntry {
    /// Catalog identifier used in filter queries
    pub provider_id: u32,
    /// Human-readable service name
    pub provider_name: String,
    /// Logo image path, when the catalog has one
    pub logo_path: Option<String>,
}

/// Streaming availability for one region, split by offer type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionProviders {
    /// Catalog page listing the offers
    pub link: Option<String>,
    /// Services offering the movie with a subscription
    #[serde(default)]
    pub flatrate: Vec<ProviderEntry>,
    /// Services renting the movie
    #[serde(default)]
    pub rent: Vec<ProviderEntry>,
    /// Services selling the movie
    #[serde(default)]
    pub buy: Vec<ProviderEntry>,
}

// ============================================================================
// Wire types (decoded straight from catalog responses)
// ============================================================================

/// One movie record as it appears in a discovery page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMovie {
    /// Catalog identifier
    pub id: MovieId,
    /// Localized title, possibly absent or empty
    #[serde(default)]
    pub title: Option<String>,
    /// Alternate name field some records carry instead of `title`
    #[serde(default)]
    pub name: Option<String>,
    /// Title in the movie's original language
    #[serde(default)]
    pub original_title: Option<String>,
    /// Localized synopsis, possibly absent or empty
    #[serde(default)]
    pub overview: Option<String>,
    /// Average audience rating
    #[serde(default)]
    pub vote_average: Option<f32>,
    /// Poster image path
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// One page of discovery results
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverPage {
    /// Page number that was served
    pub page: u32,
    /// Movie records on this page
    #[serde(default)]
    pub results: Vec<RawMovie>,
    /// Total pages available for the query
    #[serde(default)]
    pub total_pages: u32,
}

/// Full movie record served by the detail endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMovieDetails {
    /// Catalog identifier
    pub id: MovieId,
    /// Localized title, possibly absent or empty
    #[serde(default)]
    pub title: Option<String>,
    /// Title in the movie's original language
    #[serde(default)]
    pub original_title: Option<String>,
    /// Localized synopsis, possibly absent or empty
    #[serde(default)]
    pub overview: Option<String>,
    /// Average audience rating
    #[serde(default)]
    pub vote_average: Option<f32>,
    /// Poster image path
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Runtime in minutes
    #[serde(default)]
    pub runtime: Option<u32>,
    /// First release date as `YYYY-MM-DD`
    #[serde(default)]
    pub release_date: Option<String>,
}

/// Translated text for one locale
#[derive(Debug, Clone, Deserialize)]
pub struct Translation {
    /// Language code, e.g. `ja`
    pub iso_639_1: String,
    /// Region code, e.g. `JP`
    pub iso_3166_1: String,
    /// The translated fields themselves
    pub data: TranslationData,
}

/// The translatable fields of a movie record
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslationData {
    /// Translated title, possibly empty
    #[serde(default)]
    pub title: Option<String>,
    /// Translated synopsis, possibly empty
    #[serde(default)]
    pub overview: Option<String>,
}

/// Envelope for the translations endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationsResponse {
    /// All known translations for the movie
    #[serde(default)]
    pub translations: Vec<Translation>,
}

/// One cast credit
#[derive(Debug, Clone, Deserialize)]
pub struct CastMember {
    /// Performer name
    pub name: String,
    /// Billing position, lower is more prominent
    #[serde(default)]
    pub order: u32,
}

/// One crew credit
#[derive(Debug, Clone, Deserialize)]
pub struct CrewMember {
    /// Crew member name
    pub name: String,
    /// Credited role, e.g. `Director`
    pub job: String,
}

/// Envelope for the credits endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreditsResponse {
    /// Cast credits
    #[serde(default)]
    pub cast: Vec<CastMember>,
    /// Crew credits
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

/// Envelope for the genre list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GenresResponse {
    /// All selectable genres
    #[serde(default)]
    pub genres: Vec<GenreEntry>,
}

/// Envelope for the provider list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ProvidersResponse {
    /// All providers known for the queried region
    #[serde(default)]
    pub results: Vec<ProviderEntry>,
}

/// Envelope for the per-movie watch-provider endpoint, keyed by region code
#[derive(Debug, Clone, Deserialize)]
pub struct WatchProvidersResponse {
    /// Availability by region code, e.g. `US`
    #[serde(default)]
    pub results: HashMap<String, RegionProviders>,
}
