//! HTTP client for the movie catalog API.
//!
//! Wraps a shared [`reqwest::Client`] and exposes one method per endpoint
//! the app needs, plus two composite operations:
//!
//! - [`CatalogClient::fetch_candidate`]: sample one discovery page at
//!   random, pick one record from it, and run the localization chain
//! - [`CatalogClient::enrich`]: fan out to details, credits and provider
//!   availability concurrently
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{CatalogClient, ThreadRandom};
//! use filters::FilterSpec;
//!
//! let client = CatalogClient::from_env()?;
//! let filter = FilterSpec::unconstrained().with_genres(vec![878]);
//! let mut rng = ThreadRandom;
//!
//! match client.fetch_candidate(&filter, &mut rng).await? {
//!     catalog::FetchOutcome::Found(movie) => println!("{}", movie.title),
//!     catalog::FetchOutcome::NoResults => println!("nothing matched"),
//! }
//! ```

use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use filters::FilterSpec;

use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use crate::normalize::{PendingMovie, pick_translation, release_year_from_date};
use crate::random::RandomSource;
use crate::types::{
    CastMember, CreditsResponse, CrewMember, DiscoverPage, FetchOutcome, GenreEntry,
    GenresResponse, Movie, MovieDetails, MovieId, ProviderEntry, ProvidersResponse, RawMovie,
    RawMovieDetails, RegionProviders, Translation, TranslationsResponse, WatchProvidersResponse,
};

/// User agent sent with every request
const USER_AGENT: &str = concat!("reel-swipe/", env!("CARGO_PKG_VERSION"));

/// Smallest page window a heavily constrained filter can narrow down to
const MIN_PAGE_WINDOW: u32 = 2;
/// Pages removed from the window per constrained filter axis
const PAGES_PER_AXIS: u32 = 2;
/// How many cast credits an enriched record keeps
const TOP_CAST_LIMIT: usize = 5;
/// Crew job string that marks a director credit
const DIRECTOR_JOB: &str = "Director";

/// Client for the movie catalog API.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    config: CatalogConfig,
}

impl CatalogClient {
    /// Create a client from an explicit configuration
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { http, config })
    }

    /// Create a client configured from the environment
    pub fn from_env() -> Result<Self> {
        Self::new(CatalogConfig::from_env()?)
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    // ========================================================================
    // Composite operations
    // ========================================================================

    /// Fetch one candidate for the active filter.
    ///
    /// Samples a random page from a window that shrinks as the filter gains
    /// constrained axes (tighter filters populate fewer pages), then picks
    /// one record from the page and localizes it. An empty page is reported
    /// as [`FetchOutcome::NoResults`], not an error.
    #[instrument(skip(self, rng), fields(axes = filter.constrained_axes()))]
    pub async fn fetch_candidate(
        &self,
        filter: &FilterSpec,
        rng: &mut dyn RandomSource,
    ) -> Result<FetchOutcome> {
        let window = self.page_window_for(filter);
        let page_number = rng.pick_in_range(1, window);
        debug!(page_number, window, "sampling discovery page");

        let page = self.discover(filter, page_number).await?;
        if page.results.is_empty() {
            debug!(page_number, "discovery page is empty");
            return Ok(FetchOutcome::NoResults);
        }

        let raw = pick_from_page(&page.results, rng);
        let movie = self.resolve_localized(raw).await;
        debug!(movie_id = movie.id, title = %movie.title, "candidate resolved");
        Ok(FetchOutcome::Found(movie))
    }

    /// Assemble the extended record for one movie.
    ///
    /// Details, credits and provider availability are fetched concurrently.
    /// The detail lookup is required; credits and providers degrade to empty
    /// so a partial catalog outage still yields a usable record.
    #[instrument(skip(self))]
    pub async fn enrich(&self, id: MovieId) -> Result<MovieDetails> {
        let (details, credits, providers) = tokio::join!(
            self.details(id, &self.config.language),
            self.credits(id),
            self.watch_providers_for(id),
        );

        let details = details?;
        let credits = credits.unwrap_or_else(|error| {
            warn!(movie_id = id, %error, "credits lookup failed; continuing without cast");
            CreditsResponse::default()
        });
        let providers = providers.unwrap_or_else(|error| {
            warn!(movie_id = id, %error, "provider lookup failed; continuing without offers");
            None
        });

        let release_year = details
            .release_date
            .as_deref()
            .and_then(release_year_from_date);
        let movie = self.localize_details(&details).await;

        Ok(MovieDetails {
            movie,
            release_year,
            directors: directors_from(&credits.crew),
            top_cast: top_billed(credits.cast, TOP_CAST_LIMIT),
            providers,
        })
    }

    // ========================================================================
    // Endpoint wrappers
    // ========================================================================

    /// List all selectable genres for the configured language
    pub async fn genres(&self) -> Result<Vec<GenreEntry>> {
        let params = vec![("language".to_string(), self.config.language.clone())];
        let response: GenresResponse = self.get_json("genre/movie/list", &params).await?;
        Ok(response.genres)
    }

    /// List streaming services available as filter choices.
    ///
    /// The full regional list runs to hundreds of entries, so it is narrowed
    /// to the major services; regions where none of those operate get the
    /// full list instead.
    pub async fn streaming_services(&self) -> Result<Vec<ProviderEntry>> {
        let params = vec![
            ("language".to_string(), self.config.language.clone()),
            ("watch_region".to_string(), self.config.region.clone()),
        ];
        let response: ProvidersResponse = self.get_json("watch/providers/movie", &params).await?;

        let major: Vec<ProviderEntry> = response
            .results
            .iter()
            .filter(|p| self.config.major_providers.contains(&p.provider_id))
            .cloned()
            .collect();
        if major.is_empty() {
            Ok(response.results)
        } else {
            Ok(major)
        }
    }

    /// Fetch one discovery page for a filter
    pub async fn discover(&self, filter: &FilterSpec, page: u32) -> Result<DiscoverPage> {
        let params = self.discover_params(filter, page);
        self.get_json("discover/movie", &params).await
    }

    /// Fetch the full detail record for a movie in the given locale
    pub async fn details(&self, id: MovieId, language: &str) -> Result<RawMovieDetails> {
        let params = vec![("language".to_string(), language.to_string())];
        self.get_json(&format!("movie/{id}"), &params).await
    }

    /// Fetch every available translation for a movie
    pub async fn translations(&self, id: MovieId) -> Result<Vec<Translation>> {
        let response: TranslationsResponse = self
            .get_json(&format!("movie/{id}/translations"), &[])
            .await?;
        Ok(response.translations)
    }

    /// Fetch cast and crew credits for a movie
    pub async fn credits(&self, id: MovieId) -> Result<CreditsResponse> {
        self.get_json(&format!("movie/{id}/credits"), &[]).await
    }

    /// Fetch streaming availability for a movie in the configured region
    pub async fn watch_providers_for(&self, id: MovieId) -> Result<Option<RegionProviders>> {
        let response: WatchProvidersResponse = self
            .get_json(&format!("movie/{id}/watch/providers"), &[])
            .await?;
        Ok(response.results.get(&self.config.region).cloned())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Query parameters for one discovery page
    fn discover_params(&self, filter: &FilterSpec, page: u32) -> Vec<(String, String)> {
        let mut params = filter.to_query();
        params.push(("language".to_string(), self.config.language.clone()));
        params.push(("sort_by".to_string(), "popularity.desc".to_string()));
        params.push(("include_adult".to_string(), "false".to_string()));
        params.push(("page".to_string(), page.to_string()));
        // Provider constraints only apply within a region
        if !filter.providers.is_empty() {
            params.push(("watch_region".to_string(), self.config.region.clone()));
        }
        params
    }

    /// Width of the discovery page window for a filter: each constrained
    /// axis removes pages from the window, down to a floor.
    fn page_window_for(&self, filter: &FilterSpec) -> u32 {
        let narrowing = PAGES_PER_AXIS * filter.constrained_axes() as u32;
        self.config
            .page_window
            .saturating_sub(narrowing)
            .max(MIN_PAGE_WINDOW)
    }

    /// Run the localization chain for a discovery record.
    ///
    /// Steps beyond the record itself each cost a request, so they only run
    /// while text is still missing, and a failed step is logged and skipped
    /// rather than failing the whole fetch.
    async fn resolve_localized(&self, raw: &RawMovie) -> Movie {
        let mut pending = PendingMovie::from_discovery(raw);

        if !pending.is_complete() {
            match self.translations(raw.id).await {
                Ok(translations) => {
                    if let Some(data) = pick_translation(&translations, &self.config.language) {
                        pending.fill_from_translation(data);
                    }
                }
                Err(error) => {
                    warn!(movie_id = raw.id, %error, "translation lookup failed, skipping step");
                }
            }
        }

        if !pending.is_complete() {
            match self.details(raw.id, &self.config.language).await {
                Ok(details) => pending.fill_from_details(&details),
                Err(error) => {
                    warn!(movie_id = raw.id, %error, "detail lookup failed, skipping step");
                }
            }
        }

        if pending.needs_overview() && self.config.fallback_language != self.config.language {
            match self.details(raw.id, &self.config.fallback_language).await {
                Ok(details) => pending.fill_overview_from_details(&details),
                Err(error) => {
                    warn!(movie_id = raw.id, %error, "fallback detail lookup failed, skipping step");
                }
            }
        }

        pending.finalize()
    }

    /// Same chain, starting from a detail record (used by enrichment)
    async fn localize_details(&self, details: &RawMovieDetails) -> Movie {
        let mut pending = PendingMovie::from_details(details);

        if !pending.is_complete() {
            match self.translations(details.id).await {
                Ok(translations) => {
                    if let Some(data) = pick_translation(&translations, &self.config.language) {
                        pending.fill_from_translation(data);
                    }
                }
                Err(error) => {
                    warn!(movie_id = details.id, %error, "translation lookup failed, skipping step");
                }
            }
        }

        if pending.needs_overview() && self.config.fallback_language != self.config.language {
            match self.details(details.id, &self.config.fallback_language).await {
                Ok(fallback) => pending.fill_overview_from_details(&fallback),
                Err(error) => {
                    warn!(movie_id = details.id, %error, "fallback detail lookup failed, skipping step");
                }
            }
        }

        pending.finalize()
    }

    /// Issue a GET and decode the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T> {
        let url = self.endpoint_url(path, params)?;
        debug!(path, "issuing catalog request");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Upstream {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|error| CatalogError::Decode {
            endpoint: path.to_string(),
            reason: error.to_string(),
        })
    }

    /// Build the full URL for an endpoint, with credentials attached
    fn endpoint_url(&self, path: &str, params: &[(String, String)]) -> Result<Url> {
        let mut url = self.config.base_url.join(path)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", &self.config.api_key);
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

/// Pick one record from a non-empty discovery page
fn pick_from_page<'a>(results: &'a [RawMovie], rng: &mut dyn RandomSource) -> &'a RawMovie {
    &results[rng.pick_index(results.len())]
}

/// Names of everyone credited as director, in credit order
fn directors_from(crew: &[CrewMember]) -> Vec<String> {
    crew.iter()
        .filter(|member| member.job == DIRECTOR_JOB)
        .map(|member| member.name.clone())
        .collect()
}

/// Names of the top-billed cast, sorted by billing position
fn top_billed(mut cast: Vec<CastMember>, limit: usize) -> Vec<String> {
    cast.sort_by_key(|member| member.order);
    cast.into_iter()
        .take(limit)
        .map(|member| member.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SequenceRandom;

    fn test_client() -> CatalogClient {
        let config = CatalogConfig::new("test-key").unwrap();
        CatalogClient::new(config).unwrap()
    }

    fn query_value(url: &Url, key: &str) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn test_endpoint_url_joins_under_base_path() {
        let client = test_client();
        let url = client.endpoint_url("discover/movie", &[]).unwrap();
        assert_eq!(url.path(), "/3/discover/movie");
        assert_eq!(query_value(&url, "api_key").as_deref(), Some("test-key"));
    }

    #[test]
    fn test_endpoint_url_appends_params() {
        let client = test_client();
        let params = vec![("language".to_string(), "ja-JP".to_string())];
        let url = client.endpoint_url("movie/42", &params).unwrap();
        assert_eq!(query_value(&url, "language").as_deref(), Some("ja-JP"));
    }

    #[test]
    fn test_discover_params_carry_filter_and_paging() {
        let client = test_client();
        let filter = FilterSpec::unconstrained().with_genres(vec![27, 53]);
        let params = client.discover_params(&filter, 4);

        let lookup = |key: &str| {
            params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(lookup("with_genres"), Some("27,53"));
        assert_eq!(lookup("page"), Some("4"));
        assert_eq!(lookup("sort_by"), Some("popularity.desc"));
        // No provider constraint, so no region pin
        assert_eq!(lookup("watch_region"), None);
    }

    #[test]
    fn test_discover_params_pin_region_for_provider_filters() {
        let client = test_client();
        let filter = FilterSpec::unconstrained().with_providers(vec![8]);
        let params = client.discover_params(&filter, 1);
        assert!(
            params
                .iter()
                .any(|(k, v)| k == "watch_region" && v == "US")
        );
    }

    #[test]
    fn test_page_window_narrows_per_constrained_axis() {
        let client = test_client();

        let unconstrained = FilterSpec::unconstrained();
        assert_eq!(client.page_window_for(&unconstrained), 10);

        let one_axis = FilterSpec::unconstrained().with_genres(vec![18]);
        assert_eq!(client.page_window_for(&one_axis), 8);

        let three_axes = FilterSpec::unconstrained()
            .with_genres(vec![18])
            .with_max_runtime(100)
            .with_providers(vec![8]);
        assert_eq!(client.page_window_for(&three_axes), 4);
    }

    #[test]
    fn test_page_window_never_drops_below_floor() {
        let client = test_client();
        let all_axes = FilterSpec::unconstrained()
            .with_genres(vec![18])
            .with_max_runtime(100)
            .with_year_from(1990)
            .with_year_to(1999)
            .with_providers(vec![8]);
        // Four axes would narrow past the floor
        assert_eq!(client.page_window_for(&all_axes), MIN_PAGE_WINDOW);
    }

    #[test]
    fn test_pick_from_page_uses_injected_draw() {
        let results = vec![
            RawMovie {
                id: 10,
                ..RawMovie::default()
            },
            RawMovie {
                id: 20,
                ..RawMovie::default()
            },
            RawMovie {
                id: 30,
                ..RawMovie::default()
            },
        ];
        let mut rng = SequenceRandom::new([2]);
        assert_eq!(pick_from_page(&results, &mut rng).id, 30);
    }

    #[test]
    fn test_directors_filter_by_job() {
        let crew = vec![
            CrewMember {
                name: "A. Editor".to_string(),
                job: "Editor".to_string(),
            },
            CrewMember {
                name: "B. Director".to_string(),
                job: "Director".to_string(),
            },
            CrewMember {
                name: "C. Director".to_string(),
                job: "Director".to_string(),
            },
        ];
        assert_eq!(directors_from(&crew), vec!["B. Director", "C. Director"]);
    }

    #[test]
    fn test_top_billed_sorts_and_truncates() {
        let cast = vec![
            CastMember {
                name: "Third".to_string(),
                order: 2,
            },
            CastMember {
                name: "First".to_string(),
                order: 0,
            },
            CastMember {
                name: "Second".to_string(),
                order: 1,
            },
        ];
        assert_eq!(top_billed(cast, 2), vec!["First", "Second"]);
    }
}
