//! Catalog client configuration.
//!
//! Configuration is read from the environment by default but every knob has
//! a builder method, so tests and embedders can construct it directly.

use std::time::Duration;

use url::Url;

use crate::error::{CatalogError, Result};

/// Default catalog API root
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";
/// Default presentation locale
pub const DEFAULT_LANGUAGE: &str = "en-US";
/// Locale used as the last resort when localized text is missing
pub const DEFAULT_FALLBACK_LANGUAGE: &str = "en-US";
/// Default region for availability lookups
pub const DEFAULT_REGION: &str = "US";
/// Default number of discovery pages the random sampler draws from
pub const DEFAULT_PAGE_WINDOW: u32 = 10;
/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Widely available streaming services, used to keep the provider filter
/// list short. When none of these exist for the region, the full list is
/// returned instead.
pub const MAJOR_PROVIDER_IDS: [u32; 5] = [8, 9, 337, 350, 119];

const ENV_API_KEY: &str = "TMDB_API_KEY";
const ENV_BASE_URL: &str = "TMDB_BASE_URL";
const ENV_LANGUAGE: &str = "TMDB_LANGUAGE";
const ENV_FALLBACK_LANGUAGE: &str = "TMDB_FALLBACK_LANGUAGE";
const ENV_REGION: &str = "TMDB_REGION";

/// Settings for [`crate::CatalogClient`]
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// API key sent with every request
    pub api_key: String,
    /// API root; always ends with a slash so paths join cleanly
    pub base_url: Url,
    /// Locale requested for titles and synopses
    pub language: String,
    /// Locale used for the final synopsis fallback
    pub fallback_language: String,
    /// Region code for watch-provider lookups
    pub region: String,
    /// Width of the discovery page window before filter narrowing
    pub page_window: u32,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Provider IDs considered "major" when listing filterable services
    pub major_providers: Vec<u32>,
}

impl CatalogConfig {
    /// Create a configuration with the given API key and all defaults
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            base_url: Url::parse(DEFAULT_BASE_URL)?,
            language: DEFAULT_LANGUAGE.to_string(),
            fallback_language: DEFAULT_FALLBACK_LANGUAGE.to_string(),
            region: DEFAULT_REGION.to_string(),
            page_window: DEFAULT_PAGE_WINDOW,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            major_providers: MAJOR_PROVIDER_IDS.to_vec(),
        })
    }

    /// Read configuration from the process environment.
    ///
    /// `TMDB_API_KEY` is required; `TMDB_BASE_URL`, `TMDB_LANGUAGE`,
    /// `TMDB_FALLBACK_LANGUAGE` and `TMDB_REGION` override defaults when set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated the same as absent ones.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |var: &str| lookup(var).filter(|value| !value.is_empty());

        let api_key = read(ENV_API_KEY).ok_or_else(|| CatalogError::MissingCredential {
            var: ENV_API_KEY.to_string(),
        })?;

        let mut config = Self::new(api_key)?;
        if let Some(value) = read(ENV_BASE_URL) {
            config.base_url = parse_base_url(&value)?;
        }
        if let Some(value) = read(ENV_LANGUAGE) {
            config.language = value;
        }
        if let Some(value) = read(ENV_FALLBACK_LANGUAGE) {
            config.fallback_language = value;
        }
        if let Some(value) = read(ENV_REGION) {
            config.region = value;
        }
        Ok(config)
    }

    /// Set the presentation locale
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the fallback locale
    pub fn with_fallback_language(mut self, language: impl Into<String>) -> Self {
        self.fallback_language = language.into();
        self
    }

    /// Set the availability region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set the unnarrowed discovery page window
    pub fn with_page_window(mut self, pages: u32) -> Self {
        self.page_window = pages;
        self
    }

    /// Set the per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Parse a base URL, appending a trailing slash when missing so that
/// relative endpoint paths join under it instead of replacing its last
/// segment.
fn parse_base_url(value: &str) -> Result<Url> {
    if value.ends_with('/') {
        Ok(Url::parse(value)?)
    } else {
        Ok(Url::parse(&format!("{value}/"))?)
    }
}
