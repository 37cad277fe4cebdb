//! Localization and backfill for movie text fields.
//!
//! Catalog records localized for a non-English audience frequently arrive
//! with an empty `title` or `overview`. The chain here repairs that in a
//! fixed order, stopping as soon as both fields are filled:
//!
//! 1. the discovery record itself (`title`, then `name`)
//! 2. the translations endpoint (exact language, then region match)
//! 3. the localized detail record
//! 4. the fallback-language detail record (synopsis only)
//!
//! [`PendingMovie::finalize`] then applies the terminal fallbacks: the
//! original-language title, or a placeholder when even that is empty.
//! The result is a [`Movie`] whose text fields are never empty.

use crate::types::{Movie, RawMovie, RawMovieDetails, Translation, TranslationData};

/// Title used when every source of a display title is empty
pub const UNTITLED_PLACEHOLDER: &str = "Untitled";
/// Synopsis used when every source of an overview is empty
pub const NO_SYNOPSIS_PLACEHOLDER: &str = "No synopsis available.";

/// A movie mid-way through the localization chain.
///
/// Fill methods only write fields that are still empty, so running the
/// chain steps in order preserves the priority above.
#[derive(Debug, Clone)]
pub struct PendingMovie {
    id: u32,
    title: Option<String>,
    original_title: Option<String>,
    overview: Option<String>,
    rating: f32,
    poster_path: Option<String>,
    runtime: Option<u32>,
}

impl PendingMovie {
    /// Start the chain from a discovery record (step 1)
    pub fn from_discovery(raw: &RawMovie) -> Self {
        Self {
            id: raw.id,
            title: non_empty(&raw.title).or_else(|| non_empty(&raw.name)),
            original_title: non_empty(&raw.original_title),
            overview: non_empty(&raw.overview),
            rating: raw.vote_average.unwrap_or(0.0),
            poster_path: non_empty(&raw.poster_path),
            runtime: None,
        }
    }

    /// Start the chain from a full detail record
    pub fn from_details(details: &RawMovieDetails) -> Self {
        Self {
            id: details.id,
            title: non_empty(&details.title),
            original_title: non_empty(&details.original_title),
            overview: non_empty(&details.overview),
            rating: details.vote_average.unwrap_or(0.0),
            poster_path: non_empty(&details.poster_path),
            runtime: details.runtime,
        }
    }

    /// True when the display title still needs a source
    pub fn needs_title(&self) -> bool {
        self.title.is_none()
    }

    /// True when the synopsis still needs a source
    pub fn needs_overview(&self) -> bool {
        self.overview.is_none()
    }

    /// True once both text fields have a source
    pub fn is_complete(&self) -> bool {
        !self.needs_title() && !self.needs_overview()
    }

    /// Fill empty fields from a translation record (step 2)
    pub fn fill_from_translation(&mut self, data: &TranslationData) {
        if self.title.is_none() {
            self.title = non_empty(&data.title);
        }
        if self.overview.is_none() {
            self.overview = non_empty(&data.overview);
        }
    }

    /// Fill empty fields from a detail record (step 3). Runtime is taken
    /// opportunistically since discovery records never carry one.
    pub fn fill_from_details(&mut self, details: &RawMovieDetails) {
        if self.title.is_none() {
            self.title = non_empty(&details.title);
        }
        if self.original_title.is_none() {
            self.original_title = non_empty(&details.original_title);
        }
        if self.overview.is_none() {
            self.overview = non_empty(&details.overview);
        }
        if self.runtime.is_none() {
            self.runtime = details.runtime;
        }
    }

    /// Fill only the synopsis from a fallback-language detail record
    /// (step 4); the fallback locale must not override title resolution.
    pub fn fill_overview_from_details(&mut self, details: &RawMovieDetails) {
        if self.overview.is_none() {
            self.overview = non_empty(&details.overview);
        }
    }

    /// Close the chain, applying terminal fallbacks
    pub fn finalize(self) -> Movie {
        Movie {
            id: self.id,
            title: self
                .title
                .or(self.original_title)
                .unwrap_or_else(|| UNTITLED_PLACEHOLDER.to_string()),
            rating: self.rating,
            poster_path: self.poster_path,
            overview: self
                .overview
                .unwrap_or_else(|| NO_SYNOPSIS_PLACEHOLDER.to_string()),
            runtime: self.runtime,
        }
    }
}

/// Pick the best translation for a locale tag like `ja-JP`: an exact
/// language match wins, then a region match, otherwise nothing.
pub fn pick_translation<'a>(
    translations: &'a [Translation],
    language_tag: &str,
) -> Option<&'a TranslationData> {
    let (language, region) = split_locale(language_tag);
    translations
        .iter()
        .find(|t| t.iso_639_1 == language)
        .or_else(|| {
            region.and_then(|region| translations.iter().find(|t| t.iso_3166_1 == region))
        })
        .map(|t| &t.data)
}

/// Split a locale tag into language and optional region: `ja-JP` becomes
/// `("ja", Some("JP"))`, bare `ja` becomes `("ja", None)`.
pub fn split_locale(tag: &str) -> (&str, Option<&str>) {
    match tag.split_once('-') {
        Some((language, region)) if !region.is_empty() => (language, Some(region)),
        Some((language, _)) => (language, None),
        None => (tag, None),
    }
}

/// Extract the release year from a `YYYY-MM-DD` date string
pub fn release_year_from_date(date: &str) -> Option<u16> {
    let year = date.split('-').next()?;
    year.parse().ok()
}

/// Treat absent and empty strings the same
fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|s| !s.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_movie(title: &str, original_title: &str, overview: &str) -> RawMovie {
        RawMovie {
            id: 42,
            title: Some(title.to_string()),
            name: None,
            original_title: Some(original_title.to_string()),
            overview: Some(overview.to_string()),
            vote_average: Some(7.2),
            poster_path: Some("/poster.jpg".to_string()),
        }
    }

    fn translation(language: &str, region: &str, title: &str) -> Translation {
        Translation {
            iso_639_1: language.to_string(),
            iso_3166_1: region.to_string(),
            data: TranslationData {
                title: Some(title.to_string()),
                overview: None,
            },
        }
    }

    #[test]
    fn test_complete_discovery_record_passes_through() {
        let movie = PendingMovie::from_discovery(&raw_movie("Seven", "Se7en", "A thriller"))
            .finalize();
        assert_eq!(movie.title, "Seven");
        assert_eq!(movie.overview, "A thriller");
        assert_eq!(movie.rating, 7.2);
    }

    #[test]
    fn test_name_field_stands_in_for_title() {
        let raw = RawMovie {
            id: 1,
            title: None,
            name: Some("Alias".to_string()),
            ..RawMovie::default()
        };
        let movie = PendingMovie::from_discovery(&raw).finalize();
        assert_eq!(movie.title, "Alias");
    }

    #[test]
    fn test_empty_title_falls_back_to_original_title() {
        let movie = PendingMovie::from_discovery(&raw_movie("", "Le Samourai", "A hitman"))
            .finalize();
        assert_eq!(movie.title, "Le Samourai");
    }

    #[test]
    fn test_exhausted_chain_yields_placeholders() {
        let movie = PendingMovie::from_discovery(&raw_movie("", "", "")).finalize();
        assert_eq!(movie.title, UNTITLED_PLACEHOLDER);
        assert_eq!(movie.overview, NO_SYNOPSIS_PLACEHOLDER);
    }

    #[test]
    fn test_translation_fills_only_missing_fields() {
        let mut pending = PendingMovie::from_discovery(&raw_movie("", "", "Kept synopsis"));
        pending.fill_from_translation(&TranslationData {
            title: Some("Translated".to_string()),
            overview: Some("Discarded synopsis".to_string()),
        });
        let movie = pending.finalize();
        assert_eq!(movie.title, "Translated");
        assert_eq!(movie.overview, "Kept synopsis");
    }

    #[test]
    fn test_details_backfill_runtime_without_clobbering_text() {
        let mut pending = PendingMovie::from_discovery(&raw_movie("Kept", "", "Kept too"));
        pending.fill_from_details(&RawMovieDetails {
            id: 42,
            title: Some("Clobber attempt".to_string()),
            overview: Some("Clobber attempt".to_string()),
            runtime: Some(117),
            ..RawMovieDetails::default()
        });
        let movie = pending.finalize();
        assert_eq!(movie.title, "Kept");
        assert_eq!(movie.overview, "Kept too");
        assert_eq!(movie.runtime, Some(117));
    }

    #[test]
    fn test_fallback_details_only_touch_overview() {
        let mut pending = PendingMovie::from_discovery(&raw_movie("", "", ""));
        pending.fill_overview_from_details(&RawMovieDetails {
            id: 42,
            title: Some("English title".to_string()),
            overview: Some("English synopsis".to_string()),
            ..RawMovieDetails::default()
        });
        let movie = pending.finalize();
        // Title resolution never consults the fallback locale
        assert_eq!(movie.title, UNTITLED_PLACEHOLDER);
        assert_eq!(movie.overview, "English synopsis");
    }

    #[test]
    fn test_whitespace_only_title_is_kept_verbatim() {
        // Only the empty string counts as missing; whitespace is a value
        let movie = PendingMovie::from_discovery(&raw_movie(" ", "Original", "x")).finalize();
        assert_eq!(movie.title, " ");
    }

    #[test]
    fn test_translation_prefers_exact_language_match() {
        let translations = vec![
            translation("fr", "FR", "Titre"),
            translation("ja", "JP", "Japanese title"),
        ];
        let data = pick_translation(&translations, "ja-JP").unwrap();
        assert_eq!(data.title.as_deref(), Some("Japanese title"));
    }

    #[test]
    fn test_translation_falls_back_to_region_match() {
        let translations = vec![
            translation("fr", "FR", "Titre"),
            translation("en", "JP", "Region match"),
        ];
        let data = pick_translation(&translations, "ja-JP").unwrap();
        assert_eq!(data.title.as_deref(), Some("Region match"));
    }

    #[test]
    fn test_translation_missing_entirely() {
        let translations = vec![translation("fr", "FR", "Titre")];
        assert!(pick_translation(&translations, "ja-JP").is_none());
    }

    #[test]
    fn test_split_locale_variants() {
        assert_eq!(split_locale("ja-JP"), ("ja", Some("JP")));
        assert_eq!(split_locale("en"), ("en", None));
        assert_eq!(split_locale("en-"), ("en", None));
    }

    #[test]
    fn test_release_year_parses_date_prefix() {
        assert_eq!(release_year_from_date("1999-03-31"), Some(1999));
        assert_eq!(release_year_from_date(""), None);
        assert_eq!(release_year_from_date("unknown"), None);
    }
}
