//! The FilterSpec value object.
//!
//! A FilterSpec is a set of independent, optional constraints. An empty
//! vector or `None` means "no filtering on that axis". Replacing the active
//! filter is an atomic swap performed by the session state machine; this
//! crate only defines the data and its serialization.

use serde::{Deserialize, Serialize};

/// Optional constraints narrowing a catalog discovery query.
///
/// No invariant couples the fields: `year_from > year_to` is legal and is
/// expected to produce an empty result set, which callers handle through
/// the no-results path rather than upfront validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Genre identifiers; empty = unconstrained
    pub genres: Vec<u32>,
    /// Runtime ceiling in minutes
    pub max_runtime: Option<u32>,
    /// Inclusive release-year lower bound
    pub year_from: Option<u16>,
    /// Inclusive release-year upper bound
    pub year_to: Option<u16>,
    /// Distribution-service identifiers; empty = unconstrained
    pub providers: Vec<u32>,
}

impl FilterSpec {
    /// A fully unconstrained FilterSpec (same as `Default`)
    pub fn unconstrained() -> Self {
        Self::default()
    }

    /// Constrain by genre identifiers
    pub fn with_genres(mut self, genres: Vec<u32>) -> Self {
        self.genres = genres;
        self
    }

    /// Constrain by a runtime ceiling in minutes
    pub fn with_max_runtime(mut self, minutes: u32) -> Self {
        self.max_runtime = Some(minutes);
        self
    }

    /// Constrain by an inclusive release-year lower bound
    pub fn with_year_from(mut self, year: u16) -> Self {
        self.year_from = Some(year);
        self
    }

    /// Constrain by an inclusive release-year upper bound
    pub fn with_year_to(mut self, year: u16) -> Self {
        self.year_to = Some(year);
        self
    }

    /// Constrain by distribution-service identifiers
    pub fn with_providers(mut self, providers: Vec<u32>) -> Self {
        self.providers = providers;
        self
    }

    /// True when no axis carries a constraint
    pub fn is_unconstrained(&self) -> bool {
        self.constrained_axes() == 0
    }

    /// Number of constrained axes (genres, runtime, year range, providers).
    ///
    /// The year bounds count as a single axis regardless of whether one or
    /// both are set. The catalog client uses this to narrow its random
    /// page window, since heavily filtered queries have sparse result sets.
    pub fn constrained_axes(&self) -> usize {
        let mut axes = 0;
        if !self.genres.is_empty() {
            axes += 1;
        }
        if self.max_runtime.is_some() {
            axes += 1;
        }
        if self.year_from.is_some() || self.year_to.is_some() {
            axes += 1;
        }
        if !self.providers.is_empty() {
            axes += 1;
        }
        axes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unconstrained() {
        let filter = FilterSpec::default();
        assert!(filter.is_unconstrained());
        assert_eq!(filter.constrained_axes(), 0);
    }

    #[test]
    fn test_builders_set_fields() {
        let filter = FilterSpec::default()
            .with_genres(vec![28, 12])
            .with_max_runtime(120)
            .with_year_from(1990)
            .with_year_to(2005)
            .with_providers(vec![8]);

        assert_eq!(filter.genres, vec![28, 12]);
        assert_eq!(filter.max_runtime, Some(120));
        assert_eq!(filter.year_from, Some(1990));
        assert_eq!(filter.year_to, Some(2005));
        assert_eq!(filter.providers, vec![8]);
        assert!(!filter.is_unconstrained());
    }

    #[test]
    fn test_year_bounds_count_as_one_axis() {
        let lower_only = FilterSpec::default().with_year_from(1990);
        let both = FilterSpec::default().with_year_from(1990).with_year_to(2000);

        assert_eq!(lower_only.constrained_axes(), 1);
        assert_eq!(both.constrained_axes(), 1);
    }

    #[test]
    fn test_all_axes_counted() {
        let filter = FilterSpec::default()
            .with_genres(vec![28])
            .with_max_runtime(90)
            .with_year_to(2010)
            .with_providers(vec![8, 337]);

        assert_eq!(filter.constrained_axes(), 4);
    }

    #[test]
    fn test_reversed_year_bounds_are_legal() {
        // Reversed bounds are serialized as-is; the catalog returns no
        // results and the session relaxation path takes over.
        let filter = FilterSpec::default().with_year_from(2020).with_year_to(1990);
        assert_eq!(filter.constrained_axes(), 1);
    }

    #[test]
    fn test_serde_round_trip() {
        let filter = FilterSpec::default().with_genres(vec![16]).with_max_runtime(100);
        let json = serde_json::to_string(&filter).unwrap();
        let back: FilterSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, filter);
    }
}
