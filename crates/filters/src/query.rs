//! Serialization of a FilterSpec into discovery query parameters.
//!
//! The mapping is deterministic: populated fields map to exactly one
//! parameter each, unconstrained fields are omitted entirely, and no
//! parameter is ever emitted with an empty value. The parameter names
//! follow the upstream catalog's discovery endpoint.

use crate::spec::FilterSpec;

impl FilterSpec {
    /// Serialize the populated constraints into query parameters.
    ///
    /// # Returns
    /// Key/value pairs ready to append to a discovery request. Multi-value
    /// axes join their identifiers: genres with `,` (AND semantics
    /// upstream), providers with `|` (OR semantics upstream). Year bounds
    /// become full dates so the inclusive-bound behavior is explicit.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if !self.genres.is_empty() {
            params.push(("with_genres".to_string(), join_ids(&self.genres, ',')));
        }

        if let Some(minutes) = self.max_runtime {
            params.push(("with_runtime.lte".to_string(), minutes.to_string()));
        }

        if let Some(year) = self.year_from {
            params.push((
                "primary_release_date.gte".to_string(),
                format!("{}-01-01", year),
            ));
        }

        if let Some(year) = self.year_to {
            params.push((
                "primary_release_date.lte".to_string(),
                format!("{}-12-31", year),
            ));
        }

        if !self.providers.is_empty() {
            params.push((
                "with_watch_providers".to_string(),
                join_ids(&self.providers, '|'),
            ));
        }

        params
    }
}

fn join_ids(ids: &[u32], separator: char) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(&separator.to_string())
}
