//! Place-name autocomplete.
//!
//! [`rank_candidates`] is the shared ranking step: it filters a pool of
//! places by a case-insensitive substring match, puts name-prefix matches
//! ahead of everything else, collapses duplicates and truncates. Both the
//! offline list and the live geocoder go through it, so suggestions look the
//! same regardless of where they came from.

use std::{collections::HashSet, sync::Arc};

use tracing::{debug, warn};

use crate::{model::PlaceCandidate, provider::PlaceLookup};

pub mod cursor;
pub mod session;

pub use cursor::SuggestionCursor;
pub use session::SearchSession;

/// Queries shorter than this (after trimming) never reach a lookup.
pub const MIN_QUERY_CHARS: usize = 2;

/// Result of one suggestion request.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Ranked suggestions; may be empty.
    Matches(Vec<PlaceCandidate>),
    /// The lookup failed. Show an empty list, not an error page.
    Failed,
}

impl SearchOutcome {
    pub fn places(&self) -> &[PlaceCandidate] {
        match self {
            SearchOutcome::Matches(places) => places,
            SearchOutcome::Failed => &[],
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SearchOutcome::Failed)
    }
}

/// Does `candidate` contain the already lower-cased `needle` in its name,
/// country code or region?
pub(crate) fn matches(needle: &str, candidate: &PlaceCandidate) -> bool {
    candidate.name.to_lowercase().contains(needle)
        || candidate.country.to_lowercase().contains(needle)
        || candidate
            .region
            .as_deref()
            .is_some_and(|region| region.to_lowercase().contains(needle))
}

/// Filter, tier, dedup and truncate a pool of places for `query`.
///
/// Prefix matches on the name come first; within each tier the pool's order
/// is kept. The first candidate with a given dedup key wins.
pub fn rank_candidates<I>(query: &str, pool: I, limit: usize) -> Vec<PlaceCandidate>
where
    I: IntoIterator<Item = PlaceCandidate>,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let (mut ranked, elsewhere): (Vec<_>, Vec<_>) = pool
        .into_iter()
        .filter(|c| matches(&needle, c))
        .partition(|c| c.name.to_lowercase().starts_with(&needle));
    ranked.extend(elsewhere);

    let mut seen = HashSet::new();
    ranked
        .into_iter()
        .filter(|c| seen.insert(c.dedup_key()))
        .take(limit)
        .collect()
}

/// Autocomplete over a [`PlaceLookup`], static or remote.
#[derive(Debug, Clone)]
pub struct SuggestionEngine {
    places: Arc<dyn PlaceLookup>,
}

impl SuggestionEngine {
    pub fn new(places: Arc<dyn PlaceLookup>) -> Self {
        Self { places }
    }

    /// Suggest up to `limit` places for a partially typed `query`.
    ///
    /// Short queries return no matches without consulting the lookup.
    pub async fn suggest(&self, query: &str, limit: usize) -> SearchOutcome {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS || limit == 0 {
            return SearchOutcome::Matches(Vec::new());
        }

        match self.places.lookup(query, limit).await {
            Ok(pool) => {
                let ranked = rank_candidates(query, pool, limit);
                debug!(query, suggestions = ranked.len(), "suggestions ready");
                SearchOutcome::Matches(ranked)
            }
            Err(err) => {
                warn!(query, error = %err, "place lookup failed");
                SearchOutcome::Failed
            }
        }
    }
}
