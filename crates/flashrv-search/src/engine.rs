use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use flashrv_core::Salon;
use serde::Serialize;
use uuid::Uuid;

use crate::filters::SearchFilters;
use crate::geo;
use crate::index::{IndexEntry, SearchIndex};

/// Upper bound on the number of autocomplete suggestions per query.
pub const MAX_SUGGESTIONS: usize = 8;

/// Query tokens must exceed this many characters to count.
const MIN_TOKEN_CHARS: usize = 2;

/// Minimum prefix length for suggestions; shorter prefixes yield nothing.
const MIN_SUGGESTION_PREFIX_CHARS: usize = 2;

/// One search result: the full salon record plus, when the caller supplied
/// an origin coordinate, the computed distance in kilometres rounded to two
/// decimals. The distance rides alongside the record — catalog data is never
/// mutated to carry it.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub salon: Salon,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

struct Candidate {
    position: usize,
    score: f64,
    distance: Option<f64>,
}

/// Relevance-ranked search over a salon catalog snapshot.
///
/// The engine owns its index exclusively. Each instance is independent —
/// construct one per catalog rather than sharing process-wide state.
pub struct SearchEngine {
    index: RwLock<Arc<SearchIndex>>,
}

impl SearchEngine {
    /// An engine with an empty index; every query answers empty until
    /// [`rebuild_index`](Self::rebuild_index) runs.
    #[must_use]
    pub fn new() -> Self {
        Self {
            index: RwLock::new(Arc::new(SearchIndex::default())),
        }
    }

    /// Convenience constructor: build and immediately index a catalog.
    #[must_use]
    pub fn from_catalog(catalog: &[Salon]) -> Self {
        let engine = Self::new();
        engine.rebuild_index(catalog);
        engine
    }

    /// Replace the published index with one built from `catalog`.
    ///
    /// The new index is constructed fully off to the side and swapped in as
    /// a single reference replacement, so concurrent readers observe either
    /// the old index or the new one, never a partially populated one.
    /// Inactive and unverified salons are dropped here and can never surface
    /// in any query.
    pub fn rebuild_index(&self, catalog: &[Salon]) {
        let next = Arc::new(SearchIndex::build(catalog));
        let mut guard = match self.index.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = next;
    }

    /// Number of salons in the published index.
    #[must_use]
    pub fn indexed_count(&self) -> usize {
        self.snapshot().records.len()
    }

    /// Look up a single indexed salon by id.
    ///
    /// Returns `None` for unknown ids and for salons excluded from the index
    /// (inactive or unverified).
    #[must_use]
    pub fn salon(&self, id: Uuid) -> Option<Salon> {
        let index = self.snapshot();
        index
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .map(|i| index.records[i].clone())
    }

    /// Answer a free-text + structured-filter query with ranked results.
    ///
    /// Tokens shorter than three characters are discarded; an empty token
    /// set makes the text stage a no-op rather than a reject-all. Results
    /// are ordered by relevance score descending, with catalog order as the
    /// tie-break — except for coordinate-only queries (no tokens, active
    /// distance bound), which order by ascending distance like the nearby
    /// surface always has.
    #[must_use]
    pub fn search(&self, query: &str, filters: &SearchFilters) -> Vec<SearchHit> {
        let index = self.snapshot();
        let tokens = tokenize(query);

        let geo_active = match (filters.origin, filters.has_distance_bound()) {
            (Some(_), bounded) => bounded,
            (None, true) => {
                tracing::warn!("distance filter ignored: no origin coordinate supplied");
                false
            }
            (None, false) => false,
        };

        let mut candidates = Vec::new();
        for (position, entry) in index.entries.iter().enumerate() {
            if !text_match(entry, &tokens) || !filters.matches(entry) {
                continue;
            }

            let mut distance = None;
            if let Some(origin) = filters.origin {
                match entry.coordinate {
                    Some(coord) => {
                        let d = geo::distance_km(origin, coord);
                        if geo_active {
                            if let Some(max) = filters.max_distance_km {
                                if !geo::within(origin, coord, max) {
                                    continue;
                                }
                            }
                            if let Some(min) = filters.min_distance_km {
                                if d < min {
                                    continue;
                                }
                            }
                        }
                        distance = Some(d);
                    }
                    // Entries without coordinates cannot satisfy a distance
                    // bound; without one they simply go unannotated.
                    None if geo_active => continue,
                    None => {}
                }
            }

            candidates.push(Candidate {
                position,
                score: score_entry(entry, &tokens),
                distance,
            });
        }

        if tokens.is_empty() && geo_active {
            candidates.sort_by(|a, b| {
                a.distance
                    .unwrap_or(f64::INFINITY)
                    .total_cmp(&b.distance.unwrap_or(f64::INFINITY))
            });
        } else {
            // Stable sort: equal scores keep catalog order.
            candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        }

        candidates
            .into_iter()
            .map(|candidate| SearchHit {
                salon: index.records[candidate.position].clone(),
                distance_km: candidate.distance.map(geo::round_km),
            })
            .collect()
    }

    /// Autocomplete candidates for a prefix: salon names, service names,
    /// quarters and cities containing it, case-insensitively.
    ///
    /// Collected in catalog traversal order, de-duplicated on lowercase form
    /// with the first-seen casing preserved, capped at [`MAX_SUGGESTIONS`].
    /// Prefixes shorter than two characters yield an empty list.
    #[must_use]
    pub fn suggest(&self, prefix: &str) -> Vec<String> {
        if prefix.chars().count() < MIN_SUGGESTION_PREFIX_CHARS {
            return Vec::new();
        }

        let needle = prefix.to_lowercase();
        let index = self.snapshot();
        let mut seen = HashSet::new();
        let mut suggestions = Vec::new();

        for salon in &index.records {
            push_suggestion(&salon.name, &needle, &mut seen, &mut suggestions);
            for service in &salon.services {
                push_suggestion(&service.name, &needle, &mut seen, &mut suggestions);
            }
            push_suggestion(&salon.location.quarter, &needle, &mut seen, &mut suggestions);
            push_suggestion(&salon.location.city, &needle, &mut seen, &mut suggestions);

            if suggestions.len() >= MAX_SUGGESTIONS {
                break;
            }
        }

        suggestions
    }

    fn snapshot(&self) -> Arc<SearchIndex> {
        // The write side only ever swaps in a fully-built index, so a
        // poisoned lock still holds a consistent value; recover it instead
        // of panicking.
        let guard = match self.index.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Arc::clone(&*guard)
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn tokenize(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|token| token.chars().count() > MIN_TOKEN_CHARS)
        .collect()
}

/// Every token must appear in the entry's search text. An empty token set
/// matches trivially.
fn text_match(entry: &IndexEntry, tokens: &[String]) -> bool {
    tokens.iter().all(|token| entry.search_text.contains(token))
}

/// Additive relevance score: per token, +10 for a name match, +8 for a
/// quarter match, +5 for a search-text match (a token can land in several
/// buckets at once); plus twice the rating average, once per entry.
fn score_entry(entry: &IndexEntry, tokens: &[String]) -> f64 {
    let mut score = 0.0;
    for token in tokens {
        if entry.name_lower.contains(token) {
            score += 10.0;
        }
        if entry.quarter_lower.contains(token) {
            score += 8.0;
        }
        if entry.search_text.contains(token) {
            score += 5.0;
        }
    }
    score + entry.rating_average * 2.0
}

fn push_suggestion(
    value: &str,
    needle: &str,
    seen: &mut HashSet<String>,
    suggestions: &mut Vec<String>,
) {
    if suggestions.len() >= MAX_SUGGESTIONS {
        return;
    }
    let lower = value.to_lowercase();
    if lower.contains(needle) && seen.insert(lower) {
        suggestions.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_drops_short_tokens_and_lowercases() {
        assert_eq!(tokenize("Tresses à la Mode"), vec!["tresses", "mode"]);
        assert_eq!(tokenize("ab c"), Vec::<String>::new());
        assert_eq!(tokenize(""), Vec::<String>::new());
    }

    #[test]
    fn tokenize_counts_characters_not_bytes() {
        // "été" is three characters (five bytes) — kept.
        assert_eq!(tokenize("été"), vec!["été"]);
    }

    #[test]
    fn empty_engine_answers_empty() {
        let engine = SearchEngine::new();
        assert!(engine.search("tresses", &SearchFilters::default()).is_empty());
        assert!(engine.suggest("tr").is_empty());
        assert_eq!(engine.indexed_count(), 0);
    }
}
