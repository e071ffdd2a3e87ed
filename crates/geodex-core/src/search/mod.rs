//! Forward and reverse query entry points.

mod forward;
mod reverse;

use std::collections::BTreeSet;

use crate::model::{CityRecord, Geodex};
use crate::parse::MAX_INPUT_RUNES;
use crate::text;

/// Hard ceiling on [`GeocodeOptions::fuzzy_distance`]. Each extra unit of
/// tolerance widens the O(keys) index scan, so the cap bounds worst-case
/// query cost regardless of caller input.
pub(crate) const MAX_FUZZY_DISTANCE: u32 = 3;

/// Forward-geocoding behavior switches.
#[derive(Clone, Copy, Debug, Default)]
pub struct GeocodeOptions {
    /// Require the city name to match the (stripped) input literally.
    pub exact_city: bool,
    /// Maximum Levenshtein distance for typo tolerance. 0 disables fuzzy
    /// matching; values above the internal cap are silently clamped.
    pub fuzzy_distance: u32,
}

impl Geodex {
    /// Forward geocoding with default options (scored fuzzy mode,
    /// typo tolerance off).
    ///
    /// Returns the single best match, or the empty record when nothing
    /// matches. Never errors: empty and whitespace-only inputs yield the
    /// empty record.
    pub fn geocode(&self, input: &str) -> CityRecord {
        self.geocode_opts(input, GeocodeOptions::default())
    }

    /// Forward geocoding with explicit options.
    pub fn geocode_opts(&self, input: &str, mut opts: GeocodeOptions) -> CityRecord {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return CityRecord::default();
        }
        // Never split a code point; over-long input is truncated, not refused.
        let query = text::truncate_runes(trimmed, MAX_INPUT_RUNES);

        opts.fuzzy_distance = opts.fuzzy_distance.min(MAX_FUZZY_DISTANCE);

        if opts.exact_city {
            self.exact_match_city(query)
        } else {
            self.fuzzy_match_location(query, opts)
        }
    }

    /// Union of posting lists for the given (already folded) keys.
    ///
    /// A `BTreeSet` keeps candidate iteration in ascending arena order;
    /// scoring and tie-breaking downstream depend on that determinism.
    pub(crate) fn collect_candidates<I>(&self, keys: I) -> BTreeSet<u32>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for key in keys {
            if let Some(list) = self.lookup_name(key.as_ref()) {
                set.extend(list.iter().copied());
            }
        }
        set
    }
}

/// Exact (distance 0) or bounded-distance comparison of two names.
pub(crate) fn fuzzy_match(query: &str, candidate: &str, max_dist: u32) -> bool {
    if max_dist == 0 {
        return text::eq_fold(query, candidate);
    }
    strsim::levenshtein(&text::fold(query), &text::fold(candidate)) <= max_dist as usize
}
