//! Inverted name index: folded name → arena indices.
//!
//! Every city is reachable under its folded primary name and under each
//! comma-separated alternate. Alternates split on commas only — a name like
//! "Ho Chi Minh City" is one alternate, not four tokens.

use std::collections::HashMap;

use crate::model::CityRecord;
use crate::text;

/// Folded name → posting list of arena indices (persisted in the cache).
pub(crate) type NameIndex = HashMap<String, Vec<u32>>;

/// Builds the index over a sorted arena.
pub(crate) fn build(cities: &[CityRecord]) -> NameIndex {
    let mut index = NameIndex::with_capacity(cities.len() * 2);
    for (i, city) in cities.iter().enumerate() {
        let i = i as u32;
        let key = text::fold(&city.city);
        if !key.is_empty() {
            index.entry(key).or_default().push(i);
        }
        if city.city_alt.is_empty() {
            continue;
        }
        for raw in city.city_alt.split(',') {
            let alt = raw.trim();
            if alt.is_empty() {
                continue;
            }
            index.entry(text::fold(alt)).or_default().push(i);
        }
    }
    index
}
